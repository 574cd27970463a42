//! 虚拟手柄报文构建
//!
//! 将通道向量编码为虚拟 X360 手柄的原生报文域：
//!
//! - 摇杆轴：`[-1000, 1000]` → `[-32767, 32767]`（单调仿射、保零点）
//! - 扳机：`[-1000, 1000]` → `[0, 255]`
//! - 按键：布尔通道 + 阈值穿越的模拟通道 → u16 位掩码
//!
//! 通道到报文位置的映射沿用原始设备布局，见 [`PadReport::from_channels`]。

use crate::channels::{BUTTON_THRESHOLD, RemoteChannels};
use num_enum::IntoPrimitive;

/// 虚拟手柄按键位掩码
///
/// 位值与 XUSB 报文的 `wButtons` 字段一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u16)]
pub enum PadButton {
    A = 0x1000,
    B = 0x2000,
    LeftShoulder = 0x0100,
    RightShoulder = 0x0200,
}

/// 虚拟手柄报文
///
/// 与虚拟总线驱动的 XUSB 报文字段一一对应，由输出层原样下发。
/// 每个控制周期无条件产出一份，不存在"本周期无输出"的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadReport {
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub buttons: u16,
}

/// 摇杆轴域变换：`[-1000, 1000]` → `[-32767, 32767]`
///
/// 单调、保零点，越界输入钳位而非回绕。
pub fn scale_axis(value: i32) -> i16 {
    let scaled = value as f64 / 1000.0 * 32767.0;
    scaled.clamp(-32767.0, 32767.0) as i16
}

/// 扳机域变换：`[-1000, 1000]` → `[0, 255]`
///
/// 采用对称双极映射 `(v + 1000) / 2000 * 255`，即物理轴中立位落在 127/128
/// 附近。若底层物理轴实际是单极量程，该映射会让中立点偏置。这是原始
/// 设备行为的既有歧义，在确认硬件量程之前保持原样。
pub fn scale_trigger(value: i32) -> u8 {
    let scaled = (value as f64 + 1000.0) / 2000.0 * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

impl PadReport {
    /// 按原始设备布局将通道向量编码为报文
    ///
    /// | 报文字段 | 通道 | 变换 |
    /// |----------|------|------|
    /// | 左摇杆 X | ch1 | `scale_axis` |
    /// | 左摇杆 Y | ch2 | `scale_axis`，取反 |
    /// | 右摇杆 X | ch4 | `scale_axis` |
    /// | 右摇杆 Y | ch9 | `scale_axis`，取反 |
    /// | 左扳机 | ch3 | `scale_trigger` |
    /// | 右扳机 | ch6 | `scale_trigger` |
    /// | A / B | ch5 / ch10 | 布尔直通 |
    /// | LB / RB | ch7 / ch8 | `> 500` 视为按下 |
    ///
    /// Y 轴取反是因为遥控器俯仰杆向前为负、而 XUSB 摇杆向上为正。
    pub fn from_channels(channels: &RemoteChannels) -> Self {
        let mut buttons = 0u16;
        if channels.ch5 {
            buttons |= u16::from(PadButton::A);
        }
        if channels.ch10 {
            buttons |= u16::from(PadButton::B);
        }
        if channels.ch7 > BUTTON_THRESHOLD {
            buttons |= u16::from(PadButton::LeftShoulder);
        }
        if channels.ch8 > BUTTON_THRESHOLD {
            buttons |= u16::from(PadButton::RightShoulder);
        }

        PadReport {
            thumb_lx: scale_axis(channels.ch1),
            thumb_ly: scale_axis(-channels.ch2),
            thumb_rx: scale_axis(channels.ch4),
            thumb_ry: scale_axis(-channels.ch9),
            left_trigger: scale_trigger(channels.ch3),
            right_trigger: scale_trigger(channels.ch6),
            buttons,
        }
    }

    /// 查询某个按键是否按下
    pub fn pressed(&self, button: PadButton) -> bool {
        self.buttons & u16::from(button) != 0
    }
}
