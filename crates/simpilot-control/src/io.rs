//! 协作方接口
//!
//! 物理输入采集与虚拟设备报文下发都是控制循环的协作方：
//! 循环只依赖这两个 trait，具体后端（HID 轮询、虚拟总线客户端）
//! 在应用侧装配。后端枚举采用"取第一个匹配"的显式函数返回
//! 成功/失败，不注册回调。

use crate::ControlError;
use simpilot_protocol::{PadReport, RemoteChannels};
use tracing::trace;

/// 物理通道源
///
/// 每个控制周期采样一次；失败时循环沿用上一份快照并记录告警，
/// 不终止。
pub trait ChannelSource {
    fn poll(&mut self) -> Result<RemoteChannels, ControlError>;
}

/// 虚拟设备报文端
///
/// 下发失败按"本周期跳过输出"处理（记录告警，循环继续）。
pub trait ReportSink {
    fn submit(&mut self, report: &PadReport) -> Result<(), ControlError>;
}

/// 常驻中立的通道源
///
/// 无物理设备时的演示/测试用：所有轴 0、按键松开。
#[derive(Debug, Default)]
pub struct NeutralChannels;

impl ChannelSource for NeutralChannels {
    fn poll(&mut self) -> Result<RemoteChannels, ControlError> {
        Ok(RemoteChannels::default())
    }
}

/// 把报文打进 trace 日志的输出端
///
/// 无虚拟总线时的演示用后端。
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn submit(&mut self, report: &PadReport) -> Result<(), ControlError> {
        trace!(
            "report LX={} LY={} RX={} RY={} LT={} RT={} buttons={:#06x}",
            report.thumb_lx,
            report.thumb_ly,
            report.thumb_rx,
            report.thumb_ry,
            report.left_trigger,
            report.right_trigger,
            report.buttons,
        );
        Ok(())
    }
}
