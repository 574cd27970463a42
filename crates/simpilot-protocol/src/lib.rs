//! # Simpilot Protocol
//!
//! 遥控通道与虚拟手柄报文协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `channels`: 物理遥控通道向量（8 轴 + 2 按键）
//! - `report`: 虚拟手柄报文构建（轴/扳机缩放、按键位掩码）
//! - `telemetry`: 姿态遥测包解析（四元数 → 欧拉角）
//!
//! ## 数值域
//!
//! 物理通道统一归一化到 `[-1000, 1000]`（由输入采集层负责量程设置），
//! 协议层只做域变换：
//!
//! ```text
//! ChannelSource (采集层)
//!     ↓ RemoteChannels  [-1000, 1000]
//! report::PadReport::from_channels() 域变换
//!     ↓ PadReport  stick [-32767, 32767] / trigger [0, 255] / buttons u16
//! ReportSink (虚拟设备层)
//! ```

pub mod channels;
pub mod report;
pub mod telemetry;

// 重新导出常用类型
pub use channels::*;
pub use report::*;
pub use telemetry::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid quaternion: norm is zero or not finite")]
    InvalidQuaternion,
}
