//! # Simpilot Control
//!
//! 闭环辅助控制核心：把跟踪误差变成通道指令，并与物理遥控直通混合。
//!
//! ## 模块
//!
//! - `regulator`: 离散 PID 轴调节器（含诊断用出力历史环）
//! - `mode`: 控制模式与边沿触发
//! - `command`: 操作者指令通道（crossbeam）
//! - `blender`: 模式混控（调节器出力替换指定轴，其余直通）
//! - `io`: 协作方接口（物理通道源 / 虚拟设备报文端）
//! - `config`: TOML 运行配置
//! - `stats`: 周期诊断统计
//! - `loop_runner`: 单线程控制循环
//!
//! ## 周期结构
//!
//! 一次循环迭代就是一个控制周期，严格顺序执行：
//!
//! ```text
//! 采样物理通道 → 取帧（~16ms 有界超时）→ 跟踪推进 → 误差估计
//!   → PID 调节 → 模式混控 → 报文编码下发 → 统计 → 处理操作者指令
//! ```
//!
//! 所有可变状态归循环独占，无并行、无锁；整个周期内唯一的
//! 挂起点是有界的取帧调用。

pub mod blender;
pub mod command;
pub mod config;
pub mod io;
pub mod loop_runner;
pub mod mode;
pub mod regulator;
pub mod stats;

pub use blender::{BlendPolicy, ControlBlender};
pub use command::{AssistAxis, GainKind, OperatorCommand, command_channel};
pub use config::{ConfigError, ControlConfig};
pub use io::{ChannelSource, NeutralChannels, ReportSink, TracingSink};
pub use loop_runner::{ControlLoop, LoopSummary};
pub use mode::{EdgeTrigger, Mode};
pub use regulator::{AxisRegulator, AxisSign, EffortHistory, RegulatorGains};
pub use stats::CycleStats;

use simpilot_capture::CaptureError;
use thiserror::Error;

/// 控制层错误类型
///
/// 运行期的采集/跟踪/输出故障都在各自组件边界内吸收，
/// 这里的错误只在装配和协作方调用点出现。
#[derive(Error, Debug)]
pub enum ControlError {
    /// 采集层错误
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// 物理输入设备错误
    #[error("Input device error: {0}")]
    Input(String),

    /// 虚拟设备输出端错误
    #[error("Output sink unavailable: {0}")]
    Output(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
