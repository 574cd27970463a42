//! 操作者指令通道
//!
//! 指令由输入侧（键盘线程、信号处理器等）投递到 crossbeam 通道，
//! 控制循环每周期末尾排空一次。指令属于配置变更事件，不是控制律
//! 状态的一部分；模式信号的边沿检测在循环内完成，与渲染/输入
//! 采集完全解耦。

use crossbeam_channel::{Receiver, Sender, unbounded};

/// 受辅助控制的轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistAxis {
    /// 水平误差轴（dx）
    X,
    /// 垂直误差轴（dy）
    Y,
}

/// 可在线调整的增益项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainKind {
    Kp,
    Ki,
    Kd,
}

/// 操作者指令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorCommand {
    /// 模式指令信号的电平采样（边沿检测由循环执行）
    ModeSwitch(bool),
    /// 在线调整某轴某项增益（触发调节器复位）
    AdjustGain {
        axis: AssistAxis,
        gain: GainKind,
        delta: f64,
    },
    /// 优雅退出
    Quit,
}

/// 创建操作者指令通道
pub fn command_channel() -> (Sender<OperatorCommand>, Receiver<OperatorCommand>) {
    unbounded()
}
