//! 离散 PID 轴调节器
//!
//! 每个受控轴一个实例，按周期离散递推：
//!
//! ```text
//! integral += error
//! derivative = error - previous_error
//! effort = sign · (Kp·error + Ki·integral + Kd·derivative) + bias
//! ```
//!
//! 出力硬钳位到通道域 `[-1000, 1000]`，不做速率限制。
//!
//! # 复位规则
//!
//! `integral` 与 `previous_error` 在以下时机清零：误差失效
//! （`regulate(None)`）、离开辅助模式、运行期修改增益。陈旧的积分
//! 项在恢复瞬间会被新增益放大成突跳，所以调参必须连带复位。
//!
//! # 积分饱和
//!
//! 积分项**不设**抗饱和钳位：误差长时间同号时积分线性增长，
//! 出力饱和解除后会产生超调。这是沿用的既有行为，
//! 改动前需要先在实机上评估。

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 出力下限（与通道域一致）
pub const EFFORT_MIN: i32 = -1000;

/// 出力上限（与通道域一致）
pub const EFFORT_MAX: i32 = 1000;

/// 出力历史环容量
pub const EFFORT_HISTORY_CAPACITY: usize = 200;

/// 轴符号约定
///
/// 按"增大该通道值的物理效果"选择：误差为正时该轴应该增大取
/// `Direct`，应该减小取 `Negated`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSign {
    Direct,
    Negated,
}

impl AxisSign {
    fn factor(self) -> f64 {
        match self {
            AxisSign::Direct => 1.0,
            AxisSign::Negated => -1.0,
        }
    }
}

/// 调节器增益与轴约定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulatorGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// 固定偏置，在 PID 计算之后叠加，用于补偿不对称的中立点
    /// （如悬停油门）
    #[serde(default)]
    pub bias: i32,
    #[serde(default = "default_sign")]
    pub sign: AxisSign,
}

fn default_sign() -> AxisSign {
    AxisSign::Direct
}

impl Default for RegulatorGains {
    fn default() -> Self {
        RegulatorGains {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            bias: 0,
            sign: AxisSign::Direct,
        }
    }
}

/// 诊断用出力历史环
///
/// 固定容量，装满后覆盖最旧值。只供显示层读取，**不**回馈进
/// 控制律；去掉它不改变任何控制行为。
#[derive(Debug)]
pub struct EffortHistory {
    buffer: VecDeque<i32>,
    capacity: usize,
}

impl EffortHistory {
    pub fn new(capacity: usize) -> Self {
        EffortHistory {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, effort: i32) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(effort);
    }

    pub fn latest(&self) -> Option<i32> {
        self.buffer.back().copied()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.buffer.iter().copied()
    }
}

/// 离散 PID 轴调节器
#[derive(Debug)]
pub struct AxisRegulator {
    gains: RegulatorGains,
    integral: f64,
    previous_error: f64,
    history: EffortHistory,
}

impl AxisRegulator {
    pub fn new(gains: RegulatorGains) -> Self {
        AxisRegulator {
            gains,
            integral: 0.0,
            previous_error: 0.0,
            history: EffortHistory::new(EFFORT_HISTORY_CAPACITY),
        }
    }

    pub fn gains(&self) -> RegulatorGains {
        self.gains
    }

    /// 运行期修改增益（连带复位，见模块文档）
    pub fn set_gains(&mut self, gains: RegulatorGains) {
        self.gains = gains;
        self.reset();
    }

    /// 清零积分项与上次误差
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    /// 当前积分项（诊断用）
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// 上一周期误差（诊断用）
    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    /// 出力历史（诊断用）
    pub fn history(&self) -> &EffortHistory {
        &self.history
    }

    /// 执行一个周期的调节
    ///
    /// `error` 为 `None` 表示本周期误差失效：状态复位，出力退到
    /// 中立值（即 `bias` 钳位后的结果）。出力每周期无条件产出并
    /// 记入历史环。
    pub fn regulate(&mut self, error: Option<f64>) -> i32 {
        let effort = match error {
            None => {
                self.reset();
                f64::from(self.gains.bias)
            },
            Some(error) => {
                self.integral += error;
                let derivative = error - self.previous_error;
                self.previous_error = error;

                let raw = self.gains.kp * error
                    + self.gains.ki * self.integral
                    + self.gains.kd * derivative;
                self.gains.sign.factor() * raw + f64::from(self.gains.bias)
            },
        };

        let clamped = effort
            .round()
            .clamp(f64::from(EFFORT_MIN), f64::from(EFFORT_MAX)) as i32;
        self.history.push(clamped);
        clamped
    }
}
