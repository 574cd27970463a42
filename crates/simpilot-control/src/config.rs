//! TOML 运行配置
//!
//! 启动时从 `simpilot.toml` 加载；运行期的增益调整通过操作者
//! 指令完成，调参结果**不**写回文件（不跨运行持久化）。

use crate::blender::BlendPolicy;
use crate::regulator::{AxisSign, RegulatorGains};
use serde::{Deserialize, Serialize};
use simpilot_protocol::{CHANNEL_MAX, CHANNEL_MIN};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// 周期设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSettings {
    /// 目标循环频率（Hz）
    pub rate_hz: f64,
    /// 取帧有界超时（毫秒）
    pub capture_timeout_ms: u64,
}

impl Default for CycleSettings {
    fn default() -> Self {
        CycleSettings {
            rate_hz: 60.0,
            capture_timeout_ms: 16,
        }
    }
}

impl CycleSettings {
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }
}

/// 跟踪器设置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// 种子区边长（像素）
    pub seed_size: u32,
    /// 模板匹配接受阈值
    pub score_threshold: f64,
    /// 搜索半径（像素）
    pub search_radius: u32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            seed_size: 96,
            score_threshold: 0.60,
            search_radius: 24,
        }
    }
}

/// 遥测接收设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemetrySettings {
    /// UDP 监听地址（如 "127.0.0.1:47800"）；`None` 关闭遥测
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

/// 完整运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub cycle: CycleSettings,
    pub tracker: TrackerSettings,
    /// 水平误差轴（dx）调节器
    pub axis_x: RegulatorGains,
    /// 垂直误差轴（dy）调节器
    pub axis_y: RegulatorGains,
    pub blend: BlendPolicy,
    pub telemetry: TelemetrySettings,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            cycle: CycleSettings::default(),
            tracker: TrackerSettings::default(),
            axis_x: RegulatorGains {
                kp: 2.0,
                ki: 0.02,
                kd: 0.5,
                bias: 0,
                sign: AxisSign::Direct,
            },
            // 屏幕 y 向下增长，俯仰通道取反
            axis_y: RegulatorGains {
                kp: 2.0,
                ki: 0.02,
                kd: 0.5,
                bias: 0,
                sign: AxisSign::Negated,
            },
            blend: BlendPolicy::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

impl ControlConfig {
    /// 从 TOML 文件加载并校验
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: ControlConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML（`config init` 用）
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 校验配置一致性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cycle.rate_hz.is_finite() || self.cycle.rate_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cycle.rate_hz must be positive, got {}",
                self.cycle.rate_hz
            )));
        }
        if self.cycle.rate_hz > 1000.0 {
            return Err(ConfigError::Invalid(format!(
                "cycle.rate_hz {} is unreasonably high",
                self.cycle.rate_hz
            )));
        }
        if self.tracker.seed_size < 8 {
            return Err(ConfigError::Invalid(format!(
                "tracker.seed_size must be at least 8, got {}",
                self.tracker.seed_size
            )));
        }
        if !(0.0..=1.0).contains(&self.tracker.score_threshold) {
            return Err(ConfigError::Invalid(format!(
                "tracker.score_threshold must be in [0, 1], got {}",
                self.tracker.score_threshold
            )));
        }
        if self.tracker.search_radius == 0 {
            return Err(ConfigError::Invalid(
                "tracker.search_radius must be nonzero".into(),
            ));
        }

        for (name, gains) in [("axis_x", &self.axis_x), ("axis_y", &self.axis_y)] {
            if !(gains.kp.is_finite() && gains.ki.is_finite() && gains.kd.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: gains must be finite"
                )));
            }
            if !(CHANNEL_MIN..=CHANNEL_MAX).contains(&gains.bias) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: bias {} outside channel domain",
                    gains.bias
                )));
            }
        }

        let blend = &self.blend;
        if blend.assist_x == blend.assist_y {
            return Err(ConfigError::Invalid(
                "blend.assist_x and blend.assist_y must differ".into(),
            ));
        }
        if blend.forced_neutral == blend.assist_x || blend.forced_neutral == blend.assist_y {
            return Err(ConfigError::Invalid(
                "blend.forced_neutral must not be an assisted axis".into(),
            ));
        }
        if !(CHANNEL_MIN..=CHANNEL_MAX).contains(&blend.neutral_value) {
            return Err(ConfigError::Invalid(format!(
                "blend.neutral_value {} outside channel domain",
                blend.neutral_value
            )));
        }

        Ok(())
    }
}
