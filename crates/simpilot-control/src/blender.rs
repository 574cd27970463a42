//! 模式混控
//!
//! 每周期无条件产出一份外发通道向量：
//!
//! - **手动**：物理通道逐轴直通（钳位到合法域）
//! - **辅助**：两个指定轴替换为调节器出力（已在通道域内），
//!   一个策略指定轴强制到固定中立值，其余轴与全部按键直通
//!
//! 误差失效时调节器给出的就是中立出力，所以这里不需要任何
//! "本周期无输出"的分支。

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use simpilot_protocol::{AxisChannel, RemoteChannels};

/// 混控策略：哪些轴被辅助、哪个轴被钉在中立值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendPolicy {
    /// 承接水平误差出力的轴
    pub assist_x: AxisChannel,
    /// 承接垂直误差出力的轴
    pub assist_y: AxisChannel,
    /// 辅助模式下强制中立的轴
    pub forced_neutral: AxisChannel,
    /// 强制中立值
    #[serde(default)]
    pub neutral_value: i32,
}

impl Default for BlendPolicy {
    fn default() -> Self {
        BlendPolicy {
            assist_x: AxisChannel::Ch1,
            assist_y: AxisChannel::Ch2,
            forced_neutral: AxisChannel::Ch4,
            neutral_value: 0,
        }
    }
}

/// 模式混控器
#[derive(Debug)]
pub struct ControlBlender {
    policy: BlendPolicy,
}

impl ControlBlender {
    pub fn new(policy: BlendPolicy) -> Self {
        ControlBlender { policy }
    }

    pub fn policy(&self) -> &BlendPolicy {
        &self.policy
    }

    /// 产出本周期的外发通道向量
    pub fn blend(
        &self,
        mode: Mode,
        physical: &RemoteChannels,
        effort_x: i32,
        effort_y: i32,
    ) -> RemoteChannels {
        let mut out = physical.clamped();
        if mode == Mode::Assisted {
            out.set_axis(self.policy.assist_x, effort_x);
            out.set_axis(self.policy.assist_y, effort_y);
            out.set_axis(self.policy.forced_neutral, self.policy.neutral_value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physical() -> RemoteChannels {
        RemoteChannels {
            ch1: 500,
            ch2: -300,
            ch3: 700,
            ch4: 250,
            ch5: true,
            ch6: -800,
            ch9: 90,
            ..Default::default()
        }
    }

    #[test]
    fn test_manual_passthrough() {
        let blender = ControlBlender::new(BlendPolicy::default());
        let out = blender.blend(Mode::Manual, &physical(), 999, 999);
        assert_eq!(out, physical());
    }

    #[test]
    fn test_assisted_replaces_designated_axes() {
        let blender = ControlBlender::new(BlendPolicy::default());
        let out = blender.blend(Mode::Assisted, &physical(), 300, -150);

        assert_eq!(out.ch1, 300);
        assert_eq!(out.ch2, -150);
        // 策略轴钉中立
        assert_eq!(out.ch4, 0);
        // 其余轴和按键直通
        assert_eq!(out.ch3, 700);
        assert_eq!(out.ch6, -800);
        assert_eq!(out.ch9, 90);
        assert!(out.ch5);
    }

    #[test]
    fn test_assisted_with_custom_policy() {
        let blender = ControlBlender::new(BlendPolicy {
            assist_x: AxisChannel::Ch4,
            assist_y: AxisChannel::Ch9,
            forced_neutral: AxisChannel::Ch1,
            neutral_value: -50,
        });
        let out = blender.blend(Mode::Assisted, &physical(), 111, 222);

        assert_eq!(out.ch4, 111);
        assert_eq!(out.ch9, 222);
        assert_eq!(out.ch1, -50);
        assert_eq!(out.ch2, -300);
    }

    #[test]
    fn test_out_of_range_physical_is_clamped() {
        let blender = ControlBlender::new(BlendPolicy::default());
        let raw = RemoteChannels {
            ch3: 3000,
            ..Default::default()
        };
        let out = blender.blend(Mode::Manual, &raw, 0, 0);
        assert_eq!(out.ch3, 1000);
    }
}
