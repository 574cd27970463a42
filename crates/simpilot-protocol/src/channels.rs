//! 物理遥控通道向量
//!
//! 采集层每个控制周期对物理设备采样一次，产出一个 `RemoteChannels` 快照。
//! 快照在该周期内只读，不跨周期共享。

/// 模拟轴下限
pub const CHANNEL_MIN: i32 = -1000;

/// 模拟轴上限
pub const CHANNEL_MAX: i32 = 1000;

/// 模拟通道作为按键使用时的触发阈值
///
/// 超过该值视为按下（如 ch7/ch8 映射到肩键）。
pub const BUTTON_THRESHOLD: i32 = 500;

/// 遥控通道向量
///
/// 8 个有符号模拟轴（ch1-ch4、ch6-ch9，域 `[-1000, 1000]`）加 2 个
/// 布尔按键（ch5、ch10）。通道编号沿用遥控器的习惯叫法，具体含义由
/// 上层的混控策略决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteChannels {
    pub ch1: i32,
    pub ch2: i32,
    pub ch3: i32,
    pub ch4: i32,
    pub ch5: bool,
    pub ch6: i32,
    pub ch7: i32,
    pub ch8: i32,
    pub ch9: i32,
    pub ch10: bool,
}

/// 模拟轴通道标识
///
/// 用于混控策略按名字引用某个模拟轴（布尔通道 ch5/ch10 不在此列）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AxisChannel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
    Ch6,
    Ch7,
    Ch8,
    Ch9,
}

impl RemoteChannels {
    /// 读取指定模拟轴的值
    pub fn axis(&self, channel: AxisChannel) -> i32 {
        match channel {
            AxisChannel::Ch1 => self.ch1,
            AxisChannel::Ch2 => self.ch2,
            AxisChannel::Ch3 => self.ch3,
            AxisChannel::Ch4 => self.ch4,
            AxisChannel::Ch6 => self.ch6,
            AxisChannel::Ch7 => self.ch7,
            AxisChannel::Ch8 => self.ch8,
            AxisChannel::Ch9 => self.ch9,
        }
    }

    /// 写入指定模拟轴的值（写入前钳位到合法域）
    pub fn set_axis(&mut self, channel: AxisChannel, value: i32) {
        let value = value.clamp(CHANNEL_MIN, CHANNEL_MAX);
        match channel {
            AxisChannel::Ch1 => self.ch1 = value,
            AxisChannel::Ch2 => self.ch2 = value,
            AxisChannel::Ch3 => self.ch3 = value,
            AxisChannel::Ch4 => self.ch4 = value,
            AxisChannel::Ch6 => self.ch6 = value,
            AxisChannel::Ch7 => self.ch7 = value,
            AxisChannel::Ch8 => self.ch8 = value,
            AxisChannel::Ch9 => self.ch9 = value,
        }
    }

    /// 将所有模拟轴钳位到 `[-1000, 1000]`
    ///
    /// 采集层设置量程后正常情况下不会越界，此方法用于防御异常驱动。
    pub fn clamped(mut self) -> Self {
        self.ch1 = self.ch1.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch2 = self.ch2.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch3 = self.ch3.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch4 = self.ch4.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch6 = self.ch6.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch7 = self.ch7.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch8 = self.ch8.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self.ch9 = self.ch9.clamp(CHANNEL_MIN, CHANNEL_MAX);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let ch = RemoteChannels::default();
        assert_eq!(ch.ch1, 0);
        assert_eq!(ch.ch9, 0);
        assert!(!ch.ch5);
        assert!(!ch.ch10);
    }

    #[test]
    fn test_axis_roundtrip() {
        let mut ch = RemoteChannels::default();
        ch.set_axis(AxisChannel::Ch4, 750);
        assert_eq!(ch.axis(AxisChannel::Ch4), 750);
        assert_eq!(ch.ch4, 750);
    }

    #[test]
    fn test_set_axis_clamps() {
        let mut ch = RemoteChannels::default();
        ch.set_axis(AxisChannel::Ch1, 5000);
        assert_eq!(ch.ch1, CHANNEL_MAX);
        ch.set_axis(AxisChannel::Ch1, -5000);
        assert_eq!(ch.ch1, CHANNEL_MIN);
    }

    #[test]
    fn test_clamped() {
        let ch = RemoteChannels {
            ch2: 1200,
            ch7: -1800,
            ..Default::default()
        };
        let clamped = ch.clamped();
        assert_eq!(clamped.ch2, CHANNEL_MAX);
        assert_eq!(clamped.ch7, CHANNEL_MIN);
        assert_eq!(clamped.ch3, 0);
    }
}
