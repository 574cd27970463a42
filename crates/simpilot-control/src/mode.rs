//! 控制模式与边沿触发
//!
//! 模式只由操作者指令的去抖上升沿切换：必须在相邻两次采样里
//! 先观察到低、再观察到高才触发一次，按住不放不会反复切换。
//! 内部逻辑（跟踪丢失、采集故障等）永远不改模式。

use std::fmt;

/// 控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// 物理通道直通
    #[default]
    Manual,
    /// 指定轴由调节器驱动，其余直通
    Assisted,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Manual => Mode::Assisted,
            Mode::Assisted => Mode::Manual,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => write!(f, "manual"),
            Mode::Assisted => write!(f, "assisted"),
        }
    }
}

/// 去抖上升沿检测
///
/// 初始电平视为低。`sample` 按采样顺序喂入电平，只有低→高的
/// 跳变返回 `true`。
#[derive(Debug, Default)]
pub struct EdgeTrigger {
    previous: bool,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        EdgeTrigger::default()
    }

    /// 喂入一次电平采样，返回是否触发
    pub fn sample(&mut self, level: bool) -> bool {
        let fired = level && !self.previous;
        self.previous = level;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_toggles() {
        assert_eq!(Mode::Manual.toggled(), Mode::Assisted);
        assert_eq!(Mode::Assisted.toggled(), Mode::Manual);
    }

    #[test]
    fn test_rising_edge_fires_once() {
        let mut edge = EdgeTrigger::new();
        assert!(edge.sample(true));
        // 按住：不再触发
        assert!(!edge.sample(true));
        assert!(!edge.sample(true));
    }

    #[test]
    fn test_requires_low_before_next_fire() {
        let mut edge = EdgeTrigger::new();
        assert!(edge.sample(true));
        assert!(!edge.sample(true));
        assert!(!edge.sample(false));
        assert!(edge.sample(true));
    }

    #[test]
    fn test_low_samples_never_fire() {
        let mut edge = EdgeTrigger::new();
        assert!(!edge.sample(false));
        assert!(!edge.sample(false));
    }
}
