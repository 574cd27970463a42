//! 软件合成帧源
//!
//! 无硬件依赖的确定性帧源：深色背景上渲染一个绕帧中心缓慢环绕的亮色
//! 方块，供演示运行和测试使用。支持按脚本注入 Empty/Transient/Lost
//! 故障，用于驱动恢复路径。

use crate::{BYTES_PER_PIXEL, CaptureError, Frame, FrameSource};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 合成源配置
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    /// 方块边长（像素）
    pub square_size: u32,
    /// 环绕半径（像素）
    pub orbit_radius: f64,
    /// 每帧角步进（弧度）
    pub angular_step: f64,
    /// 背景灰度
    pub background: u8,
    /// 方块灰度
    pub foreground: u8,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        SyntheticConfig {
            width: 640,
            height: 480,
            square_size: 40,
            orbit_radius: 60.0,
            angular_step: 0.02,
            background: 24,
            foreground: 230,
        }
    }
}

/// 注入的故障类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticFault {
    /// 本次 acquire 返回 Empty
    Empty,
    /// 本次 acquire 返回 Transient
    Transient,
    /// 本次 acquire 返回 Lost，并使源离线直到重建
    Lost,
}

/// 软件合成帧源
///
/// 帧内容只由已产出的帧计数决定，同一脚本下完全可复现。
pub struct SyntheticSource {
    config: SyntheticConfig,
    frame_index: u64,
    faults: VecDeque<SyntheticFault>,
    /// 离线后所有 acquire 都返回 Lost，直到 reinitialize
    offline: bool,
    /// 剩余的重建失败次数（模拟资源迟迟回不来）
    reinit_failures: u32,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        SyntheticSource {
            config,
            frame_index: 0,
            faults: VecDeque::new(),
            offline: false,
            reinit_failures: 0,
        }
    }

    /// 追加一个待注入的故障（按 acquire 调用顺序消费）
    pub fn push_fault(&mut self, fault: SyntheticFault) {
        self.faults.push_back(fault);
    }

    /// 让接下来 `n` 次重建失败
    pub fn fail_next_reinits(&mut self, n: u32) {
        self.reinit_failures = n;
    }

    /// 已成功产出的帧数
    pub fn frames_produced(&self) -> u64 {
        self.frame_index
    }

    /// 指定帧序号下方块的左上角位置
    pub fn square_origin(&self, frame_index: u64) -> (u32, u32) {
        let cfg = &self.config;
        let angle = frame_index as f64 * cfg.angular_step;
        let cx = cfg.width as f64 / 2.0 + cfg.orbit_radius * angle.cos();
        let cy = cfg.height as f64 / 2.0 + cfg.orbit_radius * angle.sin();
        let half = cfg.square_size as f64 / 2.0;
        let max_x = cfg.width.saturating_sub(cfg.square_size) as f64;
        let max_y = cfg.height.saturating_sub(cfg.square_size) as f64;
        (
            (cx - half).clamp(0.0, max_x) as u32,
            (cy - half).clamp(0.0, max_y) as u32,
        )
    }

    fn render(&self) -> Frame {
        let cfg = &self.config;
        let pixel_count = cfg.width as usize * cfg.height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&[cfg.background, cfg.background, cfg.background, 255]);
        }

        let (x0, y0) = self.square_origin(self.frame_index);
        for y in y0..y0 + cfg.square_size {
            let row = y as usize * cfg.width as usize;
            for x in x0..x0 + cfg.square_size {
                let offset = (row + x as usize) * BYTES_PER_PIXEL;
                data[offset] = cfg.foreground;
                data[offset + 1] = cfg.foreground;
                data[offset + 2] = cfg.foreground;
            }
        }

        // 尺寸由配置构造，缓冲长度恒匹配
        Frame::new(cfg.width, cfg.height, data, Instant::now())
            .expect("synthetic buffer dimensions are consistent")
    }
}

impl FrameSource for SyntheticSource {
    fn acquire(&mut self, _timeout: Duration) -> Result<Option<Frame>, CaptureError> {
        if self.offline {
            return Err(CaptureError::Lost("synthetic source offline".into()));
        }

        match self.faults.pop_front() {
            Some(SyntheticFault::Empty) => Ok(None),
            Some(SyntheticFault::Transient) => {
                Err(CaptureError::Transient("injected transient fault".into()))
            },
            Some(SyntheticFault::Lost) => {
                self.offline = true;
                Err(CaptureError::Lost("injected loss".into()))
            },
            None => {
                let frame = self.render();
                self.frame_index += 1;
                Ok(Some(frame))
            },
        }
    }

    fn reinitialize(&mut self) -> Result<(), CaptureError> {
        if self.reinit_failures > 0 {
            self.reinit_failures -= 1;
            return Err(CaptureError::Init("synthetic reinit still failing".into()));
        }
        self.offline = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(16);

    #[test]
    fn test_produces_frames_with_configured_geometry() {
        let mut source = SyntheticSource::new(SyntheticConfig::default());
        let frame = source.acquire(TIMEOUT).unwrap().unwrap();
        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.data().len(), 640 * 480 * 4);
    }

    #[test]
    fn test_square_rendered_at_reported_origin() {
        let config = SyntheticConfig::default();
        let mut source = SyntheticSource::new(config.clone());
        let origin = source.square_origin(0);
        let frame = source.acquire(TIMEOUT).unwrap().unwrap();

        let inside = frame.pixel(origin.0 + 1, origin.1 + 1);
        assert_eq!(inside[0], config.foreground);
        let corner = frame.pixel(0, 0);
        assert_eq!(corner[0], config.background);
    }

    #[test]
    fn test_square_moves_between_frames() {
        let source = SyntheticSource::new(SyntheticConfig::default());
        let a = source.square_origin(0);
        let b = source.square_origin(100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fault_injection_sequence() {
        let mut source = SyntheticSource::new(SyntheticConfig::default());
        source.push_fault(SyntheticFault::Empty);
        source.push_fault(SyntheticFault::Transient);

        assert!(source.acquire(TIMEOUT).unwrap().is_none());
        assert!(matches!(
            source.acquire(TIMEOUT),
            Err(CaptureError::Transient(_))
        ));
        assert!(source.acquire(TIMEOUT).unwrap().is_some());
    }

    #[test]
    fn test_lost_requires_reinitialize() {
        let mut source = SyntheticSource::new(SyntheticConfig::default());
        source.push_fault(SyntheticFault::Lost);

        assert!(matches!(source.acquire(TIMEOUT), Err(CaptureError::Lost(_))));
        // 未重建前保持离线
        assert!(matches!(source.acquire(TIMEOUT), Err(CaptureError::Lost(_))));

        source.reinitialize().unwrap();
        assert!(source.acquire(TIMEOUT).unwrap().is_some());
    }

    #[test]
    fn test_reinit_failure_countdown() {
        let mut source = SyntheticSource::new(SyntheticConfig::default());
        source.push_fault(SyntheticFault::Lost);
        source.fail_next_reinits(1);

        let _ = source.acquire(TIMEOUT);
        assert!(source.reinitialize().is_err());
        assert!(source.reinitialize().is_ok());
        assert!(source.acquire(TIMEOUT).unwrap().is_some());
    }
}
