//! # Simpilot Capture
//!
//! 屏幕帧采集抽象层，提供统一的帧源接口。
//!
//! ## 采集契约
//!
//! `FrameSource::acquire` 每个控制周期调用一次，带有界超时：
//!
//! - `Ok(Some(frame))`: 拿到新帧，帧归当前周期独占所有
//! - `Ok(None)`: 超时无新帧（Empty），**不是错误**，下游状态不受影响
//! - `Err(Transient)`: 瞬时故障，本周期忽略，下周期重试
//! - `Err(Lost)`: 采集资源失效，必须在下一次 acquire 前同步重建
//!
//! 控制回路不直接消费 `Lost`：[`RecoveringSource`] 在组件边界内吸收它，
//! 无限次重试重建，绝不向上升级为回路终止。
//!
//! ## 帧所有权
//!
//! [`Frame`] 是独占所有的像素缓冲，每周期整体替换而非原地改写；
//! 回路最多持有一份（单槽），上一帧在替换时随 Drop 释放。

pub mod recovery;
pub mod synthetic;

pub use recovery::RecoveringSource;
pub use synthetic::{SyntheticConfig, SyntheticFault, SyntheticSource};

use std::time::{Duration, Instant};
use thiserror::Error;

/// 每像素字节数（BGRA）
pub const BYTES_PER_PIXEL: usize = 4;

/// 采集层错误类型
#[derive(Error, Debug)]
pub enum CaptureError {
    /// 瞬时故障：本周期忽略，下周期重试
    #[error("Transient capture failure: {0}")]
    Transient(String),

    /// 采集资源失效：必须重建后才能继续 acquire
    #[error("Capture source lost: {0}")]
    Lost(String),

    /// 初始化/重建失败
    #[error("Capture initialization failed: {0}")]
    Init(String),

    #[error("Frame buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferMismatch { expected: usize, actual: usize },
}

/// 带时间戳的帧缓冲
///
/// 像素格式固定为 4 通道 BGRA，行优先，无行间填充。
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
    timestamp: Instant,
}

impl Frame {
    /// 从已填充的像素缓冲构造帧
    ///
    /// # 错误
    ///
    /// - `CaptureError::BufferMismatch`: 缓冲长度与 `width * height * 4` 不符
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp: Instant,
    ) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(CaptureError::BufferMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Frame {
            width,
            height,
            data,
            timestamp,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// 帧几何中心（整数像素，偶数尺寸时恰为 size/2）
    pub fn center(&self) -> (i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// 原始像素缓冲（BGRA，行优先）
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 读取单个像素的 BGRA 分量
    ///
    /// 越界坐标是调用方 bug，直接 panic（与切片索引一致）。
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}

/// 帧源抽象
///
/// 具体后端（桌面复制、采集卡、软件合成）实现此 trait；
/// 消费方只依赖契约，不关心后端形态。
pub trait FrameSource {
    /// 在有界超时内尝试取下一帧
    fn acquire(&mut self, timeout: Duration) -> Result<Option<Frame>, CaptureError>;

    /// 废弃并重建底层采集资源
    ///
    /// 在 `acquire` 返回 [`CaptureError::Lost`] 后必须先调用本方法。
    fn reinitialize(&mut self) -> Result<(), CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_new_validates_buffer() {
        let err = Frame::new(4, 4, vec![0u8; 10], Instant::now()).unwrap_err();
        match err {
            CaptureError::BufferMismatch { expected, actual } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 10);
            },
            other => panic!("Expected BufferMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_frame_center_even_dimensions() {
        let frame = Frame::new(640, 480, vec![0u8; 640 * 480 * 4], Instant::now()).unwrap();
        assert_eq!(frame.center(), (320, 240));
    }

    #[test]
    fn test_frame_pixel_access() {
        let mut data = vec![0u8; 2 * 2 * 4];
        data[4..8].copy_from_slice(&[10, 20, 30, 255]); // (1, 0)
        let frame = Frame::new(2, 2, data, Instant::now()).unwrap();
        assert_eq!(frame.pixel(1, 0), [10, 20, 30, 255]);
        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 0]);
    }
}
