//! 跟踪器能力接口
//!
//! 状态机（`target` 模块）只依赖这组能力，不关心具体算法；
//! 初始实现为模板跟踪（`template` 模块），后续可替换为判别式或
//! 深度模型而不动生命周期逻辑。

use crate::bbox::BoundingBox;
use simpilot_capture::Frame;
use thiserror::Error;

/// 跟踪器错误类型
#[derive(Error, Debug)]
pub enum TrackerError {
    /// 种子区越出帧边界
    #[error("Seed region ({x}, {y}) {width}x{height} out of frame bounds {frame_width}x{frame_height}")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    /// 模型拒绝种子区（如纹理不足，无法建立可判别的模板）
    #[error("Seed region rejected by the model: {0}")]
    SeedRejected(String),

    /// 像素格式不受支持
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// 未初始化就调用 update
    #[error("Tracker has no model; call init first")]
    NotInitialized,

    /// 单周期更新失败（模型保留，可继续尝试）
    #[error("Update failed: best score {score:.3} below threshold {threshold:.3}")]
    UpdateFailed { score: f64, threshold: f64 },
}

impl TrackerError {
    /// 是否属于初始化类失败（区别于单周期 update 失败）
    pub fn is_init_error(&self) -> bool {
        matches!(
            self,
            TrackerError::SeedOutOfBounds { .. }
                | TrackerError::SeedRejected(_)
                | TrackerError::UnsupportedFormat(_)
        )
    }
}

/// 单目标跟踪器能力接口
pub trait Tracker {
    /// 用种子区在帧上建立内部模型
    fn init(&mut self, frame: &Frame, seed: BoundingBox) -> Result<(), TrackerError>;

    /// 在新帧上推进模型，成功返回精化后的包围盒
    ///
    /// 失败**不得**丢弃内部模型：调用方依赖"下一次成功直接恢复"。
    fn update(&mut self, frame: &Frame) -> Result<BoundingBox, TrackerError>;

    /// 无条件释放内部模型与缓存的种子图块
    fn release(&mut self);

    /// 当前是否持有模型
    fn has_model(&self) -> bool;
}
