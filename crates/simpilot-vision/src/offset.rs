//! 跟踪误差向量估计
//!
//! 纯函数式计算：`dx = 盒中心x − 帧中心x`，`dy = 盒中心y − 帧中心y`。
//! `valid` 只在本周期跟踪更新成功时为真；失效周期重发上一次的
//! dx/dy 并置 `valid=false`；消费方必须检查标志位，不能把失效值
//! 当成零。

use crate::bbox::BoundingBox;
use simpilot_capture::Frame;

/// 像素空间跟踪误差
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingOffset {
    pub dx: i32,
    pub dy: i32,
    /// 仅在产出它的周期内有效，不跨周期延续
    pub valid: bool,
}

/// 误差估计器
///
/// 唯一的跨周期状态是上一次的 dx/dy，用于失效周期的诊断显示。
#[derive(Debug, Default)]
pub struct OffsetEstimator {
    last_dx: i32,
    last_dy: i32,
}

impl OffsetEstimator {
    pub fn new() -> Self {
        OffsetEstimator::default()
    }

    /// 本周期更新成功：计算新误差
    pub fn estimate(&mut self, bbox: &BoundingBox, frame: &Frame) -> TrackingOffset {
        let (bx, by) = bbox.center();
        let (fx, fy) = frame.center();
        self.last_dx = bx - fx;
        self.last_dy = by - fy;
        TrackingOffset {
            dx: self.last_dx,
            dy: self.last_dy,
            valid: true,
        }
    }

    /// 本周期无成功更新：重发上一次误差，标记失效
    pub fn invalidate(&mut self) -> TrackingOffset {
        TrackingOffset {
            dx: self.last_dx,
            dy: self.last_dy,
            valid: false,
        }
    }
}
