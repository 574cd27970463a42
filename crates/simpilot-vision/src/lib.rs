//! # Simpilot Vision
//!
//! 单目标视觉跟踪层。
//!
//! ## 模块
//!
//! - `bbox`: 像素空间包围盒
//! - `tracker`: 跟踪器能力接口（init/update/release）
//! - `template`: 具体实现（归一化互相关模板跟踪）
//! - `target`: 跟踪生命周期状态机 `Idle → Initializing → Tracking ⇄ Lost`
//! - `offset`: 包围盒中心相对帧中心的误差向量
//!
//! ## 生命周期
//!
//! 跟踪模型随模式切换创建与销毁：进入辅助模式且无模型时用帧中心的
//! 固定尺寸种子区初始化；任何回到手动模式的切换无条件释放模型。
//! 单周期 update 失败只进入 `Lost`，模型保留，下一次成功直接回到
//! `Tracking`，不自动重播种。

pub mod bbox;
pub mod offset;
pub mod target;
pub mod template;
pub mod tracker;

pub use bbox::BoundingBox;
pub use offset::{OffsetEstimator, TrackingOffset};
pub use target::{TargetTracker, TrackState};
pub use template::{TemplateTracker, TemplateTrackerConfig};
pub use tracker::{Tracker, TrackerError};
