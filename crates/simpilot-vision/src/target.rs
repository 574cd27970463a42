//! 跟踪生命周期状态机
//!
//! `Idle → Initializing → Tracking ⇄ Lost`，其中回到 `Idle` 只能由
//! 模式切换（Mode=Manual）触发。`Initializing` 是单周期内的瞬态：
//! 在第一个拿到帧的辅助周期里用帧中心的固定尺寸种子区播种。
//!
//! update 失败只把当前周期标记为 `Lost`，模型保留；下一次成功的
//! update 直接回到 `Tracking`，不自动重播种。

use crate::bbox::BoundingBox;
use crate::tracker::{Tracker, TrackerError};
use simpilot_capture::Frame;
use tracing::{debug, info, warn};

/// 状态机当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// 无模型
    Idle,
    /// 持有模型且上一周期更新成功
    Tracking,
    /// 持有模型但上一周期更新失败
    Lost,
}

/// 目标跟踪状态机
///
/// 泛型参数 `T` 是具体跟踪算法；状态机只负责生命周期，
/// 不触碰算法内部。
pub struct TargetTracker<T> {
    tracker: T,
    state: TrackState,
    /// 种子区边长（像素）
    seed_size: u32,
    /// 播种失败后置位；只有回到手动模式（deactivate）才清除，
    /// 使重试发生在"下一次进入辅助模式"而不是每一帧
    init_blocked: bool,
}

impl<T: Tracker> TargetTracker<T> {
    pub fn new(tracker: T, seed_size: u32) -> Self {
        TargetTracker {
            tracker,
            state: TrackState::Idle,
            seed_size,
            init_blocked: false,
        }
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    /// 回到手动模式：无条件释放模型与缓存种子，状态归 `Idle`
    pub fn deactivate(&mut self) {
        if self.state != TrackState::Idle || self.tracker.has_model() {
            info!("Target tracker deactivated, model released");
        }
        self.tracker.release();
        self.state = TrackState::Idle;
        self.init_blocked = false;
    }

    /// 辅助模式下推进一个有帧的周期
    ///
    /// 返回 `Some(bbox)` 当且仅当本周期 update（或既有模型的首次
    /// 恢复）成功；播种周期与失败周期返回 `None`。
    ///
    /// 没有帧的周期不要调用本方法："无帧"是"无更新可做"，
    /// 与更新失败是两回事，状态必须保持不变。
    pub fn advance(&mut self, frame: &Frame) -> Option<BoundingBox> {
        match self.state {
            TrackState::Idle => {
                if self.init_blocked {
                    return None;
                }
                self.try_seed(frame);
                None
            },
            TrackState::Tracking | TrackState::Lost => match self.tracker.update(frame) {
                Ok(bbox) => {
                    if self.state == TrackState::Lost {
                        debug!("Target reacquired at ({}, {})", bbox.x, bbox.y);
                    }
                    self.state = TrackState::Tracking;
                    Some(bbox)
                },
                Err(e) => {
                    if self.state == TrackState::Tracking {
                        debug!("Target lost this cycle: {e}");
                    }
                    self.state = TrackState::Lost;
                    None
                },
            },
        }
    }

    fn try_seed(&mut self, frame: &Frame) {
        let seed = match BoundingBox::centered_in(frame, self.seed_size, self.seed_size) {
            Some(seed) => seed,
            None => {
                warn!(
                    "Seed region {}x{} does not fit in {}x{} frame; staying idle",
                    self.seed_size,
                    self.seed_size,
                    frame.width(),
                    frame.height()
                );
                self.init_blocked = true;
                return;
            },
        };

        match self.tracker.init(frame, seed) {
            Ok(()) => {
                info!(
                    "Target tracker seeded at ({}, {}) {}x{}",
                    seed.x, seed.y, seed.width, seed.height
                );
                self.state = TrackState::Tracking;
            },
            Err(e) => {
                warn!("Target tracker seeding failed: {e}");
                self.init_blocked = true;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpilot_capture::Frame;
    use std::time::Instant;

    /// 按脚本返回结果的跟踪器桩
    struct StubTracker {
        init_results: Vec<Result<(), ()>>,
        update_results: Vec<Result<(u32, u32), ()>>,
        model: bool,
        init_calls: usize,
        update_calls: usize,
        release_calls: usize,
    }

    impl StubTracker {
        fn new(
            init_results: Vec<Result<(), ()>>,
            update_results: Vec<Result<(u32, u32), ()>>,
        ) -> Self {
            StubTracker {
                init_results,
                update_results,
                model: false,
                init_calls: 0,
                update_calls: 0,
                release_calls: 0,
            }
        }
    }

    impl Tracker for StubTracker {
        fn init(&mut self, _frame: &Frame, _seed: BoundingBox) -> Result<(), TrackerError> {
            let result = self.init_results[self.init_calls];
            self.init_calls += 1;
            match result {
                Ok(()) => {
                    self.model = true;
                    Ok(())
                },
                Err(()) => Err(TrackerError::SeedRejected("scripted".into())),
            }
        }

        fn update(&mut self, _frame: &Frame) -> Result<BoundingBox, TrackerError> {
            assert!(self.model, "update called without model");
            let result = self.update_results[self.update_calls];
            self.update_calls += 1;
            match result {
                Ok((x, y)) => Ok(BoundingBox::new(x, y, 10, 10)),
                Err(()) => Err(TrackerError::UpdateFailed {
                    score: 0.0,
                    threshold: 0.5,
                }),
            }
        }

        fn release(&mut self) {
            self.model = false;
            self.release_calls += 1;
        }

        fn has_model(&self) -> bool {
            self.model
        }
    }

    fn frame() -> Frame {
        Frame::new(64, 64, vec![0u8; 64 * 64 * 4], Instant::now()).unwrap()
    }

    #[test]
    fn test_idle_to_tracking_requires_successful_seed() {
        let stub = StubTracker::new(vec![Ok(())], vec![Ok((10, 10))]);
        let mut target = TargetTracker::new(stub, 32);
        assert_eq!(target.state(), TrackState::Idle);

        // 播种周期：进入 Tracking 但不产出包围盒
        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.state(), TrackState::Tracking);

        // 下一周期 update 产出包围盒
        assert!(target.advance(&frame()).is_some());
    }

    #[test]
    fn test_seed_failure_stays_idle_until_reentry() {
        let stub = StubTracker::new(vec![Err(()), Ok(())], vec![]);
        let mut target = TargetTracker::new(stub, 32);

        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.state(), TrackState::Idle);

        // 同一辅助会话内不重试播种
        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.tracker.init_calls, 1);

        // 回手动再进辅助：重试播种
        target.deactivate();
        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.tracker.init_calls, 2);
        assert_eq!(target.state(), TrackState::Tracking);
    }

    #[test]
    fn test_oversized_seed_blocks_without_touching_model() {
        let stub = StubTracker::new(vec![], vec![]);
        let mut target = TargetTracker::new(stub, 128); // 帧只有 64x64

        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.state(), TrackState::Idle);
        assert_eq!(target.tracker.init_calls, 0);
    }

    #[test]
    fn test_update_failure_goes_lost_and_recovers_directly() {
        let stub = StubTracker::new(
            vec![Ok(())],
            vec![Ok((10, 10)), Err(()), Err(()), Ok((12, 10))],
        );
        let mut target = TargetTracker::new(stub, 32);

        target.advance(&frame()); // 播种
        assert!(target.advance(&frame()).is_some());
        assert_eq!(target.state(), TrackState::Tracking);

        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.state(), TrackState::Lost);
        assert!(target.tracker.has_model(), "model must survive a lost cycle");

        assert!(target.advance(&frame()).is_none());
        assert_eq!(target.state(), TrackState::Lost);

        // 不重播种，直接恢复
        assert!(target.advance(&frame()).is_some());
        assert_eq!(target.state(), TrackState::Tracking);
        assert_eq!(target.tracker.init_calls, 1);
    }

    #[test]
    fn test_deactivate_releases_model_unconditionally() {
        let stub = StubTracker::new(vec![Ok(())], vec![Ok((10, 10))]);
        let mut target = TargetTracker::new(stub, 32);

        target.advance(&frame());
        target.advance(&frame());
        assert!(target.tracker.has_model());

        target.deactivate();
        assert_eq!(target.state(), TrackState::Idle);
        assert!(!target.tracker.has_model());
        assert_eq!(target.tracker.release_calls, 1);
    }
}
