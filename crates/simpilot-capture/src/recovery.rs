//! 帧源故障恢复包装
//!
//! 把 `Lost` 吸收在组件边界内：同步重建、失败则下周期再试、无限容忍。
//! 上层控制回路看到的只有"有帧"和"本周期无帧"两种结果，
//! 采集故障永远不会让回路终止。

use crate::{CaptureError, Frame, FrameSource};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 自动恢复的帧源包装
///
/// - `Ok(Some)` / `Ok(None)` 原样透传
/// - `Transient`: 降级为 `Ok(None)`，debug 记录
/// - `Lost`: 立即同步重建；重建失败则记录并在下一周期重试，
///   本周期返回 `Ok(None)`
///
/// 包装后 `acquire` 不再返回 `Lost`，其余错误（如 `Init` 之外的
/// 构造性错误）原样向上传播。
pub struct RecoveringSource<S> {
    inner: S,
    /// 上次重建失败，下次 acquire 前需要先补一次重建
    pending_reinit: bool,
    consecutive_losses: u64,
    reinit_count: u64,
}

impl<S: FrameSource> RecoveringSource<S> {
    pub fn new(inner: S) -> Self {
        RecoveringSource {
            inner,
            pending_reinit: false,
            consecutive_losses: 0,
            reinit_count: 0,
        }
    }

    /// 自上次成功取帧以来连续 `Lost` 的次数
    pub fn consecutive_losses(&self) -> u64 {
        self.consecutive_losses
    }

    /// 累计重建成功次数
    pub fn reinit_count(&self) -> u64 {
        self.reinit_count
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn try_reinitialize(&mut self) {
        match self.inner.reinitialize() {
            Ok(()) => {
                self.pending_reinit = false;
                self.reinit_count += 1;
                info!("Frame source reinitialized (total: {})", self.reinit_count);
            },
            Err(e) => {
                // 不升级：留到下一周期继续重试
                self.pending_reinit = true;
                warn!("Frame source reinitialization failed, will retry: {e}");
            },
        }
    }
}

impl<S: FrameSource> FrameSource for RecoveringSource<S> {
    fn acquire(&mut self, timeout: Duration) -> Result<Option<Frame>, CaptureError> {
        if self.pending_reinit {
            self.try_reinitialize();
            if self.pending_reinit {
                return Ok(None);
            }
        }

        match self.inner.acquire(timeout) {
            Ok(Some(frame)) => {
                self.consecutive_losses = 0;
                Ok(Some(frame))
            },
            Ok(None) => Ok(None),
            Err(CaptureError::Transient(msg)) => {
                debug!("Transient capture failure ignored: {msg}");
                Ok(None)
            },
            Err(CaptureError::Lost(msg)) => {
                self.consecutive_losses += 1;
                warn!(
                    "Capture source lost ({} consecutive): {msg}",
                    self.consecutive_losses
                );
                self.try_reinitialize();
                Ok(None)
            },
            Err(other) => Err(other),
        }
    }

    fn reinitialize(&mut self) -> Result<(), CaptureError> {
        let result = self.inner.reinitialize();
        if result.is_ok() {
            self.pending_reinit = false;
            self.reinit_count += 1;
        }
        result
    }
}
