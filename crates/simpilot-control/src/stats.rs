//! 周期诊断统计
//!
//! 循环单线程独占，普通计数即可；供周期状态行与诊断显示读取，
//! 不参与控制。

use std::time::{Duration, Instant};

/// 周期统计
#[derive(Debug)]
pub struct CycleStats {
    cycles: u64,
    frames: u64,
    empty_cycles: u64,
    track_hits: u64,
    track_misses: u64,
    sink_errors: u64,
    window_start: Instant,
    window_cycles: u64,
}

impl CycleStats {
    pub fn new() -> Self {
        CycleStats {
            cycles: 0,
            frames: 0,
            empty_cycles: 0,
            track_hits: 0,
            track_misses: 0,
            sink_errors: 0,
            window_start: Instant::now(),
            window_cycles: 0,
        }
    }

    pub fn record_cycle(&mut self) {
        self.cycles += 1;
        self.window_cycles += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    pub fn record_empty(&mut self) {
        self.empty_cycles += 1;
    }

    pub fn record_track_hit(&mut self) {
        self.track_hits += 1;
    }

    pub fn record_track_miss(&mut self) {
        self.track_misses += 1;
    }

    pub fn record_sink_error(&mut self) {
        self.sink_errors += 1;
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn empty_cycles(&self) -> u64 {
        self.empty_cycles
    }

    pub fn track_hits(&self) -> u64 {
        self.track_hits
    }

    pub fn track_misses(&self) -> u64 {
        self.track_misses
    }

    pub fn sink_errors(&self) -> u64 {
        self.sink_errors
    }

    /// 采样统计窗口的循环频率（Hz）
    ///
    /// 窗口未满 `min_window` 时返回 `None`；采样后窗口重新开始。
    pub fn sample_rate(&mut self, min_window: Duration) -> Option<f64> {
        let elapsed = self.window_start.elapsed();
        if elapsed < min_window {
            return None;
        }
        let rate = self.window_cycles as f64 / elapsed.as_secs_f64().max(0.001);
        self.window_cycles = 0;
        self.window_start = Instant::now();
        Some(rate)
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}
