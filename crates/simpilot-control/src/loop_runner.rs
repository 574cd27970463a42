//! 单线程控制循环
//!
//! 一次迭代 = 一个控制周期。周期内严格顺序执行，全部状态
//! （通道快照、调节器状态、跟踪状态、模式）由循环独占，只在
//! 周期内变更；调节器消费的通道快照与跟踪误差都产自同一周期。
//!
//! 运行期故障全部在组件边界吸收：采集丢失走恢复包装、跟踪失败
//! 只让本周期误差失效、输出端故障跳过本周期下发。循环唯一的
//! 退出条件是每周期检查一次的操作者退出指令。

use crate::ControlError;
use crate::blender::ControlBlender;
use crate::command::{AssistAxis, GainKind, OperatorCommand};
use crate::config::ControlConfig;
use crate::io::{ChannelSource, ReportSink};
use crate::mode::{EdgeTrigger, Mode};
use crate::regulator::AxisRegulator;
use crate::stats::CycleStats;
use crossbeam_channel::Receiver;
use simpilot_capture::{FrameSource, RecoveringSource};
use simpilot_protocol::{PadReport, RemoteChannels};
use simpilot_vision::{OffsetEstimator, TargetTracker, TrackState, Tracker, TrackingOffset};
use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 状态行打印间隔
const STATUS_INTERVAL: Duration = Duration::from_secs(2);

/// 循环结束摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,
    pub frames: u64,
    pub capture_reinits: u64,
}

/// 闭环控制循环
///
/// 泛型参数分别是物理通道源、报文输出端、帧源后端和跟踪算法；
/// 装配由调用方完成，循环本身与后端形态无关。
pub struct ControlLoop<I, O, S, T> {
    channels: I,
    sink: O,
    source: RecoveringSource<S>,
    target: TargetTracker<T>,
    estimator: OffsetEstimator,
    regulator_x: AxisRegulator,
    regulator_y: AxisRegulator,
    blender: ControlBlender,
    mode: Mode,
    mode_edge: EdgeTrigger,
    commands: Receiver<OperatorCommand>,
    stats: CycleStats,
    capture_timeout: Duration,
    cycle_period: Duration,
    /// 最近一次物理通道快照（采样失败周期沿用）
    last_channels: RemoteChannels,
    last_offset: TrackingOffset,
    quit: bool,
}

impl<I, O, S, T> ControlLoop<I, O, S, T>
where
    I: ChannelSource,
    O: ReportSink,
    S: FrameSource,
    T: Tracker,
{
    /// 按配置装配循环
    pub fn new(
        channels: I,
        sink: O,
        source: S,
        tracker: T,
        config: &ControlConfig,
        commands: Receiver<OperatorCommand>,
    ) -> Self {
        ControlLoop {
            channels,
            sink,
            source: RecoveringSource::new(source),
            target: TargetTracker::new(tracker, config.tracker.seed_size),
            estimator: OffsetEstimator::new(),
            regulator_x: AxisRegulator::new(config.axis_x),
            regulator_y: AxisRegulator::new(config.axis_y),
            blender: ControlBlender::new(config.blend),
            mode: Mode::Manual,
            mode_edge: EdgeTrigger::new(),
            commands,
            stats: CycleStats::new(),
            capture_timeout: config.cycle.capture_timeout(),
            cycle_period: Duration::from_secs_f64(1.0 / config.cycle.rate_hz),
            last_channels: RemoteChannels::default(),
            last_offset: TrackingOffset::default(),
            quit: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn track_state(&self) -> TrackState {
        self.target.state()
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn source(&self) -> &RecoveringSource<S> {
        &self.source
    }

    pub fn regulator(&self, axis: AssistAxis) -> &AxisRegulator {
        match axis {
            AssistAxis::X => &self.regulator_x,
            AssistAxis::Y => &self.regulator_y,
        }
    }

    /// 最近一个周期的跟踪误差
    pub fn last_offset(&self) -> TrackingOffset {
        self.last_offset
    }

    /// 阻塞运行直到退出指令（或达到 `max_cycles`）
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<LoopSummary, ControlError> {
        self.run_with_hook(max_cycles, || ())
    }

    /// 同 [`run`](Self::run)，每个周期末尾额外调用一次钩子
    ///
    /// 钩子用于挂接周期性的旁路工作（如遥测接收），必须快进快出，
    /// 不得阻塞。
    pub fn run_with_hook(
        &mut self,
        max_cycles: Option<u64>,
        mut on_cycle: impl FnMut(),
    ) -> Result<LoopSummary, ControlError> {
        let sleeper = SpinSleeper::default();
        info!(
            "Control loop started: period {:?}, capture timeout {:?}",
            self.cycle_period, self.capture_timeout
        );

        loop {
            let started = Instant::now();
            self.cycle();
            on_cycle();

            if self.quit {
                info!("Operator quit, control loop stopping");
                break;
            }
            if let Some(max) = max_cycles
                && self.stats.cycles() >= max
            {
                break;
            }

            // 取帧超时已经吃掉周期的大头，只补齐余量
            let elapsed = started.elapsed();
            if elapsed < self.cycle_period {
                sleeper.sleep(self.cycle_period - elapsed);
            }
        }

        Ok(LoopSummary {
            cycles: self.stats.cycles(),
            frames: self.stats.frames(),
            capture_reinits: self.source.reinit_count(),
        })
    }

    /// 执行一个控制周期
    ///
    /// 拆出来供测试逐周期推进；正常运行走 [`run`](Self::run)。
    pub fn cycle(&mut self) {
        // 1. 物理通道快照
        match self.channels.poll() {
            Ok(channels) => self.last_channels = channels,
            Err(e) => warn!("Channel poll failed, reusing last snapshot: {e}"),
        }

        // 2. 取帧（恢复包装已吸收 Transient/Lost）
        let frame = match self.source.acquire(self.capture_timeout) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Unexpected capture error, treating as no frame: {e}");
                None
            },
        };
        match &frame {
            Some(_) => self.stats.record_frame(),
            None => self.stats.record_empty(),
        }

        // 3. 跟踪推进（仅辅助模式且有新帧；无帧 = 无更新可做）
        let bbox = match (&frame, self.mode) {
            (Some(frame), Mode::Assisted) => self.target.advance(frame),
            _ => None,
        };

        // 4. 误差估计
        let offset = match (&bbox, &frame) {
            (Some(bbox), Some(frame)) => {
                self.stats.record_track_hit();
                self.estimator.estimate(bbox, frame)
            },
            _ => {
                if self.mode == Mode::Assisted && frame.is_some() {
                    self.stats.record_track_miss();
                }
                self.estimator.invalidate()
            },
        };
        self.last_offset = offset;

        // 5. 调节（失效误差触发复位并退中立出力）
        let (effort_x, effort_y) = if self.mode == Mode::Assisted {
            (
                self.regulator_x
                    .regulate(offset.valid.then_some(f64::from(offset.dx))),
                self.regulator_y
                    .regulate(offset.valid.then_some(f64::from(offset.dy))),
            )
        } else {
            // 手动模式下持续复位，离开辅助模式的清零规则由此兜底
            (self.regulator_x.regulate(None), self.regulator_y.regulate(None))
        };

        // 6. 混控 + 编码 + 下发（输出端故障只跳过本周期）
        let blended = self.blender.blend(self.mode, &self.last_channels, effort_x, effort_y);
        let report = PadReport::from_channels(&blended);
        if let Err(e) = self.sink.submit(&report) {
            self.stats.record_sink_error();
            warn!("Output sink unavailable, skipping this cycle: {e}");
        }

        // 7. 诊断
        self.stats.record_cycle();
        if let Some(rate) = self.stats.sample_rate(STATUS_INTERVAL) {
            info!(
                "mode={} track={:?} offset=({}, {}) valid={} rate={rate:.1}Hz frames={} reinits={}",
                self.mode,
                self.target.state(),
                offset.dx,
                offset.dy,
                offset.valid,
                self.stats.frames(),
                self.source.reinit_count(),
            );
        }

        // 8. 操作者指令（每周期排空一次）
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command);
        }
    }

    fn apply_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::ModeSwitch(level) => {
                if self.mode_edge.sample(level) {
                    self.toggle_mode();
                }
            },
            OperatorCommand::AdjustGain { axis, gain, delta } => {
                let regulator = match axis {
                    AssistAxis::X => &mut self.regulator_x,
                    AssistAxis::Y => &mut self.regulator_y,
                };
                let mut gains = regulator.gains();
                match gain {
                    GainKind::Kp => gains.kp += delta,
                    GainKind::Ki => gains.ki += delta,
                    GainKind::Kd => gains.kd += delta,
                }
                // set_gains 连带复位，避免旧积分被新增益放大
                regulator.set_gains(gains);
                info!(
                    "Gains adjusted ({axis:?}): kp={} ki={} kd={}",
                    gains.kp, gains.ki, gains.kd
                );
            },
            OperatorCommand::Quit => {
                self.quit = true;
            },
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        info!("Mode switched to {}", self.mode);
        if self.mode == Mode::Manual {
            // 离开辅助模式：释放跟踪模型，清零调节器状态
            self.target.deactivate();
            self.regulator_x.reset();
            self.regulator_y.reset();
        }
    }
}
