//! 控制循环装配与运行
//!
//! 启动按固定顺序申请资源（指令通道 → 输入/输出协作方 → 帧源 →
//! 遥测），任何必需资源不可用都立即失败并以非零码退出；关闭按
//! 相反顺序随 Drop 释放。操作者正常退出返回成功码。

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::info;

use simpilot_capture::{SyntheticConfig, SyntheticSource};
use simpilot_control::{
    ControlConfig, ControlLoop, NeutralChannels, OperatorCommand, TracingSink, command_channel,
};
use simpilot_vision::{TemplateTracker, TemplateTrackerConfig};

use crate::console;
use crate::telemetry::PoseReceiver;

/// 加载配置：给定路径则读文件，否则用内置默认
pub fn load_config(path: Option<PathBuf>) -> Result<ControlConfig> {
    match path {
        Some(path) => ControlConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ControlConfig::default()),
    }
}

pub fn execute(config: Option<PathBuf>, synthetic: bool, cycles: Option<u64>) -> Result<()> {
    let config = load_config(config)?;

    if !synthetic {
        // 物理 HID 轮询 / 虚拟总线 / 桌面复制属于平台协作方，
        // 本构建未接线；见 DESIGN.md
        bail!(
            "no native capture/input backend is wired in this build; \
             run with --synthetic for the software demo"
        );
    }

    // 1. 操作者指令通道（Ctrl-C 与标准输入共用）
    let (command_tx, command_rx) = command_channel();
    let ctrlc_tx = command_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(OperatorCommand::Quit);
    })
    .context("failed to install Ctrl-C handler")?;
    console::spawn(command_tx);

    // 2. 协作方：中立输入 + 日志输出端
    let channels = NeutralChannels;
    let sink = TracingSink;

    // 3. 帧源与跟踪器
    let source = SyntheticSource::new(SyntheticConfig::default());
    let tracker = TemplateTracker::new(TemplateTrackerConfig {
        search_radius: config.tracker.search_radius,
        score_threshold: config.tracker.score_threshold,
    });

    // 4. 遥测接收（可选）
    let mut pose_receiver = match &config.telemetry.bind {
        Some(bind) => Some(
            PoseReceiver::bind(bind)
                .with_context(|| format!("failed to bind telemetry socket on {bind}"))?,
        ),
        None => None,
    };

    let mut control_loop =
        ControlLoop::new(channels, sink, source, tracker, &config, command_rx);

    info!("Starting control loop (synthetic backend); type 'm' to toggle mode, 'q' to quit");
    let summary = control_loop.run_with_hook(cycles, || {
        if let Some(receiver) = pose_receiver.as_mut() {
            receiver.poll_and_log();
        }
    })?;

    println!(
        "Loop finished: {} cycles, {} frames, {} capture reinits",
        summary.cycles, summary.frames, summary.capture_reinits
    );
    Ok(())
}
