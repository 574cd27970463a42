//! # Simpilot CLI
//!
//! 辅助控制循环的命令行前端。
//!
//! ```bash
//! # 写出默认配置
//! simpilot-cli config init
//!
//! # 用软件合成帧源跑循环（无硬件演示）
//! simpilot-cli run --synthetic
//!
//! # 运行中通过标准输入下发操作者指令：
//! #   m          切换模式（手动 ⇄ 辅助）
//! #   x kp 5     水平轴 Kp 增加 5
//! #   y ki -0.01 垂直轴 Ki 减少 0.01
//! #   q          退出
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod console;
mod run;
mod telemetry;

use simpilot_control::ControlConfig;

/// Simpilot CLI - 飞行模拟辅助控制
#[derive(Parser, Debug)]
#[command(name = "simpilot-cli")]
#[command(about = "Assisted-control loop for a remote-control flight simulation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 运行控制循环
    Run {
        /// 配置文件路径（缺省用内置默认值）
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// 使用软件合成帧源与中立输入（无硬件演示）
        #[arg(long)]
        synthetic: bool,

        /// 运行指定周期数后退出（缺省一直运行到退出指令）
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// 打印生效配置
    Show {
        /// 配置文件路径（缺省打印内置默认值）
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// 写出默认配置文件
    Init {
        /// 输出路径
        #[arg(default_value = "simpilot.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            synthetic,
            cycles,
        } => run::execute(config, synthetic, cycles),

        Commands::Config(ConfigCommand::Show { config }) => {
            let config = run::load_config(config)?;
            println!("{}", config.to_toml_string()?);
            Ok(())
        },

        Commands::Config(ConfigCommand::Init { path }) => {
            if path.exists() {
                anyhow::bail!("refusing to overwrite existing {}", path.display());
            }
            std::fs::write(&path, ControlConfig::default().to_toml_string()?)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        },
    }
}
