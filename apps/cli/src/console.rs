//! 标准输入操作者控制台
//!
//! 专用输入线程逐行读取标准输入，解析为操作者指令投递到指令
//! 通道；控制循环每周期排空一次，输入处理与循环节奏完全解耦。

use crossbeam_channel::Sender;
use simpilot_control::{AssistAxis, GainKind, OperatorCommand};
use std::io::BufRead;
use std::thread;
use tracing::warn;

/// 启动标准输入读取线程
pub fn spawn(tx: Sender<OperatorCommand>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(line.trim()) {
                Some(commands) => {
                    for command in commands {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                },
                None => {
                    if !line.trim().is_empty() {
                        warn!(
                            "Unrecognized command {:?}; expected 'm', 'q' or '<x|y> <kp|ki|kd> <delta>'",
                            line.trim()
                        );
                    }
                },
            }
        }
    });
}

/// 解析一行控制台输入
///
/// - `m` / `mode`: 模式切换（发送一对高/低电平，边沿检测在循环内）
/// - `q` / `quit`: 退出
/// - `<x|y> <kp|ki|kd> <delta>`: 在线调参
fn parse_line(line: &str) -> Option<Vec<OperatorCommand>> {
    match line {
        "m" | "mode" => {
            return Some(vec![
                OperatorCommand::ModeSwitch(true),
                OperatorCommand::ModeSwitch(false),
            ]);
        },
        "q" | "quit" => return Some(vec![OperatorCommand::Quit]),
        _ => {},
    }

    let mut tokens = line.split_whitespace();
    let axis = match tokens.next()? {
        "x" => AssistAxis::X,
        "y" => AssistAxis::Y,
        _ => return None,
    };
    let gain = match tokens.next()? {
        "kp" => GainKind::Kp,
        "ki" => GainKind::Ki,
        "kd" => GainKind::Kd,
        _ => return None,
    };
    let delta: f64 = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(vec![OperatorCommand::AdjustGain { axis, gain, delta }])
}
