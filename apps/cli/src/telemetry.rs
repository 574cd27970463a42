//! 姿态遥测接收
//!
//! 非阻塞 UDP 收取 20 字节姿态包，解码后只进 debug 日志；
//! 遥测是纯信息性的，不进入控制回路。

use anyhow::Result;
use simpilot_protocol::PosePacket;
use std::io::ErrorKind;
use std::net::UdpSocket;
use tracing::{debug, warn};

/// 姿态遥测接收端
pub struct PoseReceiver {
    socket: UdpSocket,
    buf: [u8; 64],
}

impl PoseReceiver {
    /// 绑定监听地址并切换到非阻塞模式
    pub fn bind(addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        Ok(PoseReceiver {
            socket,
            buf: [0u8; 64],
        })
    }

    /// 排空当前可读的遥测包（每控制周期调用一次）
    pub fn poll_and_log(&mut self) {
        loop {
            match self.socket.recv(&mut self.buf) {
                Ok(len) => match PosePacket::parse(&self.buf[..len]) {
                    Ok(packet) => match packet.attitude() {
                        Ok(attitude) => debug!(
                            "pose t={:.3}s roll={:.1} pitch={:.1} yaw={:.1} (deg)",
                            packet.timestamp,
                            attitude.roll.to_degrees(),
                            attitude.pitch.to_degrees(),
                            attitude.yaw.to_degrees(),
                        ),
                        Err(e) => warn!("Pose packet with bad quaternion: {e}"),
                    },
                    Err(e) => warn!("Malformed pose packet: {e}"),
                },
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!("Telemetry socket error: {e}");
                    break;
                },
            }
        }
    }
}
