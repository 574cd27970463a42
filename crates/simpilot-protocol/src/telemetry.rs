//! 姿态遥测包解析
//!
//! 仿真器可选地通过网络推送机体姿态：固定 20 字节小端包，
//! 依次为 f32 时间戳和 f32 四元数分量 x、y、z、w。
//!
//! 遥测只用于诊断显示，**不**进入控制回路。

use crate::ProtocolError;
use nalgebra::{Quaternion, UnitQuaternion};

/// 姿态遥测包长度（字节）
pub const POSE_PACKET_LEN: usize = 20;

/// 姿态遥测包
///
/// 字段保持线上格式原样（发送端四元数约定为 x, y, z, w）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePacket {
    /// 发送端时间戳（秒，发送端时钟域）
    pub timestamp: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

/// 欧拉角姿态（弧度）
///
/// 旋转顺序为 roll (x) → pitch (y) → yaw (z)，与
/// `nalgebra::UnitQuaternion::euler_angles` 的约定一致。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl PosePacket {
    /// 解析 20 字节小端包
    ///
    /// # 错误
    ///
    /// - `ProtocolError::InvalidLength`: 输入长度不等于 20
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() != POSE_PACKET_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: POSE_PACKET_LEN,
                actual: data.len(),
            });
        }

        let read_f32 = |offset: usize| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&data[offset..offset + 4]);
            f32::from_le_bytes(bytes)
        };

        Ok(PosePacket {
            timestamp: read_f32(0),
            qx: read_f32(4),
            qy: read_f32(8),
            qz: read_f32(12),
            qw: read_f32(16),
        })
    }

    /// 四元数转欧拉角
    ///
    /// # 错误
    ///
    /// - `ProtocolError::InvalidQuaternion`: 四元数范数为零或含非有限分量
    pub fn attitude(&self) -> Result<Attitude, ProtocolError> {
        let quat = Quaternion::new(
            self.qw as f64,
            self.qx as f64,
            self.qy as f64,
            self.qz as f64,
        );

        let norm = quat.norm();
        if !norm.is_finite() || norm < 1e-9 {
            return Err(ProtocolError::InvalidQuaternion);
        }

        let (roll, pitch, yaw) = UnitQuaternion::from_quaternion(quat).euler_angles();
        Ok(Attitude { roll, pitch, yaw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn packet_bytes(timestamp: f32, q: [f32; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity(POSE_PACKET_LEN);
        data.extend_from_slice(&timestamp.to_le_bytes());
        for component in q {
            data.extend_from_slice(&component.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_parse_identity() {
        let data = packet_bytes(1.5, [0.0, 0.0, 0.0, 1.0]);
        let packet = PosePacket::parse(&data).unwrap();

        assert_eq!(packet.timestamp, 1.5);
        assert_eq!(packet.qw, 1.0);

        let attitude = packet.attitude().unwrap();
        assert!(attitude.roll.abs() < 1e-9);
        assert!(attitude.pitch.abs() < 1e-9);
        assert!(attitude.yaw.abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_short_packet() {
        let err = PosePacket::parse(&[0u8; 12]).unwrap_err();
        match err {
            ProtocolError::InvalidLength { expected, actual } => {
                assert_eq!(expected, POSE_PACKET_LEN);
                assert_eq!(actual, 12);
            },
            other => panic!("Expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn test_attitude_yaw_90_degrees() {
        // 绕 z 轴 90°：q = (0, 0, sin45°, cos45°)
        let half = std::f32::consts::FRAC_PI_4;
        let data = packet_bytes(0.0, [0.0, 0.0, half.sin(), half.cos()]);
        let attitude = PosePacket::parse(&data).unwrap().attitude().unwrap();

        assert!((attitude.yaw - FRAC_PI_2).abs() < 1e-6);
        assert!(attitude.roll.abs() < 1e-6);
        assert!(attitude.pitch.abs() < 1e-6);
    }

    #[test]
    fn test_attitude_unnormalized_quaternion_accepted() {
        // 发送端不保证单位范数，解析侧归一化
        let data = packet_bytes(0.0, [0.0, 0.0, 0.0, 2.0]);
        let attitude = PosePacket::parse(&data).unwrap().attitude().unwrap();
        assert!(attitude.yaw.abs() < 1e-9);
    }

    #[test]
    fn test_attitude_zero_quaternion_rejected() {
        let data = packet_bytes(0.0, [0.0, 0.0, 0.0, 0.0]);
        let err = PosePacket::parse(&data).unwrap().attitude().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidQuaternion));
    }
}
