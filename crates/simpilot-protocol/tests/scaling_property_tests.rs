//! 域变换函数的属性测试
//!
//! 使用 proptest 验证数学属性。

use proptest::prelude::*;
use simpilot_protocol::{scale_axis, scale_trigger};

proptest! {
    /// 摇杆轴变换的输出范围
    #[test]
    fn scale_axis_in_range(v in -1000i32..=1000) {
        let out = scale_axis(v);
        prop_assert!((-32767..=32767).contains(&i32::from(out)));
    }

    /// 摇杆轴变换的单调性
    #[test]
    fn scale_axis_monotonic(a in -1000i32..=1000, b in -1000i32..=1000) {
        if a <= b {
            prop_assert!(scale_axis(a) <= scale_axis(b));
        } else {
            prop_assert!(scale_axis(a) >= scale_axis(b));
        }
    }

    /// 摇杆轴变换的奇对称性
    #[test]
    fn scale_axis_odd_symmetric(v in -1000i32..=1000) {
        prop_assert_eq!(scale_axis(v), -scale_axis(-v));
    }

    /// 越界输入钳位到端点
    #[test]
    fn scale_axis_clamps(v in 1001i32..100_000) {
        prop_assert_eq!(scale_axis(v), 32767);
        prop_assert_eq!(scale_axis(-v), -32767);
    }

    /// 扳机变换的输出范围与单调性
    #[test]
    fn scale_trigger_in_range_and_monotonic(a in -1000i32..=1000, b in -1000i32..=1000) {
        if a <= b {
            prop_assert!(scale_trigger(a) <= scale_trigger(b));
        }
    }
}

#[test]
fn scale_axis_preserves_zero() {
    assert_eq!(scale_axis(0), 0);
}

#[test]
fn scale_trigger_endpoints() {
    assert_eq!(scale_trigger(-1000), 0);
    assert_eq!(scale_trigger(1000), 255);
}
