//! 像素空间包围盒

use simpilot_capture::Frame;

/// 包围盒（像素矩形，左上角 + 尺寸）
///
/// 标记为有效的包围盒必须完全落在所属帧的边界内。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    /// 在帧中心放置给定尺寸的包围盒
    ///
    /// 帧任一维小于请求尺寸时返回 `None`（种子区放不下）。
    pub fn centered_in(frame: &Frame, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || frame.width() < width || frame.height() < height {
            return None;
        }
        Some(BoundingBox {
            x: (frame.width() - width) / 2,
            y: (frame.height() - height) / 2,
            width,
            height,
        })
    }

    /// 盒中心（整数像素）
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x + self.width / 2) as i32,
            (self.y + self.height / 2) as i32,
        )
    }

    /// 是否完全落在帧边界内
    pub fn fits_within(&self, frame: &Frame) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= frame.width())
            && self.y.checked_add(self.height).is_some_and(|b| b <= frame.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn frame(width: u32, height: u32) -> Frame {
        Frame::new(
            width,
            height,
            vec![0u8; width as usize * height as usize * 4],
            Instant::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_centered_in_even_frame() {
        let f = frame(640, 480);
        let b = BoundingBox::centered_in(&f, 100, 100).unwrap();
        assert_eq!((b.x, b.y), (270, 190));
        assert_eq!(b.center(), (320, 240));
        assert_eq!(b.center(), (f.center().0, f.center().1));
    }

    #[test]
    fn test_centered_in_too_small_frame() {
        let f = frame(64, 64);
        assert!(BoundingBox::centered_in(&f, 100, 100).is_none());
        assert!(BoundingBox::centered_in(&f, 0, 10).is_none());
    }

    #[test]
    fn test_fits_within() {
        let f = frame(100, 100);
        assert!(BoundingBox::new(0, 0, 100, 100).fits_within(&f));
        assert!(BoundingBox::new(60, 60, 40, 40).fits_within(&f));
        assert!(!BoundingBox::new(61, 60, 40, 40).fits_within(&f));
        assert!(!BoundingBox::new(0, 0, 0, 10).fits_within(&f));
    }

    #[test]
    fn test_fits_within_no_overflow() {
        let f = frame(100, 100);
        assert!(!BoundingBox::new(u32::MAX, 0, 2, 2).fits_within(&f));
    }
}
