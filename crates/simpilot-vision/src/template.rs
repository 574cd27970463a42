//! 归一化互相关模板跟踪
//!
//! 初始化时把种子区转灰度存为模板；每次 update 在上一位置附近的
//! 有界搜索窗内做零均值归一化互相关（ZNCC），取分数最高的位置。
//! 分数低于接受阈值视为本周期丢失，模板与上一位置原样保留。

use crate::bbox::BoundingBox;
use crate::tracker::{Tracker, TrackerError};
use simpilot_capture::{BYTES_PER_PIXEL, Frame};
use tracing::trace;

/// 模板跟踪器配置
#[derive(Debug, Clone)]
pub struct TemplateTrackerConfig {
    /// 搜索半径（像素，相对上一位置）
    pub search_radius: u32,
    /// ZNCC 接受阈值，低于此分数判为丢失
    pub score_threshold: f64,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        TemplateTrackerConfig {
            search_radius: 24,
            score_threshold: 0.60,
        }
    }
}

/// 灰度模板（零均值预处理后的像素与能量）
struct Template {
    width: u32,
    height: u32,
    /// 去均值后的灰度值
    pixels: Vec<f64>,
    /// Σ (t - t̄)²
    energy: f64,
}

/// 模板跟踪器
pub struct TemplateTracker {
    config: TemplateTrackerConfig,
    template: Option<Template>,
    last_box: Option<BoundingBox>,
}

/// BGRA 像素转灰度（ITU-R BT.601 加权）
fn luma(pixel: [u8; 4]) -> f64 {
    0.114 * pixel[0] as f64 + 0.587 * pixel[1] as f64 + 0.299 * pixel[2] as f64
}

impl TemplateTracker {
    pub fn new(config: TemplateTrackerConfig) -> Self {
        TemplateTracker {
            config,
            template: None,
            last_box: None,
        }
    }

    /// 提取区域灰度图（调用方保证区域在帧内）
    fn extract_luma(frame: &Frame, region: &BoundingBox) -> Vec<f64> {
        let stride = frame.width() as usize * BYTES_PER_PIXEL;
        let data = frame.data();
        let mut out = Vec::with_capacity(region.width as usize * region.height as usize);
        for y in region.y..region.y + region.height {
            let row = y as usize * stride;
            for x in region.x..region.x + region.width {
                let offset = row + x as usize * BYTES_PER_PIXEL;
                out.push(luma([
                    data[offset],
                    data[offset + 1],
                    data[offset + 2],
                    data[offset + 3],
                ]));
            }
        }
        out
    }

    /// 候选位置的 ZNCC 分数
    fn score_at(&self, frame: &Frame, template: &Template, x: u32, y: u32) -> f64 {
        let region = BoundingBox::new(x, y, template.width, template.height);
        let patch = Self::extract_luma(frame, &region);

        let mean = patch.iter().sum::<f64>() / patch.len() as f64;
        let mut cross = 0.0;
        let mut patch_energy = 0.0;
        for (p, t) in patch.iter().zip(template.pixels.iter()) {
            let dp = p - mean;
            cross += dp * t;
            patch_energy += dp * dp;
        }

        let denom = (patch_energy * template.energy).sqrt();
        if denom <= f64::EPSILON {
            0.0
        } else {
            cross / denom
        }
    }
}

impl Tracker for TemplateTracker {
    fn init(&mut self, frame: &Frame, seed: BoundingBox) -> Result<(), TrackerError> {
        if !seed.fits_within(frame) {
            return Err(TrackerError::SeedOutOfBounds {
                x: seed.x,
                y: seed.y,
                width: seed.width,
                height: seed.height,
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }
        if frame.data().len() != frame.width() as usize * frame.height() as usize * BYTES_PER_PIXEL
        {
            // Frame 构造时已校验，此分支防御外部 unsafe 构造
            return Err(TrackerError::UnsupportedFormat(
                "expected tightly packed 4-channel BGRA".into(),
            ));
        }

        let raw = Self::extract_luma(frame, &seed);
        let mean = raw.iter().sum::<f64>() / raw.len() as f64;
        let pixels: Vec<f64> = raw.iter().map(|v| v - mean).collect();
        let energy: f64 = pixels.iter().map(|v| v * v).sum();

        // 平坦图块没有可判别纹理，任何候选分数都会退化为 0
        if energy <= f64::EPSILON {
            return Err(TrackerError::SeedRejected(
                "seed region has no texture".into(),
            ));
        }

        self.template = Some(Template {
            width: seed.width,
            height: seed.height,
            pixels,
            energy,
        });
        self.last_box = Some(seed);
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<BoundingBox, TrackerError> {
        let template = self.template.as_ref().ok_or(TrackerError::NotInitialized)?;
        let last = self.last_box.ok_or(TrackerError::NotInitialized)?;

        if template.width > frame.width() || template.height > frame.height() {
            // 分辨率变化导致模板放不下：按单周期失败处理，模型保留
            return Err(TrackerError::UpdateFailed {
                score: 0.0,
                threshold: self.config.score_threshold,
            });
        }

        let radius = self.config.search_radius as i64;
        let max_x = frame.width() - template.width;
        let max_y = frame.height() - template.height;
        let x_lo = (last.x as i64 - radius).clamp(0, max_x as i64) as u32;
        let x_hi = (last.x as i64 + radius).clamp(0, max_x as i64) as u32;
        let y_lo = (last.y as i64 - radius).clamp(0, max_y as i64) as u32;
        let y_hi = (last.y as i64 + radius).clamp(0, max_y as i64) as u32;

        let mut best_score = f64::NEG_INFINITY;
        let mut best_pos = (last.x.min(max_x), last.y.min(max_y));
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let score = self.score_at(frame, template, x, y);
                if score > best_score {
                    best_score = score;
                    best_pos = (x, y);
                }
            }
        }

        if best_score < self.config.score_threshold {
            trace!(
                "Template match below threshold: {:.3} < {:.3}",
                best_score, self.config.score_threshold
            );
            return Err(TrackerError::UpdateFailed {
                score: best_score,
                threshold: self.config.score_threshold,
            });
        }

        let refined = BoundingBox::new(best_pos.0, best_pos.1, template.width, template.height);
        self.last_box = Some(refined);
        Ok(refined)
    }

    fn release(&mut self) {
        self.template = None;
        self.last_box = None;
    }

    fn has_model(&self) -> bool {
        self.template.is_some()
    }
}
