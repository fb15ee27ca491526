//! Blocky pixelization via paired nearest-neighbor resizes.

use anyhow::{Context, Result};
use fast_image_resize as fir;

/// Downsample factor per dimension. The upsample back to full size is its
/// reciprocal, so every output block covers roughly 10x10 source pixels.
const SCALE: f32 = 0.1;

/// Pixelizing filter. Keeps the resizer (and its SIMD state) across frames.
pub struct Pixelizer {
    resizer: fir::Resizer,
    options: fir::ResizeOptions,
}

impl Pixelizer {
    pub fn new() -> Self {
        Self {
            resizer: fir::Resizer::new(),
            options: fir::ResizeOptions::new().resize_alg(fir::ResizeAlg::Nearest),
        }
    }

    /// Replaces `rgba` with its blocky rendition.
    pub fn apply(&mut self, rgba: &mut [u8], width: u32, height: u32) -> Result<()> {
        let small_w = ((width as f32 * SCALE).round() as u32).max(1);
        let small_h = ((height as f32 * SCALE).round() as u32).max(1);

        let src = fir::images::Image::from_vec_u8(
            width,
            height,
            rgba.to_vec(),
            fir::PixelType::U8x4,
        )?;
        let mut small = fir::images::Image::new(small_w, small_h, fir::PixelType::U8x4);
        self.resizer
            .resize(&src, &mut small, Some(&self.options))
            .context("pixelize downsample failed")?;

        let mut full = fir::images::Image::new(width, height, fir::PixelType::U8x4);
        self.resizer
            .resize(&small, &mut full, Some(&self.options))
            .context("pixelize upsample failed")?;

        rgba.copy_from_slice(&full.into_vec());
        Ok(())
    }
}

impl Default for Pixelizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distinct_blocks_bounded() {
        let width = 40u32;
        let height = 30u32;
        // Every source pixel unique.
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for i in 0..(width * height) {
            rgba.extend_from_slice(&[(i % 251) as u8, (i / 251) as u8, (i % 7) as u8, 255]);
        }

        let mut pixelizer = Pixelizer::new();
        pixelizer.apply(&mut rgba, width, height).unwrap();

        let distinct: HashSet<&[u8]> = rgba.chunks_exact(4).collect();
        // At most (0.1 * w) x (0.1 * h) distinct blocks survive.
        assert!(distinct.len() <= 4 * 3, "{} distinct pixels", distinct.len());
    }

    #[test]
    fn test_small_image_collapses_to_single_block() {
        let mut rgba = vec![0u8; 5 * 5 * 4];
        for (i, px) in rgba.chunks_exact_mut(4).enumerate() {
            px[0] = i as u8;
            px[3] = 255;
        }
        let mut pixelizer = Pixelizer::new();
        pixelizer.apply(&mut rgba, 5, 5).unwrap();

        let first = rgba[0..4].to_vec();
        assert!(rgba.chunks_exact(4).all(|px| px == &first[..]));
    }
}
