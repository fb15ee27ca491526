//! Comic-book stylization: posterized tones over a stripe screen, with
//! Canny-derived ink outlines.

use super::ops;

/// Posterization band edges. Below the lower edge a pixel goes solid black,
/// above the upper edge solid white; the band between renders as the
/// mid-tone and lets the stripe screen show through.
const BAND_LOW: u8 = 70;
const BAND_HIGH: u8 = 120;
const MID_TONE: u8 = 100;

/// Canny thresholds for the outline pass.
const EDGE_LOW: f32 = 20.0;
const EDGE_HIGH: f32 = 120.0;

/// Stripe screen spacing in rows.
const STRIPE_STEP: usize = 4;

/// Comic filter with per-resolution scratch buffers and a stripe screen
/// rendered once at construction.
pub struct ComicFilter {
    width: usize,
    height: usize,
    gray: Vec<u8>,
    line: Vec<u8>,
    edges: Vec<u8>,
    solid: Vec<u8>,
    background: Vec<u8>,
    dst: Vec<u8>,
}

impl ComicFilter {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width as usize;
        let height = height as usize;
        let len = width * height;
        Self {
            width,
            height,
            gray: vec![0; len],
            line: vec![0; len],
            edges: vec![0; len],
            solid: vec![0; len],
            background: striped_background(width, height),
            dst: vec![0; len],
        }
    }

    /// Stylizes `rgba` in place. The buffer must match the construction
    /// dimensions.
    pub fn apply(&mut self, rgba: &mut [u8]) {
        assert_eq!(rgba.len(), self.width * self.height * 4, "frame size mismatch");

        ops::rgba_to_gray(rgba, &mut self.gray);
        self.dst.copy_from_slice(&self.background);

        // Blurred copy feeds the outline pass so single-pixel noise does not
        // read as ink.
        ops::gaussian_blur_3x3(&self.gray, &mut self.line, self.width, self.height);

        posterize(&mut self.gray, &mut self.solid);
        ops::masked_copy_gray(&self.gray, &mut self.dst, &self.solid);

        ops::canny(
            &self.line,
            &mut self.edges,
            self.width,
            self.height,
            EDGE_LOW,
            EDGE_HIGH,
        );

        // The edge map doubles as its own inclusion mask: invert it and lay
        // the resulting dark outlines over the composite.
        self.solid.copy_from_slice(&self.edges);
        ops::invert(&mut self.edges);
        ops::masked_copy_gray(&self.edges, &mut self.dst, &self.solid);

        ops::gray_to_rgba(&self.dst, rgba);
    }
}

/// Collapses gray levels into three bands, flagging the solid (black and
/// white) bands in `solid`; mid-band pixels stay transparent to the screen
/// behind them.
fn posterize(gray: &mut [u8], solid: &mut [u8]) {
    for (g, s) in gray.iter_mut().zip(solid.iter_mut()) {
        if *g < BAND_LOW {
            *g = 0;
            *s = 1;
        } else if *g < BAND_HIGH {
            *g = MID_TONE;
            *s = 0;
        } else {
            *g = 255;
            *s = 1;
        }
    }
}

/// White canvas crossed by 1px black diagonals of slope -1, one every
/// [`STRIPE_STEP`] rows, swept far enough past the bottom edge to cover the
/// full diagonal extent of the canvas.
fn striped_background(width: usize, height: usize) -> Vec<u8> {
    let mut canvas = vec![255u8; width * height];
    let sweep = (height as f32 * 2.5) as i64;
    let mut offset = 0i64;
    while offset < sweep {
        for x in 0..width as i64 {
            let y = offset - x;
            if y >= 0 && y < height as i64 {
                canvas[y as usize * width + x as usize] = 0;
            }
        }
        offset += STRIPE_STEP as i64;
    }
    canvas
}
