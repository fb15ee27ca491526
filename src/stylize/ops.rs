//! Low-level pixel operations shared by the style filters.
//!
//! Everything here works on flat row-major buffers sized by the caller.
//! Length mismatches are contract violations and assert, the filters own
//! the buffers and size them once at startup.

/// RGBA to 8-bit luminance, BT.601 weights.
pub fn rgba_to_gray(rgba: &[u8], gray: &mut [u8]) {
    assert_eq!(rgba.len(), gray.len() * 4, "rgba/gray buffer mismatch");
    for (g, px) in gray.iter_mut().zip(rgba.chunks_exact(4)) {
        let lum = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        *g = lum.round() as u8;
    }
}

/// Expands 8-bit luminance back to opaque RGBA.
pub fn gray_to_rgba(gray: &[u8], rgba: &mut [u8]) {
    assert_eq!(rgba.len(), gray.len() * 4, "rgba/gray buffer mismatch");
    for (g, px) in gray.iter().zip(rgba.chunks_exact_mut(4)) {
        px[0] = *g;
        px[1] = *g;
        px[2] = *g;
        px[3] = 255;
    }
}

/// 3x3 Gaussian blur, separable [1 2 1]/4 taps, replicated border.
pub fn gaussian_blur_3x3(src: &[u8], dst: &mut [u8], width: usize, height: usize) {
    assert_eq!(src.len(), width * height, "src buffer mismatch");
    assert_eq!(dst.len(), width * height, "dst buffer mismatch");
    if width == 0 || height == 0 {
        return;
    }

    // Horizontal pass into 16-bit scratch, division deferred to the end so
    // the result rounds once.
    let mut tmp = vec![0u16; width * height];
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let left = src[row + x.saturating_sub(1)] as u16;
            let mid = src[row + x] as u16;
            let right = src[row + (x + 1).min(width - 1)] as u16;
            tmp[row + x] = left + 2 * mid + right;
        }
    }
    for y in 0..height {
        let above = y.saturating_sub(1) * width;
        let below = (y + 1).min(height - 1) * width;
        let row = y * width;
        for x in 0..width {
            let sum = tmp[above + x] + 2 * tmp[row + x] + tmp[below + x];
            dst[row + x] = ((sum + 8) >> 4) as u8;
        }
    }
}

/// Canny edge detection: Sobel gradients, L1 magnitude, non-maximum
/// suppression, double-threshold hysteresis. Edge pixels come out 255,
/// everything else 0. Border pixels are never edges.
pub fn canny(src: &[u8], dst: &mut [u8], width: usize, height: usize, low: f32, high: f32) {
    assert_eq!(src.len(), width * height, "src buffer mismatch");
    assert_eq!(dst.len(), width * height, "dst buffer mismatch");
    dst.fill(0);
    if width < 3 || height < 3 {
        return;
    }

    let at = |x: usize, y: usize| src[y * width + x] as i32;

    let mut mag = vec![0.0f32; width * height];
    let mut gxs = vec![0i32; width * height];
    let mut gys = vec![0i32; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = -at(x - 1, y - 1) - 2 * at(x - 1, y) - at(x - 1, y + 1)
                + at(x + 1, y - 1)
                + 2 * at(x + 1, y)
                + at(x + 1, y + 1);
            let gy = -at(x - 1, y - 1) - 2 * at(x, y - 1) - at(x + 1, y - 1)
                + at(x - 1, y + 1)
                + 2 * at(x, y + 1)
                + at(x + 1, y + 1);
            let i = y * width + x;
            gxs[i] = gx;
            gys[i] = gy;
            mag[i] = (gx.abs() + gy.abs()) as f32;
        }
    }

    // Non-maximum suppression along the quantized gradient direction.
    let mut thin = vec![0.0f32; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let m = mag[i];
            if m < low {
                continue;
            }
            let gx = gxs[i] as f32;
            let gy = gys[i] as f32;
            let angle = gy.atan2(gx).to_degrees().rem_euclid(180.0);
            let (n1, n2) = if !(22.5..157.5).contains(&angle) {
                (mag[i - 1], mag[i + 1])
            } else if angle < 67.5 {
                (mag[i - width + 1], mag[i + width - 1])
            } else if angle < 112.5 {
                (mag[i - width], mag[i + width])
            } else {
                (mag[i - width - 1], mag[i + width + 1])
            };
            if m >= n1 && m >= n2 {
                thin[i] = m;
            }
        }
    }

    // Hysteresis: seed from strong pixels, grow through weak neighbors.
    let mut stack = Vec::new();
    for (i, &m) in thin.iter().enumerate() {
        if m >= high {
            dst[i] = 255;
            stack.push(i);
        }
    }
    while let Some(i) = stack.pop() {
        let x = i % width;
        let y = i / width;
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let n = ny * width + nx;
                if dst[n] == 0 && thin[n] >= low {
                    dst[n] = 255;
                    stack.push(n);
                }
            }
        }
    }
}

/// In-place bitwise inversion.
pub fn invert(buf: &mut [u8]) {
    for b in buf.iter_mut() {
        *b = !*b;
    }
}

/// Copies `src` into `dst` wherever `mask` is nonzero, one byte per pixel.
pub fn masked_copy_gray(src: &[u8], dst: &mut [u8], mask: &[u8]) {
    assert_eq!(src.len(), dst.len(), "src/dst buffer mismatch");
    assert_eq!(src.len(), mask.len(), "mask buffer mismatch");
    for i in 0..src.len() {
        if mask[i] != 0 {
            dst[i] = src[i];
        }
    }
}

/// Copies `src` into `dst` wherever `mask` is nonzero, four bytes per pixel.
pub fn masked_copy_rgba(src: &[u8], dst: &mut [u8], mask: &[u8]) {
    assert_eq!(src.len(), dst.len(), "src/dst buffer mismatch");
    assert_eq!(src.len(), mask.len() * 4, "mask buffer mismatch");
    for (i, &m) in mask.iter().enumerate() {
        if m != 0 {
            let o = i * 4;
            dst[o..o + 4].copy_from_slice(&src[o..o + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_conversion_weights() {
        let rgba = [255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255];
        let mut gray = [0u8; 3];
        rgba_to_gray(&rgba, &mut gray);
        assert_eq!(gray, [76, 150, 29]);

        let mut back = [0u8; 12];
        gray_to_rgba(&gray, &mut back);
        assert_eq!(&back[0..4], &[76, 76, 76, 255]);
    }

    #[test]
    fn test_blur_preserves_uniform_image() {
        let src = vec![200u8; 25];
        let mut dst = vec![0u8; 25];
        gaussian_blur_3x3(&src, &mut dst, 5, 5);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut src = vec![0u8; 25];
        src[12] = 255; // center of a 5x5 image
        let mut dst = vec![0u8; 25];
        gaussian_blur_3x3(&src, &mut dst, 5, 5);

        // [1 2 1] x [1 2 1] / 16, rounded.
        assert_eq!(dst[12], 64);
        assert_eq!(dst[11], 32);
        assert_eq!(dst[13], 32);
        assert_eq!(dst[7], 32);
        assert_eq!(dst[17], 32);
        assert_eq!(dst[6], 16);
        assert_eq!(dst[0], 0);
    }

    #[test]
    fn test_canny_finds_vertical_step() {
        let width = 10;
        let height = 8;
        let mut src = vec![0u8; width * height];
        for y in 0..height {
            for x in 5..width {
                src[y * width + x] = 255;
            }
        }
        let mut edges = vec![0u8; width * height];
        canny(&src, &mut edges, width, height, 20.0, 120.0);

        // The edge lands on the columns flanking the step, away from it
        // nothing fires.
        for y in 1..height - 1 {
            let row = &edges[y * width..(y + 1) * width];
            assert!(row[4] == 255 || row[5] == 255, "no edge in row {y}");
            assert_eq!(row[1], 0);
            assert_eq!(row[8], 0);
        }
    }

    #[test]
    fn test_canny_flat_image_has_no_edges() {
        let src = vec![90u8; 64];
        let mut edges = vec![255u8; 64];
        canny(&src, &mut edges, 8, 8, 20.0, 120.0);
        assert!(edges.iter().all(|&e| e == 0));
    }

    #[test]
    fn test_invert() {
        let mut buf = [0u8, 255, 100];
        invert(&mut buf);
        assert_eq!(buf, [255, 0, 155]);
    }

    #[test]
    fn test_masked_copies() {
        let src = [1u8, 2, 3];
        let mut dst = [9u8, 9, 9];
        masked_copy_gray(&src, &mut dst, &[255, 0, 1]);
        assert_eq!(dst, [1, 9, 3]);

        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        masked_copy_rgba(&src, &mut dst, &[0, 255]);
        assert_eq!(dst, [0, 0, 0, 0, 5, 6, 7, 8]);
    }
}
