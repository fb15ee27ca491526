//! Sepia tone via a fixed 4x4 channel-mixing matrix.

/// Row-major channel mix applied to every [r, g, b, a] column vector.
/// Constant for the process lifetime.
const KERNEL: [[f32; 4]; 4] = [
    [0.189, 0.769, 0.393, 0.0],
    [0.168, 0.686, 0.349, 0.0],
    [0.131, 0.534, 0.272, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Applies the sepia matrix to every pixel in place, saturating to 8 bits.
pub fn apply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let v = [px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32];
        for (c, row) in KERNEL.iter().enumerate() {
            let mixed = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
            px[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}
