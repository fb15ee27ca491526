//! Diagnostic label overlay.
//!
//! Draws the active mode and frame dimensions into the bottom-left corner
//! of the output, the way the sensor demos stamp their frames.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use fontdb::Database;
use tracing::warn;

/// Label color (opaque red).
const COLOR: [u8; 3] = [255, 0, 0];
/// Glyph size in pixels.
const SCALE: f32 = 40.0;
/// Inset from the left edge and the bottom edge to the text baseline.
const MARGIN: f32 = 5.0;

/// Rasterizes the overlay text with the first usable system font. When the
/// host has no fonts at all the painter degrades to a no-op and says so once.
pub struct LabelPainter {
    font: Option<FontVec>,
}

impl LabelPainter {
    pub fn new() -> Self {
        let font = load_system_font();
        if font.is_none() {
            warn!("no usable system font found, frame labels disabled");
        }
        Self { font }
    }

    /// Blends `text` onto the RGBA buffer along the bottom edge.
    pub fn paint(&self, rgba: &mut [u8], width: u32, height: u32, text: &str) {
        let Some(font) = &self.font else {
            return;
        };
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);

        let scaled = font.as_scaled(PxScale::from(SCALE));
        let baseline = height as f32 - MARGIN;
        let mut cursor = MARGIN;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            let glyph = glyph_id.with_scale_and_position(
                PxScale::from(SCALE),
                ab_glyph::point(cursor, baseline),
            );
            cursor += scaled.h_advance(glyph_id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + gx as i64;
                let y = bounds.min.y as i64 + gy as i64;
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return;
                }
                let o = (y as usize * width as usize + x as usize) * 4;
                for (c, &ink) in COLOR.iter().enumerate() {
                    let dst = rgba[o + c] as f32;
                    rgba[o + c] = (dst + (ink as f32 - dst) * coverage) as u8;
                }
            });
        }
    }
}

impl Default for LabelPainter {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the first face fontdb can see and loads its bytes.
fn load_system_font() -> Option<FontVec> {
    let mut db = Database::new();
    db.load_system_fonts();
    let face = db.faces().next()?;
    let id = face.id;
    let (source, index) = db.face_source(id)?;
    let data = match source {
        fontdb::Source::Binary(data) => data.as_ref().as_ref().to_vec(),
        fontdb::Source::File(path) => std::fs::read(path).ok()?,
        fontdb::Source::SharedFile(path, _) => std::fs::read(path).ok()?,
    };
    FontVec::try_from_vec_and_index(data, index).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_is_a_noop() {
        let painter = LabelPainter { font: None };
        let mut rgba = vec![10u8; 8 * 8 * 4];
        painter.paint(&mut rgba, 8, 8, "SEPIA MODE 8x8");
        assert!(rgba.iter().all(|&b| b == 10));
    }

    #[test]
    fn test_paint_stays_inside_buffer() {
        // Whatever fonts the host has (possibly none), painting a label
        // wider than the frame must not index out of bounds.
        let painter = LabelPainter::new();
        let mut rgba = vec![0u8; 16 * 16 * 4];
        painter.paint(&mut rgba, 16, 16, "PIXELIZE MODE 1920x1080");
    }
}
