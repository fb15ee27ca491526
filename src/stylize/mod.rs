//! Image style filters.

mod comic;
mod label;
pub mod ops;
mod pixelize;
mod sepia;

pub use comic::ComicFilter;
pub use label::LabelPainter;
pub use pixelize::Pixelizer;

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which filter the next processing cycle applies. Settable at any time;
/// there are no transition guards between modes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    /// Pass pixels through untouched.
    #[default]
    Original,
    /// Fixed 4x4 channel-mix tone.
    Sepia,
    /// Blocky low-resolution look.
    Pixelize,
    /// Posterized tones, stripe screen, ink outlines.
    Comic,
}

impl StyleMode {
    /// Uppercase name used in the frame label.
    pub fn label(&self) -> &'static str {
        match self {
            StyleMode::Original => "ORIGINAL",
            StyleMode::Sepia => "SEPIA",
            StyleMode::Pixelize => "PIXELIZE",
            StyleMode::Comic => "COMIC",
        }
    }
}

/// Applies the selected style to RGBA frames of one fixed resolution.
/// Stateful filters keep their scratch buffers here across cycles.
pub struct Stylizer {
    width: u32,
    height: u32,
    pixelizer: Pixelizer,
    comic: ComicFilter,
}

impl Stylizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixelizer: Pixelizer::new(),
            comic: ComicFilter::new(width, height),
        }
    }

    /// Transforms `rgba` in place according to `mode`.
    pub fn apply(&mut self, mode: StyleMode, rgba: &mut [u8]) -> Result<()> {
        match mode {
            StyleMode::Original => {}
            StyleMode::Sepia => sepia::apply(rgba),
            StyleMode::Pixelize => self.pixelizer.apply(rgba, self.width, self.height)?,
            StyleMode::Comic => self.comic.apply(rgba),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_mode_is_untouched() {
        let mut rgba: Vec<u8> = (0..8 * 8 * 4).map(|i| (i % 256) as u8).collect();
        let reference = rgba.clone();
        let mut stylizer = Stylizer::new(8, 8);
        stylizer.apply(StyleMode::Original, &mut rgba).unwrap();
        assert_eq!(rgba, reference);
    }

    #[test]
    fn test_every_mode_keeps_dimensions() {
        for mode in [
            StyleMode::Original,
            StyleMode::Sepia,
            StyleMode::Pixelize,
            StyleMode::Comic,
        ] {
            let mut rgba = vec![120u8; 20 * 10 * 4];
            let mut stylizer = Stylizer::new(20, 10);
            stylizer.apply(mode, &mut rgba).unwrap();
            assert_eq!(rgba.len(), 20 * 10 * 4, "{mode:?} resized the buffer");
        }
    }

    #[test]
    fn test_mode_parses_from_config_text() {
        let mode: StyleMode = serde_yaml::from_str("comic").unwrap();
        assert_eq!(mode, StyleMode::Comic);
    }
}
