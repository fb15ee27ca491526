//! Output sinks for presented frames.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Trait for frame presentation backends.
pub trait FrameSink {
    /// Hands one finished RGBA frame to the sink.
    fn write_frame(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()>;
}

/// Writes each frame as a numbered PNG into a directory. Stands in for a
/// display surface when inspecting pipeline output offline.
pub struct PngSink {
    dir: PathBuf,
    frame_index: u64,
}

impl PngSink {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {dir:?}"))?;
        info!("Writing frames to {:?}", dir);
        Ok(Self {
            dir,
            frame_index: 0,
        })
    }
}

impl FrameSink for PngSink {
    fn write_frame(&mut self, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        let image = image::RgbaImage::from_raw(width, height, rgba.to_vec())
            .ok_or_else(|| anyhow!("frame buffer does not match {width}x{height}"))?;
        let path = self.dir.join(format!("frame_{:05}.png", self.frame_index));
        image
            .save(&path)
            .with_context(|| format!("failed to write {path:?}"))?;
        self.frame_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_sink_writes_numbered_frames() {
        let dir = std::env::temp_dir().join("benday_sink_test");
        let _ = fs::remove_dir_all(&dir);
        let mut sink = PngSink::new(dir.clone()).unwrap();

        let rgba = vec![255u8; 4 * 4 * 4];
        sink.write_frame(&rgba, 4, 4).unwrap();
        sink.write_frame(&rgba, 4, 4).unwrap();

        assert!(dir.join("frame_00000.png").exists());
        assert!(dir.join("frame_00001.png").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_png_sink_rejects_short_buffer() {
        let dir = std::env::temp_dir().join("benday_sink_reject_test");
        let _ = fs::remove_dir_all(&dir);
        let mut sink = PngSink::new(dir.clone()).unwrap();
        assert!(sink.write_frame(&[0u8; 8], 4, 4).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
