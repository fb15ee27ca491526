//! Sensor frame buffer types.

use thiserror::Error;

/// Body-index value denoting "no tracked person at this depth pixel".
pub const NO_BODY: u8 = 255;

/// Buffer/geometry mismatch. Frame buffers are fixed-size per session, so a
/// wrong length is a caller bug rather than a recoverable condition.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("{kind} buffer holds {actual} elements, expected {expected} for {width}x{height}")]
    SizeMismatch {
        kind: &'static str,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Pixel dimensions of the color and depth cameras for one sensor session.
///
/// The two cameras have different resolutions and fields of view, so color
/// and depth coordinates are distinct spaces related only through a
/// per-pixel lookup (see [`crate::align`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub color_width: u32,
    pub color_height: u32,
    pub depth_width: u32,
    pub depth_height: u32,
}

impl FrameGeometry {
    pub fn new(color_width: u32, color_height: u32, depth_width: u32, depth_height: u32) -> Self {
        Self {
            color_width,
            color_height,
            depth_width,
            depth_height,
        }
    }

    /// Number of pixels in a color frame.
    pub fn color_len(&self) -> usize {
        self.color_width as usize * self.color_height as usize
    }

    /// Number of pixels in a depth or body-index frame.
    pub fn depth_len(&self) -> usize {
        self.depth_width as usize * self.depth_height as usize
    }

    /// Flat index of a depth-space position. Caller checks bounds first.
    pub fn depth_index(&self, dx: u32, dy: u32) -> usize {
        dy as usize * self.depth_width as usize + dx as usize
    }

    /// Whether a truncated depth-space coordinate lies inside the depth frame.
    pub fn contains_depth(&self, dx: i64, dy: i64) -> bool {
        dx >= 0 && dx < self.depth_width as i64 && dy >= 0 && dy < self.depth_height as i64
    }
}

/// An RGBA8 color frame. Overwritten every capture cycle; no history kept.
#[derive(Debug, Clone)]
pub struct ColorFrame {
    pub width: u32,
    pub height: u32,
    /// Packed RGBA, 4 bytes per pixel, row major.
    pub data: Vec<u8>,
}

impl ColorFrame {
    /// Creates a zeroed frame of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wraps existing RGBA data, validating the length.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                kind: "color",
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// A 16-bit depth frame, one depth unit per pixel.
#[derive(Debug, Clone)]
pub struct DepthFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u16>,
}

impl DepthFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u16>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                kind: "depth",
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a depth frame from the raw byte stream a sensor delivers
    /// (native-endian 16-bit samples).
    pub fn from_raw_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FrameError> {
        let samples: Vec<u16> = bytemuck::pod_collect_to_vec(bytes);
        Self::from_data(width, height, samples)
    }
}

/// An 8-bit body-index frame in depth space. Each pixel holds the index of
/// the tracked person occupying it, or [`NO_BODY`].
#[derive(Debug, Clone)]
pub struct BodyIndexFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl BodyIndexFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![NO_BODY; width as usize * height as usize],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                kind: "body-index",
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_frame_length_validation() {
        assert!(ColorFrame::from_data(2, 2, vec![0; 16]).is_ok());
        let err = ColorFrame::from_data(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn test_depth_frame_from_raw_bytes() {
        let samples: [u16; 2] = [1200, 4500];
        let bytes: &[u8] = bytemuck::cast_slice(&samples);
        let frame = DepthFrame::from_raw_bytes(2, 1, bytes).unwrap();
        assert_eq!(frame.data, vec![1200, 4500]);

        assert!(DepthFrame::from_raw_bytes(2, 2, bytes).is_err());
    }

    #[test]
    fn test_body_index_defaults_to_no_body() {
        let frame = BodyIndexFrame::new(3, 3);
        assert!(frame.data.iter().all(|&b| b == NO_BODY));
    }

    #[test]
    fn test_geometry_bounds() {
        let geom = FrameGeometry::new(1920, 1080, 512, 424);
        assert_eq!(geom.color_len(), 1920 * 1080);
        assert_eq!(geom.depth_len(), 512 * 424);
        assert!(geom.contains_depth(0, 0));
        assert!(geom.contains_depth(511, 423));
        assert!(!geom.contains_depth(512, 0));
        assert!(!geom.contains_depth(0, -1));
    }
}
