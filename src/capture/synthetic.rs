//! Synthetic sensor backend.
//!
//! Generates a consistent color / depth / body-index triple with a single
//! tracked person drifting across the scene. Lets the pipeline, demo binary
//! and tests run without vendor hardware.

use super::{SensorBackend, SensorConfig, SensorFrames};
use crate::frame::{BodyIndexFrame, ColorFrame, DepthFrame, FrameGeometry};
use anyhow::{anyhow, Result};
use tracing::info;

/// Depth units for scene background and for the person.
const BACKGROUND_DEPTH: u16 = 3500;
const BODY_DEPTH: u16 = 1400;
/// Fraction of depth pixels dropped to zero each cycle, imitating sensor
/// holes (these become unmappable lookup entries downstream).
const HOLE_FRACTION: f32 = 0.01;

/// Procedural stand-in for a physical depth sensor.
pub struct SyntheticSensor {
    geometry: FrameGeometry,
    tick: u64,
}

impl SyntheticSensor {
    /// Ellipse occupied by the person at the current tick, in depth space:
    /// center x, center y, radius x, radius y.
    fn body_ellipse(&self) -> (f32, f32, f32, f32) {
        let dw = self.geometry.depth_width as f32;
        let dh = self.geometry.depth_height as f32;
        let phase = self.tick as f32 * 0.05;
        let cx = dw * 0.5 + phase.sin() * dw * 0.25;
        let cy = dh * 0.55;
        (cx, cy, dw / 6.0, dh / 3.0)
    }

    fn inside_body(&self, x: f32, y: f32) -> bool {
        let (cx, cy, rx, ry) = self.body_ellipse();
        let nx = (x - cx) / rx;
        let ny = (y - cy) / ry;
        nx * nx + ny * ny <= 1.0
    }
}

impl SensorBackend for SyntheticSensor {
    fn open(config: SensorConfig) -> Result<Self> {
        if config.color_width == 0
            || config.color_height == 0
            || config.depth_width == 0
            || config.depth_height == 0
        {
            return Err(anyhow!("sensor dimensions must be nonzero"));
        }
        info!(
            "Synthetic sensor opened: color {}x{}, depth {}x{}",
            config.color_width, config.color_height, config.depth_width, config.depth_height
        );
        Ok(Self {
            geometry: config.geometry(),
            tick: 0,
        })
    }

    fn acquire(&mut self) -> Result<SensorFrames> {
        let geom = self.geometry;

        let mut depth = DepthFrame::new(geom.depth_width, geom.depth_height);
        let mut body_index = BodyIndexFrame::new(geom.depth_width, geom.depth_height);
        for y in 0..geom.depth_height {
            for x in 0..geom.depth_width {
                let i = geom.depth_index(x, y);
                if self.inside_body(x as f32, y as f32) {
                    depth.data[i] = BODY_DEPTH;
                    body_index.data[i] = 0;
                } else {
                    depth.data[i] = BACKGROUND_DEPTH;
                }
            }
        }

        // Punch random holes into the depth data.
        let holes = (geom.depth_len() as f32 * HOLE_FRACTION) as usize;
        for _ in 0..holes {
            let i = (rand::random::<f32>() * (geom.depth_len() - 1) as f32) as usize;
            depth.data[i] = 0;
        }

        // Color view of the same scene: vertical sky-to-floor gradient with
        // the person rendered as a warm silhouette.
        let mut color = ColorFrame::new(geom.color_width, geom.color_height);
        let sx = geom.depth_width as f32 / geom.color_width as f32;
        let sy = geom.depth_height as f32 / geom.color_height as f32;
        for y in 0..geom.color_height {
            let shade = 60 + (140 * y / geom.color_height.max(1)) as u8;
            for x in 0..geom.color_width {
                let o = (y * geom.color_width + x) as usize * 4;
                let px = &mut color.data[o..o + 4];
                if self.inside_body(x as f32 * sx, y as f32 * sy) {
                    px.copy_from_slice(&[210, 160, 120, 255]);
                } else {
                    px.copy_from_slice(&[shade / 2, shade, 200, 255]);
                }
            }
        }

        self.tick = self.tick.wrapping_add(1);
        Ok(SensorFrames {
            color,
            depth,
            body_index,
        })
    }

    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::NO_BODY;

    fn small_config() -> SensorConfig {
        SensorConfig {
            color_width: 64,
            color_height: 48,
            depth_width: 32,
            depth_height: 24,
            fps: 30,
        }
    }

    #[test]
    fn test_frames_match_geometry() {
        let mut sensor = SyntheticSensor::open(small_config()).unwrap();
        let frames = sensor.acquire().unwrap();
        assert_eq!(frames.color.data.len(), 64 * 48 * 4);
        assert_eq!(frames.depth.data.len(), 32 * 24);
        assert_eq!(frames.body_index.data.len(), 32 * 24);
    }

    #[test]
    fn test_scene_contains_body_and_background() {
        let mut sensor = SyntheticSensor::open(small_config()).unwrap();
        let frames = sensor.acquire().unwrap();
        let tracked = frames.body_index.data.iter().filter(|&&b| b != NO_BODY).count();
        let empty = frames.body_index.data.iter().filter(|&&b| b == NO_BODY).count();
        assert!(tracked > 0, "no tracked person in the scene");
        assert!(empty > tracked, "person fills the whole frame");
    }

    #[test]
    fn test_depth_agrees_with_body_index() {
        let mut sensor = SyntheticSensor::open(small_config()).unwrap();
        let frames = sensor.acquire().unwrap();
        for (d, b) in frames.depth.data.iter().zip(frames.body_index.data.iter()) {
            match *d {
                0 => {} // hole, either label is fine
                BODY_DEPTH => assert_eq!(*b, 0),
                BACKGROUND_DEPTH => assert_eq!(*b, NO_BODY),
                other => panic!("unexpected depth value {other}"),
            }
        }
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let config = SensorConfig {
            depth_width: 0,
            ..small_config()
        };
        assert!(SyntheticSensor::open(config).is_err());
    }
}
