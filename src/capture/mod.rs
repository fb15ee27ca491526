//! Sensor acquisition backends.

mod synthetic;

pub use synthetic::SyntheticSensor;

use crate::frame::{BodyIndexFrame, ColorFrame, DepthFrame, FrameGeometry};
use anyhow::Result;

/// Trait for depth-sensor backends delivering one multi-source frame set
/// per cycle.
pub trait SensorBackend {
    /// Opens the sensor with the specified configuration.
    fn open(config: SensorConfig) -> Result<Self>
    where
        Self: Sized;

    /// Acquires the latest color + depth + body-index frame set.
    fn acquire(&mut self) -> Result<SensorFrames>;

    /// Returns the fixed frame geometry of this session.
    fn geometry(&self) -> FrameGeometry;
}

/// One cycle's worth of sensor output.
#[derive(Debug, Clone)]
pub struct SensorFrames {
    pub color: ColorFrame,
    pub depth: DepthFrame,
    pub body_index: BodyIndexFrame,
}

/// Configuration for a sensor session.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    pub color_width: u32,
    pub color_height: u32,
    pub depth_width: u32,
    pub depth_height: u32,
    /// Target frame rate
    pub fps: u32,
}

impl SensorConfig {
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(
            self.color_width,
            self.color_height,
            self.depth_width,
            self.depth_height,
        )
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            color_width: 1920,
            color_height: 1080,
            depth_width: 512,
            depth_height: 424,
            fps: 30,
        }
    }
}
