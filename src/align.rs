//! Color-to-depth alignment and body masking.
//!
//! The color and depth cameras see the scene at different resolutions, so a
//! per-color-pixel lookup table carries each color pixel to its position in
//! depth space. The table comes from an alignment service behind the
//! [`CoordinateMapper`] trait; [`update_body_mask`] turns it plus a
//! body-index frame into a foreground mask in color space.

use crate::frame::{BodyIndexFrame, DepthFrame, FrameGeometry, NO_BODY};
use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};

/// Position of one color pixel in depth space.
///
/// Sensors report unmappable pixels (no depth reading behind them) as
/// non-finite coordinates, so consumers must bounds-check before indexing.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DepthPoint {
    pub x: f32,
    pub y: f32,
}

impl DepthPoint {
    /// The value a mapper writes for a color pixel with no depth behind it.
    pub const UNMAPPED: DepthPoint = DepthPoint {
        x: f32::NEG_INFINITY,
        y: f32::NEG_INFINITY,
    };
}

/// Alignment service filling the color-to-depth lookup table each cycle.
pub trait CoordinateMapper {
    /// Writes one depth-space position per color pixel into `points`
    /// (row-major color order, `points.len()` = color width x height).
    fn map_color_to_depth(&self, depth: &DepthFrame, points: &mut [DepthPoint]) -> Result<()>;
}

/// Plain resolution-rescale mapper.
///
/// Stands in for a calibrated vendor mapper: carries each color pixel to the
/// proportional depth position, and marks pixels whose depth sample is zero
/// (no reading) as unmapped. Good enough for the synthetic sensor and tests;
/// real hardware supplies its own [`CoordinateMapper`].
pub struct ScaledMapper {
    geometry: FrameGeometry,
}

impl ScaledMapper {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self { geometry }
    }
}

impl CoordinateMapper for ScaledMapper {
    fn map_color_to_depth(&self, depth: &DepthFrame, points: &mut [DepthPoint]) -> Result<()> {
        let geom = &self.geometry;
        if points.len() != geom.color_len() {
            return Err(anyhow!(
                "lookup table holds {} points, expected {}",
                points.len(),
                geom.color_len()
            ));
        }
        if depth.width != geom.depth_width || depth.height != geom.depth_height {
            return Err(anyhow!(
                "depth frame is {}x{}, mapper expects {}x{}",
                depth.width,
                depth.height,
                geom.depth_width,
                geom.depth_height
            ));
        }

        let sx = geom.depth_width as f32 / geom.color_width as f32;
        let sy = geom.depth_height as f32 / geom.color_height as f32;

        for cy in 0..geom.color_height {
            for cx in 0..geom.color_width {
                let i = (cy * geom.color_width + cx) as usize;
                let dx = cx as f32 * sx;
                let dy = cy as f32 * sy;
                let di = geom.depth_index(dx as u32, dy as u32);
                points[i] = if depth.data[di] == 0 {
                    DepthPoint::UNMAPPED
                } else {
                    DepthPoint { x: dx, y: dy }
                };
            }
        }
        Ok(())
    }
}

/// Derives the color-space foreground mask from the lookup table and the
/// body-index frame: 255 where the mapped depth pixel belongs to a tracked
/// person, 0 where it is background.
///
/// A lookup entry that truncates to a position outside the depth frame (or
/// is non-finite) is skipped and the mask byte keeps whatever the previous
/// cycle left there, stale carry-over included. Callers wanting a defined
/// default after such skips must clear `mask` themselves.
pub fn update_body_mask(
    geometry: &FrameGeometry,
    points: &[DepthPoint],
    body_index: &BodyIndexFrame,
    mask: &mut [u8],
) -> Result<()> {
    if points.len() != geometry.color_len() {
        return Err(anyhow!(
            "lookup table holds {} points, expected {}",
            points.len(),
            geometry.color_len()
        ));
    }
    if mask.len() != geometry.color_len() {
        return Err(anyhow!(
            "mask holds {} bytes, expected {}",
            mask.len(),
            geometry.color_len()
        ));
    }
    if body_index.width != geometry.depth_width || body_index.height != geometry.depth_height {
        return Err(anyhow!(
            "body-index frame is {}x{}, expected {}x{}",
            body_index.width,
            body_index.height,
            geometry.depth_width,
            geometry.depth_height
        ));
    }

    for (i, point) in points.iter().enumerate() {
        if !point.x.is_finite() || !point.y.is_finite() {
            continue;
        }
        // Truncate toward zero, matching the integer cast the sensor SDKs use.
        let dx = point.x as i64;
        let dy = point.y as i64;
        if !geometry.contains_depth(dx, dy) {
            continue;
        }
        let di = geometry.depth_index(dx as u32, dy as u32);
        mask[i] = if body_index.data[di] == NO_BODY { 0 } else { 255 };
    }
    Ok(())
}
