//! Per-cycle processing pipeline.
//!
//! One [`FramePipeline`] owns every scratch buffer for a fixed sensor
//! geometry and exposes a single entry point that takes the three sensor
//! frames and hands back the finished RGBA output. Stages run strictly in
//! order within a cycle: copy, align, stylize, composite, label.

use crate::align::{self, CoordinateMapper, DepthPoint};
use crate::frame::{BodyIndexFrame, ColorFrame, DepthFrame, FrameGeometry};
use crate::stylize::{ops, LabelPainter, StyleMode, Stylizer};
use anyhow::{anyhow, Result};

/// Per-cycle settings, passed in explicitly rather than read from shared
/// state so UI plumbing stays out of the processing signature.
#[derive(Debug, Clone, Copy)]
pub struct ProcessSettings {
    pub mode: StyleMode,
    /// Stamp the mode and dimensions onto the output.
    pub annotate: bool,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            mode: StyleMode::default(),
            annotate: true,
        }
    }
}

/// Frame context: scratch buffers plus the alignment service, sized once.
pub struct FramePipeline {
    geometry: FrameGeometry,
    mapper: Box<dyn CoordinateMapper>,
    points: Vec<DepthPoint>,
    /// Foreground mask in color space. Deliberately carried across cycles:
    /// lookup entries that fall outside the depth frame leave their mask
    /// byte untouched (see [`align::update_body_mask`]).
    mask: Vec<u8>,
    styled: Vec<u8>,
    output: Vec<u8>,
    stylizer: Stylizer,
    label: LabelPainter,
}

impl FramePipeline {
    pub fn new(geometry: FrameGeometry, mapper: Box<dyn CoordinateMapper>) -> Self {
        let color_len = geometry.color_len();
        Self {
            geometry,
            mapper,
            points: vec![DepthPoint::UNMAPPED; color_len],
            mask: vec![0; color_len],
            styled: vec![0; color_len * 4],
            output: vec![0; color_len * 4],
            stylizer: Stylizer::new(geometry.color_width, geometry.color_height),
            label: LabelPainter::new(),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Runs one full cycle and returns the presented RGBA buffer, valid
    /// until the next call.
    ///
    /// The styled frame is composited over the untouched color frame
    /// through the body mask, so only the tracked person gets the filter
    /// and the background keeps the raw camera image.
    pub fn process(
        &mut self,
        color: &ColorFrame,
        depth: &DepthFrame,
        body_index: &BodyIndexFrame,
        settings: &ProcessSettings,
    ) -> Result<&[u8]> {
        if color.width != self.geometry.color_width || color.height != self.geometry.color_height {
            return Err(anyhow!(
                "color frame is {}x{}, pipeline built for {}x{}",
                color.width,
                color.height,
                self.geometry.color_width,
                self.geometry.color_height
            ));
        }

        self.output.copy_from_slice(&color.data);
        self.styled.copy_from_slice(&color.data);

        self.mapper.map_color_to_depth(depth, &mut self.points)?;
        align::update_body_mask(&self.geometry, &self.points, body_index, &mut self.mask)?;

        self.stylizer.apply(settings.mode, &mut self.styled)?;
        ops::masked_copy_rgba(&self.styled, &mut self.output, &self.mask);

        if settings.annotate {
            let text = format!(
                "{} MODE {}x{}",
                settings.mode.label(),
                self.geometry.color_width,
                self.geometry.color_height
            );
            self.label.paint(
                &mut self.output,
                self.geometry.color_width,
                self.geometry.color_height,
                &text,
            );
        }

        Ok(&self.output)
    }
}
