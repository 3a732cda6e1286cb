use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::models::snapshot::Vehicle;
use crate::rendering::colorizer::VelocityColorizer;
use crate::rendering::surface::{Point, Rect, RenderSurface, Rgba};

const ACC_OUTLINE: Rgba = Rgba::BLUE;
const MARKER: Rgba = Rgba::BLACK;
const LEADER_DOT: Rgba = Rgba::RED;

/// Which way the triangular marker points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerDirection {
    /// Towards increasing position, tip on the right edge.
    Forward,
    /// Towards decreasing position, tip on the left edge.
    Backward,
}

impl MarkerDirection {
    /// Anything not strictly moving (including NaN) gets the backward marker.
    pub fn for_velocity(velocity: f64) -> Self {
        if velocity > 0.0 {
            MarkerDirection::Forward
        } else {
            MarkerDirection::Backward
        }
    }
}

/// Pixel sizes of a vehicle glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub size: f64,
    pub arrow_length: f64,
    pub arrow_half_width: f64,
    pub outline_width: u32,
    pub leader_radius: u32,
    pub leader_gap: f64,
}

impl GlyphStyle {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            size: config.glyph_size(),
            arrow_length: config.arrow_length,
            arrow_half_width: config.arrow_half_width,
            outline_width: config.outline_width,
            leader_radius: config.leader_radius,
            leader_gap: config.leader_gap,
        }
    }
}

/// Draws one vehicle: body, ACC outline, direction marker, leader dot.
#[derive(Debug, Clone, Copy)]
pub struct VehicleGlyphRenderer {
    colorizer: VelocityColorizer,
    style: GlyphStyle,
}

impl VehicleGlyphRenderer {
    pub fn new(colorizer: VelocityColorizer, style: GlyphStyle) -> Self {
        Self { colorizer, style }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            VelocityColorizer::from_config(config),
            GlyphStyle::from_config(config),
        )
    }

    /// Square body: left edge at `x`, vertically centred on the lane.
    pub fn body(&self, x: f64, center_y: f64) -> Rect {
        let size = self.style.size;
        Rect::new(x, center_y - size / 2.0, size, size)
    }

    pub fn marker(&self, x: f64, center_y: f64, direction: MarkerDirection) -> [Point; 3] {
        let size = self.style.size;
        let (length, half_width) = (self.style.arrow_length, self.style.arrow_half_width);
        match direction {
            MarkerDirection::Forward => [
                (x + size, center_y),
                (x + size - length, center_y - half_width),
                (x + size - length, center_y + half_width),
            ],
            MarkerDirection::Backward => [
                (x, center_y),
                (x + length, center_y - half_width),
                (x + length, center_y + half_width),
            ],
        }
    }

    /// Centre of the leader dot, above the middle of the body.
    pub fn leader_center(&self, x: f64, center_y: f64) -> Point {
        let size = self.style.size;
        (x + size / 2.0, center_y - size / 2.0 - self.style.leader_gap)
    }

    /// Draws the glyph in fixed order. The vehicle record is only read.
    pub fn draw<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        vehicle: &Vehicle,
        x: f64,
        center_y: f64,
        leader: bool,
    ) -> RenderResult<()> {
        let body = self.body(x, center_y);
        surface.fill_rect(body, self.colorizer.color_for(vehicle.velocity))?;

        if vehicle.adaptive_cruise_control {
            surface.stroke_rect(body, ACC_OUTLINE, self.style.outline_width)?;
        }

        let direction = MarkerDirection::for_velocity(vehicle.velocity);
        surface.fill_triangle(self.marker(x, center_y, direction), MARKER)?;

        if leader {
            surface.fill_circle(
                self.leader_center(x, center_y),
                self.style.leader_radius,
                LEADER_DOT,
            )?;
        }
        Ok(())
    }
}
