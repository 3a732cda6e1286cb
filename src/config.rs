use crate::error::{RenderError, RenderResult};
use crate::global_variables::DEFAULT_FRAME_OUTPUT;
use crate::models::snapshot::RoadId;
use crate::rendering::surface::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Largest canvas side, in pixels, that a config may describe.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// How a vehicle's `position` relates to the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    /// Positions are cell indices: `x = position * cell_width`.
    Cell,
    /// Positions are continuous offsets along the road: `x = position / L * W`.
    Continuous,
}

/// Render-session constants. Built once, handed to the frame controller,
/// never re-derived inside the drawing code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Road length `L` in cells.
    pub road_length: u32,
    /// Maximum speed `vmax`, the green end of the colour gradient.
    pub max_speed: f64,
    /// Velocity at which the gradient is pure yellow.
    pub gradient_midpoint: f64,
    /// Pixel width of one cell.
    pub cell_width: u32,
    pub canvas_height: u32,
    /// Height of each translucent lane band.
    pub road_height: u32,
    pub position_mode: PositionMode,
    /// Leader dot on/off, indexed by road.
    pub highlight_leaders: [bool; 2],
    /// Append `Max-Vel` to the metrics lines.
    pub show_max_speed: bool,
    pub arrow_length: f64,
    pub arrow_half_width: f64,
    pub leader_radius: u32,
    /// Gap between the top of a glyph and the centre of the leader dot.
    pub leader_gap: f64,
    pub outline_width: u32,
    pub grid_width: f64,
    pub background: Rgba,
    /// Optional CSV file receiving one metrics row per road per frame.
    pub metrics_csv: Option<PathBuf>,
    pub frame_output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            road_length: 100,
            max_speed: 3.0,
            gradient_midpoint: 2.0,
            cell_width: 20,
            canvas_height: 600,
            road_height: 120,
            position_mode: PositionMode::Cell,
            highlight_leaders: [true, true],
            show_max_speed: true,
            arrow_length: 8.0,
            arrow_half_width: 6.0,
            leader_radius: 5,
            leader_gap: 10.0,
            outline_width: 3,
            grid_width: 1.5,
            background: Rgba::WHITE,
            metrics_csv: None,
            frame_output: PathBuf::from(DEFAULT_FRAME_OUTPUT),
        }
    }
}

impl RenderConfig {
    /// Loads a (possibly partial) JSON config; missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let raw = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.road_length == 0 {
            return Err(RenderError::Config("road_length must be positive".into()));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(RenderError::Config(format!(
                "max_speed must be a positive number, got {}",
                self.max_speed
            )));
        }
        if !(self.gradient_midpoint > 0.0 && self.gradient_midpoint <= self.max_speed) {
            return Err(RenderError::Config(format!(
                "gradient_midpoint {} must lie in (0, {}]",
                self.gradient_midpoint, self.max_speed
            )));
        }
        if self.cell_width == 0 || self.canvas_height == 0 {
            return Err(RenderError::Config("canvas dimensions must be positive".into()));
        }
        match self.road_length.checked_mul(self.cell_width) {
            Some(width) if width <= MAX_CANVAS_SIDE => {}
            _ => {
                return Err(RenderError::Config(format!(
                    "road_length {} x cell_width {} exceeds the {} px canvas limit",
                    self.road_length, self.cell_width, MAX_CANVAS_SIDE
                )));
            }
        }
        if self.canvas_height > MAX_CANVAS_SIDE {
            return Err(RenderError::Config(format!(
                "canvas_height {} exceeds the {} px canvas limit",
                self.canvas_height, MAX_CANVAS_SIDE
            )));
        }
        if self.road_height == 0 || self.road_height > self.canvas_height / 3 {
            return Err(RenderError::Config(format!(
                "road_height {} must be in 1..={} so the lane bands do not overlap",
                self.road_height,
                self.canvas_height / 3
            )));
        }
        Ok(())
    }

    /// Canvas width `W = L * cell_width`. Saturates on configs that `validate` rejects.
    pub fn canvas_width(&self) -> u32 {
        self.road_length.saturating_mul(self.cell_width)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width(), self.canvas_height)
    }

    /// Y centre of a road's lane band: one third and two thirds down the canvas.
    pub fn lane_center(&self, road: RoadId) -> f64 {
        let height = self.canvas_height as f64;
        match road {
            RoadId::Road1 => height / 3.0,
            RoadId::Road2 => 2.0 * height / 3.0,
        }
    }

    /// Side length of a vehicle square. Capped so it never leaves the lane band.
    pub fn glyph_size(&self) -> f64 {
        self.cell_width.min(self.road_height) as f64
    }
}
