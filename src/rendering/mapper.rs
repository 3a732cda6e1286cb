use crate::config::{PositionMode, RenderConfig};

/// Simulation-space position to canvas x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    canvas_width: f64,
    road_length: f64,
    cell_width: f64,
    mode: PositionMode,
}

impl CoordinateMapper {
    pub fn new(canvas_width: u32, road_length: u32, mode: PositionMode) -> Self {
        let canvas_width = canvas_width as f64;
        let road_length = road_length.max(1) as f64;
        Self {
            canvas_width,
            road_length,
            cell_width: canvas_width / road_length,
            mode,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.canvas_width(), config.road_length, config.position_mode)
    }

    /// Pixel width of one cell, shared by the grid and the glyphs.
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Raw mapping; may fall outside the canvas for out-of-range positions.
    pub fn x_for(&self, position: f64) -> f64 {
        match self.mode {
            PositionMode::Cell => position * self.cell_width,
            PositionMode::Continuous => position / self.road_length * self.canvas_width,
        }
    }

    /// Mapped x when it lands on the canvas, `None` otherwise.
    pub fn pixel_x(&self, position: f64) -> Option<f64> {
        let x = self.x_for(position);
        if x.is_finite() && x >= 0.0 && x < self.canvas_width {
            Some(x)
        } else {
            None
        }
    }

    /// x of every cell boundary from 0 to L inclusive.
    pub fn cell_boundaries(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.road_length as u32).map(move |i| i as f64 * self.cell_width)
    }
}
