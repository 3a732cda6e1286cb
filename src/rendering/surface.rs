use crate::error::RenderResult;
use serde::{Deserialize, Serialize};

/// 8-bit RGB plus an opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn channels(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

pub type Point = (f64, f64);

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// One primitive issued against a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { rect: Rect, color: Rgba },
    StrokeRect { rect: Rect, color: Rgba, width: u32 },
    FillTriangle { points: [Point; 3], color: Rgba },
    FillCircle { center: Point, radius: u32, color: Rgba },
    Line { from: Point, to: Point, color: Rgba, width: f64 },
}

/// The drawing target a frame is rendered into.
///
/// Every renderer takes the surface explicitly, so a frame can be drawn into
/// a raster buffer for display or into a [`RecordingSurface`] for inspection.
/// Primitives that fall partly or wholly outside the surface are clipped.
pub trait RenderSurface {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Wipes the whole surface back to its background.
    fn clear(&mut self) -> RenderResult<()>;

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()>;

    /// Outlines `rect` without touching its interior.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: u32) -> RenderResult<()>;

    fn fill_triangle(&mut self, points: [Point; 3], color: Rgba) -> RenderResult<()>;

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgba) -> RenderResult<()>;

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> RenderResult<()>;
}

/// Keeps the commands issued since the last `clear`.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> RenderResult<()> {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: u32) -> RenderResult<()> {
        self.commands.push(DrawCommand::StrokeRect { rect, color, width });
        Ok(())
    }

    fn fill_triangle(&mut self, points: [Point; 3], color: Rgba) -> RenderResult<()> {
        self.commands.push(DrawCommand::FillTriangle { points, color });
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgba) -> RenderResult<()> {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> RenderResult<()> {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
        Ok(())
    }
}
