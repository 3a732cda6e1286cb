use crate::error::{RenderError, RenderResult};
use crate::rendering::surface::{Point, Rect, RenderSurface, Rgba};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

/// RGB raster canvas drawn through plotters' bitmap backend.
#[derive(Debug, Clone)]
pub struct BitmapSurface {
    width: u32,
    height: u32,
    background: Rgba,
    buffer: Vec<u8>,
}

impl BitmapSurface {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        for pixel in buffer.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[background.r, background.g, background.b]);
        }
        Self {
            width,
            height,
            background,
            buffer,
        }
    }

    /// Raw RGB bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        Some((
            self.buffer[offset],
            self.buffer[offset + 1],
            self.buffer[offset + 2],
        ))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let image = image::RgbImage::from_raw(self.width, self.height, self.buffer.clone())
            .ok_or_else(|| RenderError::Drawing("frame buffer has the wrong size".into()))?;
        image.save(path)?;
        Ok(())
    }

    // Opens a plotters drawing area over the buffer for the duration of one primitive.
    fn with_area<F, E>(&mut self, draw: F) -> RenderResult<()>
    where
        F: for<'b> FnOnce(&DrawingArea<BitMapBackend<'b>, Shift>) -> Result<(), E>,
        E: Display,
    {
        let size = (self.width, self.height);
        let root = BitMapBackend::with_buffer(&mut self.buffer, size).into_drawing_area();
        draw(&root).map_err(|e| RenderError::Drawing(e.to_string()))?;
        root.present().map_err(|e| RenderError::Drawing(e.to_string()))
    }
}

fn paint(color: Rgba) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a)
}

fn pixel_point((x, y): Point) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

// A filled plotters rectangle stops short of its far corner, so `[x, right)`
// maps onto exactly `rect.width` columns.
fn pixel_corners(rect: Rect) -> [(i32, i32); 2] {
    [
        pixel_point((rect.x, rect.y)),
        pixel_point((rect.right(), rect.bottom())),
    ]
}

impl RenderSurface for BitmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) -> RenderResult<()> {
        let background = self.background;
        self.with_area(|root| root.fill(&RGBColor(background.r, background.g, background.b)))
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> RenderResult<()> {
        let corners = pixel_corners(rect);
        self.with_area(|root| root.draw(&Rectangle::new(corners, paint(color).filled())))
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, width: u32) -> RenderResult<()> {
        let corners = pixel_corners(rect);
        let style = paint(color).stroke_width(width.max(1));
        self.with_area(|root| root.draw(&Rectangle::new(corners, style)))
    }

    fn fill_triangle(&mut self, points: [Point; 3], color: Rgba) -> RenderResult<()> {
        let vertices: Vec<(i32, i32)> = points.iter().copied().map(pixel_point).collect();
        self.with_area(|root| root.draw(&Polygon::new(vertices, paint(color).filled())))
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgba) -> RenderResult<()> {
        let center = pixel_point(center);
        self.with_area(|root| root.draw(&Circle::new(center, radius, paint(color).filled())))
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) -> RenderResult<()> {
        let path = vec![pixel_point(from), pixel_point(to)];
        let stroke = width.round().max(1.0) as u32;
        self.with_area(|root| {
            root.draw(&PathElement::new(path, paint(color).stroke_width(stroke)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_and_clears_to_background() {
        let mut surface = BitmapSurface::new(40, 30, Rgba::WHITE);
        assert_eq!(surface.pixel(0, 0), Some((255, 255, 255)));
        surface
            .fill_rect(Rect::new(0.0, 0.0, 40.0, 30.0), Rgba::RED)
            .unwrap();
        assert_eq!(surface.pixel(39, 29), Some((255, 0, 0)));
        surface.clear().unwrap();
        assert!(surface.pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn filled_rect_covers_exactly_its_extent() {
        let mut surface = BitmapSurface::new(40, 40, Rgba::WHITE);
        surface
            .fill_rect(Rect::new(10.0, 10.0, 10.0, 10.0), Rgba::rgb(0, 255, 0))
            .unwrap();
        assert_eq!(surface.pixel(10, 10), Some((0, 255, 0)));
        assert_eq!(surface.pixel(19, 19), Some((0, 255, 0)));
        assert_eq!(surface.pixel(20, 20), Some((255, 255, 255)));
        assert_eq!(surface.pixel(9, 10), Some((255, 255, 255)));
        assert_eq!(surface.pixel(20, 15), Some((255, 255, 255)));
        assert_eq!(surface.pixel(15, 20), Some((255, 255, 255)));
    }

    #[test]
    fn adjacent_fills_share_no_pixels_and_leave_no_gap() {
        let mut surface = BitmapSurface::new(40, 10, Rgba::WHITE);
        surface
            .fill_rect(Rect::new(0.0, 0.0, 20.0, 10.0), Rgba::RED)
            .unwrap();
        surface
            .fill_rect(Rect::new(20.0, 0.0, 20.0, 10.0), Rgba::BLUE)
            .unwrap();
        for y in 0..10 {
            assert_eq!(surface.pixel(19, y), Some((255, 0, 0)));
            assert_eq!(surface.pixel(20, y), Some((0, 0, 255)));
            assert_eq!(surface.pixel(39, y), Some((0, 0, 255)));
        }
    }

    #[test]
    fn off_canvas_primitives_are_clipped() {
        let mut surface = BitmapSurface::new(20, 20, Rgba::WHITE);
        surface
            .fill_rect(Rect::new(15.0, 5.0, 20.0, 5.0), Rgba::BLACK)
            .unwrap();
        surface
            .fill_circle((100.0, 100.0), 5, Rgba::BLACK)
            .unwrap();
        assert_eq!(surface.pixel(19, 6), Some((0, 0, 0)));
        assert_eq!(surface.pixel(20, 6), None);
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let mut surface = BitmapSurface::new(10, 10, Rgba::WHITE);
        surface
            .fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Rgba::rgba(0, 0, 0, 0.5))
            .unwrap();
        let (r, g, b) = surface.pixel(5, 5).unwrap();
        assert!(r > 0 && r < 255);
        assert_eq!((r, r), (g, b));
    }
}
