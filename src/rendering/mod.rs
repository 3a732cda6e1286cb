pub mod bitmap;
pub mod colorizer;
pub mod glyph;
pub mod mapper;
pub mod scene;
pub mod surface;

pub use bitmap::BitmapSurface;
pub use surface::{DrawCommand, RecordingSurface, RenderSurface, Rgba};
