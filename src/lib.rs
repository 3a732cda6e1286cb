pub mod communication;
pub mod config;
pub mod control_system;
pub mod error;
pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod rendering;

pub use config::{PositionMode, RenderConfig};
pub use control_system::frame_controller::{FrameController, FrameState, FrameStats};
pub use error::{RenderError, RenderResult};
pub use models::snapshot::{RoadId, RoadMetrics, Snapshot, Vehicle};
