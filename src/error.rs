use thiserror::Error;

/// Everything that can go wrong between a received payload and committed pixels.
///
/// None of these are fatal to the viewer: a rejected snapshot leaves the
/// previous frame on screen, a transport fault is logged and left to the
/// broker connection to sort out.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Payload without a numeric `step` or without the per-road arrays.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Connection drop or handshake failure on the snapshot stream.
    #[error("transport error: {0}")]
    Transport(#[from] amiquip::Error),

    /// The drawing backend refused a primitive.
    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
