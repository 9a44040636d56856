use thiserror::Error;

/// Unified result type for the tickcanvas crate.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Errors surfaced by layout, text fitting and drawing.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A split request whose sizes cannot be resolved (zero total proportion,
    /// or fixed sizes overflowing the available extent).
    #[error("degenerate layout: {0}")]
    DegenerateLayout(String),
    /// The surface could not measure text, or reported unusable extents.
    #[error("text measurement failed: {0}")]
    MeasurementFailure(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("invalid text options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
