// THEORY:
// Every failure the engine can report lives in one enum. Capacity and path
// checks run before a single pixel is touched, so any error returned from an
// encode means the cover buffer is exactly as the caller handed it in.
// Reading a foreign image is deliberately *not* an error: without a checksum
// there is nothing to detect, and decode simply returns whatever bytes the
// LSBs spell out.

/// Errors that can occur while building buffers or embedding/extracting payloads.
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    #[error("payload needs {required} bytes but the cover image only holds {available}")]
    CapacityExceeded { required: usize, available: usize },

    #[error("circumference path has {coordinates} coordinates, at least {required} are needed for the header")]
    PathTooShort { coordinates: usize, required: usize },

    #[error("coordinate ({x}, {y}) lies outside the {width}x{height} image")]
    CoordinateOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("pixel data has {actual} bytes, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("radial step must be a positive integer")]
    InvalidRadialStep,

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
