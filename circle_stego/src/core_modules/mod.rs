pub mod circumference;
pub mod error;
pub mod kernel;
pub mod pixel;
pub mod pixel_buffer;
pub mod utils;
