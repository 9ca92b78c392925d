// THEORY:
// This file is the entry point for the `circle_stego` library crate. The
// building blocks live in `core_modules` (pixels, the buffer, kernels, the
// circle geometry, and the image file helper); `codec` sits on top and is the
// interface most callers need: load a cover, `encode` a payload into it, save
// it, and later `decode` the payload back out.
//
// Loading and saving files is a thin layer over the `image` crate. The embedding
// only survives lossless formats, so saving always writes PNG.

pub mod codec;
pub mod core_modules;

pub use codec::{CodecConfig, SteganographicCodec};
pub use core_modules::circumference::{
    CircumferenceGenerator, CircumferencePath, Coordinate, DEFAULT_RADIAL_STEP, HEADER_BITS,
};
pub use core_modules::error::StegoError;
pub use core_modules::kernel::Kernel;
pub use core_modules::pixel::pixel::{Hsv, Pixel};
pub use core_modules::pixel_buffer::{ChromaKey, PixelBuffer};
pub use core_modules::utils::image_helper::image_helper;
