pub mod image_helper {
    use crate::core_modules::error::StegoError;
    use crate::core_modules::pixel_buffer::PixelBuffer;
    use image::{DynamicImage, ImageEncoder};
    use std::io::BufWriter;
    use std::path::Path;
    use tracing::debug;

    /// Decodes any format the `image` crate understands into a `PixelBuffer`.
    ///
    /// 8-bit gray, gray + alpha, RGB and RGBA keep their channel count; every
    /// other layout (16-bit, float) is converted to RGBA8 first.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, StegoError> {
        let path = path.as_ref();
        let decoded = image::open(path)?;
        let (width, height) = (decoded.width(), decoded.height());

        let (raw, channels) = match decoded {
            DynamicImage::ImageLuma8(img) => (img.into_raw(), 1),
            DynamicImage::ImageLumaA8(img) => (img.into_raw(), 2),
            DynamicImage::ImageRgb8(img) => (img.into_raw(), 3),
            DynamicImage::ImageRgba8(img) => (img.into_raw(), 4),
            other => (other.to_rgba8().into_raw(), 4),
        };

        debug!(path = %path.display(), width, height, channels, "Decoded image");
        PixelBuffer::load(&raw, channels, width, height)
    }

    /// Writes `buffer` as an RGBA8 PNG, whatever the file extension says.
    pub fn save<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<(), StegoError> {
        let path = path.as_ref();
        let output = BufWriter::new(std::fs::File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            &buffer.raw_interleaved(),
            buffer.width(),
            buffer.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        debug!(path = %path.display(), width = buffer.width(), height = buffer.height(), "Wrote PNG");
        Ok(())
    }
}
