// THEORY:
// The `PixelBuffer` owns one image worth of `Pixel`s in row-major order
// (index = row * width + col) and is the only place raw index arithmetic
// happens. Everything above it (the circumference generator, the codec, the
// image helper) talks in (x, y) coordinates and goes through the bounds-checked
// accessors, so a coordinate outside the image surfaces as `None` instead of
// silently addressing a neighboring row.
//
// Key architectural principles:
// 1.  **Normalized Storage**: Whatever channel layout the source had (gray,
//     gray + alpha, RGB, RGBA), pixels are stored as RGBA. The original channel
//     count is kept as metadata only.
// 2.  **Invariant**: `pixels.len() == width * height` from construction onward.
//     Loading validates the byte count up front and produces no buffer on error.
// 3.  **In-Place Manipulation**: Inversion, flipping, chroma keying, and
//     convolution mutate the buffer they are called on. Convolution reads from a
//     snapshot so that already-filtered neighbors never feed back into the sum.

use crate::core_modules::circumference::Coordinate;
use crate::core_modules::error::StegoError;
use crate::core_modules::kernel::Kernel;
use crate::core_modules::pixel::pixel::{Byte, CHANNELS, Channel, Hue, Pixel, SaturationHSV, ValueHSV};
use tracing::debug;

/// Bounds for `PixelBuffer::chroma_key`.
///
/// Only the hue range decides whether a pixel is keyed out; the saturation and
/// value bounds are carried for callers that describe a full HSV window but are
/// not consulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromaKey {
    pub hue_min: Hue,
    pub hue_max: Hue,
    pub saturation_min: SaturationHSV,
    pub saturation_max: SaturationHSV,
    pub value_min: ValueHSV,
    pub value_max: ValueHSV,
}

impl ChromaKey {
    /// Whether `hue` falls inside the inclusive hue window.
    pub fn matches_hue(&self, hue: Hue) -> bool {
        hue >= self.hue_min && hue <= self.hue_max
    }
}

/// An owned RGBA image held as a flat, row-major vector of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Channel count of the data this buffer was created or loaded from.
    source_channels: u8,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// A black, fully transparent buffer of `width * height` pixels.
    pub fn create(channels: u8, width: u32, height: u32) -> Self {
        let area = width as usize * height as usize;
        Self {
            width,
            height,
            source_channels: channels,
            pixels: vec![Pixel::default(); area],
        }
    }

    /// Reinterprets interleaved channel data as RGBA pixels.
    ///
    /// - 1 channel: R = G = B = value, alpha 255.
    /// - 2 channels: R = G = B = gray, alpha copied.
    /// - 3 channels: RGB copied, alpha 255.
    /// - 4 channels: copied as-is.
    pub fn load(raw: &[Byte], channels: u8, width: u32, height: u32) -> Result<Self, StegoError> {
        if !(1..=CHANNELS as u8).contains(&channels) {
            return Err(StegoError::UnsupportedChannels(channels));
        }
        let area = width as usize * height as usize;
        let expected = area * channels as usize;
        if raw.len() != expected {
            return Err(StegoError::DimensionMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let pixels: Vec<Pixel> = raw
            .chunks_exact(channels as usize)
            .map(|bytes| match *bytes {
                [gray] => Pixel::gray(gray),
                [gray, alpha] => Pixel::new(gray, gray, gray, alpha),
                [red, green, blue] => Pixel::new(red, green, blue, Channel::MAX),
                [red, green, blue, alpha] => Pixel::new(red, green, blue, alpha),
                _ => unreachable!("chunks_exact yields exactly `channels` bytes"),
            })
            .collect();

        debug!(width, height, channels, "Loaded pixel data");
        Ok(Self {
            width,
            height,
            source_channels: channels,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn source_channels(&self) -> u8 {
        self.source_channels
    }

    /// Number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// The pixel at column `x`, row `y`, or `None` outside the image.
    pub fn get(&self, x: i64, y: i64) -> Option<&Pixel> {
        self.index_of(x, y).map(|index| &self.pixels[index])
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Pixel> {
        self.index_of(x, y).map(move |index| &mut self.pixels[index])
    }

    pub fn pixel_at(&self, coordinate: Coordinate) -> Option<&Pixel> {
        self.get(coordinate.x, coordinate.y)
    }

    pub fn pixel_at_mut(&mut self, coordinate: Coordinate) -> Option<&mut Pixel> {
        self.get_mut(coordinate.x, coordinate.y)
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.index_of(coordinate.x, coordinate.y).is_some()
    }

    /// R, G, B, A per pixel in row-major order, the layout image writers expect.
    pub fn raw_interleaved(&self) -> Vec<Byte> {
        let mut raw = Vec::with_capacity(self.pixels.len() * CHANNELS);
        for pixel in &self.pixels {
            raw.extend_from_slice(&<[Byte; CHANNELS]>::from(*pixel));
        }
        raw
    }

    /// Replaces every color channel with `255 - value`. Alpha is untouched.
    pub fn invert(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = pixel.inverted();
        }
    }

    /// Reverses the row order.
    pub fn flip_vertical(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;
        if width == 0 {
            return;
        }
        for row in 0..height / 2 {
            let mirror = height - 1 - row;
            let (top, bottom) = self.pixels.split_at_mut(mirror * width);
            top[row * width..(row + 1) * width].swap_with_slice(&mut bottom[..width]);
        }
    }

    /// Sets alpha to 0 for pixels whose hue lies in the key's hue window and to
    /// 255 for every other pixel.
    pub fn chroma_key(&mut self, key: &ChromaKey) {
        let mut keyed = 0usize;
        for pixel in self.pixels.iter_mut() {
            if key.matches_hue(pixel.hsv().hue) {
                pixel.alpha = 0;
                keyed += 1;
            } else {
                pixel.alpha = Channel::MAX;
            }
        }
        debug!(keyed, total = self.pixels.len(), "Applied chroma key");
    }

    /// Convolves the color channels with `kernel`.
    ///
    /// The kernel is rotated by 180 degrees and normalized (see `Kernel`). Each
    /// pixel whose full neighborhood lies inside the image gets the rounded
    /// absolute weighted sum, clamped to 0..=255. Border pixels get R, G, B = 0.
    /// Alpha is never touched.
    pub fn convolve(&mut self, kernel: &Kernel) {
        let reflected = kernel.reflected().normalized();
        let half = reflected.half();
        let size = reflected.size();
        let width = self.width as usize;
        let height = self.height as usize;
        let source = self.pixels.clone();

        for row in 0..height {
            for col in 0..width {
                let index = row * width + col;
                let interior = row >= half
                    && col >= half
                    && row + half < height
                    && col + half < width;

                if !interior {
                    let pixel = &mut self.pixels[index];
                    pixel.red = 0;
                    pixel.green = 0;
                    pixel.blue = 0;
                    continue;
                }

                let mut sum_r = 0.0f32;
                let mut sum_g = 0.0f32;
                let mut sum_b = 0.0f32;
                for kernel_row in 0..size {
                    let source_row = row + kernel_row - half;
                    for kernel_col in 0..size {
                        let weight = reflected.weight(kernel_row, kernel_col);
                        let neighbor = &source[source_row * width + col + kernel_col - half];
                        sum_r += neighbor.red as f32 * weight;
                        sum_g += neighbor.green as f32 * weight;
                        sum_b += neighbor.blue as f32 * weight;
                    }
                }

                let pixel = &mut self.pixels[index];
                pixel.red = to_channel(sum_r);
                pixel.green = to_channel(sum_g);
                pixel.blue = to_channel(sum_b);
            }
        }
        debug!(width, height, size, "Convolved buffer");
    }
}

#[inline]
fn to_channel(sum: f32) -> Channel {
    sum.abs().round().clamp(0.0, Channel::MAX as f32) as Channel
}
