// THEORY:
// The `codec` module is the top-level API of the engine. It ties the
// circumference generator to the pixel buffer and defines the embedding
// convention:
//
//   position 0..32      32-bit header, least-significant bit first
//   position 32..       payload bits, bytes in order, LSB first within a byte
//
// Each position stores exactly one bit in the least-significant bit of the red
// channel of the pixel at that path coordinate. Green, blue, alpha, and every
// pixel off the path are never written.
//
// The header holds `32 + 8 * payload_len + 1`. Decode turns it back into a byte
// count with `(header - 32) / 8`, which drops the trailing odd bit. A header
// read from an image this engine never touched is clamped to the path capacity
// and produces garbage bytes; there is no checksum to tell the difference.
//
// All validation (path length, capacity, bounds) happens before the first
// write, so a failed encode leaves the cover buffer untouched.

use crate::core_modules::circumference::{
    CircumferenceGenerator, CircumferencePath, Coordinate, DEFAULT_RADIAL_STEP, HEADER_BITS,
};
use crate::core_modules::error::StegoError;
use crate::core_modules::pixel_buffer::PixelBuffer;
use tracing::{debug, warn};

const BITS_PER_BYTE: usize = 8;

/// Configuration for the SteganographicCodec.
///
/// Encoder and decoder must use the same configuration; a mismatch yields a
/// different path and silently corrupted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Radial distance between neighboring rings of the embedding path.
    pub radial_step: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            radial_step: DEFAULT_RADIAL_STEP,
        }
    }
}

/// Embeds and extracts length-prefixed payloads along a circumference path.
#[derive(Debug, Clone)]
pub struct SteganographicCodec {
    generator: CircumferenceGenerator,
    config: CodecConfig,
}

impl Default for SteganographicCodec {
    fn default() -> Self {
        Self {
            generator: CircumferenceGenerator::default(),
            config: CodecConfig::default(),
        }
    }
}

impl SteganographicCodec {
    pub fn new(config: CodecConfig) -> Result<Self, StegoError> {
        Ok(Self {
            generator: CircumferenceGenerator::new(config.radial_step)?,
            config,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The embedding path for `buffer`'s dimensions.
    pub fn path_for(&self, buffer: &PixelBuffer) -> CircumferencePath {
        self.generator.path(buffer.width(), buffer.height())
    }

    /// Largest payload, in bytes, that `buffer` can carry.
    pub fn capacity(&self, buffer: &PixelBuffer) -> usize {
        self.path_for(buffer).capacity_bytes()
    }

    /// Hides `payload` in `buffer` and returns the header value written.
    pub fn encode(&self, buffer: &mut PixelBuffer, payload: &[u8]) -> Result<u32, StegoError> {
        let path = self.path_for(buffer);
        validate_path(&path, buffer)?;

        let available = path.capacity_bytes();
        if payload.len() > available {
            return Err(StegoError::CapacityExceeded {
                required: payload.len(),
                available,
            });
        }

        let payload_end = HEADER_BITS + payload.len() * BITS_PER_BYTE;
        let header = u32::try_from(payload_end + 1).map_err(|_| StegoError::CapacityExceeded {
            required: payload.len(),
            available: (u32::MAX as usize - HEADER_BITS - 1) / BITS_PER_BYTE,
        })?;

        let coordinates = path.as_slice();
        let payload_bits = payload
            .iter()
            .flat_map(|&byte| (0..BITS_PER_BYTE).map(move |bit| (byte >> bit) & 1 == 1));
        write_bits(buffer, &coordinates[HEADER_BITS..payload_end], payload_bits)?;

        let header_bits = (0..HEADER_BITS).map(|bit| (header >> bit) & 1 == 1);
        write_bits(buffer, &coordinates[..HEADER_BITS], header_bits)?;

        debug!(
            payload_bytes = payload.len(),
            capacity = available,
            header,
            "Embedded payload"
        );
        Ok(header)
    }

    /// Reads the 32-bit header from the first path positions.
    pub fn read_header(&self, buffer: &PixelBuffer) -> Result<u32, StegoError> {
        let path = self.path_for(buffer);
        validate_path(&path, buffer)?;
        read_header_bits(buffer, &path)
    }

    /// Extracts the payload hidden in `buffer`. Never mutates the buffer.
    pub fn decode(&self, buffer: &PixelBuffer) -> Result<Vec<u8>, StegoError> {
        let path = self.path_for(buffer);
        validate_path(&path, buffer)?;

        let header = read_header_bits(buffer, &path)?;
        let announced = (header as usize).saturating_sub(HEADER_BITS) / BITS_PER_BYTE;
        let available = path.capacity_bytes();
        if (header as usize) < HEADER_BITS || announced > available {
            warn!(
                header,
                capacity = available,
                "Header does not describe a payload that fits this image; output is likely garbage"
            );
        }
        let byte_count = announced.min(available);

        let coordinates = path.as_slice();
        let mut payload = Vec::with_capacity(byte_count);
        for chunk in coordinates[HEADER_BITS..HEADER_BITS + byte_count * BITS_PER_BYTE]
            .chunks_exact(BITS_PER_BYTE)
        {
            let mut byte = 0u8;
            for (bit, &coordinate) in chunk.iter().enumerate() {
                if read_bit(buffer, coordinate)? {
                    byte |= 1 << bit;
                }
            }
            payload.push(byte);
        }

        debug!(header, payload_bytes = payload.len(), "Extracted payload");
        Ok(payload)
    }
}

/// Rejects paths too short for the header or reaching outside the buffer.
fn validate_path(path: &CircumferencePath, buffer: &PixelBuffer) -> Result<(), StegoError> {
    if path.len() < HEADER_BITS {
        return Err(StegoError::PathTooShort {
            coordinates: path.len(),
            required: HEADER_BITS,
        });
    }
    if let Some(outside) = path.iter().find(|&&coordinate| !buffer.contains(coordinate)) {
        return Err(out_of_bounds(*outside, buffer));
    }
    Ok(())
}

fn out_of_bounds(coordinate: Coordinate, buffer: &PixelBuffer) -> StegoError {
    StegoError::CoordinateOutOfBounds {
        x: coordinate.x,
        y: coordinate.y,
        width: buffer.width(),
        height: buffer.height(),
    }
}

fn write_bits(
    buffer: &mut PixelBuffer,
    coordinates: &[Coordinate],
    bits: impl Iterator<Item = bool>,
) -> Result<(), StegoError> {
    for (&coordinate, bit) in coordinates.iter().zip(bits) {
        if !buffer.contains(coordinate) {
            return Err(out_of_bounds(coordinate, buffer));
        }
        if let Some(pixel) = buffer.pixel_at_mut(coordinate) {
            pixel.set_red_lsb(bit);
        }
    }
    Ok(())
}

fn read_bit(buffer: &PixelBuffer, coordinate: Coordinate) -> Result<bool, StegoError> {
    buffer
        .pixel_at(coordinate)
        .map(|pixel| pixel.red_lsb())
        .ok_or_else(|| out_of_bounds(coordinate, buffer))
}

fn read_header_bits(buffer: &PixelBuffer, path: &CircumferencePath) -> Result<u32, StegoError> {
    let mut header = 0u32;
    for (bit, &coordinate) in path.as_slice()[..HEADER_BITS].iter().enumerate() {
        if read_bit(buffer, coordinate)? {
            header |= 1 << bit;
        }
    }
    Ok(header)
}
