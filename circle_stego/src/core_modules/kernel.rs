// THEORY:
// A `Kernel` is a validated square weight matrix for `PixelBuffer::convolve`.
// Convolution proper flips the kernel by 180 degrees before sliding it over the
// image; because the weights are stored row-major, that rotation is just the
// weight vector read backwards. Normalization divides by the larger of the
// positive-weight sum and the negative-weight magnitude, which keeps the
// absolute response of any kernel within the input channel range for most
// inputs (the buffer still clamps the result).

use crate::core_modules::error::StegoError;

pub type Weight = f32;

/// A square `size x size` convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<Weight>,
}

impl Kernel {
    /// Builds a kernel from row-major weights.
    pub fn new(size: usize, weights: Vec<Weight>) -> Result<Self, StegoError> {
        if size == 0 || size % 2 == 0 {
            return Err(StegoError::InvalidKernel(format!(
                "side length must be odd, got {size}"
            )));
        }
        if weights.len() != size * size {
            return Err(StegoError::InvalidKernel(format!(
                "{size}x{size} kernel needs {} weights, got {}",
                size * size,
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// Builds a kernel from a square matrix given as rows.
    pub fn from_rows<R: AsRef<[Weight]>>(rows: &[R]) -> Result<Self, StegoError> {
        let size = rows.len();
        let mut weights = Vec::with_capacity(size * size);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(StegoError::InvalidKernel(format!(
                    "row {index} has {} weights, expected {size}",
                    row.len()
                )));
            }
            weights.extend_from_slice(row);
        }
        Self::new(size, weights)
    }

    /// A kernel with a single 1.0 in the centre.
    pub fn identity(size: usize) -> Result<Self, StegoError> {
        let mut weights = vec![0.0; size * size];
        if let Some(centre) = weights.get_mut((size * size) / 2) {
            *centre = 1.0;
        }
        Self::new(size, weights)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Half the side length, the neighborhood radius around the centre cell.
    pub fn half(&self) -> usize {
        self.size / 2
    }

    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Weight at `row`, `col` (both `< size`).
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> Weight {
        self.weights[row * self.size + col]
    }

    /// The kernel rotated by 180 degrees.
    pub fn reflected(&self) -> Self {
        Self {
            size: self.size,
            weights: self.weights.iter().rev().copied().collect(),
        }
    }

    /// Sum of the positive weights and magnitude of the sum of the negative ones.
    pub fn signed_sums(&self) -> (Weight, Weight) {
        self.weights
            .iter()
            .fold((0.0, 0.0), |(positive, negative), &weight| {
                if weight > 0.0 {
                    (positive + weight, negative)
                } else {
                    (positive, negative - weight)
                }
            })
    }

    /// The kernel scaled by `1 / max(positive_sum, negative_magnitude)`.
    /// A kernel of all zeros is returned unchanged.
    pub fn normalized(&self) -> Self {
        let (positive, negative) = self.signed_sums();
        let magnitude = positive.max(negative);
        let scale = if magnitude > 0.0 { 1.0 / magnitude } else { 1.0 };
        Self {
            size: self.size,
            weights: self.weights.iter().map(|weight| weight * scale).collect(),
        }
    }
}
