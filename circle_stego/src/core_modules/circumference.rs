// THEORY:
// The `CircumferenceGenerator` decides *which* pixels carry hidden bits and in
// *what order*. It rasterizes a set of concentric circles around the image
// centre with the integer midpoint (Bresenham) recurrence and concatenates
// their points, outermost circle first. The resulting `CircumferencePath` is
// the bit order of the embedding: position 0 holds header bit 0, position 32
// holds payload bit 0, and so on.
//
// Key architectural principles:
// 1.  **Determinism Is the Contract**: There is no "correct" circle to compare
//     against, only agreement between the encoder and decoder. Any change to the
//     centre, the radii, the recurrence, or the per-step emission order silently
//     breaks every previously encoded image.
// 2.  **Capacity Through Nesting**: Starting from `min(width, height) / 2 - 1`,
//     the radius shrinks by a fixed `radial_step` until it is no longer
//     positive. A step of 2 keeps neighboring rings from ever landing on the
//     same pixel.
// 3.  **Quarter Symmetry**: Each midpoint step emits the mirrored points
//     (cx+x, cy+y), (cx-x, cy+y), (cx+x, cy-y), (cx-x, cy-y). On the first step
//     (x == 0) the horizontal mirrors coincide, so only (cx, cy+y) and
//     (cx, cy-y) are emitted; every position in a ring addresses its own pixel.
// 4.  **Stateless Utility**: The generator only needs the image dimensions; it
//     never reads pixel data.

use crate::core_modules::error::StegoError;
use tracing::debug;

/// Bits reserved at the start of every path for the length header.
pub const HEADER_BITS: usize = 32;

/// Radial distance between neighboring rings.
pub const DEFAULT_RADIAL_STEP: u32 = 2;

/// A pixel position. Signed so that any geometry can be represented and then
/// rejected by the buffer instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
}

impl Coordinate {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The ordered pixel positions that carry the embedded bitstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircumferencePath {
    coordinates: Vec<Coordinate>,
}

impl CircumferencePath {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.coordinates.iter()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Payload bytes that fit after the header: `(len - 32) / 8`, or 0.
    pub fn capacity_bytes(&self) -> usize {
        self.coordinates.len().saturating_sub(HEADER_BITS) / 8
    }
}

impl<'a> IntoIterator for &'a CircumferencePath {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.coordinates.iter()
    }
}

/// Enumerates concentric midpoint circles around the image centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircumferenceGenerator {
    radial_step: u32,
}

impl Default for CircumferenceGenerator {
    fn default() -> Self {
        Self {
            radial_step: DEFAULT_RADIAL_STEP,
        }
    }
}

impl CircumferenceGenerator {
    pub fn new(radial_step: u32) -> Result<Self, StegoError> {
        if radial_step == 0 {
            return Err(StegoError::InvalidRadialStep);
        }
        Ok(Self { radial_step })
    }

    pub fn radial_step(&self) -> u32 {
        self.radial_step
    }

    /// Centre pixel of a `width x height` image (integer division).
    pub fn centre(width: u32, height: u32) -> Coordinate {
        Coordinate::new(width as i64 / 2, height as i64 / 2)
    }

    /// Radius of the outermost ring; non-positive means no ring fits.
    pub fn outer_radius(width: u32, height: u32) -> i64 {
        width.min(height) as i64 / 2 - 1
    }

    /// The full embedding path for an image of the given size, outermost ring first.
    pub fn path(&self, width: u32, height: u32) -> CircumferencePath {
        let centre = Self::centre(width, height);
        let outer = Self::outer_radius(width, height);
        let step = self.radial_step as i64;

        let mut coordinates = Vec::new();
        let mut rings = 0usize;
        let mut radius = outer;
        while radius > 0 {
            trace_circle(centre, radius, &mut coordinates);
            rings += 1;
            radius -= step;
        }

        debug!(
            width,
            height,
            outer_radius = outer,
            rings,
            coordinates = coordinates.len(),
            "Generated circumference path"
        );
        CircumferencePath { coordinates }
    }
}

/// Appends one midpoint circle of `radius` around `centre` to `out`.
fn trace_circle(centre: Coordinate, radius: i64, out: &mut Vec<Coordinate>) {
    let mut x = 0i64;
    let mut y = radius;
    let mut decision = 1 - radius;

    while x <= y {
        if x == 0 {
            out.push(Coordinate::new(centre.x, centre.y + y));
            out.push(Coordinate::new(centre.x, centre.y - y));
        } else {
            out.push(Coordinate::new(centre.x + x, centre.y + y));
            out.push(Coordinate::new(centre.x - x, centre.y + y));
            out.push(Coordinate::new(centre.x + x, centre.y - y));
            out.push(Coordinate::new(centre.x - x, centre.y - y));
        }

        if decision < 0 {
            decision += 2 * x + 3;
        } else {
            decision += 2 * (x - y) + 5;
            y -= 1;
        }
        x += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ring(radius: i64) -> Vec<Coordinate> {
        let mut out = Vec::new();
        trace_circle(Coordinate::new(0, 0), radius, &mut out);
        out
    }

    #[test]
    fn radius_one_ring() {
        assert_eq!(ring(1), vec![Coordinate::new(0, 1), Coordinate::new(0, -1)]);
    }

    #[test]
    fn radius_three_ring_follows_midpoint_recurrence() {
        // x=0,y=3 (d=-2) -> x=1,y=3 (d=1) -> x=2,y=2 (d=2) -> stop at x=3.
        let expected = vec![
            Coordinate::new(0, 3),
            Coordinate::new(0, -3),
            Coordinate::new(1, 3),
            Coordinate::new(-1, 3),
            Coordinate::new(1, -3),
            Coordinate::new(-1, -3),
            Coordinate::new(2, 2),
            Coordinate::new(-2, 2),
            Coordinate::new(2, -2),
            Coordinate::new(-2, -2),
        ];
        assert_eq!(ring(3), expected);
    }

    #[test]
    fn ring_points_lie_near_the_true_circle() {
        for radius in [5i64, 17, 48] {
            for point in ring(radius) {
                let distance = ((point.x * point.x + point.y * point.y) as f64).sqrt();
                assert!(
                    (distance - radius as f64).abs() < 1.0,
                    "{point:?} is {distance} from centre, radius {radius}"
                );
            }
        }
    }

    #[test]
    fn path_is_deterministic() {
        let generator = CircumferenceGenerator::default();
        assert_eq!(generator.path(120, 80), generator.path(120, 80));
        assert_eq!(
            generator.path(33, 47),
            CircumferenceGenerator::new(2).unwrap().path(33, 47)
        );
    }

    #[test]
    fn path_starts_with_outer_ring() {
        let path = CircumferenceGenerator::default().path(100, 100);
        assert_eq!(path.as_slice()[0], Coordinate::new(50, 99));
        assert_eq!(path.as_slice()[1], Coordinate::new(50, 1));
    }

    #[test]
    fn path_concatenates_descending_rings() {
        let generator = CircumferenceGenerator::new(3).unwrap();
        let path = generator.path(20, 20);
        let centre = Coordinate::new(10, 10);
        let mut expected = Vec::new();
        for radius in [9, 6, 3] {
            trace_circle(centre, radius, &mut expected);
        }
        assert_eq!(path.as_slice(), expected.as_slice());
    }

    #[test]
    fn path_stays_inside_the_image() {
        let generator = CircumferenceGenerator::default();
        for (width, height) in [(100, 100), (64, 48), (7, 5), (4, 9), (301, 200)] {
            for point in &generator.path(width, height) {
                assert!(point.x >= 0 && point.x < width as i64, "{point:?} in {width}x{height}");
                assert!(point.y >= 0 && point.y < height as i64, "{point:?} in {width}x{height}");
            }
        }
    }

    #[test]
    fn path_never_revisits_a_pixel() {
        let generator = CircumferenceGenerator::default();
        for (width, height) in [(100, 100), (64, 48), (7, 5), (301, 200)] {
            let path = generator.path(width, height);
            let unique: HashSet<_> = path.iter().collect();
            assert_eq!(unique.len(), path.len(), "{width}x{height}");
        }
    }

    #[test]
    fn tiny_images_have_no_path() {
        let generator = CircumferenceGenerator::default();
        assert!(generator.path(0, 0).is_empty());
        assert!(generator.path(3, 100).is_empty());
        assert_eq!(generator.path(4, 4).len(), 2);
        assert_eq!(generator.path(3, 100).capacity_bytes(), 0);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            CircumferenceGenerator::new(0),
            Err(StegoError::InvalidRadialStep)
        ));
    }
}
