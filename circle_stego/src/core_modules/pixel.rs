// THEORY (Single-Pixel Container):
// The `Pixel` module is the smallest unit the engine works with: four 8-bit
// channels and the handful of single-pixel transforms the buffer operations
// build on. Nothing here looks at neighbors; anything spatial (flipping,
// convolution, path selection) lives in `PixelBuffer` or the generator.
//
// What lives here:
// - Raw channels (RGBA), always four, whatever the source image carried.
// - HSV conversion, used by chroma keying.
// - Red-channel LSB access, the only bit the steganographic codec ever changes.
//
// HSV follows the textbook definition on normalized (0..1) sRGB values:
// value is the max channel, saturation is chroma / value, hue is the sector
// angle in degrees [0, 360). Black and pure grays have hue 0.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type NormalizedChannel = f32;
    pub type Hue = f32;
    pub type SaturationHSV = f32;
    pub type ValueHSV = f32;

    pub const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    /// A pixel expressed in the HSV color model.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Hsv {
        /// Angle on the color wheel in degrees [0, 360).
        pub hue: Hue,
        /// Chroma relative to value, [0, 1].
        pub saturation: SaturationHSV,
        /// Maximum normalized channel, [0, 1].
        pub value: ValueHSV,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// An opaque gray pixel (R = G = B = `level`, alpha 255).
        pub fn gray(level: Channel) -> Self {
            Pixel::new(level, level, level, Channel::MAX)
        }

        /// Converts the color channels to HSV. Alpha is ignored.
        ///
        /// - `value == 0` (black) yields hue 0 and saturation 0.
        /// - Achromatic pixels (`max == min`) yield hue 0.
        pub fn hsv(&self) -> Hsv {
            let red = self.red as NormalizedChannel / 255.0;
            let green = self.green as NormalizedChannel / 255.0;
            let blue = self.blue as NormalizedChannel / 255.0;

            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            if maximum_channel == 0.0 {
                return Hsv {
                    hue: 0.0,
                    saturation: 0.0,
                    value: 0.0,
                };
            }

            let saturation = chroma / maximum_channel;
            if chroma == 0.0 {
                return Hsv {
                    hue: 0.0,
                    saturation,
                    value: maximum_channel,
                };
            }

            let (base_difference, sector_offset) = if maximum_channel == red {
                (green - blue, 0.0)
            } else if maximum_channel == green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue_degrees = (base_difference / chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            if hue_degrees >= 360.0 {
                hue_degrees -= 360.0;
            }

            Hsv {
                hue: hue_degrees,
                saturation,
                value: maximum_channel,
            }
        }

        /// Color channels replaced by `255 - value`; alpha untouched.
        pub fn inverted(&self) -> Self {
            Pixel::new(
                Channel::MAX - self.red,
                Channel::MAX - self.green,
                Channel::MAX - self.blue,
                self.alpha,
            )
        }

        /// The least-significant bit of the red channel.
        #[inline]
        pub fn red_lsb(&self) -> bool {
            self.red & 1 == 1
        }

        /// Replaces only the least-significant bit of the red channel.
        #[inline]
        pub fn set_red_lsb(&mut self, bit: bool) {
            self.red = (self.red & !1) | bit as Channel;
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<Pixel> for [Byte; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn pure_red_is_hue_zero_fully_saturated() {
        let hsv = Pixel::new(255, 0, 0, 255).hsv();
        assert_close(hsv.hue, 0.0);
        assert_close(hsv.saturation, 1.0);
        assert_close(hsv.value, 1.0);
    }

    #[test]
    fn black_has_no_hue_or_saturation() {
        let hsv = Pixel::new(0, 0, 0, 255).hsv();
        assert_eq!(hsv.hue, 0.0);
        assert_eq!(hsv.saturation, 0.0);
        assert_eq!(hsv.value, 0.0);
    }

    #[test]
    fn gray_is_achromatic() {
        let hsv = Pixel::gray(128).hsv();
        assert_eq!(hsv.hue, 0.0);
        assert_eq!(hsv.saturation, 0.0);
        assert_close(hsv.value, 128.0 / 255.0);
    }

    #[test]
    fn primary_and_secondary_hues() {
        assert_close(Pixel::new(0, 255, 0, 255).hsv().hue, 120.0);
        assert_close(Pixel::new(0, 0, 255, 255).hsv().hue, 240.0);
        assert_close(Pixel::new(255, 255, 0, 255).hsv().hue, 60.0);
        assert_close(Pixel::new(255, 0, 255, 255).hsv().hue, 300.0);
    }

    #[test]
    fn half_saturated_orange() {
        let hsv = Pixel::new(200, 150, 100, 255).hsv();
        assert_close(hsv.hue, 30.0);
        assert_close(hsv.saturation, 0.5);
        assert_close(hsv.value, 200.0 / 255.0);
    }

    #[test]
    fn inverted_keeps_alpha() {
        let pixel = Pixel::new(10, 20, 30, 40);
        assert_eq!(pixel.inverted(), Pixel::new(245, 235, 225, 40));
        assert_eq!(pixel.inverted().inverted(), pixel);
    }

    #[test]
    fn red_lsb_only_touches_lowest_red_bit() {
        let mut pixel = Pixel::new(0b1010_1010, 7, 8, 9);
        assert!(!pixel.red_lsb());

        pixel.set_red_lsb(true);
        assert_eq!(pixel, Pixel::new(0b1010_1011, 7, 8, 9));
        assert!(pixel.red_lsb());

        pixel.set_red_lsb(false);
        assert_eq!(pixel, Pixel::new(0b1010_1010, 7, 8, 9));
    }

    #[test]
    fn byte_array_conversions() {
        let pixel = Pixel::from([1, 2, 3, 4]);
        assert_eq!(pixel, Pixel::new(1, 2, 3, 4));
        let bytes: [Byte; CHANNELS] = pixel.into();
        assert_eq!(bytes, [1, 2, 3, 4]);
    }
}
