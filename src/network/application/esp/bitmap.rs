//! 5×5 monochrome bitmaps and their compact integer encoding.

/// Width and height of a bitmap.
pub const SIZE: usize = 5;

/// A 5×5 grid of on/off pixels, indexed by column `x` then row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitmap {
    pixels: [[bool; SIZE]; SIZE],
}

impl Bitmap {
    /// A bitmap with every pixel off.
    pub const fn new() -> Self {
        Self {
            pixels: [[false; SIZE]; SIZE],
        }
    }

    /// Build a bitmap from a column-major pixel grid.
    pub const fn from_columns(pixels: [[bool; SIZE]; SIZE]) -> Self {
        Self { pixels }
    }

    /// Whether the pixel at (`x`, `y`) is on. Out-of-range coordinates read
    /// as off.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(x)
            .and_then(|column| column.get(y))
            .copied()
            .unwrap_or(false)
    }

    /// Set the pixel at (`x`, `y`). Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if let Some(pixel) = self.pixels.get_mut(x).and_then(|column| column.get_mut(y)) {
            *pixel = on;
        }
    }

    /// Pack the grid into the low 25 bits of an integer.
    ///
    /// Pixels are visited column by column, top to bottom; the first pixel
    /// ends up in the most significant bit.
    pub fn encode(&self) -> u32 {
        self.pixels
            .iter()
            .flatten()
            .fold(0, |bits, &on| (bits << 1) | u32::from(on))
    }

    /// Unpack a grid produced by [`encode`](Self::encode). Bits above the
    /// low 25 are ignored.
    pub fn decode(mut bits: u32) -> Self {
        let mut bitmap = Self::new();
        for x in (0..SIZE).rev() {
            for y in (0..SIZE).rev() {
                bitmap.pixels[x][y] = bits & 0x01 == 1;
                bits >>= 1;
            }
        }
        bitmap
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Bitmap {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Bitmap({=u32:#x})", self.encode())
    }
}
