use log::trace;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 bitmap. Each row is packed into a `u64`, with the
/// leftmost pixel in the most significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBuffer {
    rows: [u64; HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.rows = [0; HEIGHT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.rows[y] & Self::mask(x) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }

    /// Lit pixel count, mostly useful in tests and logs.
    pub fn lit(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Iterates every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        (0..HEIGHT).flat_map(move |y| (0..WIDTH).map(move |x| self.pixel(x, y)))
    }

    /// XORs one sprite row into the grid at (`x`, `y`).
    ///
    /// A coordinate outside the grid restarts at 0 on that axis. Bits that
    /// land past the right edge are clipped. Returns true when any pixel went
    /// from set to unset.
    pub fn draw_byte(&mut self, x: usize, y: usize, byte: u8) -> bool {
        let x = if x >= WIDTH { 0 } else { x };
        let y = if y >= HEIGHT { 0 } else { y };

        // place the byte with its high bit at column x; shifting past bit 0 clips
        let sprite = ((byte as u64) << (WIDTH - 8)) >> x;
        let before = self.rows[y];
        self.rows[y] ^= sprite;
        let erased = before & sprite != 0;
        trace!("Drew row [byte: {byte:08b}] at ({x}, {y}) [erased: {erased}]");
        erased
    }

    fn mask(x: usize) -> u64 {
        1 << (WIDTH - 1 - x)
    }
}
