//! Running 8-bit checksum over a block's raw bytes.
//!
//! Every byte from the opening `\r` up to and including the single byte
//! following `Checksum\t` is summed modulo 256. A block is intact when the
//! sum is zero.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum(u8);

impl Checksum {
    /// Start a new block with its first byte.
    pub const fn seed(byte: u8) -> Self {
        Self(byte)
    }

    #[inline]
    pub fn add(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte);
    }

    /// Current running sum.
    pub const fn value(&self) -> u8 {
        self.0
    }

    pub const fn is_valid(&self) -> bool {
        self.0 == 0
    }

    /// Byte that has to be appended to `bytes` so that they sum to zero.
    pub fn complement(bytes: &[u8]) -> u8 {
        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        0u8.wrapping_sub(sum)
    }
}
