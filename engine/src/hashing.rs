//! Fixed 64-bit FNV-1a, so state hashes match across builds and toolchains.

use std::hash::Hasher;

#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    pub fn new() -> Self {
        Self { state: Self::OFFSET_BASIS }
    }

    /// Feed an integer as little-endian bytes, independent of the host.
    pub fn write_le_u64(&mut self, value: u64) {
        self.write(&value.to_le_bytes());
    }

    /// Length-prefixed, so `("ab", "c")` and `("a", "bc")` differ.
    pub fn write_str(&mut self, s: &str) {
        self.write_le_u64(s.len() as u64);
        self.write(s.as_bytes());
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_fnv1a_vectors() {
        assert_eq!(FnvHasher::new().finish(), 0xcbf2_9ce4_8422_2325);
        let mut h = FnvHasher::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut a = FnvHasher::new();
        a.write_str("ab");
        a.write_str("c");
        let mut b = FnvHasher::new();
        b.write_str("a");
        b.write_str("bc");
        assert_ne!(a.finish(), b.finish());
    }
}
