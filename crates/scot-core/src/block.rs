use core::ops::{BitAnd, BitAndAssign, BitXor, BitXorAssign};

use bytemuck::{Pod, Zeroable};
use rand::{
    distributions::{Distribution, Standard},
    CryptoRng, Rng,
};
use serde::{Deserialize, Serialize};

/// A block of 128 bits.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Block([u8; 16]);

impl Block {
    /// The length of a block in bytes.
    pub const LEN: usize = 16;
    /// A zero block.
    pub const ZERO: Self = Self([0; 16]);
    /// A block with the least significant bit set.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// A block with every bit set.
    pub const ONES: Self = Self([0xff; 16]);

    /// Creates a new block.
    #[inline]
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Samples a random block.
    #[inline]
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen())
    }

    /// Returns the byte representation of the block.
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Returns a reference to the bytes of the block.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the least significant bit of the block.
    #[inline]
    pub fn lsb(&self) -> u8 {
        self.0[0] & 1
    }

    /// Returns `Block::ONE` if `bit` is set, otherwise `Block::ZERO`.
    #[inline]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Returns `self` if `bit` is set, otherwise `Block::ZERO`.
    #[inline]
    pub fn select(self, bit: bool) -> Self {
        if bit {
            self
        } else {
            Self::ZERO
        }
    }

    /// Interprets the first four 32-bit words of the block, little-endian.
    #[inline]
    pub fn to_u32s(self) -> [u32; 4] {
        bytemuck::cast(self.0)
    }
}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(block: Block) -> Self {
        block.0
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(value: u128) -> Self {
        Self(value.to_le_bytes())
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Block {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        let a = u128::from_le_bytes(self.0);
        let b = u128::from_le_bytes(rhs.0);
        Self((a ^ b).to_le_bytes())
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl BitAnd for Block {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        let a = u128::from_le_bytes(self.0);
        let b = u128::from_le_bytes(rhs.0);
        Self((a & b).to_le_bytes())
    }
}

impl BitAndAssign for Block {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl Distribution<Block> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block(rng.gen())
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Block({})", hex::encode(self.0))
    }
}

impl core::fmt::Display for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_block_xor_is_involution() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let a = Block::random(&mut rng);
        let b = Block::random(&mut rng);

        assert_eq!(a ^ b ^ b, a);
        assert_eq!(a ^ a, Block::ZERO);
    }

    #[test]
    fn test_block_lsb() {
        assert_eq!(Block::ONE.lsb(), 1);
        assert_eq!(Block::ZERO.lsb(), 0);
        assert_eq!(Block::from(2u128).lsb(), 0);
    }

    #[test]
    fn test_block_select() {
        let block = Block::ONES;
        assert_eq!(block.select(true), block);
        assert_eq!(block.select(false), Block::ZERO);
    }
}
