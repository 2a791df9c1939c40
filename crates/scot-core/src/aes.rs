//! Fixed-key AES helpers.

use aes::{
    cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit},
    Aes128,
};

use crate::Block;

/// An AES-128 encryptor with a fixed key.
#[derive(Clone)]
pub struct AesEncryptor(Aes128);

opaque_debug::implement!(AesEncryptor);

impl AesEncryptor {
    /// The number of blocks encrypted per batch.
    pub const AES_BLOCK_COUNT: usize = 8;

    /// Creates a new encryptor keyed with `key`.
    #[inline]
    pub fn new(key: Block) -> Self {
        let key = GenericArray::from(key.to_bytes());
        Self(Aes128::new(&key))
    }

    /// Encrypts a single block.
    #[inline]
    pub fn encrypt_block(&self, block: Block) -> Block {
        let mut buf = GenericArray::from(block.to_bytes());
        self.0.encrypt_block(&mut buf);
        let bytes: [u8; 16] = buf.into();
        Block::from(bytes)
    }

    /// Encrypts a fixed number of blocks in place.
    #[inline]
    pub fn encrypt_many_blocks<const N: usize>(&self, blocks: &mut [Block; N]) {
        let mut buf: [aes::Block; N] = blocks.map(|block| GenericArray::from(block.to_bytes()));
        self.0.encrypt_blocks(&mut buf);
        for (block, encrypted) in blocks.iter_mut().zip(buf) {
            let bytes: [u8; 16] = encrypted.into();
            *block = Block::from(bytes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_many_matches_single() {
        let aes = AesEncryptor::new(Block::ONES);
        let mut blocks = [0u128, 1, 2, 3].map(Block::from);
        let expected = blocks.map(|block| aes.encrypt_block(block));

        aes.encrypt_many_blocks(&mut blocks);

        assert_eq!(blocks, expected);
    }
}
