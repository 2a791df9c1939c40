//! AES-CTR pseudorandom generator.

use rand::Rng;
use rand_core::{
    block::{BlockRng, BlockRngCore},
    CryptoRng, RngCore, SeedableRng,
};

use crate::{aes::AesEncryptor, Block};

const BATCH: usize = AesEncryptor::AES_BLOCK_COUNT;

/// Keystream generator: encrypts consecutive counter blocks under the seed.
#[derive(Clone)]
struct CtrCore {
    aes: AesEncryptor,
    counter: u128,
}

impl BlockRngCore for CtrCore {
    type Item = u32;
    type Results = [u32; 4 * BATCH];

    #[inline]
    fn generate(&mut self, results: &mut Self::Results) {
        let counter = self.counter;
        let mut blocks: [Block; BATCH] = std::array::from_fn(|i| Block::from(counter + i as u128));
        self.counter += BATCH as u128;

        self.aes.encrypt_many_blocks(&mut blocks);
        *results = bytemuck::cast(blocks);
    }
}

impl SeedableRng for CtrCore {
    type Seed = Block;

    fn from_seed(seed: Block) -> Self {
        Self {
            aes: AesEncryptor::new(seed),
            counter: 0,
        }
    }
}

impl CryptoRng for CtrCore {}

/// Pseudorandom generator expanding a [`Block`] seed with AES-128 in counter mode.
///
/// Two generators with the same seed produce the same stream, which lets both parties of an
/// ideal functionality, or a test and its expectation, derive identical randomness.
#[derive(Clone)]
pub struct Prg(BlockRng<CtrCore>);

opaque_debug::implement!(Prg);

impl Prg {
    /// Creates a generator from a fresh random seed.
    pub fn new() -> Self {
        Self::from_seed(rand::random::<Block>())
    }

    /// Returns the number of counter blocks consumed so far.
    pub fn counter(&self) -> u128 {
        self.0.core.counter
    }

    /// Samples a block.
    #[inline]
    pub fn random_block(&mut self) -> Block {
        self.gen()
    }

    /// Overwrites `buf` with random blocks.
    pub fn random_blocks(&mut self, buf: &mut [Block]) {
        self.fill_bytes(bytemuck::cast_slice_mut(buf));
    }

    /// Overwrites `buf` with random bits.
    pub fn random_bools(&mut self, buf: &mut [bool]) {
        self.fill(buf);
    }
}

impl Default for Prg {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedableRng for Prg {
    type Seed = Block;

    fn from_seed(seed: Block) -> Self {
        Self(BlockRng::new(CtrCore::from_seed(seed)))
    }
}

impl RngCore for Prg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for Prg {}
