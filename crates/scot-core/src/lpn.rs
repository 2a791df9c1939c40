//! Learning parity with noise (LPN) parameters and encoder.
//!
//! The encoder computes `y = A * x + y` where `A` is a sparse binary matrix of `n` rows and
//! `k` columns with exactly `D` non-zero entries per row, derived from a public seed.

use cfg_if::cfg_if;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{aes::AesEncryptor, Block};

/// LPN parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpnParameters {
    /// The length of the output vector.
    pub n: usize,
    /// The length of the secret vector.
    pub k: usize,
    /// The Hamming weight of the error vector.
    pub t: usize,
}

/// Errors for invalid LPN parameters.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum LpnError {
    #[error("invalid LPN parameters: k ({k}) must be less than n ({n})")]
    SecretTooLong { n: usize, k: usize },
    #[error("invalid LPN parameters: t ({t}) must be in (0, n) (n = {n})")]
    InvalidWeight { n: usize, t: usize },
    #[error("invalid LPN parameters: t ({t}) must divide n ({n}) for a regular error")]
    NotRegular { n: usize, t: usize },
}

impl LpnParameters {
    /// Creates new LPN parameters.
    pub const fn new(n: usize, k: usize, t: usize) -> Self {
        Self { n, k, t }
    }

    /// Checks the parameters are usable, and if `regular` is set, that the error vector can be
    /// split into `t` equally sized sections.
    pub fn validate(&self, regular: bool) -> Result<(), LpnError> {
        if self.k == 0 || self.k >= self.n {
            return Err(LpnError::SecretTooLong {
                n: self.n,
                k: self.k,
            });
        }

        if self.t == 0 || self.t >= self.n {
            return Err(LpnError::InvalidWeight {
                n: self.n,
                t: self.t,
            });
        }

        if regular && self.n % self.t != 0 {
            return Err(LpnError::NotRegular {
                n: self.n,
                t: self.t,
            });
        }

        Ok(())
    }

    /// Returns the number of fresh outputs each expansion yields once the next secret has been
    /// set aside.
    pub fn output_len(&self) -> usize {
        self.n - self.k
    }

    /// Samples an error vector with exactly `t` non-zero entries at uniformly random positions.
    pub fn sample_uniform_error_vector<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Block> {
        let mut e = vec![Block::ZERO; self.n];
        let mut weight = 0;
        while weight < self.t {
            let pos = rng.gen_range(0..self.n);
            if e[pos] == Block::ZERO {
                e[pos] = Block::ONE;
                weight += 1;
            }
        }
        e
    }

    /// Samples a regular error vector: the vector is split into `t` sections of `n / t` entries
    /// each holding exactly one non-zero entry.
    pub fn sample_regular_error_vector<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Block> {
        let mut e = vec![Block::ZERO; self.n];
        let section = self.n / self.t;
        for chunk in e.chunks_exact_mut(section) {
            chunk[rng.gen_range(0..section)] = Block::ONE;
        }
        e
    }
}

/// Encoder for a sparse LPN matrix with `D` non-zero entries per row.
#[derive(Debug, Clone)]
pub struct LpnEncoder<const D: usize> {
    seed: Block,
    k: u32,
    cipher: AesEncryptor,
}

impl<const D: usize> LpnEncoder<D> {
    /// Creates a new encoder.
    ///
    /// # Arguments
    ///
    /// * `seed` - The public seed the matrix is derived from.
    /// * `k` - The number of columns.
    pub fn new(seed: Block, k: u32) -> Self {
        Self {
            seed,
            k,
            cipher: AesEncryptor::new(seed),
        }
    }

    /// Returns the matrix seed.
    pub fn seed(&self) -> Block {
        self.seed
    }

    /// Returns the column indices of the non-zero entries of `row`.
    fn row(&self, row: usize) -> [usize; D] {
        let mut indices = [0usize; D];
        for (ctr, chunk) in indices.chunks_mut(4).enumerate() {
            let mut input = [0u8; 16];
            input[..8].copy_from_slice(&(row as u64).to_le_bytes());
            input[8..].copy_from_slice(&(ctr as u64).to_le_bytes());

            let words = self.cipher.encrypt_block(Block::from(input)).to_u32s();
            for (index, word) in chunk.iter_mut().zip(words) {
                *index = (word % self.k) as usize;
            }
        }
        indices
    }

    /// Computes `y = A * x + y`.
    ///
    /// Every output row is independent, so rows are processed in parallel when the `rayon`
    /// feature is enabled.
    ///
    /// # Panics
    ///
    /// Panics if `x.len()` is not equal to `k`.
    pub fn compute(&self, y: &mut [Block], x: &[Block]) {
        assert_eq!(x.len(), self.k as usize, "secret length must be k");

        let encode = |(i, y): (usize, &mut Block)| {
            for index in self.row(i) {
                *y ^= x[index];
            }
        };

        cfg_if! {
            if #[cfg(feature = "rayon")] {
                use rayon::prelude::*;
                y.par_iter_mut().enumerate().for_each(encode);
            } else {
                y.iter_mut().enumerate().for_each(encode);
            }
        }
    }
}
