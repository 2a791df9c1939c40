//! Trusted dealer of correlated OTs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scot_core::{prg::Prg, Block};

use crate::{ReceiverBatch, ReceiverInstance, SenderBatch};

/// Deals correlated OTs under a fixed `Δ`, drawing all randomness from a seeded [`Prg`].
#[derive(Debug)]
pub struct IdealCOT {
    delta: Block,
    dealt: usize,
    prg: Prg,
}

impl IdealCOT {
    /// Creates a dealer for the correlation `delta`.
    pub fn new(seed: Block, delta: Block) -> Self {
        Self {
            delta,
            dealt: 0,
            prg: Prg::from_seed(seed),
        }
    }

    /// Returns `Δ`.
    pub fn delta(&self) -> Block {
        self.delta
    }

    /// Returns how many instances were dealt so far.
    pub fn count(&self) -> usize {
        self.dealt
    }

    /// Deals `count` instances with random choices.
    pub fn random_correlated(&mut self, count: usize) -> (SenderBatch, ReceiverBatch) {
        let mut choices = vec![false; count];
        self.prg.random_bools(&mut choices);

        self.correlated(choices)
    }

    /// Deals one instance per choice.
    pub fn correlated(&mut self, choices: Vec<bool>) -> (SenderBatch, ReceiverBatch) {
        let mut keys = vec![Block::ZERO; choices.len()];
        self.prg.random_blocks(&mut keys);
        self.dealt += keys.len();

        let delta = self.delta;
        let received = ReceiverBatch::from_items(
            (),
            keys.iter().zip(choices).map(|(&key, choice)| ReceiverInstance {
                choice,
                msg: key ^ delta.select(choice),
            }),
        )
        .expect("receiver instances are always valid");

        (SenderBatch::from_msgs(delta, keys), received)
    }
}

impl Default for IdealCOT {
    fn default() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        Self::new(rng.gen(), rng.gen())
    }
}
