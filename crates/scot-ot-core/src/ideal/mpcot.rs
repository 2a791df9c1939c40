//! Trusted dealer of multi-point correlated OTs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scot_core::{prg::Prg, Block};

/// Deals pairs of vectors `(s, r)` which agree everywhere except at the receiver's points, where
/// they differ by `Δ`.
#[derive(Debug)]
pub struct IdealMpcot {
    delta: Block,
    points: usize,
    prg: Prg,
}

impl IdealMpcot {
    /// Creates a dealer for the correlation `delta`.
    pub fn new(seed: Block, delta: Block) -> Self {
        Self {
            delta,
            points: 0,
            prg: Prg::from_seed(seed),
        }
    }

    /// Returns `Δ`.
    pub fn delta(&self) -> Block {
        self.delta
    }

    /// Returns how many points were dealt so far.
    pub fn count(&self) -> usize {
        self.points
    }

    /// Deals vectors of length `n` punctured at `alphas`.
    ///
    /// # Panics
    ///
    /// Panics if a point lies outside `0..n`.
    pub fn extend(&mut self, alphas: &[u32], n: usize) -> (Vec<Block>, Vec<Block>) {
        let mut s = vec![Block::ZERO; n];
        self.prg.random_blocks(&mut s);

        let mut r = s.clone();
        for &alpha in alphas {
            let slot = r
                .get_mut(alpha as usize)
                .unwrap_or_else(|| panic!("point {alpha} is outside 0..{n}"));
            *slot ^= self.delta;
        }
        self.points += alphas.len();

        (s, r)
    }
}

impl Default for IdealMpcot {
    fn default() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        Self::new(rng.gen(), rng.gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_differ_at_points() {
        let mut ideal = IdealMpcot::default();
        let alphas = [0, 5, 9];

        let (s, r) = ideal.extend(&alphas, 10);

        for (i, (s, r)) in s.iter().zip(&r).enumerate() {
            let expected = if alphas.contains(&(i as u32)) {
                *s ^ ideal.delta()
            } else {
                *s
            };
            assert_eq!(*r, expected);
        }
        assert_eq!(ideal.count(), 3);
    }

    #[test]
    #[should_panic]
    fn test_point_out_of_range() {
        IdealMpcot::default().extend(&[10], 10);
    }
}
