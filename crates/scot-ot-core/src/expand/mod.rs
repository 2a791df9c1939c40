//! Silent expansion of correlated OTs, following [`Ferret`](https://eprint.iacr.org/2020/924.pdf).
//!
//! After a one-time setup with `k` base correlations, each extension consumes the output of a
//! multi-point COT of weight `t` and produces `n` fresh correlations. The first `k` of them
//! replace the secret for the next extension, the remaining `n - k` form the round.

mod error;
pub mod receiver;
pub mod sender;

pub use error::ExpandError;

use scot_core::lpn::LpnParameters;
use serde::{Deserialize, Serialize};

/// Number of non-zero entries per row of the LPN matrix.
pub const LPN_MATRIX_DENSITY: usize = 10;

/// Regular LPN parameters targeting ~10 million correlations per extension.
pub const LPN_PARAMETERS_REGULAR: LpnParameters = LpnParameters {
    n: 10_180_608,
    k: 124_000,
    t: 4_971,
};

/// Uniform LPN parameters targeting ~10 million correlations per extension.
pub const LPN_PARAMETERS_UNIFORM: LpnParameters = LpnParameters {
    n: 10_616_092,
    k: 588_160,
    t: 1_324,
};

/// The type of LPN error distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LpnType {
    /// Uniform error distribution.
    Uniform,
    /// Regular error distribution.
    #[default]
    Regular,
}

impl LpnType {
    /// Returns `true` if the error distribution is regular.
    pub fn is_regular(&self) -> bool {
        matches!(self, LpnType::Regular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rstest::*;
    use scot_core::{prg::Prg, Block};

    use receiver::Receiver;
    use sender::Sender;

    use crate::{
        ideal::{cot::IdealCOT, mpcot::IdealMpcot},
        msgs,
        test::assert_cot,
    };

    const LPN_PARAMETERS_TEST: LpnParameters = LpnParameters {
        n: 9600,
        k: 1220,
        t: 600,
    };

    #[rstest]
    #[case::regular(LpnType::Regular)]
    #[case::uniform(LpnType::Uniform)]
    fn test_expand(#[case] lpn_type: LpnType) {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let delta: Block = rng.gen();
        let mut ideal_cot = IdealCOT::new(rng.gen(), delta);
        let mut ideal_mpcot = IdealMpcot::new(rng.gen(), delta);

        let (base_sender, base_receiver) = ideal_cot.random_correlated(LPN_PARAMETERS_TEST.k);
        let (u, w) = base_receiver.into_parts();

        let (mut receiver, seed) = Receiver::new_with_prg(Prg::from_seed(rng.gen()))
            .setup(LPN_PARAMETERS_TEST, lpn_type, rng.gen(), &u, &w)
            .unwrap();
        let mut sender = Sender::new()
            .setup(
                delta,
                LPN_PARAMETERS_TEST,
                lpn_type,
                seed,
                &base_sender.into_msgs(),
            )
            .unwrap();

        assert_eq!(sender.capacity(), LPN_PARAMETERS_TEST.output_len());

        // Two rounds, the second one runs on the seed refreshed by the first.
        for round in 1..=2 {
            let (t, n) = sender.mpcot_query();
            let (alphas, n_receiver) = receiver.mpcot_query();

            assert_eq!(t as usize, alphas.len());
            assert_eq!(n as usize, n_receiver);

            let (s, r) = ideal_mpcot.extend(&alphas, n_receiver);

            let sent = sender.extend(s).unwrap();
            let received = receiver.extend(r).unwrap();

            assert_eq!(sent.len(), LPN_PARAMETERS_TEST.output_len());
            assert_eq!(received.len(), LPN_PARAMETERS_TEST.output_len());
            assert_eq!(sender.counter(), round);
            assert_eq!(receiver.counter(), round);

            let (choices, received) = received.into_parts();
            assert_cot(delta, &choices, &sent.msgs(), &received);
        }
    }

    #[test]
    fn test_expand_wrong_mpcot_length() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let delta: Block = rng.gen();
        let mut ideal_cot = IdealCOT::new(rng.gen(), delta);

        let (base_sender, _) = ideal_cot.random_correlated(LPN_PARAMETERS_TEST.k);
        let mut sender = Sender::new()
            .setup(
                delta,
                LPN_PARAMETERS_TEST,
                LpnType::Regular,
                msgs::LpnMatrixSeed { seed: rng.gen() },
                &base_sender.into_msgs(),
            )
            .unwrap();

        assert!(sender
            .extend(vec![Block::ZERO; LPN_PARAMETERS_TEST.n - 1])
            .is_err());
    }

    #[test]
    fn test_receiver_extend_requires_query() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let delta: Block = rng.gen();
        let mut ideal_cot = IdealCOT::new(rng.gen(), delta);

        let (_, base_receiver) = ideal_cot.random_correlated(LPN_PARAMETERS_TEST.k);
        let (u, w) = base_receiver.into_parts();

        let (mut receiver, _) = Receiver::new()
            .setup(LPN_PARAMETERS_TEST, LpnType::Regular, rng.gen(), &u, &w)
            .unwrap();

        assert!(receiver
            .extend(vec![Block::ZERO; LPN_PARAMETERS_TEST.n])
            .is_err());
    }

    #[test]
    fn test_setup_invalid_parameters() {
        let params = LpnParameters::new(9600, 1220, 7);

        assert!(Sender::new()
            .setup(
                Block::ONES,
                params,
                LpnType::Regular,
                msgs::LpnMatrixSeed { seed: Block::ZERO },
                &vec![Block::ZERO; params.k],
            )
            .is_err());
    }
}
