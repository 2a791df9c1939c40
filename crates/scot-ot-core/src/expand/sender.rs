//! Silent expansion sender.

use scot_core::{
    lpn::{LpnEncoder, LpnParameters},
    Block,
};

use crate::{
    expand::{ExpandError, LpnType, LPN_MATRIX_DENSITY},
    msgs::LpnMatrixSeed,
    SenderBatch,
};

/// Silent expansion sender.
#[derive(Debug, Default)]
pub struct Sender<T: state::State = state::Initialized> {
    state: T,
}

impl Sender {
    /// Creates a new Sender.
    pub fn new() -> Self {
        Sender {
            state: state::Initialized::default(),
        }
    }

    /// Completes the setup phase.
    ///
    /// # Arguments
    ///
    /// * `delta` - The sender's global secret.
    /// * `lpn_parameters` - The LPN parameters.
    /// * `lpn_type` - The LPN error distribution.
    /// * `seed` - The LPN matrix seed received from the receiver.
    /// * `v` - The sender's `k` base correlations.
    pub fn setup(
        self,
        delta: Block,
        lpn_parameters: LpnParameters,
        lpn_type: LpnType,
        seed: LpnMatrixSeed,
        v: &[Block],
    ) -> Result<Sender<state::Extension>, ExpandError> {
        lpn_parameters.validate(lpn_type.is_regular())?;

        if v.len() != lpn_parameters.k {
            return Err(ExpandError(format!(
                "expected {} base correlations, got {}",
                lpn_parameters.k,
                v.len()
            )));
        }

        let LpnMatrixSeed { seed } = seed;
        let lpn_encoder = LpnEncoder::new(seed, lpn_parameters.k as u32);

        Ok(Sender {
            state: state::Extension {
                delta,
                counter: 0,
                lpn_parameters,
                lpn_encoder,
                v: v.to_vec(),
            },
        })
    }
}

impl Sender<state::Extension> {
    /// Returns the global secret.
    pub fn delta(&self) -> Block {
        self.state.delta
    }

    /// Returns the number of extensions performed so far.
    pub fn counter(&self) -> usize {
        self.state.counter
    }

    /// Returns the LPN parameters.
    pub fn lpn_parameters(&self) -> LpnParameters {
        self.state.lpn_parameters
    }

    /// Returns the number of correlations produced by one extension.
    pub fn capacity(&self) -> usize {
        self.state.lpn_parameters.output_len()
    }

    /// Returns the weight and length of the multi-point COT required by the next extension.
    #[inline]
    pub fn mpcot_query(&self) -> (u32, u32) {
        (
            self.state.lpn_parameters.t as u32,
            self.state.lpn_parameters.n as u32,
        )
    }

    /// Performs an extension, returning `n - k` fresh correlations.
    ///
    /// # Arguments
    ///
    /// * `s` - The sender's output of the multi-point COT.
    pub fn extend(&mut self, s: Vec<Block>) -> Result<SenderBatch, ExpandError> {
        let n = self.state.lpn_parameters.n;
        if s.len() != n {
            return Err(ExpandError(format!(
                "expected multi-point COT of length {n}, got {}",
                s.len()
            )));
        }

        // y = A * v + s
        let mut y = s;
        self.state.lpn_encoder.compute(&mut y, &self.state.v);

        let round = y.split_off(self.state.lpn_parameters.k);
        self.state.v = y;
        self.state.counter += 1;

        Ok(SenderBatch::from_msgs(self.state.delta, round))
    }
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    #[derive(Default)]
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after the setup phase.
    ///
    /// In this state the sender performs extensions, potentially many times.
    pub struct Extension {
        pub(super) delta: Block,
        pub(super) counter: usize,

        pub(super) lpn_parameters: LpnParameters,
        pub(super) lpn_encoder: LpnEncoder<LPN_MATRIX_DENSITY>,

        /// Secret for the next extension.
        pub(super) v: Vec<Block>,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
