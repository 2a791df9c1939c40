//! Silent expansion receiver.

use scot_core::{
    lpn::{LpnEncoder, LpnParameters},
    prg::Prg,
    Block,
};

use crate::{
    expand::{ExpandError, LpnType, LPN_MATRIX_DENSITY},
    msgs::LpnMatrixSeed,
    ReceiverBatch,
};

/// Silent expansion receiver.
#[derive(Debug, Default)]
pub struct Receiver<T: state::State = state::Initialized> {
    state: T,
}

impl Receiver {
    /// Creates a new Receiver.
    pub fn new() -> Self {
        Self::new_with_prg(Prg::new())
    }

    /// Creates a new Receiver which samples its error vectors from `prg`.
    pub fn new_with_prg(prg: Prg) -> Self {
        Receiver {
            state: state::Initialized { prg },
        }
    }

    /// Completes the setup phase, returning the LPN matrix seed to send to the sender.
    ///
    /// # Arguments
    ///
    /// * `lpn_parameters` - The LPN parameters.
    /// * `lpn_type` - The LPN error distribution.
    /// * `seed` - The seed of the LPN matrix.
    /// * `u` - The choices of the receiver's `k` base correlations.
    /// * `w` - The messages of the receiver's `k` base correlations.
    pub fn setup(
        self,
        lpn_parameters: LpnParameters,
        lpn_type: LpnType,
        seed: Block,
        u: &[bool],
        w: &[Block],
    ) -> Result<(Receiver<state::Extension>, LpnMatrixSeed), ExpandError> {
        lpn_parameters.validate(lpn_type.is_regular())?;

        if u.len() != lpn_parameters.k || w.len() != lpn_parameters.k {
            return Err(ExpandError(format!(
                "expected {} base correlations, got {} choices and {} messages",
                lpn_parameters.k,
                u.len(),
                w.len()
            )));
        }

        let lpn_encoder = LpnEncoder::new(seed, lpn_parameters.k as u32);

        Ok((
            Receiver {
                state: state::Extension {
                    prg: self.state.prg,
                    counter: 0,
                    lpn_parameters,
                    lpn_type,
                    lpn_encoder,
                    u: u.iter().copied().map(Block::from_bit).collect(),
                    w: w.to_vec(),
                    e: Vec::new(),
                },
            },
            LpnMatrixSeed { seed },
        ))
    }
}

impl Receiver<state::Extension> {
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

    /// Samples the error vector of the next extension and returns its non-zero positions
    /// together with the length of the multi-point COT.
    pub fn mpcot_query(&mut self) -> (Vec<u32>, usize) {
        let params = self.state.lpn_parameters;
        self.state.e = match self.state.lpn_type {
            LpnType::Uniform => params.sample_uniform_error_vector(&mut self.state.prg),
            LpnType::Regular => params.sample_regular_error_vector(&mut self.state.prg),
        };

        let alphas = self
            .state
            .e
            .iter()
            .enumerate()
            .filter(|(_, e)| **e != Block::ZERO)
            .map(|(i, _)| i as u32)
            .collect();

        (alphas, params.n)
    }

    /// Performs an extension, returning `n - k` fresh correlations.
    ///
    /// # Arguments
    ///
    /// * `r` - The receiver's output of the multi-point COT.
    pub fn extend(&mut self, r: Vec<Block>) -> Result<ReceiverBatch, ExpandError> {
        let n = self.state.lpn_parameters.n;
        if r.len() != n {
            return Err(ExpandError(format!(
                "expected multi-point COT of length {n}, got {}",
                r.len()
            )));
        }

        if self.state.e.len() != n {
            return Err(ExpandError(
                "no error vector sampled for this extension".to_string(),
            ));
        }

        let k = self.state.lpn_parameters.k;

        // z = A * w + r
        let mut z = r;
        self.state.lpn_encoder.compute(&mut z, &self.state.w);

        // x = A * u + e
        let mut x = std::mem::take(&mut self.state.e);
        self.state.lpn_encoder.compute(&mut x, &self.state.u);

        let choices = x.split_off(k).iter().map(|x| x.lsb() == 1).collect();
        let msgs = z.split_off(k);

        self.state.u = x.into_iter().map(|x| Block::from_bit(x.lsb() == 1)).collect();
        self.state.w = z;
        self.state.counter += 1;

        ReceiverBatch::from_parts(choices, msgs).map_err(|e| ExpandError(e.to_string()))
    }
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    #[derive(Default)]
    pub struct Initialized {
        pub(super) prg: Prg,
    }

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after the setup phase.
    ///
    /// In this state the receiver performs extensions, potentially many times.
    pub struct Extension {
        pub(super) prg: Prg,
        pub(super) counter: usize,

        pub(super) lpn_parameters: LpnParameters,
        pub(super) lpn_type: LpnType,
        pub(super) lpn_encoder: LpnEncoder<LPN_MATRIX_DENSITY>,

        /// Secret for the next extension, choice bits as blocks.
        pub(super) u: Vec<Block>,
        pub(super) w: Vec<Block>,

        /// Error vector of the pending extension.
        pub(super) e: Vec<Block>,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}
