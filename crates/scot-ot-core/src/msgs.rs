//! Protocol messages.

use bitvec::{order::Lsb0, vec::BitVec};
use scot_core::Block;
use serde::{Deserialize, Serialize};

use crate::TransferId;

/// The seed of the LPN matrix, sampled by the receiver during setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpnMatrixSeed {
    /// The seed.
    pub seed: Block,
}

/// Derandomization message sent by the receiver to correct its random choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derandomize {
    /// Id of the correction step.
    pub id: TransferId,
    /// Per-instance correction bits, the random choice XOR the explicit choice.
    pub flip: BitVec<u8, Lsb0>,
}
