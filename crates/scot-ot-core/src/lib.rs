//! Low-level crate containing the core state machines of the silent correlated OT pipeline.
//!
//! Nothing in this crate performs I/O. The async orchestration lives in the `scot-ot` crate.
//!
//! # ⚠️ Warning ⚠️
//!
//! Some implementations make assumptions about invariants which may not be checked if using these
//! low-level APIs naively, e.g. that sender and receiver consume rounds in lockstep. Failing to
//! uphold these invariants may result in security vulnerabilities.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use serde::{Deserialize, Serialize};

pub mod buffer;
pub mod derandomize;
pub mod expand;
pub mod ideal;
pub mod msgs;

pub use buffer::{
    BufferError, CorrelationBuffer, NaryOt, Payload, ReceiverBatch, ReceiverCot,
    ReceiverInstance, RingTriple, SenderBatch, SenderCot, TripleShare,
};

/// A transfer identifier.
///
/// Every message that belongs to a particular protocol step carries the id of that step so that
/// messages from different steps can never be confused.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransferId(u64);

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

impl TransferId {
    /// Returns the current transfer ID, incrementing `self` in-place.
    pub fn next_id(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}
