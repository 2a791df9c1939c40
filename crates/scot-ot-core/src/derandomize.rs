//! Derandomization of random correlated OTs.
//!
//! A random COT, where the receiver's choices are dealt at random, is turned into a COT with
//! choices picked by the receiver using [`Beaver derandomization`](https://www.iacr.org/archive/crypto95/09630097/09630097.pdf).
//! The receiver sends one bit per instance, its random choice XOR its explicit choice, and the
//! sender swaps `R0` and `R1` for every flipped instance by adding `Δ` to `R0`.

use bitvec::{order::Lsb0, vec::BitVec};

use crate::{msgs::Derandomize, ReceiverBatch, ReceiverInstance, SenderBatch, TransferId};

/// Errors that can occur during derandomization.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum DerandomizeError {
    #[error("transfer id mismatch: expected {expected}, got {actual}")]
    IdMismatch {
        expected: TransferId,
        actual: TransferId,
    },
    #[error("count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Sender side of the derandomization.
#[derive(Debug, Default)]
pub struct DerandCOTSender {
    id: TransferId,
}

impl DerandCOTSender {
    /// Creates a new sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id expected for the next derandomization.
    pub fn id(&self) -> TransferId {
        self.id
    }

    /// Adjusts a batch of random COTs according to the receiver's derandomization message.
    ///
    /// # Arguments
    ///
    /// * `raw` - The random COTs, in the same order the receiver holds them.
    /// * `derandomize` - The receiver's message.
    pub fn adjust(
        &mut self,
        mut raw: SenderBatch,
        derandomize: Derandomize,
    ) -> Result<SenderBatch, DerandomizeError> {
        let Derandomize { id, flip } = derandomize;

        if id != self.id {
            return Err(DerandomizeError::IdMismatch {
                expected: self.id,
                actual: id,
            });
        }

        if flip.len() != raw.len() {
            return Err(DerandomizeError::CountMismatch {
                expected: raw.len(),
                actual: flip.len(),
            });
        }

        self.id.next_id();

        let delta = raw.delta();
        raw.items_mut()
            .zip(flip)
            .filter(|(_, flip)| *flip)
            .for_each(|(msg, _)| *msg ^= delta);

        Ok(raw)
    }
}

/// Receiver side of the derandomization.
#[derive(Debug, Default)]
pub struct DerandCOTReceiver {
    id: TransferId,
}

impl DerandCOTReceiver {
    /// Creates a new receiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the next derandomization.
    pub fn id(&self) -> TransferId {
        self.id
    }

    /// Derandomizes a batch of random COTs to `choices`.
    ///
    /// Returns the corrected batch and the message to send to the sender.
    pub fn derandomize(
        &mut self,
        mut raw: ReceiverBatch,
        choices: &[bool],
    ) -> Result<(ReceiverBatch, Derandomize), DerandomizeError> {
        if choices.len() != raw.len() {
            return Err(DerandomizeError::CountMismatch {
                expected: raw.len(),
                actual: choices.len(),
            });
        }

        let mut flip = BitVec::<u8, Lsb0>::with_capacity(choices.len());
        for (instance, &choice) in raw.items_mut().zip(choices) {
            let ReceiverInstance { choice: random, .. } = *instance;
            flip.push(random ^ choice);
            instance.choice = choice;
        }

        Ok((
            raw,
            Derandomize {
                id: self.id.next_id(),
                flip,
            },
        ))
    }
}
