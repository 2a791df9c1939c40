use scot_core::Block;
use serde::{Deserialize, Serialize};

use super::{BufferError, CorrelationBuffer, Payload};

/// Sender side of a binary correlated OT.
///
/// Each instance is the block `R0`; the block `R1` is implied as `R0 ⊕ Δ`, where `Δ` is the
/// buffer's session parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenderCot;

impl Payload for SenderCot {
    type Params = Block;
    type Item = Block;

    fn is_valid(_delta: &Block, _msg: &Block) -> bool {
        true
    }
}

/// Receiver side of a binary correlated OT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiverCot;

/// A single receiver instance of a correlated OT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverInstance {
    /// The receiver's choice bit.
    pub choice: bool,
    /// The message corresponding to the choice.
    pub msg: Block,
}

impl Payload for ReceiverCot {
    type Params = ();
    type Item = ReceiverInstance;

    fn is_valid(_params: &(), _instance: &ReceiverInstance) -> bool {
        true
    }
}

/// A batch of sender correlated OTs.
pub type SenderBatch = CorrelationBuffer<SenderCot>;
/// A batch of receiver correlated OTs.
pub type ReceiverBatch = CorrelationBuffer<ReceiverCot>;

impl CorrelationBuffer<SenderCot> {
    /// Creates a batch from the sender's `R0` messages.
    pub fn from_msgs(delta: Block, msgs: impl IntoIterator<Item = Block>) -> Self {
        let mut batch = Self::new(delta);
        batch.items.extend(msgs);
        batch
    }

    /// Returns the global correlation `Δ`.
    pub fn delta(&self) -> Block {
        self.params
    }

    /// Returns the `R0` messages.
    pub fn msgs(&self) -> Vec<Block> {
        self.items.iter().copied().collect()
    }

    /// Returns the `R0` messages.
    pub fn into_msgs(self) -> Vec<Block> {
        self.items.into()
    }

    /// Returns the message pairs `(R0, R1)`.
    pub fn pairs(&self) -> Vec<[Block; 2]> {
        let delta = self.params;
        self.items.iter().map(|&msg| [msg, msg ^ delta]).collect()
    }
}

impl CorrelationBuffer<ReceiverCot> {
    /// Creates a batch from the receiver's choices and corresponding messages.
    pub fn from_parts(choices: Vec<bool>, msgs: Vec<Block>) -> Result<Self, BufferError> {
        if choices.len() != msgs.len() {
            return Err(BufferError::LengthMismatch {
                choices: choices.len(),
                msgs: msgs.len(),
            });
        }

        Ok(Self {
            params: (),
            items: choices
                .into_iter()
                .zip(msgs)
                .map(|(choice, msg)| ReceiverInstance { choice, msg })
                .collect(),
        })
    }

    /// Returns the choice bits.
    pub fn choices(&self) -> Vec<bool> {
        self.items.iter().map(|instance| instance.choice).collect()
    }

    /// Returns the received messages.
    pub fn msgs(&self) -> Vec<Block> {
        self.items.iter().map(|instance| instance.msg).collect()
    }

    /// Returns the choice bits and received messages.
    pub fn into_parts(self) -> (Vec<bool>, Vec<Block>) {
        self.items
            .into_iter()
            .map(|ReceiverInstance { choice, msg }| (choice, msg))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_sender_pairs() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let delta: Block = rng.gen();
        let msgs: Vec<Block> = (0..8).map(|_| rng.gen()).collect();

        let batch = SenderBatch::from_msgs(delta, msgs.clone());

        assert_eq!(batch.delta(), delta);
        for (pair, msg) in batch.pairs().into_iter().zip(msgs) {
            assert_eq!(pair, [msg, msg ^ delta]);
        }
    }

    #[test]
    fn test_sender_merge_different_delta() {
        let mut a = SenderBatch::from_msgs(Block::ONES, [Block::ZERO]);
        let b = SenderBatch::from_msgs(Block::ONE, [Block::ZERO]);

        assert_eq!(a.merge(b), Err(BufferError::ConfigMismatch));
    }

    #[test]
    fn test_receiver_parts() {
        let choices = vec![true, false, true];
        let msgs = vec![Block::ONE, Block::ZERO, Block::ONES];

        let batch = ReceiverBatch::from_parts(choices.clone(), msgs.clone()).unwrap();

        assert_eq!(batch.choices(), choices);
        assert_eq!(batch.msgs(), msgs);
        assert_eq!(batch.into_parts(), (choices, msgs));
    }

    #[test]
    fn test_receiver_parts_length_mismatch() {
        assert_eq!(
            ReceiverBatch::from_parts(vec![true], vec![]),
            Err(BufferError::LengthMismatch { choices: 1, msgs: 0 })
        );
    }
}
