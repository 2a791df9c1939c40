//! Ideal functionality for correlated oblivious transfer.

use async_trait::async_trait;
use scot_common::{
    ideal::{ideal_f2p, Alice, Bob},
    Context,
};
use scot_core::Block;
use scot_ot_core::{ideal::cot::IdealCOT, ReceiverBatch, SenderBatch};

use crate::{
    COTReceiver, COTSender, Correlation, OTError, RandomCOTReceiver, RandomCOTSender,
};

fn cot(f: &mut IdealCOT, sender_count: usize, choices: Vec<bool>) -> (SenderBatch, ReceiverBatch) {
    assert_eq!(sender_count, choices.len());

    f.correlated(choices)
}

fn rcot(
    f: &mut IdealCOT,
    sender_count: usize,
    receiver_count: usize,
) -> (SenderBatch, ReceiverBatch) {
    assert_eq!(sender_count, receiver_count);

    f.random_correlated(sender_count)
}

/// Returns an ideal random COT sender and receiver.
///
/// # Arguments
///
/// * `seed` - The seed of the functionality's PRG.
/// * `delta` - The correlation.
pub fn ideal_rcot(seed: Block, delta: Block) -> (IdealCOTSender, IdealCOTReceiver) {
    let (alice, bob) = ideal_f2p(IdealCOT::new(seed, delta));
    (IdealCOTSender(alice), IdealCOTReceiver(bob))
}

/// Ideal COT sender.
#[derive(Debug, Clone)]
pub struct IdealCOTSender(Alice<IdealCOT>);

impl Correlation for IdealCOTSender {
    type Correlation = Block;

    fn delta(&self) -> Block {
        self.0.lock().delta()
    }
}

#[async_trait]
impl<Ctx: Context> COTSender<Ctx> for IdealCOTSender {
    async fn send_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, OTError> {
        Ok(self.0.call(ctx, count, cot).await)
    }
}

#[async_trait]
impl<Ctx: Context> RandomCOTSender<Ctx> for IdealCOTSender {
    async fn send_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, OTError> {
        Ok(self.0.call(ctx, count, rcot).await)
    }
}

/// Ideal COT receiver.
#[derive(Debug, Clone)]
pub struct IdealCOTReceiver(Bob<IdealCOT>);

#[async_trait]
impl<Ctx: Context> COTReceiver<Ctx> for IdealCOTReceiver {
    async fn receive_correlated(
        &mut self,
        ctx: &mut Ctx,
        choices: &[bool],
    ) -> Result<ReceiverBatch, OTError> {
        Ok(self.0.call(ctx, choices.to_vec(), cot).await)
    }
}

#[async_trait]
impl<Ctx: Context> RandomCOTReceiver<Ctx> for IdealCOTReceiver {
    async fn receive_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<ReceiverBatch, OTError> {
        Ok(self.0.call(ctx, count, rcot).await)
    }
}

#[cfg(test)]
mod tests {
    use scot_common::executor::test_st_executor;
    use scot_ot_core::test::assert_cot_batches;

    use super::*;

    #[tokio::test]
    async fn test_ideal_cot() {
        let (mut ctx_sender, mut ctx_receiver) = test_st_executor(8);
        let (mut sender, mut receiver) = ideal_rcot(Block::ZERO, Block::ONES);

        let choices = vec![true, false, true, true];
        let (sent, received) = tokio::try_join!(
            sender.send_correlated(&mut ctx_sender, choices.len()),
            receiver.receive_correlated(&mut ctx_receiver, &choices)
        )
        .unwrap();

        assert_eq!(sent.delta(), sender.delta());
        assert_eq!(received.choices(), choices);
        assert_cot_batches(&sent, &received);
    }
}
