//! Ideal functionality for the multi-point correlated OT.

use async_trait::async_trait;
use scot_common::{
    ideal::{ideal_f2p, Alice, Bob},
    Context,
};
use scot_core::Block;
use scot_ot_core::ideal::mpcot::IdealMpcot;

use crate::{MpcotReceiver, MpcotSender, OTError};

fn mpcot(
    f: &mut IdealMpcot,
    (t, n): (u32, u32),
    (alphas, receiver_n): (Vec<u32>, u32),
) -> (Vec<Block>, Vec<Block>) {
    assert_eq!(t as usize, alphas.len());
    assert_eq!(n, receiver_n);

    f.extend(&alphas, n as usize)
}

/// Returns an ideal MPCOT sender and receiver.
///
/// # Arguments
///
/// * `seed` - The seed of the functionality's PRG.
/// * `delta` - The correlation, which must match the correlation of the base COT.
pub fn ideal_mpcot(seed: Block, delta: Block) -> (IdealMpcotSender, IdealMpcotReceiver) {
    let (alice, bob) = ideal_f2p(IdealMpcot::new(seed, delta));
    (IdealMpcotSender(alice), IdealMpcotReceiver(bob))
}

/// Ideal MPCOT sender.
#[derive(Debug, Clone)]
pub struct IdealMpcotSender(Alice<IdealMpcot>);

#[async_trait]
impl<Ctx: Context> MpcotSender<Ctx> for IdealMpcotSender {
    async fn send_mpcot(&mut self, ctx: &mut Ctx, t: u32, n: u32) -> Result<Vec<Block>, OTError> {
        Ok(self.0.call(ctx, (t, n), mpcot).await)
    }
}

/// Ideal MPCOT receiver.
#[derive(Debug, Clone)]
pub struct IdealMpcotReceiver(Bob<IdealMpcot>);

#[async_trait]
impl<Ctx: Context> MpcotReceiver<Ctx> for IdealMpcotReceiver {
    async fn receive_mpcot(
        &mut self,
        ctx: &mut Ctx,
        alphas: Vec<u32>,
        n: u32,
    ) -> Result<Vec<Block>, OTError> {
        Ok(self.0.call(ctx, (alphas, n), mpcot).await)
    }
}
