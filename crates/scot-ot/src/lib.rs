//! Silent correlated oblivious transfer.
//!
//! The [`silent`] orchestrators hand out batches of correlated OTs of arbitrary size. They drain
//! fixed-size rounds from a [`RoundSource`], such as the [`ferret`] expander, into an ordered
//! buffer and split off exactly what the caller asks for. Choices picked by the receiver are
//! applied afterwards by a [`Corrector`], such as [`derandomize`].

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod derandomize;
pub mod ferret;
#[cfg(any(test, feature = "ideal"))]
pub mod ideal;
pub mod silent;

use async_trait::async_trait;
use scot_core::Block;

pub use scot_ot_core::{
    CorrelationBuffer, Payload, ReceiverBatch, ReceiverCot, SenderBatch, SenderCot, TransferId,
};

/// An oblivious transfer error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OTError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("sender error: {0}")]
    SenderError(Box<dyn std::error::Error + Send + Sync>),
    #[error("receiver error: {0}")]
    ReceiverError(Box<dyn std::error::Error + Send + Sync>),
}

/// A functionality with a global correlation.
pub trait Correlation {
    /// The correlation type.
    type Correlation;

    /// Returns the correlation, `Δ`.
    fn delta(&self) -> Self::Correlation;
}

/// A correlated oblivious transfer sender.
#[async_trait]
pub trait COTSender<Ctx> {
    /// Obliviously transfers correlated messages to the receiver.
    ///
    /// Returns the `0`-bit messages that were obliviously transferred.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlated messages to obliviously transfer.
    async fn send_correlated(&mut self, ctx: &mut Ctx, count: usize)
        -> Result<SenderBatch, OTError>;
}

/// A random correlated oblivious transfer sender.
#[async_trait]
pub trait RandomCOTSender<Ctx> {
    /// Obliviously transfers correlated messages to the receiver, whose choices are random.
    ///
    /// Returns the `0`-bit messages that were obliviously transferred.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlated messages to obliviously transfer.
    async fn send_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, OTError>;
}

/// A correlated oblivious transfer receiver.
#[async_trait]
pub trait COTReceiver<Ctx> {
    /// Obliviously receives correlated messages according to `choices`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `choices` - The choices made by the receiver.
    async fn receive_correlated(
        &mut self,
        ctx: &mut Ctx,
        choices: &[bool],
    ) -> Result<ReceiverBatch, OTError>;
}

/// A random correlated oblivious transfer receiver.
#[async_trait]
pub trait RandomCOTReceiver<Ctx> {
    /// Obliviously receives correlated messages with random choices.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlated messages to obliviously receive.
    async fn receive_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<ReceiverBatch, OTError>;
}

/// A multi-point correlated OT sender.
#[async_trait]
pub trait MpcotSender<Ctx> {
    /// Returns the sender's vector `s` of length `n`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `t` - The number of points.
    /// * `n` - The length of the vector.
    async fn send_mpcot(&mut self, ctx: &mut Ctx, t: u32, n: u32) -> Result<Vec<Block>, OTError>;
}

/// A multi-point correlated OT receiver.
#[async_trait]
pub trait MpcotReceiver<Ctx> {
    /// Returns the receiver's vector `r`, equal to the sender's `s` except at `alphas` where it
    /// is offset by `Δ`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `alphas` - The chosen positions.
    /// * `n` - The length of the vector.
    async fn receive_mpcot(
        &mut self,
        ctx: &mut Ctx,
        alphas: Vec<u32>,
        n: u32,
    ) -> Result<Vec<Block>, OTError>;
}

/// A functionality which is set up once for a session producing rounds of a given size.
#[async_trait]
pub trait Initializable<Ctx> {
    /// Initializes the functionality.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `round_size` - The number of correlations per round.
    async fn initialize(&mut self, ctx: &mut Ctx, round_size: usize) -> Result<(), OTError>;
}

/// A source of fixed-size rounds of fresh correlations.
#[async_trait]
pub trait RoundSource<Ctx>: Initializable<Ctx> {
    /// The kind of correlation produced.
    type Payload: Payload;

    /// Returns the largest round size supported.
    fn capacity(&self) -> usize;

    /// Returns the session parameters the rounds are generated under, once initialized.
    fn params(&self) -> Option<<Self::Payload as Payload>::Params>;

    /// Produces exactly one round of fresh correlations.
    async fn produce_round(
        &mut self,
        ctx: &mut Ctx,
    ) -> Result<CorrelationBuffer<Self::Payload>, OTError>;
}

/// Corrects a batch of random correlations to explicit choices.
#[async_trait]
pub trait Corrector<Ctx, P: Payload>: Initializable<Ctx> {
    /// The explicit choices this party contributes.
    type Choices: ?Sized + Sync;

    /// Corrects `raw` to `choices`, returning a batch of the same length.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `raw` - The random correlations, index-aligned with the peer's.
    /// * `choices` - The explicit choices.
    async fn correct(
        &mut self,
        ctx: &mut Ctx,
        raw: CorrelationBuffer<P>,
        choices: &Self::Choices,
    ) -> Result<CorrelationBuffer<P>, OTError>;
}
