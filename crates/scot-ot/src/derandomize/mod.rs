//! Choice correction by derandomization.
//!
//! The [`Receiver`] corrects a batch of random correlated OTs to its explicit choices by sending
//! one bit per instance, and the [`Sender`] mirrors the correction on its side. Both are
//! [`Corrector`](crate::Corrector)s.

mod error;

pub use error::{ReceiverError, SenderError};

use async_trait::async_trait;
use scot_common::Context;
use scot_ot_core::{
    derandomize::{DerandCOTReceiver, DerandCOTSender},
    msgs::Derandomize,
    ReceiverBatch, ReceiverCot, SenderBatch, SenderCot,
};
use serio::{stream::IoStreamExt, SinkExt};
use tracing::instrument;

use crate::{Corrector, Initializable, OTError};

/// Derandomization sender.
#[derive(Debug, Default)]
pub struct Sender {
    core: DerandCOTSender,
}

impl Sender {
    /// Creates a new Sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receives the receiver's correction and adjusts `raw` accordingly.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `raw` - The random correlations, index-aligned with the receiver's.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count = raw.len()), skip_all, err)]
    pub async fn adjust<Ctx: Context>(
        &mut self,
        ctx: &mut Ctx,
        raw: SenderBatch,
    ) -> Result<SenderBatch, SenderError> {
        let derandomize: Derandomize = ctx.io_mut().expect_next().await?;

        Ok(self.core.adjust(raw, derandomize)?)
    }
}

#[async_trait]
impl<Ctx: Context> Initializable<Ctx> for Sender {
    async fn initialize(&mut self, _ctx: &mut Ctx, _round_size: usize) -> Result<(), OTError> {
        Ok(())
    }
}

#[async_trait]
impl<Ctx: Context> Corrector<Ctx, SenderCot> for Sender {
    type Choices = ();

    async fn correct(
        &mut self,
        ctx: &mut Ctx,
        raw: SenderBatch,
        _choices: &(),
    ) -> Result<SenderBatch, OTError> {
        self.adjust(ctx, raw).await.map_err(OTError::from)
    }
}

/// Derandomization receiver.
#[derive(Debug, Default)]
pub struct Receiver {
    core: DerandCOTReceiver,
}

impl Receiver {
    /// Creates a new Receiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Corrects `raw` to `choices` and sends the correction to the sender.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `raw` - The random correlations, index-aligned with the sender's.
    /// * `choices` - The explicit choices.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count = raw.len()), skip_all, err)]
    pub async fn derandomize<Ctx: Context>(
        &mut self,
        ctx: &mut Ctx,
        raw: ReceiverBatch,
        choices: &[bool],
    ) -> Result<ReceiverBatch, ReceiverError> {
        let (corrected, derandomize) = self.core.derandomize(raw, choices)?;

        ctx.io_mut().send(derandomize).await?;

        Ok(corrected)
    }
}

#[async_trait]
impl<Ctx: Context> Initializable<Ctx> for Receiver {
    async fn initialize(&mut self, _ctx: &mut Ctx, _round_size: usize) -> Result<(), OTError> {
        Ok(())
    }
}

#[async_trait]
impl<Ctx: Context> Corrector<Ctx, ReceiverCot> for Receiver {
    type Choices = [bool];

    async fn correct(
        &mut self,
        ctx: &mut Ctx,
        raw: ReceiverBatch,
        choices: &[bool],
    ) -> Result<ReceiverBatch, OTError> {
        self.derandomize(ctx, raw, choices)
            .await
            .map_err(OTError::from)
    }
}
