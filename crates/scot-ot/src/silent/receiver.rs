use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use scot_common::{Allocate, Context, Preprocess};
use scot_ot_core::{ReceiverBatch, ReceiverCot};
use tracing::{debug, instrument, warn};

use crate::{
    silent::ReceiverError, COTReceiver, Corrector, OTError, RandomCOTReceiver, RoundSource,
};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized,
    Ready(ReceiverBatch),
    Error,
}

/// Silent COT receiver.
///
/// Mirrors [`Sender`](crate::silent::Sender): both parties drain the same rounds in the same
/// order, so equal requests yield index-aligned batches.
#[derive(Debug)]
pub struct Receiver<E, C> {
    state: State,
    expander: E,
    corrector: C,
    round_size: usize,
    rounds: usize,
    alloc: usize,
    reserved: usize,
}

impl<E, C> Receiver<E, C> {
    /// Creates a new Receiver.
    ///
    /// # Arguments
    ///
    /// * `expander` - The source of rounds.
    /// * `corrector` - Applies explicit choices to served batches.
    pub fn new(expander: E, corrector: C) -> Self {
        Self {
            state: State::Initialized,
            expander,
            corrector,
            round_size: 0,
            rounds: 0,
            alloc: 0,
            reserved: 0,
        }
    }

    /// Returns the number of buffered correlations.
    pub fn remaining(&self) -> usize {
        self.state.try_as_ready().map(|buffer| buffer.len()).unwrap_or(0)
    }

    /// Returns the round size fixed by [`init`](Self::init).
    pub fn round_size(&self) -> Option<usize> {
        self.state.try_as_ready().ok().map(|_| self.round_size)
    }

    /// Returns the number of rounds drained so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Returns `true` if the session was terminated by an abort.
    pub fn is_destroyed(&self) -> bool {
        matches!(self.state, State::Error)
    }

    /// Initializes the session.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `expected_total` - The number of correlations the caller expects to consume.
    #[instrument(level = "debug", fields(thread = %ctx.id(), expected_total), skip_all, err)]
    pub async fn init<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        expected_total: usize,
    ) -> Result<(), ReceiverError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
        C: Corrector<Ctx, ReceiverCot> + Send,
    {
        match self.state {
            State::Initialized => {}
            State::Ready(_) => {
                return Err(ReceiverError::config("session is already initialized"))
            }
            State::Error => return Err(ReceiverError::state("session was destroyed")),
        }

        if expected_total == 0 {
            return Err(ReceiverError::config("expected total must be positive"));
        }

        self.state = State::Error;

        let round_size = self.expander.capacity().min(expected_total);

        self.expander
            .initialize(ctx, round_size)
            .await
            .map_err(aborted)?;
        self.corrector
            .initialize(ctx, round_size)
            .await
            .map_err(aborted)?;

        let params = self
            .expander
            .params()
            .ok_or_else(|| aborted("expander is not ready after initialization"))?;

        debug!(round_size, "initialized");

        self.round_size = round_size;
        self.state = State::Ready(ReceiverBatch::new(params));

        Ok(())
    }

    /// Returns `count` correlations with random choices.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlations.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count), skip_all, err)]
    pub async fn receive_random<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<ReceiverBatch, ReceiverError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
    {
        self.state.try_as_ready()?;

        if count == 0 {
            return Ok(ReceiverBatch::new(()));
        }

        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;
        let batch = buffer.split(count)?;
        self.reserved = self.reserved.saturating_sub(count);

        self.state = State::Ready(buffer);

        Ok(batch)
    }

    /// Returns correlations with the given choices.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `choices` - The explicit choices, one per correlation.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count = choices.len()), skip_all, err)]
    pub async fn receive_chosen<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        choices: &[bool],
    ) -> Result<ReceiverBatch, ReceiverError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
        C: Corrector<Ctx, ReceiverCot, Choices = [bool]> + Send,
    {
        self.state.try_as_ready()?;

        let count = choices.len();
        if count == 0 {
            return Ok(ReceiverBatch::new(()));
        }

        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;
        let raw = buffer.split(count)?;
        self.reserved = self.reserved.saturating_sub(count);

        let batch = self
            .corrector
            .correct(ctx, raw, choices)
            .await
            .map_err(aborted)?;

        self.state = State::Ready(buffer);

        Ok(batch)
    }

    /// Drains rounds into `buffer` until it holds at least `count` correlations.
    async fn fill<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        buffer: &mut ReceiverBatch,
        count: usize,
    ) -> Result<(), ReceiverError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
    {
        while buffer.len() < count {
            let round = self.expander.produce_round(ctx).await.map_err(aborted)?;
            buffer.merge(round).map_err(aborted)?;

            self.rounds += 1;
            debug!(rounds = self.rounds, remaining = buffer.len(), "drained round");
        }

        Ok(())
    }
}

fn aborted<E>(err: E) -> ReceiverError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let err = ReceiverError::abort(err);
    warn!("{err}, destroying session");
    err
}

#[async_trait]
impl<Ctx, E, C> RandomCOTReceiver<Ctx> for Receiver<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
    C: Send,
{
    async fn receive_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<ReceiverBatch, OTError> {
        self.receive_random(ctx, count)
            .await
            .map_err(OTError::from)
    }
}

#[async_trait]
impl<Ctx, E, C> COTReceiver<Ctx> for Receiver<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
    C: Corrector<Ctx, ReceiverCot, Choices = [bool]> + Send,
{
    async fn receive_correlated(
        &mut self,
        ctx: &mut Ctx,
        choices: &[bool],
    ) -> Result<ReceiverBatch, OTError> {
        self.receive_chosen(ctx, choices)
            .await
            .map_err(OTError::from)
    }
}

impl<E, C> Allocate for Receiver<E, C> {
    fn alloc(&mut self, count: usize) {
        self.alloc += count;
    }
}

#[async_trait]
impl<Ctx, E, C> Preprocess<Ctx> for Receiver<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = ReceiverCot> + Send,
    C: Send,
{
    type Error = ReceiverError;

    #[instrument(level = "debug", fields(thread = %ctx.id()), skip_all, err)]
    async fn preprocess(&mut self, ctx: &mut Ctx) -> Result<(), ReceiverError> {
        self.state.try_as_ready()?;

        self.reserved += std::mem::take(&mut self.alloc);
        let count = self.reserved;
        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;

        self.state = State::Ready(buffer);

        Ok(())
    }
}
