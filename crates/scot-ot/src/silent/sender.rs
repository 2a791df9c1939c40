use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use scot_common::{Allocate, Context, Preprocess};
use scot_core::Block;
use scot_ot_core::{SenderBatch, SenderCot};
use tracing::{debug, instrument, warn};

use crate::{silent::SenderError, COTSender, Corrector, OTError, RandomCOTSender, RoundSource};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized,
    Ready(SenderBatch),
    Error,
}

/// Silent COT sender.
///
/// Serves correlations from a buffer which is refilled one round at a time by the expander `E`.
/// Batches handed out with chosen corrections are adjusted by the corrector `C`.
#[derive(Debug)]
pub struct Sender<E, C> {
    state: State,
    expander: E,
    corrector: C,
    round_size: usize,
    rounds: usize,
    alloc: usize,
    reserved: usize,
}

impl<E, C> Sender<E, C> {
    /// Creates a new Sender.
    ///
    /// # Arguments
    ///
    /// * `expander` - The source of rounds.
    /// * `corrector` - Applies the receiver's choices to served batches.
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

    /// Returns the global correlation once initialized.
    pub fn delta(&self) -> Option<Block> {
        self.state.try_as_ready().ok().map(|buffer| buffer.delta())
    }

    /// Initializes the session.
    ///
    /// The round size becomes the smaller of the expander's capacity and `expected_total`.
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
    ) -> Result<(), SenderError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = SenderCot> + Send,
        C: Corrector<Ctx, SenderCot> + Send,
    {
        match self.state {
            State::Initialized => {}
            State::Ready(_) => {
                return Err(SenderError::config("session is already initialized"))
            }
            State::Error => return Err(SenderError::state("session was destroyed")),
        }

        if expected_total == 0 {
            return Err(SenderError::config("expected total must be positive"));
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

        let delta = self
            .expander
            .params()
            .ok_or_else(|| aborted("expander did not report a correlation"))?;

        debug!(round_size, "initialized");

        self.round_size = round_size;
        self.state = State::Ready(SenderBatch::new(delta));

        Ok(())
    }

    /// Returns `count` random correlations.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlations.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count), skip_all, err)]
    pub async fn send_random<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, SenderError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = SenderCot> + Send,
    {
        let delta = self.state.try_as_ready()?.delta();

        if count == 0 {
            return Ok(SenderBatch::new(delta));
        }

        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;
        let batch = buffer.split(count)?;
        self.reserved = self.reserved.saturating_sub(count);

        self.state = State::Ready(buffer);

        Ok(batch)
    }

    /// Returns `count` correlations adjusted to the choices of the receiver.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `count` - The number of correlations.
    #[instrument(level = "debug", fields(thread = %ctx.id(), count), skip_all, err)]
    pub async fn send_chosen<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, SenderError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = SenderCot> + Send,
        C: Corrector<Ctx, SenderCot, Choices = ()> + Send,
    {
        let delta = self.state.try_as_ready()?.delta();

        if count == 0 {
            return Ok(SenderBatch::new(delta));
        }

        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;
        let raw = buffer.split(count)?;
        self.reserved = self.reserved.saturating_sub(count);

        let batch = self
            .corrector
            .correct(ctx, raw, &())
            .await
            .map_err(aborted)?;

        self.state = State::Ready(buffer);

        Ok(batch)
    }

    /// Drains rounds into `buffer` until it holds at least `count` correlations.
    async fn fill<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        buffer: &mut SenderBatch,
        count: usize,
    ) -> Result<(), SenderError>
    where
        Ctx: Context,
        E: RoundSource<Ctx, Payload = SenderCot> + Send,
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

fn aborted<E>(err: E) -> SenderError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let err = SenderError::abort(err);
    warn!("{err}, destroying session");
    err
}

#[async_trait]
impl<Ctx, E, C> RandomCOTSender<Ctx> for Sender<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = SenderCot> + Send,
    C: Send,
{
    async fn send_random_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, OTError> {
        self.send_random(ctx, count).await.map_err(OTError::from)
    }
}

#[async_trait]
impl<Ctx, E, C> COTSender<Ctx> for Sender<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = SenderCot> + Send,
    C: Corrector<Ctx, SenderCot, Choices = ()> + Send,
{
    async fn send_correlated(
        &mut self,
        ctx: &mut Ctx,
        count: usize,
    ) -> Result<SenderBatch, OTError> {
        self.send_chosen(ctx, count).await.map_err(OTError::from)
    }
}

impl<E, C> Allocate for Sender<E, C> {
    fn alloc(&mut self, count: usize) {
        self.alloc += count;
    }
}

/// Drains rounds until the buffer holds everything allocated and not yet served. The receiver
/// must allocate the same amounts, rounds are produced in lockstep.
#[async_trait]
impl<Ctx, E, C> Preprocess<Ctx> for Sender<E, C>
where
    Ctx: Context,
    E: RoundSource<Ctx, Payload = SenderCot> + Send,
    C: Send,
{
    type Error = SenderError;

    #[instrument(level = "debug", fields(thread = %ctx.id()), skip_all, err)]
    async fn preprocess(&mut self, ctx: &mut Ctx) -> Result<(), SenderError> {
        self.state.try_as_ready()?;

        self.reserved += std::mem::take(&mut self.alloc);
        let count = self.reserved;
        let mut buffer = std::mem::replace(&mut self.state, State::Error).try_into_ready()?;

        self.fill(ctx, &mut buffer, count).await?;

        self.state = State::Ready(buffer);

        Ok(())
    }
}
