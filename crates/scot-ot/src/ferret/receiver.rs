use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use scot_common::{cpu::CpuBackend, Context};
use scot_core::prg::Prg;
use scot_ot_core::{
    expand::receiver::{state, Receiver as ReceiverCore},
    ReceiverBatch, ReceiverCot,
};
use serio::SinkExt;
use tracing::{debug, instrument};

use crate::{
    ferret::{FerretConfig, ReceiverError},
    Initializable, MpcotReceiver, OTError, RandomCOTReceiver, RoundSource,
};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized(Box<ReceiverCore<state::Initialized>>),
    Extension(Box<ReceiverCore<state::Extension>>),
    Error,
}

/// Ferret receiver.
#[derive(Debug)]
pub struct Receiver<BaseCOT, Mpcot> {
    state: State,
    config: FerretConfig,
    base: BaseCOT,
    mpcot: Mpcot,
    round_size: usize,
}

impl<BaseCOT, Mpcot> Receiver<BaseCOT, Mpcot> {
    /// Creates a new Receiver.
    ///
    /// # Arguments
    ///
    /// * `config` - The Ferret configuration.
    /// * `base` - The random COT consumed by the setup.
    /// * `mpcot` - The multi-point COT consumed by every round.
    pub fn new(config: FerretConfig, base: BaseCOT, mpcot: Mpcot) -> Self {
        Self {
            state: State::Initialized(Box::new(ReceiverCore::new())),
            config,
            base,
            mpcot,
            round_size: 0,
        }
    }

    /// Returns the largest round size supported by the configuration.
    pub fn capacity(&self) -> usize {
        self.config.lpn_parameters().output_len()
    }

    /// Performs the setup.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `round_size` - The number of correlations returned by every round.
    #[instrument(level = "debug", fields(thread = %ctx.id(), round_size), skip_all, err)]
    pub async fn setup<Ctx>(
        &mut self,
        ctx: &mut Ctx,
        round_size: usize,
    ) -> Result<(), ReceiverError>
    where
        Ctx: Context,
        BaseCOT: RandomCOTReceiver<Ctx> + Send,
    {
        self.state.try_as_initialized()?;

        if round_size == 0 || round_size > self.capacity() {
            return Err(ReceiverError::config(format!(
                "round size must be in [1, {}], got {round_size}",
                self.capacity()
            )));
        }

        let receiver = std::mem::replace(&mut self.state, State::Error).try_into_initialized()?;

        let params = self.config.lpn_parameters();
        let (u, w) = self
            .base
            .receive_random_correlated(ctx, params.k)
            .await
            .map_err(ReceiverError::base)?
            .into_parts();

        let seed = Prg::new().random_block();
        let (receiver, seed) = receiver.setup(params, self.config.lpn_type(), seed, &u, &w)?;

        ctx.io_mut().send(seed).await?;

        self.round_size = round_size;
        self.state = State::Extension(Box::new(receiver));

        Ok(())
    }

    /// Performs one extension, returning a round of `round_size` correlations.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    #[instrument(level = "debug", fields(thread = %ctx.id()), skip_all, err)]
    pub async fn extend<Ctx>(&mut self, ctx: &mut Ctx) -> Result<ReceiverBatch, ReceiverError>
    where
        Ctx: Context,
        Mpcot: MpcotReceiver<Ctx> + Send,
    {
        let mut receiver = std::mem::replace(&mut self.state, State::Error).try_into_extension()?;

        let (alphas, n) = receiver.mpcot_query();
        let r = self
            .mpcot
            .receive_mpcot(ctx, alphas, n as u32)
            .await
            .map_err(ReceiverError::mpcot)?;

        let (receiver, mut round) = CpuBackend::blocking(move || {
            receiver.extend(r).map(|round| (receiver, round))
        })
        .await?;

        round
            .reduce(self.round_size)
            .map_err(|e| ReceiverError::config(e.to_string()))?;

        debug!(counter = receiver.counter(), len = round.len(), "produced round");

        self.state = State::Extension(receiver);

        Ok(round)
    }
}

#[async_trait]
impl<Ctx, BaseCOT, Mpcot> Initializable<Ctx> for Receiver<BaseCOT, Mpcot>
where
    Ctx: Context,
    BaseCOT: RandomCOTReceiver<Ctx> + Send,
    Mpcot: Send,
{
    async fn initialize(&mut self, ctx: &mut Ctx, round_size: usize) -> Result<(), OTError> {
        self.setup(ctx, round_size).await.map_err(OTError::from)
    }
}

#[async_trait]
impl<Ctx, BaseCOT, Mpcot> RoundSource<Ctx> for Receiver<BaseCOT, Mpcot>
where
    Ctx: Context,
    BaseCOT: RandomCOTReceiver<Ctx> + Send,
    Mpcot: MpcotReceiver<Ctx> + Send,
{
    type Payload = ReceiverCot;

    fn capacity(&self) -> usize {
        Receiver::capacity(self)
    }

    fn params(&self) -> Option<()> {
        self.state.try_as_extension().ok().map(|_| ())
    }

    async fn produce_round(&mut self, ctx: &mut Ctx) -> Result<ReceiverBatch, OTError> {
        self.extend(ctx).await.map_err(OTError::from)
    }
}
