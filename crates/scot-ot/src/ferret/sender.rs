use async_trait::async_trait;
use enum_try_as_inner::EnumTryAsInner;
use scot_common::{cpu::CpuBackend, Context};
use scot_core::Block;
use scot_ot_core::{
    expand::sender::{state, Sender as SenderCore},
    msgs::LpnMatrixSeed,
    SenderBatch, SenderCot,
};
use serio::stream::IoStreamExt;
use tracing::{debug, instrument};

use crate::{
    ferret::{FerretConfig, SenderError},
    Initializable, MpcotSender, OTError, RandomCOTSender, RoundSource,
};

#[derive(Debug, EnumTryAsInner)]
#[derive_err(Debug)]
pub(crate) enum State {
    Initialized(SenderCore<state::Initialized>),
    Extension(SenderCore<state::Extension>),
    Error,
}

/// Ferret sender.
#[derive(Debug)]
pub struct Sender<BaseCOT, Mpcot> {
    state: State,
    config: FerretConfig,
    base: BaseCOT,
    mpcot: Mpcot,
    round_size: usize,
}

impl<BaseCOT, Mpcot> Sender<BaseCOT, Mpcot> {
    /// Creates a new Sender.
    ///
    /// # Arguments
    ///
    /// * `config` - The Ferret configuration.
    /// * `base` - The random COT consumed by the setup, its correlation becomes the sender's.
    /// * `mpcot` - The multi-point COT consumed by every round.
    pub fn new(config: FerretConfig, base: BaseCOT, mpcot: Mpcot) -> Self {
        Self {
            state: State::Initialized(SenderCore::new()),
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

    /// Returns the global correlation once set up.
    pub fn delta(&self) -> Option<Block> {
        self.state.try_as_extension().ok().map(|sender| sender.delta())
    }

    /// Performs the setup.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    /// * `round_size` - The number of correlations returned by every round.
    #[instrument(level = "debug", fields(thread = %ctx.id(), round_size), skip_all, err)]
    pub async fn setup<Ctx>(&mut self, ctx: &mut Ctx, round_size: usize) -> Result<(), SenderError>
    where
        Ctx: Context,
        BaseCOT: RandomCOTSender<Ctx> + Send,
    {
        self.state.try_as_initialized()?;

        if round_size == 0 || round_size > self.capacity() {
            return Err(SenderError::config(format!(
                "round size must be in [1, {}], got {round_size}",
                self.capacity()
            )));
        }

        let sender = std::mem::replace(&mut self.state, State::Error).try_into_initialized()?;

        let params = self.config.lpn_parameters();
        let base = self
            .base
            .send_random_correlated(ctx, params.k)
            .await
            .map_err(SenderError::base)?;

        let seed: LpnMatrixSeed = ctx.io_mut().expect_next().await?;

        let sender = sender.setup(
            base.delta(),
            params,
            self.config.lpn_type(),
            seed,
            &base.into_msgs(),
        )?;

        self.round_size = round_size;
        self.state = State::Extension(sender);

        Ok(())
    }

    /// Performs one extension, returning a round of `round_size` correlations.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The thread context.
    #[instrument(level = "debug", fields(thread = %ctx.id()), skip_all, err)]
    pub async fn extend<Ctx>(&mut self, ctx: &mut Ctx) -> Result<SenderBatch, SenderError>
    where
        Ctx: Context,
        Mpcot: MpcotSender<Ctx> + Send,
    {
        let sender = std::mem::replace(&mut self.state, State::Error).try_into_extension()?;

        let (t, n) = sender.mpcot_query();
        let s = self
            .mpcot
            .send_mpcot(ctx, t, n)
            .await
            .map_err(SenderError::mpcot)?;

        let (sender, mut round) = CpuBackend::blocking(move || {
            let mut sender = sender;
            sender.extend(s).map(|round| (sender, round))
        })
        .await?;

        round
            .reduce(self.round_size)
            .map_err(|e| SenderError::config(e.to_string()))?;

        debug!(counter = sender.counter(), len = round.len(), "produced round");

        self.state = State::Extension(sender);

        Ok(round)
    }
}

#[async_trait]
impl<Ctx, BaseCOT, Mpcot> Initializable<Ctx> for Sender<BaseCOT, Mpcot>
where
    Ctx: Context,
    BaseCOT: RandomCOTSender<Ctx> + Send,
    Mpcot: Send,
{
    async fn initialize(&mut self, ctx: &mut Ctx, round_size: usize) -> Result<(), OTError> {
        self.setup(ctx, round_size).await.map_err(OTError::from)
    }
}

#[async_trait]
impl<Ctx, BaseCOT, Mpcot> RoundSource<Ctx> for Sender<BaseCOT, Mpcot>
where
    Ctx: Context,
    BaseCOT: RandomCOTSender<Ctx> + Send,
    Mpcot: MpcotSender<Ctx> + Send,
{
    type Payload = SenderCot;

    fn capacity(&self) -> usize {
        Sender::capacity(self)
    }

    fn params(&self) -> Option<Block> {
        Sender::delta(self)
    }

    async fn produce_round(&mut self, ctx: &mut Ctx) -> Result<SenderBatch, OTError> {
        self.extend(ctx).await.map_err(OTError::from)
    }
}
