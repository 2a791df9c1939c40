//! Ideal functionalities.

pub mod cot;
pub mod mpcot;

use rand::SeedableRng;
use scot_core::{prg::Prg, Block};

use crate::{derandomize, ferret, silent};

use cot::{ideal_rcot, IdealCOTReceiver, IdealCOTSender};
use mpcot::{ideal_mpcot, IdealMpcotReceiver, IdealMpcotSender};

/// Silent COT sender backed by ideal base COT and MPCOT functionalities.
pub type IdealSilentSender = silent::Sender<
    ferret::Sender<IdealCOTSender, IdealMpcotSender>,
    derandomize::Sender,
>;

/// Silent COT receiver backed by ideal base COT and MPCOT functionalities.
pub type IdealSilentReceiver = silent::Receiver<
    ferret::Receiver<IdealCOTReceiver, IdealMpcotReceiver>,
    derandomize::Receiver,
>;

/// Returns a matched silent COT sender and receiver whose base COT and MPCOT are ideal.
///
/// # Arguments
///
/// * `config` - The Ferret configuration shared by both parties.
/// * `seed` - The seed the correlation and the functionalities' randomness derive from.
pub fn ideal_silent_cot(
    config: ferret::FerretConfig,
    seed: Block,
) -> (IdealSilentSender, IdealSilentReceiver) {
    let mut prg = Prg::from_seed(seed);
    let delta = prg.random_block();

    let (rcot_sender, rcot_receiver) = ideal_rcot(prg.random_block(), delta);
    let (mpcot_sender, mpcot_receiver) = ideal_mpcot(prg.random_block(), delta);

    (
        silent::Sender::new(
            ferret::Sender::new(config.clone(), rcot_sender, mpcot_sender),
            derandomize::Sender::new(),
        ),
        silent::Receiver::new(
            ferret::Receiver::new(config, rcot_receiver, mpcot_receiver),
            derandomize::Receiver::new(),
        ),
    )
}
