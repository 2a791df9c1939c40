//! Silent expansion of correlated OTs, following [`Ferret`](https://eprint.iacr.org/2020/924.pdf).
//!
//! The [`Sender`] and [`Receiver`] are [`RoundSource`](crate::RoundSource)s: after a setup which
//! consumes `k` base correlations, every round runs one multi-point COT and a local LPN encoding,
//! with no other communication.

mod error;
mod receiver;
mod sender;

pub use error::{ReceiverError, SenderError};
pub use receiver::Receiver;
pub use sender::Sender;
pub use scot_ot_core::expand::{LpnType, LPN_PARAMETERS_REGULAR, LPN_PARAMETERS_UNIFORM};

use derive_builder::Builder;
use scot_core::lpn::LpnParameters;

/// Ferret configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct FerretConfig {
    /// LPN parameters.
    #[builder(default = "LPN_PARAMETERS_REGULAR")]
    lpn_parameters: LpnParameters,
    /// LPN error distribution.
    #[builder(default)]
    lpn_type: LpnType,
}

impl FerretConfig {
    /// Creates a new builder for the configuration.
    pub fn builder() -> FerretConfigBuilder {
        FerretConfigBuilder::default()
    }

    /// Returns the LPN parameters.
    pub fn lpn_parameters(&self) -> LpnParameters {
        self.lpn_parameters
    }

    /// Returns the LPN error distribution.
    pub fn lpn_type(&self) -> LpnType {
        self.lpn_type
    }
}

impl FerretConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let lpn_parameters = self.lpn_parameters.unwrap_or(LPN_PARAMETERS_REGULAR);
        let lpn_type = self.lpn_type.unwrap_or_default();

        lpn_parameters
            .validate(lpn_type.is_regular())
            .map_err(|e| e.to_string())
    }
}

impl Default for FerretConfig {
    fn default() -> Self {
        Self {
            lpn_parameters: LPN_PARAMETERS_REGULAR,
            lpn_type: LpnType::Regular,
        }
    }
}
