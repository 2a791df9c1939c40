use scot_core::lpn::LpnError;

/// An error that can occur during silent expansion.
#[derive(Debug, thiserror::Error)]
#[error("silent expansion error: {0}")]
pub struct ExpandError(pub String);

impl From<LpnError> for ExpandError {
    fn from(err: LpnError) -> Self {
        Self(err.to_string())
    }
}
