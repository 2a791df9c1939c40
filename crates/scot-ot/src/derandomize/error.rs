use scot_ot_core::derandomize::DerandomizeError;

use crate::OTError;

/// Error of the derandomization sender.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    /// The correction could not be received.
    #[error("failed to receive correction: {0}")]
    Io(#[from] std::io::Error),
    /// The received correction does not fit the batch.
    #[error("rejected correction: {0}")]
    Correction(#[from] DerandomizeError),
}

/// Error of the derandomization receiver.
#[derive(Debug, thiserror::Error)]
pub enum ReceiverError {
    /// The correction could not be sent.
    #[error("failed to send correction: {0}")]
    Io(#[from] std::io::Error),
    /// The choices do not fit the batch.
    #[error("invalid choices: {0}")]
    Correction(#[from] DerandomizeError),
}

impl From<SenderError> for OTError {
    fn from(err: SenderError) -> Self {
        OTError::SenderError(Box::new(err))
    }
}

impl From<ReceiverError> for OTError {
    fn from(err: ReceiverError) -> Self {
        OTError::ReceiverError(Box::new(err))
    }
}
