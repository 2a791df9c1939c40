use std::fmt::Display;

use scot_ot_core::BufferError;

use crate::OTError;

/// The kind of a silent COT error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller violated a precondition. The session is left untouched.
    Config,
    /// The session is not in a state which allows the call, e.g. it was never initialized or it
    /// was destroyed by an earlier abort.
    State,
    /// A round or correction failed, e.g. the peer sent a malformed message or the channel was
    /// closed. The buffer was discarded and the session destroyed.
    Abort,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config error"),
            ErrorKind::State => f.write_str("state error"),
            ErrorKind::Abort => f.write_str("protocol abort"),
        }
    }
}

/// Silent COT sender error.
#[derive(Debug, thiserror::Error)]
pub struct SenderError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Silent COT receiver error.
#[derive(Debug, thiserror::Error)]
pub struct ReceiverError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

macro_rules! impl_error {
    ($err:ident, $variant:ident) => {
        impl $err {
            /// Returns the kind of error.
            pub fn kind(&self) -> ErrorKind {
                self.kind
            }

            /// Returns `true` if the error terminated the session.
            pub fn is_abort(&self) -> bool {
                self.kind == ErrorKind::Abort
            }

            pub(crate) fn config(msg: impl Into<String>) -> Self {
                Self {
                    kind: ErrorKind::Config,
                    source: Some(msg.into().into()),
                }
            }

            pub(crate) fn state(msg: impl Into<String>) -> Self {
                Self {
                    kind: ErrorKind::State,
                    source: Some(msg.into().into()),
                }
            }

            pub(crate) fn abort<E>(err: E) -> Self
            where
                E: Into<Box<dyn std::error::Error + Send + Sync>>,
            {
                Self {
                    kind: ErrorKind::Abort,
                    source: Some(err.into()),
                }
            }
        }

        impl Display for $err {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.kind.fmt(f)?;

                if let Some(source) = &self.source {
                    write!(f, " caused by: {}", source)
                } else {
                    Ok(())
                }
            }
        }

        impl From<BufferError> for $err {
            fn from(err: BufferError) -> Self {
                Self {
                    kind: ErrorKind::Config,
                    source: Some(Box::new(err)),
                }
            }
        }

        impl From<$err> for OTError {
            fn from(err: $err) -> Self {
                OTError::$variant(Box::new(err))
            }
        }
    };
}

impl_error!(SenderError, SenderError);
impl_error!(ReceiverError, ReceiverError);

impl From<crate::silent::sender::StateError> for SenderError {
    fn from(err: crate::silent::sender::StateError) -> Self {
        SenderError::state(err.to_string())
    }
}

impl From<crate::silent::receiver::StateError> for ReceiverError {
    fn from(err: crate::silent::receiver::StateError) -> Self {
        ReceiverError::state(err.to_string())
    }
}
