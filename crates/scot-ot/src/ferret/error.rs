use std::fmt::Display;

use scot_ot_core::expand::ExpandError;

use crate::OTError;

/// Ferret sender error.
#[derive(Debug, thiserror::Error)]
pub struct SenderError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Ferret receiver error.
#[derive(Debug, thiserror::Error)]
pub struct ReceiverError {
    kind: ErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug)]
enum ErrorKind {
    Io,
    State,
    Config,
    Core,
    Base,
    Mpcot,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Io => f.write_str("io error"),
            ErrorKind::State => f.write_str("state error"),
            ErrorKind::Config => f.write_str("config error"),
            ErrorKind::Core => f.write_str("core error"),
            ErrorKind::Base => f.write_str("base cot error"),
            ErrorKind::Mpcot => f.write_str("mpcot error"),
        }
    }
}

macro_rules! impl_error {
    ($err:ident, $variant:ident) => {
        impl $err {
            pub(crate) fn state(msg: impl Into<String>) -> Self {
                Self {
                    kind: ErrorKind::State,
                    source: Some(msg.into().into()),
                }
            }

            pub(crate) fn config(msg: impl Into<String>) -> Self {
                Self {
                    kind: ErrorKind::Config,
                    source: Some(msg.into().into()),
                }
            }

            pub(crate) fn base(err: OTError) -> Self {
                Self {
                    kind: ErrorKind::Base,
                    source: Some(Box::new(err)),
                }
            }

            pub(crate) fn mpcot(err: OTError) -> Self {
                Self {
                    kind: ErrorKind::Mpcot,
                    source: Some(Box::new(err)),
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

        impl From<std::io::Error> for $err {
            fn from(err: std::io::Error) -> Self {
                Self {
                    kind: ErrorKind::Io,
                    source: Some(Box::new(err)),
                }
            }
        }

        impl From<ExpandError> for $err {
            fn from(err: ExpandError) -> Self {
                Self {
                    kind: ErrorKind::Core,
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

impl From<crate::ferret::sender::StateError> for SenderError {
    fn from(err: crate::ferret::sender::StateError) -> Self {
        SenderError::state(err.to_string())
    }
}

impl From<crate::ferret::receiver::StateError> for ReceiverError {
    fn from(err: crate::ferret::receiver::StateError) -> Self {
        ReceiverError::state(err.to_string())
    }
}
