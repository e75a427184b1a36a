use crate::protocol::parts::ServerError;
use thiserror::Error;

/// The error type used across this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HdbError {
    /// Communication with the database failed on the socket level.
    ///
    /// The session is unusable afterwards.
    #[error("Error occured in communication with the database")]
    Transport {
        /// The causing Error.
        #[from]
        source: std::io::Error,
    },

    /// The byte stream could not be understood: malformed framing, an
    /// unknown required part, or inconsistent lengths.
    ///
    /// The session is unusable afterwards.
    #[error("Protocol error: {}", _0)]
    Protocol(&'static str),

    /// The byte stream could not be understood (with dynamic detail).
    #[error("Protocol error: {}", _0)]
    ProtocolDetailed(String),

    /// The authentication handshake failed; the transport is closed.
    #[error("Authentication failed")]
    Authentication {
        /// The causing Error.
        source: Box<HdbError>,
    },

    /// The database server responded with one or more errors;
    /// the session remains usable.
    #[error("Database server responded with an error")]
    Db(Vec<ServerError>),

    /// An error occurred on the server that requires the session
    /// to be terminated.
    #[error("An error occurred on the server that requires the session to be terminated")]
    SessionClosingTransactionError,

    /// Some error occured while decoding CESU-8. This indicates a server issue!
    #[error("Some error occured while decoding CESU-8")]
    Cesu8,

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    UsageDetailed(String),

    /// Operation was attempted on a closed connection, result set, or LOB.
    #[error("Operation was attempted on a closed connection, result set, or LOB")]
    Closed,

    /// Error occured in thread synchronization.
    #[error("Error occured in thread synchronization")]
    Poison,
}

/// Abbreviation of `Result<T, HdbError>`.
pub type HdbResult<T> = std::result::Result<T, HdbError>;

impl HdbError {
    /// Returns the first contained [`ServerError`], if any.
    ///
    /// Helps when programmatic access to e.g. the error code is needed.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            Self::Db(server_errors) => server_errors.first(),
            _ => None,
        }
    }

    /// Returns all contained [`ServerError`]s.
    pub fn server_errors(&self) -> Option<&[ServerError]> {
        match self {
            Self::Db(server_errors) => Some(server_errors),
            _ => None,
        }
    }

    /// True if the error was caused by a socket timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport { source }
                if matches!(
                    source.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                )
        )
    }

    /// True if the session cannot be used anymore.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Protocol(_)
                | Self::ProtocolDetailed(_)
                | Self::Authentication { .. }
                | Self::SessionClosingTransactionError
                | Self::Closed
        )
    }
}

impl<G> From<std::sync::PoisonError<G>> for HdbError {
    fn from(_error: std::sync::PoisonError<G>) -> Self {
        Self::Poison
    }
}

macro_rules! impl_err {
    ($($arg:tt)*) => {
        $crate::HdbError::ProtocolDetailed(format!($($arg)*))
    };
}
pub(crate) use impl_err;

macro_rules! usage_err {
    ($($arg:tt)*) => {
        $crate::HdbError::UsageDetailed(format!($($arg)*))
    };
}
pub(crate) use usage_err;
