use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::http::header::InvalidHeaderValue;
use tokio_tungstenite::tungstenite::http::uri::InvalidUri;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Raised when the underlying websocket library refuses to construct a socket.
///
/// The original failure is kept as the cause, untouched, so callers can
/// downcast back to it; its text is also embedded in the message.
#[derive(Debug)]
pub struct CompatibilityError {
    message: Option<String>,
    cause: Option<BoxError>,
}

impl CompatibilityError {
    pub const NAME: &'static str = "CompatibilityError";

    pub fn new(message: Option<String>, cause: Option<BoxError>) -> Self {
        Self { message, cause }
    }

    /// Wraps a failed construction attempt.
    pub fn construction<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            message: Some(format!("Failed to create WebSocket: {err}")),
            cause: Some(Box::new(err)),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.as_deref()?.downcast_ref::<E>()
    }

    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }
}

impl fmt::Display for CompatibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "{}", Self::NAME),
        }
    }
}

impl StdError for CompatibilityError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

/// Base error for everything that goes wrong between the caller and the wire.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),
    #[error("Failed to establish WebSocket connection: {0}")]
    Connection(#[source] tungstenite::Error),
    #[error("server selected sub-protocol {accepted:?}, requested {requested:?}")]
    ProtocolMismatch {
        requested: Vec<String>,
        accepted: Option<String>,
    },
}

impl TransportError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Compatibility(e) => e.name(),
            Self::Connection(_) => "ConnectionError",
            Self::ProtocolMismatch { .. } => "ProtocolMismatchError",
        }
    }
}

/// Reasons the tungstenite backend refuses a `(url, protocols)` pair.
#[derive(Error, Debug)]
pub enum ConstructError {
    #[error("invalid url: {0}")]
    Uri(#[from] InvalidUri),
    #[error("invalid url: {0}")]
    Url(#[from] tungstenite::Error),
    #[error("unsupported url scheme {0:?}, expected \"ws\" or \"wss\"")]
    Scheme(String),
    #[error("url must not contain a fragment")]
    Fragment,
    #[error("invalid sub-protocol {0:?}")]
    Protocol(String),
    #[error("duplicate sub-protocol {0:?}")]
    DuplicateProtocol(String),
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),
}
