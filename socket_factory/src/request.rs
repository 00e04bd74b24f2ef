use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::http::Uri;

/// Address of a websocket endpoint, either already parsed or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketUrl {
    Uri(Uri),
    Text(String),
}

impl From<Uri> for SocketUrl {
    fn from(uri: Uri) -> Self {
        Self::Uri(uri)
    }
}

impl From<&str> for SocketUrl {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for SocketUrl {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for SocketUrl {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl fmt::Display for SocketUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketUrl::Uri(uri) => write!(f, "{uri}"),
            SocketUrl::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Sub-protocols offered during the opening handshake, in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Protocols {
    #[default]
    None,
    Single(String),
    Many(Vec<String>),
}

impl Protocols {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Protocols::None => &[],
            Protocols::Single(protocol) => std::slice::from_ref(protocol),
            Protocols::Many(protocols) => protocols,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn contains(&self, protocol: &str) -> bool {
        self.as_slice().iter().any(|p| p == protocol)
    }

    /// Value for the `Sec-WebSocket-Protocol` request header, if any protocol was offered.
    pub fn header_value(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.as_slice().join(", "))
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.as_slice().to_vec()
    }
}

impl From<()> for Protocols {
    fn from(_: ()) -> Self {
        Protocols::None
    }
}

impl From<&str> for Protocols {
    fn from(protocol: &str) -> Self {
        Protocols::Single(protocol.to_owned())
    }
}

impl From<String> for Protocols {
    fn from(protocol: String) -> Self {
        Protocols::Single(protocol)
    }
}

impl From<Vec<String>> for Protocols {
    fn from(protocols: Vec<String>) -> Self {
        Protocols::Many(protocols)
    }
}

impl From<Vec<&str>> for Protocols {
    fn from(protocols: Vec<&str>) -> Self {
        Protocols::Many(protocols.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for Protocols {
    fn from(protocols: &[&str]) -> Self {
        Protocols::Many(protocols.iter().map(|p| (*p).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Protocols {
    fn from(protocols: [&str; N]) -> Self {
        Protocols::Many(protocols.iter().map(|p| (*p).to_owned()).collect())
    }
}

impl<T: Into<Protocols>> From<Option<T>> for Protocols {
    fn from(protocols: Option<T>) -> Self {
        protocols.map_or(Protocols::None, Into::into)
    }
}
