use std::collections::HashSet;
use std::error::Error as StdError;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::handshake::client::{Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::{HeaderValue, Uri};
use tokio_tungstenite::{connect_async_tls_with_config, MaybeTlsStream, WebSocketStream};
use tracing::info;

use crate::error::{ConstructError, TransportError};
use crate::request::{Protocols, SocketUrl};

pub type WSStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The single websocket library the factory delegates to.
pub trait SocketBackend {
    type Handle;
    type Error: StdError + Send + Sync + 'static;

    fn construct(&self, url: SocketUrl, protocols: Protocols) -> Result<Self::Handle, Self::Error>;
}

/// Backend built on tokio-tungstenite.
///
/// Construction prepares and validates the handshake request; no I/O happens
/// until [`PendingSocket::open`] is awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteBackend;

impl SocketBackend for TungsteniteBackend {
    type Handle = PendingSocket;
    type Error = ConstructError;

    fn construct(&self, url: SocketUrl, protocols: Protocols) -> Result<PendingSocket, ConstructError> {
        let uri = match url {
            SocketUrl::Text(text) => {
                // http::Uri silently drops fragments
                if text.contains('#') {
                    return Err(ConstructError::Fragment);
                }
                text.parse::<Uri>()?
            }
            SocketUrl::Uri(uri) => uri,
        };

        // tungstenite only connects lowercase schemes and http::Uri keeps the original case
        let scheme = uri.scheme_str().unwrap_or_default();
        if scheme != "ws" && scheme != "wss" {
            return Err(ConstructError::Scheme(scheme.to_owned()));
        }

        let mut request = uri.into_client_request()?;
        validate_protocols(&protocols)?;
        if let Some(value) = protocols.header_value() {
            request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_str(&value)?);
        }

        Ok(PendingSocket { request, protocols })
    }
}

fn validate_protocols(protocols: &Protocols) -> Result<(), ConstructError> {
    let mut seen = HashSet::new();
    for protocol in protocols.as_slice() {
        if protocol.is_empty() || !protocol.bytes().all(is_token_byte) {
            return Err(ConstructError::Protocol(protocol.clone()));
        }
        if !seen.insert(protocol.as_str()) {
            return Err(ConstructError::DuplicateProtocol(protocol.clone()));
        }
    }
    Ok(())
}

/// RFC 2616 token characters, which RFC 6455 requires for sub-protocol names.
#[inline]
fn is_token_byte(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7e)
        && !matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'='
                | b'{' | b'}'
        )
}

/// A websocket that has been constructed but not yet connected.
#[derive(Debug)]
pub struct PendingSocket {
    request: Request,
    protocols: Protocols,
}

impl PendingSocket {
    pub fn url(&self) -> &Uri {
        self.request.uri()
    }

    pub fn protocols(&self) -> &Protocols {
        &self.protocols
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Performs the opening handshake, one attempt only.
    ///
    /// A sub-protocol disagreement detected during the handshake itself is
    /// reported as `ProtocolMismatch` with no `accepted` value.
    pub async fn open(self, disable_nagle: bool) -> Result<(WSStream, Response), TransportError> {
        let url = self.request.uri().to_string();
        let (stream, response) = connect_async_tls_with_config(self.request, None, disable_nagle, None)
            .await
            .map_err(|e| match e {
                tungstenite::Error::Protocol(ProtocolError::SecWebSocketSubProtocolError(_)) => {
                    TransportError::ProtocolMismatch {
                        requested: self.protocols.to_vec(),
                        accepted: None,
                    }
                }
                e => TransportError::Connection(e),
            })?;

        let accepted = response
            .headers()
            .get(SEC_WEBSOCKET_PROTOCOL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if !self.protocols.is_empty() && !accepted.as_deref().is_some_and(|p| self.protocols.contains(p)) {
            return Err(TransportError::ProtocolMismatch {
                requested: self.protocols.to_vec(),
                accepted,
            });
        }

        info!("connected to {url} with sub-protocol {accepted:?}");
        Ok((stream, response))
    }
}
