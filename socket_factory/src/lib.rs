pub mod backend;
pub mod config;
pub mod environment;
pub mod error;
pub mod request;

use tracing::{debug, warn};

use crate::backend::{PendingSocket, SocketBackend, TungsteniteBackend};
use crate::environment::{describe_environment_with, EnvironmentInfo, ProcessEnvironment, REQUIRES_COMPATIBILITY_SHIM};
use crate::error::CompatibilityError;
use crate::request::{Protocols, SocketUrl};

/// Builds websocket handles through a single backend, turning any
/// construction failure into a [`CompatibilityError`].
#[derive(Debug, Clone, Default)]
pub struct WebSocketFactory<B = TungsteniteBackend> {
    backend: B,
}

impl<B: SocketBackend> WebSocketFactory<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn create(
        &self,
        url: impl Into<SocketUrl>,
        protocols: impl Into<Protocols>,
    ) -> Result<B::Handle, CompatibilityError> {
        let url = url.into();
        let protocols = protocols.into();
        debug!("creating websocket for {url} with protocols {:?}", protocols.as_slice());

        self.backend.construct(url, protocols).map_err(|e| {
            warn!("websocket construction failed: {e}");
            CompatibilityError::construction(e)
        })
    }

    pub async fn create_async(
        &self,
        url: impl Into<SocketUrl>,
        protocols: impl Into<Protocols>,
    ) -> Result<B::Handle, CompatibilityError> {
        self.create(url, protocols)
    }
}

pub fn create(url: impl Into<SocketUrl>, protocols: impl Into<Protocols>) -> Result<PendingSocket, CompatibilityError> {
    WebSocketFactory::<TungsteniteBackend>::default().create(url, protocols)
}

pub async fn create_async(
    url: impl Into<SocketUrl>,
    protocols: impl Into<Protocols>,
) -> Result<PendingSocket, CompatibilityError> {
    WebSocketFactory::<TungsteniteBackend>::default().create_async(url, protocols).await
}

/// Always `false`; the shim is gone but callers still ask.
pub const fn requires_compatibility_shim() -> bool {
    REQUIRES_COMPATIBILITY_SHIM
}

pub fn describe_environment() -> EnvironmentInfo {
    describe_environment_with(&ProcessEnvironment::default())
}
