use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use socket_factory::backend::SocketBackend;
use socket_factory::request::{Protocols, SocketUrl};
use thiserror::Error;

static NEXT_ERROR_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stub refused {url}: {reason}")]
pub struct StubError {
    pub id: u64,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubHandle {
    pub url: String,
    pub protocols: Vec<String>,
}

/// Backend that records how often it was asked and the last error it handed out.
#[derive(Debug, Default)]
pub struct StubBackend {
    refuse: Option<String>,
    calls: AtomicUsize,
    last_error: Mutex<Option<StubError>>,
}

impl StubBackend {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            refuse: Some(reason.to_owned()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> StubError {
        self.last_error.lock().unwrap().clone().expect("no error was produced")
    }
}

impl SocketBackend for StubBackend {
    type Handle = StubHandle;
    type Error = StubError;

    fn construct(&self, url: SocketUrl, protocols: Protocols) -> Result<StubHandle, StubError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.refuse {
            Some(reason) => {
                let error = StubError {
                    id: NEXT_ERROR_ID.fetch_add(1, Ordering::SeqCst),
                    url: url.to_string(),
                    reason: reason.clone(),
                };
                self.last_error.lock().unwrap().replace(error.clone());
                Err(error)
            }
            None => Ok(StubHandle {
                url: url.to_string(),
                protocols: protocols.to_vec(),
            }),
        }
    }
}
