use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::{MoodError, backend::BackendClient, debug, types::Credential};

/// Owns the catalog credential and lends it to the catalog client.
///
/// Acquisitions are single-flight: while one request to the token endpoint is
/// in flight, overlapping callers wait for it and reuse its credential.
pub struct TokenProvider {
    backend: BackendClient,
    cached: Mutex<Option<Credential>>,
    in_flight: tokio::sync::Mutex<()>,
    acquisitions: AtomicU64,
}

impl TokenProvider {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            cached: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
            acquisitions: AtomicU64::new(0),
        }
    }

    /// The credential currently held, if any.
    pub fn cached(&self) -> Option<Credential> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful acquisitions so far.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Returns the cached credential, acquiring one on first use.
    ///
    /// The acquisition counter is read before the cache so that an
    /// acquisition finishing in between is still seen as a fresh one.
    pub async fn credential(&self) -> Result<Credential, MoodError> {
        let seen = self.acquisitions();
        match self.cached() {
            Some(credential) => Ok(credential),
            None => self.acquire_after(seen).await,
        }
    }

    /// Obtains a new credential from the token endpoint.
    ///
    /// A caller that had to wait for another acquisition returns that
    /// acquisition's credential instead of requesting a second one.
    pub async fn acquire(&self) -> Result<Credential, MoodError> {
        self.acquire_after(self.acquisitions()).await
    }

    async fn acquire_after(&self, seen: u64) -> Result<Credential, MoodError> {
        let _flight = self.in_flight.lock().await;

        if self.acquisitions() != seen {
            if let Some(credential) = self.cached() {
                debug!("Reusing credential acquired while waiting");
                return Ok(credential);
            }
        }

        let credential = self.backend.fetch_token().await?;
        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        debug!("Catalog token acquired");

        Ok(credential)
    }

    /// Replaces a credential the catalog rejected.
    ///
    /// The cache is only cleared if it still holds `rejected`; when another
    /// caller already replaced it, that newer credential is returned.
    pub async fn refresh(&self, rejected: &Credential) -> Result<Credential, MoodError> {
        {
            let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
            match cached.as_ref() {
                Some(current) if current.access_token != rejected.access_token => {
                    return Ok(current.clone());
                }
                _ => *cached = None,
            }
        }

        self.acquire().await
    }
}
