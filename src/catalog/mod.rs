//! # Catalog Module
//!
//! Authenticated access to the third-party music catalog API. Every request
//! carries `Authorization: Bearer <token>` with a credential borrowed from the
//! shared [`TokenProvider`].
//!
//! ## Token refresh policy
//!
//! ```text
//! request ──► 2xx ──────────────────────────► decode JSON
//!    │
//!    └──► 401 ──► refresh credential (once) ──► retry (once)
//!                                                 ├─► 2xx ──► decode JSON
//!                                                 └─► 401 ──► MoodError::Auth
//! ```
//!
//! Any other non-2xx status becomes [`MoodError::Catalog`] and a body that is
//! not the expected JSON becomes [`MoodError::Decode`]. Nothing else is retried.
//!
//! ## Submodules
//!
//! - [`playlists`] - playlist metadata, playlist tracks, charts
//! - [`search`] - artist and track search

pub mod playlists;
pub mod search;

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{MoodError, config, debug, management::TokenProvider, types::Credential};

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    market: String,
    tokens: Arc<TokenProvider>,
}

impl CatalogClient {
    pub fn new(
        base_url: impl Into<String>,
        market: impl Into<String>,
        tokens: Arc<TokenProvider>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            market: market.into(),
            tokens,
        }
    }

    pub fn from_config(tokens: Arc<TokenProvider>) -> Self {
        Self::new(config::catalog_url(), config::market(), tokens)
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn tokens(&self) -> &Arc<TokenProvider> {
        &self.tokens
    }

    /// Issues `GET {base}{path}?{params}` and returns the raw JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - Path below the catalog base URL, starting with `/`
    /// * `params` - Query parameters appended to the URL
    ///
    /// # Errors
    ///
    /// * [`MoodError::Auth`] - no credential could be acquired, or the catalog
    ///   rejected a freshly acquired one
    /// * [`MoodError::Catalog`] - any other non-2xx status
    /// * [`MoodError::Decode`] - the body is not JSON
    /// * [`MoodError::Network`] - the request could not be sent
    ///
    /// A 401 triggers exactly one credential refresh and one retry.
    pub async fn request(&self, path: &str, params: &[(&str, String)]) -> Result<Value, MoodError> {
        let credential = self.tokens.credential().await?;
        let mut response = self.send(path, params, &credential).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Catalog rejected the token for {}, re-acquiring", path);
            let fresh = self.tokens.refresh(&credential).await?;
            response = self.send(path, params, &fresh).await?;

            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(MoodError::Auth(
                    "catalog rejected a freshly acquired token".to_string(),
                ));
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(MoodError::Catalog {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(MoodError::from)
    }

    /// Like [`request`](Self::request), decoding the body into `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MoodError> {
        let value = self.request(path, params).await?;
        serde_json::from_value(value).map_err(MoodError::from)
    }

    async fn send(
        &self,
        path: &str,
        params: &[(&str, String)],
        credential: &Credential,
    ) -> Result<Response, MoodError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        self.http
            .get(&url)
            .query(params)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(MoodError::from)
    }
}
