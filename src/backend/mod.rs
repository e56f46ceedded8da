//! # Backend Module
//!
//! Client for the endpoints served by the MusicMood web server itself, as
//! opposed to the third-party catalog:
//!
//! - [`token`] - `GET /api/token`, hands out catalog bearer credentials
//! - [`likes`] - `POST /playlist.do` with `action=like`, toggles a liked playlist
//! - [`preview`] - `GET /playlist.do?action=preview`, previewable tracks of a playlist
//! - [`profile`] - `POST /profile.do`, edits a single profile field
//!
//! Like and profile calls identify the user through the session cookie taken
//! from `MUSICMOOD_SESSION_COOKIE`.

pub mod likes;
pub mod preview;
pub mod profile;
pub mod token;

use reqwest::{Client, RequestBuilder, header::COOKIE};

use crate::config;

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, session_cookie: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie,
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::base_url(), config::session_cookie())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.session_cookie.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }
}
