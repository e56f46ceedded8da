use crate::{
    MoodError, debug,
    types::{Credential, TokenResponse},
};

use super::BackendClient;

pub const TOKEN_STATUS_SUCCESS: &str = "SUCCESS";

impl BackendClient {
    /// Requests a catalog credential from `GET /api/token`.
    ///
    /// Every failure (unreachable server, non-2xx status, unexpected payload,
    /// `status: ERROR`, missing token) is reported as [`MoodError::Auth`].
    pub async fn fetch_token(&self) -> Result<Credential, MoodError> {
        debug!("Requesting catalog token from {}", self.url("/api/token"));

        let response = self
            .http
            .get(self.url("/api/token"))
            .send()
            .await
            .map_err(|e| MoodError::Auth(format!("token endpoint unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MoodError::Auth(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| MoodError::Auth(format!("unexpected token payload: {}", e)))?;

        match payload.access_token {
            Some(token) if payload.status == TOKEN_STATUS_SUCCESS && !token.is_empty() => {
                Ok(Credential::new(token))
            }
            _ => Err(MoodError::Auth(
                payload
                    .error
                    .unwrap_or_else(|| "token payload without access_token".to_string()),
            )),
        }
    }
}
