use crate::{MoodError, types::StatusResponse, utils};

use super::BackendClient;

impl BackendClient {
    /// Updates one profile field (`name`, `password` or `phone`).
    ///
    /// The value is validated locally first; nothing is sent for an invalid
    /// value or without a session.
    pub async fn update_profile(&self, field: &str, value: &str) -> Result<(), MoodError> {
        utils::validate_profile_field(field, value)?;

        if !self.has_session() {
            return Err(MoodError::SignInRequired);
        }

        let response = self
            .with_session(self.http.post(self.url("/profile.do")))
            .form(&[("field", field), ("value", value)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MoodError::Backend(format!("HTTP {}", status.as_u16())));
        }

        // The server usually answers with the re-rendered profile page; only
        // an explicit JSON error status counts as a failure.
        let body = response.text().await?;
        match serde_json::from_str::<StatusResponse>(&body) {
            Ok(result) if result.status != "OK" => Err(MoodError::Backend(
                result.message.unwrap_or(result.status),
            )),
            _ => Ok(()),
        }
    }
}
