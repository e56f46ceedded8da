use crate::{
    MoodError, debug,
    types::{LikeAction, StatusResponse},
};

use super::BackendClient;

impl BackendClient {
    /// Adds or removes a playlist from the signed-in user's likes.
    ///
    /// Posts the `like` action to `/playlist.do` with the session cookie
    /// attached.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Catalog id of the playlist
    /// * `action` - [`LikeAction::Add`] or [`LikeAction::Remove`]
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ids))` - the server's authoritative list of liked playlist ids
    /// - `Ok(None)` - the request succeeded but the body carried no list, or
    ///   was not JSON at all (the server answers some requests with a page)
    ///
    /// # Errors
    ///
    /// * [`MoodError::Network`] - the server could not be reached
    /// * [`MoodError::Backend`] - non-2xx status, or a JSON body whose
    ///   `status` is not `OK`
    ///
    /// # Example
    ///
    /// ```
    /// let backend = BackendClient::from_config();
    /// if let Some(ids) = backend.toggle_like("37i9dQZF1DX9tPFwDMOaN1", LikeAction::Add).await? {
    ///     println!("{} liked playlists", ids.len());
    /// }
    /// ```
    pub async fn toggle_like(
        &self,
        playlist_id: &str,
        action: LikeAction,
    ) -> Result<Option<Vec<String>>, MoodError> {
        let like_action = action.to_string();
        let response = self
            .with_session(self.http.post(self.url("/playlist.do")))
            .form(&[
                ("action", "like"),
                ("playlistId", playlist_id),
                ("likeAction", like_action.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<StatusResponse>(&body);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(MoodError::Backend(message));
        }

        let Ok(result) = parsed else {
            debug!("Like response for {} was not JSON, assuming success", playlist_id);
            return Ok(None);
        };

        if result.status == "OK" {
            Ok(result.liked_playlist_ids)
        } else {
            Err(MoodError::Backend(result.message.unwrap_or(result.status)))
        }
    }
}
