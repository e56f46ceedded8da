use crate::{
    MoodError, debug,
    types::{LoadedPlaylist, PreviewResponse, Track},
};

use super::BackendClient;

impl BackendClient {
    /// Fetches the server-side preview listing of a playlist.
    ///
    /// Calls `GET /playlist.do?action=preview&playlistId=..&format=json`.
    /// Entries the server could only link to come back with their catalog link
    /// in `catalog_url` and no inline preview.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Catalog id of the playlist
    ///
    /// # Errors
    ///
    /// * [`MoodError::Network`] - the server could not be reached
    /// * [`MoodError::Backend`] - non-2xx status or a `status` other than `OK`
    /// * [`MoodError::Decode`] - the body is not the expected listing
    pub async fn playlist_preview(&self, playlist_id: &str) -> Result<LoadedPlaylist, MoodError> {
        let response = self
            .http
            .get(self.url("/playlist.do"))
            .query(&[
                ("action", "preview"),
                ("playlistId", playlist_id),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MoodError::Backend(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(MoodError::Decode("empty preview response".to_string()));
        }

        let data: PreviewResponse = serde_json::from_str(&body)?;
        if data.status != "OK" {
            return Err(MoodError::Backend(
                data.message.unwrap_or_else(|| data.status.clone()),
            ));
        }

        let tracks: Vec<Track> = data.tracks.iter().map(Track::from_preview).collect();
        debug!(
            "Server preview for {}: {} tracks, {} previewable",
            playlist_id,
            tracks.len(),
            tracks.iter().filter(|t| t.has_preview()).count()
        );

        Ok(LoadedPlaylist {
            name: data.playlist_name.unwrap_or_else(|| "Playlist".to_string()),
            tracks,
        })
    }
}
