use std::fmt;

use crate::{
    MoodError,
    types::{LoadedPlaylist, Page, Playlist, PlaylistItem, Track},
};

use super::CatalogClient;

/// Playlists shown on the playlist overview page.
pub const CURATED_PLAYLISTS: [&str; 8] = [
    "2jqJzW5rXwu9FpUdGNdo2W", // drive
    "1Krm4ydj8K9nhqsbzXW9Zg", // calm
    "7k6QVcqBgBIjQYdwVReZBG", // party + club
    "6sJ5fgYe6zpxkOtsl1s8MG", // well done today
    "29LZX2dHXmL9vyUZQwQtHF", // summer hit k-pop
    "6Ve9tZAEZrzVMnd58NszvB", // mega hit remix
    "1q43xX4kCl9VSIta8NBWNC", // 2000s love songs
    "2vbVutkblurEK8uqQkIeLu", // workplace k-pop
];

/// Track limit used when a whole playlist is loaded for previewing.
pub const PLAYLIST_PREVIEW_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChartKind {
    #[default]
    Global,
    Korea,
    Viral,
}

impl ChartKind {
    /// Catalog playlist backing this chart.
    pub fn playlist_id(&self) -> &'static str {
        match self {
            ChartKind::Global => "0qCecIw8Om1eqmNKpltLa3",
            ChartKind::Korea => "0utGjGYyT1ejhfqvCpGBos",
            ChartKind::Viral => "3epDPxgQIQLZeLvifFL6fw",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Global => write!(f, "global"),
            ChartKind::Korea => write!(f, "korea"),
            ChartKind::Viral => write!(f, "viral"),
        }
    }
}

impl CatalogClient {
    /// `GET /playlists/{id}`
    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist, MoodError> {
        self.get(&format!("/playlists/{}", playlist_id), &[]).await
    }

    /// Retrieves the tracks of a catalog playlist.
    ///
    /// Calls `GET /playlists/{id}/tracks?limit=N` and converts each item with
    /// [`Track::from_catalog`]. Items without a track, or whose track has no
    /// id (local files, removed tracks), are skipped.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Catalog id of the playlist
    /// * `limit` - Maximum number of items to request; `None` uses the
    ///   catalog's default page size
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`CatalogClient::request`].
    ///
    /// # Example
    ///
    /// ```
    /// let tracks = catalog.playlist_tracks("37i9dQZEVXbMDoHDwVN2tF", Some(100)).await?;
    /// let playable = tracks.iter().filter(|t| t.has_preview()).count();
    /// ```
    pub async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Track>, MoodError> {
        let params: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();

        let page: Page<PlaylistItem> = self
            .get(&format!("/playlists/{}/tracks", playlist_id), &params)
            .await?;

        Ok(tracks_from_items(&page.items))
    }

    /// Playlist name plus its tracks.
    pub async fn load_playlist(
        &self,
        playlist_id: &str,
        limit: Option<u32>,
    ) -> Result<LoadedPlaylist, MoodError> {
        let playlist = self.playlist(playlist_id).await?;
        let tracks = self.playlist_tracks(playlist_id, limit).await?;

        Ok(LoadedPlaylist {
            name: playlist.name,
            tracks,
        })
    }
}

/// Converts playlist items, dropping entries without a usable track.
pub fn tracks_from_items(items: &[PlaylistItem]) -> Vec<Track> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter_map(Track::from_catalog)
        .collect()
}
