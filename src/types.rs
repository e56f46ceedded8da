use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// Cover shown when neither the catalog nor the server provides one.
pub const DEFAULT_COVER_IMAGE: &str = "/static/assets/images/default-track.png";

/// Host of the catalog's web player; URLs on it are links, not audio.
pub const CATALOG_WEB_HOST: &str = "open.spotify.com";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Bearer credential for the catalog API.
///
/// Expiry is not tracked; a 401 from the catalog is the only signal that the
/// credential went stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub access_token: String,
    pub obtained_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            obtained_at: Utc::now(),
        }
    }
}

/// Payload of `GET /api/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub status: String,
    pub access_token: Option<String>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Catalog API payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: Option<String>,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    pub preview_url: Option<String>,
    pub external_urls: Option<ExternalUrls>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<CatalogTrack>,
}

/// Generic paging object used by playlist tracks and search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub images: Option<Vec<Image>>,
    pub owner: Option<Owner>,
    pub tracks: Option<TracksRef>,
    pub external_urls: Option<ExternalUrls>,
}

impl Playlist {
    pub fn track_count(&self) -> u64 {
        self.tracks.as_ref().and_then(|t| t.total).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub artists: Option<Page<CatalogArtist>>,
    pub tracks: Option<Page<CatalogTrack>>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.artists.as_ref().is_none_or(|p| p.items.is_empty())
            && self.tracks.as_ref().is_none_or(|p| p.items.is_empty())
    }
}

// ---------------------------------------------------------------------------
// MusicMood server payloads
// ---------------------------------------------------------------------------

/// One entry of the server's playlist preview listing.
///
/// When `has_preview` is false the server puts the catalog web link into
/// `preview_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewTrack {
    pub id: String,
    pub name: String,
    pub artist: Option<String>,
    pub preview_url: Option<String>,
    pub has_preview: Option<bool>,
    pub spotify_url: Option<String>,
    pub image_url: Option<String>,
}

/// Payload of `GET /playlist.do?action=preview&format=json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub status: String,
    #[serde(default)]
    pub tracks: Vec<PreviewTrack>,
    #[serde(rename = "playlistName")]
    pub playlist_name: Option<String>,
    pub message: Option<String>,
}

/// Status payload returned by `/playlist.do` and `/profile.do` posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: Option<String>,
    #[serde(rename = "likedPlaylistIds")]
    pub liked_playlist_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Add,
    Remove,
}

impl LikeAction {
    pub fn for_liked(liked: bool) -> Self {
        if liked { LikeAction::Add } else { LikeAction::Remove }
    }
}

impl fmt::Display for LikeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeAction::Add => write!(f, "add"),
            LikeAction::Remove => write!(f, "remove"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// A playable (or linkable) item. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: String,
    title: String,
    artist_names: Vec<String>,
    preview_url: Option<String>,
    catalog_url: Option<String>,
    cover_image_url: String,
    has_preview: bool,
    duration_ms: Option<u64>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist_names: Vec::new(),
            preview_url: None,
            catalog_url: None,
            cover_image_url: DEFAULT_COVER_IMAGE.to_string(),
            has_preview: false,
            duration_ms: None,
        }
    }

    /// Sets the inline preview and marks the track as previewable.
    pub fn with_preview(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self.has_preview = true;
        self
    }

    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = Some(url.into());
        self
    }

    pub fn with_artists(mut self, artists: Vec<String>) -> Self {
        self.artist_names = artists;
        self
    }

    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = url.into();
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    /// Builds a track from a catalog track object; items without an id are
    /// local files or removed tracks and are skipped.
    pub fn from_catalog(track: &CatalogTrack) -> Option<Self> {
        let id = track.id.clone()?;
        let mut built = Track::new(id, track.name.clone())
            .with_artists(track.artists.iter().map(|a| a.name.clone()).collect());

        if let Some(url) = track.preview_url.as_deref().filter(|u| !u.is_empty()) {
            built = built.with_preview(url);
        }
        if let Some(url) = track.external_urls.as_ref().and_then(|e| e.spotify.clone()) {
            built = built.with_catalog_url(url);
        }
        if let Some(cover) = track
            .album
            .as_ref()
            .and_then(|a| a.images.as_ref())
            .and_then(|images| images.first())
        {
            built = built.with_cover(cover.url.clone());
        }
        if let Some(ms) = track.duration_ms {
            built = built.with_duration_ms(ms);
        }

        Some(built)
    }

    /// Builds a track from the server's preview listing, moving a catalog web
    /// link out of the preview slot.
    pub fn from_preview(track: &PreviewTrack) -> Self {
        let mut built = Track::new(track.id.clone(), track.name.clone());
        if let Some(artist) = &track.artist {
            built = built.with_artists(
                artist
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect(),
            );
        }

        let preview = track.preview_url.clone().filter(|u| !u.is_empty());
        let flagged = track.has_preview.unwrap_or(preview.is_some());
        let mut catalog_url = track.spotify_url.clone();

        match preview {
            Some(url) if flagged && !utils::is_catalog_web_link(&url) => {
                built = built.with_preview(url);
            }
            Some(url) => {
                catalog_url.get_or_insert(url);
            }
            None => {}
        }

        if let Some(url) = catalog_url {
            built = built.with_catalog_url(url);
        }
        if let Some(image) = &track.image_url {
            built = built.with_cover(image.clone());
        }

        built
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist_names(&self) -> &[String] {
        &self.artist_names
    }

    /// Artists joined for display, `-` when unknown.
    pub fn artists(&self) -> String {
        if self.artist_names.is_empty() {
            "-".to_string()
        } else {
            self.artist_names.join(", ")
        }
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn catalog_url(&self) -> Option<&str> {
        self.catalog_url.as_deref()
    }

    pub fn cover_image_url(&self) -> &str {
        &self.cover_image_url
    }

    pub fn has_preview(&self) -> bool {
        self.has_preview
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// A track is playable when it can either be previewed or opened.
    pub fn is_playable(&self) -> bool {
        self.preview_url.is_some() || self.catalog_url.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    /// Icon of the play/pause control for this state.
    pub fn icon(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "■",
            PlaybackState::Playing => "▶",
            PlaybackState::Paused => "⏸",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        };
        write!(f, "{}", label)
    }
}

/// Position of the current preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub position: Duration,
    pub duration: Duration,
    pub fraction: f64,
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub liked: String,
    pub id: String,
    pub name: String,
    pub owner: String,
    pub tracks: u64,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub title: String,
    pub artists: String,
    pub duration: String,
    pub preview: String,
}

impl TrackTableRow {
    pub fn from_track(rank: usize, track: &Track) -> Self {
        Self {
            rank,
            title: track.title().to_string(),
            artists: track.artists(),
            duration: track
                .duration_ms()
                .map(utils::format_duration)
                .unwrap_or_else(|| "-".to_string()),
            preview: if track.preview_url().is_some() {
                "yes".to_string()
            } else if track.catalog_url().is_some() {
                "link".to_string()
            } else {
                "-".to_string()
            },
        }
    }
}

/// One line of the player's queue listing.
#[derive(Tabled)]
pub struct QueueTableRow {
    #[tabled(rename = "")]
    pub marker: String,
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    pub artists: String,
    pub preview: String,
}

impl QueueTableRow {
    pub fn from_track(index: usize, track: &Track, selected: bool) -> Self {
        let row = TrackTableRow::from_track(index + 1, track);
        Self {
            marker: if selected { ">".to_string() } else { String::new() },
            position: row.rank,
            title: row.title,
            artists: row.artists,
            preview: row.preview,
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
}

/// A playlist's display name together with its tracks, ready for the queue.
#[derive(Debug, Clone)]
pub struct LoadedPlaylist {
    pub name: String,
    pub tracks: Vec<Track>,
}
