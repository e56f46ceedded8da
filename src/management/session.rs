use std::{io, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    MoodError,
    backend::BackendClient,
    catalog::{CatalogClient, playlists::PLAYLIST_PREVIEW_LIMIT},
    config, debug,
    types::{LikeAction, LoadedPlaylist},
};

use super::{LikedPlaylists, TokenProvider};

/// What survives between runs in `cache/session.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub user_id: Option<String>,
    #[serde(default)]
    pub liked_playlist_ids: Vec<String>,
}

/// Context shared by every view: who is signed in, which playlists they like
/// and the clients used to talk to the server and the catalog.
pub struct Session {
    user_id: Option<String>,
    liked: LikedPlaylists,
    backend: BackendClient,
    catalog: CatalogClient,
    state_path: Option<PathBuf>,
}

impl Session {
    /// Builds a session that never touches the disk.
    pub fn new(
        user_id: Option<String>,
        liked: LikedPlaylists,
        backend: BackendClient,
        catalog: CatalogClient,
    ) -> Self {
        Self {
            user_id,
            liked,
            backend,
            catalog,
            state_path: None,
        }
    }

    /// Builds the session from configuration and the persisted session file.
    ///
    /// An unreadable session file is treated as a fresh start.
    pub async fn bootstrap() -> Self {
        let path = Self::state_file();
        let state = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<SessionState>(&content).unwrap_or_else(|e| {
                debug!("Ignoring malformed session file {}: {}", path.display(), e);
                SessionState::default()
            }),
            Err(_) => SessionState::default(),
        };

        let backend = BackendClient::from_config();
        let tokens = Arc::new(TokenProvider::new(backend.clone()));
        let catalog = CatalogClient::from_config(tokens);
        let user_id = config::user_id().or(state.user_id);

        if user_id.is_none() && backend.has_session() {
            debug!("Session cookie set but MUSICMOOD_USER_ID is missing");
        }

        Self {
            user_id,
            liked: LikedPlaylists::new(state.liked_playlist_ids),
            backend,
            catalog,
            state_path: Some(path),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn liked(&self) -> &LikedPlaylists {
        &self.liked
    }

    pub fn is_liked(&self, playlist_id: &str) -> bool {
        self.liked.contains(playlist_id)
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn tokens(&self) -> &Arc<TokenProvider> {
        self.catalog.tokens()
    }

    /// Likes or unlikes a playlist.
    ///
    /// Returns `Ok(false)` without contacting the server when the playlist is
    /// already in the requested state. The local list is updated before the
    /// request, replaced by the server's list on success and restored on
    /// failure.
    pub async fn set_liked(&mut self, playlist_id: &str, liked: bool) -> Result<bool, MoodError> {
        if !self.is_signed_in() {
            return Err(MoodError::SignInRequired);
        }

        if self.liked.contains(playlist_id) == liked {
            return Ok(false);
        }

        let previous = self.liked.clone();
        self.liked.apply(playlist_id, liked);

        match self
            .backend
            .toggle_like(playlist_id, LikeAction::for_liked(liked))
            .await
        {
            Ok(Some(server_ids)) => self.liked.reconcile(server_ids),
            Ok(None) => {}
            Err(e) => {
                self.liked = previous;
                return Err(e);
            }
        }

        if let Err(e) = self.persist().await {
            debug!("Could not save session state: {}", e);
        }

        Ok(true)
    }

    /// Loads a playlist for the preview queue.
    ///
    /// The server's preview listing is preferred. When it fails, is empty or
    /// has no inline previews, the catalog is asked instead; if that fails
    /// too, a non-empty server listing is still returned.
    pub async fn load_playlist_tracks(&self, playlist_id: &str) -> Result<LoadedPlaylist, MoodError> {
        let server = match self.backend.playlist_preview(playlist_id).await {
            Ok(loaded) if loaded.tracks.iter().any(|t| t.has_preview()) => return Ok(loaded),
            Ok(loaded) => {
                debug!("Server listing for {} has no previews", playlist_id);
                Some(loaded)
            }
            Err(e) => {
                debug!("Server preview for {} failed: {}", playlist_id, e);
                None
            }
        };

        match self
            .catalog
            .load_playlist(playlist_id, Some(PLAYLIST_PREVIEW_LIMIT))
            .await
        {
            Ok(loaded) => Ok(loaded),
            Err(e) => match server {
                Some(loaded) if !loaded.tracks.is_empty() => Ok(loaded),
                _ => Err(e),
            },
        }
    }

    /// Writes the session file, if this session has one.
    pub async fn persist(&self) -> io::Result<()> {
        let Some(path) = &self.state_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let state = SessionState {
            user_id: self.user_id.clone(),
            liked_playlist_ids: self.liked.ids().to_vec(),
        };
        let json = serde_json::to_string_pretty(&state).map_err(io::Error::other)?;
        async_fs::write(path, json).await
    }

    fn state_file() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }
}
