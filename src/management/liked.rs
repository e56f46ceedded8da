use serde::{Deserialize, Serialize};

/// Local mirror of the playlists the user liked on the server.
///
/// Updated optimistically while a like request is in flight and replaced by
/// the server's list once it answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikedPlaylists {
    ids: Vec<String>,
}

impl LikedPlaylists {
    pub fn new(ids: Vec<String>) -> Self {
        let mut liked = Self::default();
        liked.reconcile(ids);
        liked
    }

    pub fn contains(&self, playlist_id: &str) -> bool {
        self.ids.iter().any(|id| id == playlist_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Marks `playlist_id` as liked or not. Returns whether anything changed.
    pub fn apply(&mut self, playlist_id: &str, liked: bool) -> bool {
        match (liked, self.contains(playlist_id)) {
            (true, false) => {
                self.ids.push(playlist_id.to_string());
                true
            }
            (false, true) => {
                self.ids.retain(|id| id != playlist_id);
                true
            }
            _ => false,
        }
    }

    /// Replaces the local state with the server's list, keeping its order and
    /// dropping duplicates.
    pub fn reconcile(&mut self, server_ids: Vec<String>) {
        self.ids.clear();
        for id in server_ids {
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
    }
}
