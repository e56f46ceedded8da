use crate::{MoodError, error, info, management::Session, success};

/// Likes (`liked == true`) or unlikes a playlist.
pub async fn like(session: &mut Session, playlist_id: &str, liked: bool) {
    match session.set_liked(playlist_id, liked).await {
        Ok(true) if liked => success!("Added {} to your liked playlists", playlist_id),
        Ok(true) => success!("Removed {} from your liked playlists", playlist_id),
        Ok(false) if liked => info!("Playlist {} is already liked", playlist_id),
        Ok(false) => info!("Playlist {} is not liked", playlist_id),
        Err(MoodError::SignInRequired) => {
            error!("Sign in required. Set MUSICMOOD_USER_ID and MUSICMOOD_SESSION_COOKIE.")
        }
        Err(e) => error!("Could not update likes for {}: {}", playlist_id, e),
    }
}
