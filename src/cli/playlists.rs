use tabled::Table;

use crate::{
    catalog::playlists::CURATED_PLAYLISTS,
    error, info,
    management::Session,
    types::{PlaylistTableRow, TrackTableRow},
    warning,
};

use super::spinner;

const LIKED_MARK: &str = "♥";

/// Lists the curated playlists, or the user's liked ones with `liked`.
pub async fn list_playlists(session: &Session, liked: bool) {
    let ids: Vec<String> = if liked {
        if !session.is_signed_in() {
            warning!("Not signed in, showing locally known likes only");
        }
        session.liked().ids().to_vec()
    } else {
        CURATED_PLAYLISTS.iter().map(|id| id.to_string()).collect()
    };

    if ids.is_empty() {
        info!("No liked playlists yet. Use `musicmood like <playlist-id>`.");
        return;
    }

    let pb = spinner(format!("Loading {} playlists...", ids.len()));

    let mut handles = Vec::new();
    for id in ids {
        let catalog = session.catalog().clone();
        handles.push(tokio::spawn(async move {
            let result = catalog.playlist(&id).await;
            (id, result)
        }));
    }

    let mut rows: Vec<PlaylistTableRow> = Vec::new();
    for handle in handles {
        match handle.await {
            Ok((_, Ok(playlist))) => rows.push(PlaylistTableRow {
                liked: mark(session.is_liked(&playlist.id)),
                owner: playlist
                    .owner
                    .as_ref()
                    .and_then(|o| o.display_name.clone())
                    .unwrap_or_else(|| "-".to_string()),
                tracks: playlist.track_count(),
                id: playlist.id,
                name: playlist.name,
            }),
            Ok((id, Err(e))) => {
                pb.suspend(|| warning!("Skipping playlist {}: {}", id, e));
            }
            Err(e) => {
                pb.suspend(|| warning!("Task join error: {}", e));
            }
        }
    }
    pb.finish_and_clear();

    if rows.is_empty() {
        error!("None of the playlists could be loaded");
        return;
    }

    println!("{}", Table::new(rows));
}

/// Shows one playlist and its tracks.
pub async fn show_playlist(session: &Session, playlist_id: &str, limit: Option<u32>) {
    let pb = spinner("Loading playlist...");
    let catalog = session.catalog();
    let result = tokio::try_join!(
        catalog.playlist(playlist_id),
        catalog.playlist_tracks(playlist_id, limit)
    );
    pb.finish_and_clear();

    let (playlist, tracks) = match result {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load playlist {}: {}", playlist_id, e);
            return;
        }
    };

    info!(
        "{} {} ({} tracks)",
        playlist.name,
        mark(session.is_liked(&playlist.id)),
        playlist.track_count()
    );
    if let Some(description) = playlist.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", description);
    }
    if let Some(url) = playlist.external_urls.as_ref().and_then(|e| e.spotify.as_deref()) {
        println!("{}", url);
    }

    if tracks.is_empty() {
        info!("This playlist has no tracks");
        return;
    }

    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackTableRow::from_track(i + 1, track))
        .collect();
    println!("{}", Table::new(rows));
}

fn mark(liked: bool) -> String {
    if liked {
        LIKED_MARK.to_string()
    } else {
        String::new()
    }
}
