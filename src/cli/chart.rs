use tabled::Table;

use crate::{
    catalog::playlists::ChartKind, error, info, management::Session, types::TrackTableRow,
};

use super::{player, spinner};

pub async fn chart(session: &Session, kind: ChartKind, play: bool) {
    let pb = spinner(format!("Loading the {} chart...", kind));
    let result = session
        .catalog()
        .playlist_tracks(kind.playlist_id(), None)
        .await;
    pb.finish_and_clear();

    let tracks = match result {
        Ok(tracks) if tracks.is_empty() => {
            error!("The {} chart has no tracks right now", kind);
            return;
        }
        Ok(tracks) => tracks,
        Err(e) => {
            error!("Failed to load the {} chart: {}", kind, e);
            return;
        }
    };

    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackTableRow::from_track(i + 1, track))
        .collect();
    println!("{}", Table::new(rows));

    if play {
        info!("Starting preview player with {} chart tracks", tracks.len());
        player::run_tracks(tracks, true).await;
    }
}
