use tabled::Table;

use crate::{
    error, info,
    management::Session,
    types::{ArtistTableRow, Track, TrackTableRow},
};

use super::spinner;

pub async fn search(session: &Session, query: &str, limit: u32) {
    let query = query.trim();
    if query.is_empty() {
        error!("Enter something to search for");
        return;
    }

    let pb = spinner(format!("Searching for \"{}\"...", query));
    let result = session.catalog().search(query, limit).await;
    pb.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Search failed: {}", e);
            return;
        }
    };

    if response.is_empty() {
        info!("No results for \"{}\"", query);
        return;
    }

    if let Some(artists) = response.artists.filter(|p| !p.items.is_empty()) {
        info!("Artists");
        let rows: Vec<ArtistTableRow> = artists
            .items
            .into_iter()
            .map(|artist| ArtistTableRow {
                name: artist.name,
                genres: if artist.genres.is_empty() {
                    "-".to_string()
                } else {
                    artist.genres.join(", ")
                },
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if let Some(tracks) = response.tracks.filter(|p| !p.items.is_empty()) {
        info!("Tracks");
        let rows: Vec<TrackTableRow> = tracks
            .items
            .iter()
            .filter_map(Track::from_catalog)
            .enumerate()
            .map(|(i, track)| TrackTableRow::from_track(i + 1, &track))
            .collect();
        println!("{}", Table::new(rows));
    }
}
