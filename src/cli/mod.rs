//! # CLI Module
//!
//! The user-facing views of MusicMood. Each view fetches what it needs through
//! the [`Session`](crate::management::Session), renders it as a table or a
//! status line and reports failures as messages. No view keeps state of its
//! own: liked playlists live in the session, playback lives in the
//! [`PlaybackController`](crate::player::PlaybackController).
//!
//! ## Commands
//!
//! - [`chart`] - ranked chart tracks, optionally handed to the player
//! - [`list_playlists`] / [`show_playlist`] - curated, liked or single playlists
//! - [`search`] - artists and tracks matching a query
//! - [`like`] - like or unlike a playlist
//! - [`show_profile`] / [`set_profile`] - profile overview and field updates
//! - [`play`] - interactive preview player over a playlist
//!
//! ## Layers
//!
//! ```text
//! CLI Layer (views)
//!     ↓
//! Management Layer (session, liked playlists, token provider)
//!     ↓
//! Catalog / Backend clients
//!     ↓
//! Network Layer (HTTP requests)
//! ```
//!
//! ## Error presentation
//!
//! Network and API failures end the current command with an `error!` line.
//! Partial failures, such as one playlist of a list that cannot be fetched,
//! become a `warning!` and the rest is rendered.

mod chart;
mod likes;
mod player;
mod playlists;
mod profile;
mod search;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use chart::chart;
pub use likes::like;
pub use player::play;
pub use player::run_tracks;
pub use playlists::list_playlists;
pub use playlists::show_playlist;
pub use profile::set_profile;
pub use profile::show_profile;
pub use search::search;

fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
