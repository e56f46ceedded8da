//! MusicMood CLI Library
//!
//! This library is the client side of the MusicMood music-discovery site. It
//! fetches playlists, charts and search results from the third-party music
//! catalog, keeps the user's liked playlists in sync with the MusicMood server
//! and drives a preview player over a queue of tracks.
//!
//! # Modules
//!
//! - `backend` - Endpoints served by the MusicMood web server (token, likes, previews, profile)
//! - `catalog` - Authenticated client for the third-party catalog API
//! - `cli` - Command-line views
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every module
//! - `management` - Token provider, liked playlists and the session context
//! - `player` - Preview queue, playback controller and audio outputs
//! - `types` - Data structures and type definitions
//! - `utils` - Formatting and validation helpers
//!
//! # Example
//!
//! ```
//! use musicmood::{config, management::Session};
//!
//! #[tokio::main]
//! async fn main() -> musicmood::Res<()> {
//!     config::load_env().await?;
//!     let session = Session::bootstrap().await;
//!     let playlist = session.catalog().playlist("2jqJzW5rXwu9FpUdGNdo2W").await?;
//!     println!("{}", playlist.name);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod player;
pub mod types;
pub mod utils;

pub use error::MoodError;

/// A convenient Result type alias for CLI glue that may fail in many ways.
///
/// Library operations return `Result<T, MoodError>`; this boxed alias is used
/// where errors of several origins (configuration, I/O, library) meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching playlist {}", id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("{} tracks added to the queue", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr.
///
/// Unlike a panic this never terminates the program: every failure in
/// MusicMood degrades to a visible message and the command returns.
///
/// # Example
///
/// ```
/// error!("Failed to load playlists: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, e.g. a single playlist that could not be
/// fetched while the rest of the list renders.
///
/// # Example
///
/// ```
/// warning!("Skipping playlist {}: {}", id, e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when `MUSICMOOD_DEBUG` is set.
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::config::debug_enabled() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format!($($arg)*).dimmed());
    }
  })
}
