//! # Player Module
//!
//! Preview playback: the [`PreviewQueue`] of tracks, the
//! [`PlaybackController`] state machine and the [`AudioOutput`]s it drives.
//!
//! ```text
//!            play(track)                 pause()
//!   Idle ───────────────────► Playing ───────────► Paused
//!    ▲                          │  ▲                 │
//!    │   natural completion     │  └──── resume() ───┘
//!    └──────────────────────────┘
//! ```
//!
//! The default build plays through the default audio device. Builds with
//! `--no-default-features` drop the `rodio-output` feature and use a silent
//! clock-driven output instead.

pub mod controller;
pub mod output;
pub mod queue;
#[cfg(feature = "rodio-output")]
pub mod rodio_output;

pub use controller::{Enqueued, PlayOutcome, PlaybackController};
pub use output::{AudioOutput, TimedOutput, TimedSource};
pub use queue::PreviewQueue;
#[cfg(feature = "rodio-output")]
pub use rodio_output::RodioOutput;

#[cfg(feature = "rodio-output")]
pub type DefaultOutput = RodioOutput;
#[cfg(not(feature = "rodio-output"))]
pub type DefaultOutput = TimedOutput;

/// Whether [`default_output`] only keeps time without making any sound.
pub const fn output_is_silent() -> bool {
    cfg!(not(feature = "rodio-output"))
}

/// Opens the output used by the interactive player.
#[cfg(feature = "rodio-output")]
pub fn default_output() -> Result<DefaultOutput, crate::MoodError> {
    RodioOutput::open()
}

/// Opens the output used by the interactive player.
#[cfg(not(feature = "rodio-output"))]
pub fn default_output() -> Result<DefaultOutput, crate::MoodError> {
    Ok(TimedOutput::new())
}
