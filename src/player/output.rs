use std::{
    future::Future,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

use crate::{MoodError, utils::FALLBACK_PREVIEW_DURATION};

/// Something that can render a preview.
///
/// `load` does the slow part (fetching, decoding) and may be awaited while the
/// controller is free to accept other commands; everything else is expected
/// to return promptly.
pub trait AudioOutput {
    type Source: Send;

    /// Prepares the audio at `url` for playback.
    fn load(&self, url: &str) -> impl Future<Output = Result<Self::Source, MoodError>> + Send;

    /// Replaces whatever is playing with `source` and starts it.
    fn start(&self, source: Self::Source) -> Result<(), MoodError>;

    fn pause(&self);

    fn resume(&self);

    fn stop(&self);

    fn seek(&self, position: Duration) -> Result<(), MoodError>;

    fn position(&self) -> Duration;

    /// Length of the current source, when known.
    fn duration(&self) -> Option<Duration>;

    /// Whether the current source played to its end.
    fn is_finished(&self) -> bool;

    /// Sets the playback volume, where `1.0` is unchanged and `0.0` is silent.
    fn set_volume(&self, volume: f32);

    fn volume(&self) -> f32;
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Source accepted by [`TimedOutput`].
#[derive(Debug, Clone)]
pub struct TimedSource {
    pub url: String,
    pub length: Duration,
}

#[derive(Debug, Default)]
struct Clock {
    length: Option<Duration>,
    offset: Duration,
    started_at: Option<Instant>,
}

impl Clock {
    fn position(&self) -> Duration {
        let running = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
        let position = self.offset + running;
        match self.length {
            Some(length) => position.min(length),
            None => Duration::ZERO,
        }
    }
}

/// Silent output that only keeps time.
///
/// Every preview is assumed to last `preview_length`. Used when the binary is
/// built without an audio backend.
#[derive(Debug)]
pub struct TimedOutput {
    preview_length: Duration,
    clock: Mutex<Clock>,
    volume: Mutex<f32>,
}

impl TimedOutput {
    pub fn new() -> Self {
        Self::with_length(FALLBACK_PREVIEW_DURATION)
    }

    pub fn with_length(preview_length: Duration) -> Self {
        Self {
            preview_length,
            clock: Mutex::new(Clock::default()),
            volume: Mutex::new(1.0),
        }
    }
}

impl Default for TimedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for TimedOutput {
    type Source = TimedSource;

    async fn load(&self, url: &str) -> Result<TimedSource, MoodError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| MoodError::Playback(format!("invalid preview URL '{}': {}", url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MoodError::Playback(format!(
                "unsupported preview URL scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(TimedSource {
            url: url.to_string(),
            length: self.preview_length,
        })
    }

    fn start(&self, source: TimedSource) -> Result<(), MoodError> {
        let mut clock = lock(&self.clock);
        *clock = Clock {
            length: Some(source.length),
            offset: Duration::ZERO,
            started_at: Some(Instant::now()),
        };
        Ok(())
    }

    fn pause(&self) {
        let mut clock = lock(&self.clock);
        clock.offset = clock.position();
        clock.started_at = None;
    }

    fn resume(&self) {
        let mut clock = lock(&self.clock);
        if clock.length.is_some() && clock.started_at.is_none() {
            clock.started_at = Some(Instant::now());
        }
    }

    fn stop(&self) {
        *lock(&self.clock) = Clock::default();
    }

    fn seek(&self, position: Duration) -> Result<(), MoodError> {
        let mut clock = lock(&self.clock);
        let Some(length) = clock.length else {
            return Err(MoodError::Playback("nothing loaded".to_string()));
        };
        clock.offset = position.min(length);
        if clock.started_at.is_some() {
            clock.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        lock(&self.clock).position()
    }

    fn duration(&self) -> Option<Duration> {
        lock(&self.clock).length
    }

    fn is_finished(&self) -> bool {
        let clock = lock(&self.clock);
        match clock.length {
            Some(length) => clock.position() >= length,
            None => false,
        }
    }

    fn set_volume(&self, volume: f32) {
        *lock(&self.volume) = volume;
    }

    fn volume(&self) -> f32 {
        *lock(&self.volume)
    }
}
