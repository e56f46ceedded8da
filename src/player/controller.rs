use std::{sync::Mutex, time::Duration};

use crate::{
    MoodError, debug,
    types::{PlaybackState, Progress, Track},
    utils::FALLBACK_PREVIEW_DURATION,
};

use super::{
    output::{AudioOutput, lock},
    queue::PreviewQueue,
};

/// What a call to [`PlaybackController::play`] ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// The inline preview is playing.
    Started,
    /// The track can only be opened on the catalog's site. Playback was left
    /// untouched; the caller decides whether to open `url`.
    ExternalLinkRequested { url: String, title: String },
    /// Another `play` started while this one was loading; its audio was
    /// discarded.
    Superseded,
}

/// Result of [`PlaybackController::enqueue`].
#[derive(Debug)]
pub struct Enqueued {
    pub added: usize,
    /// Set when autoplay kicked in.
    pub autoplay: Option<Result<PlayOutcome, MoodError>>,
}

#[derive(Debug, Default)]
struct Inner {
    state: PlaybackState,
    current: Option<Track>,
    generation: u64,
    queue: PreviewQueue,
    /// Volume to restore on unmute; `Some` while muted.
    muted_volume: Option<f32>,
}

/// Sole owner of the audio output.
///
/// Every method takes `&self`, so a new command can arrive while a previous
/// `play` is still loading. The internal lock is never held across an await.
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    inner: Mutex<Inner>,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.inner).state
    }

    pub fn current(&self) -> Option<Track> {
        lock(&self.inner).current.clone()
    }

    /// Snapshot of the queue.
    pub fn queue(&self) -> PreviewQueue {
        lock(&self.inner).queue.clone()
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.inner).queue.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        lock(&self.inner).queue.cursor()
    }

    /// Plays `track`.
    ///
    /// Tracks without an inline preview produce
    /// [`PlayOutcome::ExternalLinkRequested`] when they have a catalog link and
    /// [`MoodError::Unplayable`] otherwise; neither changes the playback state.
    /// A start failure leaves the controller `Idle` with `track` as current.
    pub async fn play(&self, track: &Track) -> Result<PlayOutcome, MoodError> {
        let Some(url) = track.preview_url() else {
            return match track.catalog_url() {
                Some(url) => Ok(PlayOutcome::ExternalLinkRequested {
                    url: url.to_string(),
                    title: track.title().to_string(),
                }),
                None => Err(MoodError::Unplayable),
            };
        };

        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state != PlaybackState::Idle {
                self.output.stop();
            }
            inner.state = PlaybackState::Idle;
            inner.current = Some(track.clone());
            inner.generation += 1;
            inner.generation
        };

        let loaded = self.output.load(url).await;

        let mut inner = lock(&self.inner);
        if inner.generation != generation {
            debug!("Dropping superseded preview of {}", track.title());
            return Ok(PlayOutcome::Superseded);
        }

        let source = loaded.map_err(into_playback)?;
        self.output.start(source).map_err(into_playback)?;
        inner.state = PlaybackState::Playing;

        Ok(PlayOutcome::Started)
    }

    /// Playing becomes Paused; anything else is left alone.
    pub fn pause(&self) {
        let mut inner = lock(&self.inner);
        if inner.state == PlaybackState::Playing {
            self.output.pause();
            inner.state = PlaybackState::Paused;
        }
    }

    /// Paused becomes Playing on the same track; anything else is left alone.
    pub fn resume(&self) {
        let mut inner = lock(&self.inner);
        if inner.state == PlaybackState::Paused {
            self.output.resume();
            inner.state = PlaybackState::Playing;
        }
    }

    /// Pauses, resumes, or from `Idle` plays the current track.
    ///
    /// From `Idle` the current track is used, then the queue's selected
    /// track, then the queue's autoplay start. Returns the play outcome when
    /// a play was issued.
    pub async fn toggle(&self) -> Result<Option<PlayOutcome>, MoodError> {
        let track = {
            let mut inner = lock(&self.inner);
            let state = inner.state;
            match state {
                PlaybackState::Playing => {
                    self.output.pause();
                    inner.state = PlaybackState::Paused;
                    return Ok(None);
                }
                PlaybackState::Paused => {
                    self.output.resume();
                    inner.state = PlaybackState::Playing;
                    return Ok(None);
                }
                PlaybackState::Idle => match inner.current.clone() {
                    Some(track) => Some(track),
                    None => match inner.queue.current().cloned() {
                        Some(track) => Some(track),
                        None => inner
                            .queue
                            .autoplay_start()
                            .and_then(|i| inner.queue.jump_to(i).ok().cloned()),
                    },
                },
            }
        };

        match track {
            Some(track) => self.play(&track).await.map(Some),
            None => Ok(None),
        }
    }

    /// Stops playback. The current track stays bound so it can be replayed.
    pub fn stop(&self) {
        let mut inner = lock(&self.inner);
        self.output.stop();
        inner.state = PlaybackState::Idle;
        inner.generation += 1;
    }

    /// Handles a preview that played to its end: goes `Idle` and plays the
    /// next queued track, if any.
    pub async fn on_natural_completion(&self) -> Result<Option<PlayOutcome>, MoodError> {
        let next = {
            let mut inner = lock(&self.inner);
            if inner.state != PlaybackState::Playing {
                return Ok(None);
            }
            self.output.stop();
            inner.state = PlaybackState::Idle;
            inner.queue.advance().cloned()
        };

        match next {
            Some(track) => self.play(&track).await.map(Some),
            None => {
                debug!("Reached the end of the queue");
                Ok(None)
            }
        }
    }

    /// Checks the output for a finished preview and moves on if so.
    pub async fn poll(&self) -> Result<Option<PlayOutcome>, MoodError> {
        let finished = {
            let inner = lock(&self.inner);
            inner.state == PlaybackState::Playing && self.output.is_finished()
        };

        if finished {
            self.on_natural_completion().await
        } else {
            Ok(None)
        }
    }

    /// Mutes the output, or restores the volume it had before muting.
    /// Returns whether the output is muted afterwards.
    pub fn toggle_mute(&self) -> bool {
        let mut inner = lock(&self.inner);
        match inner.muted_volume.take() {
            Some(previous) => {
                self.output.set_volume(previous);
                false
            }
            None => {
                inner.muted_volume = Some(self.output.volume());
                self.output.set_volume(0.0);
                true
            }
        }
    }

    pub fn is_muted(&self) -> bool {
        lock(&self.inner).muted_volume.is_some()
    }

    /// Moves to `fraction` (clamped to `0..=1`) of the current preview and
    /// returns the new position. An unknown duration counts as 30 seconds.
    pub fn seek(&self, fraction: f64) -> Result<Duration, MoodError> {
        let inner = lock(&self.inner);
        if inner.state == PlaybackState::Idle {
            return Err(MoodError::Playback("nothing is playing".to_string()));
        }

        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = self.known_duration().mul_f64(fraction);
        self.output.seek(target)?;

        Ok(target)
    }

    /// Position of the current preview, if a track is bound.
    pub fn progress(&self) -> Option<Progress> {
        let inner = lock(&self.inner);
        inner.current.as_ref()?;

        let duration = self.known_duration();
        let position = if inner.state == PlaybackState::Idle {
            Duration::ZERO
        } else {
            self.output.position().min(duration)
        };

        Some(Progress {
            position,
            duration,
            fraction: position.as_secs_f64() / duration.as_secs_f64(),
        })
    }

    /// Appends `tracks` to the queue, dropping unplayable ones.
    ///
    /// With `autoplay`, a batch landing in an empty queue starts at the first
    /// track with an inline preview, or at the first track when none has one.
    pub async fn enqueue(&self, tracks: Vec<Track>, autoplay: bool) -> Enqueued {
        let (added, start) = {
            let mut inner = lock(&self.inner);
            let was_empty = inner.queue.is_empty();
            let added = inner.queue.append(tracks);

            let start = if autoplay && was_empty && added > 0 {
                inner
                    .queue
                    .autoplay_start()
                    .and_then(|i| inner.queue.jump_to(i).ok().cloned())
            } else {
                None
            };
            (added, start)
        };

        let autoplay = match start {
            Some(track) => Some(self.play(&track).await),
            None => None,
        };

        Enqueued { added, autoplay }
    }

    /// Stops playback and empties the queue.
    pub fn clear_queue(&self) {
        let mut inner = lock(&self.inner);
        self.output.stop();
        inner.state = PlaybackState::Idle;
        inner.generation += 1;
        inner.current = None;
        inner.queue.clear();
    }

    /// Plays the next queued track. `Ok(None)` at the end of the queue.
    pub async fn next(&self) -> Result<Option<PlayOutcome>, MoodError> {
        let track = lock(&self.inner).queue.advance().cloned();
        match track {
            Some(track) => self.play(&track).await.map(Some),
            None => Ok(None),
        }
    }

    /// Plays the previous queued track. `Ok(None)` at the start of the queue.
    pub async fn previous(&self) -> Result<Option<PlayOutcome>, MoodError> {
        let track = lock(&self.inner).queue.retreat().cloned();
        match track {
            Some(track) => self.play(&track).await.map(Some),
            None => Ok(None),
        }
    }

    /// Selects and plays the queued track at `index`.
    pub async fn jump_to(&self, index: usize) -> Result<PlayOutcome, MoodError> {
        let track = lock(&self.inner).queue.jump_to(index)?.clone();
        self.play(&track).await
    }

    fn known_duration(&self) -> Duration {
        self.output
            .duration()
            .filter(|d| !d.is_zero())
            .unwrap_or(FALLBACK_PREVIEW_DURATION)
    }
}

fn into_playback(err: MoodError) -> MoodError {
    match err {
        MoodError::Playback(_) => err,
        other => MoodError::Playback(other.to_string()),
    }
}
