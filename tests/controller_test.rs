use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use musicmood::MoodError;
use musicmood::player::{AudioOutput, PlayOutcome, PlaybackController};
use musicmood::types::{PlaybackState, Track};

/// Output that records what the controller asked it to do.
#[derive(Default)]
struct FakeOutput {
    calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<Vec<String>>,
    finished: AtomicBool,
    position: Mutex<Duration>,
    volume: Mutex<f32>,
}

impl FakeOutput {
    fn slow(self, url: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
        self
    }

    fn failing(self, url: &str) -> Self {
        self.failing.lock().unwrap().push(url.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl AudioOutput for FakeOutput {
    type Source = String;

    async fn load(&self, url: &str) -> Result<String, MoodError> {
        let delay = self.delays.lock().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().iter().any(|u| u == url) {
            return Err(MoodError::Playback("unsupported codec".to_string()));
        }
        Ok(url.to_string())
    }

    fn start(&self, source: String) -> Result<(), MoodError> {
        self.finished.store(false, Ordering::SeqCst);
        *self.position.lock().unwrap() = Duration::ZERO;
        self.record(format!("start {}", source));
        Ok(())
    }

    fn pause(&self) {
        self.record("pause");
    }

    fn resume(&self) {
        self.record("resume");
    }

    fn stop(&self) {
        self.record("stop");
    }

    fn seek(&self, position: Duration) -> Result<(), MoodError> {
        *self.position.lock().unwrap() = position;
        self.record(format!("seek {}", position.as_secs()));
        Ok(())
    }

    fn position(&self) -> Duration {
        *self.position.lock().unwrap()
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = volume;
        self.record(format!("volume {}", volume));
    }

    fn volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }
}

// Helper function to create a track with an inline preview
fn previewable(id: &str) -> Track {
    Track::new(id, format!("Track {}", id)).with_preview(preview_url(id))
}

// Helper function to create a track that only has a catalog link
fn link_only(id: &str) -> Track {
    Track::new(id, format!("Track {}", id)).with_catalog_url(catalog_url(id))
}

fn preview_url(id: &str) -> String {
    format!("https://p.example/{}.mp3", id)
}

fn catalog_url(id: &str) -> String {
    format!("https://open.spotify.com/track/{}", id)
}

#[tokio::test]
async fn test_autoplay_then_link_on_completion() {
    let controller = PlaybackController::new(FakeOutput::default());

    let enqueued = controller
        .enqueue(vec![previewable("1"), link_only("2")], true)
        .await;

    assert_eq!(enqueued.added, 2);
    assert_eq!(enqueued.autoplay, Some(Ok(PlayOutcome::Started)));
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current().unwrap().id(), "1");

    controller.output().finished.store(true, Ordering::SeqCst);
    let outcome = controller.poll().await.unwrap();

    assert_eq!(
        outcome,
        Some(PlayOutcome::ExternalLinkRequested {
            url: catalog_url("2"),
            title: "Track 2".to_string(),
        })
    );
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.cursor(), Some(1));
}

#[tokio::test]
async fn test_autoplay_starts_at_first_preview() {
    let controller = PlaybackController::new(FakeOutput::default());

    let enqueued = controller
        .enqueue(vec![link_only("A"), previewable("B"), previewable("C")], true)
        .await;

    assert_eq!(enqueued.autoplay, Some(Ok(PlayOutcome::Started)));
    assert_eq!(controller.current().unwrap().id(), "B");
    assert_eq!(controller.cursor(), Some(1));
}

#[tokio::test]
async fn test_autoplay_only_for_an_empty_queue() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.enqueue(vec![previewable("1")], false).await;

    let enqueued = controller.enqueue(vec![previewable("2")], true).await;

    assert_eq!(enqueued.added, 1);
    assert!(enqueued.autoplay.is_none());
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn test_toggle_twice_from_idle_pauses() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.enqueue(vec![previewable("1")], false).await;

    let first = controller.toggle().await.unwrap();
    assert_eq!(first, Some(PlayOutcome::Started));
    assert_eq!(controller.state(), PlaybackState::Playing);

    let second = controller.toggle().await.unwrap();
    assert_eq!(second, None);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current().unwrap().id(), "1");

    controller.toggle().await.unwrap();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current().unwrap().id(), "1");
}

#[tokio::test]
async fn test_toggle_with_nothing_to_play() {
    let controller = PlaybackController::new(FakeOutput::default());

    assert_eq!(controller.toggle().await.unwrap(), None);
    assert_eq!(controller.state(), PlaybackState::Idle);
}

#[tokio::test]
async fn test_pause_and_resume_only_from_matching_states() {
    let controller = PlaybackController::new(FakeOutput::default());

    controller.pause();
    controller.resume();
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(controller.output().calls().is_empty());

    controller.play(&previewable("1")).await.unwrap();
    controller.resume();
    assert_eq!(controller.state(), PlaybackState::Playing);

    controller.pause();
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(
        controller.output().calls(),
        vec![format!("start {}", preview_url("1")), "pause".to_string()]
    );
}

#[tokio::test]
async fn test_link_only_track_keeps_playback() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.play(&previewable("1")).await.unwrap();

    let outcome = controller.play(&link_only("2")).await.unwrap();

    assert!(matches!(outcome, PlayOutcome::ExternalLinkRequested { .. }));
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current().unwrap().id(), "1");
}

#[tokio::test]
async fn test_unplayable_track() {
    let controller = PlaybackController::new(FakeOutput::default());

    let err = controller.play(&Track::new("x", "Nothing")).await.unwrap_err();

    assert_eq!(err, MoodError::Unplayable);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(controller.current().is_none());
}

#[tokio::test]
async fn test_start_failure_keeps_queue_position() {
    let output = FakeOutput::default().failing(&preview_url("2"));
    let controller = PlaybackController::new(output);
    controller
        .enqueue(vec![previewable("1"), previewable("2")], true)
        .await;

    let err = controller.next().await.unwrap_err();

    assert!(matches!(err, MoodError::Playback(_)));
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.cursor(), Some(1));
    assert_eq!(controller.current().unwrap().id(), "2");
}

#[tokio::test]
async fn test_second_play_supersedes_pending_load() {
    let output = FakeOutput::default().slow(&preview_url("slow"), Duration::from_millis(60));
    let controller = PlaybackController::new(output);

    let slow = previewable("slow");
    let fast = previewable("fast");
    let (first, second) = tokio::join!(controller.play(&slow), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.play(&fast).await
    });

    assert_eq!(first.unwrap(), PlayOutcome::Superseded);
    assert_eq!(second.unwrap(), PlayOutcome::Started);
    assert_eq!(controller.current().unwrap().id(), "fast");
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(
        controller.output().calls(),
        vec![format!("start {}", preview_url("fast"))]
    );
}

#[tokio::test]
async fn test_play_stops_the_running_preview() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.play(&previewable("1")).await.unwrap();

    controller.play(&previewable("2")).await.unwrap();

    assert_eq!(
        controller.output().calls(),
        vec![
            format!("start {}", preview_url("1")),
            "stop".to_string(),
            format!("start {}", preview_url("2")),
        ]
    );
}

#[tokio::test]
async fn test_seek_uses_fallback_duration() {
    let controller = PlaybackController::new(FakeOutput::default());

    assert!(controller.seek(0.5).is_err());

    controller.play(&previewable("1")).await.unwrap();

    assert_eq!(controller.seek(0.5).unwrap(), Duration::from_secs(15));
    assert_eq!(controller.seek(3.0).unwrap(), Duration::from_secs(30));
    assert_eq!(controller.seek(-1.0).unwrap(), Duration::ZERO);

    controller.seek(0.25).unwrap();
    let progress = controller.progress().unwrap();
    assert_eq!(progress.duration, Duration::from_secs(30));
    assert!((progress.fraction - 0.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_natural_completion_at_the_end_stays_idle() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.enqueue(vec![previewable("1")], true).await;

    let outcome = controller.on_natural_completion().await.unwrap();

    assert_eq!(outcome, None);
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.cursor(), Some(0));
}

#[tokio::test]
async fn test_natural_completion_plays_next_preview() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller
        .enqueue(vec![previewable("1"), previewable("2")], true)
        .await;

    let outcome = controller.on_natural_completion().await.unwrap();

    assert_eq!(outcome, Some(PlayOutcome::Started));
    assert_eq!(controller.current().unwrap().id(), "2");
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[tokio::test]
async fn test_poll_ignores_unfinished_preview() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller
        .enqueue(vec![previewable("1"), previewable("2")], true)
        .await;

    assert_eq!(controller.poll().await.unwrap(), None);
    assert_eq!(controller.cursor(), Some(0));
}

#[tokio::test]
async fn test_queue_navigation() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller
        .enqueue(vec![previewable("1"), previewable("2"), previewable("3")], false)
        .await;

    assert_eq!(controller.previous().await.unwrap(), None);
    assert_eq!(controller.next().await.unwrap(), Some(PlayOutcome::Started));
    assert_eq!(controller.current().unwrap().id(), "1");

    controller.jump_to(2).await.unwrap();
    assert_eq!(controller.current().unwrap().id(), "3");
    assert_eq!(controller.next().await.unwrap(), None);

    let err = controller.jump_to(7).await.unwrap_err();
    assert_eq!(err, MoodError::OutOfRange { index: 7, len: 3 });
    assert_eq!(controller.cursor(), Some(2));

    assert_eq!(controller.previous().await.unwrap(), Some(PlayOutcome::Started));
    assert_eq!(controller.current().unwrap().id(), "2");
}

#[tokio::test]
async fn test_clear_queue_stops_playback() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.enqueue(vec![previewable("1")], true).await;

    controller.clear_queue();

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.queue_len(), 0);
    assert_eq!(controller.cursor(), None);
    assert!(controller.current().is_none());
    assert_eq!(controller.output().calls().last().map(String::as_str), Some("stop"));
}

#[tokio::test]
async fn test_mute_then_unmute_restores_volume() {
    let controller = PlaybackController::new(FakeOutput::default());
    controller.output().set_volume(0.6);
    controller.enqueue(vec![previewable("1")], true).await;

    assert!(controller.toggle_mute());
    assert!(controller.is_muted());
    assert_eq!(controller.output().volume(), 0.0);

    // Muting survives a track change.
    controller.play(&previewable("2")).await.unwrap();
    assert_eq!(controller.output().volume(), 0.0);

    assert!(!controller.toggle_mute());
    assert!(!controller.is_muted());
    assert_eq!(controller.output().volume(), 0.6);
    assert_eq!(controller.state(), PlaybackState::Playing);
}
