use std::{
    io::Cursor,
    sync::{Mutex, mpsc},
    thread,
    time::Duration,
};

use rodio::{Decoder, OutputStreamBuilder, Sink, Source};

use crate::{MoodError, debug};

use super::output::{AudioOutput, lock};

/// Plays previews on the default audio device.
///
/// The device stream lives on its own thread for as long as the output
/// exists; only the sink is shared with the caller.
pub struct RodioOutput {
    http: reqwest::Client,
    sink: Sink,
    duration: Mutex<Option<Duration>>,
    _keep_alive: mpsc::Sender<()>,
}

impl RodioOutput {
    pub fn open() -> Result<Self, MoodError> {
        let (sink_tx, sink_rx) = mpsc::channel::<Result<Sink, String>>();
        let (keep_alive, hold) = mpsc::channel::<()>();

        thread::spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = sink_tx.send(Err(e.to_string()));
                    return;
                }
            };
            stream.log_on_drop(false);
            let _ = sink_tx.send(Ok(Sink::connect_new(stream.mixer())));

            // Blocks until the output is dropped.
            let _ = hold.recv();
            drop(stream);
        });

        let sink = sink_rx
            .recv()
            .map_err(|e| MoodError::Playback(format!("audio thread exited: {}", e)))?
            .map_err(|e| MoodError::Playback(format!("no audio device: {}", e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            sink,
            duration: Mutex::new(None),
            _keep_alive: keep_alive,
        })
    }
}

impl AudioOutput for RodioOutput {
    type Source = Decoder<Cursor<Vec<u8>>>;

    async fn load(&self, url: &str) -> Result<Self::Source, MoodError> {
        debug!("Downloading preview {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MoodError::Playback(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MoodError::Playback(format!(
                "preview download returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MoodError::Playback(e.to_string()))?;

        Decoder::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| MoodError::Playback(format!("cannot decode preview: {}", e)))
    }

    fn start(&self, source: Self::Source) -> Result<(), MoodError> {
        *lock(&self.duration) = source.total_duration();
        self.sink.clear();
        self.sink.append(source);
        self.sink.play();
        Ok(())
    }

    fn pause(&self) {
        self.sink.pause();
    }

    fn resume(&self) {
        self.sink.play();
    }

    fn stop(&self) {
        self.sink.clear();
        *lock(&self.duration) = None;
    }

    fn seek(&self, position: Duration) -> Result<(), MoodError> {
        self.sink
            .try_seek(position)
            .map_err(|e| MoodError::Playback(format!("seek failed: {}", e)))
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        *lock(&self.duration)
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }
}
