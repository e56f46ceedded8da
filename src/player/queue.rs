use crate::{MoodError, types::Track};

/// Ordered list of tracks with a cursor onto the one being played.
///
/// The cursor is `None` until something is selected; once set it always
/// points inside the list. Unplayable tracks never enter the queue.
#[derive(Debug, Clone, Default)]
pub struct PreviewQueue {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl PreviewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Appends the playable tracks, keeping their order. Returns how many were
    /// added. The cursor is left alone.
    pub fn append(&mut self, tracks: Vec<Track>) -> usize {
        let before = self.tracks.len();
        self.tracks
            .extend(tracks.into_iter().filter(Track::is_playable));
        self.tracks.len() - before
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Moves to the next track. At the end of the queue nothing changes and
    /// `None` is returned.
    pub fn advance(&mut self) -> Option<&Track> {
        let next = match self.cursor {
            None if !self.tracks.is_empty() => 0,
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            _ => return None,
        };
        self.cursor = Some(next);
        self.tracks.get(next)
    }

    /// Moves to the previous track. At the start of the queue nothing changes
    /// and `None` is returned.
    pub fn retreat(&mut self) -> Option<&Track> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.tracks.get(i - 1)
            }
            _ => None,
        }
    }

    pub fn jump_to(&mut self, index: usize) -> Result<&Track, MoodError> {
        if index >= self.tracks.len() {
            return Err(MoodError::OutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.cursor = Some(index);
        Ok(&self.tracks[index])
    }

    pub fn has_next(&self) -> bool {
        match self.cursor {
            None => !self.tracks.is_empty(),
            Some(i) => i + 1 < self.tracks.len(),
        }
    }

    /// Where autoplay should begin: the first track with an inline preview,
    /// otherwise the first track.
    pub fn autoplay_start(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        Some(
            self.tracks
                .iter()
                .position(Track::has_preview)
                .unwrap_or(0),
        )
    }
}
