use std::fmt;

/// Every failure MusicMood can report.
///
/// Network and API failures are caught by the views and shown as a message;
/// none of them is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum MoodError {
    /// Token unobtainable, or the catalog rejected a freshly acquired token.
    Auth(String),
    /// Catalog API answered with a non-2xx status other than 401.
    Catalog { status: u16 },
    /// Response body was not the JSON we expected.
    Decode(String),
    /// Track has neither a preview nor a catalog link.
    Unplayable,
    /// The audio output could not start the preview.
    Playback(String),
    /// Queue index outside `[0, len - 1]`.
    OutOfRange { index: usize, len: usize },
    /// Transport failure talking to the catalog or the MusicMood server.
    Network(String),
    /// MusicMood server answered with an error status or message.
    Backend(String),
    /// The operation needs a signed-in user.
    SignInRequired,
    /// Local input validation failed.
    Invalid(String),
}

impl fmt::Display for MoodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodError::Auth(msg) => write!(f, "authentication failed: {}", msg),
            MoodError::Catalog { status } => write!(f, "catalog API error: HTTP {}", status),
            MoodError::Decode(msg) => write!(f, "malformed response: {}", msg),
            MoodError::Unplayable => write!(f, "track has no preview and no catalog link"),
            MoodError::Playback(msg) => write!(f, "playback failed: {}", msg),
            MoodError::OutOfRange { index, len } => {
                write!(f, "index {} is out of range for a queue of {}", index, len)
            }
            MoodError::Network(msg) => write!(f, "network error: {}", msg),
            MoodError::Backend(msg) => write!(f, "server error: {}", msg),
            MoodError::SignInRequired => write!(f, "sign in required"),
            MoodError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MoodError {}

impl From<reqwest::Error> for MoodError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MoodError::Decode(err.to_string())
        } else {
            MoodError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MoodError {
    fn from(err: serde_json::Error) -> Self {
        MoodError::Decode(err.to_string())
    }
}
