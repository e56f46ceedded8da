use std::time::Duration;

use crate::{MoodError, types::CATALOG_WEB_HOST};

/// Preview length assumed when the output cannot tell the real duration.
pub const FALLBACK_PREVIEW_DURATION: Duration = Duration::from_secs(30);

pub const MAX_NAME_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Formats milliseconds as `m:ss`.
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

/// Formats a playback position as `m:ss`.
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Renders a fixed-width progress bar such as `[#####-----]`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Whether `url` points at the catalog's web player rather than audio.
pub fn is_catalog_web_link(url: &str) -> bool {
    url.contains(CATALOG_WEB_HOST)
}

/// Validates a profile field before it is sent to the server.
///
/// - `name`: not blank, at most 20 characters
/// - `password`: not blank, at least 4 characters
/// - `phone`: `01X-XXX-XXXX` or `01X-XXXX-XXXX`
/// - `email`: cannot be changed
pub fn validate_profile_field(field: &str, value: &str) -> Result<(), MoodError> {
    match field {
        "name" => {
            if value.trim().is_empty() {
                return Err(MoodError::Invalid("name must not be empty".to_string()));
            }
            if value.chars().count() > MAX_NAME_LEN {
                return Err(MoodError::Invalid(format!(
                    "name can be at most {} characters",
                    MAX_NAME_LEN
                )));
            }
            Ok(())
        }
        "password" => {
            if value.trim().is_empty() {
                return Err(MoodError::Invalid("password must not be empty".to_string()));
            }
            if value.chars().count() < MIN_PASSWORD_LEN {
                return Err(MoodError::Invalid(format!(
                    "password needs at least {} characters",
                    MIN_PASSWORD_LEN
                )));
            }
            Ok(())
        }
        "phone" => {
            if is_mobile_number(value) {
                Ok(())
            } else {
                Err(MoodError::Invalid(
                    "phone must look like 010-1234-5678".to_string(),
                ))
            }
        }
        "email" => Err(MoodError::Invalid("email cannot be changed".to_string())),
        other => Err(MoodError::Invalid(format!("unknown profile field '{}'", other))),
    }
}

fn is_mobile_number(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let [prefix, middle, last] = parts.as_slice() else {
        return false;
    };

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    prefix.len() == 3
        && prefix.starts_with("01")
        && all_digits(prefix)
        && (middle.len() == 3 || middle.len() == 4)
        && all_digits(middle)
        && last.len() == 4
        && all_digits(last)
}
