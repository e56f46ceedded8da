use crate::{MoodError, config, error, info, management::Session, success, warning};

pub fn show_profile(session: &Session) {
    match session.user_id() {
        Some(user_id) => info!("Signed in as {}", user_id),
        None => warning!("Not signed in"),
    }

    if !session.backend().has_session() {
        warning!("No session cookie configured (MUSICMOOD_SESSION_COOKIE)");
    }

    info!("Server:   {}", session.backend().base_url());
    info!("Catalog:  {}", config::catalog_url());
    info!("Market:   {}", session.catalog().market());
    info!("Liked playlists: {}", session.liked().len());
    for id in session.liked().ids() {
        println!("  - {}", id);
    }
}

/// Updates one profile field on the server.
pub async fn set_profile(session: &Session, field: &str, value: &str) {
    match session.backend().update_profile(field, value).await {
        Ok(()) => success!("Profile {} updated", field),
        Err(MoodError::Invalid(msg)) => error!("{}", msg),
        Err(MoodError::SignInRequired) => {
            error!("Sign in required. Set MUSICMOOD_SESSION_COOKIE.")
        }
        Err(e) => error!("Could not update {}: {}", field, e),
    }
}
