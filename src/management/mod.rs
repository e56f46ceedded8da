mod liked;
mod session;
mod token;

pub use liked::LikedPlaylists;
pub use session::Session;
pub use session::SessionState;
pub use token::TokenProvider;
