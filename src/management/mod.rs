mod auth;

pub use auth::FileTokenStore;
pub use auth::REFRESH_MARGIN_SECS;
pub use auth::TokenError;
pub use auth::TokenManager;
