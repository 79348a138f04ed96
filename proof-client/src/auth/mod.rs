//! OAuth client-credentials authentication.

mod manager;
pub mod oauth;

pub use manager::OAuthTokenManager;
pub use oauth::TokenRequest;
