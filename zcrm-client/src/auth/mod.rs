//! OAuth token model and storage contract

pub mod store;
pub mod tokens;

pub use store::{FileTokenStore, InMemoryTokenStore, TokenStore};
pub use tokens::OAuthTokens;
