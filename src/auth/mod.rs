use crate::api::Endpoint;
use crate::error::{Error, Result};
use async_trait::async_trait;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const IDENTIFIER_KEY: &str = "identifier";

/// Secure token storage plus the refresh round-trip, provided by the host app.
#[async_trait]
pub trait TokenStore: Send + Sync {
    fn read_token(&self, key: &str) -> Option<String>;

    /// Exchanges the stored refresh token for a new token pair and stores it.
    async fn refresh_all_tokens(&self) -> Result<()>;
}

/// Builds the refresh call from the stored refresh token and device identifier.
pub fn refresh_request(store: &dyn TokenStore) -> Result<Endpoint> {
    let refresh_token = store
        .read_token(REFRESH_TOKEN_KEY)
        .ok_or_else(|| Error::ReauthFailed("refresh token missing".to_string()))?;
    let identifier = store
        .read_token(IDENTIFIER_KEY)
        .ok_or_else(|| Error::ReauthFailed("identifier missing".to_string()))?;

    Ok(Endpoint::RefreshToken { refresh_token, identifier })
}
