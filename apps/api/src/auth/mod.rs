//! Authentication: identity-provider sign-in URLs, backend access tokens, and
//! the in-memory page sessions that carry the signed-in username.

use async_trait::async_trait;

use crate::errors::AppError;

pub mod handlers;
pub mod identity;
pub mod session;

/// Source of the bearer token sent to the upload and matching services.
///
/// Carried in `AppState` as `Arc<dyn TokenProvider>`.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AppError>;
}

/// Hands out one preconfigured token for every request.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, AppError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_provider_returns_token() {
        let provider = StaticTokenProvider::new("testjwt");
        assert_eq!(provider.access_token().await.unwrap(), "testjwt");
    }
}
