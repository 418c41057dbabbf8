use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

/// A bearer token together with its hard expiry, as issued by a credential
/// provider. Replaced wholesale on refresh, never updated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Source of bearer tokens for the sandbox service.
///
/// Implementations wrap whatever identity stack the embedder uses; the
/// client only ever asks for "a currently valid token for this scope" and
/// never sees the acquisition protocol.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Returns a token scoped to `scope`, or `None` when the provider has
    /// nothing to offer. Both `None` and `Err` surface to callers as an
    /// authentication failure.
    async fn token(&self, scope: &str) -> anyhow::Result<Option<AccessToken>>;
}

/// Credential that hands out the same pre-issued token on every request.
#[derive(Clone, Debug)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self, _scope: &str) -> anyhow::Result<Option<AccessToken>> {
        Ok(Some(self.token.clone()))
    }
}
