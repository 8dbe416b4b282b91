//! Bearer token issuance and resolution

use crate::auth::models::User;
use rand::distr::Alphanumeric;
use rand::RngExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Length of the random token value
const TOKEN_LENGTH: usize = 48;

/// Default token lifetime: 30 days
pub const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 30;

/// An issued bearer token
#[derive(Debug, Clone)]
pub struct Token {
    /// Opaque random value presented by clients
    pub value: String,
    /// Id of the user this token was issued to
    pub user_id: String,
    /// When the token was issued
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the token stops being valid, always set at issuance
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Token {
    fn new(user_id: String, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            value: random_token_value(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check whether the token has expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() > self.expires_at
    }
}

fn random_token_value() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// In-memory token issuer.
///
/// A user may hold any number of live tokens at once; issuing a new one
/// never revokes the others.
pub struct TokenIssuer {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    /// Create a token issuer with the default 30-day lifetime
    pub fn new() -> Self {
        Self::with_ttl(chrono::Duration::minutes(DEFAULT_TTL_MINUTES))
    }

    /// Create a token issuer with an explicit lifetime
    pub fn with_ttl(ttl: chrono::Duration) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Issue a new token for a user.
    ///
    /// The expiry is set on the record being created and that exact record
    /// is stored and returned; there is no re-query by recency, so a
    /// concurrent issuance can never receive another request's expiry.
    pub async fn issue(&self, user: &User) -> Token {
        let token = Token::new(user.id.clone(), self.ttl);
        self.tokens
            .write()
            .await
            .insert(token.value.clone(), token.clone());
        token
    }

    /// Resolve a presented token value, removing it if expired
    pub async fn resolve(&self, value: &str) -> Option<Token> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens.get(value) {
            if token.is_expired() {
                tokens.remove(value);
                return None;
            }
            return Some(token.clone());
        }
        None
    }

    /// Revoke a token. Revoking an absent token is a no-op.
    pub async fn revoke(&self, value: &str) {
        self.tokens.write().await.remove(value);
    }

    /// Remove all expired tokens
    pub async fn cleanup_expired(&self) {
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, token| !token.is_expired());
    }

    /// Number of stored tokens, including any not yet cleaned up
    pub async fn token_count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TokenIssuer {
    fn clone(&self) -> Self {
        Self {
            tokens: Arc::clone(&self.tokens),
            ttl: self.ttl,
        }
    }
}
