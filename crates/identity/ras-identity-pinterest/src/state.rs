//! Anti-forgery state tokens issued with each authorization request.

use crate::error::{StrategyError, StrategyResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Length of the state token placed in the authorization URL.
pub const STATE_TOKEN_LEN: usize = 7;

/// Short random token: hex digest of random input, truncated.
pub fn generate_state_token() -> String {
    let seed: [u8; 32] = thread_rng().r#gen();
    let digest = Sha256::digest(seed);

    let mut token = String::with_capacity(STATE_TOKEN_LEN + 1);
    for byte in digest.iter().take(STATE_TOKEN_LEN.div_ceil(2)) {
        let _ = write!(token, "{:02x}", byte);
    }
    token.truncate(STATE_TOKEN_LEN);
    token
}

/// A state token waiting for its callback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingState {
    pub state: String,
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// `from + ttl_seconds`, or `None` when the TTL does not fit a timestamp.
pub fn state_expiry(from: DateTime<Utc>, ttl_seconds: u64) -> Option<DateTime<Utc>> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| from.checked_add_signed(ttl))
}

impl PendingState {
    pub fn new(redirect_uri: String, ttl_seconds: u64) -> StrategyResult<Self> {
        let created_at = Utc::now();
        let expires_at = state_expiry(created_at, ttl_seconds).ok_or_else(|| {
            StrategyError::InvalidConfig(format!(
                "state TTL of {} seconds is out of range",
                ttl_seconds
            ))
        })?;

        Ok(Self {
            state: generate_state_token(),
            redirect_uri,
            created_at,
            expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Storage for issued state tokens.
///
/// A token is consumed by the first callback that presents it.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn store(&self, state: PendingState) -> StrategyResult<()>;

    /// Remove and return a live state. `None` when unknown, used or expired.
    async fn consume(&self, state: &str) -> StrategyResult<Option<PendingState>>;

    async fn cleanup_expired(&self) -> StrategyResult<usize>;
}

#[derive(Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<String, PendingState>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn store(&self, state: PendingState) -> StrategyResult<()> {
        let mut states = self.states.write().await;
        // Abandoned logins never reach `consume`; expired tokens are dropped here.
        states.retain(|_, pending| !pending.is_expired());
        if states.contains_key(&state.state) {
            return Err(StrategyError::StateStore(
                "state token collision".to_string(),
            ));
        }
        states.insert(state.state.clone(), state);
        Ok(())
    }

    async fn consume(&self, state: &str) -> StrategyResult<Option<PendingState>> {
        let mut states = self.states.write().await;
        Ok(states.remove(state).filter(|pending| !pending.is_expired()))
    }

    async fn cleanup_expired(&self) -> StrategyResult<usize> {
        let mut states = self.states.write().await;
        let before = states.len();
        states.retain(|_, pending| !pending.is_expired());
        Ok(before - states.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_token_shape() {
        let token = generate_state_token();
        assert_eq!(token.len(), STATE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_state_is_single_use() {
        let store = InMemoryStateStore::new();
        let pending = PendingState::new("http://localhost:3000/int_callback".to_string(), 300).unwrap();
        let token = pending.state.clone();

        store.store(pending).await.unwrap();

        let consumed = store.consume(&token).await.unwrap().unwrap();
        assert_eq!(consumed.redirect_uri, "http://localhost:3000/int_callback");

        // Second use is rejected
        assert!(store.consume(&token).await.unwrap().is_none());
    }

    fn expired(token: &str) -> PendingState {
        let mut pending = PendingState::new("http://localhost/cb".to_string(), 300).unwrap();
        pending.state = token.to_string();
        pending.expires_at = Utc::now() - Duration::minutes(1);
        pending
    }

    #[tokio::test]
    async fn test_expired_state_is_rejected_and_cleaned() {
        let store = InMemoryStateStore::new();
        {
            let mut states = store.states.write().await;
            for token in ["aaaaaaa", "bbbbbbb"] {
                states.insert(token.to_string(), expired(token));
            }
        }

        assert!(store.consume("aaaaaaa").await.unwrap().is_none());
        assert_eq!(store.cleanup_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_reuses_expired_token() {
        let store = InMemoryStateStore::new();
        store.store(expired("abc1234")).await.unwrap();

        let mut fresh = PendingState::new("http://localhost/cb".to_string(), 300).unwrap();
        fresh.state = "abc1234".to_string();
        store.store(fresh).await.unwrap();

        assert!(store.consume("abc1234").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_drops_expired_entries() {
        let store = InMemoryStateStore::new();
        for token in ["0000001", "0000002", "0000003"] {
            store.store(expired(token)).await.unwrap();
        }

        let live = PendingState::new("http://localhost/cb".to_string(), 300).unwrap();
        let live_token = live.state.clone();
        store.store(live).await.unwrap();

        assert_eq!(store.states.read().await.len(), 1);
        assert_eq!(store.cleanup_expired().await.unwrap(), 0);
        assert!(store.consume(&live_token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_live_token_collision_is_rejected() {
        let store = InMemoryStateStore::new();
        let pending = PendingState::new("http://localhost/cb".to_string(), 300).unwrap();
        store.store(pending.clone()).await.unwrap();

        let result = store.store(pending).await;
        assert!(matches!(result, Err(StrategyError::StateStore(_))));
    }

    #[test]
    fn test_out_of_range_ttl_is_rejected() {
        let result = PendingState::new("http://localhost/cb".to_string(), u64::MAX);
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));

        let result = PendingState::new("http://localhost/cb".to_string(), i64::MAX as u64);
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));

        assert!(state_expiry(Utc::now(), 600).is_some());
    }
}
