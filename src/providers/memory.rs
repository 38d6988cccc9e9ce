use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::adaptive::types::{Session, UserProfile};
use crate::providers::{ProfileStore, ProviderError};

/// Process-local store for tests and the demo binary.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    sessions: RwLock<HashMap<String, Vec<Session>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self, user_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(user_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ProviderError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), ProviderError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_recent_sessions(
        &self,
        user_id: &str,
        window: usize,
    ) -> Result<Vec<Session>, ProviderError> {
        let sessions = self.sessions.read().await;
        let Some(history) = sessions.get(user_id) else {
            return Ok(Vec::new());
        };
        let start = history.len().saturating_sub(window);
        Ok(history[start..].to_vec())
    }

    async fn append_session(&self, session: &Session) -> Result<(), ProviderError> {
        self.sessions
            .write()
            .await
            .entry(session.user_id.clone())
            .or_default()
            .push(session.clone());
        Ok(())
    }
}
