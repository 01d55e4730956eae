use crate::Result;
use esim_common::{EsimOrder, Session, UserProfile};
use esim_config::StateStore;
use std::sync::Arc;
use tracing::debug;

const TOKEN_KEY: &str = "auth.token";
const REFRESH_KEY: &str = "auth.refresh_token";
const USER_KEY: &str = "auth.user";
const ONBOARDED_KEY: &str = "app.onboarded";
const ORDERS_KEY: &str = "esims.offline_orders";

/// Typed owner of the persisted session and the offline order collection.
/// Exactly one session is active per device; services read through this
/// store and never touch the credential keys directly.
pub struct SessionStore {
    store: Arc<dyn StateStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        self.store.set(TOKEN_KEY, session.token.clone()).await?;
        self.store
            .set(REFRESH_KEY, session.refresh_token.clone())
            .await?;
        self.store
            .set(USER_KEY, serde_json::to_string(&session.user).map_err(esim_config::StoreError::from)?)
            .await?;
        Ok(())
    }

    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self.store.get(TOKEN_KEY).await?)
    }

    pub async fn current(&self) -> Result<Option<Session>> {
        let token = self.store.get(TOKEN_KEY).await?;
        let refresh_token = self.store.get(REFRESH_KEY).await?;
        let user = self.store.get(USER_KEY).await?;
        match (token, refresh_token, user) {
            (Some(token), Some(refresh_token), Some(raw)) => {
                let user: UserProfile =
                    serde_json::from_str(&raw).map_err(esim_config::StoreError::from)?;
                Ok(Some(Session {
                    token,
                    refresh_token,
                    user,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Drops credential, refresh credential, and identity. Called on logout
    /// and by the transport on an authentication rejection.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(REFRESH_KEY).await?;
        self.store.remove(USER_KEY).await?;
        debug!("session cleared");
        Ok(())
    }

    pub async fn set_onboarded(&self) -> Result<()> {
        Ok(self.store.set(ONBOARDED_KEY, "true".to_string()).await?)
    }

    pub async fn onboarded(&self) -> Result<bool> {
        Ok(self.store.get(ONBOARDED_KEY).await?.as_deref() == Some("true"))
    }

    /// Offline order collection, used when the esim capability runs in
    /// synthetic mode. Missing or unreadable state yields an empty list.
    pub async fn orders(&self) -> Result<Vec<EsimOrder>> {
        match self.store.get(ORDERS_KEY).await? {
            Some(raw) => {
                Ok(serde_json::from_str(&raw).map_err(esim_config::StoreError::from)?)
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn save_orders(&self, orders: &[EsimOrder]) -> Result<()> {
        let raw = serde_json::to_string(orders).map_err(esim_config::StoreError::from)?;
        self.store.set(ORDERS_KEY, raw).await?;
        Ok(())
    }

    pub async fn push_order(&self, order: &EsimOrder) -> Result<()> {
        let mut orders = self.orders().await?;
        orders.push(order.clone());
        self.save_orders(&orders).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esim_config::MemoryStore;

    fn session() -> Session {
        Session {
            token: "tok-1".to_string(),
            refresh_token: "ref-1".to_string(),
            user: UserProfile {
                id: "u-1".to_string(),
                email: "a@b.c".to_string(),
                name: "A".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn save_current_clear_round_trip() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(store.current().await.unwrap().is_none());

        store.save(&session()).await.unwrap();
        let loaded = store.current().await.unwrap().unwrap();
        assert_eq!(loaded, session());
        assert_eq!(store.token().await.unwrap(), Some("tok-1".to_string()));

        store.clear().await.unwrap();
        assert!(store.current().await.unwrap().is_none());
        assert!(store.token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_session_reads_as_none() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("auth.token", "orphan".to_string()).await.unwrap();
        let store = SessionStore::new(kv);
        assert!(store.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn onboarding_flag_round_trip() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(!store.onboarded().await.unwrap());
        store.set_onboarded().await.unwrap();
        assert!(store.onboarded().await.unwrap());
    }
}
