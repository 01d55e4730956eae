use crate::{Capability, FeatureFlags, FlagUpdate, Result, StateStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const FLAGS_KEY: &str = "config.flags";

/// Process-wide feature state, explicitly constructed and injected into each
/// service. Reads hand out immutable snapshots; the only mutation path is
/// [`ConfigResolver::update`], which swaps the snapshot and re-persists it
/// (last-write-wins, no partial observation).
pub struct ConfigResolver {
    store: Arc<dyn StateStore>,
    flags: RwLock<FeatureFlags>,
}

impl ConfigResolver {
    /// Starts from defaults, overlaid with a previously persisted snapshot
    /// when one exists. A corrupt snapshot degrades to defaults rather than
    /// failing startup.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let flags = match store.get(FLAGS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(flags) => flags,
                Err(e) => {
                    warn!(error = %e, "discarding unreadable flag snapshot");
                    FeatureFlags::default()
                }
            },
            Ok(None) => FeatureFlags::default(),
            Err(e) => {
                warn!(error = %e, "state store unavailable, using default flags");
                FeatureFlags::default()
            }
        };
        Self {
            store,
            flags: RwLock::new(flags),
        }
    }

    pub async fn snapshot(&self) -> FeatureFlags {
        self.flags.read().await.clone()
    }

    pub async fn is_enabled(&self, capability: Capability) -> bool {
        self.flags.read().await.is_enabled(capability)
    }

    /// `None` signals the caller to operate in synthetic mode.
    pub async fn resolve_endpoint(&self, capability: Capability) -> Option<String> {
        let endpoint = self.flags.read().await.resolve_endpoint(capability);
        debug!(?capability, ?endpoint, "resolved capability endpoint");
        endpoint
    }

    /// Merges the patch, swaps the snapshot, persists it, and returns the
    /// new state.
    pub async fn update(&self, patch: FlagUpdate) -> Result<FeatureFlags> {
        let mut guard = self.flags.write().await;
        let next = guard.merge(patch);
        *guard = next.clone();
        drop(guard);

        self.store
            .set(FLAGS_KEY, serde_json::to_string(&next)?)
            .await?;
        Ok(next)
    }
}
