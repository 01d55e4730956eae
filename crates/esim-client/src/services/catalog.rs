use crate::resilient::resilient;
use crate::{demo, Result, Transport};
use esim_common::{Country, Plan};
use esim_config::{Capability, ConfigResolver};
use std::sync::Arc;

/// Catalog reads. These degrade silently to the fixed demo catalog, so the
/// browse surface always has content.
pub struct CatalogService {
    config: Arc<ConfigResolver>,
    transport: Arc<Transport>,
}

impl CatalogService {
    pub fn new(config: Arc<ConfigResolver>, transport: Arc<Transport>) -> Self {
        Self { config, transport }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        let endpoint = self.config.resolve_endpoint(Capability::Catalog).await;
        resilient(
            Capability::Catalog,
            endpoint,
            |base| async move { self.transport.get(&format!("{base}/plans/")).await },
            || async { Ok(demo::plans()) },
        )
        .await
    }

    pub async fn plans_for_country(&self, code: &str) -> Result<Vec<Plan>> {
        let endpoint = self.config.resolve_endpoint(Capability::Catalog).await;
        resilient(
            Capability::Catalog,
            endpoint,
            |base| async move {
                self.transport
                    .get(&format!("{base}/plans/?country={code}"))
                    .await
            },
            || async move {
                let code = code.to_ascii_uppercase();
                Ok(demo::plans()
                    .into_iter()
                    .filter(|p| p.countries.iter().any(|c| *c == code))
                    .collect())
            },
        )
        .await
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        let endpoint = self.config.resolve_endpoint(Capability::Catalog).await;
        resilient(
            Capability::Catalog,
            endpoint,
            |base| async move { self.transport.get(&format!("{base}/countries/")).await },
            || async { Ok(demo::countries()) },
        )
        .await
    }
}
