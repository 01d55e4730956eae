use crate::resilient::resilient;
use crate::{demo, ApiError, Result, SessionStore, Transport};
use chrono::Utc;
use esim_common::{EsimOrder, OrderStatus};
use esim_config::{Capability, ConfigResolver};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct PurchaseRequest {
    plan_id: u32,
}

#[derive(Serialize)]
struct ActivateRequest<'a> {
    device_info: &'a str,
}

/// Resource (eSIM order) capability. In synthetic mode the offline order
/// collection in the session store is the source of truth; `purchase` alone
/// does not persist; appending the order is the orchestrator's job.
pub struct EsimService {
    config: Arc<ConfigResolver>,
    transport: Arc<Transport>,
    session: Arc<SessionStore>,
}

impl EsimService {
    pub fn new(
        config: Arc<ConfigResolver>,
        transport: Arc<Transport>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    /// Provisions an order for `plan_id`, returned in `Paid` state. Only
    /// called after the funding intent reached `succeeded`.
    pub async fn purchase(&self, plan_id: u32) -> Result<EsimOrder> {
        let endpoint = self.config.resolve_endpoint(Capability::Esim).await;
        resilient(
            Capability::Esim,
            endpoint,
            |base| async move {
                self.transport
                    .post(&format!("{base}/esims/purchase/"), &PurchaseRequest { plan_id })
                    .await
            },
            || async move {
                let plans = demo::plans();
                let plan = plans.iter().find(|p| p.id == plan_id).ok_or_else(|| {
                    ApiError::Client {
                        status: 404,
                        message: format!("unknown plan {plan_id}"),
                    }
                })?;
                Ok(demo::order(plan))
            },
        )
        .await
    }

    pub async fn my_esims(&self) -> Result<Vec<EsimOrder>> {
        let endpoint = self.config.resolve_endpoint(Capability::Esim).await;
        resilient(
            Capability::Esim,
            endpoint,
            |base| async move { self.transport.get(&format!("{base}/esims/my/")).await },
            || async { self.session.orders().await },
        )
        .await
    }

    pub async fn activate(&self, order_id: &str, device_info: &str) -> Result<EsimOrder> {
        let endpoint = self.config.resolve_endpoint(Capability::Esim).await;
        resilient(
            Capability::Esim,
            endpoint,
            |base| async move {
                self.transport
                    .post(
                        &format!("{base}/esims/{order_id}/activate/"),
                        &ActivateRequest { device_info },
                    )
                    .await
            },
            || async move {
                self.mutate_order(order_id, |order| {
                    if order.status == OrderStatus::Paid {
                        order.status = OrderStatus::Activated;
                    }
                })
                .await
            },
        )
        .await
    }

    /// Refreshes consumption and validity for one order. The response is the
    /// full refreshed resource, same shape in both modes.
    pub async fn usage(&self, order_id: &str) -> Result<EsimOrder> {
        let endpoint = self.config.resolve_endpoint(Capability::Esim).await;
        resilient(
            Capability::Esim,
            endpoint,
            |base| async move {
                self.transport
                    .get(&format!("{base}/esims/{order_id}/usage/"))
                    .await
            },
            || async move {
                self.mutate_order(order_id, |order| {
                    if order.status == OrderStatus::Activated {
                        demo::advance_usage(order);
                        if order.expires_at <= Utc::now() {
                            order.status = OrderStatus::Expired;
                        }
                    }
                })
                .await
            },
        )
        .await
    }

    async fn mutate_order(
        &self,
        order_id: &str,
        apply: impl FnOnce(&mut EsimOrder),
    ) -> Result<EsimOrder> {
        let mut orders = self.session.orders().await?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ApiError::Client {
                status: 404,
                message: format!("unknown order {order_id}"),
            })?;
        apply(order);
        let updated = order.clone();
        self.session.save_orders(&orders).await?;
        Ok(updated)
    }
}
