use crate::{ApiError, EsimService, PaymentService, SessionStore};
use esim_common::{EsimOrder, PaymentStatus, Plan};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

const PROVISION_ATTEMPTS: u32 = 3;

#[derive(Error, Debug)]
pub enum PurchaseError {
    /// The charge reached a terminal `failed` state. Not a transport error;
    /// the caller should offer a retry with another method.
    #[error("payment declined for intent {intent_id}")]
    Declined { intent_id: String },
    /// A purchase of the same plan by the same user is already in flight.
    #[error("purchase already in flight for this plan")]
    InFlight,
    /// The charge succeeded but provisioning did not. Carries the intent id
    /// so the charge can be reconciled; no order was recorded.
    #[error("provisioning failed after successful charge {intent_id}: {source}")]
    Provisioning { intent_id: String, source: ApiError },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Composes the payment and resource services into the user-visible "buy"
/// operation: create intent, confirm, then provision. Steps run strictly
/// sequentially; a declined confirmation aborts before any provisioning
/// call is made.
pub struct PurchaseOrchestrator {
    payments: Arc<PaymentService>,
    esims: Arc<EsimService>,
    session: Arc<SessionStore>,
    in_flight: Mutex<HashSet<(String, u32)>>,
}

impl PurchaseOrchestrator {
    pub fn new(
        payments: Arc<PaymentService>,
        esims: Arc<EsimService>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            payments,
            esims,
            session,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Buys `plan` for `user_id`, paying with `method_id`. Exactly one order
    /// is created per successful invocation and appended to the persisted
    /// collection. Guarded per (user, plan): a concurrent duplicate returns
    /// [`PurchaseError::InFlight`] without creating a second intent.
    #[instrument(skip(self, plan), fields(plan_id = plan.id))]
    pub async fn purchase(
        &self,
        user_id: &str,
        plan: &Plan,
        method_id: &str,
    ) -> Result<EsimOrder, PurchaseError> {
        let key = (user_id.to_string(), plan.id);
        if !self.begin(&key).await {
            return Err(PurchaseError::InFlight);
        }
        let result = self.run(plan, method_id).await;
        self.finish(&key).await;
        result
    }

    async fn run(&self, plan: &Plan, method_id: &str) -> Result<EsimOrder, PurchaseError> {
        let intent = self.payments.create_intent(plan.price, &plan.currency).await?;
        let confirmed = self.payments.confirm(&intent, method_id).await?;

        if confirmed.status != PaymentStatus::Succeeded {
            info!(intent_id = %confirmed.id, status = ?confirmed.status, "payment not completed");
            return Err(PurchaseError::Declined {
                intent_id: confirmed.id,
            });
        }

        let order = self
            .provision(plan.id)
            .await
            .map_err(|source| PurchaseError::Provisioning {
                intent_id: confirmed.id.clone(),
                source,
            })?;

        self.session
            .push_order(&order)
            .await
            .map_err(|source| PurchaseError::Provisioning {
                intent_id: confirmed.id,
                source,
            })?;

        info!(order_id = %order.id, "purchase complete");
        Ok(order)
    }

    /// Bounded retry for the provisioning step. Recoverable failures are
    /// normally absorbed inside the service; this covers a deployment where
    /// the esim capability runs real-only and still flakes after a charge.
    async fn provision(&self, plan_id: u32) -> crate::Result<EsimOrder> {
        let mut attempt = 1;
        loop {
            match self.esims.purchase(plan_id).await {
                Ok(order) => return Ok(order),
                Err(e) if e.is_recoverable() && attempt < PROVISION_ATTEMPTS => {
                    warn!(attempt, error = %e, "provisioning attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn begin(&self, key: &(String, u32)) -> bool {
        self.in_flight.lock().await.insert(key.clone())
    }

    async fn finish(&self, key: &(String, u32)) {
        self.in_flight.lock().await.remove(key);
    }
}
