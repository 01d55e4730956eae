use crate::resilient::resilient;
use crate::{demo, Result, SessionStore, Transport};
use esim_common::{PaymentIntent, PaymentMethod, PaymentStatus, Transaction};
use esim_config::{Capability, ConfigResolver};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct CreateIntentRequest<'a> {
    amount: f64,
    currency: &'a str,
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    payment_intent_id: &'a str,
    payment_method_id: &'a str,
}

/// Payments capability. A declined charge is a value (`status == failed`),
/// never an error; callers must check the returned intent's status.
pub struct PaymentService {
    config: Arc<ConfigResolver>,
    transport: Arc<Transport>,
    session: Arc<SessionStore>,
}

impl PaymentService {
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

    pub async fn create_intent(&self, amount: f64, currency: &str) -> Result<PaymentIntent> {
        let endpoint = self.config.resolve_endpoint(Capability::Payments).await;
        resilient(
            Capability::Payments,
            endpoint,
            |base| async move {
                self.transport
                    .post(
                        &format!("{base}/payments/create-intent/"),
                        &CreateIntentRequest { amount, currency },
                    )
                    .await
            },
            || async move { Ok(demo::payment_intent(amount, currency)) },
        )
        .await
    }

    /// Confirms `intent` with a payment method. The result carries the
    /// intent's terminal status; demo confirmation always succeeds.
    pub async fn confirm(&self, intent: &PaymentIntent, method_id: &str) -> Result<PaymentIntent> {
        let endpoint = self.config.resolve_endpoint(Capability::Payments).await;
        resilient(
            Capability::Payments,
            endpoint,
            |base| async move {
                self.transport
                    .post(
                        &format!("{base}/payments/confirm/"),
                        &ConfirmRequest {
                            payment_intent_id: &intent.id,
                            payment_method_id: method_id,
                        },
                    )
                    .await
            },
            || async move {
                Ok(PaymentIntent {
                    status: PaymentStatus::Succeeded,
                    ..intent.clone()
                })
            },
        )
        .await
    }

    pub async fn list_methods(&self) -> Result<Vec<PaymentMethod>> {
        let endpoint = self.config.resolve_endpoint(Capability::Payments).await;
        resilient(
            Capability::Payments,
            endpoint,
            |base| async move { self.transport.get(&format!("{base}/payments/methods/")).await },
            || async { Ok(demo::payment_methods()) },
        )
        .await
    }

    /// Transaction history; synthesized from the offline order collection
    /// when the backend is out of reach.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let endpoint = self.config.resolve_endpoint(Capability::Payments).await;
        resilient(
            Capability::Payments,
            endpoint,
            |base| async move {
                self.transport
                    .get(&format!("{base}/payments/transactions/"))
                    .await
            },
            || async {
                let orders = self.session.orders().await?;
                Ok(orders
                    .iter()
                    .map(|o| Transaction {
                        id: format!("txn-{}", o.id),
                        amount: o.plan.price,
                        currency: o.plan.currency.clone(),
                        description: o.plan.name.clone(),
                        created_at: o.created_at,
                    })
                    .collect())
            },
        )
        .await
    }
}
