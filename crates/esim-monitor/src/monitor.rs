use chrono::{DateTime, Utc};
use esim_common::{AlertKind, AlertThreshold, EsimOrder, OrderStatus, UsageAlert};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

pub const USAGE_WARN: f64 = 0.80;
pub const USAGE_CRITICAL: f64 = 0.95;
pub const EXPIRY_ALERT_DAYS: i64 = 3;

/// Derives alerts from a resource collection. Pure: recomputed on every
/// pass, no side effects, `now` injected for determinism.
///
/// Only `Activated` orders are considered. At most one usage alert per
/// order per scan; the critical threshold supersedes the warning one.
/// An expiry alert fires while 0 < days left <= [`EXPIRY_ALERT_DAYS`].
pub fn scan(orders: &[EsimOrder], now: DateTime<Utc>) -> Vec<UsageAlert> {
    let mut alerts = Vec::new();

    for order in orders {
        if order.status != OrderStatus::Activated {
            continue;
        }

        if let Some(fraction) = order.used_fraction() {
            let threshold = if fraction >= USAGE_CRITICAL {
                Some(AlertThreshold::Usage95)
            } else if fraction >= USAGE_WARN {
                Some(AlertThreshold::Usage80)
            } else {
                None
            };
            if let Some(threshold) = threshold {
                alerts.push(UsageAlert {
                    order_id: order.id.clone(),
                    kind: AlertKind::Usage,
                    threshold,
                });
            }
        }

        let days_left = order.days_left_at(now);
        if days_left > 0 && days_left <= EXPIRY_ALERT_DAYS {
            alerts.push(UsageAlert {
                order_id: order.id.clone(),
                kind: AlertKind::Expiry,
                threshold: AlertThreshold::ExpiresSoon,
            });
        }
    }

    alerts
}

/// [`scan`] plus an acknowledgement registry: once an alert is acknowledged
/// it is not re-emitted for the same order and threshold until the order's
/// lifecycle period rolls over ([`UsageMonitor::reset`]).
#[derive(Default)]
pub struct UsageMonitor {
    acknowledged: RwLock<HashSet<UsageAlert>>,
}

impl UsageMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn scan_new(&self, orders: &[EsimOrder], now: DateTime<Utc>) -> Vec<UsageAlert> {
        let acknowledged = self.acknowledged.read().await;
        let alerts: Vec<UsageAlert> = scan(orders, now)
            .into_iter()
            .filter(|a| !acknowledged.contains(a))
            .collect();
        debug!(count = alerts.len(), "monitor pass complete");
        alerts
    }

    pub async fn acknowledge(&self, alert: &UsageAlert) {
        self.acknowledged.write().await.insert(alert.clone());
    }

    /// Clears acknowledgements for one order, e.g. when a new validity
    /// period starts after a top-up.
    pub async fn reset(&self, order_id: &str) {
        self.acknowledged
            .write()
            .await
            .retain(|a| a.order_id != order_id);
    }
}
