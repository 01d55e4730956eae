use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchasable data allotment from the catalog. Immutable once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: u32,
    pub name: String,
    pub data_mb: u32,
    pub validity_days: u32,
    pub price: f64,
    pub currency: String,
    pub countries: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Failed)
    }
}

/// Backend-tracked representation of an in-progress charge, distinct from
/// the order it funds. Status never moves backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Activated,
    Expired,
    Cancelled,
}

/// A provisioned data-plan instance tied to a carrier identifier (ICCID),
/// with its own usage and validity lifecycle. Orders are never deleted,
/// only transitioned to `Expired` or `Cancelled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsimOrder {
    pub id: String,
    pub plan: Plan,
    pub status: OrderStatus,
    pub iccid: String,
    pub activation_code: String,
    pub qr_payload: String,
    pub data_used_mb: f64,
    pub data_remaining_mb: f64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl EsimOrder {
    /// Fraction of the allotment consumed, or `None` for a zero-data order.
    pub fn used_fraction(&self) -> Option<f64> {
        let total = self.data_used_mb + self.data_remaining_mb;
        if total > 0.0 {
            Some(self.data_used_mb / total)
        } else {
            None
        }
    }

    /// Whole days until expiry, rounded up. Zero or negative means expired.
    pub fn days_left_at(&self, now: DateTime<Utc>) -> i64 {
        let secs = (self.expires_at - now).num_seconds();
        if secs <= 0 {
            return 0;
        }
        (secs + 86_399) / 86_400
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// The one active credential set per device. Owned by the session store;
/// services read it but never mutate it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub brand: String,
    pub last4: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Usage,
    Expiry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertThreshold {
    /// 80% of the allotment consumed.
    Usage80,
    /// 95% of the allotment consumed; supersedes `Usage80` in one scan.
    Usage95,
    /// Three or fewer days of validity remaining.
    ExpiresSoon,
}

/// Derived, ephemeral alert. Recomputed from order state on each monitor
/// pass; deduplication lives in the monitor's acknowledgement registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageAlert {
    pub order_id: String,
    pub kind: AlertKind,
    pub threshold: AlertThreshold,
}
