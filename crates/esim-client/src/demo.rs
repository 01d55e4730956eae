//! Deterministically-shaped synthetic data, used whenever a capability is
//! flag-disabled or the backend degrades. Shapes match the real API exactly.

use chrono::{Duration, Utc};
use esim_common::{
    lpa, Country, EsimOrder, OrderStatus, PaymentIntent, PaymentMethod, PaymentStatus, Plan,
    Session, UserProfile,
};
use rand::Rng;
use uuid::Uuid;

/// SM-DP+ host embedded in synthetic activation payloads.
pub const DEMO_SMDP_HOST: &str = "rsp.esim-market.example.com";

/// Fixed local catalog. Ids and prices are stable so offline purchases and
/// tests can reference them.
pub fn plans() -> Vec<Plan> {
    vec![
        Plan {
            id: 1,
            name: "Europe 1GB".to_string(),
            data_mb: 1024,
            validity_days: 7,
            price: 4.99,
            currency: "USD".to_string(),
            countries: ["FR", "DE", "IT", "ES"].map(String::from).to_vec(),
            features: ["4G/5G", "Hotspot"].map(String::from).to_vec(),
        },
        Plan {
            id: 2,
            name: "Global 5GB".to_string(),
            data_mb: 5120,
            validity_days: 30,
            price: 29.99,
            currency: "USD".to_string(),
            countries: ["US", "GB", "FR", "DE", "JP", "AU"].map(String::from).to_vec(),
            features: ["4G/5G", "Hotspot", "Global roaming"].map(String::from).to_vec(),
        },
        Plan {
            id: 3,
            name: "Asia 3GB".to_string(),
            data_mb: 3072,
            validity_days: 15,
            price: 12.99,
            currency: "USD".to_string(),
            countries: ["JP", "KR", "SG", "TH"].map(String::from).to_vec(),
            features: ["4G/5G", "Hotspot"].map(String::from).to_vec(),
        },
        Plan {
            id: 4,
            name: "USA 10GB".to_string(),
            data_mb: 10240,
            validity_days: 30,
            price: 39.99,
            currency: "USD".to_string(),
            countries: ["US"].map(String::from).to_vec(),
            features: ["4G/5G", "Hotspot", "Unlimited calls"].map(String::from).to_vec(),
        },
    ]
}

pub fn countries() -> Vec<Country> {
    [
        ("US", "United States"),
        ("GB", "United Kingdom"),
        ("FR", "France"),
        ("DE", "Germany"),
        ("IT", "Italy"),
        ("ES", "Spain"),
        ("JP", "Japan"),
        ("KR", "South Korea"),
        ("SG", "Singapore"),
        ("TH", "Thailand"),
        ("AU", "Australia"),
    ]
    .into_iter()
    .map(|(code, name)| Country {
        code: code.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Synthetic session for offline login/register. The credential carries a
/// `demo-` prefix so degraded sessions are identifiable, and the identity
/// echoes the submitted email.
pub fn session(email: &str, name: Option<&str>) -> Session {
    let fallback = email.split('@').next().unwrap_or(email);
    Session {
        token: format!("demo-token-{}", Uuid::new_v4().simple()),
        refresh_token: format!("demo-refresh-{}", Uuid::new_v4().simple()),
        user: UserProfile {
            id: format!("demo-user-{}", Uuid::new_v4().simple()),
            email: email.to_string(),
            name: name.unwrap_or(fallback).to_string(),
        },
    }
}

/// 19-digit carrier identifier with the standard 89 telecom prefix.
pub fn iccid() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..17).map(|_| char::from(b'0' + rng.random_range(0..10))).collect();
    format!("89{digits}")
}

pub fn activation_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::rng();
    let mut segment = || -> String {
        (0..5)
            .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
            .collect()
    };
    let a = segment();
    let b = segment();
    format!("K2-{a}-{b}")
}

/// Freshly provisioned order in `Paid` state, with the full allotment
/// remaining and a byte-exact LPA payload.
pub fn order(plan: &Plan) -> EsimOrder {
    let now = Utc::now();
    let code = activation_code();
    EsimOrder {
        id: format!("order-{}", Uuid::new_v4().simple()),
        plan: plan.clone(),
        status: OrderStatus::Paid,
        iccid: iccid(),
        qr_payload: lpa::encode(DEMO_SMDP_HOST, &code),
        activation_code: code,
        data_used_mb: 0.0,
        data_remaining_mb: plan.data_mb as f64,
        expires_at: now + Duration::days(plan.validity_days as i64),
        created_at: now,
    }
}

pub fn payment_intent(amount: f64, currency: &str) -> PaymentIntent {
    PaymentIntent {
        id: format!("pi_demo_{}", Uuid::new_v4().simple()),
        amount,
        currency: currency.to_string(),
        status: PaymentStatus::Pending,
    }
}

pub fn payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod {
        id: "pm_demo_visa".to_string(),
        brand: "visa".to_string(),
        last4: "4242".to_string(),
    }]
}

/// Advances consumption by 5% of the allotment, clamped to what remains.
/// Used/remaining stay consistent so the usage monitor sees valid fractions.
pub fn advance_usage(order: &mut EsimOrder) {
    let total = order.data_used_mb + order.data_remaining_mb;
    let step = (total * 0.05).min(order.data_remaining_mb);
    order.data_used_mb += step;
    order.data_remaining_mb -= step;
}
