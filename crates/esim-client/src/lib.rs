//! Client service layer for the eSIM marketplace.
//!
//! Every capability service follows the same algorithm: consult the
//! [`esim_config::ConfigResolver`] for an endpoint, then either call the
//! authenticated transport or synthesize a deterministic local result. The
//! synthetic and real shapes are interchangeable, so callers never branch on
//! which mode produced a value.

use thiserror::Error;

pub mod demo;
mod orchestrator;
mod resilient;
mod services;
mod session;
mod transport;

pub use orchestrator::{PurchaseError, PurchaseOrchestrator};
pub use services::{AuthService, CatalogService, EsimService, PaymentService};
pub use session::SessionStore;
pub use transport::Transport;

/// Failure taxonomy for backend calls.
///
/// Network and server-class failures are recoverable: capability services
/// absorb them by falling back to a synthetic result. Client-class and
/// authentication failures always propagate. Business-state outcomes
/// (e.g. a declined payment) are values, never errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error: status {status}")]
    Server { status: u16 },
    #[error("request rejected: status {status}: {message}")]
    Client { status: u16, message: String },
    #[error("session expired or invalid")]
    Unauthorized,
    #[error("local state error: {0}")]
    Storage(#[from] esim_config::StoreError),
}

impl ApiError {
    /// True for the failure kinds the fallback policy recovers locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
