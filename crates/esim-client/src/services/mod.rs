mod auth;
mod catalog;
mod esim;
mod payment;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use esim::EsimService;
pub use payment::PaymentService;
