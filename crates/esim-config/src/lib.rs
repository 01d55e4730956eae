// Feature-flag configuration for the eSIM client service layer.
//
// The resolver decides, per capability, whether an operation talks to the
// real backend or synthesizes a local result, and which base URL to use.
use thiserror::Error;

mod flags;
mod resolver;
mod store;

pub use flags::{Capability, FeatureFlags, FlagUpdate};
pub use resolver::ConfigResolver;
pub use store::{FileStore, MemoryStore, StateStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
