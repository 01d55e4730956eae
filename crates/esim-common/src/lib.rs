// Shared data model for the eSIM marketplace client service layer
pub use serde::{Deserialize, Serialize};

pub mod lpa;
mod types;

pub use types::*;
