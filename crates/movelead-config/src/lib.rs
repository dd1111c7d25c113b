//! movelead-config
//!
//! Process-wide relay configuration, read once from the environment at
//! startup and shared read-only afterwards.

pub mod error;
pub mod model;

pub use error::ConfigError;
pub use model::{Environment, RateLimitSettings, RelayConfig};
