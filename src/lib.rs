//! movelead ties the wizard library to the outside world: the proxy relay
//! server, the reqwest transport the wizard posts through, and the terminal
//! front-end.

pub mod relay;
pub mod terminal;
pub mod transport;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("movelead tracing initialized.");
    });
}
