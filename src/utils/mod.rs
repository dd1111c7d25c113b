use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: &str = "movelead=info,movelead_core=info,tower_http=info";

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        // Another subscriber may already be installed by a test harness.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
