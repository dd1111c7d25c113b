//! Proxy relay: `POST /proxy` in front of the lead-distribution API.
//!
//! Validates the inbound lead, wraps it with the campaign credentials, and
//! relays the upstream answer back. Affiliate data is stripped unless
//! disclosure is enabled.

mod error;
mod handler;
mod limiter;
mod upstream;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};

use movelead_config::RelayConfig;

pub use error::{RelayError, StartupError, UPSTREAM_UNAVAILABLE};
pub use handler::validate_request;
pub use limiter::{Admission, RateLimiter, RATE_LIMITED_MESSAGE};
pub use upstream::{simulated_brands, simulated_response, strip_brands, UpstreamClient};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; frame-ancestors 'self' *; \
     object-src 'none'; script-src 'self'; style-src 'self' https://fonts.googleapis.com; \
     font-src 'self' https://fonts.gstatic.com";

/// Shared, read-only after startup apart from the limiter counters.
#[derive(Clone)]
pub struct RelayState {
    pub config: Arc<RelayConfig>,
    pub upstream: UpstreamClient,
    pub limiter: Arc<RateLimiter>,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Result<Self, StartupError> {
        let upstream = UpstreamClient::from_config(&config)?;
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));
        Ok(Self {
            config: Arc::new(config),
            upstream,
            limiter,
        })
    }
}

pub fn router(state: RelayState) -> Router {
    let mut app = Router::new()
        .route("/proxy", post(handler::proxy))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limiter::enforce,
        ))
        .route("/healthz", get(handler::healthz));

    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .with_state(state)
}

/// Binds `config.socket_addr()` and serves until Ctrl-C.
pub async fn serve(config: RelayConfig) -> Result<(), StartupError> {
    let addr = config.socket_addr();
    let state = RelayState::new(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: RelayState,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(StartupError::Serve)?;
    info!(
        %addr,
        simulated = state.upstream.is_simulated(),
        affiliates = state.config.use_affiliates,
        environment = %state.config.environment,
        "lead relay listening"
    );
    let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(StartupError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!(error = %err, "could not listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
