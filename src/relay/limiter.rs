//! Fixed-window request limiter keyed by client address.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::Mutex;
use tracing::warn;

use movelead_config::RateLimitSettings;
use movelead_domain::ErrorBody;

use super::RelayState;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Windows {
    by_client: HashMap<IpAddr, Window>,
    pruned_at: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(Windows {
                by_client: HashMap::new(),
                pruned_at: Instant::now(),
            }),
        }
    }

    pub fn check(&self, client: IpAddr) -> Admission {
        self.check_at(client, Instant::now())
    }

    /// Counts one request from `client` at `now`.
    pub fn check_at(&self, client: IpAddr, now: Instant) -> Admission {
        let span = self.settings.window;
        let mut windows = self.windows.lock();

        if now.saturating_duration_since(windows.pruned_at) >= span {
            windows
                .by_client
                .retain(|_, window| now.saturating_duration_since(window.started) < span);
            windows.pruned_at = now;
        }

        let window = windows.by_client.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(window.started) >= span {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.settings.max_requests {
            let retry_after = window
                .started
                .checked_add(span)
                .map_or(span, |ends| ends.saturating_duration_since(now));
            return Admission::Limited { retry_after };
        }
        window.count += 1;
        Admission::Allowed {
            remaining: self.settings.max_requests - window.count,
        }
    }
}

/// Middleware in front of `POST /proxy`.
pub async fn enforce(
    State(state): State<RelayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    match state.limiter.check(peer.ip()) {
        Admission::Allowed { remaining } => {
            let mut response = next.run(request).await;
            response
                .headers_mut()
                .insert("ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Admission::Limited { retry_after } => {
            warn!(client = %peer.ip(), "rate limit exceeded");
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody::new(RATE_LIMITED_MESSAGE)),
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
            response
        }
    }
}
