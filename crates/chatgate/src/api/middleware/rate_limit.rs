//! Fixed-window rate limiting keyed by client address
//!
//! Each client gets `max_requests` per window. The check-and-increment for a
//! key runs under the `DashMap` shard lock for that key, so concurrent
//! requests from one client cannot both take the last slot.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::config::RateLimitConfig;

/// Key used when no client address can be determined
const UNKNOWN_CLIENT: &str = "unknown";

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted; `remaining` requests are left in this window
    Allowed { remaining: u32 },
    /// Request rejected until the window resets
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Per-client fixed-window counter
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Count a request from `key` against its current window
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateLimitDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.max_requests - entry.count,
        }
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before.saturating_sub(self.windows.len())
    }

    /// Number of clients with a live window
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Periodically sweep expired windows so idle clients don't accumulate
    pub async fn start_sweep_task(self: Arc<Self>) {
        let mut timer = interval(self.window);
        info!(
            "Starting rate limit sweep task with {}s interval",
            self.window.as_secs()
        );

        loop {
            timer.tick().await;
            let removed = self.sweep_at(Instant::now());
            if removed > 0 {
                debug!("Swept {removed} expired rate limit windows");
            }
        }
    }
}

/// Whole seconds until retry, rounded up and at least one
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Identify the client for rate limiting purposes
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(addr) = forwarded {
            return addr.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Reject requests beyond the client's budget with 429
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, state.config.server.trust_forwarded_for);

    match state.limiter.check(&key) {
        RateLimitDecision::Allowed { .. } => next.run(request).await,
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %key, "Rate limit exceeded");
            ApiError::RateLimited {
                retry_after_secs: retry_after_secs(retry_after),
            }
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(
            limiter.check_at("a", now),
            RateLimitDecision::Allowed { remaining: 2 }
        );
        assert_eq!(
            limiter.check_at("a", now),
            RateLimitDecision::Allowed { remaining: 1 }
        );
        assert_eq!(
            limiter.check_at("a", now),
            RateLimitDecision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            limiter.check_at("a", now),
            RateLimitDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_thirty_first_request_is_limited() {
        let limiter = RateLimiter::new(30, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..30 {
            let now = start + Duration::from_millis(i * 100);
            assert!(matches!(
                limiter.check_at("client", now),
                RateLimitDecision::Allowed { .. }
            ));
        }
        assert!(matches!(
            limiter.check_at("client", start + Duration::from_secs(59)),
            RateLimitDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(matches!(
            limiter.check_at("a", now),
            RateLimitDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("b", now),
            RateLimitDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("a", now),
            RateLimitDecision::Limited { .. }
        ));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(matches!(
            limiter.check_at("a", start),
            RateLimitDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check_at("a", start + Duration::from_secs(30)),
            RateLimitDecision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check_at("a", start + Duration::from_secs(60)),
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("a", start);

        let decision = limiter.check_at("a", start + Duration::from_secs(45));
        assert_eq!(
            decision,
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(15)
            }
        );
    }

    #[test]
    fn test_rejected_requests_do_not_extend_window() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        limiter.check_at("a", start);
        for s in 1..10 {
            limiter.check_at("a", start + Duration::from_secs(s));
        }
        assert!(matches!(
            limiter.check_at("a", start + Duration::from_secs(10)),
            RateLimitDecision::Allowed { .. }
        ));
    }

    #[test]
    fn test_sweep_removes_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at("old", start);
        limiter.check_at("new", start + Duration::from_secs(30));
        assert_eq!(limiter.tracked_clients(), 2);

        let removed = limiter.sweep_at(start + Duration::from_secs(61));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_concurrent_checks_never_exceed_limit() {
        let limiter = Arc::new(RateLimiter::new(50, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..20)
                        .filter(|_| {
                            matches!(limiter.check("shared"), RateLimitDecision::Allowed { .. })
                        })
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }

    #[test]
    fn test_retry_after_secs_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_secs(15)), 15);
        assert_eq!(retry_after_secs(Duration::from_millis(14_200)), 15);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_client_key_from_connect_info() {
        let addr: SocketAddr = "203.0.113.7:5555".parse().unwrap();
        let request = Request::builder()
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request, false), "203.0.113.7");
    }

    #[test]
    fn test_client_key_unknown_without_connect_info() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request, false), "unknown");
    }

    #[test]
    fn test_client_key_forwarded_for() {
        let addr: SocketAddr = "10.0.0.1:5555".parse().unwrap();
        let request = Request::builder()
            .header("x-forwarded-for", "198.51.100.4, 10.0.0.1")
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();

        assert_eq!(client_key(&request, true), "198.51.100.4");
        // Header ignored unless trusted
        assert_eq!(client_key(&request, false), "10.0.0.1");
    }
}
