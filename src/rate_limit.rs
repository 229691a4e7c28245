//! Fixed-window request limiter for abuse-prone endpoints.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRef, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use dashmap::DashMap;
use tracing::warn;

use crate::auth::extractors::raw_token;
use crate::auth::jwt::JwtKeys;
use crate::state::AppState;

/// Fixed time windows with atomic counters. Each window starts when the first
/// request for its key arrives and resets after the window duration expires.
/// Windows may admit up to 2x the ceiling across a boundary; acceptable for
/// coarse admission control.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub allowed: bool,
    pub retry_after_secs: u64,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count < self.limit {
            entry.count += 1;
            Decision {
                allowed: true,
                retry_after_secs: 0,
            }
        } else {
            let elapsed = now.duration_since(entry.started);
            let retry = self.window.saturating_sub(elapsed).as_secs().max(1);
            Decision {
                allowed: false,
                retry_after_secs: retry,
            }
        }
    }
}

/// Key by authenticated chef when the request carries a valid token, else by
/// client IP (first `X-Forwarded-For` entry wins behind a proxy).
pub async fn password_change_limit(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let keys = JwtKeys::from_ref(&state);
    let key = raw_token(req.headers(), &jar)
        .and_then(|t| keys.verify(&t).ok())
        .map(|c| c.sub.to_string())
        .unwrap_or_else(|| client_ip(req.headers(), connect));

    let decision = state.rate_limiter.check(&key);
    if !decision.allowed {
        warn!(%key, "rate limit exceeded");
        return rate_limited(decision);
    }
    next.run(req).await
}

fn client_ip(headers: &HeaderMap, connect: Option<ConnectInfo<SocketAddr>>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| connect.map(|ConnectInfo(a)| a.ip().to_string()))
        .unwrap_or_else(|| "unknown".into())
}

fn rate_limited(d: Decision) -> Response {
    let body = serde_json::json!({
        "ok": false,
        "error": "Too many requests",
    });
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, d.retry_after_secs.to_string())],
        axum::Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_the_ceiling_then_denies() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("chef-a").allowed);
        }
        let denied = limiter.check("chef-a");
        assert!(!denied.allowed);
        assert!(denied.retry_after_secs >= 1);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("chef-a").allowed);
        assert!(!limiter.check("chef-a").allowed);
        assert!(limiter.check("chef-b").allowed);
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check("chef-a").allowed);
        assert!(!limiter.check("chef-a").allowed);
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("chef-a").allowed);
    }

    #[test]
    fn forwarded_for_beats_socket_addr() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(
            client_ip(&headers, Some(ConnectInfo(addr))),
            "203.0.113.9".to_string()
        );
        assert_eq!(
            client_ip(&HeaderMap::new(), Some(ConnectInfo(addr))),
            "127.0.0.1".to_string()
        );
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown".to_string());
    }
}
