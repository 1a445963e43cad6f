// web-server/src/middleware/rate_limiter.rs
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error,
};
use common::RateLimitConfig;
use dashmap::DashMap;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::client_addr;
use crate::error::ApiError;

/// Checks between two sweeps of idle clients
const SWEEP_EVERY: usize = 256;

/// Sliding-window limiter for POSTs to the given path prefixes, per client IP
#[derive(Debug, Clone)]
pub struct RateLimiter {
    paths: Vec<String>,
    max_attempts: usize,
    window: Duration,
    trust_forwarded: bool,
    store: Arc<DashMap<String, VecDeque<Instant>>>,
    checks: Arc<AtomicUsize>,
}

impl RateLimiter {
    pub fn new(paths: Vec<String>, max_attempts: usize, window: Duration) -> Self {
        Self {
            paths,
            max_attempts,
            window,
            trust_forwarded: false,
            store: Arc::new(DashMap::new()),
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Key clients on `Forwarded`/`X-Forwarded-For` instead of the socket peer
    pub fn trust_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    /// Limiter guarding the login endpoints
    pub fn for_login(config: &RateLimitConfig) -> Self {
        Self::new(
            vec!["/api/v1/auth/token".to_string(), "/api/v1/auth/login".to_string()],
            config.login_max_attempts,
            Duration::from_secs(config.window_secs),
        )
    }

    fn applies_to(&self, method: &Method, path: &str) -> bool {
        *method == Method::POST && self.paths.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Record an attempt; true when the caller is over the limit
    fn is_rate_limited(&self, ip: &str) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: &str, now: Instant) -> bool {
        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_EVERY == 0 {
            self.sweep_at(now);
        }

        let mut attempts = self.store.entry(ip.to_string()).or_default();

        // forget attempts that slid out of the window
        while let Some(oldest) = attempts.front() {
            if now.duration_since(*oldest) >= self.window {
                attempts.pop_front();
            } else {
                break;
            }
        }

        if attempts.len() >= self.max_attempts {
            true
        } else {
            attempts.push_back(now);
            false
        }
    }

    /// Drop clients whose every attempt has left the window
    fn sweep_at(&self, now: Instant) {
        self.store.retain(|_, attempts| {
            attempts
                .back()
                .map_or(false, |latest| now.duration_since(*latest) < self.window)
        });
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimiterMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service,
            limiter: self.clone(),
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: S,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.limiter.applies_to(req.method(), req.path()) {
            let ip = client_addr(req.request(), self.limiter.trust_forwarded)
                .unwrap_or_else(|| "unknown".to_string());

            if self.limiter.is_rate_limited(&ip) {
                tracing::warn!("Login rate limit exceeded for IP: {}", ip);
                return Box::pin(async { Err(ApiError::RateLimited.into()) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(vec!["/login".to_string()], 2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(!limiter.check_at("10.0.0.1", start));
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(1)));
        assert!(limiter.check_at("10.0.0.1", start + Duration::from_secs(2)));

        // other clients have their own budget
        assert!(!limiter.check_at("10.0.0.2", start + Duration::from_secs(2)));

        // the first attempt has left the window
        assert!(!limiter.check_at("10.0.0.1", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_idle_clients_are_swept() {
        let limiter = RateLimiter::new(vec!["/login".to_string()], 2, Duration::from_secs(60));
        let start = Instant::now();

        limiter.check_at("10.0.0.1", start);
        limiter.check_at("10.0.0.2", start + Duration::from_secs(30));
        assert_eq!(limiter.store.len(), 2);

        limiter.sweep_at(start + Duration::from_secs(61));
        assert_eq!(limiter.store.len(), 1);
        assert!(limiter.store.contains_key("10.0.0.2"));
    }

    #[test]
    fn test_sweep_runs_while_checking() {
        let limiter = RateLimiter::new(vec!["/login".to_string()], 2, Duration::from_secs(60));
        let start = Instant::now();
        let later = start + Duration::from_secs(120);

        for n in 0..10 {
            limiter.check_at(&format!("10.0.1.{}", n), start);
        }
        // one busy client keeps checking long after the others went quiet
        for _ in 10..SWEEP_EVERY {
            limiter.check_at("10.0.0.9", later);
        }

        assert_eq!(limiter.store.len(), 1);
        assert!(limiter.store.contains_key("10.0.0.9"));
    }

    #[test]
    fn test_only_posts_to_listed_paths() {
        let limiter = RateLimiter::for_login(&RateLimitConfig::default());
        assert!(limiter.applies_to(&Method::POST, "/api/v1/auth/token"));
        assert!(limiter.applies_to(&Method::POST, "/api/v1/auth/login"));
        assert!(!limiter.applies_to(&Method::GET, "/api/v1/auth/token"));
        assert!(!limiter.applies_to(&Method::POST, "/api/v1/jobs/execute"));
    }
}
