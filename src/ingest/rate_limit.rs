//! Per-source sliding-window rate limiting.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::RateLimitConfig;
use crate::error::{MatchError, Result};

/// Sliding-window limiter keyed by source name.
///
/// Each source keeps the instants of its accepted requests inside the
/// window. Instants older than the window are pruned on every call.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_window(Duration::from_secs(config.window_secs), config.max_requests)
    }

    pub fn with_window(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `source`, or fail if its window is full.
    pub fn try_acquire(&self, source: &str) -> Result<()> {
        self.try_acquire_at(source, Instant::now())
    }

    pub(crate) fn try_acquire_at(&self, source: &str, now: Instant) -> Result<()> {
        let mut requests = self.requests.lock();
        let history = requests.entry(source.to_string()).or_default();
        self.prune(history, now);
        if history.len() >= self.max_requests {
            return Err(MatchError::RateLimited {
                source_name: source.to_string(),
            });
        }
        history.push_back(now);
        Ok(())
    }

    /// Whether the next request for `source` would be refused.
    pub fn is_limited(&self, source: &str) -> bool {
        self.is_limited_at(source, Instant::now())
    }

    pub(crate) fn is_limited_at(&self, source: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock();
        match requests.get_mut(source) {
            Some(history) => {
                self.prune(history, now);
                history.len() >= self.max_requests
            }
            None => self.max_requests == 0,
        }
    }

    /// Requests currently counted against `source`.
    pub fn recorded(&self, source: &str) -> usize {
        let mut requests = self.requests.lock();
        requests.get_mut(source).map_or(0, |history| {
            self.prune(history, Instant::now());
            history.len()
        })
    }

    fn prune(&self, history: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = history.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleventh_request_in_window_is_limited() {
        let limiter = RateLimiter::default();
        let now = Instant::now();
        for _ in 0..10 {
            limiter.try_acquire_at("boss", now).unwrap();
        }
        assert!(limiter.is_limited_at("boss", now));
        let err = limiter.try_acquire_at("boss", now).unwrap_err();
        assert!(matches!(err, MatchError::RateLimited { ref source_name } if source_name == "boss"));
    }

    #[test]
    fn sources_are_independent() {
        let limiter = RateLimiter::with_window(Duration::from_secs(60), 1);
        let now = Instant::now();
        limiter.try_acquire_at("a", now).unwrap();
        assert!(limiter.is_limited_at("a", now));
        assert!(!limiter.is_limited_at("b", now));
        limiter.try_acquire_at("b", now).unwrap();
    }

    #[test]
    fn window_slides() {
        let limiter = RateLimiter::with_window(Duration::from_secs(60), 2);
        let start = Instant::now();
        limiter.try_acquire_at("a", start).unwrap();
        limiter.try_acquire_at("a", start + Duration::from_secs(30)).unwrap();
        assert!(limiter.is_limited_at("a", start + Duration::from_secs(59)));
        assert!(!limiter.is_limited_at("a", start + Duration::from_secs(60)));
        limiter.try_acquire_at("a", start + Duration::from_secs(61)).unwrap();
        assert!(limiter.is_limited_at("a", start + Duration::from_secs(61)));
    }

    #[test]
    fn zero_budget_refuses_everything() {
        let limiter = RateLimiter::with_window(Duration::from_secs(60), 0);
        assert!(limiter.is_limited("a"));
        assert!(limiter.try_acquire("a").is_err());
    }

    #[test]
    fn recorded_counts_live_requests() {
        let limiter = RateLimiter::default();
        limiter.try_acquire("a").unwrap();
        limiter.try_acquire("a").unwrap();
        assert_eq!(limiter.recorded("a"), 2);
        assert_eq!(limiter.recorded("b"), 0);
    }
}
