//! Retry policy for the Favro transport.
//!
//! The policy is a pure function from an observed response (status, rate-limit
//! headers, attempt number) to the next [`RetryState`]. The transport drives the
//! loop and performs the sleeps through an injectable [`Sleeper`], so the policy
//! can be tested without a network or a clock.

use reqwest::header::HeaderMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub const HEADER_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
pub const HEADER_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
pub const HEADER_RATE_LIMIT_DELAY: &str = "X-RateLimit-Delay";

/// Rate-limit headers observed on a single response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateLimitInfo {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Opaque reset hint, passed through to the caller as-is
    pub reset: Option<String>,
    /// Server-suggested wait in seconds
    pub delay_seconds: Option<f64>,
}

impl RateLimitInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            limit: text(HEADER_RATE_LIMIT_LIMIT).and_then(|v| v.parse().ok()),
            remaining: text(HEADER_RATE_LIMIT_REMAINING).and_then(|v| v.parse().ok()),
            reset: text(HEADER_RATE_LIMIT_RESET),
            delay_seconds: text(HEADER_RATE_LIMIT_DELAY)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d >= 0.0),
        }
    }
}

/// Outcome of one attempt; the next attempt is the following loop iteration
#[derive(Debug, Clone, PartialEq)]
pub enum RetryState {
    Backoff { delay: Duration },
    Success,
    /// Transient failure persisted past the retry cap
    Exhausted,
    /// Non-transient failure, never retried
    Fatal,
}

/// Bounds and delays applied by the transport
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed while the server answers 429
    pub max_rate_limit_attempts: u32,
    /// Total attempts allowed while the server answers 5xx or the connection fails
    pub max_server_error_attempts: u32,
    /// Wait used on 429 when no `X-RateLimit-Delay` is present
    pub default_rate_limit_delay: Duration,
    /// First 5xx backoff, doubled per attempt
    pub server_error_base_delay: Duration,
    /// Ceiling for any single backoff
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rate_limit_attempts: 5,
            max_server_error_attempts: 3,
            default_rate_limit_delay: Duration::from_secs(2),
            server_error_base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Decide what follows a response. `attempt` is 1-based: the number of
    /// requests already sent for this logical call, including this one.
    pub fn next_state(&self, status: u16, info: &RateLimitInfo, attempt: u32) -> RetryState {
        match status {
            200..=299 => RetryState::Success,
            429 => {
                if attempt >= self.max_rate_limit_attempts {
                    RetryState::Exhausted
                } else {
                    RetryState::Backoff {
                        delay: self.rate_limit_delay(info),
                    }
                }
            }
            500..=599 => self.after_transient_failure(attempt),
            _ => RetryState::Fatal,
        }
    }

    /// Decision after a connection-level failure (no response at all)
    pub fn after_transient_failure(&self, attempt: u32) -> RetryState {
        if attempt >= self.max_server_error_attempts {
            RetryState::Exhausted
        } else {
            RetryState::Backoff {
                delay: self.server_error_delay(attempt),
            }
        }
    }

    fn rate_limit_delay(&self, info: &RateLimitInfo) -> Duration {
        info.delay_seconds
            .map(|secs| Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64())))
            .unwrap_or(self.default_rate_limit_delay)
            .min(self.max_delay)
    }

    fn server_error_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.server_error_base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

pub type SleepFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Suspends the calling task between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> SleepFuture;
}

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture {
        Box::pin(tokio::time::sleep(duration))
    }
}
