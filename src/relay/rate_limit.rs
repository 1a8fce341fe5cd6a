//! Fixed-window request budget shared by the whole relay instance

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Over budget; the window resets after this long
    Rejected { retry_after: Duration },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Allows `max_requests` per `window`, rejecting the rest until it rolls over
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    state: Mutex<Window>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            }),
        }
    }

    /// Count one request against the budget
    pub fn check(&self) -> RateDecision {
        self.check_at(Instant::now())
    }

    fn check_at(&self, now: Instant) -> RateDecision {
        let Ok(mut state) = self.state.lock() else {
            return RateDecision::Allowed;
        };

        let elapsed = now.saturating_duration_since(state.started);
        if elapsed >= self.window {
            state.started = now;
            state.count = 0;
        }

        if state.count < self.max_requests {
            state.count += 1;
            RateDecision::Allowed
        } else {
            RateDecision::Rejected {
                retry_after: self.window.saturating_sub(elapsed),
            }
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
