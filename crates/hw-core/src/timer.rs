//! Tick Timer
//!
//! A repeating timer driven by the host clock. `start(interval, limit)` arms
//! it to fire `limit` times, once every `interval` seconds; `remaining` counts
//! the repeats still outstanding. Cooldowns arm it with a one second interval,
//! so `remaining` reads as whole seconds left.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickTimer {
    interval: f32,
    limit: u32,
    remaining: u32,
    /// Time accumulated towards the next repeat
    elapsed: f32,
}

impl TickTimer {
    /// Creates an idle timer with nothing remaining.
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arms the timer. A non-positive interval or zero limit leaves it idle.
    pub fn start(&mut self, interval: f32, limit: u32) {
        self.interval = interval;
        self.limit = limit;
        self.elapsed = 0.0;
        self.remaining = if interval > 0.0 { limit } else { 0 };
    }

    pub fn stop(&mut self) {
        self.remaining = 0;
        self.elapsed = 0.0;
    }

    /// Repeats still outstanding.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Repeat count of the last `start`.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    /// Moves the timer forward by `dt` seconds of host time.
    pub fn advance(&mut self, dt: f32) {
        if self.remaining == 0 || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        while self.remaining > 0 && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.elapsed = 0.0;
        }
    }
}
