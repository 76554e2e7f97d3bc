//! Scroll event gate for infinite feeds
//!
//! Two windows drop excess "near the bottom" events: a short throttle on raw
//! events and a longer lock armed by each accepted event.

use crate::config::FeedSettings;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollGateConfig {
    pub throttle: Duration,
    pub rearm: Duration,
}

impl Default for ScrollGateConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(100),
            rearm: Duration::from_millis(1000),
        }
    }
}

impl From<&FeedSettings> for ScrollGateConfig {
    fn from(settings: &FeedSettings) -> Self {
        Self {
            throttle: Duration::from_millis(settings.throttle_ms),
            rearm: Duration::from_millis(settings.rearm_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrollGate {
    inner: Arc<Mutex<ScrollGateInner>>,
    config: ScrollGateConfig,
}

#[derive(Debug, Default)]
struct ScrollGateInner {
    last_event: Option<Instant>,
    locked_until: Option<Instant>,
    accepted: u64,
    dropped: u64,
}

impl ScrollGate {
    pub fn new(config: ScrollGateConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollGateInner::default())),
            config,
        }
    }

    /// Whether this scroll event should trigger a load
    pub fn try_trigger(&self) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if inner
            .last_event
            .is_some_and(|last| now.duration_since(last) < self.config.throttle)
        {
            inner.dropped += 1;
            return false;
        }
        inner.last_event = Some(now);

        if inner.locked_until.is_some_and(|until| now < until) {
            inner.dropped += 1;
            debug!("Scroll gate locked, dropping event");
            return false;
        }

        inner.locked_until = Some(now + self.config.rearm);
        inner.accepted += 1;
        true
    }

    pub fn stats(&self) -> ScrollGateStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        ScrollGateStats {
            accepted: inner.accepted,
            dropped: inner.dropped,
        }
    }

    pub fn reset(&self) {
        *self.inner.lock().unwrap_or_else(|e| e.into_inner()) = ScrollGateInner::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollGateStats {
    pub accepted: u64,
    pub dropped: u64,
}

impl ScrollGateStats {
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.accepted + self.dropped;
        if total == 0 {
            1.0
        } else {
            self.accepted as f64 / total as f64
        }
    }
}
