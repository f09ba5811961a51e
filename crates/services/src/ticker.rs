//! One-per-second tick sources that drive attempt countdowns.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

#[async_trait]
pub trait TickSource: Send {
    /// Wait for the next tick. Returns false once the source is exhausted.
    async fn next_tick(&mut self) -> bool;
}

/// Real one-second ticks from the tokio timer.
///
/// The first tick lands one period after creation, not immediately.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    #[must_use]
    pub fn every_second() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled host catches up instead of silently losing seconds.
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self { interval }
    }
}

#[async_trait]
impl TickSource for IntervalTicker {
    async fn next_tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

/// A fixed number of ticks delivered without waiting.
#[derive(Debug, Clone)]
pub struct ScriptedTicks {
    remaining: u32,
    delivered: u32,
}

impl ScriptedTicks {
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            remaining: count,
            delivered: 0,
        }
    }

    #[must_use]
    pub fn delivered(&self) -> u32 {
        self.delivered
    }
}

#[async_trait]
impl TickSource for ScriptedTicks {
    async fn next_tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.delivered += 1;
        true
    }
}
