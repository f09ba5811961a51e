//! Second-granularity countdown driven by an external tick source.

/// Lifecycle of a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Never started; also the permanent state of an unlimited countdown.
    Idle,
    Running,
    Expired,
    Cancelled,
}

/// Notification produced by a tick that the countdown accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { remaining: u32 },
    Expired,
}

/// A countdown that performs no I/O: the host calls [`Countdown::tick`] once per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    state: TimerState,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            remaining: 0,
            state: TimerState::Idle,
        }
    }

    /// Start counting down from `duration_seconds`.
    ///
    /// A duration of zero or less means "no time limit": the countdown stays idle and
    /// will never expire. Only an idle countdown can be started. Returns whether it started.
    pub fn start(&mut self, duration_seconds: i64) -> bool {
        if self.state != TimerState::Idle || duration_seconds <= 0 {
            return false;
        }
        self.remaining = u32::try_from(duration_seconds).unwrap_or(u32::MAX);
        self.state = TimerState::Running;
        true
    }

    /// Consume one second. Expiry is reported exactly once, on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            return Some(TimerEvent::Expired);
        }
        Some(TimerEvent::Tick {
            remaining: self.remaining,
        })
    }

    /// Stop without expiring. Safe to call in any state; returns whether a running countdown stopped.
    pub fn cancel(&mut self) -> bool {
        if self.state == TimerState::Running {
            self.state = TimerState::Cancelled;
            return true;
        }
        false
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Seconds left, or `None` if the countdown never started (no time limit).
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            TimerState::Idle => None,
            _ => Some(self.remaining),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once_on_last_tick() {
        let mut timer = Countdown::new();
        assert!(timer.start(3));

        assert_eq!(timer.tick(), Some(TimerEvent::Tick { remaining: 2 }));
        assert_eq!(timer.tick(), Some(TimerEvent::Tick { remaining: 1 }));
        assert_eq!(timer.tick(), Some(TimerEvent::Expired));
        assert_eq!(timer.remaining(), Some(0));

        for _ in 0..5 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.remaining(), Some(0));
        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[test]
    fn expiry_count_matches_duration() {
        for duration in 1..=120 {
            let mut timer = Countdown::new();
            timer.start(duration);
            let mut expiries = 0;
            let mut expired_on = None;
            for tick in 1..=(duration + 10) {
                if timer.tick() == Some(TimerEvent::Expired) {
                    expiries += 1;
                    expired_on = Some(tick);
                }
            }
            assert_eq!(expiries, 1);
            assert_eq!(expired_on, Some(duration));
        }
    }

    #[test]
    fn non_positive_duration_never_starts() {
        for duration in [0, -1, -600] {
            let mut timer = Countdown::new();
            assert!(!timer.start(duration));
            assert_eq!(timer.tick(), None);
            assert_eq!(timer.remaining(), None);
            assert_eq!(timer.state(), TimerState::Idle);
        }
    }

    #[test]
    fn cancel_is_idempotent_and_silences_ticks() {
        let mut timer = Countdown::new();
        timer.start(10);
        timer.tick();
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), Some(9));
        assert_eq!(timer.state(), TimerState::Cancelled);
    }

    #[test]
    fn cannot_restart_a_started_countdown() {
        let mut timer = Countdown::new();
        timer.start(5);
        assert!(!timer.start(60));
        assert_eq!(timer.remaining(), Some(5));
    }

    #[test]
    fn cancel_on_idle_is_a_no_op() {
        let mut timer = Countdown::new();
        assert!(!timer.cancel());
        assert_eq!(timer.state(), TimerState::Idle);
    }
}
