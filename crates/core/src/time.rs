use chrono::{DateTime, Duration, Utc};

/// Wall-clock source for session timestamps and time-spent accounting.
///
/// `System` reads the real clock; `Fixed` only moves when advanced, which keeps
/// elapsed-time assertions exact in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Whole seconds between `since` and now, clamped at zero.
    #[must_use]
    pub fn elapsed_seconds(&self, since: DateTime<Utc>) -> u64 {
        seconds_between(since, self.now())
    }
}

/// Whole seconds from `start` to `end`; zero when `end` is earlier.
#[must_use]
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_seconds()).unwrap_or(0)
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_and_reports_elapsed() {
        let mut clock = fixed_clock();
        let start = clock.now();
        clock.advance(Duration::seconds(95));
        assert_eq!(clock.elapsed_seconds(start), 95);
    }

    #[test]
    fn elapsed_never_goes_negative() {
        let later = fixed_now() + Duration::seconds(10);
        assert_eq!(seconds_between(later, fixed_now()), 0);
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = Clock::system();
        clock.advance(Duration::days(365));
        assert!(clock.now() < Utc::now() + Duration::days(1));
    }
}
