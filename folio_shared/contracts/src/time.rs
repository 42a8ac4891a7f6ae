use chrono::{DateTime, Datelike, Utc};

/// Source of the wall-clock time, injectable so rendered emails are
/// deterministic in tests.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TimeService: Send + Sync + 'static {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar year (UTC), as printed in email footers.
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

#[cfg(feature = "mock")]
impl MockTimeService {
    pub fn with_now(mut self, time: DateTime<Utc>) -> Self {
        self.expect_now().return_const(time);
        self.expect_current_year().return_const(time.year());
        self
    }
}
