use chrono::Utc;
use curatia_application::Clock;

/// Wall-clock date provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a system clock.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn today(&self) -> chrono::NaiveDate {
        Utc::now().date_naive()
    }
}
