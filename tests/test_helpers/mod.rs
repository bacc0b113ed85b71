//! Shared clock for integration tests.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, RwLock};

/// Clock frozen at a settable instant.
#[derive(Debug, Clone)]
pub struct SettableClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl SettableClock {
    /// Creates a clock at 09:00 UTC on the given day.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().expect("clock lock");
        *now += by;
    }

    /// Returns the current UTC date.
    pub fn today(&self) -> NaiveDate {
        self.utc().date_naive()
    }
}

impl Clock for SettableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock")
    }
}

/// Parses an ISO calendar date used in test scenarios.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}
