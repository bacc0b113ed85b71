//! Shared fixtures for unit tests.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, RwLock};

/// Clock frozen at a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self::at(
            Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().expect("clock lock");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock")
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}
