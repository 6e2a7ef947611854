use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of the current local wall-clock time. Injected into the store so
/// date-sensitive behaviour can be driven from tests.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[cfg(test)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    pub fn at(date: &str, time: &str) -> Self {
        let date = crate::utils::time::parse_date(date).unwrap();
        let time = crate::utils::time::parse_hhmm(time).unwrap();
        FixedClock(date.and_time(time))
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
