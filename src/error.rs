use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PrayerName;

/// Domain failures raised at the boundary between user input and the store.
#[derive(Debug, Error)]
pub enum DayflowError {
    #[error("Bad time '{0}': expected HH:MM")]
    InvalidTime(String),

    #[error("Bad date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Bad timestamp '{0}': expected an ISO-8601 date-time")]
    InvalidTimestamp(String),

    #[error("Unknown prayer '{0}'. Use: fajr, dhuhr, asr, maghrib, isha")]
    UnknownPrayer(String),

    #[error("Unknown prayer method '{0}'. Use: jamaat, alone")]
    UnknownMethod(String),

    #[error("{prayer} on {date} is locked")]
    PrayerLocked { prayer: PrayerName, date: NaiveDate },

    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Work has not been started on {date}")]
    WorkNotStarted { date: NaiveDate },

    #[error("Expense amount must not be negative (got {0})")]
    NegativeAmount(f64),
}
