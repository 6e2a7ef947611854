use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::PrayerRecord;

/// Start and end of one day's work. Either end may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
}

/// Everything tracked for one calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayData {
    pub work: WorkSession,
    pub tasks: Vec<Task>,
    pub expenses: Vec<Expense>,
    pub prayers: Vec<PrayerRecord>,
}

impl DayData {
    pub fn is_empty(&self) -> bool {
        self.work.start.is_none()
            && self.work.end.is_none()
            && self.tasks.is_empty()
            && self.expenses.is_empty()
            && self.prayers.is_empty()
    }

    pub fn expense_total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}
