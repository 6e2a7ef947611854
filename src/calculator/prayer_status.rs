use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{PrayerName, PrayerRecord, PrayerStatus};

/// Whether a prayer can still be edited, and how it should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub locked: bool,
    pub status: PrayerStatus,
}

/// Deadlines per prayer plus the set of prayers that stay loggable after
/// their deadline until the day ends. Every other prayer is strict.
#[derive(Debug, Clone)]
pub struct PrayerPolicy {
    deadlines: [NaiveTime; 5],
    flexible: HashSet<PrayerName>,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for PrayerPolicy {
    fn default() -> Self {
        Self {
            deadlines: [hm(5, 45), hm(15, 41), hm(18, 29), hm(19, 49), hm(23, 59)],
            flexible: HashSet::new(),
        }
    }
}

fn index(name: PrayerName) -> usize {
    match name {
        PrayerName::Fajr => 0,
        PrayerName::Dhuhr => 1,
        PrayerName::Asr => 2,
        PrayerName::Maghrib => 3,
        PrayerName::Isha => 4,
    }
}

impl PrayerPolicy {
    pub fn with_deadline(mut self, name: PrayerName, deadline: NaiveTime) -> Self {
        self.deadlines[index(name)] = deadline;
        self
    }

    pub fn with_flexible(mut self, name: PrayerName) -> Self {
        self.flexible.insert(name);
        self
    }

    pub fn deadline(&self, name: PrayerName) -> NaiveTime {
        self.deadlines[index(name)]
    }

    pub fn is_flexible(&self, name: PrayerName) -> bool {
        self.flexible.contains(&name)
    }

    /// Classify `name` on `viewed` as seen at `now` (local wall-clock time).
    ///
    /// Past dates are always locked. On today, a strict prayer locks once
    /// `now` reaches its deadline; a flexible one stays open until the day
    /// rolls over. Future dates are locked and show as pending unless a
    /// record somehow exists.
    pub fn resolve(
        &self,
        name: PrayerName,
        record: Option<&PrayerRecord>,
        viewed: NaiveDate,
        now: NaiveDateTime,
    ) -> Resolution {
        let logged = record.is_some();

        match viewed.cmp(&now.date()) {
            Ordering::Less => Resolution {
                locked: true,
                status: if logged {
                    PrayerStatus::Prayed
                } else {
                    PrayerStatus::Missed
                },
            },
            Ordering::Greater => Resolution {
                locked: true,
                status: if logged {
                    PrayerStatus::Prayed
                } else {
                    PrayerStatus::Pending
                },
            },
            Ordering::Equal => {
                let deadline = now.date().and_time(self.deadline(name));
                let passed = now >= deadline;
                let flexible = self.is_flexible(name);

                if logged {
                    Resolution {
                        locked: passed && !flexible,
                        status: PrayerStatus::Prayed,
                    }
                } else if passed {
                    Resolution {
                        locked: !flexible,
                        status: PrayerStatus::Missed,
                    }
                } else {
                    Resolution {
                        locked: false,
                        status: PrayerStatus::Pending,
                    }
                }
            }
        }
    }
}
