pub mod day;
pub mod prayer;
pub mod stats;

pub use day::{DayData, Expense, Task, WorkSession};
pub use prayer::{PrayerMethod, PrayerName, PrayerRecord, PrayerStatus};
pub use stats::{DailyStats, GoalProgress, GoalReport, PeriodReport, Streak};
