use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current: f64,
    pub target: f64,
    pub percentage: f64,
}

impl GoalProgress {
    pub fn new(current: f64, target: f64) -> Self {
        let percentage = if target > 0.0 {
            current / target * 100.0
        } else {
            0.0
        };
        Self {
            current,
            target,
            percentage,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.percentage / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalReport {
    pub weekly_work_hours: GoalProgress,
    pub daily_expenses: GoalProgress,
    pub prayer_streak: GoalProgress,
    pub daily_tasks: GoalProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

impl Streak {
    /// `complete_days` are the dates on which all five prayers were logged,
    /// in any order. The current streak counts back from `today`; an
    /// incomplete `today` is skipped rather than breaking the run.
    pub fn from_complete_days(complete_days: &[NaiveDate], today: NaiveDate) -> Self {
        let mut sorted: Vec<NaiveDate> = complete_days.to_vec();
        sorted.sort();
        sorted.dedup();

        let mut current = 0u32;
        let mut check = today;
        if sorted.binary_search(&today).is_err() {
            check = today.pred_opt().unwrap_or(today);
        }
        while sorted.binary_search(&check).is_ok() {
            current += 1;
            match check.pred_opt() {
                Some(prev) => check = prev,
                None => break,
            }
        }

        Self {
            current,
            best: best_streak(&sorted),
        }
    }
}

fn best_streak(sorted: &[NaiveDate]) -> u32 {
    if sorted.is_empty() {
        return 0;
    }

    let mut best = 0u32;
    let mut current = 1u32;

    for pair in sorted.windows(2) {
        if pair[0].succ_opt() == Some(pair[1]) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
    }
    best.max(current)
}

/// One row of a week or month report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub worked_hours: f64,
    pub tasks: usize,
    pub expenses: f64,
    pub prayers_logged: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DailyStats>,
}

impl PeriodReport {
    pub fn total_hours(&self) -> f64 {
        let sum: f64 = self.days.iter().map(|d| d.worked_hours).sum();
        (sum * 100.0).round() / 100.0
    }

    pub fn total_expenses(&self) -> f64 {
        self.days.iter().map(|d| d.expenses).sum()
    }

    pub fn total_tasks(&self) -> usize {
        self.days.iter().map(|d| d.tasks).sum()
    }

    pub fn days_with_full_prayers(&self) -> usize {
        self.days.iter().filter(|d| d.prayers_logged >= 5).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn streak_counts_back_from_today() {
        let days = [d("2024-05-08"), d("2024-05-09"), d("2024-05-10")];
        let s = Streak::from_complete_days(&days, d("2024-05-10"));
        assert_eq!(s.current, 3);
        assert_eq!(s.best, 3);
    }

    #[test]
    fn incomplete_today_does_not_break_streak() {
        let days = [d("2024-05-08"), d("2024-05-09")];
        let s = Streak::from_complete_days(&days, d("2024-05-10"));
        assert_eq!(s.current, 2);
    }

    #[test]
    fn gap_before_yesterday_ends_streak() {
        let days = [d("2024-05-01"), d("2024-05-02"), d("2024-05-03"), d("2024-05-09")];
        let s = Streak::from_complete_days(&days, d("2024-05-10"));
        assert_eq!(s.current, 1);
        assert_eq!(s.best, 3);
    }

    #[test]
    fn no_complete_days() {
        assert_eq!(Streak::from_complete_days(&[], d("2024-05-10")), Streak::default());
    }

    #[test]
    fn goal_with_zero_target_has_zero_percentage() {
        assert_eq!(GoalProgress::new(3.0, 0.0).percentage, 0.0);
        assert_eq!(GoalProgress::new(20.0, 40.0).percentage, 50.0);
    }
}
