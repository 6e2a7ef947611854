use chrono::{NaiveDateTime, NaiveTime};

use crate::models::WorkSession;

/// Daily break, as times-of-day. Applied to whatever date the work started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Work window of one day. Either end may be absent while a day is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl From<&WorkSession> for TimeWindow {
    fn from(session: &WorkSession) -> Self {
        Self {
            start: session.start,
            end: session.end,
        }
    }
}

/// Whole minutes worked in `window`, minus the part that falls inside the
/// break. Partial minutes are truncated. Returns 0 when either end is missing
/// or the window ends before it starts.
pub fn worked_minutes(window: &TimeWindow, break_window: &BreakWindow) -> i64 {
    let (Some(start), Some(end)) = (window.start, window.end) else {
        return 0;
    };
    if end < start {
        log::warn!("Work window ends ({}) before it starts ({}), counting 0", end, start);
        return 0;
    }

    if break_window.end < break_window.start {
        log::warn!(
            "Break window ends ({}) before it starts ({}), no break deducted",
            break_window.end,
            break_window.start
        );
    }

    let date = start.date();
    let break_start = date.and_time(break_window.start);
    let break_end = date.and_time(break_window.end);

    let overlap = if end > break_start && start < break_end {
        (end.min(break_end) - start.max(break_start)).num_minutes().max(0)
    } else {
        0
    };

    let total = (end - start).num_minutes();
    total - overlap
}

/// Net hours worked, rounded half away from zero to two decimals.
pub fn worked_hours(window: &TimeWindow, break_window: &BreakWindow) -> f64 {
    let minutes = worked_minutes(window, break_window);
    round2(minutes as f64 / 60.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn brk(sh: u32, sm: u32, eh: u32, em: u32) -> BreakWindow {
        BreakWindow {
            start: NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
            end: NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
        }
    }

    fn window(start: NaiveDateTime, end: NaiveDateTime) -> TimeWindow {
        TimeWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    #[test]
    fn full_day_deducts_break() {
        let hours = worked_hours(&window(at(9, 0), at(17, 0)), &brk(13, 0, 14, 0));
        assert_eq!(hours, 7.0);
    }

    #[test]
    fn morning_only_ignores_break() {
        let hours = worked_hours(&window(at(9, 0), at(12, 0)), &brk(13, 0, 14, 0));
        assert_eq!(hours, 3.0);
    }

    #[test]
    fn missing_end_is_zero() {
        let w = TimeWindow {
            start: Some(at(9, 0)),
            end: None,
        };
        assert_eq!(worked_hours(&w, &brk(13, 0, 14, 0)), 0.0);
    }

    #[test]
    fn missing_start_is_zero() {
        let w = TimeWindow {
            start: None,
            end: Some(at(17, 0)),
        };
        assert_eq!(worked_hours(&w, &brk(13, 0, 14, 0)), 0.0);
        assert_eq!(worked_hours(&TimeWindow::default(), &brk(13, 0, 14, 0)), 0.0);
    }

    #[test]
    fn windows_clear_of_the_break_count_in_full() {
        let b = brk(13, 20, 14, 20);
        for (s, e) in [(at(6, 0), at(13, 20)), (at(14, 20), at(22, 45)), (at(8, 5), at(8, 50))] {
            let expected = round2((e - s).num_minutes() as f64 / 60.0);
            assert_eq!(worked_hours(&window(s, e), &b), expected);
        }
    }

    #[test]
    fn windows_containing_the_break_lose_all_of_it() {
        let b = brk(13, 20, 14, 20);
        for (s, e) in [(at(9, 30), at(17, 30)), (at(13, 20), at(14, 20)), (at(0, 0), at(23, 59))] {
            let expected = round2(((e - s).num_minutes() - 60) as f64 / 60.0);
            assert_eq!(worked_hours(&window(s, e), &b), expected);
        }
    }

    #[test]
    fn partial_overlap_deducts_only_the_overlap() {
        // 30 minutes of each window fall inside the break
        assert_eq!(worked_minutes(&window(at(10, 0), at(13, 30)), &brk(13, 0, 14, 0)), 180);
        assert_eq!(worked_minutes(&window(at(13, 30), at(18, 0)), &brk(13, 0, 14, 0)), 240);
    }

    #[test]
    fn work_inside_the_break_is_zero() {
        assert_eq!(worked_hours(&window(at(13, 10), at(13, 50)), &brk(13, 0, 14, 0)), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 400 minutes = 6.666.. hours
        assert_eq!(worked_hours(&window(at(9, 0), at(15, 40)), &brk(20, 0, 20, 30)), 6.67);
        // 10 minutes = 0.1666.. hours
        assert_eq!(worked_hours(&window(at(9, 0), at(9, 10)), &brk(20, 0, 20, 30)), 0.17);
    }

    #[test]
    fn partial_minutes_are_truncated() {
        let start = at(9, 0);
        let end = at(10, 0) + chrono::Duration::seconds(59);
        assert_eq!(worked_minutes(&window(start, end), &brk(20, 0, 20, 30)), 60);
    }

    #[test]
    fn inverted_window_is_zero() {
        assert_eq!(worked_hours(&window(at(17, 0), at(9, 0)), &brk(13, 0, 14, 0)), 0.0);
    }

    #[test]
    fn break_is_anchored_to_the_start_date() {
        // Overnight shift: the break on the start date is 13:00-14:00, long before work begins.
        let start = at(22, 0);
        let end = start + chrono::Duration::hours(8);
        assert_eq!(worked_hours(&window(start, end), &brk(13, 0, 14, 0)), 8.0);
    }

    #[test]
    fn inverted_break_deducts_nothing() {
        assert_eq!(worked_hours(&window(at(9, 0), at(17, 0)), &brk(14, 0, 13, 0)), 8.0);
    }
}
