use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::calculator::{worked_hours, PrayerPolicy, Resolution, TimeWindow};
use crate::config::AppConfig;
use crate::db::migrations::run_migrations;
use crate::db::repository::{ExpenseRepo, PrayerRepo, TaskRepo, WorkRepo};
use crate::error::DayflowError;
use crate::models::{
    DailyStats, DayData, GoalProgress, GoalReport, PeriodReport, PrayerMethod, PrayerName,
    PrayerRecord, Streak, Task, WorkSession,
};
use crate::utils::clock::Clock;

/// One line of the prayer board: a prayer, its deadline, what was logged, and
/// whether it can still be edited.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub deadline: NaiveTime,
    pub record: Option<PrayerRecord>,
    pub resolution: Resolution,
}

/// Owns everything the tracker knows: the database, the settings and the
/// date being looked at. Every command writes through to storage before it
/// returns.
pub struct Store {
    conn: Connection,
    config: AppConfig,
    config_path: Option<PathBuf>,
    clock: Box<dyn Clock>,
    policy: PrayerPolicy,
    selected: NaiveDate,
}

impl Store {
    pub fn open(
        conn: Connection,
        config: AppConfig,
        config_path: Option<PathBuf>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        run_migrations(&conn)?;
        let policy = config.prayers.policy()?;
        let selected = clock.today();
        Ok(Self {
            conn,
            config,
            config_path,
            clock,
            policy,
            selected,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn day(&self, date: NaiveDate) -> Result<DayData> {
        Ok(DayData {
            work: WorkRepo::get(&self.conn, date)?,
            tasks: TaskRepo::get_by_date(&self.conn, date)?,
            expenses: ExpenseRepo::get_by_date(&self.conn, date)?,
            prayers: PrayerRepo::get_by_date(&self.conn, date)?,
        })
    }

    // ─── Work ────────────────────────────────────────────────────────────────

    fn stamp(&self, at: Option<NaiveTime>) -> chrono::NaiveDateTime {
        let time = at.unwrap_or_else(|| self.clock.now().time());
        self.selected.and_time(time)
    }

    pub fn start_work(&mut self, at: Option<NaiveTime>) -> Result<WorkSession> {
        let mut session = WorkRepo::get(&self.conn, self.selected)?;
        session.start = Some(self.stamp(at));
        WorkRepo::save(&self.conn, self.selected, &session)?;
        log::info!("Work started on {} at {:?}", self.selected, session.start);
        Ok(session)
    }

    pub fn end_work(&mut self, at: Option<NaiveTime>) -> Result<WorkSession> {
        let mut session = WorkRepo::get(&self.conn, self.selected)?;
        if session.start.is_none() {
            return Err(DayflowError::WorkNotStarted {
                date: self.selected,
            }
            .into());
        }
        session.end = Some(self.stamp(at));
        WorkRepo::save(&self.conn, self.selected, &session)?;
        log::info!("Work ended on {} at {:?}", self.selected, session.end);
        Ok(session)
    }

    pub fn worked_hours(&self, date: NaiveDate) -> Result<f64> {
        let session = WorkRepo::get(&self.conn, date)?;
        self.hours_for(&session)
    }

    fn hours_for(&self, session: &WorkSession) -> Result<f64> {
        let break_window = self.config.work.break_window()?;
        Ok(worked_hours(&TimeWindow::from(session), &break_window))
    }

    // ─── Tasks & expenses ────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        notes: &str,
    ) -> Result<Task> {
        let mut task = Task {
            id: 0,
            date: self.selected,
            name: name.to_string(),
            start_time,
            end_time,
            notes: notes.to_string(),
        };
        task.id = TaskRepo::add(&self.conn, &task)?;
        log::debug!("Added task {} on {}", task.id, self.selected);
        Ok(task)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        if !TaskRepo::delete(&self.conn, id)? {
            return Err(DayflowError::NotFound {
                kind: "task",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn add_expense(&mut self, amount: f64, description: &str) -> Result<i64> {
        if amount < 0.0 || amount.is_nan() {
            return Err(DayflowError::NegativeAmount(amount).into());
        }
        let id = ExpenseRepo::add(&self.conn, self.selected, amount, description)?;
        log::debug!("Added expense {} on {}", id, self.selected);
        Ok(id)
    }

    pub fn delete_expense(&mut self, id: i64) -> Result<()> {
        if !ExpenseRepo::delete(&self.conn, id)? {
            return Err(DayflowError::NotFound {
                kind: "expense",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // ─── Prayers ─────────────────────────────────────────────────────────────

    pub fn resolve(&self, name: PrayerName, record: Option<&PrayerRecord>, date: NaiveDate) -> Resolution {
        self.policy.resolve(name, record, date, self.clock.now())
    }

    pub fn prayer_board(&self, date: NaiveDate) -> Result<Vec<PrayerEntry>> {
        let records = PrayerRepo::get_by_date(&self.conn, date)?;
        Ok(PrayerName::ALL
            .iter()
            .map(|&name| {
                let record = records.iter().find(|r| r.name == name).cloned();
                let resolution = self.resolve(name, record.as_ref(), date);
                PrayerEntry {
                    name,
                    deadline: self.policy.deadline(name),
                    record,
                    resolution,
                }
            })
            .collect())
    }

    fn ensure_unlocked(&self, name: PrayerName) -> Result<Option<PrayerRecord>> {
        let existing = PrayerRepo::get_by_date(&self.conn, self.selected)?
            .into_iter()
            .find(|r| r.name == name);
        if self.resolve(name, existing.as_ref(), self.selected).locked {
            return Err(DayflowError::PrayerLocked {
                prayer: name,
                date: self.selected,
            }
            .into());
        }
        Ok(existing)
    }

    /// Record `name` for the selected date, replacing any earlier record.
    pub fn log_prayer(
        &mut self,
        name: PrayerName,
        time: Option<NaiveTime>,
        method: PrayerMethod,
        notes: &str,
    ) -> Result<PrayerRecord> {
        self.ensure_unlocked(name)?;
        let mut record = PrayerRecord {
            id: None,
            name,
            date: self.selected,
            time: time.unwrap_or_else(|| self.clock.now().time()),
            method,
            notes: notes.to_string(),
        };
        record.id = Some(PrayerRepo::upsert(&self.conn, &record)?);
        log::info!("Logged {} on {} ({})", name, self.selected, method.as_str());
        Ok(record)
    }

    pub fn delete_prayer(&mut self, name: PrayerName) -> Result<()> {
        if self.ensure_unlocked(name)?.is_none() {
            return Err(DayflowError::NotFound {
                kind: "prayer record",
                id: format!("{} on {}", name, self.selected),
            }
            .into());
        }
        PrayerRepo::delete(&self.conn, self.selected, name)?;
        Ok(())
    }

    // ─── Settings ────────────────────────────────────────────────────────────

    /// Apply `f` to a copy of the settings; keep and persist it only if it
    /// still validates.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut AppConfig)) -> Result<()> {
        let mut next = self.config.clone();
        f(&mut next);
        next.validate().context("Rejected settings")?;
        if let Some(path) = &self.config_path {
            next.save_to(path)?;
        }
        self.policy = next.prayers.policy()?;
        self.config = next;
        Ok(())
    }

    // ─── Aggregates ──────────────────────────────────────────────────────────

    /// Monday to Sunday around the selected date.
    pub fn week_bounds(&self) -> (NaiveDate, NaiveDate) {
        let offset = self.selected.weekday().num_days_from_monday() as i64;
        let start = self.selected - Duration::days(offset);
        (start, start + Duration::days(6))
    }

    pub fn month_bounds(&self) -> (NaiveDate, NaiveDate) {
        let start = self.selected.with_day(1).unwrap_or(self.selected);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.selected);
        (start, end)
    }

    /// Dates between `start` and `end` inclusive that have any stored data.
    pub fn range_data(&self, start: NaiveDate, end: NaiveDate) -> Result<BTreeMap<NaiveDate, DayData>> {
        let mut result = BTreeMap::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let data = self.day(date)?;
            if !data.is_empty() {
                result.insert(date, data);
            }
        }
        Ok(result)
    }

    pub fn week_data(&self) -> Result<BTreeMap<NaiveDate, DayData>> {
        let (start, end) = self.week_bounds();
        self.range_data(start, end)
    }

    pub fn month_data(&self) -> Result<BTreeMap<NaiveDate, DayData>> {
        let (start, end) = self.month_bounds();
        self.range_data(start, end)
    }

    pub fn report(&self, month: bool) -> Result<PeriodReport> {
        let ((start, end), data) = if month {
            (self.month_bounds(), self.month_data()?)
        } else {
            (self.week_bounds(), self.week_data()?)
        };
        let mut days = Vec::new();
        for (date, data) in data {
            days.push(DailyStats {
                date,
                worked_hours: self.hours_for(&data.work)?,
                tasks: data.tasks.len(),
                expenses: data.expense_total(),
                prayers_logged: data.prayers.len() as u8,
            });
        }
        Ok(PeriodReport { start, end, days })
    }

    pub fn streak(&self) -> Result<Streak> {
        let days = PrayerRepo::complete_days(&self.conn)?;
        Ok(Streak::from_complete_days(&days, self.today()))
    }

    pub fn goals(&self) -> Result<GoalReport> {
        let goals = &self.config.goals;

        let mut week_hours = 0.0;
        for data in self.week_data()?.values() {
            week_hours += self.hours_for(&data.work)?;
        }
        let week_hours = (week_hours * 100.0).round() / 100.0;

        let day = self.day(self.selected)?;
        let streak = self.streak()?;

        Ok(GoalReport {
            weekly_work_hours: GoalProgress::new(week_hours, goals.weekly_work_hours),
            daily_expenses: GoalProgress::new(day.expense_total(), goals.max_daily_expenses),
            prayer_streak: GoalProgress::new(streak.current as f64, goals.prayer_streak as f64),
            daily_tasks: GoalProgress::new(day.tasks.len() as f64, goals.daily_tasks as f64),
        })
    }
}
