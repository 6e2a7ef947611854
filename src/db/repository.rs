use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Expense, PrayerMethod, PrayerName, PrayerRecord, Task, WorkSession};
use crate::utils::time::{format_date, format_timestamp, parse_date, parse_hhmm, parse_timestamp};

// ─── Work sessions ───────────────────────────────────────────────────────────

pub struct WorkRepo;

impl WorkRepo {
    pub fn get(conn: &Connection, date: NaiveDate) -> Result<WorkSession> {
        let row = conn
            .query_row(
                "SELECT start_time, end_time FROM work_sessions WHERE date = ?1",
                params![format_date(date)],
                |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        let Some((start, end)) = row else {
            return Ok(WorkSession::default());
        };
        Ok(WorkSession {
            start: start.as_deref().map(parse_timestamp).transpose()?,
            end: end.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    pub fn save(conn: &Connection, date: NaiveDate, session: &WorkSession) -> Result<()> {
        conn.execute(
            "INSERT INTO work_sessions (date, start_time, end_time) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET start_time = ?2, end_time = ?3",
            params![
                format_date(date),
                session.start.map(format_timestamp),
                session.end.map(format_timestamp),
            ],
        )?;
        Ok(())
    }
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

pub struct TaskRepo;

impl TaskRepo {
    pub fn add(conn: &Connection, task: &Task) -> Result<i64> {
        conn.execute(
            "INSERT INTO tasks (date, name, start_time, end_time, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                format_date(task.date),
                task.name,
                task.start_time.format("%H:%M").to_string(),
                task.end_time.format("%H:%M").to_string(),
                task.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns false when no task had this id.
    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Task>> {
        let mut stmt = conn.prepare(
            "SELECT id, date, name, start_time, end_time, notes
             FROM tasks WHERE date = ?1 ORDER BY start_time, id",
        )?;

        let rows = stmt.query_map(params![format_date(date)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, date, name, start_time, end_time, notes) = r?;
            result.push(Task {
                id,
                date: parse_date(&date)?,
                name,
                start_time: parse_hhmm(&start_time)?,
                end_time: parse_hhmm(&end_time)?,
                notes,
            });
        }
        Ok(result)
    }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

pub struct ExpenseRepo;

impl ExpenseRepo {
    pub fn add(conn: &Connection, date: NaiveDate, amount: f64, description: &str) -> Result<i64> {
        conn.execute(
            "INSERT INTO expenses (date, amount, description) VALUES (?1, ?2, ?3)",
            params![format_date(date), amount, description],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let n = conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Expense>> {
        let mut stmt = conn.prepare(
            "SELECT id, date, amount, description FROM expenses WHERE date = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![format_date(date)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, date, amount, description) = r?;
            result.push(Expense {
                id,
                date: parse_date(&date)?,
                amount,
                description,
            });
        }
        Ok(result)
    }
}

// ─── Prayers ─────────────────────────────────────────────────────────────────

pub struct PrayerRepo;

impl PrayerRepo {
    /// Insert the record, replacing any earlier one for the same (date, name).
    pub fn upsert(conn: &Connection, record: &PrayerRecord) -> Result<i64> {
        let id = conn.query_row(
            "INSERT INTO prayers (name, date, time, method, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(date, name) DO UPDATE SET time = ?3, method = ?4, notes = ?5
             RETURNING id",
            params![
                record.name.as_str(),
                format_date(record.date),
                record.time.format("%H:%M").to_string(),
                record.method.as_str(),
                record.notes,
            ],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(id)
    }

    pub fn delete(conn: &Connection, date: NaiveDate, name: PrayerName) -> Result<bool> {
        let n = conn.execute(
            "DELETE FROM prayers WHERE date = ?1 AND name = ?2",
            params![format_date(date), name.as_str()],
        )?;
        Ok(n > 0)
    }

    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<PrayerRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, date, time, method, notes
             FROM prayers WHERE date = ?1
             ORDER BY CASE name
               WHEN 'fajr' THEN 1 WHEN 'dhuhr' THEN 2 WHEN 'asr' THEN 3
               WHEN 'maghrib' THEN 4 WHEN 'isha' THEN 5 END",
        )?;

        let rows = stmt.query_map(params![format_date(date)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, name, date, time, method, notes) = r?;
            result.push(PrayerRecord {
                id: Some(id),
                name: name.parse::<PrayerName>()?,
                date: parse_date(&date)?,
                time: parse_hhmm(&time)?,
                method: method.parse::<PrayerMethod>()?,
                notes,
            });
        }
        Ok(result)
    }

    /// Dates on which all five prayers have a record.
    pub fn complete_days(conn: &Connection) -> Result<Vec<NaiveDate>> {
        let mut stmt = conn.prepare(
            "SELECT date FROM prayers
             GROUP BY date
             HAVING COUNT(DISTINCT name) >= 5
             ORDER BY date",
        )?;

        let dates: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        dates
            .iter()
            .map(|d| parse_date(d).map_err(anyhow::Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use chrono::NaiveTime;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn record(name: PrayerName, d: &str, method: PrayerMethod, notes: &str) -> PrayerRecord {
        PrayerRecord {
            id: None,
            name,
            date: date(d),
            time: NaiveTime::from_hms_opt(13, 5, 0).unwrap(),
            method,
            notes: notes.to_string(),
        }
    }

    #[test]
    fn work_session_defaults_to_empty() {
        let conn = conn();
        assert_eq!(WorkRepo::get(&conn, date("2024-05-10")).unwrap(), WorkSession::default());
    }

    #[test]
    fn work_session_save_overwrites() {
        let conn = conn();
        let d = date("2024-05-10");
        let start = d.and_hms_opt(9, 15, 0).unwrap();
        let end = d.and_hms_opt(17, 45, 0).unwrap();

        WorkRepo::save(&conn, d, &WorkSession { start: Some(start), end: None }).unwrap();
        WorkRepo::save(&conn, d, &WorkSession { start: Some(start), end: Some(end) }).unwrap();

        let session = WorkRepo::get(&conn, d).unwrap();
        assert_eq!(session.start, Some(start));
        assert_eq!(session.end, Some(end));
    }

    #[test]
    fn relogging_a_prayer_replaces_it() {
        let conn = conn();
        let first = PrayerRepo::upsert(&conn, &record(PrayerName::Asr, "2024-05-10", PrayerMethod::Alone, "")).unwrap();
        let second = PrayerRepo::upsert(
            &conn,
            &record(PrayerName::Asr, "2024-05-10", PrayerMethod::Jamaat, "at the mosque"),
        )
        .unwrap();
        assert_eq!(first, second);

        let prayers = PrayerRepo::get_by_date(&conn, date("2024-05-10")).unwrap();
        assert_eq!(prayers.len(), 1);
        assert_eq!(prayers[0].method, PrayerMethod::Jamaat);
        assert_eq!(prayers[0].notes, "at the mosque");
    }

    #[test]
    fn same_prayer_on_different_days_is_kept_apart() {
        let conn = conn();
        PrayerRepo::upsert(&conn, &record(PrayerName::Fajr, "2024-05-10", PrayerMethod::Alone, "")).unwrap();
        PrayerRepo::upsert(&conn, &record(PrayerName::Fajr, "2024-05-11", PrayerMethod::Alone, "")).unwrap();
        assert_eq!(PrayerRepo::get_by_date(&conn, date("2024-05-10")).unwrap().len(), 1);
        assert_eq!(PrayerRepo::get_by_date(&conn, date("2024-05-11")).unwrap().len(), 1);
    }

    #[test]
    fn prayers_come_back_in_canonical_order() {
        let conn = conn();
        for name in [PrayerName::Isha, PrayerName::Fajr, PrayerName::Asr] {
            PrayerRepo::upsert(&conn, &record(name, "2024-05-10", PrayerMethod::Alone, "")).unwrap();
        }
        let names: Vec<PrayerName> = PrayerRepo::get_by_date(&conn, date("2024-05-10"))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec![PrayerName::Fajr, PrayerName::Asr, PrayerName::Isha]);
    }

    #[test]
    fn complete_days_need_all_five() {
        let conn = conn();
        for name in PrayerName::ALL {
            PrayerRepo::upsert(&conn, &record(name, "2024-05-09", PrayerMethod::Alone, "")).unwrap();
        }
        for name in &PrayerName::ALL[..4] {
            PrayerRepo::upsert(&conn, &record(*name, "2024-05-10", PrayerMethod::Alone, "")).unwrap();
        }
        assert_eq!(PrayerRepo::complete_days(&conn).unwrap(), vec![date("2024-05-09")]);
    }

    #[test]
    fn tasks_and_expenses_delete_by_id() {
        let conn = conn();
        let d = date("2024-05-10");
        let task = Task {
            id: 0,
            date: d,
            name: "Review".to_string(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            notes: String::new(),
        };
        let task_id = TaskRepo::add(&conn, &task).unwrap();
        let expense_id = ExpenseRepo::add(&conn, d, 4.5, "coffee").unwrap();

        assert!(TaskRepo::delete(&conn, task_id).unwrap());
        assert!(!TaskRepo::delete(&conn, task_id).unwrap());
        assert!(ExpenseRepo::delete(&conn, expense_id).unwrap());
        assert!(TaskRepo::get_by_date(&conn, d).unwrap().is_empty());
        assert!(ExpenseRepo::get_by_date(&conn, d).unwrap().is_empty());
    }
}
