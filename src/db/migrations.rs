use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS work_sessions (
            date        TEXT PRIMARY KEY,
            start_time  TEXT,
            end_time    TEXT
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            name        TEXT NOT NULL,
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            notes       TEXT NOT NULL DEFAULT '',
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date);

        CREATE TABLE IF NOT EXISTS expenses (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            date         TEXT NOT NULL,
            amount       REAL NOT NULL CHECK(amount >= 0),
            description  TEXT NOT NULL,
            created_at   TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

        CREATE TABLE IF NOT EXISTS prayers (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            name    TEXT NOT NULL CHECK(name IN ('fajr','dhuhr','asr','maghrib','isha')),
            date    TEXT NOT NULL,
            time    TEXT NOT NULL,
            method  TEXT NOT NULL CHECK(method IN ('Jamaat','Alone')),
            notes   TEXT NOT NULL DEFAULT '',
            UNIQUE(date, name)
        );
    ")?;
    log::debug!("Migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('work_sessions','tasks','expenses','prayers')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
