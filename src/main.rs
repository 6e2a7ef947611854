mod calculator;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::Store;
use utils::clock::SystemClock;
use utils::time::parse_date;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = AppConfig::config_path()?;
    let config = AppConfig::load_from(&config_path).context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let mut store = Store::open(conn, config, Some(config_path), Box::new(SystemClock))?;
    if let Some(date) = &cli.date {
        store.select_date(parse_date(date)?);
    }
    log::debug!("Viewing {}", store.selected_date());

    match cli.command {
        None => handlers::handle_day(&store, false)?,
        Some(Commands::Day { json }) => handlers::handle_day(&store, json)?,
        Some(Commands::Work { action }) => handlers::handle_work(&mut store, &action)?,
        Some(Commands::Task { action }) => handlers::handle_task(&mut store, &action)?,
        Some(Commands::Expense { action }) => handlers::handle_expense(&mut store, &action)?,
        Some(Commands::Prayer { action }) => handlers::handle_prayer(&mut store, &action)?,
        Some(Commands::Settings { action }) => handlers::handle_settings(&mut store, &action)?,
        Some(Commands::Goals) => handlers::handle_goals(&store)?,
        Some(Commands::Report { month, json }) => handlers::handle_report(&store, month, json)?,
    }

    Ok(())
}
