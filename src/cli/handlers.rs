use anyhow::Result;

use crate::cli::args::{
    ExpenseCommands, PrayerCommands, SettingsCommands, SettingsUpdate, TaskCommands, WorkCommands,
};
use crate::db::{PrayerEntry, Store};
use crate::models::{GoalProgress, PrayerMethod, PrayerName, PrayerStatus};
use crate::utils::format::{format_amount, format_hours, format_time, pad_to_width, progress_bar};
use crate::utils::time::parse_hhmm;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn parse_optional_time(s: &Option<String>) -> Result<Option<chrono::NaiveTime>> {
    Ok(s.as_deref().map(parse_hhmm).transpose()?)
}

// ─── Day view ────────────────────────────────────────────────────────────────

pub fn handle_day(store: &Store, json: bool) -> Result<()> {
    let date = store.selected_date();

    if json {
        let view = serde_json::json!({
            "date": date,
            "worked_hours": store.worked_hours(date)?,
            "data": store.day(date)?,
            "prayers": store.prayer_board(date)?,
        });
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!();
    let suffix = if date == store.today() { " (today)" } else { "" };
    println_colored!(GOLD, "  dayflow — {}{}", date.format("%A, %d %B %Y"), suffix);
    println!();
    print_work(store)?;
    println!();
    print_tasks(store)?;
    println!();
    print_expenses(store)?;
    println!();
    print_prayers(store)?;
    println!();
    Ok(())
}

// ─── Work ────────────────────────────────────────────────────────────────────

pub fn handle_work(store: &mut Store, action: &WorkCommands) -> Result<()> {
    match action {
        WorkCommands::Start { at } => {
            let session = store.start_work(parse_optional_time(at)?)?;
            if let Some(start) = session.start {
                println_colored!(GREEN, "  ✓ Work started at {}", format_time(start.time()));
            }
        }
        WorkCommands::End { at } => {
            store.end_work(parse_optional_time(at)?)?;
            let hours = store.worked_hours(store.selected_date())?;
            let target = store.config().work.daily_target_hours;
            if hours >= target {
                println_colored!(GREEN, "  ✓ Great job! You worked {} today.", format_hours(hours));
            } else {
                println_colored!(
                    AMBER,
                    "  Work complete. You worked {}, target was {}.",
                    format_hours(hours),
                    format_hours(target)
                );
            }
        }
        WorkCommands::Show => print_work(store)?,
    }
    Ok(())
}

fn print_work(store: &Store) -> Result<()> {
    let date = store.selected_date();
    let session = store.day(date)?.work;
    let fmt = |t: Option<chrono::NaiveDateTime>| {
        t.map(|t| format_time(t.time()))
            .unwrap_or_else(|| "--:--".to_string())
    };
    let work = &store.config().work;

    println_colored!(BOLD, "  Work");
    println!(
        "  {} → {}   {}",
        fmt(session.start),
        fmt(session.end),
        format_hours(store.worked_hours(date)?)
    );
    println_colored!(DIM, "  break {}–{}", work.break_start, work.break_end);
    Ok(())
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

pub fn handle_task(store: &mut Store, action: &TaskCommands) -> Result<()> {
    match action {
        TaskCommands::Add {
            name,
            start,
            end,
            notes,
        } => {
            let task = store.add_task(name, parse_hhmm(start)?, parse_hhmm(end)?, notes)?;
            println_colored!(GREEN, "  ✓ Added task #{}: {}", task.id, task.name);
        }
        TaskCommands::List => print_tasks(store)?,
        TaskCommands::Delete { id } => {
            store.delete_task(*id)?;
            println_colored!(DIM, "  Deleted task #{}", id);
        }
    }
    Ok(())
}

fn print_tasks(store: &Store) -> Result<()> {
    let tasks = store.day(store.selected_date())?.tasks;
    println_colored!(BOLD, "  Tasks ({})", tasks.len());
    if tasks.is_empty() {
        println_colored!(DIM, "  none logged");
    }
    for task in &tasks {
        println!(
            "  #{:<4} {}–{}  {}  {}",
            task.id,
            format_time(task.start_time),
            format_time(task.end_time),
            pad_to_width(&task.name, 30),
            task.notes
        );
    }
    Ok(())
}

// ─── Expenses ────────────────────────────────────────────────────────────────

pub fn handle_expense(store: &mut Store, action: &ExpenseCommands) -> Result<()> {
    match action {
        ExpenseCommands::Add {
            amount,
            description,
        } => {
            let description = description.join(" ");
            let id = store.add_expense(*amount, &description)?;
            println_colored!(GREEN, "  ✓ Added expense #{}: {} {}", id, format_amount(*amount), description);
        }
        ExpenseCommands::List => print_expenses(store)?,
        ExpenseCommands::Delete { id } => {
            store.delete_expense(*id)?;
            println_colored!(DIM, "  Deleted expense #{}", id);
        }
    }
    Ok(())
}

fn print_expenses(store: &Store) -> Result<()> {
    let day = store.day(store.selected_date())?;
    let limit = store.config().goals.max_daily_expenses;
    let total = day.expense_total();

    println_colored!(BOLD, "  Expenses");
    for expense in &day.expenses {
        println!(
            "  #{:<4} {}  {:>10}",
            expense.id,
            pad_to_width(&expense.description, 30),
            format_amount(expense.amount)
        );
    }
    let color = if limit > 0.0 && total > limit { RED } else { DIM };
    println_colored!(color, "  total {} of {}", format_amount(total), format_amount(limit));
    Ok(())
}

// ─── Prayers ─────────────────────────────────────────────────────────────────

pub fn handle_prayer(store: &mut Store, action: &PrayerCommands) -> Result<()> {
    match action {
        PrayerCommands::Log {
            prayer,
            at,
            jamaat,
            notes,
        } => {
            let name: PrayerName = prayer.parse()?;
            let method = if *jamaat {
                PrayerMethod::Jamaat
            } else {
                PrayerMethod::Alone
            };
            let record = store.log_prayer(name, parse_optional_time(at)?, method, notes)?;
            match record.method {
                PrayerMethod::Jamaat => println_colored!(
                    GREEN,
                    "  ✓ {} logged in jamaat at {}. Masha'Allah!",
                    name,
                    format_time(record.time)
                ),
                PrayerMethod::Alone => {
                    println_colored!(GREEN, "  ✓ {} logged at {}", name, format_time(record.time))
                }
            }
        }
        PrayerCommands::List => print_prayers(store)?,
        PrayerCommands::Delete { prayer } => {
            let name: PrayerName = prayer.parse()?;
            store.delete_prayer(name)?;
            println_colored!(DIM, "  Removed {}", name);
        }
    }
    Ok(())
}

fn print_prayers(store: &Store) -> Result<()> {
    println_colored!(BOLD, "  Prayers");
    for entry in store.prayer_board(store.selected_date())? {
        print_prayer_entry(&entry);
    }
    Ok(())
}

fn print_prayer_entry(entry: &PrayerEntry) {
    let (icon, color) = match entry.resolution.status {
        PrayerStatus::Prayed => ("●", GREEN),
        PrayerStatus::Missed => ("✗", RED),
        PrayerStatus::Pending => ("○", DIM),
    };
    let detail = match &entry.record {
        Some(r) => format!("{} at {}", r.method.as_str(), format_time(r.time)),
        None if entry.resolution.status == PrayerStatus::Missed => "time passed".to_string(),
        None => format!("until {}", format_time(entry.deadline)),
    };
    let lock = if entry.resolution.locked { "🔒" } else { "" };
    println_colored!(
        color,
        "  {} {:<8} {:<8} {:<22} {}",
        icon,
        entry.name.display_name(),
        entry.resolution.status.as_str(),
        detail,
        lock
    );
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn handle_settings(store: &mut Store, action: &SettingsCommands) -> Result<()> {
    match action {
        SettingsCommands::Show => {
            println!("{}", toml::to_string_pretty(store.config())?);
        }
        SettingsCommands::Set(update) => {
            apply_settings(store, update)?;
            println_colored!(GREEN, "  ✓ Settings saved");
        }
    }
    Ok(())
}

fn apply_settings(store: &mut Store, update: &SettingsUpdate) -> Result<()> {
    store.update_settings(|c| {
        if let Some(v) = &update.work_start {
            c.work.start_time = v.clone();
        }
        if let Some(v) = &update.work_end {
            c.work.end_time = v.clone();
        }
        if let Some(v) = &update.break_start {
            c.work.break_start = v.clone();
        }
        if let Some(v) = &update.break_end {
            c.work.break_end = v.clone();
        }
        if let Some(v) = update.daily_target {
            c.work.daily_target_hours = v;
        }
        if let Some(v) = update.weekly_hours {
            c.goals.weekly_work_hours = v;
        }
        if let Some(v) = update.max_expenses {
            c.goals.max_daily_expenses = v;
        }
        if let Some(v) = update.prayer_streak {
            c.goals.prayer_streak = v;
        }
        if let Some(v) = update.daily_tasks {
            c.goals.daily_tasks = v;
        }
    })
}

// ─── Goals ───────────────────────────────────────────────────────────────────

pub fn handle_goals(store: &Store) -> Result<()> {
    let goals = store.goals()?;
    let streak = store.streak()?;

    println!();
    println_colored!(GOLD, "  Goals");
    println!();
    print_goal("Weekly work", &goals.weekly_work_hours, format_hours);
    print_goal("Daily spend", &goals.daily_expenses, format_amount);
    print_goal("Prayer streak", &goals.prayer_streak, |v| format!("{}d", v as u32));
    print_goal("Daily tasks", &goals.daily_tasks, |v| format!("{}", v as u32));
    println!();
    println_colored!(DIM, "  Best prayer streak: {} days", streak.best);
    println!();
    Ok(())
}

fn print_goal(label: &str, goal: &GoalProgress, fmt: impl Fn(f64) -> String) {
    let color = if goal.percentage >= 100.0 { GREEN } else { AMBER };
    println_colored!(
        color,
        "  {:<14} {}  {} / {}  ({:.0}%)",
        label,
        progress_bar(goal.ratio(), 20),
        fmt(goal.current),
        fmt(goal.target),
        goal.percentage
    );
}

// ─── Report ──────────────────────────────────────────────────────────────────

pub fn handle_report(store: &Store, month: bool, json: bool) -> Result<()> {
    let report = store.report(month)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let period = if month { "Month" } else { "Week" };
    println!("# dayflow — {} {} to {}", period, report.start, report.end);
    println!();
    println!("  date        hours   tasks   spent     prayers");
    for day in &report.days {
        let bar = progress_bar(day.prayers_logged as f64 / 5.0, 5);
        println!(
            "  {}  {:>6}  {:>6}  {:>8}  {}/5 {}",
            day.date,
            format_hours(day.worked_hours),
            day.tasks,
            format_amount(day.expenses),
            day.prayers_logged,
            bar
        );
    }
    println!();
    println!("## Totals");
    println!("  Worked:       {}", format_hours(report.total_hours()));
    println!("  Tasks:        {}", report.total_tasks());
    println!("  Spent:        {}", format_amount(report.total_expenses()));
    println!("  Full prayers: {} days", report.days_with_full_prayers());
    Ok(())
}
