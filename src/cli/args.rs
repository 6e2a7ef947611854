use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dayflow", version, author, about = "Track work hours, tasks, expenses and prayers from the terminal")]
pub struct Cli {
    /// Date to view or edit (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show everything tracked for the date
    Day {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Work day start/end
    Work {
        #[command(subcommand)]
        action: WorkCommands,
    },
    /// Task log
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Expense log
    Expense {
        #[command(subcommand)]
        action: ExpenseCommands,
    },
    /// Prayer log
    Prayer {
        #[command(subcommand)]
        action: PrayerCommands,
    },
    /// View or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Show progress towards goals
    Goals,
    /// Summarise the week (or month) around the date
    Report {
        /// Cover the whole month instead of the week
        #[arg(long)]
        month: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkCommands {
    /// Start the work day
    Start {
        /// Time to record (HH:MM), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// End the work day
    End {
        /// Time to record (HH:MM), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show hours worked
    Show,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// What was done
        name: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List tasks
    List,
    /// Delete a task by id
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Add an expense
    Add {
        amount: f64,
        /// What it was for
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// List expenses
    List,
    /// Delete an expense by id
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum PrayerCommands {
    /// Log a prayer (fajr, dhuhr, asr, maghrib, isha)
    Log {
        prayer: String,
        /// Time prayed (HH:MM), defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Prayed in congregation
        #[arg(long)]
        jamaat: bool,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Show the prayer board
    List,
    /// Remove a logged prayer
    Delete { prayer: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set(SettingsUpdate),
}

#[derive(Args, Debug, Default)]
pub struct SettingsUpdate {
    /// Usual work start (HH:MM)
    #[arg(long)]
    pub work_start: Option<String>,
    /// Usual work end (HH:MM)
    #[arg(long)]
    pub work_end: Option<String>,
    /// Break start (HH:MM)
    #[arg(long)]
    pub break_start: Option<String>,
    /// Break end (HH:MM)
    #[arg(long)]
    pub break_end: Option<String>,
    /// Hours to aim for each work day
    #[arg(long)]
    pub daily_target: Option<f64>,
    /// Weekly work hours goal
    #[arg(long)]
    pub weekly_hours: Option<f64>,
    /// Daily spending limit
    #[arg(long)]
    pub max_expenses: Option<f64>,
    /// Prayer streak goal in days
    #[arg(long)]
    pub prayer_streak: Option<u32>,
    /// Tasks to complete each day
    #[arg(long)]
    pub daily_tasks: Option<u32>,
}
