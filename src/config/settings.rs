use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calculator::{BreakWindow, PrayerPolicy};
use crate::models::PrayerName;
use crate::utils::time::parse_hhmm;

fn default_work_start() -> String {
    "09:30".to_string()
}
fn default_work_end() -> String {
    "17:30".to_string()
}
fn default_break_start() -> String {
    "13:20".to_string()
}
fn default_break_end() -> String {
    "14:20".to_string()
}
fn default_daily_target() -> f64 {
    8.0
}
fn default_weekly_hours() -> f64 {
    40.0
}
fn default_max_daily_expenses() -> f64 {
    50.0
}
fn default_prayer_streak() -> u32 {
    7
}
fn default_daily_tasks() -> u32 {
    5
}
fn default_fajr() -> String {
    "05:45".to_string()
}
fn default_dhuhr() -> String {
    "15:41".to_string()
}
fn default_asr() -> String {
    "18:29".to_string()
}
fn default_maghrib() -> String {
    "19:49".to_string()
}
fn default_isha() -> String {
    "23:59".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkConfig {
    #[serde(default = "default_work_start")]
    pub start_time: String,
    #[serde(default = "default_work_end")]
    pub end_time: String,
    #[serde(default = "default_break_start")]
    pub break_start: String,
    #[serde(default = "default_break_end")]
    pub break_end: String,
    /// Hours compared against when a work day is ended
    #[serde(default = "default_daily_target")]
    pub daily_target_hours: f64,
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            start_time: default_work_start(),
            end_time: default_work_end(),
            break_start: default_break_start(),
            break_end: default_break_end(),
            daily_target_hours: default_daily_target(),
        }
    }
}

impl WorkConfig {
    pub fn break_window(&self) -> Result<BreakWindow> {
        Ok(BreakWindow {
            start: parse_hhmm(&self.break_start).context("Parsing work.break_start")?,
            end: parse_hhmm(&self.break_end).context("Parsing work.break_end")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_weekly_hours")]
    pub weekly_work_hours: f64,
    #[serde(default = "default_max_daily_expenses")]
    pub max_daily_expenses: f64,
    #[serde(default = "default_prayer_streak")]
    pub prayer_streak: u32,
    #[serde(default = "default_daily_tasks")]
    pub daily_tasks: u32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            weekly_work_hours: default_weekly_hours(),
            max_daily_expenses: default_max_daily_expenses(),
            prayer_streak: default_prayer_streak(),
            daily_tasks: default_daily_tasks(),
        }
    }
}

/// Deadlines ("HH:MM") ending each prayer's window, and which prayers stay
/// loggable after their deadline for the rest of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerConfig {
    #[serde(default = "default_fajr")]
    pub fajr: String,
    #[serde(default = "default_dhuhr")]
    pub dhuhr: String,
    #[serde(default = "default_asr")]
    pub asr: String,
    #[serde(default = "default_maghrib")]
    pub maghrib: String,
    #[serde(default = "default_isha")]
    pub isha: String,
    #[serde(default)]
    pub flexible: Vec<PrayerName>,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            fajr: default_fajr(),
            dhuhr: default_dhuhr(),
            asr: default_asr(),
            maghrib: default_maghrib(),
            isha: default_isha(),
            flexible: vec![],
        }
    }
}

impl PrayerConfig {
    pub fn deadline_str(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Fajr => &self.fajr,
            PrayerName::Dhuhr => &self.dhuhr,
            PrayerName::Asr => &self.asr,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isha => &self.isha,
        }
    }

    pub fn policy(&self) -> Result<PrayerPolicy> {
        let mut policy = PrayerPolicy::default();
        for name in PrayerName::ALL {
            let deadline = parse_hhmm(self.deadline_str(name))
                .with_context(|| format!("Parsing prayers.{}", name.as_str()))?;
            policy = policy.with_deadline(name, deadline);
        }
        for name in &self.flexible {
            policy = policy.with_flexible(*name);
        }
        Ok(policy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub goals: GoalConfig,
    #[serde(default)]
    pub prayers: PrayerConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "dayflow")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("dayflow.db"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        log::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check that every time-of-day field parses.
    pub fn validate(&self) -> Result<()> {
        parse_hhmm(&self.work.start_time).context("Parsing work.start_time")?;
        parse_hhmm(&self.work.end_time).context("Parsing work.end_time")?;
        self.work.break_window()?;
        self.prayers.policy()?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.work.break_start, "13:20");
        assert!(config.prayers.flexible.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.work.break_start = "12:00".to_string();
        config.prayers.flexible = vec![PrayerName::Dhuhr, PrayerName::Isha];
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prayers]\nfajr = \"06:00\"\nflexible = [\"asr\"]\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.prayers.fajr, "06:00");
        assert_eq!(config.prayers.isha, "23:59");
        assert_eq!(config.prayers.flexible, vec![PrayerName::Asr]);
        assert_eq!(config.goals, GoalConfig::default());
    }

    #[test]
    fn bad_deadline_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prayers]\nmaghrib = \"sunset\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
