use crate::errors::{AppError, AppResult};
use crate::grid::config::{Clock, DEFAULT_DISPLAY_SLOT_SIZE, GridConfig};
use crate::session::history::DEFAULT_UNDO_LIMIT;
use crate::utils::{date, time};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// First day of the planning window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    Sunday,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: String,
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: String,
    #[serde(default = "default_display_slot_size")]
    pub display_slot_size: usize,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    #[serde(default = "default_week_start")]
    pub week_start: WeekStart,
}

fn default_working_hours_start() -> String {
    "09:00".to_string()
}
fn default_working_hours_end() -> String {
    "18:00".to_string()
}
fn default_display_slot_size() -> usize {
    DEFAULT_DISPLAY_SLOT_SIZE
}
fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}
fn default_week_start() -> WeekStart {
    WeekStart::Monday
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            display_slot_size: default_display_slot_size(),
            undo_limit: default_undo_limit(),
            week_start: default_week_start(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimeblock")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rtimeblock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimeblock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rtimeblock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Serialize(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path);

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }

    /// Grid geometry for the window containing "now": it starts on the
    /// configured first weekday of the current week.
    pub fn grid_config(&self, clock: Arc<dyn Clock>) -> AppResult<GridConfig> {
        let start = time::parse_time(&self.working_hours_start)
            .ok_or_else(|| AppError::InvalidTime(self.working_hours_start.clone()))?;
        let end = time::parse_time(&self.working_hours_end)
            .ok_or_else(|| AppError::InvalidTime(self.working_hours_end.clone()))?;
        if end <= start {
            return Err(AppError::Config(format!(
                "working_hours_end ({}) must be after working_hours_start ({})",
                self.working_hours_end, self.working_hours_start
            )));
        }

        let first_date = date::week_start(clock.now().date(), self.week_start);
        Ok(GridConfig::new(first_date)
            .with_working_hours(start, end)
            .with_display_slot_size(self.display_slot_size)
            .with_clock(clock))
    }
}
