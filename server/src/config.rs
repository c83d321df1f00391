use anyhow::{Context, Result, anyhow};
use platform_db::DatabaseSettings;
use products_hr::ReportWindows;

pub const DEFAULT_SITE_TITLE: &str = "HR Analytics Dashboard";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub site_title: String,
    pub cors_allowed_origins: Vec<String>,
    pub windows: ReportWindows,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            site_title: DEFAULT_SITE_TITLE.to_string(),
            cors_allowed_origins: Vec::new(),
            windows: ReportWindows::default(),
        }
    }
}

impl AppConfig {
    /// Read settings from the environment, after loading `.env` if present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseSettings::from_env().context("invalid database settings")?;
        let site_title = std::env::var("HR_SITE_TITLE")
            .ok()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_SITE_TITLE.into());

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        let defaults = ReportWindows::default();
        let windows = ReportWindows {
            attendance_days: env_days("HR_ATTENDANCE_WINDOW_DAYS", defaults.attendance_days)?,
            history_days: env_days("HR_HISTORY_WINDOW_DAYS", defaults.history_days)?,
        };

        Ok(Self {
            database,
            site_title,
            cors_allowed_origins,
            windows,
        })
    }
}

fn env_days(key: &str, default: i64) -> Result<i64> {
    match std::env::var(key) {
        Ok(raw) => parse_days(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_days(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|days| (1..=1825).contains(days))
        .ok_or_else(|| anyhow!("{key} must be a whole number of days between 1 and 1825"))
}
