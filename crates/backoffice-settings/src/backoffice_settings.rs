//! Backoffice Settings
//!
//! Persisted defaults for the back-office list screens:
//! - Table settings (search debounce, page size and page-size options)
//! - Logging settings (console level, file logging)

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BackofficeSettings {
    pub table: TableSettings,
    pub logging: LoggingSettings,
}

impl BackofficeSettings {
    /// Load from the default location; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Self =
            serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.table.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Delay between the last keystroke and the search it triggers
    pub search_debounce_ms: u64,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            default_page_size: 10,
            page_size_options: vec![10, 20, 30, 40, 50],
        }
    }
}

impl TableSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            bail!("default_page_size must be greater than 0");
        }
        if self.page_size_options.contains(&0) {
            bail!("page_size_options must not contain 0");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Console filter used when RUST_LOG is not set
    pub level: String,
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: true,
        }
    }
}
