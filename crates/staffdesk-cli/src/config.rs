//! Configuration store with an on-disk JSON mirror.
//!
//! Two sections mirror the original config file: `api_config` (the
//! completion endpoint parameters) and `app_settings` (storage directory
//! and history limit; the original's theme/font/geometry fields belong to
//! the excluded presentation layer).
//!
//! External-change detection is an explicit reload performed on every read
//! path: each accessor compares the file's mtime against the last one seen
//! and re-reads when it moved. There is no background watcher.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use staffdesk_llm::ApiConfig;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info};

/// Application-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Directory holding conversation logs, uploads and reports.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// How many messages to load into the view on startup.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_storage_dir() -> String {
    "chats_data".to_string()
}

fn default_history_limit() -> usize {
    250
}

/// The full configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion endpoint parameters.
    #[serde(rename = "api_config", default)]
    pub api: ApiConfig,

    /// Application settings.
    #[serde(rename = "app_settings", default)]
    pub app: AppSettings,
}

/// Configuration store backed by one JSON file.
///
/// Updates persist immediately; reads go through [`reload_if_changed`]
/// first so edits made outside the process are picked up at the next read.
///
/// [`reload_if_changed`]: ConfigStore::reload_if_changed
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
    last_modified: Option<SystemTime>,
}

impl ConfigStore {
    /// The default configuration path, `~/.staffdesk/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".staffdesk").join("config.json"))
    }

    /// Open the store, creating a default config file when none exists.
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut store = Self {
            path,
            config: Config::default(),
            last_modified: None,
        };

        if !store.path.exists() {
            store.save()?;
            debug!("Created default config file at {}", store.path.display());
        }
        store.reload_if_changed()?;
        Ok(store)
    }

    /// The path of the JSON mirror.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Re-read the file if its mtime moved since the last load or save.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if modified == self.last_modified {
            return Ok(false);
        }

        let contents = fs::read_to_string(&self.path)?;
        self.config = serde_json::from_str(&contents)?;
        if self.last_modified.is_some() {
            info!("Config reloaded from file due to external changes");
        }
        self.last_modified = modified;
        Ok(true)
    }

    /// Current configuration, reloading first when the file changed.
    pub fn config(&mut self) -> Result<&Config> {
        self.reload_if_changed()?;
        Ok(&self.config)
    }

    /// The API section, reloading first when the file changed.
    pub fn api(&mut self) -> Result<ApiConfig> {
        self.reload_if_changed()?;
        Ok(self.config.api.clone())
    }

    /// Persist the in-memory configuration immediately.
    pub fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, contents)?;
        self.last_modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        debug!("Config updated at {}", self.path.display());
        Ok(())
    }

    /// Overlay command-line overrides onto the config and persist them.
    pub fn apply_cli_args(&mut self, cli: &Cli) -> Result<()> {
        self.reload_if_changed()?;

        let mut changed = false;
        macro_rules! overlay {
            ($field:expr, $target:expr) => {
                if let Some(value) = &$field {
                    $target = value.clone();
                    changed = true;
                }
            };
        }

        overlay!(cli.base_url, self.config.api.base_url);
        overlay!(cli.api_key, self.config.api.api_key);
        overlay!(cli.model, self.config.api.model);
        overlay!(cli.temperature, self.config.api.temperature);
        overlay!(cli.top_p, self.config.api.top_p);
        overlay!(cli.max_tokens, self.config.api.max_tokens);
        overlay!(cli.stream, self.config.api.stream);
        overlay!(cli.storage_dir, self.config.app.storage_dir);

        if changed {
            self.save()?;
        }
        Ok(())
    }
}
