//! Persisted assistant configuration.
//!
//! Named profiles stored as JSON under the platform configuration directory.
//! The on-disk shape (`configs` map plus an `active` name, camelCase keys)
//! is kept compatible with earlier releases of the tool.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dirs_next::config_dir;
use serde::{Deserialize, Serialize};

const CONFIG_SUBDIR: &str = "llmcode";
const CONFIG_FILE: &str = "config.json";

/// Mask shown in place of the API key by `/config show`.
pub const KEY_MASK: &str = "********";

/// One named configuration profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "Profile::default_base_url")]
    pub base_url: String,
    #[serde(default = "Profile::default_model")]
    pub model: String,
    #[serde(default)]
    pub debug: bool,
}

impl Profile {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_owned()
    }

    fn default_model() -> String {
        "gpt-4o".to_owned()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    configs: BTreeMap<String, Profile>,
    #[serde(default = "default_active_name")]
    active: String,
}

fn default_active_name() -> String {
    "default".to_owned()
}

impl Default for ConfigFile {
    fn default() -> Self {
        let mut configs = BTreeMap::new();
        configs.insert(default_active_name(), Profile::default());
        Self {
            configs,
            active: default_active_name(),
        }
    }
}

/// Loads, mutates and persists the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    file: ConfigFile,
}

impl ConfigStore {
    /// Open the store at the default platform location, creating the file
    /// with defaults on first run.
    pub fn open_default() -> Result<Self> {
        let base = config_dir().context("unable to determine configuration directory")?;
        Self::open(base.join(CONFIG_SUBDIR).join(CONFIG_FILE))
    }

    /// Open the store at an explicit path.
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("invalid config file: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        let mut store = Self { path, file };
        // An `active` name pointing at a missing profile is normalized here
        // so the rest of the program can rely on it existing.
        store
            .file
            .configs
            .entry(store.file.active.clone())
            .or_default();
        if !store.path.exists() {
            store.save()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn active_name(&self) -> &str {
        &self.file.active
    }

    pub fn active_profile(&self) -> &Profile {
        self.file
            .configs
            .get(&self.file.active)
            .expect("active profile exists after normalization")
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.file.configs.keys().map(String::as_str)
    }

    /// Set a key on the active profile and persist the file. Accepted keys
    /// are `apiKey`, `baseUrl`, `model` and `debug`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let profile = self
            .file
            .configs
            .get_mut(&self.file.active)
            .expect("active profile exists after normalization");

        match key {
            "apiKey" => profile.api_key = value.to_owned(),
            "baseUrl" => profile.base_url = value.to_owned(),
            "model" => profile.model = value.to_owned(),
            "debug" => profile.debug = parse_bool(value)?,
            other => bail!("unknown configuration key '{other}'"),
        }
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }
        let data =
            serde_json::to_string_pretty(&self.file).context("failed to serialize config")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write config file: {}", self.path.display()))?;
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => bail!("expected a boolean for 'debug', got '{other}'"),
    }
}
