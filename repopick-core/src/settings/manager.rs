use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_SETTINGS_FILE: &str = "repopick.toml";

/// Settings for the lifetime of the process. They are read once and never
/// written back; clones share the same instance.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    inner: Arc<Settings>,
}

impl SettingsManager {
    /// Load settings from `./repopick.toml`
    pub fn new() -> Result<Self> {
        Self::from_path(PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings from a specific path. A missing file yields the defaults.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let settings = Self::load_from_file(&path)?;
        tracing::debug!(?path, ?settings, "Loaded settings");
        Ok(Self {
            settings_path: path,
            inner: Arc::new(settings),
        })
    }

    /// Wrap already constructed settings, resolving relative script paths
    /// against `config_dir`.
    pub fn from_settings(settings: Settings, config_dir: &Path) -> Self {
        Self {
            settings_path: config_dir.join(DEFAULT_SETTINGS_FILE),
            inner: Arc::new(settings.normalize()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {path:?}"))?;
        Ok(settings.normalize())
    }

    pub fn settings(&self) -> &Settings {
        &self.inner
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Directory relative settings paths are resolved against.
    pub fn config_dir(&self) -> PathBuf {
        match self.settings_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Absolute path of the configured post-update script, if any.
    pub fn post_update_script(&self) -> Option<PathBuf> {
        let script = expand_home(self.inner.repo.post_update.as_ref()?);
        let script = if script.is_absolute() {
            script
        } else {
            self.config_dir().join(script)
        };
        Some(absolutize(script))
    }
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Canonical form when the path exists, otherwise joined onto the current
/// directory.
pub fn absolutize(path: PathBuf) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}
