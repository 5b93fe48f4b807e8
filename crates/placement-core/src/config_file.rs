use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::DEFAULT_BATCH_SIZE;

const APP_DIR: &str = "placement-tracker";
const CWD_CONFIG: &str = ".placement-tracker.toml";

pub const ENV_API_URL: &str = "PLACEMENT_API_URL";
pub const ENV_ADMIN_TOKEN: &str = "PLACEMENT_ADMIN_TOKEN";
pub const ENV_TIMEOUT: &str = "PLACEMENT_TIMEOUT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub batch_size: Option<u32>,
}

/// Platform config directory path: `<config_dir>/placement-tracker/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Load config by cascading CWD `.placement-tracker.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(CWD_CONFIG));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Read one config file. Missing files are silent; unparsable ones are
/// logged and skipped.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_api = base.api.unwrap_or_default();
    let overlay_api = overlay.api.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let overlay_display = overlay.display.unwrap_or_default();

    ConfigFile {
        api: Some(ApiConfig {
            base_url: overlay_api.base_url.or(base_api.base_url),
            timeout_secs: overlay_api.timeout_secs.or(base_api.timeout_secs),
        }),
        display: Some(DisplayConfig {
            theme: overlay_display.theme.or(base_display.theme),
            batch_size: overlay_display.batch_size.or(base_display.batch_size),
        }),
    }
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(io_err)
}

/// Effective settings after layering defaults, config file and environment.
/// Command-line flags are applied by the binaries on top of this.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub theme: String,
    pub batch_size: u32,
    /// Token from the environment only; the token store is consulted separately.
    pub admin_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            theme: "hacker".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            admin_token: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with the loaded config file and process environment.
    pub fn resolve(file_cfg: &ConfigFile) -> Self {
        let mut settings = Self::default();
        settings.apply_file(file_cfg);
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Only sets values that are `Some` (and non-empty) in the file config.
    pub fn apply_file(&mut self, file_cfg: &ConfigFile) {
        if let Some(api) = &file_cfg.api {
            if let Some(url) = api.base_url.as_deref().filter(|u| !u.is_empty()) {
                self.api_url = url.to_string();
            }
            if let Some(secs) = api.timeout_secs {
                self.timeout = Duration::from_secs(secs.max(1));
            }
        }
        if let Some(display) = &file_cfg.display {
            if let Some(theme) = display.theme.as_deref().filter(|t| !t.is_empty()) {
                self.theme = theme.to_string();
            }
            if let Some(size) = display.batch_size {
                self.batch_size = size.max(1);
            }
        }
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(secs) = var(ENV_TIMEOUT).and_then(|v| v.parse::<u64>().ok()) {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(token) = var(ENV_ADMIN_TOKEN).filter(|v| !v.is_empty()) {
            self.admin_token = Some(token);
        }
    }

    /// Convert back into a `ConfigFile` for saving. The token is never written.
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            api: Some(ApiConfig {
                base_url: Some(self.api_url.clone()),
                timeout_secs: Some(self.timeout.as_secs()),
            }),
            display: Some(DisplayConfig {
                theme: Some(self.theme.clone()),
                batch_size: Some(self.batch_size),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let cfg: ConfigFile = toml::from_str("[display]\ntheme = \"modern\"\n").unwrap();
        assert!(cfg.api.is_none());
        assert_eq!(cfg.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://base/api".into()),
                timeout_secs: Some(30),
            }),
            display: None,
        };
        let overlay = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://cwd/api".into()),
                timeout_secs: None,
            }),
            display: Some(DisplayConfig {
                theme: Some("modern".into()),
                batch_size: None,
            }),
        };
        let merged = merge(base, overlay);
        let api = merged.api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://cwd/api"));
        assert_eq!(api.timeout_secs, Some(30));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Settings::default().to_config_file();
        save_to_path(&cfg, &path).unwrap();
        assert_eq!(load_from_path(&path), Some(cfg));
    }

    #[test]
    fn garbage_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert_eq!(load_from_path(&path), None);
        assert_eq!(load_from_path(&dir.path().join("missing.toml")), None);
    }

    #[test]
    fn env_overrides_file() {
        let file_cfg = ConfigFile {
            api: Some(ApiConfig {
                base_url: Some("http://file/api".into()),
                timeout_secs: Some(5),
            }),
            display: Some(DisplayConfig {
                theme: Some("modern".into()),
                batch_size: Some(0),
            }),
        };
        let mut settings = Settings::default();
        settings.apply_file(&file_cfg);
        assert_eq!(settings.api_url, "http://file/api");
        assert_eq!(settings.batch_size, 1);

        settings.apply_env(|key| match key {
            ENV_API_URL => Some("http://env/api".to_string()),
            ENV_TIMEOUT => Some("not-a-number".to_string()),
            ENV_ADMIN_TOKEN => Some(String::new()),
            _ => None,
        });
        assert_eq!(settings.api_url, "http://env/api");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.admin_token, None);
        assert_eq!(settings.theme, "modern");
    }
}
