use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";
const MAX_NAME_LEN: usize = 20;
// Smallest field every game can spawn and steer in; NaN is rejected too.
const MIN_FIELD: f64 = 120.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid player name {0:?}: use 1-20 letters, digits, spaces, '_' or '-'")]
    PlayerName(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{0} is {1}; the field must be at least 120 units")]
    FieldTooSmall(&'static str, f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub name: String,
    /// Overrides the platform cache directory.
    pub dir: Option<PathBuf>,
    pub assets: Vec<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "retrogm-cache-v1".to_string(),
            dir: None,
            assets: vec!["/".to_string(), "/static/style.css".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player_name: Option<String>,
    pub server_url: String,
    pub submit_scores: bool,
    pub tick_rate_ms: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub field: FieldConfig,
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: None,
            server_url: "http://127.0.0.1:5000".to_string(),
            submit_scores: true,
            tick_rate_ms: 16,
            log_level: "info".to_string(),
            log_file: None,
            field: FieldConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Loads from `path`, or from the default location when `None`. A missing
    /// default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        if !required && !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.player_name {
            validate_player_name(name)?;
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::Zero("tick_rate_ms"));
        }
        if !(self.field.width >= MIN_FIELD) {
            return Err(ConfigError::FieldTooSmall("field.width", self.field.width));
        }
        if !(self.field.height >= MIN_FIELD) {
            return Err(ConfigError::FieldTooSmall("field.height", self.field.height));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("retroarcade")
                .join("retroarcade.log")
        })
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("retroarcade").join(CONFIG_FILE))
}

/// Player names are 1-20 characters of letters, digits, space, '_' or '-'.
pub fn validate_player_name(name: &str) -> Result<(), ConfigError> {
    let len = name.chars().count();
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '_' || c == '-');
    if len == 0 || len > MAX_NAME_LEN || !allowed {
        return Err(ConfigError::PlayerName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tick_rate_ms, 16);
        assert!(config.submit_scores);
        assert_eq!(config.cache.name, "retrogm-cache-v1");
        assert_eq!(config.cache.assets, vec!["/", "/static/style.css"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            player_name = "ada"
            server_url = "http://arcade.local"

            [field]
            width = 640.0
            "#,
        )
        .unwrap();
        assert_eq!(config.player_name.as_deref(), Some("ada"));
        assert_eq!(config.server_url, "http://arcade.local");
        assert_eq!(config.field.width, 640.0);
        assert_eq!(config.field.height, 600.0);
        assert_eq!(config.tick_rate_ms, 16);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_ms = 33\nsubmit_scores = false").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.tick_rate_ms, 33);
        assert!(!config.submit_scores);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_ms = 0").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Zero("tick_rate_ms"))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "player_name = \"bad!name\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::PlayerName(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_rate_ms = \"fast\"").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_field_must_fit_the_games() {
        let mut config = Config::default();
        config.field.height = 35.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FieldTooSmall("field.height", _))
        ));
        config.field.height = 120.0;
        assert!(config.validate().is_ok());
        config.field.width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FieldTooSmall("field.width", _))
        ));
    }

    #[test]
    fn test_player_names() {
        assert!(validate_player_name("Player_1").is_ok());
        assert!(validate_player_name("a b-c").is_ok());
        assert!(validate_player_name(&"x".repeat(20)).is_ok());
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name(&"x".repeat(21)).is_err());
        assert!(validate_player_name("name!").is_err());
        assert!(validate_player_name("émile").is_err());
    }
}
