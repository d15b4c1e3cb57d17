use std::path::Path;

use serde::Deserialize;

use drng::{AttemptBudget, Error};

const DEFAULT_CONFIG_PATH: &str = "/etc/drng.toml";
const MAX_RETRIES: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrngConfig {
    pub retries: u32,
    pub require_hardware: bool,
}

impl Default for DrngConfig {
    fn default() -> Self {
        Self {
            retries: 10,
            require_hardware: true,
        }
    }
}

impl DrngConfig {
    /// Clamp fields to valid ranges.
    pub fn validate(&mut self) {
        self.retries = self.retries.min(MAX_RETRIES);
    }

    pub fn budget(&self) -> AttemptBudget {
        AttemptBudget::retries(self.retries)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub drng: DrngConfig,
}

/// Load configuration from a TOML file.
///
/// - If `explicit_path` is `Some` and the file is missing, returns an error.
/// - If `explicit_path` is `None`, tries `/etc/drng.toml`; if missing, returns defaults.
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, Error> {
    let path = match explicit_path {
        Some(p) => {
            if !p.exists() {
                return Err(Error::InvalidArgs(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p.to_path_buf()
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.exists() {
                return Ok(Config::default());
            }
            default.to_path_buf()
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        Error::InvalidArgs(format!("failed to read config {}: {}", path.display(), e))
    })?;

    toml::from_str(&contents).map_err(|e| {
        Error::InvalidArgs(format!("failed to parse config {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = DrngConfig::default();
        assert_eq!(cfg.retries, 10);
        assert!(cfg.require_hardware);
        assert_eq!(cfg.budget(), AttemptBudget::default());
    }

    #[test]
    fn test_validate_clamps_high() {
        let mut cfg = DrngConfig {
            retries: 5000,
            ..Default::default()
        };
        cfg.validate();
        assert_eq!(cfg.retries, 100);
    }

    #[test]
    fn test_validate_keeps_zero() {
        let mut cfg = DrngConfig {
            retries: 0,
            ..Default::default()
        };
        cfg.validate();
        assert_eq!(cfg.retries, 0);
        assert_eq!(cfg.budget().get(), 0);
    }

    #[test]
    fn test_toml_parsing() {
        let path = std::env::temp_dir().join("drng_test_config.toml");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(
                f,
                r#"
[drng]
retries = 25
"#
            )
            .unwrap();
        }
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.drng.retries, 25);
        // Unset fields should get defaults
        assert!(config.drng.require_hardware);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_toml_parse_error() {
        let path = std::env::temp_dir().join("drng_test_bad_config.toml");
        std::fs::write(&path, "[drng]\nretries = \"many\"\n").unwrap();
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(Error::InvalidArgs(msg)) if msg.contains("parse")));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let path = Path::new("/tmp/drng_nonexistent_config.toml");
        assert!(load_config(Some(path)).is_err());
    }
}
