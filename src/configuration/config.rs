#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::BoaError;
use crate::domain::models::Endpoint;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    Endpoint,
    RequestTimeout,
    UserAgent,
}

impl ConfigKey {
    /// Environment variable that overrides the key, e.g. `BOA_REQUEST_TIMEOUT`.
    pub fn env_var(&self) -> String {
        return format!("BOA_{}", self.to_string().replace('-', "_").to_uppercase());
    }

    fn description(&self) -> &'static str {
        match self {
            ConfigKey::ConfigFile => return "Path to this file.",
            ConfigKey::Endpoint => {
                return "Boa API endpoint, either a deployment name (boa, boac) or a full URL."
            }
            ConfigKey::RequestTimeout => {
                return "Timeout in milliseconds for each API request. Empty or 0 waits indefinitely."
            }
            ConfigKey::UserAgent => return "User agent sent with every request.",
        }
    }
}

pub struct Config {}

impl Config {
    /// Current value of `key`, or its default when nothing was loaded.
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return Config::default(key);
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ConfigFile => {
                return dirs::config_dir()
                    .unwrap_or_else(|| return path::PathBuf::from("."))
                    .join("boa/config.toml")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::Endpoint => return "boa".to_string(),
            ConfigKey::RequestTimeout => return "".to_string(),
            ConfigKey::UserAgent => {
                return format!("boa-api-client/{}", env!("CARGO_PKG_VERSION"));
            }
        }
    }

    fn validate(key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::Endpoint => {
                if Endpoint::parse(value).is_none() {
                    bail!(format!(
                        "Invalid value for '{key}': {value}\nExpected boa, boac or an http(s) URL"
                    ));
                }
            }
            ConfigKey::RequestTimeout => {
                if !value.is_empty() && value.parse::<u64>().is_err() {
                    bail!(format!(
                        "Invalid value for '{key}': {value}\nExpected a number of milliseconds"
                    ));
                }
            }
            ConfigKey::ConfigFile | ConfigKey::UserAgent => {}
        }

        return Ok(());
    }

    /// Resolves every key from, in increasing precedence: defaults, the TOML
    /// config file, then `BOA_*` environment variables. Nothing is stored
    /// unless every value validates.
    pub async fn load(config_file: Option<path::PathBuf>) -> Result<()> {
        let mut values: Vec<(ConfigKey, String)> = ConfigKey::iter()
            .map(|key| return (key, Config::default(key)))
            .collect();

        let config_path = match config_file {
            Some(config_path) => config_path,
            None => match env::var(ConfigKey::ConfigFile.env_var()) {
                Ok(val) if !val.is_empty() => path::PathBuf::from(val),
                _ => path::PathBuf::from(Config::default(ConfigKey::ConfigFile)),
            },
        };

        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for (key, value) in values.iter_mut() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        *value = val_int.to_string();
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        *value = val_str.to_string();
                    } else {
                        bail!(format!(
                            "{} has an invalid value for key '{key}'",
                            config_path.to_string_lossy()
                        ));
                    }
                }
            }
        }

        for (key, value) in values.iter_mut() {
            if let Ok(val) = env::var(key.env_var()) {
                if val.is_empty() {
                    continue;
                }
                *value = val;
            }
        }

        for (key, value) in values.iter_mut() {
            if *key == ConfigKey::ConfigFile {
                *value = config_path.to_string_lossy().to_string();
            }
            Config::validate(*key, value)?;
        }

        for (key, value) in values {
            Config::set(key, &value);
        }

        tracing::debug!(
            endpoint = %Config::get(ConfigKey::Endpoint),
            request_timeout = %Config::get(ConfigKey::RequestTimeout),
            user_agent = %Config::get(ConfigKey::UserAgent),
            "config"
        );

        return Ok(());
    }

    pub fn endpoint() -> Result<Endpoint, BoaError> {
        let val = Config::get(ConfigKey::Endpoint);
        return Endpoint::parse(&val)
            .ok_or_else(|| return BoaError::Config(format!("Invalid endpoint '{val}'")));
    }

    pub fn request_timeout() -> Result<Option<Duration>, BoaError> {
        let val = Config::get(ConfigKey::RequestTimeout);
        if val.is_empty() {
            return Ok(None);
        }

        let millis = val
            .parse::<u64>()
            .map_err(|_| return BoaError::Config(format!("Invalid request timeout '{val}'")))?;
        if millis == 0 {
            return Ok(None);
        }

        return Ok(Some(Duration::from_millis(millis)));
    }

    /// Renders a commented config file holding every default.
    pub fn serialize_default() -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let description = key.description();
                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
