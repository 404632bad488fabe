use config::{Config, ConfigError, File};
use directory_api::{CITY_DATASET_URL, CITY_RESOURCE_ID, DEFAULT_BASE_URL};
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a valid HTTP(S) URL")]
    NotHttp(&'static str),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_city_dataset_url")]
    pub city_dataset_url: String,
    #[serde(default = "default_city_resource_id")]
    pub city_resource_id: String,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_city_dataset_url() -> String {
    CITY_DATASET_URL.to_string()
}

fn default_city_resource_id() -> String {
    CITY_RESOURCE_ID.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            city_dataset_url: default_city_dataset_url(),
            city_resource_id: default_city_resource_id(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("DIRECTORY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("DIRECTORY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, url) in [
            ("api_url", &self.api_url),
            ("city_dataset_url", &self.city_dataset_url),
        ] {
            if url.is_empty() {
                return Err(SettingsError::Missing(name));
            }
            if !url.starts_with("http") {
                return Err(SettingsError::NotHttp(name));
            }
        }
        if self.city_resource_id.trim().is_empty() {
            return Err(SettingsError::Missing("city_resource_id"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "http://localhost:5000/api");
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let settings = Settings {
            api_url: "localhost:5000".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::NotHttp("api_url")));

        let settings = Settings {
            city_dataset_url: String::new(),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::Missing("city_dataset_url"))
        );
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.toml");
        std::fs::write(&path, "api_url = \"http://directory.local/api\"\n").unwrap();

        let settings: Settings = Config::builder()
            .add_source(File::from(path))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.api_url, "http://directory.local/api");
        assert_eq!(settings.city_resource_id, CITY_RESOURCE_ID);
    }
}
