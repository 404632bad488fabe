use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,
    pub admin: AdminConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON snapshot of the business collection. Without one the store is memory-only.
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    #[serde(default = "default_cors_allow_any")]
    pub cors_allow_any: bool,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: None,
            cors_allow_any: default_cors_allow_any(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfiguration {
    pub email: String,
    pub password: SecretString,
    pub jwt_secret: SecretString,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_allow_any() -> bool {
    true
}

fn default_token_ttl() -> u64 {
    3600
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder = builder
            .add_source(config::Environment::with_prefix("DIRECTORY_SERVER").separator("__"));

        builder.build()?.try_deserialize()
    }
}
