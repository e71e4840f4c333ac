use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub openai_api_key: String,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_surrealdb_address")]
    pub surrealdb_address: String,
    #[serde(default = "default_surrealdb_credential")]
    pub surrealdb_username: String,
    #[serde(default = "default_surrealdb_credential")]
    pub surrealdb_password: String,
    #[serde(default = "default_surrealdb_name")]
    pub surrealdb_namespace: String,
    #[serde(default = "default_surrealdb_name")]
    pub surrealdb_database: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Embedded file-backed engine, so a fresh checkout runs without a database server.
fn default_surrealdb_address() -> String {
    "surrealkv://data/concept-mapper".to_string()
}

fn default_surrealdb_credential() -> String {
    "root".to_string()
}

fn default_surrealdb_name() -> String {
    "concept_mapper".to_string()
}

const fn default_http_port() -> u16 {
    5000
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = Config::builder()
            .set_override("openai_api_key", "sk-test")
            .expect("override")
            .build()
            .expect("build config")
            .try_deserialize()
            .expect("deserialize config");

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.surrealdb_address, "surrealkv://data/concept-mapper");
        assert_eq!(config.surrealdb_namespace, "concept_mapper");
        assert_eq!(config.http_port, 5000);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result: Result<AppConfig, ConfigError> = Config::builder()
            .set_override("http_port", 8080)
            .expect("override")
            .build()
            .expect("build config")
            .try_deserialize();

        assert!(result.is_err());
    }
}
