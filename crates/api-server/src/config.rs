//! Server configuration read from the environment

use std::path::PathBuf;

use gpts_core::telemetry::{TelemetryConfig, DEFAULT_ENDPOINT};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8100;
pub const DEFAULT_RUNTIME_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub runtime_url: String,
    /// `None` when tracing is disabled; the feedback route is then not served
    pub telemetry: Option<TelemetryConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = std::env::var("GPTS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".gpts-data"));

        let port = match std::env::var("GPTS_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "GPTS_PORT",
                value: raw,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let runtime_url = env_string("AGENT_RUNTIME_URL")
            .unwrap_or_else(|| DEFAULT_RUNTIME_URL.to_string());

        let telemetry = tracing_is_enabled().then(|| TelemetryConfig {
            endpoint: env_string("LANGCHAIN_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: env_string("LANGCHAIN_API_KEY"),
        });

        Ok(Self {
            data_dir,
            port,
            runtime_url,
            telemetry,
        })
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

pub fn tracing_is_enabled() -> bool {
    env_flag("LANGCHAIN_TRACING_V2", false) || env_flag("LANGSMITH_TRACING", false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_flag_parses_common_spellings() {
        std::env::set_var("GPTS_TEST_FLAG_ON", " Yes ");
        std::env::set_var("GPTS_TEST_FLAG_OFF", "0");
        std::env::set_var("GPTS_TEST_FLAG_JUNK", "maybe");

        assert!(env_flag("GPTS_TEST_FLAG_ON", false));
        assert!(!env_flag("GPTS_TEST_FLAG_OFF", true));
        assert!(env_flag("GPTS_TEST_FLAG_JUNK", true));
        assert!(!env_flag("GPTS_TEST_FLAG_UNSET", false));
    }

    #[test]
    fn env_string_ignores_blank_values() {
        std::env::set_var("GPTS_TEST_BLANK", "   ");
        std::env::set_var("GPTS_TEST_VALUE", " http://runtime:9000 ");

        assert_eq!(env_string("GPTS_TEST_BLANK"), None);
        assert_eq!(
            env_string("GPTS_TEST_VALUE").as_deref(),
            Some("http://runtime:9000")
        );
    }
}
