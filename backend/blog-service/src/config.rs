use crate::error::{AppError, Result};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // gRPC server config
    pub grpc_host: String,
    pub grpc_port: u16,
    pub enable_reflection: bool,

    // Observability
    pub log_format: LogFormat,

    // Lifecycle
    pub shutdown_grace_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("grpc_host", "0.0.0.0")?
            .set_default("grpc_port", 50051)?
            .set_default("enable_reflection", true)?
            .set_default("log_format", "pretty")?
            .set_default("shutdown_grace_seconds", 5)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grpc_port == 0 {
            return Err(AppError::Configuration(
                "gRPC port must be greater than 0".into(),
            ));
        }

        if self.grpc_host.is_empty() {
            return Err(AppError::Configuration("gRPC host is required".into()));
        }

        if self.shutdown_grace_seconds > 300 {
            return Err(AppError::Configuration(
                "Shutdown grace period must be at most 300 seconds".into(),
            ));
        }

        Ok(())
    }

    pub fn grpc_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.grpc_host, self.grpc_port)
            .parse()
            .map_err(|e| {
                AppError::Configuration(format!(
                    "Invalid gRPC address {}:{}: {}",
                    self.grpc_host, self.grpc_port, e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: [&str; 5] = [
        "GRPC_HOST",
        "GRPC_PORT",
        "ENABLE_REFLECTION",
        "LOG_FORMAT",
        "SHUTDOWN_GRACE_SECONDS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn valid_config() -> Config {
        Config {
            grpc_host: "0.0.0.0".to_string(),
            grpc_port: 50051,
            enable_reflection: true,
            log_format: LogFormat::Pretty,
            shutdown_grace_seconds: 5,
        }
    }

    #[test]
    fn test_config_validation() {
        let config = valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.grpc_addr().unwrap(),
            "0.0.0.0:50051".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_port() {
        let mut config = valid_config();
        config.grpc_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_grace_period() {
        let mut config = valid_config();
        config.shutdown_grace_seconds = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_host() {
        let mut config = valid_config();
        config.grpc_host = "not a host".to_string();
        assert!(matches!(
            config.grpc_addr(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert!(serde_json::from_str::<LogFormat>("\"xml\"").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.grpc_host, "0.0.0.0");
        assert_eq!(config.grpc_port, 50051);
        assert!(config.enable_reflection);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.shutdown_grace_seconds, 5);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("GRPC_HOST", "127.0.0.1");
        std::env::set_var("GRPC_PORT", "6000");
        std::env::set_var("ENABLE_REFLECTION", "false");
        std::env::set_var("LOG_FORMAT", "json");
        std::env::set_var("SHUTDOWN_GRACE_SECONDS", "30");

        let config = Config::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.grpc_host, "127.0.0.1");
        assert_eq!(config.grpc_port, 6000);
        assert!(!config.enable_reflection);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.shutdown_grace_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_log_format() {
        clear_env();
        std::env::set_var("LOG_FORMAT", "xml");

        let result = Config::from_env();
        clear_env();

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
