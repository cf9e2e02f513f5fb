//! Server configuration from the environment.

use std::net::SocketAddr;

/// Environment variable holding the bind address.
pub const LISTEN_ADDR_VAR: &str = "TOPUP_LISTEN_ADDR";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOPUP_LISTEN_ADDR '{value}': {source}")]
    InvalidListenAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = lookup(LISTEN_ADDR_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidListenAddr { value, source })?;
        Ok(Self { listen_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listen_addr() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn listen_addr_from_env() {
        let config = Config::from_lookup(|key| {
            (key == LISTEN_ADDR_VAR).then(|| "127.0.0.1:9000".to_string())
        })
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
    }

    #[test]
    fn invalid_listen_addr() {
        let err = Config::from_lookup(|_| Some("not-an-addr".into())).unwrap_err();
        assert!(err.to_string().contains("TOPUP_LISTEN_ADDR"));
    }
}
