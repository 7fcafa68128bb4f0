//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub bus: BusConfig,
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Message bus subscription configuration.
///
/// The URL and topic list are fixed at process startup; the relay never
/// renegotiates its subscription at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    #[serde(default = "default_bus_url")]
    pub url: String,

    #[serde(default = "default_topics")]
    pub topics: Vec<String>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            url: default_bus_url(),
            topics: default_topics(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_bus_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_topics() -> Vec<String> {
    vec!["events-updates".to_string(), "scores-updates".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.bus.url, "redis://127.0.0.1:6379");
        assert_eq!(config.bus.topics, vec!["events-updates", "scores-updates"]);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bus]
            url = "redis://bus.internal:6379"
        "#,
        )
        .unwrap();
        assert_eq!(config.bus.url, "redis://bus.internal:6379");
        assert_eq!(config.bus.topics.len(), 2);
        assert_eq!(config.server.port, 3001);
    }
}
