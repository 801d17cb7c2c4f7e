use shared::ClientSettings;
use std::env;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_UPSTREAM: &str = "http://localhost:8000/predict/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT: {0:?}")]
    Port(String),
    #[error("Invalid PREDICT_UPSTREAM_URL: {0}")]
    Upstream(#[from] url::ParseError),
}

/// Host settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub port: u16,
    pub frontend_dir: String,
    pub predict_upstream: Url,
    pub demo_fallback: bool,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Port(raw))?,
            None => DEFAULT_PORT,
        };

        let frontend_dir = lookup("FRONTEND_DIR").unwrap_or_else(default_frontend_dir);

        let upstream = lookup("PREDICT_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());
        let predict_upstream = Url::parse(upstream.trim())?;

        let demo_fallback = lookup("DEMO_FALLBACK").as_deref().is_some_and(parse_flag);

        Ok(Self {
            port,
            frontend_dir,
            predict_upstream,
            demo_fallback,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            demo_fallback: self.demo_fallback,
            ..ClientSettings::default()
        }
    }
}

fn default_frontend_dir() -> String {
    match env::var("CARGO_MANIFEST_DIR") {
        Ok(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
        Err(_) => "/usr/src/app/frontend/dist".to_string(),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<HostConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HostConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.predict_upstream.as_str(), DEFAULT_UPSTREAM);
        assert!(!config.demo_fallback);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_demo_fallback_is_opt_in() {
        for (raw, expected) in [("true", true), ("1", true), ("YES", true), ("false", false), ("", false), ("0", false)] {
            let config = config(&[("DEMO_FALLBACK", raw)]).unwrap();
            assert_eq!(config.demo_fallback, expected, "DEMO_FALLBACK={raw:?}");
            assert_eq!(config.client_settings().demo_fallback, expected);
        }
    }

    #[test]
    fn test_client_settings_point_at_relay() {
        let config = config(&[("PREDICT_UPSTREAM_URL", "http://inference:8000/predict/")]).unwrap();
        assert_eq!(config.predict_upstream.host_str(), Some("inference"));
        assert_eq!(config.client_settings().predict_url, "/api/predict");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(config(&[("PORT", "eighty")]), Err(ConfigError::Port(_))));
        assert!(matches!(
            config(&[("PREDICT_UPSTREAM_URL", "not a url")]),
            Err(ConfigError::Upstream(_))
        ));
    }
}
