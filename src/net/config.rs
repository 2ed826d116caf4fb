//! Advisory backend configuration, loaded from environment variables.
//!
//! Required for live answers:
//! - `API_KEY` (or `GEMINI_API_KEY`) -- backend credential
//!
//! Optional:
//! - `PULSAR_MODEL` -- model name (default `gemini-2.5-flash`)
//! - `PULSAR_API_URL` -- API base URL
//! - `PULSAR_TIMEOUT_SECS` -- per-request timeout in seconds
//!
//! A missing credential is not a startup failure; the advisor degrades to
//! fallback strings.

use std::time::Duration;

use url::Url;

use super::error::AdvisorError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for [`GeminiAdvisor`](super::advisor::GeminiAdvisor).
#[derive(Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    /// Base URL, validated as http(s) when loaded.
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AdvisorConfig {
    /// Load from the process environment.
    ///
    /// Invalid optional values are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` as the variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        config.api_key = non_blank("API_KEY").or_else(|| non_blank("GEMINI_API_KEY"));

        if let Some(model) = non_blank("PULSAR_MODEL") {
            config.model = model;
        }

        if let Some(raw) = non_blank("PULSAR_API_URL") {
            match parse_api_url(&raw) {
                Ok(url) => config.api_url = url.to_string(),
                Err(e) => log::error!("{}; using {}", e, DEFAULT_API_URL),
            }
        }

        if let Some(raw) = non_blank("PULSAR_TIMEOUT_SECS") {
            match parse_timeout(&raw) {
                Ok(timeout) => config.timeout = timeout,
                Err(e) => log::error!("{}; using {}s", e, DEFAULT_TIMEOUT.as_secs()),
            }
        }

        config
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint for a model method, e.g. `generateContent`.
    pub fn endpoint(&self, method: &str) -> Result<Url, AdvisorError> {
        let base = self.api_url.trim_end_matches('/');
        Url::parse(&format!("{}/models/{}:{}", base, self.model, method))
            .map_err(|e| AdvisorError::Config(format!("invalid endpoint: {}", e)))
    }
}

fn parse_api_url(raw: &str) -> Result<Url, AdvisorError> {
    let url = Url::parse(raw)
        .map_err(|e| AdvisorError::Config(format!("PULSAR_API_URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AdvisorError::Config(format!(
            "PULSAR_API_URL: unsupported scheme {}",
            other
        ))),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, AdvisorError> {
    let secs: u64 = raw
        .parse()
        .map_err(|_| AdvisorError::Config(format!("PULSAR_TIMEOUT_SECS: not a number: {}", raw)))?;
    if secs == 0 {
        return Err(AdvisorError::Config(
            "PULSAR_TIMEOUT_SECS: must be positive".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AdvisorConfig::from_lookup(lookup(&[]));
        assert!(!config.has_credential());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn blank_key_is_missing() {
        let config = AdvisorConfig::from_lookup(lookup(&[("API_KEY", "   ")]));
        assert!(!config.has_credential());
    }

    #[test]
    fn alias_key_is_accepted() {
        let config = AdvisorConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k2")]));
        assert_eq!(config.api_key.as_deref(), Some("k2"));
        let config =
            AdvisorConfig::from_lookup(lookup(&[("API_KEY", "k1"), ("GEMINI_API_KEY", "k2")]));
        assert_eq!(config.api_key.as_deref(), Some("k1"));
    }

    #[test]
    fn invalid_optional_values_fall_back() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            ("PULSAR_API_URL", "ftp://example.com"),
            ("PULSAR_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn endpoint_joins_model_and_method() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            ("PULSAR_API_URL", "http://localhost:8080/v1/"),
            ("PULSAR_MODEL", "test-model"),
        ]));
        let url = config.endpoint("generateContent").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/models/test-model:generateContent"
        );
    }

    #[test]
    fn debug_redacts_key() {
        let config = AdvisorConfig::from_lookup(lookup(&[("API_KEY", "secret")]));
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("secret"));
    }
}
