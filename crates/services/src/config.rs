use std::env;
use std::str::FromStr;
use std::time::Duration;

use skill_core::player::{CompletionPolicy, DEFAULT_COMPLETION_THRESHOLD};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_OAUTH_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CELEBRATION_SECS: u64 = 3;

/// Client settings read from `SKILLS_*` environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub oauth_timeout: Duration,
    pub completion: CompletionPolicy,
    pub celebration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Missing keys use the
    /// defaults; unparsable values are logged and replaced by the default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup("SKILLS_API_BASE_URL")
            .and_then(|raw| match parse_base_url(&raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    tracing::warn!(value = %raw, error = %err, "invalid SKILLS_API_BASE_URL, using default");
                    None
                }
            })
            .unwrap_or_else(default_base_url);

        let secs = |key: &str, default: u64| -> Duration {
            Duration::from_secs(parse_or(&lookup, key, default).max(1))
        };

        let threshold = parse_or(&lookup, "SKILLS_COMPLETION_THRESHOLD", DEFAULT_COMPLETION_THRESHOLD);
        let completion = CompletionPolicy::new(threshold);
        if (completion.threshold_percent() - threshold).abs() > f64::EPSILON {
            tracing::warn!(threshold, "completion threshold outside (0, 100], using default");
        }

        Self {
            api_base_url,
            request_timeout: secs("SKILLS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            oauth_timeout: secs("SKILLS_OAUTH_TIMEOUT_SECS", DEFAULT_OAUTH_TIMEOUT_SECS),
            completion,
            celebration: secs("SKILLS_CELEBRATION_SECS", DEFAULT_CELEBRATION_SECS),
        }
    }

    /// Replace the API base URL, e.g. from a command-line flag.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `raw` is not an absolute URL.
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, url::ParseError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }
}

/// Relative endpoint paths are joined onto the base, so it must end in `/`.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

fn default_base_url() -> Url {
    parse_base_url(DEFAULT_API_BASE_URL).expect("default base url should be valid")
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, %default, "invalid config value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.oauth_timeout, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.celebration, Duration::from_secs(3));
        assert!((config.completion.threshold_percent() - 99.5).abs() < f64::EPSILON);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SKILLS_API_BASE_URL", "https://skills.example.com/backend"),
            ("SKILLS_OAUTH_TIMEOUT_SECS", "60"),
            ("SKILLS_COMPLETION_THRESHOLD", "90"),
        ]));
        assert_eq!(
            config.api_base_url.as_str(),
            "https://skills.example.com/backend/"
        );
        assert_eq!(config.oauth_timeout, Duration::from_secs(60));
        assert!(config.completion.is_eligible(90.0));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SKILLS_API_BASE_URL", "not a url"),
            ("SKILLS_OAUTH_TIMEOUT_SECS", "soon"),
            ("SKILLS_COMPLETION_THRESHOLD", "250"),
        ]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn base_url_override_keeps_trailing_slash() {
        let config = ClientConfig::default()
            .with_api_base_url("http://10.0.0.2:9000")
            .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://10.0.0.2:9000/");
        assert!(ClientConfig::default().with_api_base_url("relative/path").is_err());
    }
}
