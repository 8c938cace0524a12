use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Process configuration, read once at start-up.
///
/// The API key is not in here; the gateway looks it up per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub api_base: String,
    pub image_model: String,
    pub text_model: String,
    pub progress_tick: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-3-flash-preview".to_string(),
            progress_tick: Duration::from_millis(1200),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value lookup. Unset keys keep their default;
    /// unparsable values are logged and also keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            bind: parsed(&lookup, "SUJIT_BIND", defaults.bind),
            api_base: text("GEMINI_API_BASE", defaults.api_base),
            image_model: text("GEMINI_IMAGE_MODEL", defaults.image_model),
            text_model: text("GEMINI_TEXT_MODEL", defaults.text_model),
            progress_tick: Duration::from_millis(
                parsed::<u64>(&lookup, "SUJIT_PROGRESS_TICK_MS", 1200).max(1),
            ),
            max_upload_bytes: parsed::<usize>(&lookup, "SUJIT_MAX_UPLOAD_MB", 25)
                .saturating_mul(1024 * 1024),
        }
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, ?default, "ignoring invalid setting");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_pairs(&[]);
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.text_model, "gemini-3-flash-preview");
        assert_eq!(config.progress_tick, Duration::from_millis(1200));
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_pairs(&[
            ("SUJIT_BIND", "127.0.0.1:8080"),
            ("GEMINI_IMAGE_MODEL", "gemini-3-pro-image-preview"),
            ("SUJIT_PROGRESS_TICK_MS", "250"),
            ("SUJIT_MAX_UPLOAD_MB", "5"),
        ]);
        assert_eq!(config.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.image_model, "gemini-3-pro-image-preview");
        assert_eq!(config.progress_tick, Duration::from_millis(250));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = from_pairs(&[
            ("SUJIT_BIND", "not an address"),
            ("SUJIT_PROGRESS_TICK_MS", "soon"),
            ("GEMINI_TEXT_MODEL", "   "),
        ]);
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.progress_tick, Duration::from_millis(1200));
        assert_eq!(config.text_model, "gemini-3-flash-preview");
    }
}
