use std::fmt;

use log::LevelFilter;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// localStorage key holding the serialized history.
pub const HISTORY_KEY: &str = "quiz_app_history_v1";

/// Older results beyond this many are dropped on save.
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Settings baked into the bundle at build time. The browser has no process
/// environment, so everything comes from `option_env!`.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub log_level: LevelFilter,
    pub history_key: String,
    pub history_cap: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_level: LevelFilter::Info,
            history_key: HISTORY_KEY.to_string(),
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("log_level", &self.log_level)
            .field("history_key", &self.history_key)
            .field("history_cap", &self.history_cap)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("GEMINI_API_KEY"),
            option_env!("QUIZ_MODEL"),
            option_env!("QUIZ_API_ENDPOINT"),
            option_env!("QUIZ_LOG_LEVEL"),
        )
    }

    fn from_values(
        api_key: Option<&str>,
        model: Option<&str>,
        endpoint: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let defaults = AppConfig::default();

        AppConfig {
            api_key: non_empty(api_key).map(str::to_string),
            model: non_empty(model).map_or(defaults.model, str::to_string),
            endpoint: non_empty(endpoint)
                .map_or(defaults.endpoint, |e| e.trim_end_matches('/').to_string()),
            log_level: non_empty(log_level)
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.log_level),
            ..defaults
        }
    }

    pub fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = AppConfig::from_values(Some("  "), None, Some(""), Some("nonsense"));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_values(
            Some("secret"),
            Some("gemini-2.0-flash"),
            Some("http://localhost:8080/v1/"),
            Some("debug"),
        );
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.log_level, LevelFilter::Debug);
        assert_eq!(
            cfg.generate_url("secret"),
            "http://localhost:8080/v1/models/gemini-2.0-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let cfg = AppConfig::from_values(Some("AIza-very-secret"), None, None, None);
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("AIza-very-secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("gemini-2.5-flash"));

        let printed = format!("{:?}", AppConfig::default());
        assert!(printed.contains("api_key: None"));
    }
}
