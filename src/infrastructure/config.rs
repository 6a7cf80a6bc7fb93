use crate::domain::stats::ALL_LOCALES;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub cards: CardSettings,
    /// Selectable locales, in display order. The "all" option is implicit.
    #[serde(default)]
    pub locales: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardSettings {
    #[serde(default = "default_initial_width")]
    pub initial_width: f64,
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

impl CardSettings {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            initial_width: default_initial_width(),
            ready_timeout_ms: default_ready_timeout_ms(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_api_timeout_ms() -> u64 {
    10_000
}

fn default_initial_width() -> f64 {
    600.0
}

fn default_ready_timeout_ms() -> u64 {
    5_000
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if !self.cards.initial_width.is_finite() || self.cards.initial_width < 0.0 {
            anyhow::bail!("cards.initial_width must be a non-negative number");
        }
        for locale in &self.locales {
            if locale.is_empty() || locale == ALL_LOCALES {
                anyhow::bail!("invalid locale in locales list: {:?}", locale);
            }
        }
        Ok(())
    }
}

/// `config/dashboard.toml` (optional) overlaid by `VOICE_STATS__*` environment variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_with_environment(environment())
}

/// `VOICE_STATS__API__BASE_URL` maps to `api.base_url`; `locales` is a comma list
fn environment() -> config::Environment {
    config::Environment::with_prefix("VOICE_STATS")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("locales")
        .try_parsing(true)
}

fn load_with_environment(environment: config::Environment) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment)
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> anyhow::Result<DashboardConfig> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [api]
            base_url = "https://voice.example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.cards.initial_width, 600.0);
        assert_eq!(config.cards.ready_timeout(), Duration::from_secs(5));
        assert!(config.locales.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = from_toml(
            r#"
            locales = ["en", "de", "fr"]

            [server]
            listen = "127.0.0.1:3000"

            [api]
            base_url = "http://localhost:9000"
            timeout_ms = 250

            [cards]
            initial_width = 800.0
            ready_timeout_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen, "127.0.0.1:3000");
        assert_eq!(config.api.timeout_ms, 250);
        assert_eq!(config.cards.initial_width, 800.0);
        assert_eq!(config.locales, vec!["en", "de", "fr"]);
    }

    #[test]
    fn test_validate_rejects_all_sentinel() {
        let mut config = from_toml(
            r#"
            [api]
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();
        config.locales = vec!["en".to_string(), "all".to_string()];
        assert!(config.validate().is_err());
    }

    fn env_overlay(vars: &[(&str, &str)]) -> config::Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<config::Map<_, _>>();
        environment().source(Some(vars))
    }

    #[test]
    fn test_environment_overlay() {
        let config = load_with_environment(env_overlay(&[
            ("VOICE_STATS__API__BASE_URL", "http://stats.internal:9000"),
            ("VOICE_STATS__API__TIMEOUT_MS", "1500"),
            ("VOICE_STATS__LOCALES", "en,de"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url, "http://stats.internal:9000");
        assert_eq!(config.api.timeout(), Duration::from_millis(1500));
        assert_eq!(config.locales, vec!["en", "de"]);
    }

    #[test]
    fn test_environment_overlay_rejects_all_sentinel() {
        let result = load_with_environment(env_overlay(&[
            ("VOICE_STATS__API__BASE_URL", "http://stats.internal:9000"),
            ("VOICE_STATS__LOCALES", "en,all"),
        ]));
        let error = result.unwrap_err();
        assert!(error.to_string().contains("invalid locale"));
    }

    #[test]
    fn test_missing_api_section_fails() {
        assert!(from_toml("locales = []").is_err());
    }
}
