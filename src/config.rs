use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub geocode: ProviderConfig,
    pub weather: ProviderConfig,
    pub events: ProviderConfig,
    pub movies: ProviderConfig,
}

#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url =
            var("DATABASE_URL").unwrap_or_else(|| "sqlite://cityscope.db?mode=rwc".to_string());

        let provider = |key: &str, base_var: &str, default_base: &str| ProviderConfig {
            api_key: var(key).unwrap_or_default(),
            base_url: var(base_var).unwrap_or_else(|| default_base.to_string()),
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            geocode: provider(
                "GOOGLE_MAPS_API_KEY",
                "GEOCODE_BASE_URL",
                "https://maps.googleapis.com/maps/api",
            ),
            weather: provider("DARKSKY_KEY", "WEATHER_BASE_URL", "https://api.darksky.net"),
            events: provider(
                "EVENTBRITE_KEY",
                "EVENTS_BASE_URL",
                "https://www.eventbriteapi.com/v3",
            ),
            movies: provider("MOVIE_API_KEY", "MOVIES_BASE_URL", "https://api.themoviedb.org/3"),
        })
    }

    /// Names of the providers started without an API key.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            ("geocode", &self.geocode),
            ("weather", &self.weather),
            ("events", &self.events),
            ("movies", &self.movies),
        ]
        .into_iter()
        .filter(|(_, p)| p.api_key.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.database_url, "sqlite://cityscope.db?mode=rwc");
        assert_eq!(config.movies.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.missing_keys(), vec!["geocode", "weather", "events", "movies"]);
    }

    #[test]
    fn reads_provider_keys_and_port() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("GOOGLE_MAPS_API_KEY", "g-key"),
            ("DARKSKY_KEY", "d-key"),
            ("EVENTS_BASE_URL", "http://localhost:9000"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.geocode.api_key, "g-key");
        assert_eq!(config.weather.api_key, "d-key");
        assert_eq!(config.events.base_url, "http://localhost:9000");
        assert_eq!(config.missing_keys(), vec!["events", "movies"]);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
    }
}
