use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::remote::{
    DirectionsProvider, GoogleDirectionsClient, RemoteError, RideApiClient,
    DEFAULT_DIRECTIONS_URL,
};
use crate::tracker::{Tracker, TrackingSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub ride_api: RideApiConfig,
    #[serde(default)]
    pub directions: DirectionsConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RideApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsConfig {
    #[serde(default = "default_directions_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_traffic_model")]
    pub traffic_model: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_directions_url(),
            api_key_env: default_api_key_env(),
            traffic_model: default_traffic_model(),
            timeout: default_timeout(),
        }
    }
}

fn default_directions_url() -> String {
    DEFAULT_DIRECTIONS_URL.to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_MAPS_API_KEY".to_string()
}

fn default_traffic_model() -> String {
    "best_guess".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_poll_interval", deserialize_with = "deserialize_duration")]
    pub poll_interval: Duration,
    #[serde(default = "default_unchanged_threshold")]
    pub unchanged_threshold_deg: f64,
    #[serde(default = "default_refetch_threshold")]
    pub refetch_threshold_miles: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let settings = TrackingSettings::default();
        Self {
            poll_interval: settings.poll_interval,
            unchanged_threshold_deg: settings.unchanged_threshold_deg,
            refetch_threshold_miles: settings.refetch_threshold_miles,
        }
    }
}

fn default_poll_interval() -> Duration {
    TrackingSettings::default().poll_interval
}

fn default_unchanged_threshold() -> f64 {
    TrackingSettings::default().unchanged_threshold_deg
}

fn default_refetch_threshold() -> f64 {
    TrackingSettings::default().refetch_threshold_miles
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn tracking_settings(&self) -> TrackingSettings {
        TrackingSettings {
            poll_interval: self.tracking.poll_interval,
            unchanged_threshold_deg: self.tracking.unchanged_threshold_deg,
            refetch_threshold_miles: self.tracking.refetch_threshold_miles,
        }
    }

    /// The directions key from the configured environment variable, if set
    /// and non-empty.
    pub fn directions_api_key(&self) -> Option<String> {
        std::env::var(&self.directions.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn build_tracker(&self) -> Result<Tracker, RemoteError> {
        let source = Arc::new(RideApiClient::new(
            &self.ride_api.base_url,
            self.ride_api.timeout,
        )?);

        let directions: Option<Arc<dyn DirectionsProvider>> = match self.directions_api_key() {
            Some(key) => Some(Arc::new(GoogleDirectionsClient::new(
                self.directions.base_url.clone(),
                key,
                self.directions.traffic_model.clone(),
                self.directions.timeout,
            )?)),
            None => {
                log::warn!(
                    "{} not set, routes will be drawn as straight lines",
                    self.directions.api_key_env
                );
                None
            }
        };

        Ok(Tracker::new(source, directions, self.tracking_settings()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml("ride_api:\n  base_url: https://rides.test\n").unwrap();
        assert_eq!(config.web.bind, "0.0.0.0:8080");
        assert_eq!(config.ride_api.timeout, Duration::from_secs(10));
        assert_eq!(config.directions.api_key_env, "GOOGLE_MAPS_API_KEY");
        assert_eq!(config.directions.traffic_model, "best_guess");
        assert_eq!(config.tracking_settings(), TrackingSettings::default());
    }

    #[test]
    fn durations_use_humantime() {
        let yaml = r#"
web:
  bind: "127.0.0.1:9000"
ride_api:
  base_url: https://rides.test
  timeout: 3s
tracking:
  poll_interval: 2s 500ms
  refetch_threshold_miles: 0.25
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.web.bind, "127.0.0.1:9000");
        assert_eq!(config.ride_api.timeout, Duration::from_secs(3));
        let settings = config.tracking_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(2500));
        assert_eq!(settings.refetch_threshold_miles, 0.25);
        assert_eq!(settings.unchanged_threshold_deg, 0.0001);
    }

    #[test]
    fn missing_ride_api_is_an_error() {
        assert!(matches!(
            Config::from_yaml("web:\n  bind: 0.0.0.0:1\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn bad_duration_is_an_error() {
        let yaml = "ride_api:\n  base_url: x\ntracking:\n  poll_interval: soon\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn unset_key_env_means_no_key() {
        let yaml = "ride_api:\n  base_url: x\ndirections:\n  api_key_env: RIDE_TRACKER_TEST_UNSET_KEY\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.directions_api_key(), None);
    }
}
