use config::{Config, ConfigError, Environment, builder::DefaultState};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// How the location permission is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    Granted,
    Denied,
    Prompt,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    gpsd: Gpsd,
    replay: Replay,
    permission: PermissionMode,
}

impl AppConfig {
    /// Loads the built-in defaults, the optional configuration file and the
    /// `GEOLOCATION_*` environment variables, later sources win.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }
        builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// `GEOLOCATION_PERMISSION`, `GEOLOCATION_GPSD__ADDRESS`, ...
    fn environment() -> Environment {
        Environment::with_prefix("GEOLOCATION")
            .prefix_separator("_")
            .separator("__")
    }

    fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("gpsd.address", "127.0.0.1:2947")?
            .set_default("replay.interval_ms", 1000)?
            .set_default("replay.velocity", 10.0)?
            .set_default("replay.accuracy", 5.0)?
            .set_default("permission", "prompt")
    }

    pub fn gpsd(&self) -> &Gpsd {
        &self.gpsd
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn permission(&self) -> PermissionMode {
        self.permission
    }
}

#[derive(Debug, Deserialize)]
pub struct Gpsd {
    address: String,
}

impl Gpsd {
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Deserialize)]
pub struct Replay {
    interval_ms: u64,
    velocity: f32,
    accuracy: f32,
}

impl Replay {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn load_toml(toml: &str) -> AppConfig {
        AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn use_defaults_without_file() {
        let config = load_toml("");
        assert_eq!(config.gpsd().address(), "127.0.0.1:2947");
        assert_eq!(config.replay().interval(), Duration::from_secs(1));
        assert_eq!(config.replay().velocity(), 10.0);
        assert_eq!(config.replay().accuracy(), 5.0);
        assert_eq!(config.permission(), PermissionMode::Prompt);
    }

    #[test]
    fn file_overrides_defaults() {
        let config = load_toml(
            r#"
            permission = "granted"

            [gpsd]
            address = "192.168.1.20:2947"

            [replay]
            interval_ms = 250
            "#,
        );
        assert_eq!(config.gpsd().address(), "192.168.1.20:2947");
        assert_eq!(config.replay().interval(), Duration::from_millis(250));
        assert_eq!(config.replay().velocity(), 10.0);
        assert_eq!(config.permission(), PermissionMode::Granted);
    }

    #[test]
    fn environment_overrides_file() {
        let variables: config::Map<String, String> = [
            ("GEOLOCATION_GPSD__ADDRESS", "10.0.0.1:2947"),
            ("GEOLOCATION_PERMISSION", "granted"),
            ("OTHER_PERMISSION", "denied"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let config: AppConfig = AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str("permission = \"denied\"", FileFormat::Toml))
            .add_source(AppConfig::environment().source(Some(variables)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.gpsd().address(), "10.0.0.1:2947");
        assert_eq!(config.permission(), PermissionMode::Granted);
        assert_eq!(config.replay().interval(), Duration::from_secs(1));
    }
}
