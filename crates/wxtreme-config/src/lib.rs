use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use wxtreme_core::{Metric, SourceKind};
use wxtreme_rollup::{DEFAULT_PERCENTILE, DEFAULT_WINDOW_DAYS};

pub const DEFAULT_TIMEZONE: &str = "Europe/Stockholm";
pub const DEFAULT_LANGUAGE: &str = "sv";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourcesConfig {
    pub temperature: Option<String>,
    pub rain: Option<String>,
    pub humidity: Option<String>,
    pub wind: Option<String>,
    pub forecast: Option<String>,
}

impl SourcesConfig {
    fn slot(&mut self, kind: SourceKind) -> &mut Option<String> {
        match kind {
            SourceKind::Temperature => &mut self.temperature,
            SourceKind::Rain => &mut self.rain,
            SourceKind::Humidity => &mut self.humidity,
            SourceKind::Wind => &mut self.wind,
            SourceKind::Forecast => &mut self.forecast,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    pub webhook: Option<String>,
    pub tag: Option<String>,
    pub language: Option<String>,
    pub templates: Option<PathBuf>,
    pub enabled_metrics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StationConfig {
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    pub window_days: Option<u32>,
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing setting {key} (env {env})")]
    Missing { key: &'static str, env: &'static str },
    #[error("Invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Environment variable overriding each source endpoint
pub fn source_env(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Temperature => "STATION_URL_TEMP",
        SourceKind::Rain => "STATION_URL_RAIN",
        SourceKind::Humidity => "STATION_URL_HUMIDITY",
        SourceKind::Wind => "STATION_URL_WIND",
        SourceKind::Forecast => "PREDICTION_URL",
    }
}

fn source_key(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Temperature => "sources.temperature",
        SourceKind::Rain => "sources.rain",
        SourceKind::Humidity => "sources.humidity",
        SourceKind::Wind => "sources.wind",
        SourceKind::Forecast => "sources.forecast",
    }
}

/// Validated runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub webhook: Option<Url>,
    pub tag: String,
    pub language: String,
    pub templates: Option<PathBuf>,
    pub enabled_metrics: BTreeSet<Metric>,
    pub timezone: Tz,
    pub window_days: u32,
    pub percentile: f64,
}

impl AppConfig {
    /// Load configuration from WXTREME_CONFIG path (TOML) if present, then apply
    /// environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WXTREME_CONFIG").unwrap_or_else(|_| "wxtreme.toml".to_string());
        let mut cfg = Self::from_file(path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Parse a TOML file; a missing file yields defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str::<AppConfig>(&s)?)
    }

    /// Override file values with whatever `lookup` returns for each variable
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for kind in SourceKind::ALL {
            if let Some(url) = lookup(source_env(kind)) {
                *self.sources.slot(kind) = Some(url);
            }
        }
        if let Some(v) = lookup("DISCORD_WEBHOOK") {
            self.notify.webhook = Some(v);
        }
        if let Some(v) = lookup("TAG_ID") {
            self.notify.tag = Some(v);
        }
        if let Some(v) = lookup("NOTIFY_LANGUAGE") {
            self.notify.language = Some(v);
        }
        if let Some(v) = lookup("NOTIFY_TEMPLATES") {
            self.notify.templates = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("NOTIFY_METRICS") {
            self.notify.enabled_metrics = Some(v.split(',').map(|m| m.trim().to_string()).collect());
        }
        if let Some(v) = lookup("STATION_TIMEZONE") {
            self.station.timezone = Some(v);
        }
    }

    /// Endpoint for every source kind, in `SourceKind::ALL` order
    pub fn source_urls(&self) -> Result<Vec<(SourceKind, Url)>, ConfigError> {
        let mut raw = self.sources.clone();
        SourceKind::ALL
            .into_iter()
            .map(|kind| {
                let value = raw
                    .slot(kind)
                    .take()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or(ConfigError::Missing {
                        key: source_key(kind),
                        env: source_env(kind),
                    })?;
                Ok((kind, parse_url(source_key(kind), &value)?))
            })
            .collect()
    }

    /// Validate everything except the source endpoints and fill in defaults
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let webhook = match self.notify.webhook.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(parse_url("notify.webhook", url)?),
            _ => None,
        };

        let timezone_name = self
            .station
            .timezone
            .as_deref()
            .unwrap_or(DEFAULT_TIMEZONE);
        let timezone: Tz = timezone_name.parse().map_err(|e| ConfigError::Invalid {
            key: "station.timezone",
            message: format!("{timezone_name}: {e}"),
        })?;

        let enabled_metrics = match &self.notify.enabled_metrics {
            None => Metric::ALL.into_iter().collect(),
            Some(names) => names
                .iter()
                .filter(|n| !n.trim().is_empty())
                .map(|n| {
                    n.parse::<Metric>().map_err(|message| ConfigError::Invalid {
                        key: "notify.enabled_metrics",
                        message,
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()?,
        };

        let window_days = self.analysis.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
        if window_days == 0 {
            return Err(ConfigError::Invalid {
                key: "analysis.window_days",
                message: "must be at least 1".to_string(),
            });
        }

        let percentile = self.analysis.percentile.unwrap_or(DEFAULT_PERCENTILE);
        if !(0.0..=100.0).contains(&percentile) {
            return Err(ConfigError::Invalid {
                key: "analysis.percentile",
                message: format!("{percentile} is outside 0..=100"),
            });
        }

        Ok(Settings {
            webhook,
            tag: self.notify.tag.clone().unwrap_or_default(),
            language: self
                .notify
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            templates: self.notify.templates.clone(),
            enabled_metrics,
            timezone,
            window_days,
            percentile,
        })
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::Invalid {
        key,
        message: format!("{value}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn station_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STATION_URL_TEMP", "https://opendata.example/temp.json"),
            ("STATION_URL_RAIN", "https://opendata.example/rain.json"),
            ("STATION_URL_HUMIDITY", "https://opendata.example/humidity.json"),
            ("STATION_URL_WIND", "https://opendata.example/wind.json"),
            ("PREDICTION_URL", "https://opendata.example/forecast.json"),
        ]
    }

    #[test]
    fn defaults_apply() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&station_env()));
        let settings = cfg.settings().unwrap();

        assert_eq!(cfg.source_urls().unwrap().len(), 5);
        assert_eq!(settings.timezone, chrono_tz::Europe::Stockholm);
        assert_eq!(settings.language, "sv");
        assert_eq!(settings.tag, "");
        assert_eq!(settings.window_days, 28);
        assert_eq!(settings.percentile, 20.0);
        assert_eq!(settings.enabled_metrics.len(), Metric::ALL.len());
        assert!(settings.webhook.is_none());
    }

    #[test]
    fn missing_source_is_reported() {
        let mut vars = station_env();
        vars.retain(|(k, _)| *k != "STATION_URL_WIND");
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&vars));

        assert!(cfg.settings().is_ok());
        let err = cfg.source_urls().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Missing { env: "STATION_URL_WIND", .. }
        ));
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[sources]
temperature = "https://file.example/temp.json"

[notify]
tag = "<@&1>"
language = "en"
enabled_metrics = ["tempHigh", "rainAmount"]

[analysis]
window_days = 14
percentile = 10.0
"#
        )
        .unwrap();

        let mut cfg = AppConfig::from_file(file.path()).unwrap();
        let mut vars = station_env();
        vars.push(("TAG_ID", "<@&42>"));
        vars.push(("STATION_TIMEZONE", "UTC"));
        cfg.apply_env(env(&vars));
        let settings = cfg.settings().unwrap();

        assert_eq!(
            cfg.source_urls().unwrap()[0].1.as_str(),
            "https://opendata.example/temp.json"
        );
        assert_eq!(settings.tag, "<@&42>");
        assert_eq!(settings.language, "en");
        assert_eq!(settings.timezone, chrono_tz::UTC);
        assert_eq!(settings.window_days, 14);
        assert_eq!(
            settings.enabled_metrics.into_iter().collect::<Vec<_>>(),
            vec![Metric::TempHigh, Metric::RainAmount]
        );
    }

    #[test]
    fn metrics_from_env_list() {
        let mut vars = station_env();
        vars.push(("NOTIFY_METRICS", "windSpeedHigh, dewPointLow"));
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&vars));

        let metrics = cfg.settings().unwrap().enabled_metrics;
        assert!(metrics.contains(&Metric::WindSpeedHigh));
        assert!(metrics.contains(&Metric::DewPointLow));
        assert_eq!(metrics.len(), 2);
    }

    #[test]
    fn invalid_values_rejected() {
        let cases = [
            ("STATION_TIMEZONE", "Mars/Olympus"),
            ("DISCORD_WEBHOOK", "not a url"),
            ("NOTIFY_METRICS", "tempHigh,pressure"),
        ];
        for (key, value) in cases {
            let mut vars = station_env();
            vars.push((key, value));
            let mut cfg = AppConfig::default();
            cfg.apply_env(env(&vars));
            assert!(
                matches!(cfg.settings(), Err(ConfigError::Invalid { .. })),
                "{key}={value} should be rejected"
            );
        }

        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&station_env()));
        cfg.analysis.percentile = Some(150.0);
        assert!(matches!(
            cfg.settings(),
            Err(ConfigError::Invalid { key: "analysis.percentile", .. })
        ));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::from_file(dir.path().join("absent.toml")).unwrap();
        assert!(cfg.sources.temperature.is_none());
    }
}
