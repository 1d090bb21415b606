pub mod schema;
pub mod watcher;

pub use schema::{
    DashboardConfig, DisplayConfig, LapConfig, SourceConfig, SourceMode, ThemeConfig,
    WindowConfig,
};
pub use watcher::ConfigWatcher;

use std::path::{Path, PathBuf};
use tread_core::{Result, TreadError};

/// Load configuration from a TOML file.  Returns `DashboardConfig::default()`
/// if the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<DashboardConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DashboardConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TreadError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<DashboardConfig> {
    let config: DashboardConfig =
        toml::from_str(raw).map_err(|e| TreadError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Reject settings the aggregator or sources cannot run with.
pub fn validate(config: &DashboardConfig) -> Result<()> {
    if config.window.capacity == 0 {
        return Err(TreadError::Config("window.capacity must be at least 1".into()));
    }
    if config.laps.distance_km <= 0.0 || !config.laps.distance_km.is_finite() {
        return Err(TreadError::Config(format!(
            "laps.distance_km must be positive, got {}",
            config.laps.distance_km
        )));
    }
    if config.source.interval_ms == 0 {
        return Err(TreadError::Config("source.interval_ms must be non-zero".into()));
    }
    let limits = &config.limits;
    if limits.speed_yellow > limits.speed_red || limits.bpm_yellow > limits.bpm_red {
        return Err(TreadError::Config(
            "limits: yellow thresholds must not exceed red ones".into(),
        ));
    }
    if config.display.chart_max_speed <= 0.0 || !config.display.chart_max_speed.is_finite() {
        return Err(TreadError::Config("display.chart_max_speed must be positive".into()));
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("treadboard").join("treadboard.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.window.capacity, 60);
        assert_eq!(cfg.source.endpoint(), "http://127.0.0.1:5000/api/treadmill_data");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
url = "http://treadmill.local:5000/"
mode = "stream"

[window]
capacity = 30

[limits]
speed_red = 14.0
"#
        )
        .unwrap();

        let cfg = load(file.path()).unwrap();
        assert_eq!(cfg.source.mode, SourceMode::Stream);
        assert_eq!(cfg.source.endpoint(), "http://treadmill.local:5000/data_stream_json");
        assert_eq!(cfg.window.capacity, 30);
        assert_eq!(cfg.limits.speed_red, 14.0);
        assert_eq!(cfg.limits.speed_yellow, 10.0);
        assert_eq!(cfg.laps.distance_km, 1.0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = parse("[window]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, TreadError::Config(_)));
    }

    #[test]
    fn inverted_limits_are_rejected() {
        assert!(parse("[limits]\nbpm_yellow = 150\nbpm_red = 140\n").is_err());
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        assert!(parse("[source]\nmode = \"carrier-pigeon\"\n").is_err());
    }
}
