use serde::{Deserialize, Serialize};
use tread_core::Limits;

/// Root configuration structure parsed from `treadboard.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where telemetry comes from.
    pub source: SourceConfig,
    /// Rolling chart window.
    pub window: WindowConfig,
    /// Lap boundary detection.
    pub laps: LapConfig,
    /// Fallback thresholds when records carry none.
    pub limits: Limits,
    /// Which panels to draw and how.
    pub display: DisplayConfig,
    /// Colours.
    pub theme: ThemeConfig,
}

/// How the backend delivers records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Periodic `GET` of the JSON endpoint.
    #[default]
    Poll,
    /// Long-lived server-sent event stream.
    Stream,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the treadmill backend.
    pub url: String,
    pub mode: SourceMode,
    /// JSON endpoint used in poll mode.
    pub poll_path: String,
    /// Event-stream endpoint used in stream mode.
    pub stream_path: String,
    /// Poll period in milliseconds.
    pub interval_ms: u64,
    /// Delay before reconnecting a dropped stream.
    pub reconnect_secs: u64,
    /// Per-request timeout in milliseconds (poll mode, and stream connect).
    pub timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url:            "http://127.0.0.1:5000".to_string(),
            mode:           SourceMode::Poll,
            poll_path:      "/api/treadmill_data".to_string(),
            stream_path:    "/data_stream_json".to_string(),
            interval_ms:    1_000,
            reconnect_secs: 2,
            timeout_ms:     2_000,
        }
    }
}

impl SourceConfig {
    /// Full URL for the endpoint matching `mode`.
    pub fn endpoint(&self) -> String {
        let path = match self.mode {
            SourceMode::Poll => &self.poll_path,
            SourceMode::Stream => &self.stream_path,
        };
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples kept on the chart.
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { capacity: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LapConfig {
    /// Distance between lap markers in km.
    pub distance_km: f64,
}

impl Default for LapConfig {
    fn default() -> Self {
        Self { distance_km: 1.0 }
    }
}

/// Panel selection and chart sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Panel ids, drawn top to bottom.
    pub panels: Vec<String>,
    /// Rows used by the speed chart.
    pub chart_height: u16,
    /// Speed mapped to the top chart row (km/h).
    pub chart_max_speed: f64,
    /// Emit ANSI colours. Disable for logs or dumb terminals.
    pub color: bool,
    /// Clear the terminal before every frame.
    pub clear_screen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            panels: ["speed", "pace", "bpm", "stats", "chart", "laps", "status"]
                .into_iter()
                .map(String::from)
                .collect(),
            chart_height:    8,
            chart_max_speed: 20.0,
            color:           true,
            clear_screen:    true,
        }
    }
}

/// Hex colours for each tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub foreground: String,
    pub accent:     String,
    /// Severity tiers.
    pub normal:     String,
    pub warning:    String,
    pub critical:   String,
    /// Lap comparisons.
    pub faster:     String,
    pub slower:     String,
    pub equal:      String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha text
            accent:     "#89b4fa".to_string(), // Catppuccin Mocha blue
            normal:     "#a6e3a1".to_string(), // green
            warning:    "#f9e2af".to_string(), // yellow
            critical:   "#f38ba8".to_string(), // red
            faster:     "#a6e3a1".to_string(),
            slower:     "#f38ba8".to_string(),
            equal:      "#9399b2".to_string(), // overlay2
        }
    }
}
