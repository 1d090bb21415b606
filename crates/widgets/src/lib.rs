//! Text panels for the dashboard.
//!
//! Panels are purely reactive: they receive a read-only view of
//! `DashboardState` and return the lines to draw. Layout and output are
//! handled by `tread-renderer`.

pub mod bpm;
pub mod chart;
pub mod laps;
pub mod limits;
pub mod pace;
pub mod speed;
pub mod stats;
pub mod status;

pub use bpm::BpmWidget;
pub use chart::ChartWidget;
pub use laps::LapsWidget;
pub use limits::LimitsWidget;
pub use pace::PaceWidget;
pub use speed::SpeedWidget;
pub use stats::StatsWidget;
pub use status::StatusWidget;

use tread_config::DisplayConfig;
use tread_core::DashboardState;
use tread_theme::Theme;

/// Every dashboard panel implements this trait.
pub trait Panel: Send + Sync + std::fmt::Debug {
    /// Unique string identifier, e.g. `"speed"` or `"laps"`.
    fn id(&self) -> &'static str;

    /// Render the panel; `None` hides it for this frame.
    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String>;
}

/// Identifiers accepted in `[display].panels`.
pub const PANEL_IDS: &[&str] = &[
    "speed", "pace", "bpm", "stats", "chart", "laps", "limits", "status",
];

/// Construct the panel registered under `id`.
pub fn panel_by_id(id: &str, display: &DisplayConfig) -> Option<Box<dyn Panel>> {
    let panel: Box<dyn Panel> = match id {
        "speed" => Box::new(SpeedWidget::new()),
        "pace" => Box::new(PaceWidget::new()),
        "bpm" => Box::new(BpmWidget::new()),
        "stats" => Box::new(StatsWidget::new()),
        "chart" => Box::new(ChartWidget::new(display.chart_height, display.chart_max_speed)),
        "laps" => Box::new(LapsWidget::new()),
        "limits" => Box::new(LimitsWidget::new()),
        "status" => Box::new(StatusWidget::new()),
        _ => return None,
    };
    Some(panel)
}
