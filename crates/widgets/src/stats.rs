use crate::Panel;
use tread_core::{format_duration, DashboardState};
use tread_theme::Theme;

/// Distance, running time and energy on one line.
#[derive(Debug, Default)]
pub struct StatsWidget;

impl StatsWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for StatsWidget {
    fn id(&self) -> &'static str {
        "stats"
    }

    fn view(&self, state: &DashboardState, _theme: &Theme) -> Option<String> {
        let latest = state.latest.as_ref()?;
        let elapsed = format_duration(latest.running_time.max(0.0) as u64, true);
        Some(format!(
            "Distance  {:.2} km   Time {elapsed}   Energy {:.0} kcal",
            latest.distance, latest.energy
        ))
    }
}
