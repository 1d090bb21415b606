use crate::Panel;
use tread_core::DashboardState;
use tread_theme::Theme;

/// Current belt speed, coloured by the speed limits.
#[derive(Debug, Default)]
pub struct SpeedWidget;

impl SpeedWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for SpeedWidget {
    fn id(&self) -> &'static str {
        "speed"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let Some(latest) = &state.latest else {
            return Some("Speed     -- km/h".to_string());
        };
        let value = format!("{:.1}", latest.speed);
        let color = theme.severity(state.speed_severity());
        Some(format!("Speed     {} km/h", theme.paint(&value, color)))
    }
}
