use crate::Panel;
use tread_core::DashboardState;
use tread_theme::Theme;

/// The thresholds currently colouring speed and heart rate.
#[derive(Debug, Default)]
pub struct LimitsWidget;

impl LimitsWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for LimitsWidget {
    fn id(&self) -> &'static str {
        "limits"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let l = &state.limits;
        let speed = format!(
            "{} / {}",
            theme.paint(&format!("{:.1}", l.speed_yellow), theme.warning),
            theme.paint(&format!("{:.1}", l.speed_red), theme.critical),
        );
        let bpm = format!(
            "{} / {}",
            theme.paint(&format!("{:.0}", l.bpm_yellow), theme.warning),
            theme.paint(&format!("{:.0}", l.bpm_red), theme.critical),
        );
        Some(format!("Limits    speed {speed} km/h   heart {bpm} bpm"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_thresholds() {
        let out = LimitsWidget::new()
            .view(&DashboardState::default(), &Theme::plain())
            .unwrap();
        assert_eq!(out, "Limits    speed 10.0 / 12.0 km/h   heart 120 / 140 bpm");
    }
}
