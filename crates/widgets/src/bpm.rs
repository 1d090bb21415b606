use crate::Panel;
use tread_core::DashboardState;
use tread_theme::Theme;

/// Heart rate, coloured by the bpm limits. Shows `--` without a strap.
#[derive(Debug, Default)]
pub struct BpmWidget;

impl BpmWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for BpmWidget {
    fn id(&self) -> &'static str {
        "bpm"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let bpm = state.latest.as_ref().and_then(|t| t.heart_rate());
        let label = match bpm {
            Some(b) => theme.paint(&b.to_string(), theme.severity(state.bpm_severity())),
            None => "--".to_string(),
        };
        Some(format!("Heart     {label} bpm"))
    }
}
