use crate::Panel;
use tread_core::DashboardState;
use tread_theme::Theme;

/// Connection state, last source error, rejected-sample count and clock.
#[derive(Debug, Default)]
pub struct StatusWidget;

impl StatusWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for StatusWidget {
    fn id(&self) -> &'static str {
        "status"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let link = match (&state.source_error, state.connected) {
            (Some(e), _) => theme.paint(&format!("✖ {e}"), theme.critical),
            (None, true) => theme.paint("● live", theme.normal),
            (None, false) => theme.paint("○ waiting for backend", theme.warning),
        };
        let mut line = format!("{}  {link}", state.time.format("%H:%M:%S"));
        if state.rejected > 0 {
            line.push_str(&format!("  ({} rejected)", state.rejected));
        }
        Some(line)
    }
}
