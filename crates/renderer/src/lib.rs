//! Layout and frame composition for the terminal dashboard.

use tracing::warn;
use tread_config::DashboardConfig;
use tread_core::DashboardState;
use tread_theme::Theme;
use tread_widgets::{panel_by_id, Panel};

/// Clear screen and home the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Ordered panels drawn top to bottom.
#[derive(Debug, Default)]
pub struct DashboardLayout {
    panels:       Vec<Box<dyn Panel>>,
    clear_screen: bool,
}

impl DashboardLayout {
    /// Build a [`DashboardLayout`] from the loaded configuration.
    /// Unknown panel ids are skipped with a warning.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let panels = config
            .display
            .panels
            .iter()
            .filter_map(|id| {
                let panel = panel_by_id(id, &config.display);
                if panel.is_none() {
                    warn!("Unknown panel '{id}' in [display].panels; skipping");
                }
                panel
            })
            .collect();

        Self {
            panels,
            clear_screen: config.display.clear_screen,
        }
    }

    pub fn panel_ids(&self) -> Vec<&'static str> {
        self.panels.iter().map(|p| p.id()).collect()
    }

    /// Render one frame. Hidden panels leave no gap.
    pub fn render(&self, state: &DashboardState, theme: &Theme) -> String {
        let body = self
            .panels
            .iter()
            .filter_map(|p| p.view(state, theme))
            .collect::<Vec<_>>()
            .join("\n");

        if self.clear_screen {
            format!("{CLEAR}{body}\n")
        } else {
            format!("{body}\n")
        }
    }
}
