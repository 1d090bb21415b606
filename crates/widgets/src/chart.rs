use crate::Panel;
use tread_core::DashboardState;
use tread_theme::Theme;

/// Column chart of the rolling window with the running average drawn as a
/// dashed line. One column per sample, oldest on the left.
#[derive(Debug)]
pub struct ChartWidget {
    height:    usize,
    max_speed: f64,
}

impl ChartWidget {
    pub fn new(height: u16, max_speed: f64) -> Self {
        Self {
            height: usize::from(height.max(1)),
            max_speed,
        }
    }

    /// Row (1-based from the bottom) a speed reaches; 0 for standing still.
    fn level(&self, kmh: f64) -> usize {
        ((kmh / self.max_speed).clamp(0.0, 1.0) * self.height as f64).round() as usize
    }
}

impl Panel for ChartWidget {
    fn id(&self) -> &'static str {
        "chart"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        if state.window.is_empty() {
            return Some("Chart     waiting for data".to_string());
        }

        let avg_level = state.average.map(|a| self.level(a));
        let mut lines = Vec::with_capacity(self.height + 2);

        for row in (1..=self.height).rev() {
            let axis = if row == self.height {
                format!("{:>4.0} ┤", self.max_speed)
            } else {
                "     │".to_string()
            };
            let mut cells = String::with_capacity(state.window.len());
            for sample in &state.window {
                if self.level(sample.speed_kmh) >= row {
                    cells.push('█');
                } else if avg_level == Some(row) {
                    cells.push('┄');
                } else {
                    cells.push(' ');
                }
            }
            lines.push(format!("{axis}{}", theme.paint(&cells, theme.accent)));
        }

        lines.push(format!("   0 └{}", "─".repeat(state.window.len())));
        if let Some(avg) = state.average {
            lines.push(format!(
                "     avg {avg:.1} km/h over last {} samples",
                state.window.len()
            ));
        }

        Some(lines.join("\n"))
    }
}
