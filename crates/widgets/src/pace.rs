use crate::Panel;
use tread_core::{DashboardState, Pace, PaceField};
use tread_theme::Theme;

/// Current pace in min/km as reported by the backend.
#[derive(Debug, Default)]
pub struct PaceWidget;

impl PaceWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for PaceWidget {
    fn id(&self) -> &'static str {
        "pace"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let pace = match state.latest.as_ref() {
            Some(t) => match &t.pace {
                Some(PaceField::Text(s)) => s.clone(),
                Some(PaceField::Minutes(m)) => Pace::from_minutes(*m)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|_| "--:--".to_string()),
                None => Pace::from_speed(t.speed).to_string(),
            },
            None => "--:--".to_string(),
        };
        Some(format!("Pace      {} /km", theme.paint(&pace, theme.foreground)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::state;

    #[test]
    fn derives_pace_when_record_has_none() {
        let mut s = state(12.0, None);
        if let Some(t) = s.latest.as_mut() {
            t.pace = None;
        }
        let out = PaceWidget::new().view(&s, &Theme::plain()).unwrap();
        assert_eq!(out, "Pace      5:00 /km");
    }

    #[test]
    fn shows_reported_pace_verbatim() {
        let out = PaceWidget::new().view(&state(10.0, None), &Theme::plain()).unwrap();
        assert_eq!(out, "Pace      6:00 /km");
    }
}
