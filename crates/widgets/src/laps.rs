use crate::Panel;
use tread_core::{format_duration, Comparison, DashboardState, Pace};
use tread_theme::Theme;

/// Per-lap table. Each lap's speed is coloured faster/slower/equal against
/// the lap before it.
///
/// Rows come from the backend's `average_speeds` when it reports them, and
/// from the aggregator's own markers otherwise.
#[derive(Debug, Default)]
pub struct LapsWidget;

impl LapsWidget {
    pub fn new() -> Self {
        Self
    }
}

fn header() -> String {
    format!(
        "{:>3}  {:>5}  {:>4}  {:>4}  {:>5}  {:>3}",
        "#", "Time", "kcal", "km/h", "Pace", "bpm"
    )
}

impl Panel for LapsWidget {
    fn id(&self) -> &'static str {
        "laps"
    }

    fn view(&self, state: &DashboardState, theme: &Theme) -> Option<String> {
        let reported = state
            .latest
            .as_ref()
            .map(|t| t.average_speeds.as_slice())
            .unwrap_or_default();

        if reported.is_empty() && state.markers.is_empty() {
            return None;
        }

        let mut lines = vec![header()];

        if reported.is_empty() {
            for m in &state.markers {
                let speed = theme.paint(
                    &format!("{:>4.1}", m.average_speed),
                    theme.comparison(m.comparison),
                );
                let pace = Pace::from_speed(m.average_speed).to_string();
                lines.push(format!(
                    "{:>3}  {:>5}  {:>4}  {speed}  {pace:>5}  {:>3}",
                    m.index, "--:--", "--", "--"
                ));
            }
        } else {
            let mut previous = 0.0;
            for (i, lap) in reported.iter().enumerate() {
                let comparison = state
                    .markers
                    .get(i)
                    .map(|m| m.comparison)
                    .unwrap_or_else(|| Comparison::between(previous, lap.avg_speed));
                previous = lap.avg_speed;

                let speed = theme.paint(
                    &format!("{:>4.1}", lap.avg_speed),
                    theme.comparison(comparison),
                );
                let time = format_duration(lap.lap_time_s.max(0.0) as u64, false);
                lines.push(format!(
                    "{:>3}  {time}  {:>4.0}  {speed}  {:>5}  {:>3.0}",
                    i + 1,
                    lap.lap_kcal,
                    lap.avg_pace,
                    lap.avg_bpm
                ));
            }
        }

        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::state;
    use tread_core::{LapEntry, LapMarker};

    fn lap(time: f64, kcal: f64, speed: f64, pace: &str, bpm: f64) -> LapEntry {
        LapEntry {
            lap_time_s: time,
            lap_kcal: kcal,
            avg_speed: speed,
            avg_pace: pace.into(),
            avg_bpm: bpm,
            elapsed_s: None,
            kcal: None,
        }
    }

    #[test]
    fn hidden_without_laps() {
        assert!(LapsWidget::new().view(&state(10.0, None), &Theme::plain()).is_none());
    }

    #[test]
    fn renders_reported_laps() {
        let mut s = state(10.0, None);
        if let Some(t) = s.latest.as_mut() {
            t.average_speeds = vec![
                lap(312.0, 61.0, 11.5, "5:13", 132.4),
                lap(330.0, 60.0, 10.9, "5:30", 140.0),
            ];
        }
        let out = LapsWidget::new().view(&s, &Theme::plain()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  #   Time  kcal  km/h   Pace  bpm");
        assert_eq!(lines[1], "  1  05:12    61  11.5   5:13  132");
        assert_eq!(lines[2], "  2  05:30    60  10.9   5:30  140");
    }

    #[test]
    fn slower_lap_is_painted_slower() {
        let theme = Theme::default();
        let mut s = state(10.0, None);
        if let Some(t) = s.latest.as_mut() {
            t.average_speeds = vec![
                lap(312.0, 61.0, 10.0, "6:00", 130.0),
                lap(330.0, 60.0, 9.5, "6:18", 131.0),
            ];
        }
        let out = LapsWidget::new().view(&s, &theme).unwrap();
        let last = out.lines().last().unwrap();
        assert!(last.contains(&theme.slower.ansi_fg()));
    }

    #[test]
    fn falls_back_to_markers() {
        let mut s = state(10.0, None);
        s.markers = vec![LapMarker {
            index: 1,
            average_speed: 12.0,
            comparison: Comparison::Faster,
            elapsed_s: 300.0,
            distance_km: 1.0,
        }];
        let out = LapsWidget::new().view(&s, &Theme::plain()).unwrap();
        assert_eq!(out.lines().nth(1), Some("  1  --:--    --  12.0   5:00   --"));
    }
}
