use tracing::info;
use tread_core::{Comparison, LapEntry, LapMarker, Sample};

/// Guards against `0.3 / 0.1 == 2.999…` style floor errors.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Detects lap boundaries and keeps the append-only marker list.
#[derive(Debug, Clone)]
pub struct LapTracker {
    markers:         Vec<LapMarker>,
    lap_distance_km: f64,
    /// Positive speeds seen since the last marker.
    speed_sum:       f64,
    speed_count:     u64,
}

impl LapTracker {
    pub fn new(lap_distance_km: f64) -> Self {
        Self {
            markers: Vec::new(),
            lap_distance_km,
            speed_sum: 0.0,
            speed_count: 0,
        }
    }

    pub fn markers(&self) -> &[LapMarker] {
        &self.markers
    }

    pub fn lap_distance_km(&self) -> f64 {
        self.lap_distance_km
    }

    /// Number of laps `sample` says should exist by now.
    fn target_laps(&self, sample: &Sample, reported: &[LapEntry]) -> usize {
        let crossed = (sample.distance_km / self.lap_distance_km + BOUNDARY_EPSILON).floor();
        (crossed as usize).max(reported.len())
    }

    /// Fold an accepted sample into the current lap and close the lap if a
    /// boundary was reached.
    ///
    /// At most one marker is appended per call; a sample that jumps several
    /// boundaries is caught up on the following calls.
    pub fn observe(
        &mut self,
        sample: &Sample,
        reported: &[LapEntry],
        window_average: f64,
    ) -> Option<LapMarker> {
        if sample.speed_kmh > 0.0 {
            self.speed_sum += sample.speed_kmh;
            self.speed_count += 1;
        }

        if self.markers.len() >= self.target_laps(sample, reported) {
            return None;
        }

        let index = self.markers.len() + 1;
        let average_speed = match reported.get(index - 1) {
            Some(lap) => lap.avg_speed,
            None if self.speed_count > 0 => self.speed_sum / self.speed_count as f64,
            None => window_average,
        };
        let previous = self.markers.last().map_or(0.0, |m| m.average_speed);

        let marker = LapMarker {
            index,
            average_speed,
            comparison: Comparison::between(previous, average_speed),
            elapsed_s: sample.elapsed_s,
            distance_km: sample.distance_km,
        };

        info!(
            lap = index,
            avg_speed = average_speed,
            comparison = ?marker.comparison,
            "lap completed"
        );

        self.markers.push(marker.clone());
        self.speed_sum = 0.0;
        self.speed_count = 0;
        Some(marker)
    }

    pub fn reset(&mut self) {
        self.markers.clear();
        self.speed_sum = 0.0;
        self.speed_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(avg_speed: f64) -> LapEntry {
        LapEntry {
            lap_time_s: 360.0,
            lap_kcal: 60.0,
            avg_speed,
            avg_pace: "6:00".into(),
            avg_bpm: 130.0,
            elapsed_s: None,
            kcal: None,
        }
    }

    #[test]
    fn no_marker_before_first_boundary() {
        let mut t = LapTracker::new(1.0);
        assert!(t.observe(&Sample::new(10.0, 10.0, 0.99), &[], 10.0).is_none());
        assert!(t.markers().is_empty());
    }

    #[test]
    fn marker_uses_lap_mean_of_positive_speeds() {
        let mut t = LapTracker::new(1.0);
        t.observe(&Sample::new(1.0, 0.0, 0.0), &[], 0.0);
        t.observe(&Sample::new(2.0, 10.0, 0.5), &[], 5.0);
        let m = t.observe(&Sample::new(3.0, 12.0, 1.0), &[], 7.3).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.average_speed, 11.0);
        assert_eq!(m.comparison, Comparison::Faster);
    }

    #[test]
    fn reported_lap_average_takes_precedence() {
        let mut t = LapTracker::new(1.0);
        let m = t
            .observe(&Sample::new(400.0, 9.0, 0.4), &[lap(10.0)], 9.0)
            .unwrap();
        assert_eq!(m.average_speed, 10.0);
    }

    #[test]
    fn one_marker_per_call_when_jumping_boundaries() {
        let mut t = LapTracker::new(1.0);
        assert!(t.observe(&Sample::new(1.0, 10.0, 2.5), &[], 10.0).is_some());
        assert_eq!(t.markers().len(), 1);
        assert!(t.observe(&Sample::new(2.0, 10.0, 2.5), &[], 10.0).is_some());
        assert_eq!(t.markers().len(), 2);
        assert!(t.observe(&Sample::new(3.0, 10.0, 2.5), &[], 10.0).is_none());
    }

    #[test]
    fn fractional_lap_distance_boundaries() {
        let mut t = LapTracker::new(0.1);
        t.observe(&Sample::new(1.0, 10.0, 0.1), &[], 10.0);
        t.observe(&Sample::new(2.0, 10.0, 0.2), &[], 10.0);
        assert!(t.observe(&Sample::new(3.0, 10.0, 0.3), &[], 10.0).is_some());
        assert_eq!(t.markers().len(), 3);
    }
}
