//! Rolling telemetry aggregator.
//!
//! Owns a bounded window of recent samples, the running average over that
//! window, and the append-only list of lap markers. Callers feed it one
//! sample at a time and redraw from the snapshot it hands back.

pub mod laps;
pub mod totals;
pub mod window;

pub use laps::LapTracker;
pub use totals::SessionTotals;
pub use window::SampleWindow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tread_core::{LapEntry, LapMarker, Result, Sample, SessionSummary, TreadError};

/// Window size used by the dashboard chart.
pub const DEFAULT_CAPACITY: usize = 60;

/// Sizing for a new [`Aggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum number of samples kept in the window.
    pub capacity: usize,
    /// Distance between lap boundaries in km.
    pub lap_distance_km: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            lap_distance_km: 1.0,
        }
    }
}

/// `Empty` until the first accepted sample; `reset` goes back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    Empty,
    Active,
}

/// Result of one accepted ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    /// Window contents after the ingest, oldest first.
    pub window: Vec<Sample>,
    /// Mean speed over `window`, full precision.
    pub average: f64,
    /// Marker appended by this ingest, if a lap closed.
    pub new_marker: Option<LapMarker>,
}

impl IngestOutcome {
    /// Average rounded to one decimal for display.
    #[must_use]
    pub fn average_display(&self) -> f64 {
        round1(self.average)
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    window:       SampleWindow,
    laps:         LapTracker,
    totals:       SessionTotals,
    average:      Option<f64>,
    last_elapsed: Option<f64>,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(TreadError::Config("window capacity must be at least 1".into()));
        }
        if !config.lap_distance_km.is_finite() || config.lap_distance_km <= 0.0 {
            return Err(TreadError::Config(format!(
                "lap distance must be positive, got {}",
                config.lap_distance_km
            )));
        }

        Ok(Self {
            window:       SampleWindow::new(config.capacity),
            laps:         LapTracker::new(config.lap_distance_km),
            totals:       SessionTotals::default(),
            average:      None,
            last_elapsed: None,
        })
    }

    /// Ingest a sample whose laps are detected from distance alone.
    pub fn ingest(&mut self, sample: Sample) -> Result<IngestOutcome> {
        self.ingest_with_laps(sample, &[])
    }

    /// Ingest a sample together with the laps the source has already closed.
    ///
    /// Either fully applied or fully rejected: on error nothing changes.
    pub fn ingest_with_laps(
        &mut self,
        sample: Sample,
        reported: &[LapEntry],
    ) -> Result<IngestOutcome> {
        if let Err(e) = self.validate(&sample) {
            warn!("rejected sample: {e}");
            return Err(e);
        }

        if let Some(evicted) = self.window.push(sample) {
            debug!(elapsed = evicted.elapsed_s, "evicted oldest sample");
        }
        let average = self.window.average().unwrap_or(0.0);
        self.average = Some(average);
        self.last_elapsed = Some(sample.elapsed_s);
        self.totals.record(&sample);
        let new_marker = self.laps.observe(&sample, reported, average);

        Ok(IngestOutcome {
            window: self.window.snapshot(),
            average,
            new_marker,
        })
    }

    fn validate(&self, sample: &Sample) -> Result<()> {
        if !sample.speed_kmh.is_finite() || sample.speed_kmh < 0.0 {
            return Err(TreadError::InvalidSample(format!(
                "speed must be a non-negative number, got {}",
                sample.speed_kmh
            )));
        }
        if !sample.distance_km.is_finite() || sample.distance_km < 0.0 {
            return Err(TreadError::InvalidSample(format!(
                "distance must be a non-negative number, got {}",
                sample.distance_km
            )));
        }
        if !sample.elapsed_s.is_finite() || sample.elapsed_s < 0.0 {
            return Err(TreadError::InvalidSample(format!(
                "elapsed time must be a non-negative number, got {}",
                sample.elapsed_s
            )));
        }
        match self.last_elapsed {
            Some(previous) if sample.elapsed_s < previous => Err(TreadError::OutOfOrder {
                previous,
                got: sample.elapsed_s,
            }),
            _ => Ok(()),
        }
    }

    /// Back to the `Empty` state; window, markers and totals are dropped.
    pub fn reset(&mut self) {
        self.window.clear();
        self.laps.reset();
        self.totals = SessionTotals::default();
        self.average = None;
        self.last_elapsed = None;
        debug!("aggregator reset");
    }

    pub fn state(&self) -> AggregatorState {
        if self.window.is_empty() {
            AggregatorState::Empty
        } else {
            AggregatorState::Active
        }
    }

    pub fn window(&self) -> Vec<Sample> {
        self.window.snapshot()
    }

    /// Mean speed over the window; `None` while empty.
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn average_display(&self) -> Option<f64> {
        self.average.map(round1)
    }

    pub fn markers(&self) -> &[LapMarker] {
        self.laps.markers()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    pub fn lap_distance_km(&self) -> f64 {
        self.laps.lap_distance_km()
    }

    pub fn summary(&self) -> SessionSummary {
        self.totals.summary()
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tread_core::Comparison;

    fn aggregator(capacity: usize) -> Aggregator {
        Aggregator::new(AggregatorConfig {
            capacity,
            lap_distance_km: 1.0,
        })
        .unwrap()
    }

    fn speeds(window: &[Sample]) -> Vec<f64> {
        window.iter().map(|s| s.speed_kmh).collect()
    }

    fn lap(avg_speed: f64) -> LapEntry {
        LapEntry {
            lap_time_s: 330.0,
            lap_kcal: 70.0,
            avg_speed,
            avg_pace: "5:30".into(),
            avg_bpm: 135.0,
            elapsed_s: None,
            kcal: None,
        }
    }

    #[test]
    fn rejects_zero_capacity_and_bad_lap_distance() {
        assert!(Aggregator::new(AggregatorConfig { capacity: 0, lap_distance_km: 1.0 }).is_err());
        assert!(Aggregator::new(AggregatorConfig { capacity: 5, lap_distance_km: 0.0 }).is_err());
    }

    #[test]
    fn capacity_three_scenario() {
        let mut agg = aggregator(3);
        let mut last = None;
        for (i, v) in [10.0, 12.0, 14.0, 16.0].into_iter().enumerate() {
            last = Some(agg.ingest(Sample::new(i as f64, v, 0.0)).unwrap());
        }
        let out = last.unwrap();
        assert_eq!(speeds(&out.window), vec![12.0, 14.0, 16.0]);
        assert_eq!(out.average, 14.0);
        assert_eq!(out.average_display(), 14.0);
    }

    #[test]
    fn window_is_bounded_and_keeps_latest_in_order() {
        let cap = 5;
        let mut agg = aggregator(cap);
        for n in 1..=12usize {
            let out = agg.ingest(Sample::new(n as f64, n as f64, 0.0)).unwrap();
            assert_eq!(out.window.len(), n.min(cap));
            let expected: Vec<f64> = ((n.saturating_sub(cap) + 1)..=n).map(|k| k as f64).collect();
            assert_eq!(speeds(&out.window), expected);
        }
    }

    #[test]
    fn average_matches_window_mean_after_every_ingest() {
        let mut agg = aggregator(4);
        let readings = [9.3, 10.1, 0.0, 11.7, 12.25, 8.8, 13.05];
        for (i, v) in readings.into_iter().enumerate() {
            let out = agg.ingest(Sample::new(i as f64, v, 0.0)).unwrap();
            let mean = out.window.iter().map(|s| s.speed_kmh).sum::<f64>() / out.window.len() as f64;
            assert!((out.average - mean).abs() < 1e-9);
            assert_eq!(agg.average(), Some(out.average));
        }
    }

    #[test]
    fn first_sample_is_evicted_after_capacity_plus_one() {
        let mut agg = aggregator(3);
        for t in 0..4 {
            agg.ingest(Sample::new(f64::from(t), 10.0 + f64::from(t), 0.0)).unwrap();
        }
        let window = agg.window();
        assert!(window.iter().all(|s| s.elapsed_s != 0.0));
        assert_eq!(window.iter().map(|s| s.elapsed_s).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn invalid_sample_leaves_state_untouched() {
        let mut agg = aggregator(3);
        agg.ingest(Sample::new(0.0, 10.0, 0.5)).unwrap();
        agg.ingest(Sample::new(1.0, 11.0, 1.0)).unwrap();

        let window = agg.window();
        let average = agg.average();
        let markers = agg.markers().to_vec();
        let summary = agg.summary();

        for bad in [
            Sample::new(2.0, -5.0, 1.1),
            Sample::new(2.0, f64::NAN, 1.1),
            Sample::new(2.0, 10.0, -1.0),
            Sample::new(0.5, 10.0, 2.0),
        ] {
            assert!(agg.ingest(bad).is_err());
            assert_eq!(agg.window(), window);
            assert_eq!(agg.average(), average);
            assert_eq!(agg.markers(), markers.as_slice());
            assert_eq!(agg.summary(), summary);
        }
    }

    #[test]
    fn out_of_order_sample_is_reported() {
        let mut agg = aggregator(3);
        agg.ingest(Sample::new(10.0, 10.0, 0.0)).unwrap();
        let err = agg.ingest(Sample::new(9.0, 10.0, 0.0)).unwrap_err();
        assert!(matches!(err, TreadError::OutOfOrder { previous, got } if previous == 10.0 && got == 9.0));
        // Same timestamp is allowed.
        assert!(agg.ingest(Sample::new(10.0, 11.0, 0.0)).is_ok());
    }

    #[test]
    fn second_slower_lap_is_marked_slower() {
        let mut agg = aggregator(60);
        let first = agg
            .ingest_with_laps(Sample::new(360.0, 10.0, 1.0), &[lap(10.0)])
            .unwrap()
            .new_marker
            .unwrap();
        assert_eq!(first.comparison, Comparison::Faster);

        let second = agg
            .ingest_with_laps(Sample::new(740.0, 9.5, 2.0), &[lap(10.0), lap(9.5)])
            .unwrap()
            .new_marker
            .unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.average_speed, 9.5);
        assert_eq!(second.comparison, Comparison::Slower);
    }

    #[test]
    fn equal_laps_are_marked_equal() {
        let mut agg = aggregator(60);
        agg.ingest_with_laps(Sample::new(1.0, 10.0, 1.0), &[lap(10.0)]).unwrap();
        let m = agg
            .ingest_with_laps(Sample::new(2.0, 10.0, 2.0), &[lap(10.0), lap(10.0)])
            .unwrap()
            .new_marker
            .unwrap();
        assert_eq!(m.comparison, Comparison::Equal);
    }

    #[test]
    fn markers_grow_by_one_per_boundary() {
        let mut agg = aggregator(10);
        let mut previous = 0;
        for step in 0..=40 {
            let distance = f64::from(step) * 0.1;
            agg.ingest(Sample::new(f64::from(step) * 36.0, 10.0, distance)).unwrap();
            let now = agg.markers().len();
            assert!(now == previous || now == previous + 1);
            previous = now;
        }
        assert_eq!(previous, 4);
        let indices: Vec<usize> = agg.markers().iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn markers_survive_window_eviction() {
        let mut agg = aggregator(2);
        for step in 0..30 {
            agg.ingest(Sample::new(f64::from(step), 12.0, f64::from(step) * 0.1)).unwrap();
        }
        assert_eq!(agg.window().len(), 2);
        assert_eq!(agg.markers().len(), 2);
    }

    #[test]
    fn reset_returns_to_empty() {
        let mut agg = aggregator(3);
        assert_eq!(agg.state(), AggregatorState::Empty);
        agg.ingest(Sample::new(5.0, 10.0, 1.2)).unwrap();
        assert_eq!(agg.state(), AggregatorState::Active);
        assert_eq!(agg.markers().len(), 1);

        agg.reset();
        assert_eq!(agg.state(), AggregatorState::Empty);
        assert!(agg.window().is_empty());
        assert_eq!(agg.average(), None);
        assert!(agg.markers().is_empty());
        assert_eq!(agg.summary(), SessionSummary::default());

        // Elapsed ordering starts over with the new session.
        assert!(agg.ingest(Sample::new(0.0, 8.0, 0.0)).is_ok());
    }

    #[test]
    fn display_average_rounds_to_one_decimal() {
        let mut agg = aggregator(3);
        agg.ingest(Sample::new(0.0, 10.0, 0.0)).unwrap();
        agg.ingest(Sample::new(1.0, 10.0, 0.0)).unwrap();
        let out = agg.ingest(Sample::new(2.0, 10.5, 0.0)).unwrap();
        assert!((out.average - 10.166_666).abs() < 1e-5);
        assert_eq!(out.average_display(), 10.2);
    }
}
