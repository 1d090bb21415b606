use tread_core::{Sample, SessionSummary};

/// Session-wide accumulators. Zero readings (belt stopped, strap missing)
/// are left out of the averages.
#[derive(Debug, Clone, Default)]
pub struct SessionTotals {
    samples:     u64,
    speed_sum:   f64,
    speed_count: u64,
    bpm_sum:     f64,
    bpm_count:   u64,
    distance_km: f64,
    elapsed_s:   f64,
}

impl SessionTotals {
    pub fn record(&mut self, sample: &Sample) {
        self.samples += 1;
        if sample.speed_kmh > 0.0 {
            self.speed_sum += sample.speed_kmh;
            self.speed_count += 1;
        }
        if let Some(bpm) = sample.bpm.filter(|&b| b > 0) {
            self.bpm_sum += f64::from(bpm);
            self.bpm_count += 1;
        }
        self.distance_km = sample.distance_km;
        self.elapsed_s = sample.elapsed_s;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            samples:     self.samples,
            distance_km: self.distance_km,
            elapsed_s:   self.elapsed_s,
            avg_speed:   mean(self.speed_sum, self.speed_count),
            avg_bpm:     mean(self.bpm_sum, self.bpm_count),
        }
    }
}

fn mean(sum: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
