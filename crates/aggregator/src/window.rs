use std::collections::VecDeque;
use tread_core::Sample;

/// Rolling history of samples, the data behind the live speed chart.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl SampleWindow {
    /// `capacity` must be at least 1; the aggregator validates this.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting and returning the oldest if at capacity.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() >= self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Mean speed of all samples in the window.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.speed_kmh).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Owned copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t: f64, speed: f64) -> Sample {
        Sample::new(t, speed, 0.0)
    }

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut w = SampleWindow::new(2);
        assert_eq!(w.push(at(0.0, 8.0)), None);
        assert_eq!(w.push(at(1.0, 9.0)), None);
        let evicted = w.push(at(2.0, 10.0)).unwrap();
        assert_eq!(evicted.speed_kmh, 8.0);
        let speeds: Vec<f64> = w.iter().map(|s| s.speed_kmh).collect();
        assert_eq!(speeds, vec![9.0, 10.0]);
    }

    #[test]
    fn average_of_empty_window_is_none() {
        let w = SampleWindow::new(4);
        assert_eq!(w.average(), None);
    }

    #[test]
    fn average_tracks_contents() {
        let mut w = SampleWindow::new(3);
        for (i, v) in [3.0, 6.0, 9.0, 12.0].into_iter().enumerate() {
            w.push(at(i as f64, v));
        }
        assert_eq!(w.average(), Some(9.0));
    }
}
