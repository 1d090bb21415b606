use crate::error::{Result, TreadError};
use crate::units::Pace;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Central dashboard state. Every panel reads from this snapshot.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Most recent accepted telemetry record.
    pub latest: Option<Telemetry>,
    /// Snapshot of the aggregator's rolling window, oldest first.
    pub window: Vec<Sample>,
    /// Mean speed over `window`; `None` before the first sample.
    pub average: Option<f64>,
    /// Lap markers recorded this session, in lap order.
    pub markers: Vec<LapMarker>,
    /// Thresholds in effect (record-supplied limits win over configured ones).
    pub limits: Limits,
    /// Whether the data source currently delivers records.
    pub connected: bool,
    /// Last transient source error, cleared by the next good record.
    pub source_error: Option<String>,
    /// Number of records rejected by the aggregator this session.
    pub rejected: u64,
    /// Whole-session totals.
    pub summary: SessionSummary,
    /// Current local time (updated every second).
    pub time: DateTime<Local>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            latest: None,
            window: Vec::new(),
            average: None,
            markers: Vec::new(),
            limits: Limits::default(),
            connected: false,
            source_error: None,
            rejected: 0,
            summary: SessionSummary::default(),
            time: Local::now(),
        }
    }
}

impl DashboardState {
    /// Severity of the latest speed reading; `Normal` before any data.
    #[must_use]
    pub fn speed_severity(&self) -> Severity {
        self.latest
            .as_ref()
            .map_or(Severity::Normal, |t| self.limits.classify_speed(t.speed))
    }

    /// Severity of the latest heart-rate reading; `Normal` when absent.
    #[must_use]
    pub fn bpm_severity(&self) -> Severity {
        self.latest
            .as_ref()
            .map_or(Severity::Normal, |t| self.limits.classify_bpm(t.heart_rate()))
    }
}

/// One telemetry reading as held by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the session started.
    pub elapsed_s: f64,
    /// Belt speed in km/h.
    pub speed_kmh: f64,
    pub pace: Option<Pace>,
    /// Heart rate; `None` when no strap is paired.
    pub bpm: Option<u32>,
    /// Distance covered so far in km.
    pub distance_km: f64,
}

impl Sample {
    /// Sample with pace derived from speed and no heart rate.
    pub fn new(elapsed_s: f64, speed_kmh: f64, distance_km: f64) -> Self {
        Self {
            elapsed_s,
            speed_kmh,
            pace: Some(Pace::from_speed(speed_kmh)),
            bpm: None,
            distance_km,
        }
    }

    #[must_use]
    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = Some(bpm);
        self
    }
}

/// How a lap's average speed compares to the lap before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Faster,
    Slower,
    Equal,
}

impl Comparison {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Self::Faster
        } else if current < previous {
            Self::Slower
        } else {
            Self::Equal
        }
    }
}

/// A lap boundary recorded by the aggregator. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapMarker {
    /// 1-based lap number.
    pub index: usize,
    /// Average speed over the lap in km/h.
    pub average_speed: f64,
    pub comparison: Comparison,
    /// Elapsed seconds when the boundary was detected.
    pub elapsed_s: f64,
    /// Distance when the boundary was detected.
    pub distance_km: f64,
}

/// Presentation tier for a reading against [`Limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

/// Speed and heart-rate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub speed_yellow: f64,
    pub speed_red: f64,
    pub bpm_yellow: f64,
    pub bpm_red: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            speed_yellow: 10.0,
            speed_red: 12.0,
            bpm_yellow: 120.0,
            bpm_red: 140.0,
        }
    }
}

impl Limits {
    #[must_use]
    pub fn classify_speed(&self, kmh: f64) -> Severity {
        classify(kmh, self.speed_yellow, self.speed_red)
    }

    /// Missing heart rate is never a warning.
    #[must_use]
    pub fn classify_bpm(&self, bpm: Option<u32>) -> Severity {
        bpm.map_or(Severity::Normal, |b| {
            classify(f64::from(b), self.bpm_yellow, self.bpm_red)
        })
    }
}

fn classify(value: f64, yellow: f64, red: f64) -> Severity {
    if value < yellow {
        Severity::Normal
    } else if value < red {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Whole-session totals, independent of the rolling window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Accepted samples since the last reset.
    pub samples: u64,
    pub distance_km: f64,
    pub elapsed_s: f64,
    /// Mean of all positive speed readings, 0 when none.
    pub avg_speed: f64,
    /// Mean of all positive heart-rate readings, 0 when none.
    pub avg_bpm: f64,
}

/// Pace as the backend sends it: usually `"m:ss"`, sometimes plain minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaceField {
    Text(String),
    Minutes(f64),
}

/// One record from `/api/treadmill_data` or the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// km/h
    pub speed: f64,
    #[serde(default)]
    pub pace: Option<PaceField>,
    /// The backend reports 0 when no heart-rate strap is paired.
    #[serde(default)]
    pub bpm: Option<u32>,
    /// kcal
    #[serde(default)]
    pub energy: f64,
    /// km
    pub distance: f64,
    /// Seconds since the belt started.
    pub running_time: f64,
    #[serde(default)]
    pub limits: Option<Limits>,
    /// Completed laps, one entry per kilometre.
    #[serde(default)]
    pub average_speeds: Vec<LapEntry>,
}

impl Telemetry {
    /// Heart rate with the backend's `0` placeholder mapped to `None`.
    #[must_use]
    pub fn heart_rate(&self) -> Option<u32> {
        self.bpm.filter(|&b| b > 0)
    }

    /// Convert the record into an aggregator sample.
    ///
    /// Pace falls back to one derived from speed when the record has none.
    pub fn to_sample(&self) -> Result<Sample> {
        let pace = match &self.pace {
            Some(PaceField::Text(s)) => s.parse::<Pace>()?,
            Some(PaceField::Minutes(m)) => Pace::from_minutes(*m)?,
            None => Pace::from_speed(self.speed),
        };

        Ok(Sample {
            elapsed_s: self.running_time,
            speed_kmh: self.speed,
            pace: Some(pace),
            bpm: self.heart_rate(),
            distance_km: self.distance,
        })
    }
}

/// One completed lap as reported by the backend.
///
/// On the wire this is a positional array:
/// `[lap_time_s, lap_kcal, avg_speed, avg_pace, avg_bpm, elapsed_s?, kcal?]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct LapEntry {
    pub lap_time_s: f64,
    pub lap_kcal: f64,
    pub avg_speed: f64,
    pub avg_pace: String,
    pub avg_bpm: f64,
    /// Session elapsed time when the lap closed.
    pub elapsed_s: Option<f64>,
    /// Session energy when the lap closed.
    pub kcal: Option<f64>,
}

impl TryFrom<Vec<Value>> for LapEntry {
    type Error = TreadError;

    fn try_from(fields: Vec<Value>) -> Result<Self> {
        if fields.len() < 5 {
            return Err(TreadError::Decode(format!(
                "lap entry needs at least 5 fields, got {}",
                fields.len()
            )));
        }

        let num = |i: usize, name: &str| -> Result<f64> {
            fields[i].as_f64().ok_or_else(|| {
                TreadError::Decode(format!("lap field '{name}' is not a number: {}", fields[i]))
            })
        };
        let opt = |i: usize| fields.get(i).and_then(Value::as_f64);

        let avg_pace = match &fields[3] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(TreadError::Decode(format!("lap pace is not text: {other}")));
            }
        };

        Ok(Self {
            lap_time_s: num(0, "lap_time")?,
            lap_kcal: num(1, "lap_kcal")?,
            avg_speed: num(2, "avg_speed")?,
            avg_pace,
            avg_bpm: num(4, "avg_bpm")?,
            elapsed_s: opt(5),
            kcal: opt(6),
        })
    }
}

impl From<LapEntry> for Vec<Value> {
    fn from(lap: LapEntry) -> Self {
        let mut out = vec![
            Value::from(lap.lap_time_s),
            Value::from(lap.lap_kcal),
            Value::from(lap.avg_speed),
            Value::from(lap.avg_pace),
            Value::from(lap.avg_bpm),
        ];
        if let Some(elapsed) = lap.elapsed_s {
            out.push(Value::from(elapsed));
            if let Some(kcal) = lap.kcal {
                out.push(Value::from(kcal));
            }
        }
        out
    }
}
