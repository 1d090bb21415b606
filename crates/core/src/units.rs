use crate::error::{Result, TreadError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Running pace, stored as whole seconds per kilometre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pace {
    secs_per_km: u32,
}

impl Pace {
    /// Belt stopped.
    pub const ZERO: Self = Self { secs_per_km: 0 };

    pub fn from_secs_per_km(secs_per_km: u32) -> Self {
        Self { secs_per_km }
    }

    #[must_use]
    pub fn secs_per_km(self) -> u32 {
        self.secs_per_km
    }

    /// Pace for a belt speed in km/h. Zero or invalid speeds read `0:00`.
    ///
    /// Minutes and seconds are truncated separately, so 7.0 km/h is `8:34`.
    pub fn from_speed(kmh: f64) -> Self {
        if !kmh.is_finite() || kmh <= 0.0 {
            return Self::ZERO;
        }
        let minutes = 60.0 / kmh;
        let whole = minutes.trunc();
        let secs = ((minutes - whole) * 60.0).trunc();
        // Crawling speeds saturate instead of overflowing.
        let total = (whole * 60.0 + secs).min(f64::from(u32::MAX));
        Self {
            secs_per_km: total as u32,
        }
    }

    /// Pace from fractional minutes per kilometre (e.g. `5.5` → `5:30`).
    pub fn from_minutes(minutes: f64) -> Result<Self> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(TreadError::InvalidSample(format!(
                "pace must be a non-negative number of minutes, got {minutes}"
            )));
        }
        Ok(Self {
            secs_per_km: (minutes * 60.0).round() as u32,
        })
    }
}

impl FromStr for Pace {
    type Err = TreadError;

    /// Accepts `m:ss` / `mm:ss`, or a bare number of minutes.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || TreadError::InvalidSample(format!("unparseable pace '{s}'"));

        let Some((min, sec)) = s.split_once(':') else {
            return s.parse::<f64>().map_err(|_| invalid()).and_then(Self::from_minutes);
        };

        let min: u32 = min.trim().parse().map_err(|_| invalid())?;
        let sec: u32 = sec.trim().parse().map_err(|_| invalid())?;
        if sec >= 60 {
            return Err(invalid());
        }
        let secs_per_km = min
            .checked_mul(60)
            .and_then(|m| m.checked_add(sec))
            .ok_or_else(invalid)?;
        Ok(Self { secs_per_km })
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.secs_per_km / 60, self.secs_per_km % 60)
    }
}

/// Format a duration as `hh:mm:ss`, or `mm:ss` when `show_hours` is false.
pub fn format_duration(secs: u64, show_hours: bool) -> String {
    if show_hours {
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_from_speed_truncates() {
        assert_eq!(Pace::from_speed(12.0).to_string(), "5:00");
        assert_eq!(Pace::from_speed(7.0).to_string(), "8:34");
        assert_eq!(Pace::from_speed(0.0), Pace::ZERO);
        assert_eq!(Pace::from_speed(-3.0), Pace::ZERO);
    }

    #[test]
    fn pace_parses_clock_and_minutes() {
        assert_eq!("5:07".parse::<Pace>().unwrap().secs_per_km(), 307);
        assert_eq!("12:00".parse::<Pace>().unwrap().secs_per_km(), 720);
        assert_eq!("5.5".parse::<Pace>().unwrap().to_string(), "5:30");
    }

    #[test]
    fn pace_rejects_garbage() {
        assert!("fast".parse::<Pace>().is_err());
        assert!("5:75".parse::<Pace>().is_err());
        assert!("-4".parse::<Pace>().is_err());
    }

    #[test]
    fn crawling_speed_saturates() {
        assert_eq!(Pace::from_speed(1e-9).secs_per_km(), u32::MAX);
        assert_eq!(Pace::from_speed(f64::MIN_POSITIVE).secs_per_km(), u32::MAX);
    }

    #[test]
    fn huge_minutes_field_is_rejected() {
        assert!(matches!(
            "99999999:00".parse::<Pace>(),
            Err(TreadError::InvalidSample(_))
        ));
        assert_eq!("71582788:15".parse::<Pace>().unwrap().secs_per_km(), u32::MAX);
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(3725, true), "01:02:05");
        assert_eq!(format_duration(0, true), "00:00:00");
        assert_eq!(format_duration(305, false), "05:05");
    }
}
