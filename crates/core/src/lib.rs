pub mod error;
pub mod event;
pub mod state;
pub mod units;

pub use error::{Result, TreadError};
pub use event::Message;
pub use state::{
    Comparison, DashboardState, LapEntry, LapMarker, Limits, PaceField, Sample, SessionSummary,
    Severity, Telemetry,
};
pub use units::{format_duration, Pace};
