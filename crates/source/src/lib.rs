//! Telemetry data sources: JSON polling and server-sent event streaming.

pub mod client;
pub mod wire;

pub use client::TelemetrySource;
pub use wire::{parse_record, SseDecoder};
