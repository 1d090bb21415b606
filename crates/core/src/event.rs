use crate::state::Telemetry;

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Poll / stream data source → `Telemetry`, `SourceConnected`, `SourceError`
/// - Config watcher task       → `ConfigReloaded`
/// - Timer                     → `Tick`
/// - Signal handler            → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Data source ───────────────────────────────────────────────────────────
    /// A fresh telemetry record from the backend.
    Telemetry(Box<Telemetry>),
    /// The stream source (re)connected to the backend.
    SourceConnected,
    /// Transient fetch / stream failure. The aggregator is left untouched.
    SourceError(String),

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk, triggers a live reload.
    ConfigReloaded,

    // ── Session ───────────────────────────────────────────────────────────────
    /// Start a new monitoring session: clears window, average and lap markers.
    Reset,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// One-second timer tick, used to refresh the clock.
    Tick,
    /// Graceful shutdown requested.
    Shutdown,
}
