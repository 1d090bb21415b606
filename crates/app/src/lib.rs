//! Terminal front end for `treadboard`.
//!
//! Owns the event loop and wires together all background tasks:
//! - Telemetry source (JSON polling or server-sent events)
//! - Config file watcher (live reload on change)
//! - 1-second timer (clock, status line)
//! - Keyboard commands on stdin (`r` = new session, `q` = quit) and Ctrl-C

use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tread_aggregator::{Aggregator, AggregatorConfig};
use tread_config::{load as load_config, ConfigWatcher, DashboardConfig, SourceMode};
use tread_core::{DashboardState, Message, Result, Telemetry, TreadError};
use tread_renderer::DashboardLayout;
use tread_source::TelemetrySource;
use tread_theme::Theme;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Command-line settings that win over the config file, including after reloads.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url:   Option<String>,
    pub mode:  Option<SourceMode>,
    pub plain: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.url {
            config.source.url = url.clone();
        }
        if let Some(mode) = self.mode {
            config.source.mode = mode;
        }
        if self.plain {
            config.display.color = false;
            config.display.clear_screen = false;
        }
    }
}

/// Run the dashboard until Ctrl-C or `q`.
pub async fn run(config_path: PathBuf, config: DashboardConfig, overrides: Overrides) -> Result<()> {
    let mut dashboard = Dashboard::new(config_path.clone(), config, overrides)?;

    let source = TelemetrySource::new(dashboard.config.source.clone())?;
    info!("Reading telemetry from {}", source.endpoint());
    let mut telemetry = source.spawn();

    let (_watcher, mut config_changes) = ConfigWatcher::spawn(&config_path);
    let mut commands = spawn_stdin_commands();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();

    loop {
        let msg = tokio::select! {
            Some(msg) = telemetry.recv() => msg,
            Some(()) = config_changes.recv() => Message::ConfigReloaded,
            Some(cmd) = commands.recv() => cmd,
            _ = ticker.tick() => Message::Tick,
            _ = &mut ctrl_c => Message::Shutdown,
        };

        let shutdown = matches!(msg, Message::Shutdown);

        if let Some(frame) = dashboard.update(msg) {
            stdout.write_all(frame.as_bytes())?;
            stdout.flush()?;
        }

        if shutdown {
            break;
        }
    }

    Ok(())
}

/// Map stdin lines to session commands. The task ends at EOF.
fn spawn_stdin_commands() -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let msg = match line.trim() {
                "r" | "reset" => Message::Reset,
                "q" | "quit" => Message::Shutdown,
                "" => continue,
                other => {
                    debug!("ignoring unknown command '{other}'");
                    continue;
                }
            };
            if tx.send(msg).await.is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}

fn aggregator_config(config: &DashboardConfig) -> AggregatorConfig {
    AggregatorConfig {
        capacity:        config.window.capacity,
        lap_distance_km: config.laps.distance_km,
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

/// Dashboard model: the aggregator plus everything the panels read.
pub struct Dashboard {
    state:       DashboardState,
    config:      DashboardConfig,
    config_path: PathBuf,
    overrides:   Overrides,
    theme:       Theme,
    layout:      DashboardLayout,
    aggregator:  Aggregator,
    /// Set once the restart hint has been logged for the current stall.
    restart_hinted: bool,
}

impl Dashboard {
    pub fn new(
        config_path: PathBuf,
        mut config: DashboardConfig,
        overrides: Overrides,
    ) -> Result<Self> {
        overrides.apply(&mut config);
        let aggregator = Aggregator::new(aggregator_config(&config))?;
        let state = DashboardState {
            limits: config.limits,
            ..DashboardState::default()
        };

        Ok(Self {
            state,
            theme: Theme::from_config(&config.theme, &config.display),
            layout: DashboardLayout::from_config(&config),
            config,
            config_path,
            overrides,
            aggregator,
            restart_hinted: false,
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Current frame.
    pub fn view(&self) -> String {
        self.layout.render(&self.state, &self.theme)
    }

    // ── Update ────────────────────────────────────────────────────────────────

    /// Apply one message; returns a fresh frame when something visible changed.
    pub fn update(&mut self, msg: Message) -> Option<String> {
        match msg {
            Message::Telemetry(record) => self.on_telemetry(*record),
            Message::SourceConnected => {
                self.state.connected = true;
                self.state.source_error = None;
            }
            Message::SourceError(e) => {
                self.state.connected = false;
                self.state.source_error = Some(e);
            }
            Message::ConfigReloaded => self.reload_config(),
            Message::Reset => self.reset(),
            Message::Tick => {
                self.state.time = Local::now();
            }
            Message::Shutdown => {
                let s = self.aggregator.summary();
                let kcal = self.state.latest.as_ref().map_or(0.0, |t| t.energy);
                info!(
                    samples = s.samples,
                    distance_km = s.distance_km,
                    elapsed_s = s.elapsed_s,
                    avg_speed = s.avg_speed,
                    avg_bpm = s.avg_bpm,
                    kcal,
                    laps = self.aggregator.markers().len(),
                    "session finished"
                );
                return None;
            }
        }
        Some(self.view())
    }

    fn on_telemetry(&mut self, record: Telemetry) {
        let sample = match record.to_sample() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("rejected telemetry record: {e}");
                self.state.rejected += 1;
                return;
            }
        };

        let outcome = match self.aggregator.ingest_with_laps(sample, &record.average_speeds) {
            Ok(outcome) => outcome,
            Err(TreadError::OutOfOrder { previous, got }) => {
                if !self.restart_hinted {
                    warn!(
                        "elapsed time went back from {previous}s to {got}s; if the treadmill \
                         started a new workout, type 'r' to start a new session"
                    );
                    self.restart_hinted = true;
                }
                self.state.rejected += 1;
                return;
            }
            Err(_) => {
                // Already logged by the aggregator.
                self.state.rejected += 1;
                return;
            }
        };
        self.restart_hinted = false;

        self.state.window = outcome.window;
        self.state.average = Some(outcome.average);
        if let Some(marker) = outcome.new_marker {
            self.state.markers.push(marker);
        }
        self.state.summary = self.aggregator.summary();
        self.state.limits = record.limits.unwrap_or(self.config.limits);
        self.state.connected = true;
        self.state.source_error = None;
        self.state.latest = Some(record);
    }

    fn reset(&mut self) {
        self.restart_hinted = false;
        // Pending window/lap settings from a reload take effect here.
        match Aggregator::new(aggregator_config(&self.config)) {
            Ok(fresh) => self.aggregator = fresh,
            Err(e) => {
                warn!("keeping previous aggregator sizing: {e}");
                self.aggregator.reset();
            }
        }
        self.state = DashboardState {
            limits: self.config.limits,
            connected: self.state.connected,
            source_error: self.state.source_error.take(),
            ..DashboardState::default()
        };
        info!("New session started");
    }

    fn reload_config(&mut self) {
        let mut cfg = match load_config(&self.config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };
        self.overrides.apply(&mut cfg);

        let sizing_changed = cfg.window.capacity != self.aggregator.capacity()
            || cfg.laps.distance_km != self.aggregator.lap_distance_km();
        if sizing_changed {
            info!("Window and lap settings changed; they apply from the next session");
        }
        if cfg.source != self.config.source {
            warn!("Source settings changed; restart treadboard to apply them");
        }

        self.theme = Theme::from_config(&cfg.theme, &cfg.display);
        self.layout = DashboardLayout::from_config(&cfg);
        if self.state.latest.as_ref().map_or(true, |t| t.limits.is_none()) {
            self.state.limits = cfg.limits;
        }
        self.config = cfg;
        info!("Config reloaded");
    }
}
