use crate::wire::{parse_record, SseDecoder};
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tread_config::{SourceConfig, SourceMode};
use tread_core::{Message, Result, Telemetry, TreadError};

/// HTTP client for the treadmill backend.
///
/// Delivers records either by polling the JSON endpoint or by following the
/// server-sent event stream, and forwards them as [`Message`]s. Failures are
/// reported as `Message::SourceError` and retried; the consumer never has to
/// restart the source.
pub struct TelemetrySource {
    client: Client,
    config: SourceConfig,
}

impl TelemetrySource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TreadError::Source(format!("http client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Endpoint this source reads from.
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Spawn the background task for the configured mode.
    ///
    /// The task stops automatically when the receiver is dropped.
    pub fn spawn(self) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(16);

        match self.config.mode {
            SourceMode::Poll => {
                tokio::spawn(poll_loop(self, tx));
            }
            SourceMode::Stream => {
                tokio::spawn(stream_loop(self, tx));
            }
        }

        rx
    }

    /// Fetch a single record from the JSON endpoint.
    pub async fn fetch_once(&self) -> Result<Telemetry> {
        let url = self.endpoint();
        let body = self
            .client
            .get(&url)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TreadError::Source(format!("GET {url}: {e}")))?
            .text()
            .await
            .map_err(|e| TreadError::Source(format!("read {url}: {e}")))?;

        parse_record(&body)
    }
}

async fn poll_loop(source: TelemetrySource, tx: mpsc::Sender<Message>) {
    let mut ticker = time::interval(Duration::from_millis(source.config.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!("Polling {} every {} ms", source.endpoint(), source.config.interval_ms);

    loop {
        ticker.tick().await;

        let msg = match source.fetch_once().await {
            Ok(record) => Message::Telemetry(Box::new(record)),
            Err(e) => {
                warn!("Failed to fetch treadmill data: {e}");
                Message::SourceError(e.to_string())
            }
        };

        if tx.send(msg).await.is_err() {
            debug!("poll receiver dropped; stopping");
            return;
        }
    }
}

async fn stream_loop(source: TelemetrySource, tx: mpsc::Sender<Message>) {
    let url = source.endpoint();
    let retry = Duration::from_secs(source.config.reconnect_secs);

    loop {
        let outcome = follow_stream(&source.client, &url, &tx).await;

        if tx.is_closed() {
            return; // all receivers dropped
        }

        let reason = match outcome {
            Ok(()) => format!("stream {url} ended"),
            Err(e) => e.to_string(),
        };
        warn!("{reason}; reconnecting in {}s…", retry.as_secs());
        if tx.send(Message::SourceError(reason)).await.is_err() {
            return;
        }

        time::sleep(retry).await;
    }
}

/// Read one stream connection to completion.
async fn follow_stream(client: &Client, url: &str, tx: &mpsc::Sender<Message>) -> Result<()> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| TreadError::Source(format!("connect {url}: {e}")))?;

    info!("Connected to telemetry stream {url}");
    if tx.send(Message::SourceConnected).await.is_err() {
        return Ok(());
    }

    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| TreadError::Source(format!("stream {url}: {e}")))?;

        for payload in decoder.feed(&chunk) {
            let msg = match parse_record(&payload) {
                Ok(record) => Message::Telemetry(Box::new(record)),
                Err(e) => {
                    error!("Dropping malformed stream event: {e}");
                    Message::SourceError(e.to_string())
                }
            };
            if tx.send(msg).await.is_err() {
                return Ok(());
            }
        }
    }

    Ok(())
}
