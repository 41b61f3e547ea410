// Ticked broadcaster: snapshot + counters -> one JSON document -> every
// subscriber.
//
// The document is serialized once per tick into an `Arc<str>`; subscribers
// share it. Delivery is `Fanout::publish`, which never blocks, so a slow
// subscriber costs itself ticks and nobody else anything.

use std::sync::Arc;
use std::time::Duration;

use station_core::{Counters, Shutdown, TelemetryStore, now_ms};
use station_icc::{Fanout, PublishReport};
use tracing::{debug, info, trace, warn};

use crate::message::TelemetryMessage;

/// One serialized tick, shared by every subscriber queue.
pub type FeedPayload = Arc<str>;

pub struct Broadcaster {
    store: Arc<TelemetryStore>,
    counters: Arc<Counters>,
    fanout: Arc<Fanout<FeedPayload>>,
    interval: Duration,
}

impl Broadcaster {
    pub fn new(
        store: Arc<TelemetryStore>,
        counters: Arc<Counters>,
        fanout: Arc<Fanout<FeedPayload>>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            counters,
            fanout,
            interval,
        }
    }

    /// Builds the current message without publishing it.
    pub fn build(&self) -> TelemetryMessage {
        TelemetryMessage::build(now_ms(), &self.store.snapshot(), &self.counters.snapshot())
    }

    /// One broadcast cycle.
    pub fn tick(&self) -> Result<PublishReport, serde_json::Error> {
        let payload: FeedPayload = Arc::from(self.build().to_json()?);
        let report = self.fanout.publish(payload);
        if report.dropped > 0 || report.disconnected > 0 {
            trace!(
                delivered = report.delivered,
                dropped = report.dropped,
                disconnected = report.disconnected,
                "tick"
            );
        }
        Ok(report)
    }

    /// Ticks every `interval` until `shutdown` is triggered.
    ///
    /// A tick that would have fired while the previous one was still running
    /// is skipped, not queued.
    pub fn run(&self, shutdown: &Shutdown) {
        let ticker = crossbeam_channel::tick(self.interval);
        info!(interval_ms = self.interval.as_millis() as u64, "broadcaster started");

        let mut ticks = 0u64;
        while !shutdown.is_triggered() {
            if ticker.recv().is_err() {
                break;
            }
            if shutdown.is_triggered() {
                break;
            }
            match self.tick() {
                Ok(_) => ticks += 1,
                Err(e) => warn!(error = %e, "failed to serialize telemetry message"),
            }
        }

        debug!(ticks, "broadcaster stopped");
    }
}
