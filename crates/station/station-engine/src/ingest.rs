// Ingestion path: bytes -> FrameSync -> decode -> TelemetryStore.
//
// Strictly sequential. Arrival order is decode order, and nothing in here
// touches the network or waits on a subscriber.

use std::io::{self, ErrorKind, Read};
use std::sync::Arc;

use ltm_codec::{FrameSink, FrameSync, SyncError, decode};
use ltm_events::{DecodedRecord, NavRecord, RawFrame, StatusRecord, names};
use station_core::{Counters, Shutdown, TelemetryStore, now_ns};
use tracing::{debug, info, warn};

/// Frame sink that decodes into the store and keeps the counters.
pub struct TelemetryRecorder {
    store: Arc<TelemetryStore>,
    counters: Arc<Counters>,
    last_status: Option<StatusRecord>,
    last_nav: Option<NavRecord>,
}

impl TelemetryRecorder {
    pub fn new(store: Arc<TelemetryStore>, counters: Arc<Counters>) -> Self {
        Self {
            store,
            counters,
            last_status: None,
            last_nav: None,
        }
    }

    pub fn store(&self) -> &Arc<TelemetryStore> {
        &self.store
    }

    pub fn counters(&self) -> &Arc<Counters> {
        &self.counters
    }

    fn log_status_transitions(&mut self, now: &StatusRecord) {
        let prev = self.last_status.replace(*now);
        let mode = names::flight_mode_name(now.flight_mode).unwrap_or("?");

        let Some(prev) = prev else {
            info!(
                armed = now.armed,
                failsafe = now.failsafe,
                mode,
                "first status frame"
            );
            return;
        };

        if prev.armed != now.armed {
            info!(mode, "{}", if now.armed { "armed" } else { "disarmed" });
        }
        if prev.failsafe != now.failsafe {
            if now.failsafe {
                warn!(mode, "failsafe engaged");
            } else {
                info!(mode, "failsafe cleared");
            }
        }
        if prev.flight_mode != now.flight_mode {
            let from = names::flight_mode_name(prev.flight_mode).unwrap_or("?");
            info!(from, to = mode, code = now.flight_mode, "flight mode changed");
        }
    }

    fn log_nav_transitions(&mut self, now: &NavRecord) {
        let prev = self.last_nav.replace(*now);
        let gps = names::gps_mode_name(now.gps_mode).unwrap_or("?");
        let nav = names::nav_mode_name(now.nav_mode).unwrap_or("?");
        let action = names::nav_action_name(now.nav_action).unwrap_or("?");
        let error = names::nav_error_name(now.nav_error).unwrap_or("?");

        let Some(prev) = prev else {
            info!(gps, nav, action, error, "first nav frame");
            return;
        };

        if prev.gps_mode != now.gps_mode {
            let from = names::gps_mode_name(prev.gps_mode).unwrap_or("?");
            info!(from, to = gps, "gps mode changed");
        }
        if prev.nav_mode != now.nav_mode {
            let from = names::nav_mode_name(prev.nav_mode).unwrap_or("?");
            info!(
                from,
                to = nav,
                action,
                waypoint = now.waypoint_num,
                "nav mode changed"
            );
        }
        if prev.nav_error != now.nav_error {
            if now.nav_error == 0 {
                info!(error, "nav error cleared");
            } else {
                warn!(code = now.nav_error, error, "nav error");
            }
        }
    }
}

impl FrameSink for TelemetryRecorder {
    fn on_frame(&mut self, frame: RawFrame) {
        let record = match decode(&frame) {
            Ok(record) => record,
            Err(err) => {
                self.counters.record_decode_error();
                warn!(error = %err, "dropping undecodable frame");
                return;
            }
        };

        match &record {
            DecodedRecord::Status(status) => self.log_status_transitions(status),
            DecodedRecord::Nav(nav) => self.log_nav_transitions(nav),
            _ => {}
        }

        self.store.update(record, now_ns());
        self.counters.record_frame(record.channel());
    }

    fn on_error(&mut self, error: SyncError) {
        match error {
            SyncError::ChecksumMismatch { .. } => self.counters.record_checksum_error(),
            SyncError::UnknownKind(_) => self.counters.record_unknown_kind(),
        }
        debug!(%error, "framing error");
    }
}

/// Owns the synchronizer and its sink for one byte source.
pub struct Ingestor {
    sync: FrameSync,
    recorder: TelemetryRecorder,
}

impl Ingestor {
    pub fn new(store: Arc<TelemetryStore>, counters: Arc<Counters>) -> Self {
        Self {
            sync: FrameSync::new(),
            recorder: TelemetryRecorder::new(store, counters),
        }
    }

    #[inline]
    pub fn feed(&mut self, bytes: &[u8]) {
        self.sync.feed(bytes, &mut self.recorder);
    }

    /// Discards any partial frame, e.g. after the source reconnects.
    pub fn reset(&mut self) {
        if self.sync.in_frame() {
            debug!("discarding partial frame");
        }
        self.sync.reset();
    }

    pub fn recorder(&self) -> &TelemetryRecorder {
        &self.recorder
    }
}

/// Why [`run_ingest`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestEnd {
    Eof,
    Shutdown,
}

/// Reads `reader` in chunks of up to `chunk` bytes into `ingestor` until EOF
/// or shutdown.
///
/// Read timeouts and interrupts are retried after checking `shutdown`, so a
/// source with a read timeout bounds how long shutdown takes to be noticed.
/// Any other I/O error ends ingestion and is returned.
pub fn run_ingest<R: Read>(
    mut reader: R,
    ingestor: &mut Ingestor,
    shutdown: &Shutdown,
    chunk: usize,
) -> io::Result<IngestEnd> {
    let mut buf = vec![0u8; chunk.max(1)];
    let mut bytes_in = 0u64;

    let end = loop {
        if shutdown.is_triggered() {
            break IngestEnd::Shutdown;
        }
        match reader.read(&mut buf) {
            Ok(0) => break IngestEnd::Eof,
            Ok(n) => {
                bytes_in += n as u64;
                ingestor.feed(&buf[..n]);
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(e) => return Err(e),
        }
    };

    // A partial frame at the end of input is never resumed.
    ingestor.reset();
    info!(?end, bytes_in, "ingest stopped");
    Ok(end)
}
