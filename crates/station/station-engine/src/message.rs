// The JSON document each subscriber receives once per tick.
//
// A channel that was never populated is left out entirely, together with
// its `_ts` sibling. A present channel whose fields happen to be zero is
// still emitted, so the two cases stay distinguishable on the wire.

use ltm_events::{AttitudeRecord, ExtraRecord, GpsRecord, NavRecord, OriginRecord, StatusRecord};
use serde::Serialize;
use station_core::timestamp::ns_to_ms;
use station_core::{CountersSnapshot, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryMessage {
    /// Build time, epoch ms.
    pub ts: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attitude: Option<AttitudeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attitude_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<OriginRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav: Option<NavRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nav_ts: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_ts: Option<u64>,

    pub stats: StatsPayload,
}

/// Counters as subscribers see them.
///
/// Unknown-kind framing errors are not part of it; they are only counted
/// locally and reported in the shutdown summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsPayload {
    /// Seconds since start, fractional.
    pub uptime_sec: f64,
    pub total: u64,
    pub fps: f64,
    /// Checksum mismatches only.
    pub crc_errors: u64,
    pub decode_errors: u64,
}

impl From<&CountersSnapshot> for StatsPayload {
    fn from(c: &CountersSnapshot) -> Self {
        Self {
            uptime_sec: c.uptime_sec(),
            total: c.total,
            fps: c.fps(),
            crc_errors: c.checksum_errors,
            decode_errors: c.decode_errors,
        }
    }
}

fn split<R>(entry: Option<(R, u64)>) -> (Option<R>, Option<u64>) {
    match entry {
        Some((record, ns)) => (Some(record), Some(ns_to_ms(ns))),
        None => (None, None),
    }
}

impl TelemetryMessage {
    pub fn build(ts_ms: u64, snap: &Snapshot, counters: &CountersSnapshot) -> Self {
        let (gps, gps_ts) = split(snap.gps());
        let (attitude, attitude_ts) = split(snap.attitude());
        let (status, status_ts) = split(snap.status());
        let (origin, origin_ts) = split(snap.origin());
        let (nav, nav_ts) = split(snap.nav());
        let (extra, extra_ts) = split(snap.extra());

        Self {
            ts: ts_ms,
            gps,
            gps_ts,
            attitude,
            attitude_ts,
            status,
            status_ts,
            origin,
            origin_ts,
            nav,
            nav_ts,
            extra,
            extra_ts,
            stats: StatsPayload::from(counters),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
