// Process-lifetime ingestion counters.
//
// Written only by the ingestion path, read by the broadcaster every tick and
// once more at shutdown. Every field is its own atomic: a snapshot may mix
// values from either side of a concurrent increment, which is fine for
// rates and totals that are only ever displayed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use ltm_events::Channel;

#[derive(Debug)]
pub struct Counters {
    per_channel: [AtomicU64; Channel::COUNT],
    total: AtomicU64,
    checksum_errors: AtomicU64,
    unknown_kind_errors: AtomicU64,
    decode_errors: AtomicU64,
    started: Instant,
}

/// Point-in-time copy of [`Counters`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CountersSnapshot {
    pub uptime: Duration,
    pub per_channel: [u64; Channel::COUNT],
    pub total: u64,
    pub checksum_errors: u64,
    pub unknown_kind_errors: u64,
    pub decode_errors: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

impl Counters {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            per_channel: std::array::from_fn(|_| AtomicU64::new(0)),
            total: AtomicU64::new(0),
            checksum_errors: AtomicU64::new(0),
            unknown_kind_errors: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            started,
        }
    }

    /// Counts one successfully decoded frame.
    #[inline]
    pub fn record_frame(&self, channel: Channel) {
        self.per_channel[channel.index()].fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_checksum_error(&self) {
        self.checksum_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_unknown_kind(&self) {
        self.unknown_kind_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            uptime: self.started.elapsed(),
            per_channel: std::array::from_fn(|i| self.per_channel[i].load(Ordering::Relaxed)),
            total: self.total.load(Ordering::Relaxed),
            checksum_errors: self.checksum_errors.load(Ordering::Relaxed),
            unknown_kind_errors: self.unknown_kind_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

/// Frames counted between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CountersDelta {
    pub elapsed: Duration,
    pub per_channel: [u64; Channel::COUNT],
    pub total: u64,
}

impl CountersSnapshot {
    /// Seconds since start, fractional.
    pub fn uptime_sec(&self) -> f64 {
        self.uptime.as_secs_f64()
    }

    /// What changed since `earlier`. Saturates if `earlier` is actually the
    /// later of the two.
    pub fn delta_since(&self, earlier: &CountersSnapshot) -> CountersDelta {
        CountersDelta {
            elapsed: self.uptime.saturating_sub(earlier.uptime),
            per_channel: std::array::from_fn(|i| {
                self.per_channel[i].saturating_sub(earlier.per_channel[i])
            }),
            total: self.total.saturating_sub(earlier.total),
        }
    }

    /// Frames per second averaged over the whole uptime; 0 before any time
    /// has elapsed.
    pub fn fps(&self) -> f64 {
        per_second(self.total, self.uptime)
    }

    pub fn channel(&self, channel: Channel) -> u64 {
        self.per_channel[channel.index()]
    }
}

impl CountersDelta {
    pub fn channel(&self, channel: Channel) -> u64 {
        self.per_channel[channel.index()]
    }

    /// Frames per second on `channel` over the window; 0 for an empty window.
    pub fn hz(&self, channel: Channel) -> f64 {
        per_second(self.channel(channel), self.elapsed)
    }

    pub fn total_hz(&self) -> f64 {
        per_second(self.total, self.elapsed)
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}
