use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock nanoseconds since the Unix epoch. A clock set before 1970
/// reads as 0.
#[inline(always)]
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

#[inline(always)]
pub fn now_ms() -> u64 {
    ns_to_ms(now_ns())
}

#[inline(always)]
pub const fn ns_to_ms(ns: u64) -> u64 {
    ns / 1_000_000
}
