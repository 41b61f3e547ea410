//! Shared fixtures for the benchmarks.

use ltm_codec::encode_frame;
use ltm_events::{AttitudeRecord, DecodedRecord, FrameKind, RawFrame};

/// A plausible payload for `kind`: non-zero, every byte distinct.
pub fn sample_payload(kind: FrameKind) -> Vec<u8> {
    (0..kind.payload_len() as u8)
        .map(|i| i.wrapping_mul(29).wrapping_add(kind.tag()))
        .collect()
}

pub fn sample_frame(kind: FrameKind) -> RawFrame {
    RawFrame::new(kind, &sample_payload(kind)).expect("payload fits")
}

/// Mix resembling a real INAV downlink: attitude dominates, the rest
/// trickles in.
pub const DOWNLINK_MIX: [FrameKind; 10] = [
    FrameKind::Attitude,
    FrameKind::Attitude,
    FrameKind::Attitude,
    FrameKind::Attitude,
    FrameKind::Gps,
    FrameKind::Attitude,
    FrameKind::Status,
    FrameKind::Attitude,
    FrameKind::Nav,
    FrameKind::Extra,
];

/// `frames` frames of [`DOWNLINK_MIX`] back to back. Every `noise_every`-th
/// frame (0 = never) gets a corrupted checksum and a junk byte in front.
pub fn downlink_stream(frames: usize, noise_every: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(frames * 12);
    for i in 0..frames {
        let kind = DOWNLINK_MIX[i % DOWNLINK_MIX.len()];
        let mut f = encode_frame(kind, &sample_payload(kind));
        if noise_every != 0 && i % noise_every == noise_every - 1 {
            out.push(0xA5);
            let last = f.len() - 1;
            f[last] ^= 0x5A;
        }
        out.extend(f);
    }
    out
}

pub fn attitude(v: i16) -> DecodedRecord {
    DecodedRecord::Attitude(AttitudeRecord {
        pitch: v,
        roll: v,
        heading: v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltm_codec::{FrameSync, SyncEvent};

    #[test]
    fn noisy_stream_has_expected_error_count() {
        let bytes = downlink_stream(100, 10);
        let mut sync = FrameSync::new();
        let mut events = Vec::new();
        sync.feed(&bytes, &mut events);
        let errors = events
            .iter()
            .filter(|e| matches!(e, SyncEvent::Error(_)))
            .count();
        assert_eq!(errors, 10);
        assert_eq!(events.len(), 100);
    }
}
