use ltm_events::FrameKind;

/// Framing fault reported by the synchronizer. Never fatal: the
/// synchronizer has already resynchronized by the time this is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("unknown frame kind 0x{0:02X}")]
    UnknownKind(u8),

    #[error("checksum mismatch on {kind:?} frame (expected 0x{expected:02X}, got 0x{actual:02X})")]
    ChecksumMismatch {
        kind: FrameKind,
        expected: u8,
        actual: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{kind:?} payload too short ({len} < {need})")]
    ShortPayload {
        kind: FrameKind,
        len: usize,
        need: usize,
    },

    #[error("unknown frame kind 0x{0:02X}")]
    UnknownKind(u8),
}
