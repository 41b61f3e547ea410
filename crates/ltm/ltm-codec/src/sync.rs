//! Push-style frame synchronizer for an unframed LTM byte stream.
//!
//! # States
//!
//! ```text
//!            '$'              'T'             kind ok
//!   Idle ─────────► Header1 ─────────► Header2 ─────────► Payload ──(len reached)──► Checksum
//!    ▲   ◄───────── │  ▲ '$'            │                                             │
//!    │    other     └──┘                │ unknown kind                                │ any byte
//!    └──────────────────────────────────┴─────────────── rescan(byte) ◄───────────────┘
//! ```
//!
//! `rescan(byte)` goes to `Header1` when the byte is `'$'`, otherwise to `Idle`.
//! The byte that ends a frame (checksum) or rejects one (unknown kind) is
//! therefore looked at twice, once as the end of the old candidate and once
//! as a possible start of the next. A header byte buried in a corrupted
//! frame is not lost that way.
//!
//! Framing depends only on the bytes seen: there are no timeouts, and the
//! resulting event sequence is the same however the input is chunked.

use ltm_events::{FrameKind, HEADER_1, HEADER_2, MAX_PAYLOAD_LEN, RawFrame};

use crate::checksum::xor_checksum;
use crate::error::SyncError;

/// Output of one byte of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    Frame(RawFrame),
    Error(SyncError),
}

/// Receiver for synchronizer output, used by [`FrameSync::feed`].
pub trait FrameSink {
    fn on_frame(&mut self, frame: RawFrame);
    fn on_error(&mut self, error: SyncError);
}

/// Collects events in arrival order.
impl FrameSink for Vec<SyncEvent> {
    fn on_frame(&mut self, frame: RawFrame) {
        self.push(SyncEvent::Frame(frame));
    }

    fn on_error(&mut self, error: SyncError) {
        self.push(SyncEvent::Error(error));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Header1,
    Header2,
    Payload(FrameKind),
    Checksum(FrameKind),
}

/// Byte-at-a-time LTM frame synchronizer.
///
/// Holds at most one partial frame. Not `Sync`-shared: the ingestion path
/// owns it and feeds it in arrival order.
#[derive(Debug, Clone)]
pub struct FrameSync {
    state: State,
    buf: [u8; MAX_PAYLOAD_LEN],
    len: usize,
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSync {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            buf: [0u8; MAX_PAYLOAD_LEN],
            len: 0,
        }
    }

    /// Drops any partially accumulated frame and returns to scanning.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.len = 0;
    }

    /// True while between a header and a checksum.
    pub fn in_frame(&self) -> bool {
        !matches!(self.state, State::Idle | State::Header1)
    }

    /// Advances by one byte. At most one event results from any byte.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Option<SyncEvent> {
        match self.state {
            State::Idle => {
                self.rescan(byte);
                None
            }
            State::Header1 => {
                self.state = match byte {
                    HEADER_2 => State::Header2,
                    HEADER_1 => State::Header1,
                    _ => State::Idle,
                };
                None
            }
            State::Header2 => match FrameKind::from_tag(byte) {
                Some(kind) => {
                    self.len = 0;
                    self.state = State::Payload(kind);
                    None
                }
                None => {
                    self.rescan(byte);
                    Some(SyncEvent::Error(SyncError::UnknownKind(byte)))
                }
            },
            State::Payload(kind) => {
                self.buf[self.len] = byte;
                self.len += 1;
                if self.len == kind.payload_len() {
                    self.state = State::Checksum(kind);
                }
                None
            }
            State::Checksum(kind) => {
                let payload = &self.buf[..self.len];
                let expected = xor_checksum(payload);
                let event = if byte == expected {
                    RawFrame::new(kind, payload).map(SyncEvent::Frame)
                } else {
                    Some(SyncEvent::Error(SyncError::ChecksumMismatch {
                        kind,
                        expected,
                        actual: byte,
                    }))
                };
                self.len = 0;
                self.rescan(byte);
                event
            }
        }
    }

    /// Feeds a chunk, delivering every resulting event to `sink` in order.
    pub fn feed<S: FrameSink + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) {
        for &b in bytes {
            match self.push(b) {
                Some(SyncEvent::Frame(frame)) => sink.on_frame(frame),
                Some(SyncEvent::Error(err)) => sink.on_error(err),
                None => {}
            }
        }
    }

    #[inline]
    fn rescan(&mut self, byte: u8) {
        self.state = if byte == HEADER_1 {
            State::Header1
        } else {
            State::Idle
        };
    }
}
