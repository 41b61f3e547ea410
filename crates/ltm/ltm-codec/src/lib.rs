//! LTM wire handling: byte-stream synchronization, checksum, payload decoding.
//!
//! Bytes flow through [`FrameSync`] into [`RawFrame`](ltm_events::RawFrame)s,
//! which [`decode`] turns into typed [`DecodedRecord`](ltm_events::DecodedRecord)s.

mod checksum;
mod decode;
mod encode;
mod error;
mod sync;

pub use checksum::xor_checksum;
pub use decode::{decode, decode_payload, decode_tagged};
pub use encode::encode_frame;
pub use error::{DecodeError, SyncError};
pub use sync::{FrameSink, FrameSync, SyncEvent};
