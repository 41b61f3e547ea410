#![forbid(unsafe_code)]

pub mod frame;
pub mod names;
pub mod records;

pub use frame::{FrameKind, HEADER_1, HEADER_2, MAX_PAYLOAD_LEN, RawFrame};
pub use records::{
    AttitudeRecord, Channel, DecodedRecord, ExtraRecord, GpsRecord, NavRecord, OriginRecord,
    StatusRecord,
};
