// Payload decoding. All multi-byte fields are little-endian; signed fields
// are read as signed integers first and only then scaled, so small negative
// values keep their sign.

use ltm_events::{
    AttitudeRecord, DecodedRecord, ExtraRecord, FrameKind, GpsRecord, NavRecord, OriginRecord,
    RawFrame, StatusRecord,
};
use nom::number::complete::{le_i16, le_i32, le_u16, le_u8};
use nom::{Finish, IResult};

use crate::error::DecodeError;

/// Fixed-point degrees (1e-7 deg per LSB).
const DEG_SCALE: f64 = 1e7;
/// Centimeters per meter.
const CM_PER_M: f64 = 100.0;
/// Millivolts per volt.
const MV_PER_V: f64 = 1000.0;
const HDOP_SCALE: f64 = 100.0;

/// Decodes a synchronized frame into its typed record.
pub fn decode(frame: &RawFrame) -> Result<DecodedRecord, DecodeError> {
    decode_payload(frame.kind(), frame.payload())
}

/// Decodes a payload identified by its raw tag byte.
pub fn decode_tagged(tag: u8, payload: &[u8]) -> Result<DecodedRecord, DecodeError> {
    let kind = FrameKind::from_tag(tag).ok_or(DecodeError::UnknownKind(tag))?;
    decode_payload(kind, payload)
}

/// Decodes `payload` as `kind`. Bytes past the kind's length are ignored.
pub fn decode_payload(kind: FrameKind, payload: &[u8]) -> Result<DecodedRecord, DecodeError> {
    let short = DecodeError::ShortPayload {
        kind,
        len: payload.len(),
        need: kind.payload_len(),
    };
    // The synchronizer's table already guarantees the length; checked again
    // because frames can be built by hand.
    if payload.len() < kind.payload_len() {
        return Err(short);
    }

    let parsed = match kind {
        FrameKind::Gps => gps(payload).map(|(rest, r)| (rest, DecodedRecord::Gps(r))),
        FrameKind::Attitude => attitude(payload).map(|(rest, r)| (rest, DecodedRecord::Attitude(r))),
        FrameKind::Status => status(payload).map(|(rest, r)| (rest, DecodedRecord::Status(r))),
        FrameKind::Origin => origin(payload).map(|(rest, r)| (rest, DecodedRecord::Origin(r))),
        FrameKind::Nav => nav(payload).map(|(rest, r)| (rest, DecodedRecord::Nav(r))),
        FrameKind::Extra => extra(payload).map(|(rest, r)| (rest, DecodedRecord::Extra(r))),
    };

    parsed.finish().map(|(_, record)| record).map_err(|_| short)
}

fn gps(p: &[u8]) -> IResult<&[u8], GpsRecord> {
    let (p, lat) = le_i32(p)?;
    let (p, lon) = le_i32(p)?;
    let (p, ground_speed) = le_u8(p)?;
    let (p, altitude_cm) = le_i32(p)?;
    let (p, sat_info) = le_u8(p)?;
    Ok((
        p,
        GpsRecord {
            lat: lat as f64 / DEG_SCALE,
            lon: lon as f64 / DEG_SCALE,
            ground_speed,
            altitude: altitude_cm as f64 / CM_PER_M,
            fix: sat_info & 0x03,
            sats: sat_info >> 2,
        },
    ))
}

fn attitude(p: &[u8]) -> IResult<&[u8], AttitudeRecord> {
    let (p, pitch) = le_i16(p)?;
    let (p, roll) = le_i16(p)?;
    let (p, heading) = le_i16(p)?;
    Ok((
        p,
        AttitudeRecord {
            pitch,
            roll,
            heading,
        },
    ))
}

fn status(p: &[u8]) -> IResult<&[u8], StatusRecord> {
    let (p, vbat_mv) = le_u16(p)?;
    let (p, mah_drawn) = le_u16(p)?;
    let (p, rssi) = le_u8(p)?;
    let (p, airspeed) = le_u8(p)?;
    let (p, flags) = le_u8(p)?;
    Ok((
        p,
        StatusRecord {
            vbat: vbat_mv as f64 / MV_PER_V,
            mah_drawn,
            rssi,
            airspeed,
            armed: flags & 0x01 != 0,
            failsafe: flags & 0x02 != 0,
            flight_mode: flags >> 2,
        },
    ))
}

fn origin(p: &[u8]) -> IResult<&[u8], OriginRecord> {
    let (p, lat) = le_i32(p)?;
    let (p, lon) = le_i32(p)?;
    let (p, alt_cm) = le_i32(p)?;
    let (p, osd) = le_u8(p)?;
    let (p, fix) = le_u8(p)?;
    Ok((
        p,
        OriginRecord {
            lat: lat as f64 / DEG_SCALE,
            lon: lon as f64 / DEG_SCALE,
            alt: alt_cm as f64 / CM_PER_M,
            osd_on: osd & 0x01 != 0,
            fix,
        },
    ))
}

fn nav(p: &[u8]) -> IResult<&[u8], NavRecord> {
    let (p, gps_mode) = le_u8(p)?;
    let (p, nav_mode) = le_u8(p)?;
    let (p, nav_action) = le_u8(p)?;
    let (p, waypoint_num) = le_u8(p)?;
    let (p, nav_error) = le_u8(p)?;
    let (p, flags) = le_u8(p)?;
    Ok((
        p,
        NavRecord {
            gps_mode,
            nav_mode,
            nav_action,
            waypoint_num,
            nav_error,
            flags,
        },
    ))
}

fn extra(p: &[u8]) -> IResult<&[u8], ExtraRecord> {
    let (p, hdop) = le_u16(p)?;
    let (p, hw_status) = le_u8(p)?;
    let (p, counter) = le_u8(p)?;
    let (p, disarm_reason) = le_u8(p)?;
    Ok((
        p,
        ExtraRecord {
            hdop: hdop as f64 / HDOP_SCALE,
            hw_status,
            counter,
            disarm_reason,
        },
    ))
}
