// Typed telemetry records, one per frame kind, already in engineering units.
// Field names double as the JSON keys subscribers see.

use serde::Serialize;

use crate::frame::FrameKind;
use crate::names;

/// Index of a latest-value slot in the telemetry store.
///
/// Dense and fixed, so it is used directly as an array index.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Gps = 0,
    Attitude = 1,
    Status = 2,
    Origin = 3,
    Nav = 4,
    Extra = 5,
}

impl Channel {
    pub const COUNT: usize = 6;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Gps,
        Channel::Attitude,
        Channel::Status,
        Channel::Origin,
        Channel::Nav,
        Channel::Extra,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Channel::Gps => "GPS",
            Channel::Attitude => "Attitude",
            Channel::Status => "Status",
            Channel::Origin => "Origin",
            Channel::Nav => "Nav",
            Channel::Extra => "Extra",
        }
    }
}

/// G-frame. Position in degrees, altitude in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct GpsRecord {
    pub lat: f64,
    pub lon: f64,
    /// m/s
    pub ground_speed: u8,
    pub altitude: f64,
    /// 0 = none, 1 = dead reckoning, 2 = 2D, 3 = 3D
    pub fix: u8,
    pub sats: u8,
}

/// A-frame. Whole degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AttitudeRecord {
    pub pitch: i16,
    pub roll: i16,
    pub heading: i16,
}

/// S-frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusRecord {
    /// Volts.
    pub vbat: f64,
    pub mah_drawn: u16,
    pub rssi: u8,
    /// m/s
    pub airspeed: u8,
    pub armed: bool,
    pub failsafe: bool,
    pub flight_mode: u8,
}

impl StatusRecord {
    pub fn flight_mode_name(&self) -> Option<&'static str> {
        names::flight_mode_name(self.flight_mode)
    }
}

/// O-frame. Home position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OriginRecord {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub osd_on: bool,
    pub fix: u8,
}

/// N-frame. Raw navigator enums, see [`crate::names`] for labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavRecord {
    pub gps_mode: u8,
    pub nav_mode: u8,
    pub nav_action: u8,
    pub waypoint_num: u8,
    pub nav_error: u8,
    pub flags: u8,
}

/// X-frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ExtraRecord {
    pub hdop: f64,
    pub hw_status: u8,
    #[serde(rename = "x_counter")]
    pub counter: u8,
    pub disarm_reason: u8,
}

/// One decoded frame. Exactly one variant, so "which channel" is never
/// ambiguous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecodedRecord {
    Gps(GpsRecord),
    Attitude(AttitudeRecord),
    Status(StatusRecord),
    Origin(OriginRecord),
    Nav(NavRecord),
    Extra(ExtraRecord),
}

impl DecodedRecord {
    #[inline]
    pub const fn channel(&self) -> Channel {
        match self {
            DecodedRecord::Gps(_) => Channel::Gps,
            DecodedRecord::Attitude(_) => Channel::Attitude,
            DecodedRecord::Status(_) => Channel::Status,
            DecodedRecord::Origin(_) => Channel::Origin,
            DecodedRecord::Nav(_) => Channel::Nav,
            DecodedRecord::Extra(_) => Channel::Extra,
        }
    }

    pub const fn kind(&self) -> FrameKind {
        match self {
            DecodedRecord::Gps(_) => FrameKind::Gps,
            DecodedRecord::Attitude(_) => FrameKind::Attitude,
            DecodedRecord::Status(_) => FrameKind::Status,
            DecodedRecord::Origin(_) => FrameKind::Origin,
            DecodedRecord::Nav(_) => FrameKind::Nav,
            DecodedRecord::Extra(_) => FrameKind::Extra,
        }
    }
}
