//! Labels for the enum-valued fields of S- and N-frames (INAV numbering).
//! Values outside a table yield `None`.

const FLIGHT_MODES: [&str; 22] = [
    "Manual",
    "Rate",
    "Angle",
    "Horizon",
    "Acro",
    "Stabilized1",
    "Stabilized2",
    "Stabilized3",
    "Altitude Hold",
    "GPS Hold",
    "Waypoints",
    "Head Free",
    "Circle",
    "RTH",
    "Follow Me",
    "Land",
    "Fly By Wire A",
    "Fly By Wire B",
    "Cruise",
    "Unknown",
    "Launch",
    "Autotune",
];

const GPS_MODES: [&str; 4] = ["None", "PosHold", "RTH", "Mission"];

const NAV_MODES: [&str; 16] = [
    "None",
    "RTH Start",
    "RTH Enroute",
    "PosHold Infinite",
    "PosHold Timed",
    "WP Enroute",
    "Process Next",
    "Jump",
    "Start Land",
    "Land In Progress",
    "Landed",
    "Settling Before Land",
    "Start Descent",
    "Hover Above Home",
    "Emergency Landing",
    "Critical GPS",
];

const NAV_ACTIONS: [&str; 9] = [
    "Unassigned",
    "Waypoint",
    "PosHold Unlim",
    "PosHold Timed",
    "RTH",
    "Set POI",
    "Jump",
    "Set Head",
    "Land",
];

const NAV_ERRORS: [&str; 12] = [
    "OK",
    "WP Too Far",
    "WP Sanity",
    "WP CRC",
    "Finish",
    "Timer Complete",
    "Invalid Jump",
    "Invalid Data",
    "Wait For RTH Alt",
    "GPS Fix Lost",
    "Disarmed",
    "Landing Check",
];

#[inline]
fn lookup(table: &[&'static str], value: u8) -> Option<&'static str> {
    table.get(value as usize).copied()
}

pub fn flight_mode_name(mode: u8) -> Option<&'static str> {
    lookup(&FLIGHT_MODES, mode)
}

pub fn gps_mode_name(mode: u8) -> Option<&'static str> {
    lookup(&GPS_MODES, mode)
}

pub fn nav_mode_name(mode: u8) -> Option<&'static str> {
    lookup(&NAV_MODES, mode)
}

pub fn nav_action_name(action: u8) -> Option<&'static str> {
    lookup(&NAV_ACTIONS, action)
}

pub fn nav_error_name(error: u8) -> Option<&'static str> {
    lookup(&NAV_ERRORS, error)
}
