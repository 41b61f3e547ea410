// Per-channel latest value plus the copy handed out to readers.
//
// Records are small `Copy` structs, so a whole snapshot is a plain array
// copy: nothing in it can alias the live store.

use ltm_events::{
    AttitudeRecord, Channel, DecodedRecord, ExtraRecord, GpsRecord, NavRecord, OriginRecord,
    StatusRecord,
};

/// Latest record for one channel and when it was captured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoreSlot {
    pub record: DecodedRecord,
    /// Capture time, ns since the Unix epoch. Never goes backwards.
    pub captured_at_ns: u64,
}

/// Independent copy of all six slots taken under one read lock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    slots: [Option<StoreSlot>; Channel::COUNT],
}

impl Snapshot {
    pub(crate) fn from_slots(slots: [Option<StoreSlot>; Channel::COUNT]) -> Self {
        Self { slots }
    }

    #[inline]
    pub fn slot(&self, channel: Channel) -> Option<&StoreSlot> {
        self.slots[channel.index()].as_ref()
    }

    pub fn is_present(&self, channel: Channel) -> bool {
        self.slot(channel).is_some()
    }

    /// Number of channels that have been populated at least once.
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn gps(&self) -> Option<(GpsRecord, u64)> {
        match self.slot(Channel::Gps)? {
            StoreSlot {
                record: DecodedRecord::Gps(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }

    pub fn attitude(&self) -> Option<(AttitudeRecord, u64)> {
        match self.slot(Channel::Attitude)? {
            StoreSlot {
                record: DecodedRecord::Attitude(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<(StatusRecord, u64)> {
        match self.slot(Channel::Status)? {
            StoreSlot {
                record: DecodedRecord::Status(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<(OriginRecord, u64)> {
        match self.slot(Channel::Origin)? {
            StoreSlot {
                record: DecodedRecord::Origin(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }

    pub fn nav(&self) -> Option<(NavRecord, u64)> {
        match self.slot(Channel::Nav)? {
            StoreSlot {
                record: DecodedRecord::Nav(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }

    pub fn extra(&self) -> Option<(ExtraRecord, u64)> {
        match self.slot(Channel::Extra)? {
            StoreSlot {
                record: DecodedRecord::Extra(r),
                captured_at_ns,
            } => Some((*r, *captured_at_ns)),
            _ => None,
        }
    }
}
