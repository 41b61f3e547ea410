// TelemetryStore: latest-value cache, one slot per channel.
//
// Channel is a dense u8 enum, so the slots are a fixed array indexed by
// `channel.index()`; no hashing and no allocation after construction.
//
// Access pattern: one ingestion thread writes a few hundred times a second,
// the broadcaster and tests read. A single parking_lot RwLock around the
// whole array gives
//   - updates that are invisible until complete (the record is written
//     under the exclusive lock, so a reader never sees half a record)
//   - snapshots of all six slots from the same instant
//   - concurrent readers
// The critical sections are one small memcpy each.

use ltm_events::{Channel, DecodedRecord};
use parking_lot::RwLock;

use crate::telemetry_state::{Snapshot, StoreSlot};

#[derive(Debug, Default)]
pub struct TelemetryStore {
    slots: RwLock<[Option<StoreSlot>; Channel::COUNT]>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the record of `record`'s channel.
    ///
    /// The record is last-write-wins. The slot timestamp only moves forward:
    /// a `captured_at_ns` older than the stored one keeps the stored one.
    pub fn update(&self, record: DecodedRecord, captured_at_ns: u64) {
        let idx = record.channel().index();
        let mut slots = self.slots.write();
        let captured_at_ns = match &slots[idx] {
            Some(prev) => prev.captured_at_ns.max(captured_at_ns),
            None => captured_at_ns,
        };
        slots[idx] = Some(StoreSlot {
            record,
            captured_at_ns,
        });
    }

    /// Copies every slot. Later updates never affect the returned value.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_slots(*self.slots.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltm_events::{
        AttitudeRecord, ExtraRecord, GpsRecord, NavRecord, OriginRecord, StatusRecord,
    };
    use std::sync::Arc;
    use std::thread;

    fn att(v: i16) -> DecodedRecord {
        DecodedRecord::Attitude(AttitudeRecord {
            pitch: v,
            roll: v,
            heading: v,
        })
    }

    #[test]
    fn empty_store_has_no_channels() {
        let s = TelemetryStore::new().snapshot();
        assert_eq!(s.present_count(), 0);
        for ch in Channel::ALL {
            assert!(!s.is_present(ch));
        }
    }

    #[test]
    fn all_six_channels_present_after_update() {
        let store = TelemetryStore::new();
        store.update(DecodedRecord::Gps(GpsRecord::default()), 1);
        store.update(att(0), 2);
        store.update(DecodedRecord::Status(StatusRecord::default()), 3);
        store.update(DecodedRecord::Origin(OriginRecord::default()), 4);
        store.update(DecodedRecord::Nav(NavRecord::default()), 5);
        store.update(DecodedRecord::Extra(ExtraRecord::default()), 6);

        let s = store.snapshot();
        assert_eq!(s.present_count(), Channel::COUNT);
        assert_eq!(s.gps().map(|(_, ts)| ts), Some(1));
        assert_eq!(s.extra().map(|(_, ts)| ts), Some(6));
        // Present-but-zero is still present.
        assert_eq!(s.nav(), Some((NavRecord::default(), 5)));
    }

    #[test]
    fn second_update_replaces_first() {
        let store = TelemetryStore::new();
        store.update(att(1), 10);
        store.update(att(2), 20);
        let (rec, ts) = store.snapshot().attitude().unwrap();
        assert_eq!(rec.pitch, 2);
        assert_eq!(ts, 20);
    }

    #[test]
    fn timestamp_never_goes_backwards() {
        let store = TelemetryStore::new();
        store.update(att(1), 100);
        store.update(att(2), 50);
        let snap = store.snapshot();
        let slot = snap.slot(Channel::Attitude).unwrap();
        assert_eq!(slot.record, att(2));
        assert_eq!(slot.captured_at_ns, 100);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let store = TelemetryStore::new();
        store.update(att(1), 1);
        let before = store.snapshot();
        store.update(att(9), 2);
        store.update(DecodedRecord::Nav(NavRecord::default()), 3);
        assert_eq!(before.attitude(), Some((AttitudeRecord { pitch: 1, roll: 1, heading: 1 }, 1)));
        assert!(!before.is_present(Channel::Nav));
    }

    #[test]
    fn concurrent_writers_and_readers_never_tear() {
        let store = Arc::new(TelemetryStore::new());
        let mut handles = Vec::new();

        for w in 0..50i16 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for i in 0..200i16 {
                    let v = w.wrapping_mul(200).wrapping_add(i);
                    store.update(att(v), i as u64);
                }
            }));
        }
        for _ in 0..50 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                let mut last_ts = 0;
                for _ in 0..200 {
                    if let Some((a, ts)) = store.snapshot().attitude() {
                        assert_eq!(a.pitch, a.roll);
                        assert_eq!(a.roll, a.heading);
                        assert!(ts >= last_ts);
                        last_ts = ts;
                    }
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert!(store.snapshot().is_present(Channel::Attitude));
    }
}
