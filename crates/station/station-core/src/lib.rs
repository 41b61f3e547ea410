pub mod counters;
pub mod shutdown;
pub mod telemetry_state;
pub mod telemetry_store;
pub mod timestamp;

pub use counters::{Counters, CountersDelta, CountersSnapshot};
pub use shutdown::Shutdown;
pub use telemetry_state::{Snapshot, StoreSlot};
pub use telemetry_store::TelemetryStore;
pub use timestamp::{now_ms, now_ns};
