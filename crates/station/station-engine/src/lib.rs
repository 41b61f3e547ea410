mod broadcast;
mod ingest;
mod message;

pub use broadcast::{Broadcaster, FeedPayload};
pub use ingest::{IngestEnd, Ingestor, TelemetryRecorder, run_ingest};
pub use message::{StatsPayload, TelemetryMessage};
