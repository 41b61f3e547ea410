//! WebSocket transport for the telemetry feed.
//!
//! Every connection gets its own [`Subscription`](station_icc::Subscription)
//! and a writer/reader thread pair. The pair shares nothing but the
//! subscription and a per-connection [`Shutdown`](station_core::Shutdown).

mod connection;
mod error;
mod server;

pub use error::ServerError;
pub use server::TelemetryServer;
