use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use station_core::Shutdown;
use station_engine::FeedPayload;
use station_icc::Fanout;
use tracing::{debug, info, warn};

use crate::connection;
use crate::error::ServerError;

/// How often blocked loops wake up to look at the shutdown flags.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct TelemetryServer {
    listener: TcpListener,
    fanout: Arc<Fanout<FeedPayload>>,
    shutdown: Shutdown,
}

impl TelemetryServer {
    pub fn bind(
        addr: &str,
        fanout: Arc<Fanout<FeedPayload>>,
        shutdown: Shutdown,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        // Accept must not block, or shutdown would wait for the next client.
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            fanout,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until shutdown, then waits for the open ones to
    /// wind down.
    pub fn run(self) -> Result<(), ServerError> {
        info!(addr = %self.local_addr()?, "telemetry server listening");

        let mut connections: Vec<JoinHandle<()>> = Vec::new();

        while !self.shutdown.is_triggered() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    let fanout = self.fanout.clone();
                    let shutdown = self.shutdown.clone();
                    let spawned = thread::Builder::new()
                        .name(format!("ws-{peer}"))
                        .spawn(move || connection::serve(stream, peer, fanout, shutdown));
                    match spawned {
                        Ok(handle) => connections.push(handle),
                        Err(e) => warn!(%peer, error = %e, "failed to spawn connection thread"),
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    thread::sleep(POLL_INTERVAL);
                }
            }
            connections.retain(|h| !h.is_finished());
        }

        debug!(open = connections.len(), "server stopping");
        for handle in connections {
            let _ = handle.join();
        }
        info!("telemetry server stopped");
        Ok(())
    }
}
