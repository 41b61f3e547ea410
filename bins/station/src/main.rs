mod source;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context;
use ltm_events::Channel;
use station_config::StationConfig;
use station_core::{Counters, CountersDelta, Shutdown, TelemetryStore};
use station_engine::{Broadcaster, FeedPayload, Ingestor, run_ingest};
use station_icc::Fanout;
use station_server::TelemetryServer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::source::SourceSpec;

const RATE_LOG_INTERVAL: Duration = Duration::from_secs(1);

fn load_config() -> anyhow::Result<StationConfig> {
    match std::env::args().nth(1) {
        Some(path) => StationConfig::load(&path).with_context(|| format!("config {path}")),
        None => Ok(StationConfig::default()),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.log_level);
    info!(?config, "station starting");

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("received shutdown signal");
            shutdown.trigger();
        })
        .context("failed to install Ctrl-C handler")?;
    }

    let store = Arc::new(TelemetryStore::new());
    let counters = Arc::new(Counters::new());
    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(config.queue_depth));

    let server = TelemetryServer::bind(&config.listen_addr, fanout.clone(), shutdown.clone())?;
    let reader = SourceSpec::parse(&config.source).open()?;

    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    handles.push({
        let mut ingestor = Ingestor::new(store.clone(), counters.clone());
        let shutdown = shutdown.clone();
        let chunk = config.read_chunk_bytes;
        let source = config.source.clone();
        thread::Builder::new()
            .name("ingest".to_string())
            .spawn(move || {
                info!(%source, "ingest started");
                // EOF ends ingestion only; subscribers keep receiving the
                // last known state until shutdown.
                if let Err(e) = run_ingest(reader, &mut ingestor, &shutdown, chunk) {
                    error!(error = %e, %source, "ingest failed");
                }
            })?
    });

    handles.push({
        let broadcaster = Broadcaster::new(
            store.clone(),
            counters.clone(),
            fanout.clone(),
            config.tick_interval(),
        );
        let shutdown = shutdown.clone();
        thread::Builder::new()
            .name("broadcaster".to_string())
            .spawn(move || broadcaster.run(&shutdown))?
    });

    handles.push(
        thread::Builder::new()
            .name("server".to_string())
            .spawn(move || {
                if let Err(e) = server.run() {
                    error!(error = %e, "server failed");
                }
            })?,
    );

    let mut last_rates = counters.snapshot();
    let mut last = Instant::now();
    while !shutdown.is_triggered() {
        thread::sleep(Duration::from_millis(100));
        if last.elapsed() >= RATE_LOG_INTERVAL {
            let now = counters.snapshot();
            log_rates(&now.delta_since(&last_rates));
            last_rates = now;
            last = Instant::now();
        }
    }

    join_with_grace(handles, config.shutdown_grace());
    log_summary(&counters);
    Ok(())
}

/// Joins whatever finishes within `grace`; the rest are abandoned to
/// process exit.
fn join_with_grace(handles: Vec<JoinHandle<()>>, grace: Duration) {
    let deadline = Instant::now() + grace;
    let mut pending = handles;

    while !pending.is_empty() && Instant::now() < deadline {
        let (done, rest): (Vec<_>, Vec<_>) = pending.into_iter().partition(|h| h.is_finished());
        for h in done {
            let name = h.thread().name().unwrap_or("?").to_string();
            if h.join().is_err() {
                warn!(thread = %name, "thread panicked");
            }
        }
        pending = rest;
        if !pending.is_empty() {
            thread::sleep(Duration::from_millis(20));
        }
    }

    for h in &pending {
        warn!(thread = h.thread().name().unwrap_or("?"), "did not stop within grace period");
    }
}

/// Per-channel frame rates over the last window. Silent while the link is.
fn log_rates(d: &CountersDelta) {
    if d.total == 0 {
        return;
    }
    info!(
        attitude_hz = d.hz(Channel::Attitude),
        gps_hz = d.hz(Channel::Gps),
        status_hz = d.hz(Channel::Status),
        nav_hz = d.hz(Channel::Nav),
        origin_hz = d.hz(Channel::Origin),
        extra_hz = d.hz(Channel::Extra),
        total_hz = d.total_hz(),
        "link rate"
    );
}

fn log_summary(counters: &Counters) {
    let s = counters.snapshot();
    info!(
        uptime_sec = s.uptime_sec(),
        total = s.total,
        fps = s.fps(),
        checksum_errors = s.checksum_errors,
        unknown_kind_errors = s.unknown_kind_errors,
        decode_errors = s.decode_errors,
        "final counters"
    );
    for ch in Channel::ALL {
        info!(channel = ch.name(), frames = s.channel(ch), "frames per channel");
    }
}
