// One subscriber connection.
//
//   writer thread: subscription -> text frames, plus pongs for client pings.
//                  Ends on queue disconnect, write error, or either shutdown
//                  flag. It is the only thread that writes to the socket.
//   reader thread: parses client frames on a cloned fd with a read timeout
//                  and never writes. Pings are handed to the writer; a close
//                  frame, EOF or read error ends the connection.
//
// Whichever ends first triggers the connection's own flag; the writer then
// unsubscribes.

use std::io::ErrorKind;
use std::net::{Shutdown as SocketShutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, select};
use station_core::Shutdown;
use station_engine::FeedPayload;
use station_icc::{Fanout, Subscription};
use tracing::{debug, info, trace, warn};
use tungstenite::protocol::frame::FrameSocket;
use tungstenite::protocol::frame::coding::{Control, OpCode};
use tungstenite::{Bytes, Message, WebSocket};

use crate::error::ServerError;
use crate::server::POLL_INTERVAL;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);
/// Pings waiting for the writer. Extra pings are ignored.
const PONG_QUEUE: usize = 8;
/// Larger client frames end the connection.
const MAX_CLIENT_FRAME: usize = 64 << 10;

pub(crate) fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    fanout: Arc<Fanout<FeedPayload>>,
    shutdown: Shutdown,
) {
    if let Err(e) = serve_inner(stream, peer, &fanout, &shutdown) {
        warn!(%peer, error = %e, "connection failed");
    }
}

fn serve_inner(
    stream: TcpStream,
    peer: SocketAddr,
    fanout: &Arc<Fanout<FeedPayload>>,
    shutdown: &Shutdown,
) -> Result<(), ServerError> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))?;

    let ws = tungstenite::accept(stream).map_err(|e| ServerError::Handshake(e.to_string()))?;

    // Socket options are shared by the clone.
    let raw = ws.get_ref().try_clone()?;
    raw.set_read_timeout(Some(POLL_INTERVAL))?;
    let (pong_tx, pong_rx) = crossbeam_channel::bounded(PONG_QUEUE);

    let sub = fanout.subscribe();
    let id = sub.id();
    info!(%peer, %id, "subscriber connected");

    let conn = Shutdown::new();
    let writer = {
        let conn = conn.clone();
        let global = shutdown.clone();
        let fanout = fanout.clone();
        thread::Builder::new()
            .name(format!("ws-writer-{}", id.0))
            .spawn(move || {
                write_loop(ws, &sub, &pong_rx, &conn, &global);
                conn.trigger();
                fanout.unsubscribe(sub.id());
                sub.dropped()
            })?
    };

    read_loop(FrameSocket::new(raw), pong_tx, &conn, shutdown);
    conn.trigger();

    let dropped = writer.join().unwrap_or_default();
    // Covers a writer that panicked before unsubscribing.
    fanout.unsubscribe(id);
    info!(%peer, %id, dropped, "subscriber disconnected");
    Ok(())
}

fn write_loop(
    mut ws: WebSocket<TcpStream>,
    sub: &Subscription<FeedPayload>,
    pings: &Receiver<Bytes>,
    conn: &Shutdown,
    global: &Shutdown,
) {
    while !conn.is_triggered() && !global.is_triggered() {
        let sent = select! {
            recv(sub.receiver()) -> msg => match msg {
                Ok(payload) => ws.send(Message::text(payload.to_string())),
                Err(_) => break,
            },
            recv(pings) -> msg => match msg {
                Ok(data) => ws.send(Message::Pong(data)),
                Err(_) => break,
            },
            default(POLL_INTERVAL) => continue,
        };
        if let Err(e) = sent {
            debug!(id = %sub.id(), error = %e, "send failed");
            break;
        }
    }

    // Best effort: the peer may already be gone.
    let _ = ws.close(None);
    let _ = ws.flush();
    let _ = ws.get_ref().shutdown(SocketShutdown::Both);
}

fn read_loop(
    mut socket: FrameSocket<TcpStream>,
    pongs: Sender<Bytes>,
    conn: &Shutdown,
    global: &Shutdown,
) {
    while !conn.is_triggered() && !global.is_triggered() {
        let frame = match socket.read(Some(MAX_CLIENT_FRAME)) {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(e) => {
                debug!(error = %e, "read ended");
                break;
            }
        };

        match frame.header().opcode {
            OpCode::Control(Control::Close) => break,
            OpCode::Control(Control::Ping) => {
                let mask = frame.header().mask;
                let mut data = frame.into_payload().to_vec();
                if let Some(mask) = mask {
                    unmask(&mut data, mask);
                }
                match pongs.try_send(Bytes::from(data)) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => trace!("pong queue full, ping ignored"),
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            _ => {}
        }
    }
}

/// Client frames arrive masked; the frame socket hands them over as-is.
fn unmask(data: &mut [u8], mask: [u8; 4]) {
    for (i, b) in data.iter_mut().enumerate() {
        *b ^= mask[i % 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmask_applies_the_key_cyclically() {
        let mask = [0x37, 0xfa, 0x21, 0x3d];
        // RFC 6455 section 5.7, masked "Hello".
        let mut data = vec![0x7f, 0x9f, 0x4d, 0x51, 0x58];
        unmask(&mut data, mask);
        assert_eq!(data, b"Hello");
    }
}
