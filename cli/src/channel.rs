//! Websocket channel with reconnect.
//!
//! A background task owns the socket. It reports lifecycle callbacks and
//! decoded server events over an mpsc channel and reconnects with
//! exponential backoff until the attempt cap (if any) is reached.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use client::net::channel::ChannelEvent;
use frames::{ClientEvent, Frame, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::config::{ReconnectPolicy, WireFormat};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Something the channel task reports to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    Lifecycle(ChannelEvent),
    Server(ServerEvent),
}

/// Sending half, shared with the runtime.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    tx: mpsc::UnboundedSender<Frame>,
    connected: Arc<AtomicBool>,
}

impl ChannelHandle {
    /// Whether a socket is open right now.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Fire-and-forget send, stamped with the current time. Returns `false`
    /// when the event was dropped because no socket is open.
    pub fn send(&self, event: &ClientEvent) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.tx.send(event.to_frame().with_ts(now_ms())).is_ok()
    }
}

/// A running channel task.
#[derive(Debug)]
pub struct Channel {
    pub handle: ChannelHandle,
    pub events: mpsc::UnboundedReceiver<ChannelMessage>,
    task: JoinHandle<()>,
}

impl Channel {
    /// Stop the background task, closing any open socket.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Spawn the channel task for `url`.
#[must_use]
pub fn spawn_channel(url: String, wire: WireFormat, policy: ReconnectPolicy) -> Channel {
    let (out_tx, out_rx) = mpsc::unbounded_channel::<Frame>();
    let (events_tx, events) = mpsc::unbounded_channel::<ChannelMessage>();
    let connected = Arc::new(AtomicBool::new(false));

    let task = tokio::spawn(channel_loop(
        url,
        wire,
        policy,
        Arc::clone(&connected),
        out_rx,
        events_tx,
    ));

    Channel {
        handle: ChannelHandle {
            tx: out_tx,
            connected,
        },
        events,
        task,
    }
}

enum Ended {
    /// The socket dropped; reconnect.
    Dropped,
    /// The runtime went away; stop.
    Shutdown,
}

async fn channel_loop(
    url: String,
    wire: WireFormat,
    policy: ReconnectPolicy,
    connected: Arc<AtomicBool>,
    mut out_rx: mpsc::UnboundedReceiver<Frame>,
    events: mpsc::UnboundedSender<ChannelMessage>,
) {
    let report = |event: ChannelEvent| events.send(ChannelMessage::Lifecycle(event)).is_ok();
    let mut attempt: u32 = 0;
    let mut ever_connected = false;

    loop {
        if attempt > 0 {
            if policy.exhausted(attempt) {
                tracing::warn!(%url, attempts = attempt - 1, "reconnect attempts exhausted");
                report(ChannelEvent::ReconnectFailed);
                return;
            }
            tokio::time::sleep(policy.delay(attempt)).await;
            tracing::info!(%url, attempt, "reconnecting");
            if !report(ChannelEvent::ReconnectAttempt(attempt)) {
                return;
            }
        }

        let ws = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => ws,
            Err(e) => {
                tracing::warn!(%url, attempt, error = %e, "websocket connect failed");
                if !report(ChannelEvent::ReconnectError) {
                    return;
                }
                attempt = attempt.saturating_add(1);
                continue;
            }
        };

        // Sends queued while offline are stale by now.
        while out_rx.try_recv().is_ok() {}
        connected.store(true, Ordering::Release);

        let opened = if ever_connected {
            ChannelEvent::Reconnect(attempt)
        } else {
            ChannelEvent::Connect
        };
        ever_connected = true;
        tracing::info!(%url, event = opened.name(), "websocket open");
        if !report(opened) {
            return;
        }

        let ended = run_connection(ws, wire, &mut out_rx, &events).await;
        connected.store(false, Ordering::Release);
        match ended {
            Ended::Shutdown => return,
            Ended::Dropped => {
                tracing::warn!(%url, "websocket closed");
                if !report(ChannelEvent::Disconnect) {
                    return;
                }
                attempt = 1;
            }
        }
    }
}

async fn run_connection(
    ws: WsStream,
    wire: WireFormat,
    out_rx: &mut mpsc::UnboundedReceiver<Frame>,
    events: &mpsc::UnboundedSender<ChannelMessage>,
) -> Ended {
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            outgoing = out_rx.recv() => {
                let Some(frame) = outgoing else {
                    let _ = write.close().await;
                    return Ended::Shutdown;
                };
                tracing::debug!(event = %frame.event, "send");
                if let Err(e) = write.send(encode(wire, &frame)).await {
                    tracing::warn!(error = %e, "websocket send failed");
                    return Ended::Dropped;
                }
            }
            incoming = read.next() => {
                let frame = match incoming {
                    Some(Ok(Message::Text(text))) => frames::decode_text(&text),
                    Some(Ok(Message::Binary(bytes))) => frames::decode_frame(&bytes),
                    Some(Ok(Message::Close(_))) | None => return Ended::Dropped,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "websocket recv failed");
                        return Ended::Dropped;
                    }
                };
                let event = match frame.and_then(|f| ServerEvent::from_frame(&f)) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping undecodable server message");
                        continue;
                    }
                };
                tracing::debug!(event = event.name(), "recv");
                if events.send(ChannelMessage::Server(event)).is_err() {
                    return Ended::Shutdown;
                }
            }
        }
    }
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

fn encode(wire: WireFormat, frame: &Frame) -> Message {
    match wire {
        WireFormat::Json => Message::text(frames::encode_text(frame)),
        WireFormat::Proto => Message::binary(frames::encode_frame(frame)),
    }
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
