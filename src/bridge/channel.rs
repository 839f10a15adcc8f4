//! Asynchronous message passing between the overlay and the bridge.
//!
//! Requests travel over an unbounded mpsc channel. `send` is fire-and-forget;
//! `call` waits for the reply on a oneshot. There are no timeouts and no
//! retries: a bridge that never answers leaves the caller waiting.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::managers::tab_manager::{HostEvent, TabHost};
use crate::types::errors::BridgeError;
use crate::types::rpc::{into_result, BridgeRequest, RequestContext};

use super::CommandBridge;

struct Envelope {
    request: BridgeRequest,
    ctx: RequestContext,
    reply: Option<oneshot::Sender<Value>>,
}

/// Caller side of the bridge channel.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

/// Bridge side of the channel, consumed by `serve`.
pub struct BridgeInbox {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

pub fn channel() -> (BridgeHandle, BridgeInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (BridgeHandle { tx }, BridgeInbox { rx })
}

impl BridgeHandle {
    /// Queues a request without waiting for its outcome.
    pub fn send(&self, request: BridgeRequest, ctx: RequestContext) -> Result<(), BridgeError> {
        self.tx
            .send(Envelope {
                request,
                ctx,
                reply: None,
            })
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Sends a request and waits for the resolved value. The error marker
    /// comes back as `BridgeError::Rejected`.
    pub async fn call(
        &self,
        request: BridgeRequest,
        ctx: RequestContext,
    ) -> Result<Value, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                ctx,
                reply: Some(reply),
            })
            .map_err(|_| BridgeError::Disconnected)?;
        let value = response.await.map_err(|_| BridgeError::Disconnected)?;
        into_result(value)
    }
}

async fn next_event(events: &mut Option<mpsc::UnboundedReceiver<HostEvent>>) -> Option<HostEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Runs the bridge event loop until every `BridgeHandle` is dropped.
///
/// Host events are drained ahead of requests so a read issued after a
/// lifecycle change sees the refreshed snapshot. Returns the bridge so the
/// caller can inspect its final state.
pub async fn serve<H: TabHost>(
    mut bridge: CommandBridge<H>,
    mut inbox: BridgeInbox,
    mut events: Option<mpsc::UnboundedReceiver<HostEvent>>,
) -> CommandBridge<H> {
    loop {
        tokio::select! {
            biased;
            event = next_event(&mut events), if events.is_some() => match event {
                Some(event) => bridge.on_host_event(event),
                None => events = None,
            },
            envelope = inbox.rx.recv() => match envelope {
                Some(envelope) => {
                    let response = bridge.handle_request(&envelope.request, envelope.ctx);
                    if let Some(reply) = envelope.reply {
                        // The caller may have stopped waiting.
                        let _ = reply.send(response);
                    }
                }
                None => break,
            },
        }
    }
    debug!("bridge channel closed");
    bridge
}
