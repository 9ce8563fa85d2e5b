//! # Cross-context Channel
//!
//! Host and sandbox share no memory. Each side holds a [`Port`] and exchanges
//! JSON text, so only structured data crosses the boundary.
//!
//! - Ordered: messages arrive in send order.
//! - Non-blocking: `post` never waits for the peer.
//! - At-most-once: no acknowledgement, no retry. A message that cannot be
//!   decoded is logged and dropped.
//! - Dropping a port discards everything still queued for it, which is how a
//!   sandbox rebuild cancels in-flight work.

use crate::error::ProtocolError;
use crate::messages::{ControllerMessage, RuntimeMessage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// One end of the channel: sends `Out`, receives `In`
#[derive(Debug)]
pub struct Port<Out, In> {
    label: &'static str,
    tx: UnboundedSender<String>,
    rx: UnboundedReceiver<String>,
    _marker: PhantomData<fn(Out) -> In>,
}

/// Controller side
pub type HostPort = Port<ControllerMessage, RuntimeMessage>;

/// Sandbox side
pub type SandboxPort = Port<RuntimeMessage, ControllerMessage>;

/// Create a connected pair of ports
pub fn channel() -> (HostPort, SandboxPort) {
    let (to_sandbox, from_host) = mpsc::unbounded_channel();
    let (to_host, from_sandbox) = mpsc::unbounded_channel();

    let host = Port {
        label: "host",
        tx: to_sandbox,
        rx: from_sandbox,
        _marker: PhantomData,
    };
    let sandbox = Port {
        label: "sandbox",
        tx: to_host,
        rx: from_host,
        _marker: PhantomData,
    };
    (host, sandbox)
}

impl<Out, In> Port<Out, In>
where
    Out: Serialize,
    In: DeserializeOwned,
{
    /// Queue a message for the peer
    pub fn post(&self, message: &Out) -> Result<(), ProtocolError> {
        let text = serde_json::to_string(message)?;
        self.post_raw(text)
    }

    /// Queue pre-encoded text. Used for forwarding and for exercising
    /// decoding failures.
    pub fn post_raw(&self, text: String) -> Result<(), ProtocolError> {
        self.tx.send(text).map_err(|_| ProtocolError::Closed)
    }

    /// Next decodable message, if one is already queued
    pub fn try_next(&mut self) -> Option<In> {
        loop {
            match self.rx.try_recv() {
                Ok(text) => match self.decode(&text) {
                    Some(message) => return Some(message),
                    None => continue,
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Every message currently queued, in order
    pub fn drain(&mut self) -> Vec<In> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Wait for the next decodable message. `None` once the peer is gone.
    pub async fn next(&mut self) -> Option<In> {
        while let Some(text) = self.rx.recv().await {
            if let Some(message) = self.decode(&text) {
                return Some(message);
            }
        }
        None
    }

    /// True when the peer port has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn decode(&self, text: &str) -> Option<In> {
        match serde_json::from_str(text) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(port = self.label, error = %e, "dropping undecodable message");
                None
            }
        }
    }
}
