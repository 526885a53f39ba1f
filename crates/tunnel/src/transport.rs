use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use tracing::*;

use crate::{errors::TunnelResult, message::TunnelMessage};

/// The external state-sync channel that moves payloads between ledgers.
///
/// Delivery is asynchronous and at most once; a successful send only means the
/// transport took the message.
pub trait TunnelTransport {
    fn send_message(&self, msg: TunnelMessage) -> TunnelResult<()>;
}

impl<T: TunnelTransport + ?Sized> TunnelTransport for Arc<T> {
    fn send_message(&self, msg: TunnelMessage) -> TunnelResult<()> {
        (**self).send_message(msg)
    }
}

/// In-process transport that queues messages until a driver drains them.
#[derive(Debug, Default)]
pub struct QueuedTransport {
    queue: Mutex<VecDeque<TunnelMessage>>,
}

impl QueuedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Takes every queued message, oldest first.
    pub fn drain(&self) -> Vec<TunnelMessage> {
        self.queue.lock().drain(..).collect()
    }

    /// Takes the oldest queued message.
    pub fn pop(&self) -> Option<TunnelMessage> {
        self.queue.lock().pop_front()
    }
}

impl TunnelTransport for QueuedTransport {
    fn send_message(&self, msg: TunnelMessage) -> TunnelResult<()> {
        let msg_id = msg.compute_id();
        trace!(%msg_id, receiver = %msg.receiver, "queued tunnel msg");
        self.queue.lock().push_back(msg);
        Ok(())
    }
}
