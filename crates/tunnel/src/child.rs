use emblem_primitives::buf::Buf20;
use tracing::*;

use crate::{
    errors::{TunnelError, TunnelResult},
    handler::MessageHandler,
    mapping::TunnelMapping,
    message::{CommitmentMessage, TunnelMessage},
};

/// Child-ledger endpoint, the side that accepts commitments.
#[derive(Debug)]
pub struct ChildTunnel<H> {
    mapping: TunnelMapping,
    handler: H,
}

impl<H: MessageHandler> ChildTunnel<H> {
    pub fn new(local: Buf20, handler: H) -> Self {
        Self {
            mapping: TunnelMapping::new(local),
            handler,
        }
    }

    pub fn mapping(&self) -> &TunnelMapping {
        &self.mapping
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Points this endpoint at the root tunnel.  Administrative, overwrites.
    pub fn set_root_tunnel(&mut self, root: Buf20) {
        if let Some(prev) = self.mapping.set_counterparty(root) {
            warn!(%prev, %root, "overwriting root tunnel mapping");
        } else {
            info!(local = %self.mapping.local(), %root, "mapped root tunnel");
        }
    }

    /// Accepts a payload from `sender` as vouched for by the transport.
    ///
    /// Returns the state id assigned to the message.  On any error the mapping
    /// and everything behind the handler are left untouched.
    pub fn on_receive(&mut self, sender: &Buf20, payload: &[u8]) -> TunnelResult<u64> {
        if let Err(e) = self.mapping.authorize(sender) {
            warn!(%sender, err = %e, "dropping tunnel msg");
            return Err(e);
        }

        let msg = CommitmentMessage::decode(payload)?;
        let state_id = self.mapping.next_state_id();
        self.handler
            .handle_commitment(state_id, sender, msg)
            .map_err(TunnelError::Handler)?;

        let state_id = self.mapping.advance_state_id();
        debug!(%state_id, root = %msg.root, "accepted tunnel msg");
        Ok(state_id)
    }

    /// Delivers a transport envelope, checking it was meant for us.
    pub fn deliver(&mut self, msg: &TunnelMessage) -> TunnelResult<u64> {
        if msg.receiver != *self.mapping.local() {
            return Err(TunnelError::Transport(format!(
                "msg for {} delivered to {}",
                msg.receiver,
                self.mapping.local()
            )));
        }
        self.on_receive(&msg.sender, &msg.payload)
    }
}
