use emblem_merkle::Commitment;
use emblem_primitives::buf::Buf20;
use tracing::*;

use crate::{
    errors::TunnelResult,
    mapping::TunnelMapping,
    message::{CommitmentMessage, TunnelMessage, TunnelMsgId},
    transport::TunnelTransport,
};

/// Root-ledger endpoint, the side that posts commitments.
#[derive(Debug)]
pub struct RootTunnel<T> {
    mapping: TunnelMapping,
    transport: T,
}

impl<T: TunnelTransport> RootTunnel<T> {
    pub fn new(local: Buf20, transport: T) -> Self {
        Self {
            mapping: TunnelMapping::new(local),
            transport,
        }
    }

    pub fn mapping(&self) -> &TunnelMapping {
        &self.mapping
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Points this endpoint at the child tunnel.  Administrative, overwrites.
    pub fn set_child_tunnel(&mut self, child: Buf20) {
        if let Some(prev) = self.mapping.set_counterparty(child) {
            warn!(%prev, %child, "overwriting child tunnel mapping");
        } else {
            info!(local = %self.mapping.local(), %child, "mapped child tunnel");
        }
    }

    /// Hands a raw payload to the transport, addressed to the mapped child.
    pub fn send(&self, payload: Vec<u8>) -> TunnelResult<TunnelMsgId> {
        let receiver = self.mapping.require_counterparty()?;
        let msg = TunnelMessage::new(*self.mapping.local(), receiver, payload);
        let msg_id = msg.compute_id();
        self.transport.send_message(msg)?;
        debug!(%msg_id, %receiver, "sent tunnel msg");
        Ok(msg_id)
    }

    /// Posts a commitment to the child side.
    pub fn send_commitment(&self, commitment: &Commitment) -> TunnelResult<TunnelMsgId> {
        let payload = CommitmentMessage::from(*commitment).encode();
        let msg_id = self.send(payload)?;
        info!(
            %msg_id,
            root = %commitment.root,
            range_start = commitment.range_start,
            range_size = commitment.range_size,
            "posted commitment"
        );
        Ok(msg_id)
    }
}
