use emblem_primitives::buf::Buf20;
use serde::{Deserialize, Serialize};

use crate::errors::{TunnelError, TunnelResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MappingState {
    Unconfigured,
    Mapped(Buf20),
}

/// One side's view of the tunnel.  Each side writes only its own mapping.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TunnelMapping {
    local: Buf20,
    counterparty: Option<Buf20>,

    /// Bumped on every accepted inbound message.  Bookkeeping only, the
    /// transport does not promise ordering.
    latest_state_id: u64,
}

impl TunnelMapping {
    pub fn new(local: Buf20) -> Self {
        Self {
            local,
            counterparty: None,
            latest_state_id: 0,
        }
    }

    pub fn local(&self) -> &Buf20 {
        &self.local
    }

    pub fn counterparty(&self) -> Option<&Buf20> {
        self.counterparty.as_ref()
    }

    pub fn latest_state_id(&self) -> u64 {
        self.latest_state_id
    }

    pub fn state(&self) -> MappingState {
        match self.counterparty {
            Some(addr) => MappingState::Mapped(addr),
            None => MappingState::Unconfigured,
        }
    }

    /// Sets the counterparty, returning the previous one if this overwrote it.
    pub fn set_counterparty(&mut self, addr: Buf20) -> Option<Buf20> {
        self.counterparty.replace(addr)
    }

    /// Returns the counterparty or fails if none is mapped.
    pub fn require_counterparty(&self) -> TunnelResult<Buf20> {
        self.counterparty.ok_or(TunnelError::NotMapped(self.local))
    }

    /// Checks that a sender claimed by the transport is our counterparty.  An
    /// unmapped endpoint authorizes nobody.
    pub fn authorize(&self, sender: &Buf20) -> TunnelResult<()> {
        if self.counterparty != Some(*sender) {
            return Err(TunnelError::UnauthorizedSender {
                sender: *sender,
                expected: self.counterparty,
            });
        }
        Ok(())
    }

    pub fn next_state_id(&self) -> u64 {
        self.latest_state_id + 1
    }

    pub(crate) fn advance_state_id(&mut self) -> u64 {
        self.latest_state_id += 1;
        self.latest_state_id
    }
}
