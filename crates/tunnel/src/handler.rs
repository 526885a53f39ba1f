use emblem_primitives::buf::Buf20;

use crate::message::CommitmentMessage;

/// Receiver of authenticated commitments on the child side.
///
/// Implementations must be all-or-nothing: an `Err` means no state changed.
pub trait MessageHandler {
    fn handle_commitment(
        &self,
        state_id: u64,
        sender: &Buf20,
        msg: CommitmentMessage,
    ) -> anyhow::Result<()>;
}
