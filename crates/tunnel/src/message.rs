use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use emblem_merkle::Commitment;
use emblem_primitives::{
    buf::{Buf20, Buf32},
    hash,
};
use serde::{Deserialize, Serialize};

use crate::errors::{TunnelError, TunnelResult};

/// The one payload type carried by the tunnel: a root and the leaf range it covers.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct CommitmentMessage {
    pub root: Buf32,
    pub range_start: u64,
    pub range_size: u64,
}

impl CommitmentMessage {
    pub fn encode(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("tunnel: enc commitment")
    }

    /// Decodes a payload, rejecting trailing bytes.
    pub fn decode(payload: &[u8]) -> TunnelResult<Self> {
        borsh::from_slice(payload).map_err(|e| TunnelError::MalformedPayload(e.to_string()))
    }
}

impl From<Commitment> for CommitmentMessage {
    fn from(value: Commitment) -> Self {
        Self {
            root: value.root,
            range_start: value.range_start,
            range_size: value.range_size,
        }
    }
}

impl From<CommitmentMessage> for Commitment {
    fn from(value: CommitmentMessage) -> Self {
        Commitment::new(value.root, value.range_start, value.range_size)
    }
}

/// Envelope as seen by the transport.  `sender` is the identity the transport
/// vouches for, which is all the child side can rely on.
#[derive(Clone, Debug, Eq, PartialEq, Arbitrary, BorshSerialize, BorshDeserialize)]
pub struct TunnelMessage {
    pub sender: Buf20,
    pub receiver: Buf20,
    pub payload: Vec<u8>,
}

impl TunnelMessage {
    pub fn new(sender: Buf20, receiver: Buf20, payload: Vec<u8>) -> Self {
        Self {
            sender,
            receiver,
            payload,
        }
    }

    /// Computes a msg ID from the endpoints and payload.
    pub fn compute_id(&self) -> TunnelMsgId {
        let mut buf = Vec::with_capacity(20 + 20 + 8 + self.payload.len());
        buf.extend_from_slice(self.sender.as_slice());
        buf.extend_from_slice(self.receiver.as_slice());
        buf.extend_from_slice(&(self.payload.len() as u64).to_be_bytes());
        buf.extend_from_slice(&self.payload);
        TunnelMsgId(hash::raw(&buf))
    }
}

/// ID of a [`TunnelMessage`], used to correlate log lines across both sides.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Arbitrary)]
pub struct TunnelMsgId(Buf32);

impl fmt::Debug for TunnelMsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TunnelMsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use emblem_test_utils::ArbitraryGenerator;

    use super::*;

    #[test]
    fn test_commitment_message_layout() {
        let msg = CommitmentMessage {
            root: Buf32::from([0x11; 32]),
            range_start: 2,
            range_size: 3,
        };
        let enc = msg.encode();
        assert_eq!(enc.len(), 32 + 8 + 8);
        assert_eq!(&enc[..32], &[0x11; 32]);
        assert_eq!(CommitmentMessage::decode(&enc).unwrap(), msg);
    }

    #[test]
    fn test_decode_rejects_truncated_and_trailing() {
        let msg: CommitmentMessage = ArbitraryGenerator::new_with_size(128).generate();
        let enc = msg.encode();
        assert!(CommitmentMessage::decode(&enc[..enc.len() - 1]).is_err());

        let mut long = enc.clone();
        long.push(0);
        assert!(matches!(
            CommitmentMessage::decode(&long),
            Err(TunnelError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_msg_id_depends_on_sender() {
        let payload = vec![1, 2, 3];
        let a = TunnelMessage::new(Buf20::from([1; 20]), Buf20::from([2; 20]), payload.clone());
        let b = TunnelMessage::new(Buf20::from([3; 20]), Buf20::from([2; 20]), payload);
        assert_ne!(a.compute_id(), b.compute_id());
        assert_eq!(a.compute_id(), a.clone().compute_id());
    }
}
