use emblem_primitives::buf::Buf20;
use thiserror::Error;

pub type TunnelResult<T> = Result<T, TunnelError>;

#[derive(Debug, Error)]
pub enum TunnelError {
    /// The endpoint has no counterparty yet, so it can neither send nor accept.
    #[error("tunnel {0} has no counterparty mapped")]
    NotMapped(Buf20),

    /// The transport presented a sender other than the mapped counterparty,
    /// or a sender reached an endpoint that trusts nobody yet.
    #[error("unauthorized sender {sender}")]
    UnauthorizedSender {
        sender: Buf20,
        expected: Option<Buf20>,
    },

    #[error("malformed tunnel payload: {0}")]
    MalformedPayload(String),

    #[error("transport: {0}")]
    Transport(String),

    /// The payload was authentic but the receiving handler refused it.
    #[error("handler rejected message: {0:#}")]
    Handler(anyhow::Error),
}
