use thiserror::Error;

/// Errors raised while decoding an inbound envelope into a typed payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("envelope field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unknown chat id type '{0}'")]
    UnknownSenderKind(String),
}
