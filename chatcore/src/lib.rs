pub mod envelope;
pub mod error;
pub mod net;
pub mod protocol;
pub mod request;
pub mod response;
pub mod types;

pub use envelope::{Envelope, EnvelopeBuilder};
pub use error::EnvelopeError;
