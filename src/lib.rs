// Protocol types live in chatcore and are re-exported here.
pub use chatcore::{Envelope, EnvelopeBuilder, EnvelopeError, net, protocol, request, response};

// Core types are re-exported, but events (with EventBus) remain here since
// handlers receive the session.
pub mod types {
    pub use chatcore::types::*;
    pub mod events;
}

pub mod config;
pub mod handlers;
pub mod keepalive;
pub mod replay;
pub mod send;
pub mod session;

pub use config::ChatConfig;
pub use session::{ChatError, ChatSession, SessionState};
