use crate::session::ChatSession;
use chatcore::Envelope;

/// Trait for handling responses the service sends on a specific route.
///
/// Each handler owns one `target` (e.g. "/chat-login", "/chat"). New routes
/// get a new handler instead of another branch in the session.
pub trait ResponseHandler: Send + Sync {
    /// Returns the route this handler is responsible for.
    fn target(&self) -> &'static str;

    /// Handle the inbound envelope.
    ///
    /// Returns `true` if the envelope was consumed, `false` if it should be
    /// logged as unhandled.
    fn handle(&self, session: &ChatSession, envelope: &Envelope) -> bool;
}
