use super::traits::ResponseHandler;
use crate::session::ChatSession;
use chatcore::Envelope;
use chatcore::protocol::routes;

/// Handler for `/chat-logout` responses.
pub struct LogoutHandler;

impl ResponseHandler for LogoutHandler {
    fn target(&self) -> &'static str {
        routes::CHAT_LOGOUT
    }

    fn handle(&self, session: &ChatSession, _envelope: &Envelope) -> bool {
        session.complete_logout();
        true
    }
}
