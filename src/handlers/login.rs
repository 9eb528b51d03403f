use super::traits::ResponseHandler;
use crate::session::ChatSession;
use chatcore::Envelope;
use chatcore::protocol::routes;
use chatcore::response::LoginResponse;
use log::warn;

/// Handler for `/chat-login` responses.
pub struct LoginHandler;

impl ResponseHandler for LoginHandler {
    fn target(&self) -> &'static str {
        routes::CHAT_LOGIN
    }

    fn handle(&self, session: &ChatSession, envelope: &Envelope) -> bool {
        match LoginResponse::try_from(envelope) {
            Ok(response) => session.complete_login(response.chat_session_id),
            Err(e) => {
                warn!(target: "Chat/Router", "Login response without a usable session id: {e}");
                session.fail_login(format!("malformed login response: {e}"));
            }
        }
        true
    }
}
