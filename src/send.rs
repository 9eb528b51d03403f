use crate::keepalive::TimerHandle;
use crate::session::{ChatError, ChatSession, SessionState};
use chatcore::protocol::ProtocolEnvelope;
use chatcore::request::{GuildMessageRequest, LogoutRequest, WhisperRequest};
use chatcore::types::message::MessageType;
use log::{debug, info, warn};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;

/// Message type used by [`ChatSession::send_guild_chat`].
pub const DEFAULT_GUILD_MESSAGE_TYPE: MessageType = MessageType::GuildChat;

impl ChatSession {
    /// Returns the session id if the session may send chat traffic right now.
    fn logged_in_session_id(&self) -> Result<String, ChatError> {
        let inner = self.lock_inner();
        match (&inner.state, &inner.session_id) {
            (SessionState::LoggedIn, Some(id)) => Ok(id.clone()),
            (actual, _) => Err(ChatError::InvalidSessionState {
                expected: SessionState::LoggedIn,
                actual: *actual,
            }),
        }
    }

    /// Sends `text` to the guild channel selected by `message_type`
    /// (guild chat, officer chat, ...).
    pub async fn send_guild_message(
        &self,
        text: &str,
        message_type: MessageType,
    ) -> Result<(), ChatError> {
        let chat_session_id = self.logged_in_session_id()?;
        debug!(target: "Chat/Session", "Sending {message_type} message");

        let request = GuildMessageRequest {
            message_type: &message_type,
            body: text,
            chat_session_id: &chat_session_id,
        }
        .into_envelope();
        self.send_request(request).await
    }

    /// Sends `text` to guild chat.
    pub async fn send_guild_chat(&self, text: &str) -> Result<(), ChatError> {
        self.send_guild_message(text, DEFAULT_GUILD_MESSAGE_TYPE).await
    }

    /// Whispers `text` to a character reference (`<prefix>:<name>:<realmId>`).
    pub async fn send_whisper(&self, to: &str, text: &str) -> Result<(), ChatError> {
        let chat_session_id = self.logged_in_session_id()?;

        let request = WhisperRequest {
            to,
            body: text,
            chat_session_id: &chat_session_id,
        }
        .into_envelope();
        self.send_request(request).await
    }

    /// Logs out of chat. Needs a session id, so it fails before login has
    /// completed. The logout is finished when the service answers on
    /// `/chat-logout`. If no answer comes within
    /// [`ChatConfig::logout_timeout`](crate::ChatConfig::logout_timeout), or
    /// the connection closes first, the session drops to `LoggedOut` anyway.
    pub async fn close(&self) -> Result<(), ChatError> {
        let _guard = self.send_lock.lock().await;
        let chat_session_id = {
            let mut inner = self.lock_inner();
            let Some(id) = inner.session_id.clone() else {
                return Err(ChatError::InvalidSessionState {
                    expected: SessionState::LoggedIn,
                    actual: inner.state,
                });
            };
            inner.state = SessionState::LoggingOut;
            id
        };

        info!(target: "Chat/Session", "Logging out of chat");
        self.stop_keepalive();
        self.arm_logout_deadline();
        let request = LogoutRequest {
            chat_session_id: &chat_session_id,
        }
        .into_envelope();
        self.send_request(request).await
    }

    fn arm_logout_deadline(&self) {
        let session = self.self_ref.clone();
        let timeout = self.config.logout_timeout;
        let handle = TimerHandle::spawn(move |stop| logout_deadline(session, timeout, stop));
        let previous = self
            .logout_deadline
            .lock()
            .expect("logout deadline lock should not be poisoned")
            .replace(handle);
        if let Some(previous) = previous {
            previous.stop();
        }
    }

    pub(crate) fn cancel_logout_deadline(&self) {
        let handle = self
            .logout_deadline
            .lock()
            .expect("logout deadline lock should not be poisoned")
            .take();
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}

async fn logout_deadline(session: Weak<ChatSession>, timeout: Duration, stop: Arc<Notify>) {
    tokio::select! {
        _ = tokio::time::sleep(timeout) => {
            let Some(session) = session.upgrade() else {
                return;
            };
            if session.state() == SessionState::LoggingOut {
                warn!(
                    target: "Chat/Session",
                    "No logout confirmation after {}s, treating chat as logged out",
                    timeout.as_secs()
                );
                session.complete_logout();
            }
        },
        _ = stop.notified() => {
            debug!(target: "Chat/Session", "Logout confirmed, deadline cancelled");
        }
    }
}
