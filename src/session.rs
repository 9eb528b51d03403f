use crate::config::ChatConfig;
use crate::handlers::router::ResponseRouter;
use crate::keepalive::TimerHandle;
use crate::types::events::{Event, EventBus, EventHandler};
use chatcore::net::{Connection, ConnectionEvent};
use chatcore::protocol::{ProtocolEnvelope, routes};
use chatcore::request::{ChatIdentity, LoginRequest};
use chatcore::{Envelope, EnvelopeError};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat session is {actual}, operation requires {expected}")]
    InvalidSessionState {
        expected: SessionState,
        actual: SessionState,
    },
    #[error("malformed envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("connection error: {0}")]
    Connection(#[from] anyhow::Error),
}

/// Where a chat session is in its login lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggingIn,
    LoggedIn,
    LoggingOut,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoggedOut => "logged out",
            Self::LoggingIn => "logging in",
            Self::LoggedIn => "logged in",
            Self::LoggingOut => "logging out",
        };
        f.write_str(s)
    }
}

/// State shared between the response handlers and the close path.
#[derive(Debug, Default)]
pub(crate) struct SessionInner {
    pub(crate) state: SessionState,
    pub(crate) session_id: Option<String>,
}

/// A chat session riding on an established service connection.
///
/// The session logs in once the connection reports it is established,
/// keeps the chat presence alive while logged in, and turns inbound
/// `/chat` traffic into [`Event`]s for the registered handlers.
pub struct ChatSession {
    pub(crate) identity: ChatIdentity,
    pub(crate) config: ChatConfig,
    pub(crate) connection: Arc<dyn Connection>,

    /// State and session id. Never held across an `.await`.
    pub(crate) inner: Mutex<SessionInner>,
    pub(crate) keepalive: Mutex<Option<TimerHandle>>,
    /// Armed by `close`, cancelled when the logout is confirmed.
    pub(crate) logout_deadline: Mutex<Option<TimerHandle>>,
    /// Serializes keep-alive sends against `close`, so no keep-alive
    /// leaves after the logout request.
    pub(crate) send_lock: tokio::sync::Mutex<()>,

    pub(crate) router: ResponseRouter,
    pub(crate) event_bus: EventBus,

    /// Timers hold this so they never keep the session alive on their own.
    /// Upgraded for the duration of each event dispatch.
    pub(crate) self_ref: Weak<ChatSession>,
}

impl ChatSession {
    pub fn new(
        connection: Arc<dyn Connection>,
        identity: ChatIdentity,
        config: ChatConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            identity,
            config,
            connection,
            inner: Mutex::new(SessionInner::default()),
            keepalive: Mutex::new(None),
            logout_deadline: Mutex::new(None),
            send_lock: tokio::sync::Mutex::new(()),
            router: ResponseRouter::with_default_handlers(),
            event_bus: EventBus::new(),
            self_ref: self_ref.clone(),
        })
    }

    pub fn identity(&self) -> &ChatIdentity {
        &self.identity
    }

    pub fn state(&self) -> SessionState {
        self.lock_inner().state
    }

    /// The id the service assigned at login, if any.
    pub fn session_id(&self) -> Option<String> {
        self.lock_inner().session_id.clone()
    }

    pub fn add_event_handler(&self, handler: Arc<dyn EventHandler>) {
        self.event_bus.add_handler(handler);
    }

    /// Registers a closure as an event handler.
    pub fn add_fn_handler<F>(&self, handler: F)
    where
        F: Fn(&Arc<ChatSession>, &Event) + Send + Sync + 'static,
    {
        self.event_bus.add_handler(Arc::new(handler));
    }

    pub(crate) fn lock_inner(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().expect("session state lock should not be poisoned")
    }

    pub(crate) fn dispatch_event(&self, event: &Event) {
        let Some(session) = self.self_ref.upgrade() else {
            debug!(target: "Chat/Session", "Session is being dropped, not dispatching {event:?}");
            return;
        };
        self.event_bus.dispatch(&session, event);
    }

    /// Consumes connection events until the sender side is dropped.
    ///
    /// All inbound traffic for a session should flow through here (or through
    /// [`handle_connection_event`](Self::handle_connection_event) from a single
    /// task) so that state changes are applied in delivery order.
    pub async fn run(&self, mut events: mpsc::Receiver<ConnectionEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_connection_event(event).await;
        }
        debug!(target: "Chat/Session", "Connection event stream ended");
        self.stop_keepalive();
    }

    pub async fn handle_connection_event(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::SessionEstablished => self.begin_login().await,
            ConnectionEvent::ResponseReceived { envelope } => {
                if !self.router.dispatch(self, &envelope) {
                    debug!(target: "Chat/Router", "Ignoring response for unhandled target {}", envelope.target);
                }
            }
            ConnectionEvent::SessionClosed { reason } => {
                info!(target: "Chat/Session", "Connection closed: {reason}");
                self.stop_keepalive();
                // No ack can arrive on a closed connection.
                if self.state() == SessionState::LoggingOut {
                    self.complete_logout();
                }
                self.dispatch_event(&Event::SessionClosed(reason));
            }
            ConnectionEvent::Error { target, reason, .. } => {
                if target == routes::CHAT_LOGIN || target == routes::CHAT_DISCONNECT {
                    self.fail_login(reason);
                } else {
                    warn!(target: "Chat/Session", "Service error on {target}: {reason}");
                }
            }
        }
    }

    async fn begin_login(&self) {
        let request = {
            let mut inner = self.lock_inner();
            if inner.state != SessionState::LoggedOut {
                warn!(
                    target: "Chat/Session",
                    "Connection established while {}, not logging in again", inner.state
                );
                return;
            }
            inner.state = SessionState::LoggingIn;
            LoginRequest {
                identity: &self.identity,
                mature_filter: self.config.mature_filter,
            }
            .into_envelope()
        };

        info!(
            target: "Chat/Session",
            "Logging into chat as {} on {}", self.identity.name, self.identity.realm
        );
        if let Err(e) = self.send_request(request).await {
            error!(target: "Chat/Session", "Failed to send chat login: {e}");
            let mut inner = self.lock_inner();
            if inner.state == SessionState::LoggingIn {
                inner.state = SessionState::LoggedOut;
            }
        }
    }

    pub(crate) fn complete_login(&self, session_id: String) {
        {
            let mut inner = self.lock_inner();
            if inner.state != SessionState::LoggingIn {
                warn!(
                    target: "Chat/Session",
                    "Ignoring chat login response while {}", inner.state
                );
                return;
            }
            inner.state = SessionState::LoggedIn;
            inner.session_id = Some(session_id);
        }

        info!(target: "Chat/Session", "Logged into chat");
        self.start_keepalive();
        self.dispatch_event(&Event::LoggedIn);
    }

    /// The service refused the login or dropped the chat session. The
    /// session goes back to `LoggedOut` so a new login can start.
    pub(crate) fn fail_login(&self, reason: String) {
        {
            let mut inner = self.lock_inner();
            warn!(
                target: "Chat/Session",
                "Chat login failed while {}: {reason}", inner.state
            );
            inner.state = SessionState::LoggedOut;
            inner.session_id = None;
        }
        self.stop_keepalive();
        self.cancel_logout_deadline();
        self.dispatch_event(&Event::LoginFailed(reason));
    }

    pub(crate) fn complete_logout(&self) {
        {
            let mut inner = self.lock_inner();
            if inner.state == SessionState::LoggedOut {
                debug!(target: "Chat/Session", "Logout response while already logged out");
                return;
            }
            inner.state = SessionState::LoggedOut;
            inner.session_id = None;
        }

        info!(target: "Chat/Session", "Logged out of chat");
        self.stop_keepalive();
        self.cancel_logout_deadline();
        self.dispatch_event(&Event::LoggedOut);
    }

    /// Hands a request to the connection. Failures are logged and returned;
    /// nothing is retried here.
    pub(crate) async fn send_request(&self, request: Envelope) -> Result<(), ChatError> {
        let target = request.target.clone();
        self.connection.send_request(request).await.map_err(|e| {
            warn!(target: "Chat/Session", "Sending {target} failed: {e}");
            ChatError::Connection(e)
        })
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        for slot in [&mut self.keepalive, &mut self.logout_deadline] {
            if let Ok(slot) = slot.get_mut() {
                if let Some(handle) = slot.take() {
                    handle.stop();
                }
            }
        }
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock_inner();
        f.debug_struct("ChatSession")
            .field("identity", &self.identity)
            .field("state", &inner.state)
            .field("session_id", &inner.session_id)
            .finish()
    }
}
