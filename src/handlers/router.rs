use super::chat::ChatHandler;
use super::login::LoginHandler;
use super::logout::LogoutHandler;
use super::traits::ResponseHandler;
use crate::session::ChatSession;
use chatcore::Envelope;
use std::collections::HashMap;
use std::sync::Arc;

/// Central router for dispatching inbound responses by their `target` route.
pub struct ResponseRouter {
    /// Map of route -> handler for fast lookups
    handlers: HashMap<&'static str, Arc<dyn ResponseHandler>>,
}

impl ResponseRouter {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A router with the login, logout and chat handlers registered.
    pub fn with_default_handlers() -> Self {
        let mut router = Self::new();
        router.register(Arc::new(LoginHandler));
        router.register(Arc::new(LogoutHandler));
        router.register(Arc::new(ChatHandler));
        router
    }

    /// Register a handler for its route.
    ///
    /// # Panics
    /// Panics if a handler is already registered for the same route to prevent
    /// accidental overwrites during initialization.
    pub fn register(&mut self, handler: Arc<dyn ResponseHandler>) {
        let target = handler.target();
        if self.handlers.insert(target, handler).is_some() {
            panic!("Handler for target '{}' already registered", target);
        }
    }

    /// Dispatch an envelope to the handler for its target.
    ///
    /// Returns `false` if no handler is registered for the target or the
    /// handler did not consume the envelope.
    pub fn dispatch(&self, session: &ChatSession, envelope: &Envelope) -> bool {
        match self.handlers.get(envelope.target.as_str()) {
            Some(handler) => handler.handle(session, envelope),
            None => false,
        }
    }

    /// Get the number of registered handlers (useful for testing).
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for ResponseRouter {
    fn default() -> Self {
        Self::new()
    }
}
