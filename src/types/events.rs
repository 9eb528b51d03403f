use crate::session::ChatSession;
use std::sync::{Arc, RwLock};
pub use chatcore::types::events::*;

/// Receives every [`Event`] a chat session emits.
///
/// Handlers run inline on the task that delivered the triggering
/// connection event, so they should return quickly.
pub trait EventHandler: Send + Sync {
    /// `session` may be cloned and moved into a spawned task to reply.
    fn handle_event(&self, session: &Arc<ChatSession>, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Arc<ChatSession>, &Event) + Send + Sync,
{
    fn handle_event(&self, session: &Arc<ChatSession>, event: &Event) {
        self(session, event)
    }
}

/// Subscriber list for a session. Events with no subscribers are dropped.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .expect("RwLock should not be poisoned")
            .push(handler);
    }

    pub fn dispatch(&self, session: &Arc<ChatSession>, event: &Event) {
        // Snapshot so a handler may register further handlers.
        let handlers = self
            .handlers
            .read()
            .expect("RwLock should not be poisoned")
            .clone();
        for handler in handlers {
            handler.handle_event(session, event);
        }
    }
}
