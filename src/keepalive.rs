use crate::session::{ChatSession, SessionState};
use chatcore::protocol::ProtocolEnvelope;
use chatcore::request::KeepAliveRequest;
use log::{debug, info, warn};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A spawned session timer and the signal that stops it.
pub(crate) struct TimerHandle {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub(crate) fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Arc<Notify>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let stop = Arc::new(Notify::new());
        let task = tokio::spawn(body(stop.clone()));
        Self { stop, task }
    }

    /// `notify_one` stores a permit, so a task that is mid-send still sees it.
    pub(crate) fn stop(self) {
        self.stop.notify_one();
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl ChatSession {
    /// Starts the keep-alive loop unless one is already running.
    pub(crate) fn start_keepalive(&self) {
        let mut slot = self
            .keepalive
            .lock()
            .expect("keep-alive lock should not be poisoned");
        if slot.as_ref().is_some_and(TimerHandle::is_running) {
            return;
        }

        let interval = self.config.effective_keep_alive_interval();
        if interval != self.config.keep_alive_interval {
            warn!(
                target: "Chat/Keepalive",
                "Keep-alive interval {:?} is too short, using {:?}",
                self.config.keep_alive_interval, interval
            );
        }

        let session = self.self_ref.clone();
        *slot = Some(TimerHandle::spawn(move |stop| {
            keepalive_loop(session, interval, stop)
        }));
        debug!(
            target: "Chat/Keepalive",
            "Started keep-alive every {}s", interval.as_secs()
        );
    }

    /// Stops the keep-alive loop. Stopping when nothing runs is a no-op.
    pub(crate) fn stop_keepalive(&self) {
        let handle = self
            .keepalive
            .lock()
            .expect("keep-alive lock should not be poisoned")
            .take();
        if let Some(handle) = handle {
            debug!(target: "Chat/Keepalive", "Stopping keep-alive");
            handle.stop();
        }
    }

    pub fn is_keepalive_running(&self) -> bool {
        self.keepalive
            .lock()
            .expect("keep-alive lock should not be poisoned")
            .as_ref()
            .is_some_and(TimerHandle::is_running)
    }

    /// Sends one keep-alive. Returns false once the session has left
    /// `LoggedIn`, checked under the send lock so a concurrent `close`
    /// cannot slip its logout in ahead of this request.
    async fn send_keepalive(&self) -> bool {
        let _guard = self.send_lock.lock().await;
        if self.state() != SessionState::LoggedIn {
            return false;
        }

        info!(target: "Chat/Keepalive", "Sending keep-alive");
        let request = KeepAliveRequest {
            identity: &self.identity,
        }
        .into_envelope();

        if let Err(e) = self.send_request(request).await {
            warn!(target: "Chat/Keepalive", "Keep-alive failed: {e}");
        }
        true
    }
}

/// Fires a keep-alive request every `interval` until stopped, until the
/// session leaves `LoggedIn`, or until the session itself is dropped.
async fn keepalive_loop(session: Weak<ChatSession>, interval: Duration, stop: Arc<Notify>) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let Some(session) = session.upgrade() else {
                    debug!(target: "Chat/Keepalive", "Session dropped, exiting keep-alive loop.");
                    return;
                };
                if !session.send_keepalive().await {
                    debug!(target: "Chat/Keepalive", "Not logged in, exiting keep-alive loop.");
                    return;
                }
            },
            _ = stop.notified() => {
                debug!(target: "Chat/Keepalive", "Stop signaled, exiting keep-alive loop.");
                return;
            }
        }
    }
}
