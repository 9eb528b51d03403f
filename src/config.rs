use std::time::Duration;

/// How often a logged-in session pings the service to keep chat presence alive.
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(120);

/// Shortest keep-alive interval a session will run with.
pub const MIN_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(1);

/// How long a session waits in `LoggingOut` for the service to confirm.
pub const DEFAULT_LOGOUT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Clamped to [`MIN_KEEP_ALIVE_INTERVAL`] when the loop starts.
    pub keep_alive_interval: Duration,
    /// Sent as `options.matureFilter` on login.
    pub mature_filter: bool,
    pub logout_timeout: Duration,
}

impl ChatConfig {
    pub(crate) fn effective_keep_alive_interval(&self) -> Duration {
        self.keep_alive_interval.max(MIN_KEEP_ALIVE_INTERVAL)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            mature_filter: false,
            logout_timeout: DEFAULT_LOGOUT_TIMEOUT,
        }
    }
}
