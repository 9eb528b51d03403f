//! Replaying captured connection traffic through a session.
//!
//! A capture is a JSON-lines file of [`ConnectionEvent`]s, one per line:
//!
//! ```text
//! {"event": "session_established"}
//! {"event": "response_received", "envelope": {"target": "/chat-login", "chatSessionId": "xyz"}}
//! {"event": "session_closed", "reason": "bye"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chatcore::Envelope;
use chatcore::net::{Connection, ConnectionEvent};
use log::debug;
use std::path::Path;
use std::sync::Mutex;

pub fn parse_events(input: &str) -> Result<Vec<ConnectionEvent>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("invalid connection event on line {}", idx + 1))
        })
        .collect()
}

pub async fn load_events(path: &Path) -> Result<Vec<ConnectionEvent>> {
    let input = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read capture {}", path.display()))?;
    parse_events(&input)
}

/// A connection that records every request instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    sent: Mutex<Vec<Envelope>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().expect("recording lock should not be poisoned").clone()
    }

    /// Requests sent on `target`.
    pub fn sent_to(&self, target: &str) -> Vec<Envelope> {
        self.sent()
            .into_iter()
            .filter(|env| env.target == target)
            .collect()
    }

    pub fn take_sent(&self) -> Vec<Envelope> {
        std::mem::take(&mut *self.sent.lock().expect("recording lock should not be poisoned"))
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn send_request(&self, request: Envelope) -> Result<()> {
        debug!(target: "Chat/Replay", "Recorded request to {}", request.target);
        self.sent
            .lock()
            .expect("recording lock should not be poisoned")
            .push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CAPTURE: &str = r#"
# login
{"event": "session_established"}
{"event": "response_received", "envelope": {"target": "/chat-login", "chatSessionId": "xyz"}}

{"event": "error", "envelope": {"target": "/chat-disconnect", "body": "kicked"}, "target": "/chat-disconnect", "reason": "kicked"}
"#;

    #[test]
    fn test_parse_events_skips_comments_and_blanks() {
        let events = parse_events(CAPTURE).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ConnectionEvent::SessionEstablished);
        assert!(matches!(
            &events[2],
            ConnectionEvent::Error { reason, .. } if reason == "kicked"
        ));
    }

    #[test]
    fn test_parse_events_reports_line_number() {
        let err = parse_events("{\"event\": \"session_established\"}\n{not json}").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }

    #[tokio::test]
    async fn test_load_events_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CAPTURE.as_bytes()).unwrap();

        let events = load_events(file.path()).await.unwrap();
        assert_eq!(events.len(), 3);
    }

    #[tokio::test]
    async fn test_recording_connection_keeps_order() {
        let conn = RecordingConnection::new();
        conn.send_request(Envelope::new("/a")).await.unwrap();
        conn.send_request(Envelope::new("/b")).await.unwrap();

        assert_eq!(conn.sent_to("/b").len(), 1);
        let targets: Vec<_> = conn.take_sent().into_iter().map(|e| e.target).collect();
        assert_eq!(targets, ["/a", "/b"]);
        assert!(conn.sent().is_empty());
    }
}
