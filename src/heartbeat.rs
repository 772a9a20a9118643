//! Periodic background self-check.
//!
//! One perpetual loop, started at launch and never joined or cancelled —
//! process exit is the only way to stop it. Each tick writes an `INFO` line
//! to the event log, then sleeps the configured interval. Failures are
//! logged and the loop continues after the same fixed delay; background work
//! is resilient where request-path work is not.

use std::sync::Arc;
use std::time::Duration;

use crate::event_log::EventLog;

/// Message written on every successful tick.
pub const HEARTBEAT_MESSAGE: &str = "Self-check: engram running smoothly";

/// Run the heartbeat loop forever.
pub async fn run(events: Arc<EventLog>, interval: Duration) {
    tracing::info!(interval_secs = interval.as_secs(), "heartbeat started");

    loop {
        if let Err(e) = events.append("INFO", HEARTBEAT_MESSAGE) {
            // The event log is itself the likely failing component here, so
            // the error line may fail too; fall back to tracing and keep going.
            let error_line = format!("Background maintenance error: {e}");
            if let Err(e2) = events.append("ERROR", &error_line) {
                tracing::error!(error = %e2, "heartbeat could not write to event log");
            }
        }
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::EventRecord;

    #[tokio::test]
    async fn heartbeat_writes_info_lines() {
        let dir = tempfile::tempdir().unwrap();
        let events = Arc::new(EventLog::new(dir.path().join("events.jsonl")));

        let task = tokio::spawn(run(Arc::clone(&events), Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();

        let lines = events.tail(100).unwrap().unwrap();
        assert!(!lines.is_empty());
        let record: EventRecord = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record.level, "INFO");
        assert_eq!(record.message, HEARTBEAT_MESSAGE);
    }

    #[tokio::test]
    async fn heartbeat_survives_unwritable_log() {
        // Point the log at a directory path — every append fails, but the
        // loop must keep ticking rather than exit.
        let dir = tempfile::tempdir().unwrap();
        let events = Arc::new(EventLog::new(dir.path().to_path_buf()));

        let task = tokio::spawn(run(Arc::clone(&events), Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!task.is_finished());
        task.abort();
    }
}
