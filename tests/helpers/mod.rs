#![allow(dead_code)]

use engram::api::{router, AppState};
use engram::auth;
use engram::db;
use engram::event_log::EventLog;
use rusqlite::Connection;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Open a fresh in-memory database with the schema applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    conn
}

/// A running API instance bound to an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub api_key: String,
    pub events: Arc<EventLog>,
    // Keep the temp dir alive for the duration of the test
    _data_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Spin up the full router (auth gate included) on 127.0.0.1:0.
pub async fn spawn_app() -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let db = Arc::new(Mutex::new(test_db()));
    let events = Arc::new(EventLog::new(data_dir.path().join("events.jsonl")));
    let api_key = auth::generate_secret();

    let state = AppState::new(db, Arc::clone(&events), &api_key);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        api_key,
        events,
        _data_dir: data_dir,
    }
}
