//! Engram — a local, key-gated memory daemon.
//!
//! Engram stores categorized free-text "memory" entries in a single SQLite
//! table and exposes them over a small HTTP API. Every endpoint is gated by
//! one static API key generated fresh at process start. System activity is
//! recorded in an append-only JSON-lines event log, and a background
//! heartbeat task writes a periodic self-check line to that log.
//!
//! # Architecture
//!
//! - **Storage**: one SQLite table (`memory`), accessed through a single
//!   long-lived connection behind a process-wide mutex
//! - **Search**: substring match (`LIKE`) over entry content, full scan
//! - **Transport**: HTTP/JSON via axum, all routes behind an `X-API-KEY`
//!   header check
//! - **Observability**: an append-only JSON-lines event log, retrievable
//!   over the API (last 100 lines)
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization and schema
//! - [`event_log`] — Append-only JSON-lines event log
//! - [`memory`] — Memory store: insert and substring search
//! - [`auth`] — API secret generation and the request authentication gate
//! - [`api`] — HTTP handlers, router, and error mapping
//! - [`heartbeat`] — Periodic background self-check loop
//! - [`server`] — Startup sequence and the serving loop

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod event_log;
pub mod heartbeat;
pub mod memory;
pub mod server;
