//! cmdscrape-core — library for the cmdscrape collector.
//!
//! Provides:
//! - `source` — command invocation and capture (with a mock for tests)
//! - `rules` — compiled pattern rule tables
//! - `extract` — summary-report and line-sample extraction engines
//! - `record` — metric record and value model
//! - `emit` — line-protocol emitter
//! - `scheduler` — the capture → extract → emit loop
//! - `config` — collector configuration and built-in presets
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────── Scheduler ─────────────────────────┐
//! │                                                            │
//! │  ┌────────┐    text    ┌───────────┐   records  ┌───────┐  │
//! │  │ Source ├───────────►│ Extractor ├───────────►│Emitter│  │
//! │  └───┬────┘            └─────┬─────┘            └───┬───┘  │
//! │      │                       │                      │      │
//! └──────┼───────────────────────┼──────────────────────┼──────┘
//!        │                       │                      │
//!  external command          RuleTable              stdout
//! ```
//!
//! Data flows one way per cycle; nothing is retained between cycles.

pub mod config;
pub mod emit;
pub mod extract;
pub mod record;
pub mod rules;
pub mod scheduler;
pub mod source;
