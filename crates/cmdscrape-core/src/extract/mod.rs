//! Pattern-based extraction engines.
//!
//! Two variants, selected per collector:
//!
//! - `summary` — matches each table rule against the leading summary
//!   paragraphs of the capture (report-style commands such as
//!   `hadoop dfsadmin -report`).
//! - `lines` — matches a generic `label: value` pattern against every line
//!   of the capture, with secondary classification for tag derivation
//!   (sample-style commands such as `sensors`).
//!
//! Both engines are pure text-in/records-out functions: a rule or line that
//! does not match is silently skipped, a capture that does not parse as a
//! number drops only that record, and output order is deterministic
//! (table order for summary, input line order for lines).

pub mod lines;
pub mod summary;

use crate::config::ExtractMode;
use crate::record::MetricRecord;
use crate::rules::RuleTable;

/// Applies the configured engine variant to raw captures.
#[derive(Debug, Clone)]
pub struct Extractor {
    mode: ExtractMode,
    table: RuleTable,
    namespace: String,
}

impl Extractor {
    pub fn new(mode: ExtractMode, table: RuleTable, namespace: impl Into<String>) -> Self {
        Self {
            mode,
            table,
            namespace: namespace.into(),
        }
    }

    /// Extracts all records from one capture.
    ///
    /// `timestamp` is the cycle's epoch second; every returned record
    /// carries it unchanged.
    pub fn extract(&self, text: &str, timestamp: i64) -> Vec<MetricRecord> {
        match self.mode {
            ExtractMode::Summary => {
                summary::extract(&self.table, &self.namespace, text, timestamp)
            }
            ExtractMode::Lines => lines::extract(&self.table, &self.namespace, text, timestamp),
        }
    }
}
