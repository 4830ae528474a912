//! Line-sample extraction: a generic `label: value` pattern per line with
//! secondary classification for tag derivation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::record::{MetricRecord, Value};
use crate::rules::RuleTable;

/// Generic `label: value` line pattern. The label is greedy, the value is a
/// signed decimal (optional leading `+`/`-`, optional decimal point);
/// trailing units (`°C`, `RPM`, `V`) fall outside the value class.
static LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*):\s*([+\-\d.]+)").expect("literal pattern compiles"));

/// Canonicalizes a raw label: spaces become underscores, `+` is stripped.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|&c| c != '+')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

/// Scans every line of the capture and emits one record per matching line,
/// preserving input order.
///
/// Classification runs on the normalized label before any case folding, so
/// case-sensitive classifier patterns (`Core_(\d+)`) keep their meaning;
/// unclassified labels are lowercased to form the metric name.
pub(crate) fn extract(
    table: &RuleTable,
    namespace: &str,
    text: &str,
    timestamp: i64,
) -> Vec<MetricRecord> {
    let mut records = Vec::new();

    for line in text.lines() {
        let Some(caps) = LINE_PATTERN.captures(line) else {
            continue;
        };
        let raw_label = caps.get(1).map_or("", |m| m.as_str());
        let raw_value = caps.get(2).map_or("", |m| m.as_str());
        let Some(value) = Value::parse(raw_value) else {
            debug!(label = raw_label, raw = raw_value, "captured value is not numeric, skipping");
            continue;
        };

        let label = normalize_label(raw_label);
        let (metric, tag) = match table.classify(&label) {
            Some((metric, tag)) => (metric.to_string(), Some(tag)),
            None => (label.to_lowercase(), None),
        };

        records.push(MetricRecord {
            name: format!("{}{}", namespace, metric),
            timestamp,
            value,
            tag,
        });
    }

    records
}
