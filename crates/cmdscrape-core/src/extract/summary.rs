//! Summary-report extraction: table rules applied against the leading
//! paragraphs of the capture.

use tracing::debug;

use crate::record::{MetricRecord, Value};
use crate::rules::RuleTable;

/// Builds the summary region: the first two blank-line-delimited blocks of
/// the capture, concatenated directly.
///
/// The blocks are joined without a separator, so the last line of the first
/// block and the first line of the second block fuse into one. Report
/// commands put a divider line between the two, which keeps the rules clear
/// of the seam; the concatenation is kept as-is either way.
fn summary_region(text: &str) -> String {
    let mut blocks = text.splitn(3, "\n\n");
    let first = blocks.next().unwrap_or("");
    let second = blocks.next().unwrap_or("");
    format!("{}{}", first, second)
}

/// Runs every rule independently against the summary region, in table order.
///
/// A rule without a match simply contributes nothing this cycle; sparse
/// output is expected, not an error. Several rules may pull different
/// capture groups out of the same line.
pub(crate) fn extract(
    table: &RuleTable,
    namespace: &str,
    text: &str,
    timestamp: i64,
) -> Vec<MetricRecord> {
    let region = summary_region(text);
    let mut records = Vec::new();

    for rule in table.rules() {
        let Some(caps) = rule.pattern.captures(&region) else {
            continue;
        };
        let raw = caps.get(1).map_or("", |m| m.as_str());
        let Some(value) = Value::parse(raw) else {
            debug!(rule = %rule.name, raw, "captured value is not numeric, skipping");
            continue;
        };
        records.push(MetricRecord {
            name: format!("{}{}", namespace, rule.name),
            timestamp,
            value,
            tag: None,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorConfig;
    use crate::record::Value;
    use crate::rules::RuleTable;

    fn hadoop_table() -> RuleTable {
        let config = CollectorConfig::hadoop_dfs();
        RuleTable::compile(&config.rules, &config.classifiers).unwrap()
    }

    #[test]
    fn summary_region_joins_first_two_blocks_without_separator() {
        assert_eq!(summary_region("a\nb\n\nc\n\nd"), "a\nbc");
        assert_eq!(summary_region("only block"), "only block");
        assert_eq!(summary_region(""), "");
    }

    #[test]
    fn three_rules_extract_from_one_datanodes_line() {
        let table = hadoop_table();
        let text = "Configured Capacity: 100\n\nDatanodes available: 5 (7 total, 2 dead)\n";
        let records = extract(&table, "hadoop.dfs.", text, 1);

        let find = |name: &str| {
            records
                .iter()
                .find(|r| r.name == name)
                .unwrap_or_else(|| panic!("missing {}", name))
        };
        assert_eq!(find("hadoop.dfs.datanodes.available").value, Value::Int(5));
        assert_eq!(find("hadoop.dfs.datanodes.total").value, Value::Int(7));
        assert_eq!(find("hadoop.dfs.datanodes.dead").value, Value::Int(2));
    }

    #[test]
    fn unmatched_rules_are_skipped_silently() {
        let table = hadoop_table();
        let records = extract(&table, "hadoop.dfs.", "DFS Used: 40\n", 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "hadoop.dfs.capacity.used");
    }

    #[test]
    fn rules_outside_first_two_blocks_do_not_match() {
        let table = hadoop_table();
        // The per-datanode details live in the third block and beyond.
        let text = "DFS Used: 40\n\nDatanodes available: 1 (1 total, 0 dead)\n\nName: 10.0.0.1\nDFS Used: 999999\n";
        let records = extract(&table, "hadoop.dfs.", text, 1);
        let used = records
            .iter()
            .find(|r| r.name == "hadoop.dfs.capacity.used")
            .unwrap();
        assert_eq!(used.value, Value::Int(40));
    }

    #[test]
    fn output_order_follows_table_order() {
        let table = hadoop_table();
        let text = "DFS Used: 40\nConfigured Capacity: 100\n";
        let records = extract(&table, "hadoop.dfs.", text, 1);
        // Table lists capacity.configured before capacity.used, regardless
        // of the order the lines appear in.
        assert_eq!(records[0].name, "hadoop.dfs.capacity.configured");
        assert_eq!(records[1].name, "hadoop.dfs.capacity.used");
    }
}
