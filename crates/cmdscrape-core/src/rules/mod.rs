//! Compiled pattern rule tables.
//!
//! Rules and classifiers arrive as plain strings in a `CollectorConfig` and
//! are compiled once at startup into an immutable `RuleTable` that is passed
//! explicitly into the extraction engines. There is no process-wide mutable
//! state: a table never changes after construction.

use regex::Regex;

use crate::config::{ClassifierSpec, ConfigError, RuleSpec};
use crate::record::Tag;

/// One extraction rule: a metric name and a pattern whose single capture
/// group yields the raw value text.
#[derive(Debug, Clone)]
pub struct MetricRule {
    pub name: String,
    pub pattern: Regex,
}

/// Secondary classification rule for the line-sample engine.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub pattern: Regex,
    pub metric: String,
    pub tag_key: String,
}

/// Immutable, ordered rule table built once at startup.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<MetricRule>,
    classifiers: Vec<Classifier>,
}

impl RuleTable {
    /// Compiles rule and classifier specs into a table.
    ///
    /// Every pattern must compile and contain exactly one capture group;
    /// anything else is a configuration error reported before the
    /// collection loop starts.
    pub fn compile(
        rules: &[RuleSpec],
        classifiers: &[ClassifierSpec],
    ) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|spec| {
                Ok(MetricRule {
                    name: spec.name.clone(),
                    pattern: compile_pattern(&spec.pattern)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let classifiers = classifiers
            .iter()
            .map(|spec| {
                Ok(Classifier {
                    pattern: compile_pattern(&spec.pattern)?,
                    metric: spec.metric.clone(),
                    tag_key: spec.tag_key.clone(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { rules, classifiers })
    }

    /// Extraction rules in table order.
    pub fn rules(&self) -> &[MetricRule] {
        &self.rules
    }

    /// Classification rules in priority order.
    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    /// Runs the classifiers against a normalized label, first match wins.
    ///
    /// Returns the replacement metric name and the derived tag, or `None`
    /// when no classifier matches and the label itself names the metric.
    pub fn classify(&self, label: &str) -> Option<(&str, Tag)> {
        for classifier in &self.classifiers {
            if let Some(caps) = classifier.pattern.captures(label) {
                let value = caps.get(1).map_or("", |m| m.as_str());
                return Some((
                    classifier.metric.as_str(),
                    Tag::new(classifier.tag_key.clone(), value),
                ));
            }
        }
        None
    }
}

/// Compiles one pattern and checks it has exactly one capture group.
fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern).map_err(|e| ConfigError::BadPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    // captures_len counts the implicit whole-match group.
    if regex.captures_len() != 2 {
        return Err(ConfigError::BadPattern {
            pattern: pattern.to_string(),
            reason: format!(
                "expected exactly 1 capture group, found {}",
                regex.captures_len() - 1
            ),
        });
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorConfig;

    #[test]
    fn compiles_builtin_presets() {
        for name in CollectorConfig::preset_names() {
            let config = CollectorConfig::preset(name).unwrap();
            let table = RuleTable::compile(&config.rules, &config.classifiers).unwrap();
            assert_eq!(table.rules().len(), config.rules.len());
            assert_eq!(table.classifiers().len(), config.classifiers.len());
        }
    }

    #[test]
    fn rejects_invalid_pattern() {
        let spec = RuleSpec {
            name: "broken".to_string(),
            pattern: r"(unclosed".to_string(),
        };
        assert!(matches!(
            RuleTable::compile(&[spec], &[]),
            Err(ConfigError::BadPattern { .. })
        ));
    }

    #[test]
    fn rejects_wrong_capture_group_count() {
        let none = RuleSpec {
            name: "none".to_string(),
            pattern: r"\d+".to_string(),
        };
        assert!(RuleTable::compile(&[none], &[]).is_err());

        let two = RuleSpec {
            name: "two".to_string(),
            pattern: r"(\d+) \((\d+)".to_string(),
        };
        assert!(RuleTable::compile(&[two], &[]).is_err());
    }

    #[test]
    fn classify_is_first_match_wins() {
        let config = CollectorConfig::sensors();
        let table = RuleTable::compile(&config.rules, &config.classifiers).unwrap();

        let (metric, tag) = table.classify("Core_0").unwrap();
        assert_eq!(metric, "coretemp");
        assert_eq!(tag, Tag::new("core", "0"));

        let (metric, tag) = table.classify("fan12").unwrap();
        assert_eq!(metric, "fanspeed");
        assert_eq!(tag, Tag::new("fan", "12"));

        assert!(table.classify("vcore").is_none());
    }
}
