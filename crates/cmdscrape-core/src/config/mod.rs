//! Collector configuration.
//!
//! A collector is fully described by a `CollectorConfig`: the command to
//! invoke, the poll interval, the metric namespace, which extraction engine
//! to run, and the pattern tables. Configurations come from a JSON file or
//! from one of the built-in presets that reproduce the classic collectors.

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Which extraction engine a collector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Match each rule against the leading summary paragraphs of the output.
    Summary,
    /// Match a generic `label: value` pattern against every output line.
    Lines,
}

/// Uncompiled extraction rule: metric name plus a pattern with exactly one
/// numeric capture group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub pattern: String,
}

/// Uncompiled classification rule for the line-sample engine.
///
/// When `pattern` matches a normalized label the record is renamed to
/// `metric` and the first capture group becomes the value of `tag_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub pattern: String,
    pub metric: String,
    pub tag_key: String,
}

fn default_timeout_secs() -> u64 {
    15
}

/// Complete description of one collector instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// External command to invoke: program followed by its arguments.
    pub command: Vec<String>,
    /// Poll period in seconds.
    pub interval_secs: u64,
    /// Bound on one command execution, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefix applied to every metric name (e.g. `hadoop.dfs.`).
    #[serde(default)]
    pub namespace: String,
    pub mode: ExtractMode,
    /// Extraction rules, applied in order (summary mode).
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// Classification rules, tried in order, first match wins (lines mode).
    #[serde(default)]
    pub classifiers: Vec<ClassifierSpec>,
}

impl CollectorConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Looks up a built-in preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "hadoop-dfs" => Some(Self::hadoop_dfs()),
            "sensors" => Some(Self::sensors()),
            _ => None,
        }
    }

    /// Names of the built-in presets, for CLI help and error messages.
    pub fn preset_names() -> &'static [&'static str] {
        &["hadoop-dfs", "sensors"]
    }

    /// HDFS summary collector: scrapes `hadoop dfsadmin -report` every 30s.
    pub fn hadoop_dfs() -> Self {
        let rule = |name: &str, pattern: &str| RuleSpec {
            name: name.to_string(),
            pattern: pattern.to_string(),
        };
        Self {
            command: vec![
                "hadoop".to_string(),
                "dfsadmin".to_string(),
                "-report".to_string(),
            ],
            interval_secs: 30,
            timeout_secs: default_timeout_secs(),
            namespace: "hadoop.dfs.".to_string(),
            mode: ExtractMode::Summary,
            rules: vec![
                rule("capacity.configured", r"Configured\sCapacity:\s(\d+)"),
                rule("capacity.present", r"Present\sCapacity:\s(\d+)"),
                rule("capacity.remaining", r"DFS\sRemaining:\s(\d+)"),
                rule("capacity.used", r"DFS\sUsed:\s(\d+)"),
                rule("blocks.underreplicated", r"Under\sreplicated\sblocks:\s(\d+)"),
                rule(
                    "blocks.with_corrupt_replicas",
                    r"Blocks\swith\scorrupt\sreplicas:\s(\d+)",
                ),
                rule("blocks.missing", r"Missing\sblocks:\s(\d+)"),
                rule(
                    "datanodes.available",
                    r"Datanodes available: (\d+) \(\d+ total, \d+ dead\)",
                ),
                rule(
                    "datanodes.total",
                    r"Datanodes available: \d+ \((\d+) total, \d+ dead\)",
                ),
                rule(
                    "datanodes.dead",
                    r"Datanodes available: \d+ \(\d+ total, (\d+) dead\)",
                ),
            ],
            classifiers: Vec::new(),
        }
    }

    /// lm-sensors collector: scrapes `sensors` every 10s, tagging per-core
    /// temperatures and fan speeds.
    pub fn sensors() -> Self {
        Self {
            command: vec!["sensors".to_string()],
            interval_secs: 10,
            timeout_secs: default_timeout_secs(),
            namespace: "sensors.".to_string(),
            mode: ExtractMode::Lines,
            rules: Vec::new(),
            classifiers: vec![
                ClassifierSpec {
                    pattern: r"Core_(\d+)".to_string(),
                    metric: "coretemp".to_string(),
                    tag_key: "core".to_string(),
                },
                ClassifierSpec {
                    pattern: r"fan(\d+)".to_string(),
                    metric: "fanspeed".to_string(),
                    tag_key: "fan".to_string(),
                },
            ],
        }
    }

    /// Checks structural constraints that do not require pattern compilation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.is_empty() || self.command[0].is_empty() {
            return Err(ConfigError::MissingCommand);
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::BadInterval);
        }
        Ok(())
    }
}

/// Error type for configuration failures. These are startup-time only; the
/// daemon reports them and exits before the collection loop begins.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    Io(io::Error),
    /// Configuration file is not valid JSON for `CollectorConfig`.
    Parse(serde_json::Error),
    /// A rule or classifier pattern failed to compile or does not have
    /// exactly one capture group.
    BadPattern { pattern: String, reason: String },
    /// No command configured.
    MissingCommand,
    /// Poll interval must be at least one second.
    BadInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config: {}", e),
            ConfigError::BadPattern { pattern, reason } => {
                write!(f, "bad pattern {:?}: {}", pattern, reason)
            }
            ConfigError::MissingCommand => write!(f, "no command configured"),
            ConfigError::BadInterval => write!(f, "interval must be at least 1 second"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
