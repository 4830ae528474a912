//! Metric record model shared by the extraction engines and the emitter.

use std::fmt;

/// Numeric value extracted from command output.
///
/// The variant is selected by the captured text: a decimal point means
/// `Float`, anything else `Int`. The variant survives until print time so
/// an integer capture renders whole (`1200`) while a float capture always
/// keeps a fractional part (`45.0`, `1.2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Parses captured text into a value.
    ///
    /// Returns `None` when the text is not numeric; the caller drops that
    /// single record and keeps processing the rest of the cycle.
    pub fn parse(text: &str) -> Option<Self> {
        if text.contains('.') {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float)
        } else {
            text.parse::<i64>().ok().map(Value::Int)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // A whole-valued float still prints one fractional digit so the
            // numeric kind stays visible downstream.
            Value::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Single tag attached to a record. The line protocol allows at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One extracted data point, ready for the emitter.
///
/// Records are created fresh per rule match, serialized immediately and
/// dropped; nothing is buffered across cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Fully prefixed metric name (namespace already applied).
    pub name: String,
    /// Epoch seconds. Every record of the same cycle carries the same value.
    pub timestamp: i64,
    pub value: Value,
    pub tag: Option<Tag>,
}
