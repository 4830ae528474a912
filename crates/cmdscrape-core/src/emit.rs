//! Line-protocol emitter.
//!
//! Renders each record as `name timestamp value[ tag=value]` and flushes it
//! immediately: downstream readers consume the stream incrementally and a
//! record must appear whole or not at all.

use std::io::{self, Write};

use crate::record::MetricRecord;

/// Writes records to an output stream, one line per record.
#[derive(Debug)]
pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes one record and flushes the stream.
    ///
    /// The tag segment is omitted entirely when the record has no tag; there
    /// is no trailing separator in that case.
    pub fn emit(&mut self, record: &MetricRecord) -> io::Result<()> {
        match &record.tag {
            Some(tag) => writeln!(
                self.out,
                "{} {} {} {}={}",
                record.name, record.timestamp, record.value, tag.key, tag.value
            )?,
            None => writeln!(
                self.out,
                "{} {} {}",
                record.name, record.timestamp, record.value
            )?,
        }
        self.out.flush()
    }

    /// Consumes the emitter, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Tag, Value};
    use std::io::Read;

    fn record(name: &str, value: Value, tag: Option<Tag>) -> MetricRecord {
        MetricRecord {
            name: name.to_string(),
            timestamp: 1288946927,
            value,
            tag,
        }
    }

    #[test]
    fn tagged_record_appends_single_tag_pair() {
        let mut emitter = Emitter::new(Vec::new());
        emitter
            .emit(&record(
                "sensors.coretemp",
                Value::Float(45.0),
                Some(Tag::new("core", "0")),
            ))
            .unwrap();
        let out = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(out, "sensors.coretemp 1288946927 45.0 core=0\n");
    }

    #[test]
    fn untagged_record_has_no_trailing_segment() {
        let mut emitter = Emitter::new(Vec::new());
        emitter
            .emit(&record("hadoop.dfs.datanodes.dead", Value::Int(2), None))
            .unwrap();
        let out = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(out, "hadoop.dfs.datanodes.dead 1288946927 2\n");
    }

    #[test]
    fn records_are_flushed_per_emit() {
        // Write through a real file handle: the record must be visible to a
        // second reader right after emit() returns.
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut emitter = Emitter::new(file.reopen().unwrap());
        emitter
            .emit(&record("sensors.vcore", Value::Float(1.2), None))
            .unwrap();

        let mut seen = String::new();
        file.reopen().unwrap().read_to_string(&mut seen).unwrap();
        assert_eq!(seen, "sensors.vcore 1288946927 1.2\n");
    }
}
