//! Scripted source for tests.

use std::collections::VecDeque;
use std::io;

use super::{CaptureError, Source};

/// Test double that replays a fixed sequence of capture results.
///
/// Each `capture()` call consumes the next scripted entry. Once the script
/// is exhausted every further call fails, so scheduler tests should bound
/// the loop with `max_cycles`.
#[derive(Debug, Default)]
pub struct MockSource {
    script: VecDeque<Result<String, CaptureError>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful capture.
    pub fn push_ok(mut self, text: impl Into<String>) -> Self {
        self.script.push_back(Ok(text.into()));
        self
    }

    /// Queues a failed capture.
    pub fn push_err(mut self, error: CaptureError) -> Self {
        self.script.push_back(Err(error));
        self
    }
}

impl Source for MockSource {
    fn capture(&mut self) -> Result<String, CaptureError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(CaptureError::Io(io::Error::other("mock script exhausted"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_script_in_order() {
        let mut source = MockSource::new()
            .push_ok("first")
            .push_err(CaptureError::NonZeroExit(Some(1)))
            .push_ok("second");

        assert_eq!(source.capture().unwrap(), "first");
        assert!(matches!(
            source.capture(),
            Err(CaptureError::NonZeroExit(Some(1)))
        ));
        assert_eq!(source.capture().unwrap(), "second");
        // Exhausted script keeps failing.
        assert!(source.capture().is_err());
    }
}
