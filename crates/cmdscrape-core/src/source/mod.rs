//! Source adapters that produce one raw text capture per cycle.
//!
//! The `Source` trait is the seam between the collection loop and the
//! external command. Production uses `CommandSource`; tests script captures
//! and failures through `MockSource` without spawning anything.

pub mod command;
pub mod mock;

pub use command::CommandSource;
pub use mock::MockSource;

use std::fmt;
use std::io;
use std::time::Duration;

/// Produces the raw text for one collection cycle.
pub trait Source {
    /// Runs one capture and returns the full text output.
    ///
    /// A failure abandons the cycle: the scheduler logs it and continues at
    /// the next interval. Capture errors are never fatal to the process.
    fn capture(&mut self) -> Result<String, CaptureError>;
}

/// Error type for capture failures.
#[derive(Debug)]
pub enum CaptureError {
    /// The command could not be started (missing executable, permissions).
    Spawn(io::Error),
    /// The command ran but exited with a non-zero status.
    NonZeroExit(Option<i32>),
    /// The command did not finish within the configured timeout.
    Timeout(Duration),
    /// Reading the command output failed.
    Io(io::Error),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Spawn(e) => write!(f, "failed to start command: {}", e),
            CaptureError::NonZeroExit(Some(code)) => {
                write!(f, "command exited with status {}", code)
            }
            CaptureError::NonZeroExit(None) => write!(f, "command terminated by signal"),
            CaptureError::Timeout(limit) => {
                write!(f, "command did not finish within {:?}", limit)
            }
            CaptureError::Io(e) => write!(f, "I/O error reading command output: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<io::Error> for CaptureError {
    fn from(e: io::Error) -> Self {
        CaptureError::Io(e)
    }
}
