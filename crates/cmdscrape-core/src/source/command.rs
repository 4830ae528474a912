//! Real command source: spawns the external tool and captures its stdout.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::{CaptureError, Source};
use crate::config::ConfigError;

/// How often the child is polled while waiting for it to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spawns the configured command once per cycle and returns its full stdout.
///
/// Stdout is drained on a helper thread so the child cannot block on a full
/// pipe; the calling thread polls for exit against the timeout deadline and
/// kills the child if it runs too long. The child's stderr is discarded.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSource {
    /// Builds a source from an argv-style command list.
    pub fn from_argv(argv: &[String], timeout: Duration) -> Result<Self, ConfigError> {
        let (program, args) = argv.split_first().ok_or(ConfigError::MissingCommand)?;
        if program.is_empty() {
            return Err(ConfigError::MissingCommand);
        }
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

impl Source for CommandSource {
    fn capture(&mut self) -> Result<String, CaptureError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(CaptureError::Spawn)?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CaptureError::Io(io::Error::other("child stdout not piped")))?;
        let reader = thread::spawn(move || {
            let mut text = String::new();
            stdout.read_to_string(&mut text).map(|_| text)
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CaptureError::Timeout(self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CaptureError::Io(e));
                }
            }
        };

        // Killing the child closes the pipe, so the reader always finishes.
        let text = reader
            .join()
            .map_err(|_| CaptureError::Io(io::Error::other("output reader thread panicked")))?
            .map_err(CaptureError::Io)?;

        if !status.success() {
            return Err(CaptureError::NonZeroExit(status.code()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn captures_command_output() {
        let mut source =
            CommandSource::from_argv(&argv(&["echo", "hello"]), Duration::from_secs(5)).unwrap();
        assert_eq!(source.capture().unwrap(), "hello\n");
    }

    #[test]
    fn reports_missing_executable_as_spawn_error() {
        let mut source = CommandSource::from_argv(
            &argv(&["cmdscrape-no-such-binary"]),
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(matches!(source.capture(), Err(CaptureError::Spawn(_))));
    }

    #[test]
    fn reports_non_zero_exit() {
        let mut source =
            CommandSource::from_argv(&argv(&["sh", "-c", "exit 3"]), Duration::from_secs(5))
                .unwrap();
        match source.capture() {
            Err(CaptureError::NonZeroExit(code)) => assert_eq!(code, Some(3)),
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[test]
    fn kills_command_on_timeout() {
        let mut source =
            CommandSource::from_argv(&argv(&["sleep", "30"]), Duration::from_millis(200)).unwrap();
        let start = Instant::now();
        assert!(matches!(source.capture(), Err(CaptureError::Timeout(_))));
        // Well under the 30s the command asked for.
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn empty_argv_is_a_config_error() {
        assert!(CommandSource::from_argv(&[], Duration::from_secs(5)).is_err());
    }
}
