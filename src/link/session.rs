// src/link/session.rs

use std::io::{Read, Write};
use tracing::{debug, info};

use crate::error::{Result, VizError};
use crate::link::prompt::PromptReader;

/// Command/response session with the logger over any byte stream.
///
/// The logger prints a prompt when it wakes up and after every response.
/// Commands are single lines; responses are everything before the next prompt.
pub struct TelemetryLink<S> {
    reader: PromptReader<S>,
}

impl<S: Read + Write> TelemetryLink<S> {
    pub fn new(stream: S) -> Self {
        Self {
            reader: PromptReader::new(stream),
        }
    }

    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }

    /// Blocks until the logger announces itself with a prompt.
    /// Returns whatever it printed before the prompt.
    pub fn wait_for_prompt(&mut self) -> Result<String> {
        let banner = self.read_response()?;
        debug!("Logger awake");
        Ok(banner)
    }

    /// Sends one command line and returns the response.
    pub fn send_command(&mut self, command: &str) -> Result<String> {
        debug!("-> {}", command);
        let stream = self.reader.get_mut();
        stream.write_all(command.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        self.read_response()
    }

    fn read_response(&mut self) -> Result<String> {
        match self.reader.read_until_prompt()? {
            Some(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            None => Err(VizError::link("connection closed before prompt")),
        }
    }

    /// All log lines newer than `since` (`YYYY/M/D,H:M:S`).
    pub fn pull_since(&mut self, since: &str) -> Result<String> {
        info!("Requesting data newer than {}", since);
        self.send_command(&format!("get {}", since))
    }

    pub fn ls(&mut self) -> Result<String> {
        self.send_command("ls")
    }

    pub fn cat(&mut self, file_name: &str) -> Result<String> {
        self.send_command(&format!("cat {}", file_name))
    }

    pub fn rm(&mut self, file_name: &str) -> Result<String> {
        self.send_command(&format!("rm {}", file_name))
    }

    pub fn test(&mut self, file_name: &str) -> Result<String> {
        self.send_command(&format!("test {}", file_name))
    }
}


// src/link/session.rs
