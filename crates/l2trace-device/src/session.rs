//! Device session abstraction.
//!
//! A [`SessionConnector`] opens an authenticated [`DeviceSession`] to one
//! device; the session runs one command at a time and returns either the raw
//! text or, when requested, the records parsed from it.

use async_trait::async_trait;
use l2trace_types::OsFamily;
use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::{DeviceError, DeviceResult};
use crate::record::Record;

/// Default session settings.
pub mod defaults {
    use std::time::Duration;

    /// SSH port.
    pub const SSH_PORT: u16 = 22;

    /// Per-session timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(15);

    /// Multiplier applied to [`BASE_COMMAND_DELAY`].
    pub const DELAY_FACTOR: f64 = 0.5;

    /// Pause before each command at a delay factor of 1.0.
    pub const BASE_COMMAND_DELAY: Duration = Duration::from_secs(1);
}

/// Login credentials. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings shared by every session of a trace.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Login credentials.
    pub credentials: Credentials,
    /// Bound on connect, authentication and each command round-trip.
    pub timeout: Duration,
    /// Scales the pause inserted before each command.
    pub delay_factor: f64,
    /// TCP port of the SSH service.
    pub port: u16,
}

impl SessionSettings {
    /// Creates settings with default timeout, delay factor and port.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            timeout: defaults::TIMEOUT,
            delay_factor: defaults::DELAY_FACTOR,
            port: defaults::SSH_PORT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay_factor(mut self, delay_factor: f64) -> Self {
        self.delay_factor = delay_factor;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Pause inserted before each command.
    pub fn command_delay(&self) -> Duration {
        if self.delay_factor.is_finite() && self.delay_factor > 0.0 {
            defaults::BASE_COMMAND_DELAY.mul_f64(self.delay_factor)
        } else {
            Duration::ZERO
        }
    }
}

/// Per-command output handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Drop a trailing device prompt line.
    pub strip_prompt: bool,
    /// Drop a leading echo of the command.
    pub strip_command: bool,
    /// Parse the output into records instead of returning text.
    pub structured: bool,
}

impl CommandOptions {
    /// Cleaned raw text.
    pub const fn raw() -> Self {
        Self {
            strip_prompt: true,
            strip_command: true,
            structured: false,
        }
    }

    /// Records parsed by the session's output parser.
    pub const fn structured() -> Self {
        Self {
            strip_prompt: true,
            strip_command: true,
            structured: true,
        }
    }
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self::raw()
    }
}

/// Output of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Raw(String),
    Structured(Vec<Record>),
}

/// An open, authenticated session to one device.
#[async_trait]
pub trait DeviceSession: Send {
    /// Address of the device this session talks to.
    fn host(&self) -> Ipv4Addr;

    /// Runs a single command.
    async fn run(&mut self, command: &str, options: CommandOptions) -> DeviceResult<CommandOutput>;

    /// Closes the session. Closing twice is not an error.
    async fn close(&mut self) -> DeviceResult<()>;

    /// Runs a command and returns its cleaned text.
    async fn run_text(&mut self, command: &str) -> DeviceResult<String> {
        match self.run(command, CommandOptions::raw()).await? {
            CommandOutput::Raw(text) => Ok(text),
            CommandOutput::Structured(_) => Err(DeviceError::internal(format!(
                "raw output requested for '{}' but records were returned",
                command
            ))),
        }
    }

    /// Runs a command and returns its parsed records.
    async fn run_records(&mut self, command: &str) -> DeviceResult<Vec<Record>> {
        match self.run(command, CommandOptions::structured()).await? {
            CommandOutput::Structured(records) => Ok(records),
            CommandOutput::Raw(_) => Err(DeviceError::internal(format!(
                "records requested for '{}' but raw text was returned",
                command
            ))),
        }
    }
}

/// Opens sessions to devices.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn open(
        &self,
        host: Ipv4Addr,
        os: OsFamily,
        settings: &SessionSettings,
    ) -> DeviceResult<Box<dyn DeviceSession>>;
}

/// Normalizes line endings and applies the echo/prompt stripping options.
pub fn clean_output(raw: &str, command: &str, options: CommandOptions) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = text.lines().collect();

    if options.strip_command {
        if let Some(first) = lines.first() {
            if first.trim() == command.trim() {
                lines.remove(0);
            }
        }
    }

    if options.strip_prompt {
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        if lines.last().is_some_and(|l| is_prompt(l)) {
            lines.pop();
        }
    }

    lines.join("\n").trim_end().to_string()
}

/// A prompt is a single token ending in `#` or `>` (`switch1#`, `nx-core(config)#`).
fn is_prompt(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && !line.contains(char::is_whitespace)
        && (line.ends_with('#') || line.ends_with('>'))
}
