//! Device access for l2trace.
//!
//! This crate provides the two collaborators a trace talks through:
//!
//! - [`session`]: the [`SessionConnector`] / [`DeviceSession`] traits and
//!   the session settings shared by every hop
//! - [`ssh`]: an SSH implementation of those traits
//! - [`parser`]: template-driven parsing of CLI output into [`Record`]s
//! - [`commands`]: the commands a trace issues, per OS family
//! - [`error`]: error types for device operations
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use l2trace_device::{
//!     Credentials, ParserConfig, SessionConnector, SessionSettings, SshConnector,
//!     TemplateParser,
//! };
//!
//! let parser = Arc::new(TemplateParser::new(&ParserConfig::default())?);
//! let connector = SshConnector::new(parser);
//! let settings = SessionSettings::new(Credentials::new("netops", password));
//!
//! let mut session = connector.open(host, OsFamily::Ios, &settings).await?;
//! let neighbors = session.run_records("show cdp neighbors detail").await?;
//! session.close().await?;
//! ```

pub mod commands;
pub mod error;
pub mod parser;
pub mod record;
pub mod session;
pub mod ssh;

// Re-export commonly used items at crate root
pub use error::{DeviceError, DeviceResult};
pub use parser::{CliParser, ParserConfig, TemplateParser};
pub use record::{FieldValue, FieldValues, FieldValuesExt, Record};
pub use session::{
    defaults, CommandOptions, CommandOutput, Credentials, DeviceSession, SessionConnector,
    SessionSettings,
};
pub use ssh::{SshConnector, SshSession};
