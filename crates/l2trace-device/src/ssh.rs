//! SSH-backed device sessions.
//!
//! Every command runs on its own exec channel of one authenticated
//! `ssh2::Session`. libssh2 calls block, so they run on tokio's blocking
//! pool; the session timeout bounds each of them.

use async_trait::async_trait;
use l2trace_types::OsFamily;
use ssh2::Session;
use std::io::Read;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{DeviceError, DeviceResult};
use crate::parser::CliParser;
use crate::session::{
    clean_output, CommandOptions, CommandOutput, DeviceSession, SessionConnector, SessionSettings,
};

/// Opens password-authenticated SSH sessions.
#[derive(Clone)]
pub struct SshConnector {
    parser: Arc<dyn CliParser>,
}

impl SshConnector {
    /// Creates a connector whose sessions parse structured output with `parser`.
    pub fn new(parser: Arc<dyn CliParser>) -> Self {
        Self { parser }
    }
}

#[async_trait]
impl SessionConnector for SshConnector {
    #[instrument(skip(self, settings), fields(port = settings.port))]
    async fn open(
        &self,
        host: Ipv4Addr,
        os: OsFamily,
        settings: &SessionSettings,
    ) -> DeviceResult<Box<dyn DeviceSession>> {
        let address = SocketAddr::from((host, settings.port));
        let username = settings.credentials.username().to_string();
        let password = settings.credentials.password().to_string();
        let timeout = settings.timeout;

        let session = tokio::task::spawn_blocking(move || {
            connect(address, &username, &password, timeout)
        })
        .await??;

        info!(%host, %os, "Opened SSH session");

        Ok(Box::new(SshSession {
            session: Arc::new(session),
            host,
            os,
            command_delay: settings.command_delay(),
            parser: Arc::clone(&self.parser),
            closed: false,
        }))
    }
}

fn connect(
    address: SocketAddr,
    username: &str,
    password: &str,
    timeout: Duration,
) -> DeviceResult<Session> {
    let tcp = TcpStream::connect_timeout(&address, timeout)
        .map_err(|source| DeviceError::Connect { address, source })?;

    let mut session = Session::new()?;
    session.set_timeout(timeout_millis(timeout));
    session.set_tcp_stream(tcp);
    session.handshake()?;

    let rejected = || DeviceError::Authentication {
        host: address.ip().to_string(),
        username: username.to_string(),
    };
    session
        .userauth_password(username, password)
        .map_err(|_| rejected())?;
    if !session.authenticated() {
        return Err(rejected());
    }

    Ok(session)
}

fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// An open SSH session to one device.
pub struct SshSession {
    session: Arc<Session>,
    host: Ipv4Addr,
    os: OsFamily,
    command_delay: Duration,
    parser: Arc<dyn CliParser>,
    closed: bool,
}

impl SshSession {
    fn ensure_open(&self) -> DeviceResult<()> {
        if self.closed {
            return Err(DeviceError::Closed {
                host: self.host.to_string(),
            });
        }
        Ok(())
    }
}

fn exec(session: &Session, command: &str) -> DeviceResult<String> {
    let mut channel = session.channel_session()?;
    channel.exec(command)?;

    let mut output = String::new();
    channel
        .read_to_string(&mut output)
        .map_err(|source| DeviceError::Read {
            command: command.to_string(),
            source,
        })?;

    channel.wait_close()?;
    Ok(output)
}

#[async_trait]
impl DeviceSession for SshSession {
    fn host(&self) -> Ipv4Addr {
        self.host
    }

    async fn run(&mut self, command: &str, options: CommandOptions) -> DeviceResult<CommandOutput> {
        self.ensure_open()?;

        if !self.command_delay.is_zero() {
            tokio::time::sleep(self.command_delay).await;
        }

        debug!(host = %self.host, command = %command, "Sending command");

        let session = Arc::clone(&self.session);
        let owned_command = command.to_string();
        let raw = tokio::task::spawn_blocking(move || exec(&session, &owned_command)).await??;

        let text = clean_output(&raw, command, options);
        if options.structured {
            let records = self.parser.parse(self.os, command, &text)?;
            debug!(host = %self.host, command = %command, records = records.len(), "Parsed output");
            Ok(CommandOutput::Structured(records))
        } else {
            Ok(CommandOutput::Raw(text))
        }
    }

    async fn close(&mut self) -> DeviceResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let session = Arc::clone(&self.session);
        let result = tokio::task::spawn_blocking(move || {
            session.disconnect(None, "trace complete", None)
        })
        .await?;

        match result {
            Ok(()) => {
                debug!(host = %self.host, "Closed SSH session");
                Ok(())
            }
            Err(e) => {
                warn!(host = %self.host, error = %e, "SSH disconnect failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TemplateParser;
    use crate::session::Credentials;

    #[test]
    fn test_timeout_millis_saturates() {
        assert_eq!(timeout_millis(Duration::from_secs(15)), 15_000);
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[tokio::test]
    async fn test_open_refused_port_is_connect_error() {
        let parser = Arc::new(TemplateParser::builtin().unwrap());
        let connector = SshConnector::new(parser);

        // Bind and drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let settings = SessionSettings::new(Credentials::new("u", "p"))
            .with_port(port)
            .with_timeout(Duration::from_secs(2));

        let result = connector
            .open(Ipv4Addr::LOCALHOST, OsFamily::Ios, &settings)
            .await;

        match result {
            Err(DeviceError::Connect { address, .. }) => assert_eq!(address.port(), port),
            Err(other) => panic!("expected connect error, got {other}"),
            Ok(_) => panic!("expected connect error"),
        }
    }
}
