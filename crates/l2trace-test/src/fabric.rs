//! Scripted switch fabric
//!
//! `FakeFabric` implements `SessionConnector` over a set of scripted devices.
//! Each device answers commands from a table of canned outputs; commands it
//! has no answer for return empty output, which is what a filtered `show`
//! prints when nothing matches. Every open, command and close is recorded.

use async_trait::async_trait;
use l2trace_device::{
    commands, session::clean_output, CliParser, CommandOptions, CommandOutput, DeviceError,
    DeviceResult, DeviceSession, SessionConnector, SessionSettings, TemplateParser,
};
use l2trace_types::{MacAddress, OsFamily};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

use crate::fixtures::{self, CdpNeighbor};

/// Something that happened on the fabric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Opened { host: Ipv4Addr, os: OsFamily },
    Command { host: Ipv4Addr, command: String },
    Closed { host: Ipv4Addr },
}

/// A scripted device.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    os: OsFamily,
    outputs: HashMap<String, String>,
    refuse_login: bool,
    failing_command: Option<String>,
}

impl FakeDevice {
    pub fn new(os: OsFamily) -> Self {
        Self {
            os,
            outputs: HashMap::new(),
            refuse_login: false,
            failing_command: None,
        }
    }

    pub fn ios() -> Self {
        Self::new(OsFamily::Ios)
    }

    pub fn nxos() -> Self {
        Self::new(OsFamily::Nxos)
    }

    /// Answers `command` with `output`.
    pub fn respond(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    /// Pings to `destination` succeed.
    pub fn reaches(self, destination: Ipv4Addr) -> Self {
        let os = self.os;
        self.respond(
            commands::build_ping_cmd(os, destination),
            fixtures::ping_success(os, destination),
        )
    }

    /// Pings to `destination` fail.
    pub fn cannot_reach(self, destination: Ipv4Addr) -> Self {
        let os = self.os;
        self.respond(
            commands::build_ping_cmd(os, destination),
            fixtures::ping_failure(os, destination),
        )
    }

    /// `mac` is learned on `port`.
    pub fn learns(self, mac: &MacAddress, port: &str) -> Self {
        let os = self.os;
        self.respond(
            commands::build_mac_lookup_cmd(os, mac),
            fixtures::mac_table_entry(os, mac, port),
        )
    }

    /// `port_channel` aggregates `members`.
    pub fn port_channel(self, port_channel: &str, members: &[&str]) -> Self {
        let os = self.os;
        self.respond(
            commands::build_port_channel_members_cmd(os, port_channel),
            fixtures::port_channel_members(os, members),
        )
    }

    /// CDP neighbors reported by this device.
    pub fn neighbors(self, neighbors: &[CdpNeighbor]) -> Self {
        let os = self.os;
        self.respond(
            commands::build_cdp_neighbors_cmd(os),
            fixtures::cdp_neighbors_detail(os, neighbors),
        )
    }

    /// Rejects every login attempt.
    pub fn refuse_login(mut self) -> Self {
        self.refuse_login = true;
        self
    }

    /// `command` fails with a read timeout.
    pub fn fail_on(mut self, command: impl Into<String>) -> Self {
        self.failing_command = Some(command.into());
        self
    }
}

#[derive(Default)]
struct FabricState {
    devices: HashMap<Ipv4Addr, FakeDevice>,
    events: Vec<SessionEvent>,
}

/// In-memory fabric of scripted devices.
#[derive(Clone)]
pub struct FakeFabric {
    state: Arc<Mutex<FabricState>>,
    parser: Arc<TemplateParser>,
}

impl Default for FakeFabric {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeFabric {
    /// Creates an empty fabric whose sessions parse output with the built-in templates.
    pub fn new() -> Self {
        let parser = TemplateParser::builtin().expect("built-in templates must compile");
        Self {
            state: Arc::new(Mutex::new(FabricState::default())),
            parser: Arc::new(parser),
        }
    }

    /// Adds or replaces the device at `host`.
    pub fn add_device(&self, host: Ipv4Addr, device: FakeDevice) -> &Self {
        self.state.lock().devices.insert(host, device);
        self
    }

    /// All events so far, in order.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.state.lock().events.clone()
    }

    /// Commands sent to `host`, in order.
    pub fn commands_for(&self, host: Ipv4Addr) -> Vec<String> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Command { host: h, command } if *h == host => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of sessions opened to `host`.
    pub fn open_count(&self, host: Ipv4Addr) -> usize {
        self.count(|e| matches!(e, SessionEvent::Opened { host: h, .. } if *h == host))
    }

    /// Number of sessions closed on `host`.
    pub fn close_count(&self, host: Ipv4Addr) -> usize {
        self.count(|e| matches!(e, SessionEvent::Closed { host: h } if *h == host))
    }

    /// Hosts in the order sessions were opened to them.
    pub fn visited(&self) -> Vec<Ipv4Addr> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Opened { host, .. } => Some(*host),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|e| pred(e)).count()
    }

    fn record(&self, event: SessionEvent) {
        debug!(?event, "Fabric event");
        self.state.lock().events.push(event);
    }
}

#[async_trait]
impl SessionConnector for FakeFabric {
    async fn open(
        &self,
        host: Ipv4Addr,
        os: OsFamily,
        settings: &SessionSettings,
    ) -> DeviceResult<Box<dyn DeviceSession>> {
        let device = self.state.lock().devices.get(&host).cloned();

        let device = device.ok_or_else(|| DeviceError::Connect {
            address: SocketAddr::from((host, settings.port)),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        })?;

        if device.refuse_login {
            return Err(DeviceError::Authentication {
                host: host.to_string(),
                username: settings.credentials.username().to_string(),
            });
        }

        self.record(SessionEvent::Opened { host, os });

        Ok(Box::new(FakeSession {
            fabric: self.clone(),
            device,
            host,
            os,
            closed: false,
        }))
    }
}

struct FakeSession {
    fabric: FakeFabric,
    device: FakeDevice,
    host: Ipv4Addr,
    os: OsFamily,
    closed: bool,
}

#[async_trait]
impl DeviceSession for FakeSession {
    fn host(&self) -> Ipv4Addr {
        self.host
    }

    async fn run(&mut self, command: &str, options: CommandOptions) -> DeviceResult<CommandOutput> {
        if self.closed {
            return Err(DeviceError::Closed {
                host: self.host.to_string(),
            });
        }

        self.fabric.record(SessionEvent::Command {
            host: self.host,
            command: command.to_string(),
        });

        if self.device.failing_command.as_deref() == Some(command) {
            return Err(DeviceError::Read {
                command: command.to_string(),
                source: io::Error::new(io::ErrorKind::TimedOut, "timed out waiting for output"),
            });
        }

        let raw = self.device.outputs.get(command).cloned().unwrap_or_default();
        let text = clean_output(&raw, command, options);

        if options.structured {
            let records = self.fabric.parser.parse(self.os, command, &text)?;
            Ok(CommandOutput::Structured(records))
        } else {
            Ok(CommandOutput::Raw(text))
        }
    }

    async fn close(&mut self) -> DeviceResult<()> {
        if !self.closed {
            self.closed = true;
            self.fabric.record(SessionEvent::Closed { host: self.host });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l2trace_device::Credentials;

    fn settings() -> SessionSettings {
        SessionSettings::new(Credentials::new("netops", "secret"))
    }

    #[tokio::test]
    async fn test_unknown_host_is_refused() {
        let fabric = FakeFabric::new();
        let result = fabric
            .open(Ipv4Addr::new(10, 0, 0, 9), OsFamily::Ios, &settings())
            .await;
        assert!(matches!(result, Err(DeviceError::Connect { .. })));
        assert!(fabric.events().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_commands_are_recorded() {
        let host = Ipv4Addr::new(10, 0, 0, 1);
        let dst = Ipv4Addr::new(10, 0, 0, 50);
        let fabric = FakeFabric::new();
        fabric.add_device(host, FakeDevice::ios().reaches(dst));

        let mut session = fabric.open(host, OsFamily::Ios, &settings()).await.unwrap();
        let ping = session.run_text(&commands::build_ping_cmd(OsFamily::Ios, dst)).await.unwrap();
        assert!(ping.contains("!!!!!"));

        let empty = session.run_text("show mac address-table | include 0000.0000.0001").await.unwrap();
        assert!(empty.is_empty());

        session.close().await.unwrap();
        session.close().await.unwrap();

        assert_eq!(fabric.open_count(host), 1);
        assert_eq!(fabric.close_count(host), 1);
        assert_eq!(fabric.commands_for(host).len(), 2);
    }

    #[tokio::test]
    async fn test_refused_login() {
        let host = Ipv4Addr::new(10, 0, 0, 1);
        let fabric = FakeFabric::new();
        fabric.add_device(host, FakeDevice::ios().refuse_login());

        let result = fabric.open(host, OsFamily::Ios, &settings()).await;
        assert!(matches!(result, Err(DeviceError::Authentication { .. })));
        assert_eq!(fabric.open_count(host), 0);
    }
}
