//! Hop Visit
//!
//! Visits one switch: pings the destination, looks the MAC address up in the
//! forwarding table, resolves port-channels to a physical member and reads
//! the CDP neighbors. Device failures never escape a visit; they become a
//! [`HopOutcome::Failed`] that ends the walk at this hop.

use l2trace_device::{commands, DeviceSession, Record, SessionConnector, SessionSettings};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{TraceError, TraceResult};
use crate::fdb::extract_port;
use crate::port_channel::extract_member;
use crate::types::HopRequest;

/// Printed by IOS for every echo reply.
pub const PING_SUCCESS_MARKER: &str = "!";

/// Echo reply line printed by NX-OS (`64 bytes from ...`).
pub const ECHO_SIZE_MARKER: &str = "64 bytes";

/// What one visit found.
#[derive(Debug)]
pub enum HopOutcome {
    /// The MAC address is behind `port`; `neighbors` are the CDP records of the switch.
    Located { port: String, neighbors: Vec<Record> },
    /// The destination did not answer the ping.
    Unreachable,
    /// The forwarding table has no entry for the MAC address.
    MacNotFound,
    /// The session could not be opened or a command failed.
    Failed(TraceError),
}

/// Result of probing one switch.
#[derive(Debug)]
pub struct HopResult {
    pub host: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub outcome: HopOutcome,
}

/// Visits switches through a [`SessionConnector`]. Holds no state between visits.
#[derive(Clone)]
pub struct HopRunner {
    connector: Arc<dyn SessionConnector>,
}

impl HopRunner {
    pub fn new(connector: Arc<dyn SessionConnector>) -> Self {
        Self { connector }
    }

    /// Visits `request.host`.
    ///
    /// Opens exactly one session and closes it before returning, whichever
    /// branch is taken, unless opening itself fails.
    #[instrument(skip(self, request, settings), fields(host = %request.host, os = %request.os))]
    pub async fn visit(&self, request: &HopRequest, settings: &SessionSettings) -> HopResult {
        let outcome = match self.connector.open(request.host, request.os, settings).await {
            Ok(mut session) => {
                let outcome = match interrogate(session.as_mut(), request).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        report_failure(request.host, &e);
                        HopOutcome::Failed(e)
                    }
                };
                if let Err(e) = session.close().await {
                    warn!(host = %request.host, error = %e, "Failed to close session");
                }
                outcome
            }
            Err(e) => {
                let e = TraceError::from(e);
                report_failure(request.host, &e);
                HopOutcome::Failed(e)
            }
        };

        HopResult {
            host: request.host,
            destination: request.destination,
            outcome,
        }
    }
}

async fn interrogate(
    session: &mut dyn DeviceSession,
    request: &HopRequest,
) -> TraceResult<HopOutcome> {
    let host = request.host;
    let os = request.os;

    let ping = session
        .run_text(&commands::build_ping_cmd(os, request.destination))
        .await?;
    if !ping_succeeded(&ping) {
        warn!(%host, destination = %request.destination, "Destination {} is not reachable from {}", request.destination, host);
        return Ok(HopOutcome::Unreachable);
    }
    info!(%host, destination = %request.destination, "Destination pinged");

    let entries = session
        .run_text(&commands::build_mac_lookup_cmd(os, &request.mac))
        .await?;
    if entries.trim().is_empty() {
        warn!(%host, mac = %request.mac, "MAC address {} not found on {}", request.mac, host);
        return Ok(HopOutcome::MacNotFound);
    }

    let learned = extract_port(&entries)?;
    info!(%host, port = %learned, "MAC address found on interface {}", learned);

    let members = session
        .run_text(&commands::build_port_channel_members_cmd(os, &learned))
        .await?;
    let port = if members.trim().is_empty() {
        learned
    } else {
        let member = extract_member(&members)?;
        debug!(%host, port_channel = %learned, member = %member, "Resolved port-channel member");
        member
    };

    let neighbors = session
        .run_records(&commands::build_cdp_neighbors_cmd(os))
        .await?;
    info!(%host, port = %port, neighbors = neighbors.len(), "Checking port {} in CDP", port);

    Ok(HopOutcome::Located { port, neighbors })
}

fn ping_succeeded(output: &str) -> bool {
    output.contains(PING_SUCCESS_MARKER) || output.contains(ECHO_SIZE_MARKER)
}

fn report_failure(host: Ipv4Addr, err: &TraceError) {
    error!(%host, error = %err, "Unable to complete hop on {}, {}", host, failure_hint(err));
}

/// Operator guidance for a failed hop.
fn failure_hint(err: &TraceError) -> &'static str {
    if err.is_malformed_output() {
        return "may need to adjust delay factor";
    }
    match err {
        TraceError::Session(e) if e.is_transient() => {
            "check that the switch is reachable or raise the timeout"
        }
        TraceError::Session(_) => "check credentials and templates",
        _ => "last hop reached",
    }
}
