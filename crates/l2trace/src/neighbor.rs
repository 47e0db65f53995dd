//! CDP neighbor matching
//!
//! The MAC address table names ports in abbreviated form (`Gi1/0/24`) and CDP
//! in full form (`GigabitEthernet1/0/24`). A CDP record belongs to the egress
//! port when the first two characters agree and the part of the CDP name
//! after `net` equals the numeric suffix of the abbreviated name. The first
//! record that satisfies both wins.

use l2trace_device::{FieldValuesExt, Record};
use l2trace_types::{first_two_chars, PortName};
use std::net::Ipv4Addr;
use tracing::{info, warn};

use crate::error::{TraceError, TraceResult};
use crate::types::EndReason;

/// Field names of parsed CDP neighbor records.
pub mod fields {
    pub const LOCAL_PORT: &str = "local_port";
    pub const CAPABILITIES: &str = "capabilities";
    pub const MANAGEMENT_IP: &str = "management_ip";
    pub const MGMT_IP: &str = "mgmt_ip";
    pub const SOFTWARE_VERSION: &str = "software_version";
    pub const VERSION: &str = "version";
}

/// Capability string of a CDP neighbor that is an end host.
pub const HOST_CAPABILITY: &str = "Host";

/// Literal that ends the type part of a full CDP interface name.
const FULL_NAME_SEPARATOR: &str = "net";

/// Where the walk goes after the current switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHop {
    /// A switch to visit next.
    Found {
        ip: Ipv4Addr,
        /// Software version the neighbor advertises, if any.
        version: Option<String>,
    },
    /// The walk ends at the current switch.
    EndOfPath {
        reason: EndReason,
        /// A device seen past the current switch, even though the walk
        /// does not continue into it.
        discovered: Option<Ipv4Addr>,
    },
}

/// Finds the CDP neighbor on `local_port` and decides where the walk goes.
///
/// Only a `local_port` without an alphabetic prefix is an error; every other
/// gap in the CDP data ends the walk.
pub fn match_neighbor(
    local_port: &str,
    records: &[Record],
    destination: Ipv4Addr,
    host: Ipv4Addr,
) -> TraceResult<NextHop> {
    let port = PortName::new(local_port)
        .map_err(|_| TraceError::AmbiguousPortFormat(local_port.to_string()))?;

    let Some(record) = records
        .iter()
        .find(|r| record_matches(r, port.family(), port.suffix()))
    else {
        info!(%host, port = %local_port, "No CDP info, last hop is {} port {}", host, local_port);
        return Ok(NextHop::EndOfPath {
            reason: EndReason::NoCdpInfo,
            discovered: None,
        });
    };

    let next_ip = record
        .first_of(&[fields::MANAGEMENT_IP, fields::MGMT_IP])
        .and_then(|ip| match ip.parse::<Ipv4Addr>() {
            Ok(ip) => Some(ip),
            Err(_) => {
                warn!(%host, address = %ip, "Ignoring non-IPv4 CDP management address");
                None
            }
        });
    let version = record
        .first_of(&[fields::SOFTWARE_VERSION, fields::VERSION])
        .map(str::to_string);
    let cdp_port = record.get_field_or(fields::LOCAL_PORT, local_port);

    if next_ip == Some(destination) {
        info!(%host, port = %cdp_port, "Device is CDP enabled and found on {} {}", host, cdp_port);
        return Ok(NextHop::EndOfPath {
            reason: EndReason::DestinationReached,
            discovered: next_ip,
        });
    }

    if record.get_field(fields::CAPABILITIES).map(str::trim) == Some(HOST_CAPABILITY) {
        info!(%host, port = %cdp_port, "Non-switch detected, unable to trace beyond {}", host);
        return Ok(NextHop::EndOfPath {
            reason: EndReason::NonSwitchEndpoint,
            discovered: next_ip,
        });
    }

    match next_ip {
        Some(ip) => Ok(NextHop::Found { ip, version }),
        None => {
            warn!(%host, port = %cdp_port, "CDP neighbor advertises no management address, last hop is {}", host);
            Ok(NextHop::EndOfPath {
                reason: EndReason::NoCdpInfo,
                discovered: None,
            })
        }
    }
}

fn record_matches(record: &Record, family: &str, suffix: &str) -> bool {
    let Some(cdp_port) = record.get_field(fields::LOCAL_PORT) else {
        return false;
    };
    first_two_chars(cdp_port) == family && cdp_port.split(FULL_NAME_SEPARATOR).nth(1) == Some(suffix)
}
