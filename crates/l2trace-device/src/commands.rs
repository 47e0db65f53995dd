//! Command builders for the show/ping commands a trace issues.

use l2trace_types::{MacAddress, OsFamily};
use std::net::Ipv4Addr;

/// Neighbor discovery command; its output is parsed into records.
pub const CDP_NEIGHBORS_DETAIL_CMD: &str = "show cdp neighbors detail";

/// Build reachability check command
///
/// The ping also refreshes the MAC table entry for the destination.
pub fn build_ping_cmd(_os: OsFamily, destination: Ipv4Addr) -> String {
    format!("ping {}", destination)
}

/// Build MAC address-table lookup command, filtered to one address
pub fn build_mac_lookup_cmd(_os: OsFamily, mac: &MacAddress) -> String {
    format!("show mac address-table | include {}", mac)
}

/// Build port-channel membership command
///
/// Output is empty for a physical port.
pub fn build_port_channel_members_cmd(os: OsFamily, port: &str) -> String {
    match os {
        OsFamily::Ios => format!("show interfaces {} | include Members", port),
        OsFamily::Nxos => format!("show interface {} | include Members", port),
    }
}

/// Build CDP neighbor detail command
pub fn build_cdp_neighbors_cmd(_os: OsFamily) -> String {
    CDP_NEIGHBORS_DETAIL_CMD.to_string()
}
