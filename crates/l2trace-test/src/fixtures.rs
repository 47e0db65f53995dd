//! CLI output fixtures
//!
//! Text shaped like what IOS and NX-OS print for the commands a trace sends.

use l2trace_types::{MacAddress, OsFamily};
use std::net::Ipv4Addr;

/// Successful ping output.
pub fn ping_success(os: OsFamily, destination: Ipv4Addr) -> String {
    match os {
        OsFamily::Ios => format!(
            "Type escape sequence to abort.\n\
             Sending 5, 100-byte ICMP Echos to {destination}, timeout is 2 seconds:\n\
             !!!!!\n\
             Success rate is 100 percent (5/5), round-trip min/avg/max = 1/1/2 ms"
        ),
        OsFamily::Nxos => format!(
            "PING {destination} ({destination}): 56 data bytes\n\
             64 bytes from {destination}: icmp_seq=0 ttl=254 time=0.712 ms\n\
             64 bytes from {destination}: icmp_seq=1 ttl=254 time=0.455 ms\n\
             \n\
             --- {destination} ping statistics ---\n\
             2 packets transmitted, 2 packets received, 0.00% packet loss"
        ),
    }
}

/// Failed ping output.
pub fn ping_failure(os: OsFamily, destination: Ipv4Addr) -> String {
    match os {
        OsFamily::Ios => format!(
            "Type escape sequence to abort.\n\
             Sending 5, 100-byte ICMP Echos to {destination}, timeout is 2 seconds:\n\
             .....\n\
             Success rate is 0 percent (0/5)"
        ),
        OsFamily::Nxos => format!(
            "PING {destination} ({destination}): 56 data bytes\n\
             Request 0 timed out\n\
             Request 1 timed out\n\
             \n\
             --- {destination} ping statistics ---\n\
             2 packets transmitted, 0 packets received, 100.00% packet loss"
        ),
    }
}

/// One MAC address-table line, as left by `| include <mac>`.
pub fn mac_table_entry(os: OsFamily, mac: &MacAddress, port: &str) -> String {
    match os {
        OsFamily::Ios => format!("  10    {mac}    DYNAMIC     {port}"),
        OsFamily::Nxos => format!("*   10     {mac}   dynamic  0         F      F    {port}"),
    }
}

/// The `Members` line of a port-channel interface.
pub fn port_channel_members(os: OsFamily, members: &[&str]) -> String {
    match os {
        OsFamily::Ios => format!("  Members in this channel: {}", members.join(" ")),
        OsFamily::Nxos => format!("  Members in this channel: {}", members.join(", ")),
    }
}

/// A CDP neighbor to render into `show cdp neighbors detail` output.
#[derive(Debug, Clone)]
pub struct CdpNeighbor {
    pub device_id: String,
    pub address: Option<Ipv4Addr>,
    pub platform: String,
    pub capabilities: String,
    pub local_port: String,
    pub remote_port: String,
    pub version: String,
}

impl CdpNeighbor {
    /// A Catalyst switch running IOS.
    pub fn ios_switch(device_id: &str, address: Ipv4Addr, local_port: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            address: Some(address),
            platform: "cisco WS-C3850-24T".to_string(),
            capabilities: "Switch IGMP".to_string(),
            local_port: local_port.to_string(),
            remote_port: "GigabitEthernet1/0/48".to_string(),
            version: "Cisco IOS Software, IOS-XE Software, Catalyst L3 Switch Software (CAT3K_CAA-UNIVERSALK9-M), Version 16.3.7, RELEASE SOFTWARE (fc4)".to_string(),
        }
    }

    /// A Nexus switch running NX-OS.
    pub fn nxos_switch(device_id: &str, address: Ipv4Addr, local_port: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            address: Some(address),
            platform: "N9K-C93180YC-EX".to_string(),
            capabilities: "Router Switch IGMP Filtering Supports-STP-Dispute".to_string(),
            local_port: local_port.to_string(),
            remote_port: "Ethernet1/49".to_string(),
            version: "Cisco Nexus Operating System (NX-OS) Software, Version 9.3(5)".to_string(),
        }
    }

    /// A CDP-speaking endpoint that is not a switch.
    pub fn host(device_id: &str, address: Ipv4Addr, local_port: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            address: Some(address),
            platform: "VMware ESX".to_string(),
            capabilities: "Host".to_string(),
            local_port: local_port.to_string(),
            remote_port: "vmnic0".to_string(),
            version: "Releasev 7.0.3".to_string(),
        }
    }

    /// Drops the advertised address.
    pub fn without_address(mut self) -> Self {
        self.address = None;
        self
    }
}

/// Renders `show cdp neighbors detail` output for the given OS family.
pub fn cdp_neighbors_detail(os: OsFamily, neighbors: &[CdpNeighbor]) -> String {
    neighbors
        .iter()
        .map(|n| match os {
            OsFamily::Ios => ios_cdp_entry(n),
            OsFamily::Nxos => nxos_cdp_entry(n),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ios_cdp_entry(n: &CdpNeighbor) -> String {
    let mut out = String::from("-------------------------\n");
    out.push_str(&format!("Device ID: {}\n", n.device_id));
    out.push_str("Entry address(es): \n");
    if let Some(ip) = n.address {
        out.push_str(&format!("  IP address: {ip}\n"));
    }
    out.push_str(&format!(
        "Platform: {},  Capabilities: {} \n",
        n.platform, n.capabilities
    ));
    out.push_str(&format!(
        "Interface: {},  Port ID (outgoing port): {}\n",
        n.local_port, n.remote_port
    ));
    out.push_str("Holdtime : 150 sec\n\n");
    out.push_str(&format!("Version :\n{}\n\n", n.version));
    out.push_str("advertisement version: 2\n");
    if let Some(ip) = n.address {
        out.push_str(&format!("Management address(es): \n  IP address: {ip}\n"));
    }
    out
}

fn nxos_cdp_entry(n: &CdpNeighbor) -> String {
    let mut out = String::from("----------------------------------------\n");
    out.push_str(&format!("Device ID:{}\n", n.device_id));
    out.push_str(&format!("System Name: {}\n\n", n.device_id));
    if let Some(ip) = n.address {
        out.push_str(&format!("Interface address(es): 1\n    IPv4 Address: {ip}\n"));
    }
    out.push_str(&format!(
        "Platform: {}, Capabilities: {}\n",
        n.platform, n.capabilities
    ));
    out.push_str(&format!(
        "Interface: {}, Port ID (outgoing port): {}\n",
        n.local_port, n.remote_port
    ));
    out.push_str("Holdtime: 147 sec\n\n");
    out.push_str(&format!("Version:\n{}\n\n", n.version));
    out.push_str("Advertisement Version: 2\n\n");
    if let Some(ip) = n.address {
        out.push_str(&format!("Mgmt address(es):\n    IPv4 Address: {ip}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use l2trace_device::{CliParser, FieldValuesExt, TemplateParser, commands};

    #[test]
    fn test_cdp_fixture_parses_with_builtin_templates() {
        let parser = TemplateParser::builtin().unwrap();
        let neighbors = [
            CdpNeighbor::ios_switch("dist-sw2", Ipv4Addr::new(10, 0, 0, 2), "GigabitEthernet1/0/1"),
            CdpNeighbor::host("esx-01", Ipv4Addr::new(10, 0, 0, 50), "GigabitEthernet1/0/7"),
        ];

        for os in [OsFamily::Ios, OsFamily::Nxos] {
            let text = cdp_neighbors_detail(os, &neighbors);
            let records = parser
                .parse(os, commands::CDP_NEIGHBORS_DETAIL_CMD, &text)
                .unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].get_field("local_port"), Some("GigabitEthernet1/0/1"));
            assert_eq!(records[1].get_field("capabilities"), Some("Host"));
        }
    }

    #[test]
    fn test_ping_fixtures() {
        let dst = Ipv4Addr::new(10, 0, 0, 50);
        assert!(ping_success(OsFamily::Ios, dst).contains("!!!!!"));
        assert!(ping_success(OsFamily::Nxos, dst).contains("64 bytes"));
        assert!(!ping_failure(OsFamily::Ios, dst).contains('!'));
        assert!(!ping_failure(OsFamily::Nxos, dst).contains("64"));
    }
}
