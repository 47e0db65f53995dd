//! Type definitions for a trace run

use l2trace_types::{MacAddress, OsFamily};
use std::fmt;
use std::net::Ipv4Addr;

/// What to trace and where to start. Built once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTarget {
    /// IP address of the host being located
    pub destination: Ipv4Addr,
    /// MAC address of the host being located
    pub mac: MacAddress,
    /// First switch to log into
    pub start: Ipv4Addr,
    /// OS family of the first switch
    pub start_os: OsFamily,
}

impl SearchTarget {
    pub fn new(destination: Ipv4Addr, mac: MacAddress, start: Ipv4Addr, start_os: OsFamily) -> Self {
        Self {
            destination,
            mac,
            start,
            start_os,
        }
    }
}

/// Input of one hop, rebuilt for every device visited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopRequest {
    /// Device to log into
    pub host: Ipv4Addr,
    /// OS family of that device
    pub os: OsFamily,
    /// IP address of the host being located
    pub destination: Ipv4Addr,
    /// MAC address of the host being located
    pub mac: MacAddress,
}

impl HopRequest {
    /// The request for visiting `host` on behalf of `target`.
    pub fn for_target(target: &SearchTarget, host: Ipv4Addr, os: OsFamily) -> Self {
        Self {
            host,
            os,
            destination: target.destination,
            mac: target.mac,
        }
    }
}

/// Why a walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The destination did not answer a ping from the current switch
    Unreachable,
    /// The current switch has not learned the MAC address
    MacNotFound,
    /// The neighbor on the egress port is not a switch
    NonSwitchEndpoint,
    /// The neighbor on the egress port is the destination itself
    DestinationReached,
    /// The next switch was already visited
    LoopDetected,
    /// No usable CDP neighbor on the egress port; the current switch is the last hop
    NoCdpInfo,
    /// The session to the current switch could not be opened or used
    SessionFailed,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Unreachable => "unreachable",
            EndReason::MacNotFound => "mac-not-found",
            EndReason::NonSwitchEndpoint => "non-switch-endpoint",
            EndReason::DestinationReached => "destination-reached",
            EndReason::LoopDetected => "loop-detected",
            EndReason::NoCdpInfo => "no-cdp-info",
            EndReason::SessionFailed => "session-failed",
        }
    }

    /// Returns true if the walk located the port the MAC address lives behind.
    pub fn is_located(&self) -> bool {
        matches!(
            self,
            EndReason::NonSwitchEndpoint | EndReason::DestinationReached | EndReason::NoCdpInfo
        )
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
