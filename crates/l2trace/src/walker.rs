//! Topology Walker
//!
//! Follows a MAC address from switch to switch. Each iteration visits one
//! switch, matches the egress port against its CDP neighbors and either
//! advances to the neighbor or stops. Exactly one device session is open at
//! any time.

use l2trace_device::{SessionConnector, SessionSettings};
use l2trace_types::OsFamily;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::TraceResult;
use crate::neighbor::{match_neighbor, NextHop};
use crate::hop::{HopOutcome, HopRunner};
use crate::trace::{Path, Trace};
use crate::types::{EndReason, HopRequest, SearchTarget};

/// Walk state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WalkState {
    Probing { host: Ipv4Addr, os: OsFamily },
    Advancing { host: Ipv4Addr, os: OsFamily },
    Terminated(EndReason),
}

/// Walks the switch topology towards a host.
pub struct TopologyWalker {
    runner: HopRunner,
    settings: SessionSettings,
}

impl TopologyWalker {
    pub fn new(connector: Arc<dyn SessionConnector>, settings: SessionSettings) -> Self {
        Self {
            runner: HopRunner::new(connector),
            settings,
        }
    }

    /// Traces `target.mac` starting at `target.start`.
    ///
    /// Device failures end the walk with a reason; only a port name that
    /// cannot be compared against CDP data is returned as an error.
    pub async fn walk(&self, target: &SearchTarget) -> TraceResult<Trace> {
        info!(start = %target.start, destination = %target.destination, mac = %target.mac, "Starting from {}", target.start);

        let mut path = Path::new(target.start);
        let mut state = WalkState::Probing {
            host: target.start,
            os: target.start_os,
        };

        loop {
            debug!(?state, "Walk state");
            state = match state {
                WalkState::Probing { host, os } => self.visit(target, &mut path, host, os).await?,
                WalkState::Advancing { host, os } => {
                    path.push_address(host);
                    WalkState::Probing { host, os }
                }
                WalkState::Terminated(reason) => {
                    info!(%reason, hops = path.addresses().len(), "Trace finished");
                    return Ok(path.finish(reason));
                }
            };
        }
    }

    async fn visit(
        &self,
        target: &SearchTarget,
        path: &mut Path,
        host: Ipv4Addr,
        os: OsFamily,
    ) -> TraceResult<WalkState> {
        let request = HopRequest::for_target(target, host, os);
        let result = self.runner.visit(&request, &self.settings).await;

        let (port, neighbors) = match result.outcome {
            HopOutcome::Located { port, neighbors } => (port, neighbors),
            HopOutcome::Unreachable => return Ok(WalkState::Terminated(EndReason::Unreachable)),
            HopOutcome::MacNotFound => return Ok(WalkState::Terminated(EndReason::MacNotFound)),
            HopOutcome::Failed(_) => return Ok(WalkState::Terminated(EndReason::SessionFailed)),
        };

        let next = match_neighbor(&port, &neighbors, target.destination, host)?;
        path.push_port(port);

        Ok(match next {
            NextHop::EndOfPath { reason, discovered } => {
                // The destination itself is not reported as a switch hop
                if let Some(ip) = discovered.filter(|ip| *ip != target.destination) {
                    path.push_address(ip);
                }
                WalkState::Terminated(reason)
            }
            NextHop::Found { ip, .. } if path.contains(ip) => {
                warn!(%host, next = %ip, "Loop detected! stopping search");
                WalkState::Terminated(EndReason::LoopDetected)
            }
            NextHop::Found { ip, version } => {
                let os = version
                    .as_deref()
                    .map_or(OsFamily::default(), OsFamily::from_version);
                debug!(next = %ip, %os, "Advancing");
                WalkState::Advancing { host: ip, os }
            }
        })
    }
}
