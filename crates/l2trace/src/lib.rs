//! l2trace - locate the switch port a host is connected to
//!
//! Starting from one switch, the walker looks the host's MAC address up in
//! the forwarding table, follows the egress port to the CDP neighbor behind
//! it and repeats on that neighbor until it can go no further.

pub mod config;
mod error;
mod fdb;
mod hop;
mod neighbor;
mod port_channel;
mod trace;
mod types;
mod walker;

pub use config::TraceConfig;
pub use error::{TraceError, TraceResult};
pub use fdb::extract_port;
pub use hop::{HopOutcome, HopResult, HopRunner, ECHO_SIZE_MARKER, PING_SUCCESS_MARKER};
pub use neighbor::{fields, match_neighbor, NextHop, HOST_CAPABILITY};
pub use port_channel::extract_member;
pub use trace::{Path, Trace, HOP_SEPARATOR};
pub use types::{EndReason, HopRequest, SearchTarget};
pub use walker::TopologyWalker;
