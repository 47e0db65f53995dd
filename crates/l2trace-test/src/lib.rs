//! Test infrastructure for l2trace
//!
//! Provides:
//! - A scripted in-memory switch fabric implementing `SessionConnector`
//! - Fixtures producing realistic IOS and NX-OS command output
//! - A record of every session opened, command sent and session closed

pub mod fabric;
pub mod fixtures;

pub use fabric::{FakeDevice, FakeFabric, SessionEvent};
pub use fixtures::CdpNeighbor;
