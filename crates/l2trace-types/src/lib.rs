//! Value types shared by the l2trace crates.
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses, rendered in Cisco dotted form
//! - [`OsFamily`]: command dialect of a Cisco device (IOS or NX-OS)
//! - [`PortName`]: interface names split into type prefix and numeric suffix

mod mac;
mod os;
mod port;

pub use mac::MacAddress;
pub use os::OsFamily;
pub use port::{first_two_chars, split_port, PortName};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid OS family: {0} (expected ios or nxos)")]
    InvalidOsFamily(String),

    #[error("malformed port name: {0:?} has no alphabetic type prefix")]
    MalformedPort(String),
}
