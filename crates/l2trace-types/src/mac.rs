//! MAC address type with safe parsing and formatting.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
///
/// Cisco MAC address tables print addresses as three dotted groups of four
/// hex digits, so that is the canonical rendering used by [`fmt::Display`].
///
/// # Examples
///
/// ```
/// use l2trace_types::MacAddress;
///
/// let mac: MacAddress = "00:10:20:30:A1:B2".parse().unwrap();
/// assert_eq!(mac.to_string(), "0010.2030.a1b2");
///
/// let dotted: MacAddress = "0010.2030.a1b2".parse().unwrap();
/// assert_eq!(mac, dotted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a new MAC address from raw bytes.
    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMacAddress(s.to_string());

        // Accept xx:xx:xx:xx:xx:xx, xx-xx-xx-xx-xx-xx, xxxx.xxxx.xxxx and bare hex
        let trimmed = s.trim();
        let groups: Vec<&str> = if trimmed.contains(':') {
            trimmed.split(':').collect()
        } else if trimmed.contains('-') {
            trimmed.split('-').collect()
        } else if trimmed.contains('.') {
            trimmed.split('.').collect()
        } else {
            vec![trimmed]
        };

        let expected_width = match groups.len() {
            6 => 2,
            3 => 4,
            1 => 12,
            _ => return Err(invalid()),
        };
        if groups.iter().any(|g| g.len() != expected_width) {
            return Err(invalid());
        }

        let digits: String = groups.concat();
        let mut bytes = [0u8; 6];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = digits.get(i * 2..i * 2 + 2).ok_or_else(invalid)?;
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }

        Ok(MacAddress::new(bytes))
    }
}
