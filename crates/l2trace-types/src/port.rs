//! Interface-name handling.
//!
//! The MAC address table reports abbreviated names (`Gi1/0/24`) while CDP
//! reports full names (`GigabitEthernet1/0/24`). Both are compared through
//! their type prefix and numeric suffix.

use crate::ParseError;
use std::fmt;

/// Splits a port name at the end of its leading alphabetic run.
///
/// The suffix keeps any separators (`"Gi1/0/1"` gives `("Gi", "1/0/1")`).
pub fn split_port(port: &str) -> Result<(&str, &str), ParseError> {
    let prefix_len = port
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(port.len(), |(i, _)| i);

    if prefix_len == 0 {
        return Err(ParseError::MalformedPort(port.to_string()));
    }
    Ok(port.split_at(prefix_len))
}

/// Returns the first two characters of a port name.
///
/// This is a coarse, purely syntactic port-family key: `Gi` matches both
/// `Gi1/0/1` and `GigabitEthernet1/0/1`.
pub fn first_two_chars(port: &str) -> &str {
    port.char_indices().nth(2).map_or(port, |(i, _)| &port[..i])
}

/// A port name that is known to have an alphabetic type prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortName {
    name: String,
    prefix_len: usize,
}

impl PortName {
    /// Parses a port name.
    pub fn new(name: impl Into<String>) -> Result<Self, ParseError> {
        let name = name.into();
        let prefix_len = split_port(&name)?.0.len();
        Ok(Self { name, prefix_len })
    }

    /// Everything after the type prefix (`1/0/24`).
    pub fn suffix(&self) -> &str {
        &self.name[self.prefix_len..]
    }

    /// Two-character family key, see [`first_two_chars`].
    pub fn family(&self) -> &str {
        first_two_chars(&self.name)
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_abbreviated() {
        assert_eq!(split_port("Gi1/0/1").unwrap(), ("Gi", "1/0/1"));
        assert_eq!(split_port("Te1/1/4").unwrap(), ("Te", "1/1/4"));
        assert_eq!(split_port("Po12").unwrap(), ("Po", "12"));
        assert_eq!(split_port("Eth101/1/3").unwrap(), ("Eth", "101/1/3"));
    }

    #[test]
    fn test_split_full_names() {
        assert_eq!(
            split_port("GigabitEthernet1/0/24").unwrap(),
            ("GigabitEthernet", "1/0/24")
        );
        assert_eq!(split_port("Port-channel1").unwrap(), ("Port", "-channel1"));
    }

    #[test]
    fn test_split_roundtrips() {
        for s in ["Gi1/0/1", "TenGigabitEthernet2/0/1", "Vlan10", "Fa0/1", "mgmt0"] {
            let (prefix, suffix) = split_port(s).unwrap();
            assert_eq!(format!("{prefix}{suffix}"), s);
            assert!(!prefix.is_empty());
            assert!(prefix.chars().all(|c| c.is_ascii_alphabetic()));
        }
    }

    #[test]
    fn test_split_rejects_missing_prefix() {
        assert_eq!(
            split_port("1/0/1"),
            Err(ParseError::MalformedPort("1/0/1".to_string()))
        );
        assert!(split_port("").is_err());
        assert!(split_port("/1").is_err());
    }

    #[test]
    fn test_first_two_chars() {
        assert_eq!(first_two_chars("Gi1/0/1"), "Gi");
        assert_eq!(first_two_chars("GigabitEthernet1/0/1"), "Gi");
        assert_eq!(first_two_chars("E"), "E");
        assert_eq!(first_two_chars(""), "");
    }

    #[test]
    fn test_port_name_rejects_missing_prefix() {
        assert_eq!(
            PortName::new("1/0/24"),
            Err(ParseError::MalformedPort("1/0/24".to_string()))
        );
    }

    #[test]
    fn test_port_name_accessors() {
        let port = PortName::new("Gi1/0/24").unwrap();
        assert_eq!(port.suffix(), "1/0/24");
        assert_eq!(port.family(), "Gi");
        assert_eq!(port.to_string(), "Gi1/0/24");
    }
}
