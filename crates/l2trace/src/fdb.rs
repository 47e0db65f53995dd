//! Forwarding-table lookup

use crate::error::{TraceError, TraceResult};

/// Returns the port of the first entry in MAC address-table output.
///
/// The output must already be filtered to lines mentioning the MAC address;
/// the port is the last column of the first non-blank line.
pub fn extract_port(mac_table_output: &str) -> TraceResult<String> {
    mac_table_output
        .lines()
        .find_map(|line| line.split_whitespace().last())
        .map(str::to_string)
        .ok_or_else(|| TraceError::no_match("learned port", mac_table_output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_port_ios_entry() {
        let port = extract_port("00 0010.2030.a1b2 DYNAMIC Gi1/0/24").unwrap();
        assert_eq!(port, "Gi1/0/24");
    }

    #[test]
    fn test_extract_port_nxos_entry() {
        let output = "*   10     0010.2030.a1b2   dynamic  0         F      F    Eth1/12";
        assert_eq!(extract_port(output).unwrap(), "Eth1/12");
    }

    #[test]
    fn test_extract_port_uses_first_entry() {
        let output = "\n  10    0010.2030.a1b2    DYNAMIC     Po1\n  20    0010.2030.a1b2    DYNAMIC     Gi1/0/3\n";
        assert_eq!(extract_port(output).unwrap(), "Po1");
    }

    #[test]
    fn test_extract_port_empty_output() {
        assert!(matches!(
            extract_port(""),
            Err(TraceError::NoMatch { what: "learned port", .. })
        ));
        assert!(extract_port("  \n\t\n").is_err());
    }
}
