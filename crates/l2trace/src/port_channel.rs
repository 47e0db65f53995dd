//! Port-channel member resolution

use crate::error::{TraceError, TraceResult};

/// Returns the first member port listed in port-channel membership output.
///
/// Input looks like `Members in this channel: Gi1/0/1 Gi1/0/2`; the member
/// list follows the first colon. NX-OS separates members with commas.
pub fn extract_member(membership_output: &str) -> TraceResult<String> {
    let members = membership_output
        .split_once(':')
        .map_or(membership_output, |(_, rest)| rest);

    members
        .split_whitespace()
        .map(|token| token.trim_end_matches(','))
        .find(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TraceError::no_match("member port", membership_output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_member_ios() {
        assert_eq!(extract_member("Member Ports: Gi1/0/1 Gi1/0/2").unwrap(), "Gi1/0/1");
        assert_eq!(
            extract_member("  Members in this channel: Gi1/0/47 Gi1/0/48").unwrap(),
            "Gi1/0/47"
        );
    }

    #[test]
    fn test_extract_member_nxos_comma_list() {
        assert_eq!(
            extract_member("  Members in this channel: Eth1/1, Eth1/2").unwrap(),
            "Eth1/1"
        );
    }

    #[test]
    fn test_extract_member_without_colon() {
        assert_eq!(extract_member("Gi1/0/5 Gi1/0/6").unwrap(), "Gi1/0/5");
    }

    #[test]
    fn test_extract_member_empty() {
        assert!(matches!(
            extract_member(""),
            Err(TraceError::NoMatch { what: "member port", .. })
        ));
        assert!(extract_member("Members in this channel:   ").is_err());
    }
}
