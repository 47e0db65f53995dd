//! Command dialect of a Cisco device.

use crate::ParseError;
use std::fmt;
use std::str::FromStr;

/// OS family of a device, which selects the command dialect and the
/// output templates used to talk to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OsFamily {
    /// Classic IOS / IOS-XE.
    #[default]
    Ios,
    /// Nexus NX-OS.
    Nxos,
}

impl OsFamily {
    /// Marker that identifies an NX-OS device in a CDP version string.
    pub const NXOS_VERSION_MARKER: &'static str = "NX-OS";

    /// Short name accepted on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Ios => "ios",
            OsFamily::Nxos => "nxos",
        }
    }

    /// Device-type name used for templates (`cisco_ios`, `cisco_nxos`).
    pub const fn platform(&self) -> &'static str {
        match self {
            OsFamily::Ios => "cisco_ios",
            OsFamily::Nxos => "cisco_nxos",
        }
    }

    /// Infers the OS family of a neighbor from its reported version string.
    ///
    /// Anything that does not mention NX-OS is driven as IOS.
    pub fn from_version(version: &str) -> Self {
        if version.contains(Self::NXOS_VERSION_MARKER) {
            OsFamily::Nxos
        } else {
            OsFamily::Ios
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ios" | "cisco_ios" => Ok(OsFamily::Ios),
            "nxos" | "nx-os" | "cisco_nxos" => Ok(OsFamily::Nxos),
            _ => Err(ParseError::InvalidOsFamily(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("ios".parse::<OsFamily>().unwrap(), OsFamily::Ios);
        assert_eq!("NXOS".parse::<OsFamily>().unwrap(), OsFamily::Nxos);
        assert_eq!("cisco_nxos".parse::<OsFamily>().unwrap(), OsFamily::Nxos);
        assert!("junos".parse::<OsFamily>().is_err());
    }

    #[test]
    fn test_from_version() {
        let nexus = "Cisco Nexus Operating System (NX-OS) Software, Version 9.3(5)";
        assert_eq!(OsFamily::from_version(nexus), OsFamily::Nxos);

        let catalyst = "Cisco IOS Software, C3750E Software, Version 15.0(2)SE11";
        assert_eq!(OsFamily::from_version(catalyst), OsFamily::Ios);
        assert_eq!(OsFamily::from_version(""), OsFamily::Ios);
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(OsFamily::Ios.platform(), "cisco_ios");
        assert_eq!(OsFamily::Nxos.platform(), "cisco_nxos");
        assert_eq!(OsFamily::Nxos.to_string(), "nxos");
    }
}
