//! Path accumulated by a walk and the finished trace.

use std::net::Ipv4Addr;

use crate::types::EndReason;

/// Separator between hops when a trace is rendered.
pub const HOP_SEPARATOR: &str = " --> ";

/// Devices visited so far and the egress port taken out of each.
///
/// An address is never recorded twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    addresses: Vec<Ipv4Addr>,
    ports: Vec<String>,
}

impl Path {
    /// A path that starts at `start`.
    pub fn new(start: Ipv4Addr) -> Self {
        Self {
            addresses: vec![start],
            ports: Vec::new(),
        }
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.addresses.contains(&address)
    }

    /// Appends `address`. Returns false, leaving the path unchanged, if it was
    /// already visited.
    pub fn push_address(&mut self, address: Ipv4Addr) -> bool {
        if self.contains(address) {
            return false;
        }
        self.addresses.push(address);
        true
    }

    pub fn push_port(&mut self, port: impl Into<String>) {
        self.ports.push(port.into());
    }

    pub fn addresses(&self) -> &[Ipv4Addr] {
        &self.addresses
    }

    pub fn finish(self, reason: EndReason) -> Trace {
        Trace {
            addresses: self.addresses,
            ports: self.ports,
            reason,
        }
    }
}

/// Result of a walk.
///
/// `ports[i]` is the egress port taken out of `addresses[i]`. A walk that
/// ends on a discovered endpoint, or on a switch that could not be queried,
/// leaves that last address without a port, so `ports` is one shorter. A
/// walk that ends with `destination-reached`, `no-cdp-info` or
/// `loop-detected` still reports the egress port of the last switch, so
/// both sequences have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub addresses: Vec<Ipv4Addr>,
    pub ports: Vec<String>,
    pub reason: EndReason,
}

impl Trace {
    /// `(address, port)` pairs. An address without an egress port is not paired.
    pub fn hops(&self) -> impl Iterator<Item = (Ipv4Addr, &str)> + '_ {
        self.addresses
            .iter()
            .copied()
            .zip(self.ports.iter().map(String::as_str))
    }

    /// The last address, when no egress port was resolved for it.
    pub fn tail(&self) -> Option<Ipv4Addr> {
        self.addresses.get(self.ports.len()).copied()
    }

    /// Renders the trace as `(10.0.0.1, Gi1/0/1) --> (10.0.0.2, Gi1/0/7)`.
    pub fn render(&self) -> String {
        self.hops()
            .map(|(address, port)| format!("({address}, {port})"))
            .collect::<Vec<_>>()
            .join(HOP_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const B: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

    #[test]
    fn test_path_rejects_revisits() {
        let mut path = Path::new(A);
        assert!(path.push_address(B));
        assert!(!path.push_address(A));
        assert_eq!(path.addresses(), &[A, B]);
    }

    #[test]
    fn test_render() {
        let mut path = Path::new(A);
        path.push_port("Gi1/0/1");
        path.push_address(B);
        path.push_port("Gi1/0/7");

        let trace = path.finish(EndReason::DestinationReached);
        assert_eq!(trace.render(), "(10.0.0.1, Gi1/0/1) --> (10.0.0.2, Gi1/0/7)");
    }

    #[test]
    fn test_render_skips_unpaired_address() {
        let mut path = Path::new(A);
        path.push_port("Gi1/0/1");
        path.push_address(B);

        let trace = path.finish(EndReason::NonSwitchEndpoint);
        assert_eq!(trace.hops().count(), 1);
        assert_eq!(trace.render(), "(10.0.0.1, Gi1/0/1)");
        assert_eq!(trace.tail(), Some(B));
    }

    #[test]
    fn test_no_tail_when_every_address_has_a_port() {
        let mut path = Path::new(A);
        path.push_port("Gi1/0/1");

        let trace = path.finish(EndReason::DestinationReached);
        assert_eq!(trace.tail(), None);
        assert_eq!(trace.ports.len(), trace.addresses.len());
    }

    #[test]
    fn test_empty_trace_renders_nothing() {
        let trace = Path::new(A).finish(EndReason::Unreachable);
        assert_eq!(trace.render(), "");
        assert_eq!(trace.addresses, vec![A]);
        assert_eq!(trace.tail(), Some(A));
    }
}
