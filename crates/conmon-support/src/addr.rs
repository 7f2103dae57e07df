// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Network address helpers: IPv4 endpoints and the per-interface presence
//! bitmask the browse tree and routing sessions key their state by.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Largest number of local network interfaces the stack tracks state for.
/// A device's browse presence and a session's resolved addresses are both
/// indexed by [`InterfaceIndex`] below this bound.
pub const MAX_INTERFACES: usize = 8;

/// Index of a local network interface, `0..MAX_INTERFACES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceIndex(u8);

impl InterfaceIndex {
    /// Build an interface index, returning `None` if it is out of range.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_INTERFACES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// An IPv4 address plus port, as carried in routing and discovery payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub addr: Ipv4Addr,
    pub port: u16,
}

impl Endpoint {
    #[must_use]
    pub fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

impl From<Endpoint> for SocketAddrV4 {
    fn from(endpoint: Endpoint) -> Self {
        SocketAddrV4::new(endpoint.addr, endpoint.port)
    }
}

impl From<SocketAddrV4> for Endpoint {
    fn from(addr: SocketAddrV4) -> Self {
        Self {
            addr: *addr.ip(),
            port: addr.port(),
        }
    }
}

/// A bitmask over local interfaces a device/channel/flow has been sighted
/// or is reachable on. Bit `i` corresponds to [`InterfaceIndex::new(i)`];
/// the top bit is reserved for "seen on the loopback interface" sightings,
/// which browse merge policy treats separately from routable interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InterfaceMask(u32);

impl InterfaceMask {
    /// Reserved bit meaning "seen on the loopback interface".
    pub const LOCALHOST: Self = Self(1 << 31);

    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn single(index: InterfaceIndex) -> Self {
        Self(1 << index.get())
    }

    #[must_use]
    pub fn contains(self, index: InterfaceIndex) -> bool {
        self.0 & (1 << index.get()) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn with(self, index: InterfaceIndex) -> Self {
        Self(self.0 | (1 << index.get()))
    }

    #[must_use]
    pub fn without(self, index: InterfaceIndex) -> Self {
        Self(self.0 & !(1 << index.get()))
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_roundtrips_through_socket_addr_v4() {
        let endpoint = Endpoint::new(Ipv4Addr::new(192, 168, 1, 22), 4440);
        let socket_addr: SocketAddrV4 = endpoint.into();
        assert_eq!(Endpoint::from(socket_addr), endpoint);
    }

    #[test]
    fn interface_index_rejects_out_of_range() {
        assert!(InterfaceIndex::new(MAX_INTERFACES - 1).is_some());
        assert!(InterfaceIndex::new(MAX_INTERFACES).is_none());
    }

    #[test]
    fn interface_mask_tracks_membership() {
        let a = InterfaceIndex::new(0).unwrap();
        let b = InterfaceIndex::new(3).unwrap();
        let mask = InterfaceMask::single(a).with(b);
        assert!(mask.contains(a));
        assert!(mask.contains(b));
        assert!(!mask.without(a).contains(a));
    }

    #[test]
    fn localhost_bit_is_independent_of_interface_bits() {
        let a = InterfaceIndex::new(0).unwrap();
        let mask = InterfaceMask::single(a).union(InterfaceMask::LOCALHOST);
        assert!(mask.contains(a));
        assert_ne!(mask, InterfaceMask::single(a));
    }
}
