// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The opaque discovery provider boundary: the tree only ever consumes
//! `{name, interface, attributes, event}` tuples and emits reconfirm/
//! rediscover solicitations back through the same trait, so the core's
//! only coupling to mDNS-style discovery is this one seam.

use crate::tree::{InterfaceAttributes, ServiceType};
use conmon_support::{ConmonError, InterfaceIndex, Name};

/// One inbound event from the discovery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SightingEvent {
    Add,
    Modify,
    Remove,
}

/// A single `{name, interface, attributes, event}` tuple as delivered by
/// the provider.
#[derive(Debug, Clone)]
pub struct Sighting {
    pub name: Name,
    pub interface: InterfaceIndex,
    pub service_type: ServiceType,
    pub attributes: InterfaceAttributes,
    pub event: SightingEvent,
}

/// The discovery backend the browse tree rides on. `reconfirm`/
/// `rediscover` are ad-hoc-only operations; a managed-domain backend may
/// reject them with `ConmonError::NotSupported`.
pub trait BrowseProvider {
    /// Force re-verification of existing entries (prune stale cache).
    fn reconfirm(&mut self, name: &Name) -> Result<(), ConmonError>;

    /// Trigger a broadcast-style re-announce solicitation for the given
    /// service types (used after network load spikes).
    fn rediscover(&mut self, service_types: &[ServiceType]) -> Result<(), ConmonError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullProvider;
    impl BrowseProvider for NullProvider {
        fn reconfirm(&mut self, _name: &Name) -> Result<(), ConmonError> {
            Ok(())
        }
        fn rediscover(&mut self, _service_types: &[ServiceType]) -> Result<(), ConmonError> {
            Ok(())
        }
    }

    #[test]
    fn provider_trait_is_object_safe() {
        let mut provider: Box<dyn BrowseProvider> = Box::new(NullProvider);
        assert!(provider.reconfirm(&Name::new("x")).is_ok());
        assert!(provider.rediscover(&[ServiceType::Routing]).is_ok());
    }
}
