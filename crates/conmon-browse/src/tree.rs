// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The browse tree: `name -> device-node`, each node aggregating
//! per-interface sightings of the five service types into one logical
//! view.

use conmon_support::{InstanceId, InterfaceIndex, InterfaceMask, Name, MAX_INTERFACES};
use std::collections::HashMap;

/// One of the service types a device may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Routing,
    Conmon,
    SafeMode,
    Upgrade,
    SessionDescription,
}

pub const SERVICE_TYPE_COUNT: usize = 5;
const ALL_SERVICE_TYPES: [ServiceType; SERVICE_TYPE_COUNT] = [
    ServiceType::Routing,
    ServiceType::Conmon,
    ServiceType::SafeMode,
    ServiceType::Upgrade,
    ServiceType::SessionDescription,
];

fn service_type_index(service_type: ServiceType) -> usize {
    ALL_SERVICE_TYPES.iter().position(|t| *t == service_type).expect("exhaustive")
}

/// Per-interface attributes a device advertises alongside a sighting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceAttributes {
    pub version: Option<String>,
    pub friendly_name: Option<Name>,
    pub instance_id: Option<InstanceId>,
    pub model_id: Option<String>,
    pub manufacturer_id: Option<String>,
    pub default_name: Option<Name>,
    pub mode_version: Option<String>,
}

/// Sightings of one service type across interfaces: which interfaces
/// currently advertise it, plus the attributes presented on each.
#[derive(Debug, Clone, Default)]
pub struct PerServiceType {
    pub present_mask: InterfaceMask,
    attributes: [Option<InterfaceAttributes>; MAX_INTERFACES],
}

impl PerServiceType {
    fn set(&mut self, index: InterfaceIndex, attributes: InterfaceAttributes) {
        self.present_mask = self.present_mask.with(index);
        self.attributes[index.get()] = Some(attributes);
    }

    fn clear(&mut self, index: InterfaceIndex) {
        self.present_mask = self.present_mask.without(index);
        self.attributes[index.get()] = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_mask.is_empty()
    }

    #[must_use]
    pub fn attributes_on(&self, index: InterfaceIndex) -> Option<&InterfaceAttributes> {
        self.attributes[index.get()].as_ref()
    }
}

/// A single device's aggregated browse state across service types and
/// interfaces.
#[derive(Debug, Clone, Default)]
pub struct DeviceNode {
    per_service: [PerServiceType; SERVICE_TYPE_COUNT],
}

impl DeviceNode {
    #[must_use]
    pub fn service(&self, service_type: ServiceType) -> &PerServiceType {
        &self.per_service[service_type_index(service_type)]
    }

    /// The node's overall interface presence: the union across every
    /// service type's interface set.
    #[must_use]
    pub fn interfaces_present(&self) -> InterfaceMask {
        self.per_service
            .iter()
            .fold(InterfaceMask::empty(), |acc, svc| acc.union(svc.present_mask))
    }

    #[must_use]
    fn is_empty(&self) -> bool {
        self.per_service.iter().all(PerServiceType::is_empty)
    }
}

/// A change to one browse node. Delta callbacks for a single node fire in
/// the order `Added -> Modified* -> Removed`, never out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseDelta {
    Added(Name),
    Modified(Name),
    Removed(Name),
}

/// The live discovery index.
#[derive(Default)]
pub struct BrowseTree {
    nodes: HashMap<Name, DeviceNode>,
}

impl BrowseTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &Name) -> Option<&DeviceNode> {
        self.nodes.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A sighting arrived (or was refreshed) for `name` on `interface` for
    /// `service_type`. Returns `Added` if this is the node's first
    /// sighting of any kind, `Modified` if the node already existed.
    pub fn add_sighting(
        &mut self,
        name: Name,
        interface: InterfaceIndex,
        service_type: ServiceType,
        attributes: InterfaceAttributes,
    ) -> BrowseDelta {
        let existed = self.nodes.contains_key(&name);
        let node = self.nodes.entry(name.clone()).or_default();
        node.per_service[service_type_index(service_type)].set(interface, attributes);
        if existed {
            BrowseDelta::Modified(name)
        } else {
            BrowseDelta::Added(name)
        }
    }

    /// A sighting was withdrawn. Returns `Modified` if the node still has
    /// other live sightings, `Removed` if this was the last one; `None`
    /// if `name` was not known.
    pub fn withdraw_sighting(
        &mut self,
        name: &Name,
        interface: InterfaceIndex,
        service_type: ServiceType,
    ) -> Option<BrowseDelta> {
        let node = self.nodes.get_mut(name)?;
        node.per_service[service_type_index(service_type)].clear(interface);
        if node.is_empty() {
            self.nodes.remove(name);
            Some(BrowseDelta::Removed(name.clone()))
        } else {
            Some(BrowseDelta::Modified(name.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(i: usize) -> InterfaceIndex {
        InterfaceIndex::new(i).unwrap()
    }

    // Scenario 6: device "X" announced on interface 0 for routing+conmon,
    // then on interface 1 for conmon only; withdraw in sequence.
    #[test]
    fn scenario_browse_delta_sequence() {
        let mut tree = BrowseTree::new();
        let name = Name::new("X");

        let d1 = tree.add_sighting(name.clone(), iface(0), ServiceType::Routing, InterfaceAttributes::default());
        assert_eq!(d1, BrowseDelta::Added(name.clone()));
        let d2 = tree.add_sighting(name.clone(), iface(0), ServiceType::Conmon, InterfaceAttributes::default());
        assert_eq!(d2, BrowseDelta::Modified(name.clone()));

        let d3 = tree.add_sighting(name.clone(), iface(1), ServiceType::Conmon, InterfaceAttributes::default());
        assert_eq!(d3, BrowseDelta::Modified(name.clone()));

        let node = tree.get(&name).unwrap();
        assert!(node.service(ServiceType::Routing).present_mask.contains(iface(0)));
        assert!(node.service(ServiceType::Conmon).present_mask.contains(iface(0)));
        assert!(node.service(ServiceType::Conmon).present_mask.contains(iface(1)));

        let d4 = tree.withdraw_sighting(&name, iface(0), ServiceType::Conmon).unwrap();
        assert_eq!(d4, BrowseDelta::Modified(name.clone()));

        let d5 = tree.withdraw_sighting(&name, iface(0), ServiceType::Routing).unwrap();
        assert_eq!(d5, BrowseDelta::Modified(name.clone()));
        // Conmon on interface 1 still present.
        assert!(tree.get(&name).is_some());

        let d6 = tree.withdraw_sighting(&name, iface(1), ServiceType::Conmon).unwrap();
        assert_eq!(d6, BrowseDelta::Removed(name.clone()));
        assert!(tree.get(&name).is_none());
    }

    #[test]
    fn node_interfaces_present_is_union_over_service_types() {
        let mut tree = BrowseTree::new();
        let name = Name::new("Y");
        tree.add_sighting(name.clone(), iface(0), ServiceType::Routing, InterfaceAttributes::default());
        tree.add_sighting(name.clone(), iface(2), ServiceType::Upgrade, InterfaceAttributes::default());
        let node = tree.get(&name).unwrap();
        assert!(node.interfaces_present().contains(iface(0)));
        assert!(node.interfaces_present().contains(iface(2)));
        assert!(!node.interfaces_present().contains(iface(1)));
    }

    #[test]
    fn withdraw_unknown_device_is_none() {
        let mut tree = BrowseTree::new();
        assert!(tree.withdraw_sighting(&Name::new("nope"), iface(0), ServiceType::Routing).is_none());
    }
}
