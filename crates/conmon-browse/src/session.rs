// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Feeds provider sightings into a [`BrowseTree`], exposing one step-level
//! `process()` that fires `NetworkChanged` at most once per call alongside
//! the fine-grained per-node deltas.

use crate::provider::{BrowseProvider, Sighting, SightingEvent};
use crate::tree::{BrowseDelta, BrowseTree};
use conmon_support::{ConmonError, Name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseEvent {
    /// At most one per `process()` call, debounced: something in the tree
    /// moved during this step.
    NetworkChanged,
    Delta(BrowseDelta),
}

pub trait BrowseListener {
    fn on_event(&mut self, event: BrowseEvent);
}

impl<F: FnMut(BrowseEvent)> BrowseListener for F {
    fn on_event(&mut self, event: BrowseEvent) {
        self(event);
    }
}

pub struct BrowseSession<P: BrowseProvider> {
    tree: BrowseTree,
    provider: P,
}

impl<P: BrowseProvider> BrowseSession<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            tree: BrowseTree::new(),
            provider,
        }
    }

    #[must_use]
    pub fn tree(&self) -> &BrowseTree {
        &self.tree
    }

    /// Apply one batch of provider sightings, firing per-node deltas and,
    /// if any sighting changed the tree, exactly one `NetworkChanged`
    /// ahead of them.
    pub fn process(&mut self, sightings: Vec<Sighting>, listener: &mut impl BrowseListener) {
        let mut network_changed = false;
        let mut deltas = Vec::new();

        for sighting in sightings {
            let delta = match sighting.event {
                SightingEvent::Add | SightingEvent::Modify => Some(self.tree.add_sighting(
                    sighting.name,
                    sighting.interface,
                    sighting.service_type,
                    sighting.attributes,
                )),
                SightingEvent::Remove => {
                    self.tree.withdraw_sighting(&sighting.name, sighting.interface, sighting.service_type)
                }
            };
            if let Some(delta) = delta {
                network_changed = true;
                deltas.push(delta);
            }
        }

        if network_changed {
            listener.on_event(BrowseEvent::NetworkChanged);
        }
        for delta in deltas {
            listener.on_event(BrowseEvent::Delta(delta));
        }
    }

    pub fn reconfirm(&mut self, name: &Name) -> Result<(), ConmonError> {
        self.provider.reconfirm(name)
    }

    pub fn rediscover(&mut self, service_types: &[crate::tree::ServiceType]) -> Result<(), ConmonError> {
        self.provider.rediscover(service_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{InterfaceAttributes, ServiceType};
    use conmon_support::InterfaceIndex;

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
    fn network_changed_fires_once_per_step_ahead_of_deltas() {
        let mut session = BrowseSession::new(NullProvider);
        let mut events = Vec::new();
        let sightings = vec![
            Sighting {
                name: Name::new("A"),
                interface: InterfaceIndex::new(0).unwrap(),
                service_type: ServiceType::Routing,
                attributes: InterfaceAttributes::default(),
                event: SightingEvent::Add,
            },
            Sighting {
                name: Name::new("B"),
                interface: InterfaceIndex::new(0).unwrap(),
                service_type: ServiceType::Conmon,
                attributes: InterfaceAttributes::default(),
                event: SightingEvent::Add,
            },
        ];
        session.process(sightings, &mut |event| events.push(event));

        assert_eq!(events.iter().filter(|e| **e == BrowseEvent::NetworkChanged).count(), 1);
        assert_eq!(events[0], BrowseEvent::NetworkChanged);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn empty_batch_fires_nothing() {
        let mut session = BrowseSession::new(NullProvider);
        let mut events = Vec::new();
        session.process(Vec::new(), &mut |event| events.push(event));
        assert!(events.is_empty());
    }
}
