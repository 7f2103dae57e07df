// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Device session: the per-device state machine owning channel/label/flow
//! caches, a capability bitset latched after the first query, and
//! per-component staleness tracking.

use crate::channel::{RxChannel, TxChannel};
use crate::flow::{RxFlow, TxFlow};
use crate::labels::LabelTable;
use crate::resolver::Resolver;
use conmon_support::{ConmonError, Endpoint, Name};
use std::collections::HashMap;

/// Forward-only happy path, plus `error`/`deleting` reachable from any
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Resolving,
    Resolved,
    Querying,
    Active,
    Error,
    Deleting,
}

/// The six independently-stale components of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    TxChannels,
    RxChannels,
    TxLabels,
    TxFlows,
    RxFlows,
    Properties,
}

const COMPONENT_COUNT: usize = 6;
const ALL_COMPONENTS: [Component; COMPONENT_COUNT] = [
    Component::TxChannels,
    Component::RxChannels,
    Component::TxLabels,
    Component::TxFlows,
    Component::RxFlows,
    Component::Properties,
];

fn component_index(component: Component) -> usize {
    ALL_COMPONENTS.iter().position(|c| *c == component).expect("exhaustive")
}

/// Capability bits negotiated with the device after the first
/// `query_capabilities`. Named bits mirror the current protocol;
/// `LEGACY_FLAT_CAPS` documents the superseded flat-query encoding for
/// wire-compatibility reference only, never produced or consumed here.
///
/// A local newtype rather than `conmon_support::BitSet<u32>` directly,
/// since Rust forbids an inherent `impl` (and its associated constants)
/// on a type defined in another crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilitySet(pub u32);

impl CapabilitySet {
    pub const CAN_IDENTIFY: Self = Self(1 << 0);
    pub const HAS_WEBSERVER: Self = Self(1 << 1);
    pub const CAN_SET_SRATE: Self = Self(1 << 2);
    pub const CAN_SET_ENCODING: Self = Self(1 << 3);
    pub const CAN_SET_LATENCY: Self = Self(1 << 4);
    // LEGACY_FLAT_CAPS = 1 << 31 in the original protocol's superseded
    // flat capability query; not represented here.

    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn contains(self, flag: Self) -> bool {
        (self.0 & flag.0) == flag.0
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Status flags reported alongside state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub name_conflict: bool,
    pub unlicensed: bool,
    pub lockdown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CapabilitiesChanged,
    ComponentChanged(Component),
    StateChanged(SessionState),
    StatusChanged(SessionStatus),
    AddressesChanged,
    RequestFailed { user_context: u64 },
    TxFlowChanged { flow_id: u16 },
}

pub trait DeviceSessionListener {
    fn on_event(&mut self, event: SessionEvent);
}

impl<F: FnMut(SessionEvent)> DeviceSessionListener for F {
    fn on_event(&mut self, event: SessionEvent) {
        self(event);
    }
}

/// A tri-valued per-element freshness tag. Whole-component-stale degrades
/// every element in the component at once; clearing the component-wide
/// flag does not resurrect elements that are still individually stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Staleness {
    Fresh,
    WholeComponentStale,
}

pub struct DeviceSession {
    pub name: Name,
    pub advertised_name: Option<Name>,
    pub actual_name: Option<Name>,
    pub resolver: Resolver,
    pub state: SessionState,
    pub status: SessionStatus,
    pub addresses: Vec<Endpoint>,
    pub domain_routing_id: Option<u32>,
    capabilities: Option<CapabilitySet>,
    staleness: [Staleness; COMPONENT_COUNT],
    num_txchannels_reported: u32,
    pub tx_channels: HashMap<u16, TxChannel>,
    pub rx_channels: HashMap<u16, RxChannel>,
    pub tx_flows: HashMap<u16, TxFlow>,
    pub rx_flows: HashMap<u16, RxFlow>,
    pub labels: LabelTable,
}

impl DeviceSession {
    #[must_use]
    pub fn new(name: Name, resolver: Resolver) -> Self {
        let state = if resolver.resolves_immediately() {
            SessionState::Resolved
        } else {
            SessionState::Resolving
        };
        Self {
            name,
            advertised_name: None,
            actual_name: None,
            resolver,
            state,
            status: SessionStatus::default(),
            addresses: Vec::new(),
            domain_routing_id: None,
            capabilities: None,
            staleness: [Staleness::WholeComponentStale; COMPONENT_COUNT],
            num_txchannels_reported: 0,
            tx_channels: HashMap::new(),
            rx_channels: HashMap::new(),
            tx_flows: HashMap::new(),
            rx_flows: HashMap::new(),
            labels: LabelTable::new(),
        }
    }

    /// Resolution completed (name service or immediate resolver): the
    /// session now knows the addresses to query.
    pub fn mark_resolved(&mut self, addresses: Vec<Endpoint>, listener: &mut impl DeviceSessionListener) {
        if self.state != SessionState::Resolving && self.state != SessionState::Resolved {
            return;
        }
        self.addresses = addresses;
        self.state = SessionState::Resolved;
        listener.on_event(SessionEvent::StateChanged(self.state));
        listener.on_event(SessionEvent::AddressesChanged);
    }

    /// Batches the six components' initial fetch, the way the device's
    /// multi-component query does. Only valid from `resolved`.
    pub fn query_capabilities(&mut self) -> Result<(), ConmonError> {
        if self.state != SessionState::Resolved {
            return Err(ConmonError::InvalidState(format!(
                "query_capabilities requires resolved, session is {:?}",
                self.state
            )));
        }
        self.state = SessionState::Querying;
        Ok(())
    }

    /// The device replied to `query_capabilities`. Latches the capability
    /// bitset and moves to `active`; a later reply that disagrees with the
    /// latched bitset is the `CapabilitiesChanged` fatal condition.
    pub fn apply_capability_reply(
        &mut self,
        capabilities: CapabilitySet,
        num_txchannels: u32,
        listener: &mut impl DeviceSessionListener,
    ) {
        match self.capabilities {
            None => {
                self.capabilities = Some(capabilities);
                self.num_txchannels_reported = num_txchannels;
                self.state = SessionState::Active;
                listener.on_event(SessionEvent::StateChanged(self.state));
            }
            Some(existing) if existing == capabilities => {
                self.num_txchannels_reported = num_txchannels;
            }
            Some(_) => {
                self.enter_error(listener);
                listener.on_event(SessionEvent::CapabilitiesChanged);
            }
        }
    }

    fn enter_error(&mut self, listener: &mut impl DeviceSessionListener) {
        self.state = SessionState::Error;
        listener.on_event(SessionEvent::StateChanged(self.state));
    }

    #[must_use]
    pub fn capabilities(&self) -> Option<CapabilitySet> {
        self.capabilities
    }

    /// `num_txchannels` is only meaningful once `active`; sessions in
    /// earlier states report an undefined sentinel of 0.
    #[must_use]
    pub fn num_txchannels(&self) -> u32 {
        if self.state == SessionState::Active {
            self.num_txchannels_reported
        } else {
            0
        }
    }

    pub fn mark_stale(&mut self, component: Component) {
        self.staleness[component_index(component)] = Staleness::WholeComponentStale;
    }

    #[must_use]
    pub fn is_stale(&self, component: Component) -> bool {
        self.staleness[component_index(component)] == Staleness::WholeComponentStale
    }

    /// Record that `component`'s stale elements have all been refreshed;
    /// clears the stale bit and fires `ComponentChanged`.
    pub fn clear_stale(&mut self, component: Component, listener: &mut impl DeviceSessionListener) {
        self.staleness[component_index(component)] = Staleness::Fresh;
        listener.on_event(SessionEvent::ComponentChanged(component));
    }

    /// Configuration mutators on a session that is not `active` are
    /// rejected.
    fn require_active(&self) -> Result<(), ConmonError> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(ConmonError::InvalidState(format!(
                "session is {:?}, not active",
                self.state
            )))
        }
    }

    pub fn rename(&mut self, new_name: Name, listener: &mut impl DeviceSessionListener) -> Result<(), ConmonError> {
        self.require_active()?;
        self.actual_name = Some(new_name);
        listener.on_event(SessionEvent::ComponentChanged(Component::Properties));
        Ok(())
    }

    pub fn store_config(&self) -> Result<(), ConmonError> {
        self.require_active()
    }

    pub fn clear_config(&self) -> Result<(), ConmonError> {
        self.require_active()
    }

    /// Commit a tx-flow built via [`crate::flow::TxFlowConfig`], firing a
    /// `TxFlowChanged` event for its id regardless of how many slots
    /// actually moved.
    pub fn commit_tx_flow(&mut self, flow: TxFlow, listener: &mut impl DeviceSessionListener) -> Result<(), ConmonError> {
        self.require_active()?;
        let id = flow.id;
        self.tx_flows.insert(id, flow);
        listener.on_event(SessionEvent::TxFlowChanged { flow_id: id });
        Ok(())
    }

    pub fn close(&mut self, listener: &mut impl DeviceSessionListener) {
        self.state = SessionState::Deleting;
        self.tx_channels.clear();
        self.rx_channels.clear();
        self.tx_flows.clear();
        self.rx_flows.clear();
        listener.on_event(SessionEvent::StateChanged(self.state));
    }
}
