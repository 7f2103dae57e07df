// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Control-monitoring subscription table: per-`(channel-type, target)`
//! receive-status state machine, populated by server acknowledgements.

use conmon_support::{ConmonError, InstanceId, InterfaceMask, Name};
use std::collections::HashMap;

/// Which side of the subscription a record tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    Tx,
    Rx,
}

/// The receive-status state machine. Any state may move to a terminal
/// failure; terminal failures require explicit controller action
/// (re-subscribe or unsubscribe) to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveStatus {
    None,
    Preparing,
    Resolved,
    Unresolved,
    Unicast,
    Multicast,
    Domain,
    CommsError,
    NoConnection,
    InvalidReply,
    Policy,
    TxNoChannel,
}

impl ReceiveStatus {
    #[must_use]
    pub fn is_terminal_failure(self) -> bool {
        matches!(
            self,
            Self::CommsError
                | Self::NoConnection
                | Self::InvalidReply
                | Self::Policy
                | Self::TxNoChannel
        )
    }
}

/// The kind of address an acknowledgement resolved a subscription to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Unicast,
    Multicast,
    Domain,
}

impl From<AddressKind> for ReceiveStatus {
    fn from(kind: AddressKind) -> Self {
        match kind {
            AddressKind::Unicast => Self::Unicast,
            AddressKind::Multicast => Self::Multicast,
            AddressKind::Domain => Self::Domain,
        }
    }
}

/// A server event applied to a subscription record's state machine.
#[derive(Debug, Clone, Copy)]
pub enum SubAck {
    /// Positive ack: the peer resolved to an instance at an address of
    /// this kind.
    Resolved {
        instance_id: InstanceId,
        kind: AddressKind,
    },
    /// Positive ack, but the name has not resolved yet; periodic
    /// re-resolution continues.
    NameUnresolved,
    /// Negative ack or later comms failure.
    Error(ReceiveStatusError),
    /// The controller unsubscribed and the server acknowledged it.
    Unsubscribed,
}

/// Failure kinds a `SubAck::Error` can carry, one per terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveStatusError {
    CommsError,
    NoConnection,
    InvalidReply,
    Policy,
    TxNoChannel,
}

impl From<ReceiveStatusError> for ReceiveStatus {
    fn from(err: ReceiveStatusError) -> Self {
        match err {
            ReceiveStatusError::CommsError => Self::CommsError,
            ReceiveStatusError::NoConnection => Self::NoConnection,
            ReceiveStatusError::InvalidReply => Self::InvalidReply,
            ReceiveStatusError::Policy => Self::Policy,
            ReceiveStatusError::TxNoChannel => Self::TxNoChannel,
        }
    }
}

/// One subscription target, e.g. `"Mic1@TX-Rack-1"`. Only the split
/// `channel_name`/`device_name` accessors are exposed; there is no joined
/// string accessor, so callers cannot accidentally depend on a particular
/// separator or round-trip format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionTarget {
    channel: Name,
    device: Name,
}

impl SubscriptionTarget {
    /// Parse `"channel@device"`. `InvalidParameter` if either half is
    /// empty (the empty device name boundary case from the spec applies
    /// to the whole target).
    pub fn parse(raw: &str) -> Result<Self, ConmonError> {
        let (channel, device) = raw
            .split_once('@')
            .ok_or_else(|| ConmonError::InvalidParameter("missing '@' separator".into()))?;
        if channel.is_empty() || device.is_empty() {
            return Err(ConmonError::InvalidParameter("empty channel or device name".into()));
        }
        Ok(Self {
            channel: Name::new(channel),
            device: Name::new(device),
        })
    }

    #[must_use]
    pub fn channel_name(&self) -> &Name {
        &self.channel
    }

    #[must_use]
    pub fn device_name(&self) -> &Name {
        &self.device
    }
}

/// A subscription record: target, receive status, and the resolved
/// endpoint information once an ack has arrived.
#[derive(Debug, Clone)]
pub struct SubscriptionRecord {
    target: SubscriptionTarget,
    status: ReceiveStatus,
    instance_id: Option<InstanceId>,
    /// Address kind an ack resolved to, once known, pending at least one
    /// interface coming up. Drives the `resolved` → `unicast`/`multicast`/
    /// `domain` promotion in [`Self::set_connection_masks`].
    pending_kind: Option<AddressKind>,
    connections_available: InterfaceMask,
    connections_active: InterfaceMask,
}

impl SubscriptionRecord {
    /// A record only comes into existence when [`SubscriptionTable::subscribe`]
    /// actually starts a new server request (coalesced callers reuse the
    /// existing record), so `preparing` is the correct initial status here
    /// rather than `none`.
    fn new(target: SubscriptionTarget) -> Self {
        Self {
            target,
            status: ReceiveStatus::Preparing,
            instance_id: None,
            pending_kind: None,
            connections_available: InterfaceMask::empty(),
            connections_active: InterfaceMask::empty(),
        }
    }

    #[must_use]
    pub fn status(&self) -> ReceiveStatus {
        self.status
    }

    #[must_use]
    pub fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    #[must_use]
    pub fn connections_available(&self) -> InterfaceMask {
        self.connections_available
    }

    #[must_use]
    pub fn connections_active(&self) -> InterfaceMask {
        self.connections_active
    }

    /// Apply one server event, producing the next state. Pure: no I/O, no
    /// hidden state beyond `self`.
    ///
    /// A positive `SubAck::Resolved` lands on `resolved` rather than
    /// jumping straight to `unicast`/`multicast`/`domain`: the final
    /// per-kind status is only reached once at least one interface is up
    /// (see [`Self::set_connection_masks`]), matching the `preparing` →
    /// `resolved` → per-kind progression the server's ack sequence implies.
    #[must_use]
    pub fn apply(mut self, event: SubAck) -> Self {
        self.status = match (self.status, event) {
            (_, SubAck::Unsubscribed) => ReceiveStatus::None,
            (_, SubAck::Error(err)) => err.into(),
            (_, SubAck::NameUnresolved) => ReceiveStatus::Unresolved,
            (
                _,
                SubAck::Resolved {
                    instance_id,
                    kind,
                },
            ) => {
                self.instance_id = Some(instance_id);
                if self.connections_available.is_empty() {
                    self.pending_kind = Some(kind);
                    ReceiveStatus::Resolved
                } else {
                    self.pending_kind = None;
                    kind.into()
                }
            }
        };
        if matches!(event, SubAck::Unsubscribed) {
            self.instance_id = None;
            self.pending_kind = None;
            self.connections_available = InterfaceMask::empty();
            self.connections_active = InterfaceMask::empty();
        }
        self
    }

    /// Record which interfaces currently carry this subscription's
    /// stream. Promotes a `resolved` status to its final per-kind status
    /// once an interface comes up, independent of the ack-driven
    /// transition that produced the pending kind.
    pub fn set_connection_masks(&mut self, available: InterfaceMask, active: InterfaceMask) {
        self.connections_available = available;
        self.connections_active = active;
        if self.status == ReceiveStatus::Resolved && !available.is_empty() {
            if let Some(kind) = self.pending_kind.take() {
                self.status = kind.into();
            }
        }
    }
}

/// Table of subscription records keyed by `(channel-type, target)`.
///
/// Mutations are requests on the server: the local record is not created
/// or updated until the server's acknowledgement arrives (`subscribe`
/// here only registers intent; call [`SubscriptionTable::apply_ack`] when
/// the reply lands). Multiple outstanding subscribes to the same key
/// coalesce: only one request is considered in flight per key.
pub struct SubscriptionTable {
    records: HashMap<(ChannelType, SubscriptionTarget), SubscriptionRecord>,
    in_flight: HashMap<(ChannelType, SubscriptionTarget), u32>,
}

impl Default for SubscriptionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Begin a subscribe. Returns `true` if this call started a new
    /// server request, `false` if it coalesced with one already in
    /// flight (the caller should not send a second request frame).
    pub fn subscribe(&mut self, channel_type: ChannelType, target: SubscriptionTarget) -> bool {
        let key = (channel_type, target.clone());
        let count = self.in_flight.entry(key.clone()).or_insert(0);
        *count += 1;
        self.records
            .entry(key)
            .or_insert_with(|| SubscriptionRecord::new(target));
        *count == 1
    }

    /// Cancel any in-flight subscribe for this key and remove the record.
    pub fn unsubscribe(&mut self, channel_type: ChannelType, target: &SubscriptionTarget) {
        let key = (channel_type, target.clone());
        self.in_flight.remove(&key);
        self.records.remove(&key);
    }

    /// Apply a server ack to every coalesced caller for this key.
    pub fn apply_ack(
        &mut self,
        channel_type: ChannelType,
        target: &SubscriptionTarget,
        event: SubAck,
    ) {
        let key = (channel_type, target.clone());
        self.in_flight.remove(&key);
        if let Some(record) = self.records.remove(&key) {
            self.records.insert(key, record.apply(event));
        }
    }

    #[must_use]
    pub fn get(&self, channel_type: ChannelType, target: &SubscriptionTarget) -> Option<&SubscriptionRecord> {
        self.records.get(&(channel_type, target.clone()))
    }

    #[must_use]
    pub fn get_mut(
        &mut self,
        channel_type: ChannelType,
        target: &SubscriptionTarget,
    ) -> Option<&mut SubscriptionRecord> {
        self.records.get_mut(&(channel_type, target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mic1() -> SubscriptionTarget {
        SubscriptionTarget::parse("Mic1@TX-Rack-1").unwrap()
    }

    #[test]
    fn split_accessors_recover_channel_and_device() {
        let target = mic1();
        assert_eq!(target.channel_name().as_str(), "Mic1");
        assert_eq!(target.device_name().as_str(), "TX-Rack-1");
    }

    #[test]
    fn subscribe_to_empty_device_name_is_invalid_parameter() {
        assert!(matches!(
            SubscriptionTarget::parse("Mic1@"),
            Err(ConmonError::InvalidParameter(_))
        ));
    }

    #[test]
    fn exhaustive_transition_table() {
        let base = SubscriptionRecord::new(mic1());
        // A record only exists once `subscribe` actually starts a request.
        assert_eq!(base.clone().status(), ReceiveStatus::Preparing);

        let preparing = base.clone();
        // `subscribe` itself moves status to `preparing` via `new`; exercise
        // every SubAck variant directly here. A positive ack lands on
        // `resolved` until an interface is up to promote it further.
        assert_eq!(
            preparing
                .clone()
                .apply(SubAck::Resolved {
                    instance_id: InstanceId::new(
                        conmon_support::DeviceId(1),
                        conmon_support::ProcessId(1)
                    ),
                    kind: AddressKind::Unicast,
                })
                .status(),
            ReceiveStatus::Resolved
        );
        assert_eq!(
            preparing.clone().apply(SubAck::NameUnresolved).status(),
            ReceiveStatus::Unresolved
        );
        assert_eq!(
            preparing
                .clone()
                .apply(SubAck::Error(ReceiveStatusError::Policy))
                .status(),
            ReceiveStatus::Policy
        );
        assert_eq!(
            preparing.apply(SubAck::Unsubscribed).status(),
            ReceiveStatus::None
        );
    }

    #[test]
    fn resolved_promotes_to_unicast_once_an_interface_is_up() {
        let record = SubscriptionRecord::new(mic1()).apply(SubAck::Resolved {
            instance_id: InstanceId::new(conmon_support::DeviceId(1), conmon_support::ProcessId(1)),
            kind: AddressKind::Unicast,
        });
        assert_eq!(record.status(), ReceiveStatus::Resolved);

        let mut record = record;
        let up = InterfaceMask::single(conmon_support::InterfaceIndex::new(0).unwrap());
        record.set_connection_masks(up, up);
        assert_eq!(record.status(), ReceiveStatus::Unicast);
    }

    #[test]
    fn subscribe_starts_new_request_in_preparing() {
        let mut table = SubscriptionTable::new();
        let target = mic1();
        assert!(table.subscribe(ChannelType::Rx, target.clone()));
        assert_eq!(
            table.get(ChannelType::Rx, &target).unwrap().status(),
            ReceiveStatus::Preparing
        );
    }

    #[test]
    fn terminal_failure_requires_explicit_action() {
        let record = SubscriptionRecord::new(mic1())
            .apply(SubAck::Error(ReceiveStatusError::CommsError));
        assert!(record.status().is_terminal_failure());
        // Still terminal until an explicit unsubscribe/resubscribe ack:
        let still_failed = record.clone();
        assert_eq!(still_failed.status(), ReceiveStatus::CommsError);
    }

    #[test]
    fn scenario_rx_channel_reaches_unicast_with_both_interfaces_up() {
        let mut table = SubscriptionTable::new();
        let target = mic1();
        assert!(table.subscribe(ChannelType::Rx, target.clone()));
        table.apply_ack(
            ChannelType::Rx,
            &target,
            SubAck::Resolved {
                instance_id: InstanceId::new(conmon_support::DeviceId(1), conmon_support::ProcessId(1)),
                kind: AddressKind::Unicast,
            },
        );
        let record = table.get_mut(ChannelType::Rx, &target).unwrap();
        let both_up = InterfaceMask::single(conmon_support::InterfaceIndex::new(0).unwrap())
            .union(InterfaceMask::single(conmon_support::InterfaceIndex::new(1).unwrap()));
        record.set_connection_masks(both_up, both_up);

        let record = table.get(ChannelType::Rx, &target).unwrap();
        assert_eq!(record.status(), ReceiveStatus::Unicast);
        assert_eq!(record.connections_available(), both_up);
    }

    #[test]
    fn coalesces_duplicate_in_flight_subscribes() {
        let mut table = SubscriptionTable::new();
        let target = mic1();
        assert!(table.subscribe(ChannelType::Rx, target.clone()));
        assert!(!table.subscribe(ChannelType::Rx, target.clone()));
    }

    #[test]
    fn unsubscribe_cancels_in_flight_subscribe() {
        let mut table = SubscriptionTable::new();
        let target = mic1();
        table.subscribe(ChannelType::Rx, target.clone());
        table.unsubscribe(ChannelType::Rx, &target);
        assert!(table.get(ChannelType::Rx, &target).is_none());
        // A fresh subscribe after cancellation is a new request, not a
        // coalesced one.
        assert!(table.subscribe(ChannelType::Rx, target));
    }
}
