// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tx/rx channel, and the label a tx-channel may advertise.

use conmon_support::{Format, InterfaceMask, Latency, Name};

/// A transmit channel. The canonical name is set at creation on the
/// device side and never changes; this client only observes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxChannel {
    pub id: u16,
    pub canonical_name: Name,
    pub format: Format,
    pub enabled: bool,
    pub muted: bool,
    pub signal_reference_level: i32,
    pub stale: bool,
    pub labels: Vec<u16>,
}

impl TxChannel {
    #[must_use]
    pub fn new(id: u16, canonical_name: Name, format: Format) -> Self {
        assert!(id >= 1, "tx-channel ids are 1-based");
        Self {
            id,
            canonical_name,
            format,
            enabled: true,
            muted: false,
            signal_reference_level: 0,
            stale: false,
            labels: Vec::new(),
        }
    }
}

/// A receive channel: mutable name, subscription target, and the
/// connection masks the subscription state machine (see `conmon-client`)
/// reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxChannel {
    pub id: u16,
    pub name: Name,
    pub format: Format,
    pub subscription: Option<conmon_client::SubscriptionTarget>,
    pub latency: Latency,
    pub connections_available: InterfaceMask,
    pub connections_active: InterfaceMask,
    pub muted: bool,
    pub stale: bool,
}

impl RxChannel {
    #[must_use]
    pub fn new(id: u16, name: Name, format: Format) -> Self {
        Self {
            id,
            name,
            format,
            subscription: None,
            latency: Latency(0),
            connections_available: InterfaceMask::empty(),
            connections_active: InterfaceMask::empty(),
            muted: false,
            stale: false,
        }
    }

    /// Invariant: when the channel is receiving, the active connection
    /// set is a subset of what is available.
    #[must_use]
    pub fn connections_consistent(&self) -> bool {
        self.connections_active
            .union(self.connections_available)
            == self.connections_available
    }
}

/// A named alias for a tx-channel. Device-global namespace: a label must
/// not collide with any tx-channel's canonical name, including its own
/// owner's, nor with another label's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: u16,
    pub owner_channel_id: u16,
    pub name: Name,
}

#[cfg(test)]
mod tests {
    use super::*;
    use conmon_support::{Encoding, SampleRate};

    fn fmt() -> Format {
        Format::new(SampleRate(48_000), vec![Encoding::Pcm24])
    }

    #[test]
    fn rx_channel_active_subset_of_available_holds_by_default() {
        let rx = RxChannel::new(1, Name::new("Mic1"), fmt());
        assert!(rx.connections_consistent());
    }
}
