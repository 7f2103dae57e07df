// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tx/rx flow tables and the two-phase flow configuration builder.
//!
//! A flow config handle is created mutable (new or "edit-existing"),
//! mutated slot by slot, then either `commit`ted (sends frames, reflects
//! only transmission — not device-side application) or `discard`ed
//! (releases the handle with no side effects). In edit-existing mode,
//! slots the caller does not touch MUST keep carrying their prior
//! tx-channel without an audio discontinuity: `commit` only emits frames
//! for the slots that actually changed.

use conmon_support::{ConmonError, Encoding, Endpoint, Fpp, Latency, Name};

/// One transmit flow: up to 4 slots, each either empty or carrying one
/// tx-channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxFlow {
    pub id: u16,
    pub name: Option<Name>,
    pub latency: Latency,
    pub fpp: Fpp,
    pub slots: [u16; TxFlow::SLOT_COUNT],
    pub destinations: Vec<Endpoint>,
    pub manual: bool,
    pub advertised: bool,
    pub persistent: bool,
    pub dest_device_name: Option<Name>,
    pub dest_flow_name: Option<Name>,
}

impl TxFlow {
    pub const SLOT_COUNT: usize = 4;

    #[must_use]
    pub fn new(id: u16) -> Self {
        Self {
            id,
            name: None,
            latency: Latency(0),
            fpp: Fpp(0),
            slots: [0; Self::SLOT_COUNT],
            destinations: Vec::new(),
            manual: true,
            advertised: false,
            persistent: false,
            dest_device_name: None,
            dest_flow_name: None,
        }
    }
}

/// One receive flow: each slot fans out to zero or more rx-channel ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RxFlow {
    pub id: u16,
    pub name: Option<Name>,
    pub multicast: bool,
    pub slots: Vec<Vec<u16>>,
    pub source: Option<Endpoint>,
    pub latency: Latency,
    pub tx_device_name: Option<Name>,
    pub tx_flow_name: Option<Name>,
    pub manual: bool,
    pub persistent: bool,
}

/// A pending slot mutation recorded by the builder before `commit`
/// decides which slots actually need a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotEdit {
    slot: usize,
    tx_channel_id: u16,
}

/// Two-phase builder for a tx-flow's slot/address/latency/encoding/fpp
/// configuration.
pub struct TxFlowConfig {
    base: TxFlow,
    edits: Vec<SlotEdit>,
    editing_existing: bool,
    encoding: Option<Encoding>,
}

impl TxFlowConfig {
    /// Start configuring a brand-new flow.
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self {
            base: TxFlow::new(id),
            edits: Vec::new(),
            editing_existing: false,
            encoding: None,
        }
    }

    /// Start editing an existing flow. Slots neither re-bound nor removed
    /// via [`TxFlowConfig::set_slot`]/[`TxFlowConfig::clear_slot`] keep
    /// their prior tx-channel through `commit` — the glitch-free
    /// guarantee.
    #[must_use]
    pub fn edit_existing(existing: TxFlow) -> Self {
        Self {
            base: existing,
            edits: Vec::new(),
            editing_existing: true,
            encoding: None,
        }
    }

    pub fn set_slot(&mut self, slot: usize, tx_channel_id: u16) -> Result<(), ConmonError> {
        if slot >= TxFlow::SLOT_COUNT {
            return Err(ConmonError::Range);
        }
        if tx_channel_id == 0 {
            return Err(ConmonError::InvalidParameter("tx-channel id 0 is reserved for empty".into()));
        }
        self.edits.retain(|edit| edit.slot != slot);
        self.edits.push(SlotEdit { slot, tx_channel_id });
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: usize) -> Result<(), ConmonError> {
        if slot >= TxFlow::SLOT_COUNT {
            return Err(ConmonError::Range);
        }
        self.edits.retain(|edit| edit.slot != slot);
        self.edits.push(SlotEdit { slot, tx_channel_id: 0 });
        Ok(())
    }

    pub fn set_latency(&mut self, latency: Latency) {
        self.base.latency = latency;
    }

    pub fn set_fpp(&mut self, fpp: Fpp) {
        self.base.fpp = fpp;
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = Some(encoding);
    }

    pub fn set_destinations(&mut self, destinations: Vec<Endpoint>) {
        self.base.destinations = destinations;
    }

    /// Slots changed relative to the edit-existing baseline; `commit`
    /// only needs to emit frames for these.
    #[must_use]
    pub fn changed_slots(&self) -> Vec<usize> {
        self.edits
            .iter()
            .filter(|edit| !self.editing_existing || self.base.slots[edit.slot] != edit.tx_channel_id)
            .map(|edit| edit.slot)
            .collect()
    }

    /// Resolve the builder into the committed flow. The caller is
    /// responsible for actually sending the frames for `changed_slots()`
    /// before treating the commit as complete; this method only performs
    /// the local bookkeeping and validation.
    pub fn commit(mut self) -> Result<TxFlow, ConmonError> {
        for edit in &self.edits {
            self.base.slots[edit.slot] = edit.tx_channel_id;
        }
        Ok(self.base)
    }

    /// Release the handle without applying any edit.
    pub fn discard(self) {}
}

/// Two-phase builder for an rx-flow.
pub struct RxFlowConfig {
    base: RxFlow,
    edits: Vec<(usize, Vec<u16>)>,
}

impl RxFlowConfig {
    #[must_use]
    pub fn new(id: u16, slot_count: usize) -> Self {
        Self {
            base: RxFlow {
                id,
                slots: vec![Vec::new(); slot_count],
                ..RxFlow::default()
            },
            edits: Vec::new(),
        }
    }

    #[must_use]
    pub fn edit_existing(existing: RxFlow) -> Self {
        Self {
            base: existing,
            edits: Vec::new(),
        }
    }

    /// Bind a slot to a set of rx-channel ids (fan-out). Rejects a
    /// duplicate rx-channel id within the same slot.
    pub fn set_slot(&mut self, slot: usize, rx_channel_ids: Vec<u16>) -> Result<(), ConmonError> {
        if slot >= self.base.slots.len() {
            return Err(ConmonError::Range);
        }
        let mut seen = std::collections::HashSet::new();
        for id in &rx_channel_ids {
            if !seen.insert(*id) {
                return Err(ConmonError::InvalidParameter(format!(
                    "rx-channel id {id} appears more than once in slot {slot}"
                )));
            }
        }
        self.edits.retain(|(s, _)| *s != slot);
        self.edits.push((slot, rx_channel_ids));
        Ok(())
    }

    pub fn set_source(&mut self, source: Endpoint) {
        self.base.source = Some(source);
    }

    pub fn set_latency(&mut self, latency: Latency) {
        self.base.latency = latency;
    }

    pub fn commit(mut self) -> Result<RxFlow, ConmonError> {
        for (slot, ids) in self.edits {
            self.base.slots[slot] = ids;
        }
        Ok(self.base)
    }

    pub fn discard(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario 4: edit a 4-slot tx-flow, replacing slots 0 and 2; slots
    // 1 and 3 must remain unchanged (glitch-free) and commit reports
    // exactly the slots that actually changed.
    #[test]
    fn scenario_edit_existing_keeps_untouched_slots() {
        let mut existing = TxFlow::new(9);
        existing.slots = [10, 11, 12, 13];

        let mut config = TxFlowConfig::edit_existing(existing);
        config.set_slot(0, 20).unwrap();
        config.set_slot(2, 22).unwrap();
        assert_eq!(config.changed_slots(), vec![0, 2]);

        let committed = config.commit().unwrap();
        assert_eq!(committed.slots, [20, 11, 22, 13]);
    }

    #[test]
    fn rebinding_a_slot_to_its_existing_value_is_not_a_change() {
        let mut existing = TxFlow::new(1);
        existing.slots[0] = 5;
        let mut config = TxFlowConfig::edit_existing(existing);
        config.set_slot(0, 5).unwrap();
        assert!(config.changed_slots().is_empty());
    }

    #[test]
    fn slot_index_out_of_range_is_rejected() {
        let mut config = TxFlowConfig::new(1);
        assert!(matches!(config.set_slot(4, 1), Err(ConmonError::Range)));
    }

    #[test]
    fn discard_applies_nothing() {
        let mut config = TxFlowConfig::new(1);
        config.set_slot(0, 7).unwrap();
        config.discard();
        // Nothing to assert on the dropped handle beyond it compiling:
        // discard takes `self` by value so it cannot be committed after.
    }

    #[test]
    fn rx_flow_rejects_duplicate_channel_id_within_one_slot() {
        let mut config = RxFlowConfig::new(1, 2);
        let err = config.set_slot(0, vec![3, 3]).unwrap_err();
        assert!(matches!(err, ConmonError::InvalidParameter(_)));
    }

    #[test]
    fn rx_flow_allows_fan_out_to_distinct_channels() {
        let mut config = RxFlowConfig::new(1, 2);
        config.set_slot(0, vec![3, 4, 5]).unwrap();
        let flow = config.commit().unwrap();
        assert_eq!(flow.slots[0], vec![3, 4, 5]);
    }
}
