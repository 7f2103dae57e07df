// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Device-global label namespace, enforcing the canonical-name collision
//! invariant: a label must not duplicate any tx-channel's canonical name
//! on the same device, including its own owner's.

use crate::channel::{Label, TxChannel};
use conmon_support::{ConmonError, Name};
use std::collections::HashMap;

#[derive(Default)]
pub struct LabelTable {
    by_id: HashMap<u16, Label>,
}

impl LabelTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, rejecting it if the name collides with any
    /// tx-channel's canonical name or an existing label.
    pub fn add(
        &mut self,
        id: u16,
        owner_channel_id: u16,
        name: Name,
        tx_channels: &HashMap<u16, TxChannel>,
    ) -> Result<(), ConmonError> {
        if self.by_id.contains_key(&id) {
            return Err(ConmonError::LabelExists);
        }
        for channel in tx_channels.values() {
            if channel.canonical_name == name {
                return Err(if channel.id == owner_channel_id {
                    ConmonError::OwnCanonicalName
                } else {
                    ConmonError::OtherCanonicalName
                });
            }
        }
        if self.by_id.values().any(|label| label.name == name) {
            return Err(ConmonError::LabelExists);
        }
        self.by_id.insert(
            id,
            Label {
                id,
                owner_channel_id,
                name,
            },
        );
        Ok(())
    }

    pub fn remove(&mut self, id: u16) -> Result<(), ConmonError> {
        self.by_id.remove(&id).map(|_| ()).ok_or(ConmonError::LabelDoesntExist)
    }

    #[must_use]
    pub fn get(&self, id: u16) -> Option<&Label> {
        self.by_id.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::TxChannel;
    use conmon_support::{Encoding, Format, SampleRate};

    fn channels() -> HashMap<u16, TxChannel> {
        let mut map = HashMap::new();
        map.insert(
            1,
            TxChannel::new(1, Name::new("Mic1"), Format::new(SampleRate(48_000), vec![Encoding::Pcm24])),
        );
        map
    }

    #[test]
    fn label_cannot_duplicate_own_canonical_name() {
        let mut table = LabelTable::new();
        let err = table.add(1, 1, Name::new("Mic1"), &channels()).unwrap_err();
        assert!(matches!(err, ConmonError::OwnCanonicalName));
    }

    #[test]
    fn label_cannot_duplicate_another_channels_canonical_name() {
        let mut table = LabelTable::new();
        let err = table.add(1, 2, Name::new("Mic1"), &channels()).unwrap_err();
        assert!(matches!(err, ConmonError::OtherCanonicalName));
    }

    #[test]
    fn duplicate_label_name_is_rejected() {
        let mut table = LabelTable::new();
        table.add(1, 2, Name::new("Alias"), &channels()).unwrap();
        let err = table.add(2, 2, Name::new("Alias"), &channels()).unwrap_err();
        assert!(matches!(err, ConmonError::LabelExists));
    }

    #[test]
    fn remove_unknown_label_reports_doesnt_exist() {
        let mut table = LabelTable::new();
        assert!(matches!(table.remove(99), Err(ConmonError::LabelDoesntExist)));
    }
}
