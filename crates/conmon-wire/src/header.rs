// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed frame header shared by control-monitoring and device-routing
//! frames.
//!
//! Layout (24 bytes, little-endian): `sequence:16, body_length:16,
//! message_class:16, vendor_id:64, source_device_id:64,
//! source_process_id:16`. There is no header-level format-version field;
//! version lives in the vendor payload that follows.

use conmon_support::{ConmonError, DeviceId, ProcessId};

/// Size in bytes of the fixed frame header.
pub const HEADER_LEN: usize = 24;

/// A frame's message class. `0xFFFF` carries vendor-specific payloads;
/// `0xFFFE` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    VendorSpecific,
    Reserved,
    Other(u16),
}

impl MessageClass {
    const VENDOR_SPECIFIC: u16 = 0xFFFF;
    const RESERVED: u16 = 0xFFFE;

    #[must_use]
    fn from_wire(value: u16) -> Self {
        match value {
            Self::VENDOR_SPECIFIC => Self::VendorSpecific,
            Self::RESERVED => Self::Reserved,
            other => Self::Other(other),
        }
    }

    #[must_use]
    fn to_wire(self) -> u16 {
        match self {
            Self::VendorSpecific => Self::VENDOR_SPECIFIC,
            Self::Reserved => Self::RESERVED,
            Self::Other(value) => value,
        }
    }
}

/// Writes a frame header into a caller-owned 24-byte buffer.
///
/// `init` fills every field except `body_length`, which is not known
/// until the body has been written; call [`HeaderWriter::set_body_length`]
/// afterwards.
pub struct HeaderWriter<'a> {
    buffer: &'a mut [u8],
}

impl<'a> HeaderWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    pub fn init(
        &mut self,
        sequence: u16,
        class: MessageClass,
        vendor_id: [u8; 8],
        source_device_id: DeviceId,
        source_process_id: ProcessId,
    ) -> Result<(), ConmonError> {
        if self.buffer.len() < HEADER_LEN {
            return Err(ConmonError::Truncated);
        }
        self.buffer[0..2].copy_from_slice(&sequence.to_le_bytes());
        self.buffer[2..4].copy_from_slice(&0u16.to_le_bytes()); // body_length, set later
        self.buffer[4..6].copy_from_slice(&class.to_wire().to_le_bytes());
        self.buffer[6..14].copy_from_slice(&vendor_id);
        self.buffer[14..22].copy_from_slice(&source_device_id.0.to_le_bytes());
        let process_id: u16 = source_process_id
            .0
            .try_into()
            .map_err(|_| ConmonError::Range)?;
        self.buffer[22..24].copy_from_slice(&process_id.to_le_bytes());
        Ok(())
    }

    pub fn set_body_length(&mut self, body_length: u16) -> Result<(), ConmonError> {
        if self.buffer.len() < HEADER_LEN {
            return Err(ConmonError::Truncated);
        }
        self.buffer[2..4].copy_from_slice(&body_length.to_le_bytes());
        Ok(())
    }
}

/// Read-only accessors over a parsed frame header. This is the only
/// supported way to read header fields; there is no public struct with
/// named fields to pattern-match on.
pub struct HeaderReader<'a> {
    buffer: &'a [u8],
}

impl<'a> HeaderReader<'a> {
    /// Parse a header, failing if the buffer is shorter than
    /// [`HEADER_LEN`].
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    fn u16_at(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.buffer[offset], self.buffer[offset + 1]])
    }

    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.u16_at(0)
    }

    #[must_use]
    pub fn body_length(&self) -> u16 {
        self.u16_at(2)
    }

    #[must_use]
    pub fn message_class(&self) -> MessageClass {
        MessageClass::from_wire(self.u16_at(4))
    }

    #[must_use]
    pub fn vendor_id(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.buffer[6..14]);
        out
    }

    #[must_use]
    pub fn source_device_id(&self) -> DeviceId {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.buffer[14..22]);
        DeviceId(u64::from_le_bytes(bytes))
    }

    #[must_use]
    pub fn source_process_id(&self) -> ProcessId {
        ProcessId(self.u16_at(22) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrips_every_field() {
        let mut buf = [0u8; HEADER_LEN];
        let vendor = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut writer = HeaderWriter::new(&mut buf);
        writer
            .init(
                42,
                MessageClass::VendorSpecific,
                vendor,
                DeviceId(0xDEAD_BEEF_0000_0001),
                ProcessId(7),
            )
            .unwrap();
        writer.set_body_length(100).unwrap();

        let reader = HeaderReader::new(&buf);
        assert_eq!(reader.sequence(), 42);
        assert_eq!(reader.body_length(), 100);
        assert_eq!(reader.message_class(), MessageClass::VendorSpecific);
        assert_eq!(reader.vendor_id(), vendor);
        assert_eq!(reader.source_device_id(), DeviceId(0xDEAD_BEEF_0000_0001));
        assert_eq!(reader.source_process_id(), ProcessId(7));
    }

    #[test]
    fn reserved_and_other_classes_round_trip() {
        let mut buf = [0u8; HEADER_LEN];
        let mut writer = HeaderWriter::new(&mut buf);
        writer
            .init(
                0,
                MessageClass::Other(0x0042),
                [0; 8],
                DeviceId(0),
                ProcessId(0),
            )
            .unwrap();
        assert_eq!(HeaderReader::new(&buf).message_class(), MessageClass::Other(0x0042));
    }

    #[test]
    fn process_id_out_of_u16_range_is_rejected() {
        let mut buf = [0u8; HEADER_LEN];
        let mut writer = HeaderWriter::new(&mut buf);
        let err = writer
            .init(
                0,
                MessageClass::VendorSpecific,
                [0; 8],
                DeviceId(0),
                ProcessId(70_000),
            )
            .unwrap_err();
        assert!(matches!(err, ConmonError::Range));
    }
}
