// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Vendor payload namespace.
//!
//! Every vendor-class frame body begins with an 8-byte
//! [`VendorPayloadHeader`]. The core interprets the type tag and the
//! generic-purpose fields this module enumerates; everything else about a
//! message's body is out of scope and carried opaquely by the caller as
//! raw bytes (see the crate's non-goals: vendor-supplied payload schemas
//! beyond framing are not this stack's concern).

use crate::body::{BodyReader, BodyWriter};
use conmon_support::{ConmonError, Version};

/// Recognised vendor message types. `Other` carries any type tag this
/// crate does not interpret further than routing on the tag.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorMessageType {
    InterfaceStatus,
    InterfaceControl,
    ClockingStatus,
    ClockingControl,
    IfStats,
    IgmpVersion,
    Versions,
    Identify,
    Upgrade,
    SampleRate,
    Encoding,
    SampleRatePullup,
    AudioInterface,
    SystemReset,
    AccessControl,
    ManufacturerVersions,
    Led,
    MeteringParameters,
    SerialPort,
    RoutingReady,
    TxChannelChange,
    RxChannelChange,
    TxLabelChange,
    RxFlowChange,
    TxFlowChange,
    RxErrorThreshold,
    PropertyChanged,
    DanteReady,
    Gpio,
    HaRemote,
    Aes67,
    Codec,
    TxChannelLabelChange,
    Ping,
    Other(u16),
}

impl VendorMessageType {
    #[must_use]
    pub fn from_wire(value: u16) -> Self {
        match value {
            0x0011 => Self::InterfaceStatus,
            0x0013 => Self::InterfaceControl,
            0x0020 => Self::ClockingStatus,
            0x0021 => Self::ClockingControl,
            0x0040 => Self::IfStats,
            0x0050 => Self::IgmpVersion,
            0x0060 => Self::Versions,
            0x0062 => Self::Identify,
            0x0070 => Self::Upgrade,
            0x0080 => Self::SampleRate,
            0x0082 => Self::Encoding,
            0x0084 => Self::SampleRatePullup,
            0x0086 => Self::AudioInterface,
            0x0090 => Self::SystemReset,
            0x00b1 => Self::AccessControl,
            0x00c0 => Self::ManufacturerVersions,
            0x00d0 => Self::Led,
            0x00e0 => Self::MeteringParameters,
            0x00f0 => Self::SerialPort,
            0x0100 => Self::RoutingReady,
            0x0101 => Self::TxChannelChange,
            0x0102 => Self::RxChannelChange,
            0x0103 => Self::TxLabelChange,
            0x0104 => Self::TxFlowChange,
            0x0105 => Self::RxFlowChange,
            0x0106 => Self::PropertyChanged,
            0x0112 => Self::RxErrorThreshold,
            0x0130 => Self::DanteReady,
            0x0131 => Self::Ping,
            0x0141 => Self::Gpio,
            0x1000 => Self::HaRemote,
            0x1007 => Self::Aes67,
            0x100b => Self::Codec,
            0x100c => Self::TxChannelLabelChange,
            other => Self::Other(other),
        }
    }

    /// The wire tag for this type, taken from `conmon_audinate_messages.h`.
    /// Where the original header splits a concept into separate
    /// status/query/control tags, the status (or sole) tag is used here
    /// since this enum has one variant per concept rather than per
    /// direction.
    #[must_use]
    pub fn to_wire(self) -> u16 {
        match self {
            Self::InterfaceStatus => 0x0011,
            Self::InterfaceControl => 0x0013,
            Self::ClockingStatus => 0x0020,
            Self::ClockingControl => 0x0021,
            Self::IfStats => 0x0040,
            Self::IgmpVersion => 0x0050,
            Self::Versions => 0x0060,
            Self::Identify => 0x0062,
            Self::Upgrade => 0x0070,
            Self::SampleRate => 0x0080,
            Self::Encoding => 0x0082,
            Self::SampleRatePullup => 0x0084,
            Self::AudioInterface => 0x0086,
            Self::SystemReset => 0x0090,
            Self::AccessControl => 0x00b1,
            Self::ManufacturerVersions => 0x00c0,
            Self::Led => 0x00d0,
            Self::MeteringParameters => 0x00e0,
            Self::SerialPort => 0x00f0,
            Self::RoutingReady => 0x0100,
            Self::TxChannelChange => 0x0101,
            Self::RxChannelChange => 0x0102,
            Self::TxLabelChange => 0x0103,
            Self::TxFlowChange => 0x0104,
            Self::RxFlowChange => 0x0105,
            Self::PropertyChanged => 0x0106,
            Self::RxErrorThreshold => 0x0112,
            Self::DanteReady => 0x0130,
            Self::Ping => 0x0131,
            Self::Gpio => 0x0141,
            Self::HaRemote => 0x1000,
            Self::Aes67 => 0x1007,
            Self::Codec => 0x100b,
            Self::TxChannelLabelChange => 0x100c,
            Self::Other(value) => value,
        }
    }
}

/// The 8-byte header every vendor payload body starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorPayloadHeader {
    pub format_version: Version,
    pub message_type: VendorMessageType,
    pub congestion_delay_micros: u32,
}

pub fn init_vendor_header(
    writer: &mut BodyWriter<'_>,
    header: VendorPayloadHeader,
) -> Result<(), ConmonError> {
    writer.write_u16_le(header.format_version.to_format_version())?;
    writer.write_u16_le(header.message_type.to_wire())?;
    writer.write_u32_le(header.congestion_delay_micros)?;
    Ok(())
}

pub fn get_vendor_header(reader: &mut BodyReader<'_>) -> Result<VendorPayloadHeader, ConmonError> {
    let format_version = Version::from_format_version(reader.read_u16_le()?);
    let message_type = VendorMessageType::from_wire(reader.read_u16_le()?);
    let congestion_delay_micros = reader.read_u32_le()?;
    Ok(VendorPayloadHeader {
        format_version,
        message_type,
        congestion_delay_micros,
    })
}

/// A ping body is exactly the vendor payload header with no further
/// fields: `init_ping`/`get_ping` are direct aliases over
/// `init_vendor_header`/`get_vendor_header` with the message type forced
/// to [`VendorMessageType::Ping`].
pub fn init_ping(
    writer: &mut BodyWriter<'_>,
    mut header: VendorPayloadHeader,
) -> Result<(), ConmonError> {
    header.message_type = VendorMessageType::Ping;
    init_vendor_header(writer, header)
}

pub fn get_ping(reader: &mut BodyReader<'_>) -> Result<VendorPayloadHeader, ConmonError> {
    let header = get_vendor_header(reader)?;
    if header.message_type != VendorMessageType::Ping {
        return Err(ConmonError::InvalidData("not a ping body".into()));
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySize;

    #[test]
    fn ping_body_roundtrips_and_is_exactly_8_bytes() {
        let mut buf = [0u8; 8];
        let mut size = BodySize::new(8);
        init_ping(
            &mut BodyWriter::new(&mut buf, &mut size),
            VendorPayloadHeader {
                format_version: Version::new(7, 8, 0),
                message_type: VendorMessageType::Ping,
                congestion_delay_micros: 0,
            },
        )
        .unwrap();
        assert_eq!(size.current(), 8);

        let mut reader = BodyReader::new(&buf, BodySize::at(8, 8));
        let header = get_ping(&mut reader).unwrap();
        assert_eq!(header.format_version.to_format_version(), 0x0708);
        assert_eq!(header.congestion_delay_micros, 0);
    }

    #[test]
    fn get_ping_rejects_mismatched_type() {
        let mut buf = [0u8; 8];
        let mut size = BodySize::new(8);
        init_vendor_header(
            &mut BodyWriter::new(&mut buf, &mut size),
            VendorPayloadHeader {
                format_version: Version::new(1, 0, 0),
                message_type: VendorMessageType::Identify,
                congestion_delay_micros: 0,
            },
        )
        .unwrap();
        let mut reader = BodyReader::new(&buf, BodySize::at(8, 8));
        assert!(get_ping(&mut reader).is_err());
    }

    #[test]
    fn unknown_wire_type_round_trips_as_other() {
        assert_eq!(VendorMessageType::from_wire(0x9999), VendorMessageType::Other(0x9999));
        assert_eq!(VendorMessageType::Other(0x9999).to_wire(), 0x9999);
    }
}
