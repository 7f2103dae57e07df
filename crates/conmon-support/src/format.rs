// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signal-format descriptors: sample rate, encoding, latency, frames per
//! packet, and the combined `Format` a tx/rx channel advertises.

/// Sample rate in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleRate(pub u32);

/// Sample encoding. The 16-bit enum from the wire protocol, plus a
/// `Native` variant for device-defined encodings that carry no further
/// structure the core needs to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Pcm16,
    Pcm24,
    Pcm32,
    Float32,
    Native,
}

impl Encoding {
    #[must_use]
    pub fn from_wire(value: u16) -> Option<Self> {
        match value {
            0x0002 => Some(Self::Pcm16),
            0x0003 => Some(Self::Pcm24),
            0x0004 => Some(Self::Pcm32),
            0x0008 => Some(Self::Float32),
            0x00FF => Some(Self::Native),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_wire(self) -> u16 {
        match self {
            Self::Pcm16 => 0x0002,
            Self::Pcm24 => 0x0003,
            Self::Pcm32 => 0x0004,
            Self::Float32 => 0x0008,
            Self::Native => 0x00FF,
        }
    }
}

/// Latency in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Latency(pub u32);

/// Frames per packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fpp(pub u16);

/// A channel's advertised format: a sample rate plus the set of encodings
/// it can carry (a device may advertise support for more than one
/// encoding on the same channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub sample_rate: SampleRate,
    pub encodings: Vec<Encoding>,
}

impl Format {
    #[must_use]
    pub fn new(sample_rate: SampleRate, encodings: Vec<Encoding>) -> Self {
        Self {
            sample_rate,
            encodings,
        }
    }

    #[must_use]
    pub fn supports(&self, encoding: Encoding) -> bool {
        self.encodings.contains(&encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_wire_roundtrip() {
        for enc in [
            Encoding::Pcm16,
            Encoding::Pcm24,
            Encoding::Pcm32,
            Encoding::Float32,
            Encoding::Native,
        ] {
            assert_eq!(Encoding::from_wire(enc.to_wire()), Some(enc));
        }
    }

    #[test]
    fn unknown_wire_encoding_is_none() {
        assert_eq!(Encoding::from_wire(0x9999), None);
    }

    #[test]
    fn format_supports_checks_encoding_set() {
        let fmt = Format::new(SampleRate(48_000), vec![Encoding::Pcm24, Encoding::Pcm16]);
        assert!(fmt.supports(Encoding::Pcm16));
        assert!(!fmt.supports(Encoding::Float32));
    }
}
