// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Session-description (SDP) accessors for interoperable audio-over-RTP
//! sessions the browse subsystem discovers.
//!
//! The core stores an SDP blob opaquely (it never re-serialises it back
//! onto the wire byte-for-byte) but exposes parsed, typed accessors over
//! the subset of fields this stack cares about: origin, session name,
//! clock reference, stream direction, sample rate, encoding, channel
//! count and port. Parsing is tolerant of unknown lines (forward
//! compatibility with fields this core does not interpret); serialising
//! a [`SessionDescription`] back out and re-parsing it MUST reproduce the
//! same accessor values, which is the round-trip law this module is
//! responsible for.

use conmon_support::{Encoding, SampleRate};
use std::fmt::Write as _;

/// A session's advertised stream direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    Undefined,
    RecvOnly,
    SendRecv,
    SendOnly,
}

impl StreamDirection {
    fn as_sdp_attr(self) -> &'static str {
        match self {
            Self::Undefined => "a=undef",
            Self::RecvOnly => "a=recvonly",
            Self::SendRecv => "a=sendrecv",
            Self::SendOnly => "a=sendonly",
        }
    }

    fn from_sdp_attr(value: &str) -> Self {
        match value {
            "a=recvonly" => Self::RecvOnly,
            "a=sendrecv" => Self::SendRecv,
            "a=sendonly" => Self::SendOnly,
            _ => Self::Undefined,
        }
    }
}

/// Parsed, typed view over the subset of SDP fields this core interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub origin_session_id: u64,
    pub session_name: String,
    pub clock_reference: String,
    pub direction: StreamDirection,
    pub sample_rate: SampleRate,
    pub encoding: Encoding,
    pub channel_count: u16,
    pub port: u16,
}

impl SessionDescription {
    /// Serialise into the minimal SDP text this core produces. Not a
    /// general-purpose SDP writer: only the fields this struct carries
    /// are emitted, in a fixed order, sufficient for
    /// `parse(serialize(x)) == x`.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "o=- {} 0 IN IP4 0.0.0.0", self.origin_session_id);
        let _ = writeln!(out, "s={}", self.session_name);
        let _ = writeln!(out, "a=clock-domain:PTPv2 {}", self.clock_reference);
        let _ = writeln!(out, "{}", self.direction.as_sdp_attr());
        let _ = writeln!(
            out,
            "m=audio {} RTP/AVP 97",
            self.port
        );
        let _ = writeln!(
            out,
            "a=rtpmap:97 {}/{}/{}",
            encoding_rtpmap_name(self.encoding),
            self.sample_rate.0,
            self.channel_count
        );
        out
    }

    /// Parse an SDP blob, ignoring lines this core does not interpret.
    pub fn parse(blob: &str) -> Option<Self> {
        let mut origin_session_id = None;
        let mut session_name = None;
        let mut clock_reference = None;
        let mut direction = StreamDirection::Undefined;
        let mut sample_rate = None;
        let mut encoding = None;
        let mut channel_count = None;
        let mut port = None;

        for line in blob.lines() {
            if let Some(rest) = line.strip_prefix("o=") {
                origin_session_id = rest.split_whitespace().nth(1).and_then(|s| s.parse().ok());
            } else if let Some(rest) = line.strip_prefix("s=") {
                session_name = Some(rest.to_string());
            } else if let Some(rest) = line.strip_prefix("a=clock-domain:") {
                clock_reference = rest.split_whitespace().nth(1).map(str::to_string);
            } else if line.starts_with("a=recvonly")
                || line.starts_with("a=sendrecv")
                || line.starts_with("a=sendonly")
                || line.starts_with("a=undef")
            {
                direction = StreamDirection::from_sdp_attr(line);
            } else if let Some(rest) = line.strip_prefix("m=audio ") {
                port = rest.split_whitespace().next().and_then(|s| s.parse().ok());
            } else if let Some(rest) = line.strip_prefix("a=rtpmap:") {
                let mut parts = rest.split_whitespace();
                let _payload_type = parts.next();
                if let Some(codec) = parts.next() {
                    let mut codec_parts = codec.split('/');
                    encoding = codec_parts.next().and_then(encoding_from_rtpmap_name);
                    sample_rate = codec_parts.next().and_then(|s| s.parse().ok()).map(SampleRate);
                    channel_count = codec_parts.next().and_then(|s| s.parse().ok());
                }
            }
        }

        Some(Self {
            origin_session_id: origin_session_id?,
            session_name: session_name?,
            clock_reference: clock_reference?,
            direction,
            sample_rate: sample_rate?,
            encoding: encoding?,
            channel_count: channel_count?,
            port: port?,
        })
    }
}

fn encoding_rtpmap_name(encoding: Encoding) -> &'static str {
    match encoding {
        Encoding::Pcm16 => "L16",
        Encoding::Pcm24 => "L24",
        Encoding::Pcm32 => "L32",
        Encoding::Float32 => "F32",
        Encoding::Native => "NATIVE",
    }
}

fn encoding_from_rtpmap_name(name: &str) -> Option<Encoding> {
    match name {
        "L16" => Some(Encoding::Pcm16),
        "L24" => Some(Encoding::Pcm24),
        "L32" => Some(Encoding::Pcm32),
        "F32" => Some(Encoding::Float32),
        "NATIVE" => Some(Encoding::Native),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionDescription {
        SessionDescription {
            origin_session_id: 0x1122_3344,
            session_name: "Mic1".to_string(),
            clock_reference: "00-1d-c1-ff-fe-00-00-01".to_string(),
            direction: StreamDirection::SendOnly,
            sample_rate: SampleRate(48_000),
            encoding: Encoding::Pcm24,
            channel_count: 2,
            port: 5004,
        }
    }

    #[test]
    fn serialize_then_parse_is_a_lossless_roundtrip() {
        let original = sample();
        let blob = original.serialize();
        let parsed = SessionDescription::parse(&blob).expect("blob should parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn parse_ignores_unknown_lines() {
        let mut blob = sample().serialize();
        blob.push_str("a=some-future-attribute xyz\n");
        assert_eq!(SessionDescription::parse(&blob), Some(sample()));
    }

    #[test]
    fn parse_rejects_blob_missing_required_fields() {
        assert_eq!(SessionDescription::parse("s=OnlyName\n"), None);
    }
}
