// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # conmon-wire
//!
//! Encodes and decodes the frames of the control-monitoring and
//! device-routing wire protocols: a fixed frame header, a vendor-payload
//! namespace riding inside it, and the opaque session-description blob
//! the browse subsystem hands to interoperable streaming sessions.
//!
//! Everything here is a pure function over caller-owned byte buffers.
//! Nothing in this crate opens a socket, retries, or allocates on the
//! hot path; size tracking for a body under construction is carried
//! explicitly in [`body::BodySize`] rather than inferred from a growable
//! buffer.

/// Bounds-checked cursor types and the `{current_size, max_size}` body
/// size tracker every payload writer/reader shares.
pub mod body;
/// Frame header construction and parsing.
pub mod header;
/// Request/response correlation id embedded in routing frames.
pub mod request_id;
/// Session-description (SDP) blob accessors.
pub mod sdp;
/// Vendor payload namespace: header plus per-type `init_*`/`get_*` pairs.
pub mod vendor;

pub use body::{BodyReader, BodySize, BodyWriter};
pub use header::{HeaderReader, HeaderWriter, MessageClass, HEADER_LEN};
pub use request_id::RequestId;
pub use vendor::{VendorMessageType, VendorPayloadHeader};

use conmon_support::ConmonError;

/// Events the codec itself raises, independent of any particular frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecEvent {
    /// The server-advertised MTU shrank; `max_body_size` reflects the new
    /// ceiling starting with the frame that carried this change.
    MaxBodySizeChanged { new_max: usize },
}

/// The largest body a single frame may carry without risking UDP
/// fragmentation. Matches the reference limit of one non-fragmenting
/// datagram (1500-byte Ethernet MTU minus IPv4/UDP headers) minus the
/// fixed frame header.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1500 - 28 - HEADER_LEN;

/// Tracks the negotiated body-size ceiling for one session's frames.
///
/// Starts at [`DEFAULT_MAX_BODY_SIZE`] and may only shrink: the device
/// side can signal a smaller MTU, never a larger one than the
/// UDP-non-fragmenting default this stack assumes.
#[derive(Debug, Clone, Copy)]
pub struct MaxBodySize(usize);

impl Default for MaxBodySize {
    fn default() -> Self {
        Self(DEFAULT_MAX_BODY_SIZE)
    }
}

impl MaxBodySize {
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    /// Apply a server-advertised ceiling, returning the event to surface
    /// if it actually shrank the limit.
    pub fn shrink_to(&mut self, advertised: usize) -> Option<CodecEvent> {
        if advertised < self.0 {
            self.0 = advertised;
            Some(CodecEvent::MaxBodySizeChanged { new_max: advertised })
        } else {
            None
        }
    }
}

/// Validate an incoming frame's declared body length against the current
/// ceiling before any parsing touches the body.
///
/// Returns `Truncated` per the boundary behaviour: a frame whose declared
/// body length exceeds `max_body_size` is dropped rather than parsed.
pub fn check_body_length(declared: usize, max_body_size: usize) -> Result<(), ConmonError> {
    if declared > max_body_size {
        Err(ConmonError::Truncated)
    } else {
        Ok(())
    }
}
