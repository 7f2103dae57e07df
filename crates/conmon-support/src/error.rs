// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for the conmon/routing/browse stack.
//!
//! Every variant is a *kind*, not a type: no variant carries a nested
//! `std::error::Error` other than the raw I/O error, so the taxonomy stays
//! stable across crate boundaries (a routing-core error and a socket error
//! are both just `ConmonError` values a caller can match on).

use std::fmt;
use std::io;

/// Errors returned by operations across the conmon/routing/browse stack.
///
/// Grouped the way the specification's error taxonomy groups them: generic
/// parameter/state errors, socket errors (mapped from the host OS), and
/// routing-core/discovery errors specific to this protocol family.
#[derive(Debug)]
pub enum ConmonError {
    // ----- Generic -----
    /// The call succeeded with no further information to report.
    Success,
    /// Iteration has no more elements.
    Done,
    /// A parameter failed validation before any I/O was attempted.
    InvalidParameter(String),
    /// The payload's structure or contents could not be interpreted.
    InvalidData(String),
    /// The operation is not valid in the object's current state.
    InvalidState(String),
    /// A fixed-capacity pool or buffer has no room left.
    NoMemory,
    /// The operation was interrupted before completing.
    Interrupted,
    /// A frame or buffer was shorter than required and was truncated.
    Truncated,
    /// The operation is recognised but not implemented for this target.
    NotSupported,
    /// A request or subscription reached its deadline without a reply.
    TimedOut,
    /// The requested entity does not exist.
    NotFound,
    /// A value fell outside its accepted range.
    Range,
    /// The operation was refused by an access-control policy.
    Policy,
    /// A protocol or payload version could not be serviced.
    Version,

    // ----- Socket (mapped from the host OS) -----
    /// The requested address or port is already in use.
    SocketInUse,
    /// No network interface is currently available to bind to.
    SocketNotAvailable,
    /// The destination host or network is unreachable.
    SocketUnreachable,
    /// The peer reset the connection.
    SocketReset,
    /// The peer refused the connection.
    SocketRefused,
    /// The connection was aborted locally.
    SocketAborted,
    /// The socket is not connected.
    SocketNotConnected,
    /// The socket was shut down.
    SocketShutdown,
    /// The datagram exceeded the transport's maximum message size.
    SocketMessageSize,
    /// Any other I/O failure, preserved for diagnostics.
    Io(io::Error),

    // ----- Routing-core -----
    /// The supplied handle does not refer to a live object.
    InvalidHandle,
    /// The session's handle arena has no free slots.
    NoMoreHandles,
    /// The request table has no free slots.
    OutOfRequests,
    /// A session's negotiated capability bitset changed after the first query.
    CapabilitiesChanged,
    /// The requested label would duplicate this device's own canonical name.
    OwnCanonicalName,
    /// The requested label would duplicate another tx-channel's canonical name.
    OtherCanonicalName,
    /// A label with this name already exists on the device.
    LabelExists,
    /// No label with this name exists on the device.
    LabelDoesntExist,

    // ----- Discovery -----
    /// The underlying discovery provider reported a failure.
    DiscoveryFailed,
}

impl fmt::Display for ConmonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Done => write!(f, "no more elements"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::NoMemory => write!(f, "out of memory"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Truncated => write!(f, "frame truncated"),
            Self::NotSupported => write!(f, "not supported"),
            Self::TimedOut => write!(f, "timed out"),
            Self::NotFound => write!(f, "not found"),
            Self::Range => write!(f, "value out of range"),
            Self::Policy => write!(f, "rejected by policy"),
            Self::Version => write!(f, "unsupported version"),
            Self::SocketInUse => write!(f, "address in use"),
            Self::SocketNotAvailable => write!(f, "address not available"),
            Self::SocketUnreachable => write!(f, "host unreachable"),
            Self::SocketReset => write!(f, "connection reset"),
            Self::SocketRefused => write!(f, "connection refused"),
            Self::SocketAborted => write!(f, "connection aborted"),
            Self::SocketNotConnected => write!(f, "socket not connected"),
            Self::SocketShutdown => write!(f, "socket shut down"),
            Self::SocketMessageSize => write!(f, "message too large for transport"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::InvalidHandle => write!(f, "invalid handle"),
            Self::NoMoreHandles => write!(f, "no more handles"),
            Self::OutOfRequests => write!(f, "request pool exhausted"),
            Self::CapabilitiesChanged => write!(f, "device capabilities changed"),
            Self::OwnCanonicalName => write!(f, "label duplicates own canonical name"),
            Self::OtherCanonicalName => write!(f, "label duplicates another channel's canonical name"),
            Self::LabelExists => write!(f, "label already exists"),
            Self::LabelDoesntExist => write!(f, "label does not exist"),
            Self::DiscoveryFailed => write!(f, "discovery failed"),
        }
    }
}

impl std::error::Error for ConmonError {}

impl From<io::Error> for ConmonError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::AddrInUse => Self::SocketInUse,
            io::ErrorKind::AddrNotAvailable => Self::SocketNotAvailable,
            io::ErrorKind::ConnectionReset => Self::SocketReset,
            io::ErrorKind::ConnectionRefused => Self::SocketRefused,
            io::ErrorKind::ConnectionAborted => Self::SocketAborted,
            io::ErrorKind::NotConnected => Self::SocketNotConnected,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::Interrupted => Self::Interrupted,
            _ => Self::Io(err),
        }
    }
}

/// Result alias used throughout the conmon/routing/browse stack.
pub type Result<T> = std::result::Result<T, ConmonError>;
