// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # conmon-support
//!
//! Identifiers, versions, addresses, format descriptors and the error
//! taxonomy shared by every crate in the conmon/routing/browse stack.
//!
//! Nothing in this crate touches a socket or a byte buffer — it only
//! defines the small, `Copy`-friendly value types the wire codec, the
//! client sessions and the browse tree all pass around.

/// Device, process, vendor and instance identifiers.
pub mod ident;
/// Sample-rate, encoding and other signal-format descriptors.
pub mod format;
/// Fixed-width bit-set helpers used for capability/status/change flags.
pub mod flags;
/// Error taxonomy shared across the stack.
pub mod error;
/// Network address helpers (IPv4 endpoint pairs, interface masks).
pub mod addr;

pub use addr::{Endpoint, InterfaceIndex, InterfaceMask, MAX_INTERFACES};
pub use error::{ConmonError, Result};
pub use flags::BitSet;
pub use format::{Encoding, Format, Fpp, Latency, SampleRate};
pub use ident::{DeviceId, DomainUuid, InstanceId, Name, ProcessId, VendorId, Version};
