// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identifiers and primitives from the data model (device/process/vendor
//! ids, names, versions, domain UUIDs).

use std::fmt;

/// 64-bit opaque device identifier. `==`-comparable only; no ordering is
/// defined over device ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u64);

/// 32-bit process identifier, unique within a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

/// 64-bit vendor identifier issued externally (e.g. by a registration
/// authority), opaque to this stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VendorId(pub u64);

/// Peer identity: the tuple `(device id, process id)` uniquely identifying
/// a running control-plane peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId {
    pub device_id: DeviceId,
    pub process_id: ProcessId,
}

impl InstanceId {
    #[must_use]
    pub fn new(device_id: DeviceId, process_id: ProcessId) -> Self {
        Self {
            device_id,
            process_id,
        }
    }
}

/// Maximum byte length of a [`Name`]'s payload, not counting the
/// terminating NUL the wire format reserves.
pub const NAME_MAX_LEN: usize = 31;

/// A UTF-8 name up to 31 bytes plus a NUL terminator on the wire.
///
/// Names compare case-insensitively (ASCII), matching the wire protocol's
/// `strcasecmp`-based comparison: `Name`'s `PartialEq`/`Hash`/`Ord`
/// impls operate on a lowercased copy so that e.g. `"Mic1"` and `"mic1"`
/// collide as the same key in lookup tables.
#[derive(Debug, Clone)]
pub struct Name {
    raw: String,
    lower: String,
}

impl Name {
    /// Build a `Name`, truncating to [`NAME_MAX_LEN`] bytes at a UTF-8
    /// character boundary if necessary.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let mut raw = value.into();
        if raw.len() > NAME_MAX_LEN {
            let mut cut = NAME_MAX_LEN;
            while !raw.is_char_boundary(cut) {
                cut -= 1;
            }
            raw.truncate(cut);
        }
        let lower = raw.to_ascii_lowercase();
        Self { raw, lower }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
    }
}
impl Eq for Name {}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lower.cmp(&other.lower)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Protocol/payload version: `major:8, minor:8, bugfix:16`, total-ordered
/// lexicographically on `(major, minor, bugfix)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub bugfix: u16,
}

impl Version {
    #[must_use]
    pub const fn new(major: u8, minor: u8, bugfix: u16) -> Self {
        Self {
            major,
            minor,
            bugfix,
        }
    }

    /// Pack into the 16-bit `major:8, minor:8` field used by payload
    /// headers (the format-version field does not carry `bugfix`).
    #[must_use]
    pub const fn to_format_version(self) -> u16 {
        ((self.major as u16) << 8) | self.minor as u16
    }

    /// Unpack a 16-bit `major:8, minor:8` format-version field.
    #[must_use]
    pub const fn from_format_version(value: u16) -> Self {
        Self {
            major: (value >> 8) as u8,
            minor: (value & 0xFF) as u8,
            bugfix: 0,
        }
    }

    /// True if this version is at least `minimum`, ignoring `bugfix`
    /// (the minor-version compatibility rule from the wire codec).
    #[must_use]
    pub fn satisfies_minimum(self, minimum: Version) -> bool {
        (self.major, self.minor) >= (minimum.major, minimum.minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.bugfix)
    }
}

/// 128-bit domain identifier. All-zero means "no domain"; all-ones means
/// the reserved "ad-hoc" (uncontrolled) grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainUuid(pub u128);

impl DomainUuid {
    /// Reserved value meaning "no domain selected".
    pub const NONE: Self = Self(0);
    /// Reserved value meaning the uncontrolled ad-hoc grouping.
    pub const AD_HOC: Self = Self(u128::MAX);

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[must_use]
    pub fn is_ad_hoc(self) -> bool {
        self == Self::AD_HOC
    }
}

impl fmt::Display for DomainUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "none")
        } else if self.is_ad_hoc() {
            write!(f, "ad-hoc")
        } else {
            write!(f, "{:032x}", self.0)
        }
    }
}
