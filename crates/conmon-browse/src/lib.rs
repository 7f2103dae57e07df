// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # conmon-browse
//!
//! Mixed-cast service browse tree: aggregates per-interface sightings of
//! the routing, control-monitoring, safe-mode, upgrade and
//! session-description services into one logical device tree.

pub mod provider;
pub mod session;
pub mod tree;

pub use provider::{BrowseProvider, Sighting, SightingEvent};
pub use session::{BrowseEvent, BrowseListener, BrowseSession};
pub use tree::{BrowseDelta, BrowseTree, DeviceNode, InterfaceAttributes, PerServiceType, ServiceType, SERVICE_TYPE_COUNT};
