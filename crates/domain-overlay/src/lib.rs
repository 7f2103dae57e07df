// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # domain-overlay
//!
//! The authenticated managed-group layer: discovery, identification,
//! authentication, and current-domain selection against a managed
//! controller, gating routing/browse clients onto the chosen domain.

pub mod overlay;

pub use overlay::{
    DomainDescriptor, DomainListener, DomainOverlay, OverlayEvent, OverlayNotification, OverlayState,
};
