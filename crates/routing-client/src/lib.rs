// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # routing-client
//!
//! Device-routing client: a per-device session with channel/label/flow
//! caches, component-level staleness tracking, and the two-phase flow
//! configuration builder.

pub mod channel;
pub mod flow;
pub mod labels;
pub mod resolver;
pub mod session;

pub use channel::{Label, RxChannel, TxChannel};
pub use flow::{RxFlow, RxFlowConfig, TxFlow, TxFlowConfig};
pub use labels::LabelTable;
pub use resolver::Resolver;
pub use session::{
    CapabilitySet, Component, DeviceSession, DeviceSessionListener, SessionEvent, SessionState,
    SessionStatus,
};
