// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # conmon-runtime
//!
//! The single dispatch loop every client plugs into: socket-set
//! aggregation, next-action-time computation, and re-entry-checked
//! `process()`.

pub mod runtime;

pub use runtime::{ClientId, RawSocketRef, Runtime, RuntimeClient};
