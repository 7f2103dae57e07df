// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-capacity pool of pending request records.
//!
//! Every pool id is returned exactly once, either by [`RequestTable::tick`]
//! (timeout), [`RequestTable::complete`] (a matching reply arrived), or
//! [`RequestTable::cancel`] (caller gave up). Once returned, the id must
//! never be looked up again — `complete`/`cancel` on a stale id report
//! `InvalidHandle`, except `cancel` on an already-free id, which is a
//! documented idempotent no-op.

use conmon_support::ConmonError;
use conmon_wire::RequestId;
use std::time::{Duration, Instant};

/// Default pool capacity, matching the reference client's default.
pub const DEFAULT_CAPACITY: usize = 16;

/// Whether a request was submitted on the controller's behalf
/// (user-visible) or internally by the session itself (e.g. a
/// staleness-driven refresh poll).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    Internal,
    UserVisible,
}

/// The outcome delivered when a pending request is resolved.
#[derive(Debug)]
pub enum RequestOutcome<T> {
    Ok(T),
    Err(ConmonError),
    TimedOut,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    class: RequestClass,
    user_context: u64,
    submitted_at: Instant,
    deadline: Option<Instant>,
}

/// A fixed-capacity table of pending requests, keyed by an opaque id
/// correlated to the wire-level [`RequestId`] via its packed
/// `(generation, index)` encoding.
pub struct RequestTable {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
}

/// A request that reached its deadline without a reply.
#[derive(Debug, Clone, Copy)]
pub struct TimedOutRequest {
    pub id: RequestId,
    pub class: RequestClass,
    pub user_context: u64,
}

impl RequestTable {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            free: (0..capacity).rev().collect(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Allocate a slot, failing with `OutOfRequests` if the pool is
    /// exhausted. No side effects occur on failure.
    pub fn submit(
        &mut self,
        class: RequestClass,
        user_context: u64,
        timeout: Option<Duration>,
        now: Instant,
    ) -> Result<RequestId, ConmonError> {
        let index = self.free.pop().ok_or(ConmonError::OutOfRequests)?;
        let generation = self.slots[index].map_or(1, |s| s.generation.wrapping_add(1)).max(1);
        self.slots[index] = Some(Slot {
            generation,
            class,
            user_context,
            submitted_at: now,
            deadline: timeout.map(|t| now + t),
        });
        Ok(pack(index, generation))
    }

    /// Resolve a pending request with a reply result, freeing its slot.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<(), ConmonError>,
    ) -> Result<(RequestClass, u64, RequestOutcome<()>), ConmonError> {
        let (index, generation) = unpack(id);
        let slot = self.take(index, generation)?;
        let outcome = match result {
            Ok(()) => RequestOutcome::Ok(()),
            Err(err) => RequestOutcome::Err(err),
        };
        Ok((slot.class, slot.user_context, outcome))
    }

    /// Free a slot without reporting completion to any caller and without
    /// informing the server. Idempotent: an id that is already free is a
    /// no-op returning `Ok(())`.
    pub fn cancel(&mut self, id: RequestId) -> Result<(), ConmonError> {
        let (index, generation) = unpack(id);
        if index >= self.slots.len() {
            return Err(ConmonError::InvalidHandle);
        }
        match self.slots[index] {
            Some(slot) if slot.generation == generation => {
                self.slots[index] = None;
                self.free.push(index);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Cancel every pending request without firing completions, e.g. when
    /// the owning session is closed.
    pub fn cancel_all(&mut self) {
        for index in 0..self.slots.len() {
            if self.slots[index].take().is_some() {
                self.free.push(index);
            }
        }
    }

    /// Free every slot whose deadline has passed, returning them for the
    /// caller to complete with `TimedOut`.
    pub fn tick(&mut self, now: Instant) -> Vec<TimedOutRequest> {
        let mut expired = Vec::new();
        for index in 0..self.slots.len() {
            let Some(slot) = self.slots[index] else { continue };
            let Some(deadline) = slot.deadline else { continue };
            if now >= deadline {
                expired.push(TimedOutRequest {
                    id: pack(index, slot.generation),
                    class: slot.class,
                    user_context: slot.user_context,
                });
                self.slots[index] = None;
                self.free.push(index);
            }
        }
        expired
    }

    fn take(&mut self, index: usize, generation: u32) -> Result<Slot, ConmonError> {
        if index >= self.slots.len() {
            return Err(ConmonError::InvalidHandle);
        }
        match self.slots[index] {
            Some(slot) if slot.generation == generation => {
                self.slots[index] = None;
                self.free.push(index);
                Ok(slot)
            }
            _ => Err(ConmonError::InvalidHandle),
        }
    }
}

fn pack(index: usize, generation: u32) -> RequestId {
    RequestId(((generation & 0xFFFF) << 16) | (index as u32 & 0xFFFF))
}

fn unpack(id: RequestId) -> (usize, u32) {
    ((id.0 & 0xFFFF) as usize, id.0 >> 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_and_complete_returns_context() {
        let mut table = RequestTable::new(2);
        let now = Instant::now();
        let id = table.submit(RequestClass::UserVisible, 99, None, now).unwrap();
        let (class, ctx, outcome) = table.complete(id, Ok(())).unwrap();
        assert_eq!(class, RequestClass::UserVisible);
        assert_eq!(ctx, 99);
        assert!(matches!(outcome, RequestOutcome::Ok(())));
    }

    #[test]
    fn exhausted_pool_returns_out_of_requests_without_side_effects() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        table.submit(RequestClass::Internal, 0, None, now).unwrap();
        assert!(matches!(
            table.submit(RequestClass::Internal, 0, None, now),
            Err(ConmonError::OutOfRequests)
        ));
        assert_eq!(table.pending_count(), 1);
    }

    #[test]
    fn cancel_then_complete_is_invalid_handle() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        let id = table.submit(RequestClass::Internal, 0, None, now).unwrap();
        table.cancel(id).unwrap();
        assert!(matches!(
            table.complete(id, Ok(())),
            Err(ConmonError::InvalidHandle)
        ));
    }

    #[test]
    fn cancel_on_already_free_id_is_a_no_op() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        let id = table.submit(RequestClass::Internal, 0, None, now).unwrap();
        table.cancel(id).unwrap();
        assert!(table.cancel(id).is_ok());
    }

    #[test]
    fn generation_bump_prevents_stale_id_reuse() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        let first = table.submit(RequestClass::Internal, 1, None, now).unwrap();
        table.complete(first, Ok(())).unwrap();
        let second = table.submit(RequestClass::Internal, 2, None, now).unwrap();
        assert_ne!(first, second);
        assert!(matches!(
            table.complete(first, Ok(())),
            Err(ConmonError::InvalidHandle)
        ));
    }

    #[test]
    fn tick_expires_past_deadline_requests() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        table
            .submit(RequestClass::UserVisible, 7, Some(Duration::from_millis(10)), now)
            .unwrap();
        assert!(table.tick(now).is_empty());
        let expired = table.tick(now + Duration::from_millis(11));
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].user_context, 7);
        assert_eq!(table.pending_count(), 0);
    }

    #[test]
    fn id_is_never_observed_live_after_completion() {
        let mut table = RequestTable::new(1);
        let now = Instant::now();
        let id = table.submit(RequestClass::Internal, 0, None, now).unwrap();
        table.complete(id, Ok(())).unwrap();
        assert!(matches!(
            table.complete(id, Ok(())),
            Err(ConmonError::InvalidHandle)
        ));
    }
}
