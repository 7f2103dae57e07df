// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ties the request table and subscription table together into the
//! session a host embeds: submit operations, feed it incoming frames,
//! drain the events it raised.

use crate::request::{RequestClass, RequestOutcome, RequestTable, DEFAULT_CAPACITY};
use crate::subscription::{ChannelType, SubAck, SubscriptionTable, SubscriptionTarget};
use conmon_support::ConmonError;
use conmon_wire::RequestId;
use std::time::{Duration, Instant};

/// Events a [`ConmonSession`] raises while processing frames. Delivered
/// synchronously within [`ConmonSession::process_timeouts`] or the
/// frame-handling entry points; never queued across calls.
#[derive(Debug)]
pub enum ConmonEvent {
    RequestCompleted {
        user_context: u64,
        outcome: RequestOutcome<()>,
    },
    SubscriptionChanged {
        channel_type: ChannelType,
        target: SubscriptionTarget,
    },
}

/// Receives events raised during a session's `process` step. Implementors
/// MUST NOT call back into the session's mutating operations from within
/// a callback; submitting new requests is fine, they are simply enqueued.
pub trait ConmonListener {
    fn on_event(&mut self, event: ConmonEvent);
}

/// A control-monitoring session: request accounting plus the
/// subscription lifecycle, both scoped to one connection to the local
/// daemon.
pub struct ConmonSession {
    requests: RequestTable,
    subscriptions: SubscriptionTable,
    sequence: u16,
}

impl ConmonSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Build a session with a non-default request pool size. Per the
    /// pool's contract this is only meaningful before the session starts
    /// submitting requests.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            requests: RequestTable::new(capacity),
            subscriptions: SubscriptionTable::new(),
            sequence: 0,
        }
    }

    fn next_sequence(&mut self) -> u16 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    /// Submit a user-visible request, returning the id the caller should
    /// correlate the eventual [`ConmonEvent::RequestCompleted`] against
    /// via `user_context`.
    pub fn submit_request(
        &mut self,
        user_context: u64,
        timeout: Option<Duration>,
        now: Instant,
    ) -> Result<(RequestId, u16), ConmonError> {
        let id = self
            .requests
            .submit(RequestClass::UserVisible, user_context, timeout, now)?;
        Ok((id, self.next_sequence()))
    }

    /// A reply frame arrived carrying this request id.
    pub fn complete_request(
        &mut self,
        id: RequestId,
        result: Result<(), ConmonError>,
        listener: &mut impl ConmonListener,
    ) -> Result<(), ConmonError> {
        let (_, user_context, outcome) = self.requests.complete(id, result)?;
        listener.on_event(ConmonEvent::RequestCompleted { user_context, outcome });
        Ok(())
    }

    pub fn cancel_request(&mut self, id: RequestId) -> Result<(), ConmonError> {
        self.requests.cancel(id)
    }

    /// Fire `TimedOut` completions for every request past its deadline.
    pub fn process_timeouts(&mut self, now: Instant, listener: &mut impl ConmonListener) {
        for expired in self.requests.tick(now) {
            listener.on_event(ConmonEvent::RequestCompleted {
                user_context: expired.user_context,
                outcome: RequestOutcome::TimedOut,
            });
        }
    }

    /// Request a named-channel subscription. Returns `false` if this
    /// coalesced with an already in-flight subscribe to the same target.
    pub fn subscribe(&mut self, channel_type: ChannelType, raw_target: &str) -> Result<bool, ConmonError> {
        let target = SubscriptionTarget::parse(raw_target)?;
        Ok(self.subscriptions.subscribe(channel_type, target))
    }

    pub fn unsubscribe(&mut self, channel_type: ChannelType, raw_target: &str) -> Result<(), ConmonError> {
        let target = SubscriptionTarget::parse(raw_target)?;
        self.subscriptions.unsubscribe(channel_type, &target);
        Ok(())
    }

    /// Apply a server acknowledgement to a subscription and notify the
    /// listener that its record changed.
    pub fn apply_subscription_ack(
        &mut self,
        channel_type: ChannelType,
        raw_target: &str,
        event: SubAck,
        listener: &mut impl ConmonListener,
    ) -> Result<(), ConmonError> {
        let target = SubscriptionTarget::parse(raw_target)?;
        self.subscriptions.apply_ack(channel_type, &target, event);
        listener.on_event(ConmonEvent::SubscriptionChanged { channel_type, target });
        Ok(())
    }

    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionTable {
        &self.subscriptions
    }

    #[must_use]
    pub fn pending_request_count(&self) -> usize {
        self.requests.pending_count()
    }
}

impl Default for ConmonSession {
    fn default() -> Self {
        Self::new()
    }
}
