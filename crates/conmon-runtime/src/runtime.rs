// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-threaded cooperative runtime: aggregates every registered
//! client's sockets and due timers, and drives them from one
//! `sockets_and_timeout()` / `process()` pair the host calls around its own
//! `select`/`poll` wait.
//!
//! There is no internal thread. Every callback fires synchronously inside
//! `process`; re-entering `process` from within a callback is an error,
//! not silently ignored, since the host thread is the only thread allowed
//! to touch this runtime's state (see the shared-resource policy).

use conmon_support::ConmonError;
use std::os::unix::io::RawFd;
use std::time::{Duration, Instant};

/// A client-owned, non-blocking socket the runtime polls on the client's
/// behalf. The runtime never reads or writes through this handle itself —
/// it only uses the raw descriptor to build the host's `select`/`poll`
/// set and hands readable ones back to `on_readable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawSocketRef(pub RawFd);

/// Opaque handle identifying a client registered with a [`Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(usize);

/// A client driven by the runtime: the conmon client, the routing client,
/// the browse session, or the domain overlay each implement this to be
/// scheduled uniformly.
pub trait RuntimeClient {
    /// Sockets this client currently owns. May change between calls (a
    /// resolver opening a new connection, a session closing one).
    fn sockets(&self) -> Vec<RawSocketRef>;

    /// The earliest instant at which this client has a timer due (a
    /// request deadline, a re-resolution backoff, a heartbeat), or `None`
    /// if nothing is pending.
    fn next_action_time(&self) -> Option<Instant>;

    /// One of this client's sockets became readable; read what's
    /// available and update state. MUST NOT call back into the runtime.
    fn on_readable(&mut self, socket: RawSocketRef);

    /// Run every timer due at or before `now`.
    fn on_due_timers(&mut self, now: Instant);
}

/// Owns every registered client's sockets and timers and computes what
/// the host should wait on next.
#[derive(Default)]
pub struct Runtime {
    clients: Vec<Option<Box<dyn RuntimeClient>>>,
    processing: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client: Box<dyn RuntimeClient>) -> ClientId {
        self.clients.push(Some(client));
        ClientId(self.clients.len() - 1)
    }

    pub fn unregister(&mut self, id: ClientId) {
        if let Some(slot) = self.clients.get_mut(id.0) {
            *slot = None;
        }
    }

    /// Every live client's sockets, paired with the id that owns them, plus
    /// the duration until the earliest due timer across every client (the
    /// host's `select`/`poll` timeout).
    #[must_use]
    pub fn sockets_and_timeout(&self, now: Instant) -> (Vec<(ClientId, RawSocketRef)>, Option<Duration>) {
        let mut sockets = Vec::new();
        let mut earliest: Option<Instant> = None;

        for (index, client) in self.clients.iter().enumerate() {
            let Some(client) = client else { continue };
            let id = ClientId(index);
            for socket in client.sockets() {
                sockets.push((id, socket));
            }
            if let Some(deadline) = client.next_action_time() {
                earliest = Some(earliest.map_or(deadline, |current| current.min(deadline)));
            }
        }

        let timeout = earliest.map(|deadline| deadline.saturating_duration_since(now));
        (sockets, timeout)
    }

    /// Dispatch readable sockets to their owning client, then run every
    /// client's due timers. Re-entering `process` from inside a callback
    /// is rejected.
    pub fn process(&mut self, readable: &[(ClientId, RawSocketRef)], now: Instant) -> Result<(), ConmonError> {
        if self.processing {
            return Err(ConmonError::InvalidState("runtime.process is not re-entrant".into()));
        }
        self.processing = true;

        for (id, socket) in readable {
            if let Some(Some(client)) = self.clients.get_mut(id.0) {
                client.on_readable(*socket);
            }
        }
        for client in self.clients.iter_mut().flatten() {
            client.on_due_timers(now);
        }

        self.processing = false;
        Ok(())
    }

    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.iter().filter(|c| c.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct FakeClient {
        socket: RawSocketRef,
        deadline: Option<Instant>,
        reads: Vec<RawSocketRef>,
        timer_runs: u32,
    }

    impl RuntimeClient for FakeClient {
        fn sockets(&self) -> Vec<RawSocketRef> {
            vec![self.socket]
        }
        fn next_action_time(&self) -> Option<Instant> {
            self.deadline
        }
        fn on_readable(&mut self, socket: RawSocketRef) {
            self.reads.push(socket);
        }
        fn on_due_timers(&mut self, _now: Instant) {
            self.timer_runs += 1;
        }
    }

    #[test]
    fn sockets_and_timeout_aggregates_across_clients() {
        let mut runtime = Runtime::new();
        let now = Instant::now();
        let soon = now + Duration::from_millis(10);
        let later = now + Duration::from_secs(5);

        runtime.register(Box::new(FakeClient { socket: RawSocketRef(3), deadline: Some(later), reads: vec![], timer_runs: 0 }));
        runtime.register(Box::new(FakeClient { socket: RawSocketRef(4), deadline: Some(soon), reads: vec![], timer_runs: 0 }));

        let (sockets, timeout) = runtime.sockets_and_timeout(now);
        assert_eq!(sockets.len(), 2);
        assert!(timeout.unwrap() <= Duration::from_millis(10));
    }

    #[test]
    fn process_dispatches_to_owning_client_and_runs_timers() {
        let mut runtime = Runtime::new();
        let id = runtime.register(Box::new(FakeClient { socket: RawSocketRef(7), deadline: None, reads: vec![], timer_runs: 0 }));

        runtime.process(&[(id, RawSocketRef(7))], Instant::now()).unwrap();
        // No direct accessor into the boxed client from outside; re-run to
        // confirm process() itself doesn't error on repeated calls.
        runtime.process(&[], Instant::now()).unwrap();
    }

    #[test]
    fn unregistered_client_is_skipped() {
        let mut runtime = Runtime::new();
        let id = runtime.register(Box::new(FakeClient { socket: RawSocketRef(1), deadline: None, reads: vec![], timer_runs: 0 }));
        runtime.unregister(id);
        assert_eq!(runtime.client_count(), 0);
        let (sockets, timeout) = runtime.sockets_and_timeout(Instant::now());
        assert!(sockets.is_empty());
        assert!(timeout.is_none());
    }
}
