// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain overlay: discovery, identification, authentication, and
//! current-domain selection against a managed controller. Gates every
//! browse/routing operation onto whichever domain is currently selected.

use conmon_support::ConmonError;

/// The overlay's connection state. Forward transitions per the protocol's
/// event table; `error` is reachable from any state except `disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Disabled,
    Discovering,
    Disconnected,
    Identifying,
    Identified,
    Connecting,
    Connected,
    Error,
}

/// Events the overlay's state machine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    StartDiscovery,
    SetManualAddress,
    ManagerFound,
    DiscoveryTimeout,
    Identify,
    IdentityReceived,
    Connect { username: String, password: String },
    AuthOk,
    AuthFail,
    Disconnect,
    FatalError,
}

/// A domain the authenticated principal may enter, exposed only while
/// `connected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub id: u16,
    pub role: String,
    pub access_summary: String,
    pub clock_subdomain_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayNotification {
    StateChanged(OverlayState),
    DomainChanging,
    DomainChanged { domain_id: u16 },
}

pub trait DomainListener {
    fn on_event(&mut self, event: OverlayNotification);
}

impl<F: FnMut(OverlayNotification)> DomainListener for F {
    fn on_event(&mut self, event: OverlayNotification) {
        self(event);
    }
}

pub struct DomainOverlay {
    state: OverlayState,
    last_auth_failed: bool,
    domains: Vec<DomainDescriptor>,
    current_domain: Option<u16>,
}

impl Default for DomainOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: OverlayState::Disabled,
            last_auth_failed: false,
            domains: Vec::new(),
            current_domain: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub fn last_auth_failed(&self) -> bool {
        self.last_auth_failed
    }

    /// Events fire strictly in state-transition order: every call to this
    /// method that produces a new state notifies the listener before
    /// returning.
    pub fn dispatch(&mut self, event: OverlayEvent, listener: &mut impl DomainListener) -> Result<(), ConmonError> {
        use OverlayEvent as E;
        use OverlayState as S;

        let next = match (self.state, &event) {
            (S::Disabled, E::StartDiscovery) => S::Discovering,
            (S::Disabled, E::SetManualAddress) => S::Disconnected,
            (S::Discovering, E::ManagerFound) => S::Disconnected,
            (S::Discovering, E::DiscoveryTimeout) => S::Disabled,
            (S::Disconnected, E::Identify) => S::Identifying,
            (S::Identifying, E::IdentityReceived) => S::Identified,
            (S::Identified, E::Connect { .. }) => S::Connecting,
            (S::Disconnected, E::Connect { .. }) => S::Connecting,
            (S::Connecting, E::AuthOk) => S::Connected,
            (S::Connecting, E::AuthFail) => {
                self.last_auth_failed = true;
                S::Disconnected
            }
            (S::Connected, E::Disconnect) => {
                self.domains.clear();
                self.current_domain = None;
                S::Disconnected
            }
            (state, E::FatalError) if state != S::Disabled => S::Error,
            (state, event) => {
                return Err(ConmonError::InvalidState(format!(
                    "domain overlay cannot handle {event:?} in state {state:?}"
                )));
            }
        };

        self.state = next;
        listener.on_event(OverlayNotification::StateChanged(next));
        Ok(())
    }

    /// Replace the set of domains the authenticated principal may enter.
    /// Only meaningful while `connected`.
    pub fn set_available_domains(&mut self, domains: Vec<DomainDescriptor>) -> Result<(), ConmonError> {
        if self.state != OverlayState::Connected {
            return Err(ConmonError::InvalidState("domains are only available while connected".into()));
        }
        self.domains = domains;
        Ok(())
    }

    #[must_use]
    pub fn available_domains(&self) -> &[DomainDescriptor] {
        &self.domains
    }

    #[must_use]
    pub fn current_domain(&self) -> Option<u16> {
        self.current_domain
    }

    /// Select a domain, firing `DomainChanging` then `DomainChanged` to
    /// the listener. Every dependent routing/browse client registered
    /// against this overlay MUST drop cached peer state on
    /// `DomainChanging`.
    pub fn select_domain(&mut self, domain_id: u16, listener: &mut impl DomainListener) -> Result<(), ConmonError> {
        if self.state != OverlayState::Connected {
            return Err(ConmonError::InvalidState("cannot select a domain unless connected".into()));
        }
        if !self.domains.iter().any(|d| d.id == domain_id) {
            return Err(ConmonError::NotFound);
        }
        listener.on_event(OverlayNotification::DomainChanging);
        self.current_domain = Some(domain_id);
        listener.on_event(OverlayNotification::DomainChanged { domain_id });
        Ok(())
    }
}
