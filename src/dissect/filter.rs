//! # Display Filters
//!
//! Predicate over dissected packets for the observation front end.
//!
//! Filtering decides what gets *shown*, never what gets framed or forwarded:
//! a frame that fails the predicate still advances the dissector's cursor
//! and its bytes still relay to the peer.

use std::collections::HashSet;

use crate::core::registry::{codes, Registry};

/// Which predicate a [`PacketFilter`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Show only type codes the registry does not know.
    UnknownOnly,
    /// Show only codes on the allow list.
    Allow,
    /// Show everything except codes on the deny list.
    Deny,
}

/// Display filter over packet type codes.
#[derive(Debug, Clone)]
pub struct PacketFilter {
    mode: FilterMode,
    allow: HashSet<u16>,
    deny: HashSet<u16>,
}

impl PacketFilter {
    /// Show only packets whose type code is not registered.
    pub fn unknown_only() -> Self {
        Self {
            mode: FilterMode::UnknownOnly,
            allow: HashSet::new(),
            deny: HashSet::new(),
        }
    }

    /// Show only the given type codes.
    pub fn allow(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            mode: FilterMode::Allow,
            allow: codes.into_iter().collect(),
            deny: HashSet::new(),
        }
    }

    /// Hide the given type codes, show everything else.
    pub fn deny(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            mode: FilterMode::Deny,
            allow: HashSet::new(),
            deny: codes.into_iter().collect(),
        }
    }

    /// The stock deny list: movement and keep-alive chatter that floods the
    /// log (position, beacon, enemy position, jump).
    pub fn default_deny() -> Self {
        Self::deny([
            codes::POSITION,
            codes::BEACON,
            codes::ENEMY_POSITION,
            codes::JUMP,
        ])
    }

    /// The stock allow list: inventory traffic only.
    pub fn default_allow() -> Self {
        Self::allow([codes::ITEM_PICKUP, codes::NEW_INVENTORY_ITEM])
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Whether a packet with `code` should be yielded for display.
    pub fn matches(&self, registry: &Registry, code: u16) -> bool {
        match self.mode {
            FilterMode::UnknownOnly => !registry.contains(code),
            FilterMode::Allow => self.allow.contains(&code),
            FilterMode::Deny => !self.deny.contains(&code),
        }
    }
}
