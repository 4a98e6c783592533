//! # Packet Type Registry
//!
//! Maps 16-bit type codes to payload codecs.
//!
//! The registry is the single runtime source of truth for which codes decode
//! to which shapes; type codes are not guaranteed unique across game
//! versions, so nothing else may hard-wire a code to a layout. It is built
//! once at startup from the compiled-in table and handed to the dissector
//! explicitly; there is no process-wide global and nothing mutates it after
//! construction, which is what lets one dissection run per socket read
//! without any locking.
//!
//! Registration is first-wins: a later `register` for an already-known code
//! is silently ignored. That guards a canonical decoder against accidental
//! re-registration. Lookup misses are not errors; unknown codes fall back to
//! opaque decoding in the framer.

use std::collections::HashMap;

use crate::core::codec::PacketKind;

/// Known packet type codes, as observed on the wire.
pub mod codes {
    pub const BEACON: u16 = 0x1703;
    pub const SHOOT: u16 = 0x2a69;
    pub const SELL: u16 = 0x2473;
    pub const HP_MODIFY: u16 = 0x2b2b;
    pub const NEW_INVENTORY_ITEM: u16 = 0x6370;
    pub const ITEM_PICKUP: u16 = 0x6565;
    pub const BURST: u16 = 0x6672;
    pub const FAST_TRAVEL: u16 = 0x6674;
    pub const JUMP: u16 = 0x6a70;
    pub const SHOOT_SERVER: u16 = 0x6c61;
    pub const NEW_ELEMENT: u16 = 0x6d6b;
    pub const POSITION: u16 = 0x6d76;
    pub const EXCHANGE: u16 = 0x726d;
    pub const RELOAD: u16 = 0x726c;
    pub const CHANGE_TOOL: u16 = 0x733d;
    pub const PLAYER_STATE: u16 = 0x7374;
    pub const ATTACK_STATE: u16 = 0x7472;
    pub const ENEMY_POSITION: u16 = 0x7073;
    pub const REMOVE_ELEMENT: u16 = 0x7878;
}

/// The compiled-in association table for the game build this relay targets.
const STANDARD_TABLE: &[(u16, PacketKind)] = &[
    (codes::NEW_ELEMENT, PacketKind::NewElement),
    (codes::POSITION, PacketKind::Position),
    (codes::ENEMY_POSITION, PacketKind::EnemyPosition),
    (codes::FAST_TRAVEL, PacketKind::FastTravel),
    (codes::BEACON, PacketKind::Beacon),
    (codes::JUMP, PacketKind::Jump),
    (codes::CHANGE_TOOL, PacketKind::ChangeTool),
    (codes::RELOAD, PacketKind::Reload),
    (codes::SHOOT, PacketKind::Shoot),
    (codes::BURST, PacketKind::Burst),
    (codes::SHOOT_SERVER, PacketKind::ShootServer),
    (codes::HP_MODIFY, PacketKind::HpModify),
    (codes::SELL, PacketKind::Sell),
    (codes::EXCHANGE, PacketKind::Exchange),
    (codes::PLAYER_STATE, PacketKind::PlayerState),
    (codes::ATTACK_STATE, PacketKind::AttackState),
    (codes::ITEM_PICKUP, PacketKind::ItemPickup),
    (codes::REMOVE_ELEMENT, PacketKind::RemoveElement),
    (codes::NEW_INVENTORY_ITEM, PacketKind::NewInventoryItem),
];

/// Type-code to codec registry. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<u16, PacketKind>,
}

impl Registry {
    /// An empty registry; every lookup misses and everything decodes opaque.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The registry for the standard compiled-in table.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for &(code, kind) in STANDARD_TABLE {
            registry.register(code, kind);
        }
        registry
    }

    /// Associate `kind` with `code` unless `code` is already registered.
    ///
    /// Returns whether the entry was inserted.
    pub fn register(&mut self, code: u16, kind: PacketKind) -> bool {
        use std::collections::hash_map::Entry;
        match self.entries.entry(code) {
            Entry::Vacant(slot) => {
                slot.insert(kind);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Codec kind registered for `code`, if any. A miss is a valid outcome.
    pub fn lookup(&self, code: u16) -> Option<PacketKind> {
        self.entries.get(&code).copied()
    }

    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
