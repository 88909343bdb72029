//! Throwable catalog and spawner
//!
//! One record type for every projectile; per-kind behaviour lives in the
//! `match` tables on [`ThrowableKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RngPolicy;
use crate::consts::{LEVELS_PER_TIER, SPAWN_POP_FORCE};

/// Physics category bitmasks shared with the physics layer
pub mod categories {
    pub const EVIL_MONKEY: u32 = 1 << 0;
    pub const EDGE_BODY: u32 = 1 << 1;
    pub const BASKET_MAN: u32 = 1 << 2;
    pub const GROUND: u32 = 1 << 3;
    pub const BANANA: u32 = 1 << 4;
    pub const BANANA_CLUSTER: u32 = 1 << 5;
    pub const COCONUT: u32 = 1 << 6;
    pub const BANANANUT: u32 = 1 << 7;
    pub const HEARTNUT: u32 = 1 << 8;
    pub const SUPERNUT: u32 = 1 << 9;
    pub const HEART: u32 = 1 << 10;
    pub const GREENMUSH: u32 = 1 << 11;
    pub const PURPLEMUSH: u32 = 1 << 12;
}

/// Every projectile the monkey (or a broken nut) can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThrowableKind {
    Banana,
    BananaCluster,
    Coconut,
    Banananut,
    Heartnut,
    Supernut,
    Heart,
    Greenmush,
    Purplemush,
}

impl ThrowableKind {
    pub const ALL: [ThrowableKind; 9] = [
        ThrowableKind::Banana,
        ThrowableKind::BananaCluster,
        ThrowableKind::Coconut,
        ThrowableKind::Banananut,
        ThrowableKind::Heartnut,
        ThrowableKind::Supernut,
        ThrowableKind::Heart,
        ThrowableKind::Greenmush,
        ThrowableKind::Purplemush,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThrowableKind::Banana => "banana",
            ThrowableKind::BananaCluster => "banana cluster",
            ThrowableKind::Coconut => "coconut",
            ThrowableKind::Banananut => "banananut",
            ThrowableKind::Heartnut => "heartnut",
            ThrowableKind::Supernut => "supernut",
            ThrowableKind::Heart => "heart",
            ThrowableKind::Greenmush => "green mushroom",
            ThrowableKind::Purplemush => "purple mushroom",
        }
    }

    /// Vertical impulse applied when thrown by the monkey
    pub fn throw_force(self) -> f32 {
        match self {
            ThrowableKind::Banana => 10.0,
            ThrowableKind::BananaCluster => 14.0,
            ThrowableKind::Coconut => 12.0,
            ThrowableKind::Banananut | ThrowableKind::Heartnut => 13.0,
            ThrowableKind::Supernut => 18.0,
            ThrowableKind::Heart => 8.0,
            ThrowableKind::Greenmush | ThrowableKind::Purplemush => 9.0,
        }
    }

    pub fn category(self) -> u32 {
        use categories::*;
        match self {
            ThrowableKind::Banana => BANANA,
            ThrowableKind::BananaCluster => BANANA_CLUSTER,
            ThrowableKind::Coconut => COCONUT,
            ThrowableKind::Banananut => BANANANUT,
            ThrowableKind::Heartnut => HEARTNUT,
            ThrowableKind::Supernut => SUPERNUT,
            ThrowableKind::Heart => HEART,
            ThrowableKind::Greenmush => GREENMUSH,
            ThrowableKind::Purplemush => PURPLEMUSH,
        }
    }

    /// Reverse of [`ThrowableKind::category`]; `None` for non-throwable bits
    pub fn from_category(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.category() == bits)
    }

    /// Nuts break on the ground and may release something
    pub fn is_nut(self) -> bool {
        matches!(
            self,
            ThrowableKind::Banananut | ThrowableKind::Heartnut | ThrowableKind::Supernut
        )
    }

    /// Costs a life when caught
    pub fn is_hazard(self) -> bool {
        self == ThrowableKind::Coconut || self.is_nut()
    }
}

/// One airborne projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Throwable {
    pub id: u32,
    pub kind: ThrowableKind,
    pub position: Vec2,
    /// Impulse handed to the physics layer on creation
    pub initial_force: Vec2,
}

/// Builds throwables with stable, increasing ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// A projectile thrown by the monkey from `origin`
    pub fn throw_from(&mut self, kind: ThrowableKind, origin: Vec2) -> Throwable {
        Throwable {
            id: self.next_id(),
            kind,
            position: origin,
            initial_force: Vec2::new(0.0, kind.throw_force()),
        }
    }

    /// A secondary item released at `position` (e.g. from a broken nut)
    pub fn spawn_at(&mut self, kind: ThrowableKind, position: Vec2) -> Throwable {
        Throwable {
            id: self.next_id(),
            kind,
            position,
            initial_force: Vec2::new(0.0, SPAWN_POP_FORCE),
        }
    }
}

/// Coconuts released by a supernut at the given difficulty
pub fn supernut_spawn_count(current_level: u32) -> u32 {
    (current_level / LEVELS_PER_TIER).max(1)
}

/// Upgrade the monkey's banana/coconut pick to a fancier variant at higher levels
pub fn escalate(
    base: ThrowableKind,
    current_level: u32,
    rng: &mut impl RngPolicy,
) -> ThrowableKind {
    match base {
        ThrowableKind::Banana => {
            if current_level >= 6 && rng.one_in(20) {
                if rng.one_in(2) {
                    ThrowableKind::Greenmush
                } else {
                    ThrowableKind::Purplemush
                }
            } else if current_level >= 2 && rng.one_in(5) {
                ThrowableKind::BananaCluster
            } else {
                ThrowableKind::Banana
            }
        }
        ThrowableKind::Coconut => {
            if current_level >= 5 && rng.one_in(6) {
                ThrowableKind::Supernut
            } else if current_level >= 4 && rng.one_in(4) {
                if rng.one_in(3) {
                    ThrowableKind::Heartnut
                } else {
                    ThrowableKind::Banananut
                }
            } else {
                ThrowableKind::Coconut
            }
        }
        other => other,
    }
}
