//! Contact resolution
//!
//! Turns a (throwable kind, surface) contact into score, life and player
//! effects plus any secondary spawns. [`resolve`] is pure: everything it reads
//! arrives through [`ResolveContext`], so it can be tested without a world.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::throwable::{ThrowableKind, categories, supernut_spawn_count};
use crate::consts::{BROKEN_NUT_LIFT, POPUP_LIFT, SPLAT_LIFT};
use crate::error::{SimError, SimResult};
use crate::tuning::PointTable;

/// What a throwable touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Player,
    Ground,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Player => write!(f, "the basket man"),
            Surface::Ground => write!(f, "the ground"),
        }
    }
}

/// A contact detected by the physics layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactReport {
    pub throwable_id: u32,
    pub surface: Surface,
    /// Throwable position at the moment of contact
    pub position: Vec2,
}

/// Map a pair of physics category bitmasks to the throwable kind and surface
///
/// Either body may be the throwable. Pairs that are not exactly one throwable
/// against the player or ground are unexpected.
pub fn classify_contact(category_a: u32, category_b: u32) -> SimResult<(ThrowableKind, Surface)> {
    let surface_of = |bits: u32| match bits {
        categories::BASKET_MAN => Some(Surface::Player),
        categories::GROUND => Some(Surface::Ground),
        _ => None,
    };

    let pair = match (
        ThrowableKind::from_category(category_a),
        ThrowableKind::from_category(category_b),
    ) {
        (Some(kind), None) => surface_of(category_b).map(|s| (kind, s)),
        (None, Some(kind)) => surface_of(category_a).map(|s| (kind, s)),
        _ => None,
    };

    pair.ok_or(SimError::UnexpectedContact {
        category_a,
        category_b,
    })
}

/// Game state the resolver depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveContext {
    pub current_level: u32,
    pub player_dead: bool,
    pub player_invincible: bool,
    pub ground_level: f32,
    pub position: Vec2,
}

/// How the player reacts visually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerReaction {
    Collect,
    Ouch,
    LifeUp,
    Frown,
    GoGreen,
    GoPurple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeEffect {
    None,
    Gain,
    Lose,
}

/// Ground decoration left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    BananaSplat,
    BananaClusterSplat,
    Brokenut,
    Superbroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: Vec2,
}

/// How the throwable leaves the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    Immediate,
    FadeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub kind: ThrowableKind,
    pub position: Vec2,
}

/// Floating points label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsPopup {
    pub points: i64,
    pub position: Vec2,
}

/// Everything a single contact changes
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Score change; `None` when the contact scores nothing (not even zero)
    pub points: Option<i64>,
    pub popup: Option<PointsPopup>,
    pub life: LifeEffect,
    pub reaction: Option<PlayerReaction>,
    /// A successful banana catch feeds the monkey's rage
    pub enrage: bool,
    pub spawns: Vec<SpawnRequest>,
    pub decoration: Option<Decoration>,
    pub removal: Removal,
}

impl Resolution {
    /// Contact is swallowed: the throwable just disappears
    fn vanish() -> Self {
        Self {
            points: None,
            popup: None,
            life: LifeEffect::None,
            reaction: None,
            enrage: false,
            spawns: Vec::new(),
            decoration: None,
            removal: Removal::Immediate,
        }
    }

    fn scored(points: i64, at: Vec2) -> Self {
        Self {
            points: Some(points),
            popup: Some(PointsPopup {
                points,
                position: at,
            }),
            ..Self::vanish()
        }
    }
}

/// Resolve a contact
pub fn resolve(
    kind: ThrowableKind,
    surface: Surface,
    ctx: &ResolveContext,
    points: &PointTable,
) -> Resolution {
    match surface {
        Surface::Player => resolve_player_hit(kind, ctx, points),
        Surface::Ground => resolve_ground_hit(kind, ctx, points),
    }
}

fn resolve_player_hit(
    kind: ThrowableKind,
    ctx: &ResolveContext,
    points: &PointTable,
) -> Resolution {
    let pos = ctx.position;

    match kind {
        ThrowableKind::Banana => banana_hits_player(ctx, points.banana_caught),
        ThrowableKind::BananaCluster => banana_hits_player(ctx, points.banana_cluster_caught),
        ThrowableKind::Coconut | ThrowableKind::Banananut | ThrowableKind::Heartnut => {
            hazard_hits_player(ctx, points.coconut_caught)
        }
        ThrowableKind::Supernut => hazard_hits_player(ctx, points.supernut_caught),
        ThrowableKind::Heart => Resolution {
            life: LifeEffect::Gain,
            reaction: Some(PlayerReaction::LifeUp),
            ..Resolution::scored(points.heart_caught, pos)
        },
        ThrowableKind::Greenmush => Resolution {
            reaction: Some(PlayerReaction::GoGreen),
            ..Resolution::scored(points.mush_caught, pos)
        },
        ThrowableKind::Purplemush => Resolution {
            reaction: Some(PlayerReaction::GoPurple),
            ..Resolution::scored(points.mush_caught, pos)
        },
    }
}

fn banana_hits_player(ctx: &ResolveContext, points: i64) -> Resolution {
    if ctx.player_dead {
        return Resolution::vanish();
    }
    Resolution {
        reaction: Some(PlayerReaction::Collect),
        enrage: true,
        ..Resolution::scored(points, ctx.position)
    }
}

fn hazard_hits_player(ctx: &ResolveContext, points: i64) -> Resolution {
    if ctx.player_invincible || ctx.player_dead {
        return Resolution::vanish();
    }
    Resolution {
        life: LifeEffect::Lose,
        reaction: Some(PlayerReaction::Ouch),
        ..Resolution::scored(points, ctx.position)
    }
}

fn resolve_ground_hit(
    kind: ThrowableKind,
    ctx: &ResolveContext,
    points: &PointTable,
) -> Resolution {
    let pos = ctx.position;
    let splat_at = Vec2::new(pos.x, ctx.ground_level + SPLAT_LIFT);
    let broken_at = Vec2::new(pos.x, ctx.ground_level + BROKEN_NUT_LIFT);

    match kind {
        ThrowableKind::Banana => banana_hits_ground(
            pos,
            splat_at,
            points.banana_missed,
            DecorationKind::BananaSplat,
        ),
        ThrowableKind::BananaCluster => banana_hits_ground(
            pos,
            splat_at,
            points.banana_cluster_missed,
            DecorationKind::BananaClusterSplat,
        ),
        ThrowableKind::Coconut | ThrowableKind::Banananut | ThrowableKind::Heartnut => {
            let released = match kind {
                ThrowableKind::Banananut => Some(ThrowableKind::Banana),
                ThrowableKind::Heartnut => Some(ThrowableKind::Heart),
                _ => None,
            };
            Resolution {
                spawns: released
                    .map(|kind| SpawnRequest {
                        kind,
                        position: broken_at,
                    })
                    .into_iter()
                    .collect(),
                decoration: Some(Decoration {
                    kind: DecorationKind::Brokenut,
                    position: broken_at,
                }),
                ..Resolution::vanish()
            }
        }
        ThrowableKind::Supernut => {
            let count = supernut_spawn_count(ctx.current_level);
            Resolution {
                spawns: (0..count)
                    .map(|_| SpawnRequest {
                        kind: ThrowableKind::Coconut,
                        position: broken_at,
                    })
                    .collect(),
                decoration: Some(Decoration {
                    kind: DecorationKind::Superbroke,
                    position: broken_at,
                }),
                ..Resolution::vanish()
            }
        }
        ThrowableKind::Heart | ThrowableKind::Greenmush | ThrowableKind::Purplemush => Resolution {
            removal: Removal::FadeOut,
            ..Resolution::vanish()
        },
    }
}

fn banana_hits_ground(pos: Vec2, splat_at: Vec2, points: i64, splat: DecorationKind) -> Resolution {
    Resolution {
        points: Some(points),
        popup: Some(PointsPopup {
            points,
            position: Vec2::new(pos.x, pos.y + POPUP_LIFT),
        }),
        reaction: Some(PlayerReaction::Frown),
        decoration: Some(Decoration {
            kind: splat,
            position: splat_at,
        }),
        ..Resolution::vanish()
    }
}
