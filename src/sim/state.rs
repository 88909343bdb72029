//! Game state and core simulation types
//!
//! All state needed to reproduce a session from its seed lives here.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{ContactReport, ResolveContext, classify_contact};
use super::monkey::Monkey;
use super::rng::SeededRng;
use super::throwable::{Spawner, Throwable, ThrowableKind};
use super::timer::Timers;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player died; contacts still drain but nothing new is thrown
    GameOver,
}

/// Temporary mushroom colouring of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerColor {
    #[default]
    Normal,
    Green,
    Purple,
}

/// Bounded life counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lives {
    count: u8,
    max: u8,
}

impl Lives {
    pub fn new(count: u8, max: u8) -> Self {
        Self {
            count: count.min(max),
            max,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Gain a life (saturates at capacity)
    pub fn up(&mut self) {
        self.count = self.count.saturating_add(1).min(self.max);
    }

    /// Lose a life (saturates at zero)
    pub fn down(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// Score and lives; only contact resolution writes here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub score: i64,
    pub lives: Lives,
}

impl Ledger {
    pub fn new(lives: Lives) -> Self {
        Self { score: 0, lives }
    }

    /// Add (possibly negative) points, returning the new total
    pub fn add_points(&mut self, points: i64) -> i64 {
        self.score += points;
        self.score
    }
}

/// The basket man
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub half_width: f32,
    pub dead: bool,
    pub invincible: bool,
    pub color: PlayerColor,
}

impl Player {
    pub fn new(x: f32, half_width: f32) -> Self {
        Self {
            x,
            half_width,
            dead: false,
            invincible: false,
            color: PlayerColor::Normal,
        }
    }

    /// Step toward `target_x` at a fixed speed, staying inside `[0, bound]`
    pub fn move_toward(&mut self, target_x: f32, bound: f32, speed: f32, dead_zone: f32) {
        if self.dead {
            return;
        }
        let dx = target_x - self.x;
        if dx.abs() > dead_zone {
            self.x += dx.signum() * speed;
        }
        let max_x = (bound - self.half_width).max(self.half_width);
        self.x = self.x.clamp(self.half_width, max_x);
    }
}

/// A queued contact, accepted or already known to be bad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingContact {
    /// Reported by id; the stored throwable decides the kind
    Report(ContactReport),
    /// Classified from category bits; the stored throwable must be `kind`
    Classified { report: ContactReport, kind: ThrowableKind },
    /// Category bits matched no throwable/surface pairing. Kept in order so
    /// the failure surfaces on the tick it belongs to.
    Rejected {
        category_a: u32,
        category_b: u32,
        throwable_id: u32,
        position: Vec2,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SeededRng,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Scene width the monkey and player move within
    pub bound: f32,
    pub monkey: Monkey,
    pub player: Player,
    pub ledger: Ledger,
    pub spawner: Spawner,
    /// Airborne throwables (sorted by id, oldest first)
    pub throwables: Vec<Throwable>,
    pub timers: Timers,
    /// Contacts reported since the last tick, in detection order
    pending_contacts: VecDeque<PendingContact>,
}

impl GameState {
    /// Create a new session. Score starts at zero and the monkey's first
    /// cooldown is already running.
    pub fn new(seed: u64, tuning: Tuning, bound: f32) -> Self {
        let mut timers = Timers::new();
        let center = bound / 2.0;
        let monkey = Monkey::spawn(
            center,
            tuning.monkey_altitude,
            tuning.monkey_half_width,
            tuning.min_cooldown_secs,
            &mut timers,
            0,
        );
        let player = Player::new(center, tuning.player_half_width);
        let ledger = Ledger::new(Lives::new(tuning.starting_lives, tuning.max_lives));

        Self {
            seed,
            rng: SeededRng::new(seed),
            tuning,
            time_ticks: 0,
            phase: GamePhase::Playing,
            bound,
            monkey,
            player,
            ledger,
            spawner: Spawner::new(),
            throwables: Vec::new(),
            timers,
            pending_contacts: VecDeque::new(),
        }
    }

    /// Queue a contact for the next tick
    pub fn report_contact(&mut self, report: ContactReport) {
        self.pending_contacts.push_back(PendingContact::Report(report));
    }

    /// Queue a contact described by the two bodies' category bitmasks
    pub fn report_raw_contact(
        &mut self,
        category_a: u32,
        category_b: u32,
        throwable_id: u32,
        position: Vec2,
    ) {
        let pending = match classify_contact(category_a, category_b) {
            Ok((kind, surface)) => PendingContact::Classified {
                report: ContactReport {
                    throwable_id,
                    surface,
                    position,
                },
                kind,
            },
            Err(_) => PendingContact::Rejected {
                category_a,
                category_b,
                throwable_id,
                position,
            },
        };
        self.pending_contacts.push_back(pending);
    }

    pub fn pending_contacts(&self) -> usize {
        self.pending_contacts.len()
    }

    pub(crate) fn pop_contact(&mut self) -> Option<PendingContact> {
        self.pending_contacts.pop_front()
    }

    /// Look up an airborne throwable
    pub fn throwable(&self, id: u32) -> Option<&Throwable> {
        self.throwables.iter().find(|t| t.id == id)
    }

    /// Take an airborne throwable out of the world
    pub(crate) fn take_throwable(&mut self, id: u32) -> Option<Throwable> {
        let idx = self.throwables.iter().position(|t| t.id == id)?;
        Some(self.throwables.remove(idx))
    }

    /// Resolver inputs for a contact at `position`
    pub fn resolve_context(&self, position: Vec2) -> ResolveContext {
        ResolveContext {
            current_level: self.monkey.current_level(),
            player_dead: self.player.dead,
            player_invincible: self.player.invincible,
            ground_level: self.tuning.ground_level,
            position,
        }
    }

    /// Where the monkey throws from
    pub fn throw_origin(&self) -> Vec2 {
        Vec2::new(self.monkey.x, self.monkey.y)
    }
}
