//! Banana Catcher - gameplay core of an arcade catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (monkey rage, throws, contact resolution)
//! - `tuning`: Data-driven game balance
//! - `error`: Simulation error types

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{SimError, SimResult};
pub use tuning::{PointTable, Tuning};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SEC: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SEC;

    /// Default scene width (points)
    pub const DEFAULT_SCENE_WIDTH: f32 = 375.0;

    /// Monkey movement
    pub const MONKEY_START_STEP: f32 = 1.0;
    pub const MONKEY_STEP_DECAY: f32 = 0.05;
    /// Once step drops below this, a burst roll may re-randomize it
    pub const MONKEY_BURST_THRESHOLD: f32 = 1.0;
    /// Burst roll odds (1 in N per tick)
    pub const MONKEY_BURST_ODDS: u32 = 6;
    /// Burst step is drawn from 0..MONKEY_BURST_STEPS
    pub const MONKEY_BURST_STEPS: u32 = 4;
    /// Inset applied when bouncing off a bound so the sprite never clips it
    pub const MONKEY_SAFETY_INSET: f32 = 0.5;

    /// Rage and level escalation
    pub const LEVELS_PER_TIER: u32 = 5;
    pub const REQUIRED_RAGE_START: u32 = 5;
    /// Required rage grows by 1..=REQUIRED_RAGE_MAX_GROWTH per level-up
    pub const REQUIRED_RAGE_MAX_GROWTH: u32 = 3;
    /// Coconut factor grows by (1 + level) * COCONUT_FACTOR_STEP per banana
    pub const COCONUT_FACTOR_STEP: u32 = 10;
    /// Heart chance during an armed tantrum (1 in N per check)
    pub const HEART_ODDS: u32 = 3;
    /// Tantrums at or above this level arm the heart throw
    pub const HEART_TANTRUM_LEVEL: u32 = 3;

    /// Throw cooldown: 2.0 - (0.5*level - decay*(level-1)) - 0.4*v_level
    pub const COOLDOWN_BASE_SECS: f32 = 2.0;
    pub const COOLDOWN_PER_LEVEL: f32 = 0.5;
    pub const COOLDOWN_LEVEL_DECAY: f32 = 0.3;
    pub const COOLDOWN_PER_TIER: f32 = 0.4;

    /// Tantrum animation: start, repeated mid, end frames
    pub const TANTRUM_FRAME_SECS: f32 = 0.05;
    pub const TANTRUM_START_FRAMES: u32 = 7;
    pub const TANTRUM_MID_FRAMES: u32 = 2;
    pub const TANTRUM_END_FRAMES: u32 = 6;
    /// Number of distinct angry sound cues
    pub const ANGER_CUES: u32 = 4;

    /// Offsets above the ground for things that land
    pub const SPLAT_LIFT: f32 = 5.0;
    pub const BROKEN_NUT_LIFT: f32 = 30.0;
    pub const POPUP_LIFT: f32 = 15.0;

    /// Vertical impulse given to items released by a broken nut
    pub const SPAWN_POP_FORCE: f32 = 6.0;
}
