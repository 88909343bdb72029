//! The evil monkey: rage escalation, patrol movement and the throw gate
//!
//! The monkey never decides *when* a tantrum happens; callers compare
//! [`RageOutcome::before`] and [`RageOutcome::after`] and start one themselves.

use serde::{Deserialize, Serialize};

use super::rng::RngPolicy;
use super::throwable::ThrowableKind;
use super::timer::{TimerKind, Timers};
use crate::consts::*;

/// Behaviour state of the monkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonkeyMood {
    /// Idle patrol
    Flying,
    /// Level-up window, movement and regular throws suspended
    Tantrum,
    /// Player lost; inert until the session is rebuilt
    Defeated,
}

/// Level before and after a single `enrage()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RageOutcome {
    pub before: u32,
    pub after: u32,
}

impl RageOutcome {
    pub fn leveled_up(&self) -> bool {
        self.after > self.before
    }
}

/// Result of starting a tantrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tantrum {
    /// Which angry sound to play (1-based)
    pub anger_cue: u32,
    /// Length of the angry animation in seconds
    pub animation_secs: f32,
    /// Whether this tantrum armed the heart throw
    pub heart_armed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monkey {
    /// Horizontal position (center)
    pub x: f32,
    /// Vertical position throws originate from
    pub y: f32,
    pub half_width: f32,
    mood: MonkeyMood,
    disabled: bool,

    rage: u32,
    required_rage: u32,
    level: u32,
    v_level: u32,

    step: f32,
    direction: f32,

    can_throw: bool,
    can_throw_heart_during_tantrum: bool,
    coconut_factor: u32,
    /// Lower bound on the throw cooldown
    cooldown_floor: f32,
}

impl Monkey {
    pub fn new(x: f32, y: f32, half_width: f32, cooldown_floor: f32) -> Self {
        Self {
            x,
            y,
            half_width,
            mood: MonkeyMood::Flying,
            disabled: false,
            rage: 0,
            required_rage: REQUIRED_RAGE_START,
            level: 0,
            v_level: 0,
            step: MONKEY_START_STEP,
            direction: -1.0,
            can_throw: false,
            can_throw_heart_during_tantrum: false,
            coconut_factor: 0,
            cooldown_floor,
        }
    }

    /// Create a monkey and arm its first cooldown (no throw until it elapses)
    pub fn spawn(
        x: f32,
        y: f32,
        half_width: f32,
        cooldown_floor: f32,
        timers: &mut Timers,
        now: u64,
    ) -> Self {
        let monkey = Self::new(x, y, half_width, cooldown_floor);
        monkey.arm_cooldown(timers, now);
        monkey
    }

    // === Rage ===

    pub fn rage(&self) -> u32 {
        self.rage
    }

    pub fn required_rage(&self) -> u32 {
        self.required_rage
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn v_level(&self) -> u32 {
        self.v_level
    }

    /// The single difficulty scalar: `5 * v_level + level`
    pub fn current_level(&self) -> u32 {
        LEVELS_PER_TIER * self.v_level + self.level
    }

    /// Register one successful catch
    pub fn enrage(&mut self, rng: &mut impl RngPolicy) -> RageOutcome {
        let before = self.current_level();
        self.rage += 1;

        if self.rage >= self.required_rage {
            let growth = rng.below(REQUIRED_RAGE_MAX_GROWTH);
            self.required_rage += growth + 1;
            self.rage = 0;
            self.level += 1;
        }

        if self.level == LEVELS_PER_TIER {
            self.v_level += 1;
            self.level = 0;
        }

        let after = self.current_level();
        log::debug!(
            "rage {}/{}, level {}, v_level {}, current level {}",
            self.rage,
            self.required_rage,
            self.level,
            self.v_level,
            after
        );
        RageOutcome { before, after }
    }

    /// Start a tantrum: disables the monkey and arms the heart throw at level 3+.
    ///
    /// The caller owns the window length and must call [`Monkey::finish_tantrum`]
    /// once it elapses.
    pub fn throw_tantrum(&mut self, rng: &mut impl RngPolicy) -> Tantrum {
        let heart_armed = self.current_level() >= HEART_TANTRUM_LEVEL;
        if heart_armed {
            self.can_throw_heart_during_tantrum = true;
        }
        if self.mood != MonkeyMood::Defeated {
            self.mood = MonkeyMood::Tantrum;
        }
        self.disabled = true;

        let anger_cue = rng.below(ANGER_CUES) + 1;
        Tantrum {
            anger_cue,
            animation_secs: self.tantrum_animation_secs(),
            heart_armed,
        }
    }

    /// Angry animation length; the middle loop repeats `4 * level + 10` times
    pub fn tantrum_animation_secs(&self) -> f32 {
        let mid_repeats = 4 * self.level + 10;
        let frames = TANTRUM_START_FRAMES + TANTRUM_MID_FRAMES * mid_repeats + TANTRUM_END_FRAMES;
        frames as f32 * TANTRUM_FRAME_SECS
    }

    /// End the tantrum window. No-op unless a tantrum is in progress.
    pub fn finish_tantrum(&mut self) -> bool {
        if self.mood != MonkeyMood::Tantrum {
            return false;
        }
        self.mood = MonkeyMood::Flying;
        self.disabled = false;
        true
    }

    // === Movement ===

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Advance patrol inside `[0, bound]`
    pub fn move_within(&mut self, bound: f32, rng: &mut impl RngPolicy) {
        if self.disabled {
            return;
        }
        self.update_step(rng);
        self.update_position(bound);
    }

    fn update_step(&mut self, rng: &mut impl RngPolicy) {
        if self.step < MONKEY_BURST_THRESHOLD {
            if rng.one_in(MONKEY_BURST_ODDS) {
                self.step = rng.below(MONKEY_BURST_STEPS) as f32;
            }
        } else {
            self.step -= MONKEY_STEP_DECAY;
        }
    }

    fn update_position(&mut self, bound: f32) {
        let half_width = self.half_width;

        if self.x > bound - half_width {
            self.x = bound - half_width - MONKEY_SAFETY_INSET;
            self.direction = -self.direction;
        }

        if self.x < half_width {
            self.x = half_width + MONKEY_SAFETY_INSET;
            self.direction = -self.direction;
        }

        self.x += self.direction * self.step;
    }

    // === Throwing ===

    pub fn can_throw(&self) -> bool {
        self.can_throw
    }

    pub fn coconut_factor(&self) -> u32 {
        self.coconut_factor
    }

    pub fn heart_armed(&self) -> bool {
        self.can_throw_heart_during_tantrum
    }

    /// Throw gate, polled every tick. Passing it consumes the throw and restarts the cooldown.
    pub fn is_able_to_throw(&mut self, timers: &mut Timers, now: u64) -> bool {
        if self.disabled || !self.can_throw {
            return false;
        }
        self.arm_cooldown(timers, now);
        self.can_throw = false;
        true
    }

    /// Cooldown deadline fired
    pub fn on_cooldown_elapsed(&mut self) {
        self.can_throw = true;
    }

    /// Throw cooldown for the current level, never below the configured floor
    pub fn cooldown_secs(&self) -> f32 {
        let level = self.level as f32;
        let v_level = self.v_level as f32;
        let decay = if self.level > 0 { COOLDOWN_LEVEL_DECAY } else { 0.0 };

        let level_factor = COOLDOWN_PER_LEVEL * level - decay * (level - 1.0);
        let tier_factor = COOLDOWN_PER_TIER * v_level;

        (COOLDOWN_BASE_SECS - level_factor - tier_factor).max(self.cooldown_floor)
    }

    fn arm_cooldown(&self, timers: &mut Timers, now: u64) {
        timers.schedule_secs(now, self.cooldown_secs(), TimerKind::ThrowCooldown);
    }

    /// Pick banana or coconut; the coconut odds climb with every banana
    pub fn get_throwable(&mut self, rng: &mut impl RngPolicy) -> ThrowableKind {
        let roll = rng.below(100);

        if roll < self.coconut_factor {
            self.coconut_factor = 0;
            ThrowableKind::Coconut
        } else {
            self.coconut_factor += (1 + self.level) * COCONUT_FACTOR_STEP;
            ThrowableKind::Banana
        }
    }

    /// One heart per armed tantrum, released on a 1-in-3 roll
    pub fn can_throw_heart(&mut self, rng: &mut impl RngPolicy) -> bool {
        if self.can_throw_heart_during_tantrum && rng.one_in(HEART_ODDS) {
            self.can_throw_heart_during_tantrum = false;
            true
        } else {
            false
        }
    }

    // === Suppression ===

    pub fn mood(&self) -> MonkeyMood {
        self.mood
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn enable(&mut self) {
        if self.mood != MonkeyMood::Defeated {
            self.disabled = false;
        }
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Permanently stop the monkey (player died)
    pub fn disable_forever(&mut self) {
        self.mood = MonkeyMood::Defeated;
        self.disabled = true;
    }
}
