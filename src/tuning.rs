//! Game balance and session tuning
//!
//! Loaded from JSON; any field missing from the file falls back to its default,
//! so a tuning file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Points awarded (or deducted) per contact outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointTable {
    pub banana_caught: i64,
    pub banana_cluster_caught: i64,
    pub banana_missed: i64,
    pub banana_cluster_missed: i64,
    pub coconut_caught: i64,
    pub supernut_caught: i64,
    pub heart_caught: i64,
    pub mush_caught: i64,
}

impl Default for PointTable {
    fn default() -> Self {
        Self {
            banana_caught: 1,
            banana_cluster_caught: 5,
            banana_missed: -1,
            banana_cluster_missed: -3,
            coconut_caught: -2,
            supernut_caught: -5,
            heart_caught: 5,
            mush_caught: 3,
        }
    }
}

/// Gameplay tuning for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub points: PointTable,

    // === Lives ===
    pub starting_lives: u8,
    pub max_lives: u8,

    // === Monkey ===
    /// Lower bound for the throw cooldown (the raw formula goes negative at high tiers)
    pub min_cooldown_secs: f32,
    pub monkey_half_width: f32,
    /// Height the monkey patrols at (throws originate here)
    pub monkey_altitude: f32,

    // === Tantrum ===
    /// Time spent gliding back to the scene center
    pub tantrum_recenter_secs: f32,
    /// Extra pause before the frenzy once the monkey reaches the second tier
    pub tantrum_frenzy_wait_secs: f32,
    /// Spacing between frenzy coconuts
    pub frenzy_interval_secs: f32,

    // === Player ===
    pub player_half_width: f32,
    /// Horizontal distance covered per tick while steering
    pub player_speed: f32,
    /// Targets closer than this are ignored (stops jitter)
    pub player_dead_zone: f32,
    pub invincibility_secs: f32,
    pub color_secs: f32,

    // === Scene ===
    pub ground_level: f32,

    /// Return malformed contacts as errors instead of logging and dropping them
    pub strict_contacts: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            points: PointTable::default(),

            starting_lives: 3,
            max_lives: 5,

            min_cooldown_secs: 0.25,
            monkey_half_width: 30.0,
            monkey_altitude: 487.0,

            tantrum_recenter_secs: 0.5,
            tantrum_frenzy_wait_secs: 0.6,
            frenzy_interval_secs: 0.3,

            player_half_width: 25.0,
            player_speed: 5.0,
            player_dead_zone: 3.0,
            invincibility_secs: 1.5,
            color_secs: 5.0,

            ground_level: 40.0,

            strict_contacts: false,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| SimError::TuningParse(e.to_string()))?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} starting lives)", tuning.starting_lives);
        Ok(tuning)
    }

    /// Reject values that would break the simulation
    pub fn validate(&self) -> SimResult<()> {
        if self.max_lives == 0 {
            return Err(SimError::InvalidTuning {
                name: "max_lives",
                value: self.max_lives as f64,
                safe_range: "[1, 255]",
            });
        }
        if self.starting_lives > self.max_lives {
            return Err(SimError::InvalidTuning {
                name: "starting_lives",
                value: self.starting_lives as f64,
                safe_range: "[0, max_lives]",
            });
        }
        if self.min_cooldown_secs <= 0.0 {
            return Err(SimError::InvalidTuning {
                name: "min_cooldown_secs",
                value: self.min_cooldown_secs as f64,
                safe_range: "(0.0, ∞)",
            });
        }

        let widths = [
            ("monkey_half_width", self.monkey_half_width),
            ("player_half_width", self.player_half_width),
            ("player_speed", self.player_speed),
        ];
        for (name, value) in widths {
            if value <= 0.0 {
                return Err(SimError::InvalidTuning {
                    name,
                    value: value as f64,
                    safe_range: "(0.0, ∞)",
                });
            }
        }

        let durations = [
            ("tantrum_recenter_secs", self.tantrum_recenter_secs),
            ("tantrum_frenzy_wait_secs", self.tantrum_frenzy_wait_secs),
            ("frenzy_interval_secs", self.frenzy_interval_secs),
            ("invincibility_secs", self.invincibility_secs),
            ("color_secs", self.color_secs),
            ("player_dead_zone", self.player_dead_zone),
        ];
        for (name, value) in durations {
            if value < 0.0 {
                return Err(SimError::InvalidTuning {
                    name,
                    value: value as f64,
                    safe_range: "[0.0, ∞)",
                });
            }
        }

        Ok(())
    }
}
