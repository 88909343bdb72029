//! Banana Catcher headless driver
//!
//! Runs a seeded session against a stand-in physics step and a simple
//! autopilot, then prints a JSON summary.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use banana_catcher::consts::{DEFAULT_SCENE_WIDTH, SIM_DT};
use banana_catcher::sim::{
    ContactReport, EventSink, GameEvent, GamePhase, GameState, LogSink, Surface, ThrowableKind,
    TickInput, tick,
};
use banana_catcher::tuning::Tuning;

/// Downward acceleration of airborne bodies (points/s^2)
const GRAVITY: f32 = 420.0;
/// Velocity per unit of spawn impulse (points/s)
const IMPULSE_SCALE: f32 = 12.0;
/// Height of the basket above the ground
const BASKET_HEIGHT: f32 = 45.0;

#[derive(Parser, Debug)]
#[command(name = "banana-catcher")]
#[command(about = "Run a headless Banana Catcher session and print a JSON summary")]
struct Cli {
    /// Session seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Maximum ticks to simulate (60 per second)
    #[arg(long, default_value_t = 60 * 60 * 3)]
    ticks: u64,
    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Scene width in points
    #[arg(long, default_value_t = DEFAULT_SCENE_WIDTH)]
    width: f32,
    /// Fail on the first unexpected contact instead of dropping it
    #[arg(long, default_value_t = false)]
    strict: bool,
}

/// A falling body in the stand-in physics world
#[derive(Debug, Clone)]
struct Body {
    kind: ThrowableKind,
    pos: Vec2,
    vel: Vec2,
    /// Contact already reported; waiting for the sim to remove it
    reported: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    score: i64,
    lives: u8,
    level: u32,
    game_over: bool,
    thrown: u32,
    caught: u32,
    missed_bananas: u32,
    hits_taken: u32,
    tantrums: u32,
    unexpected_contacts: u32,
}

struct Session {
    state: GameState,
    bodies: BTreeMap<u32, Body>,
    summary: Summary,
}

impl Session {
    fn new(seed: u64, tuning: Tuning, width: f32) -> Self {
        Self {
            state: GameState::new(seed, tuning, width),
            bodies: BTreeMap::new(),
            summary: Summary {
                seed,
                ..Default::default()
            },
        }
    }

    /// Advance one physics step and one sim tick
    fn step(&mut self) -> Result<()> {
        self.integrate();
        self.detect_contacts();

        let input = TickInput {
            target_x: self.autopilot_target(),
            bound: None,
        };
        let mut events = Vec::new();
        let result = tick(&mut self.state, &input, &mut events);
        for event in events {
            LogSink.publish(event.clone());
            self.observe(event);
        }
        result.with_context(|| format!("tick {} failed", self.state.time_ticks))
    }

    fn integrate(&mut self) {
        for body in self.bodies.values_mut() {
            body.vel.y -= GRAVITY * SIM_DT;
            body.pos += body.vel * SIM_DT;
        }
    }

    fn detect_contacts(&mut self) {
        let ground = self.state.tuning.ground_level;
        let basket_top = ground + BASKET_HEIGHT;
        let player_x = self.state.player.x;
        let player_half_width = self.state.player.half_width;

        for (id, body) in self.bodies.iter_mut() {
            if body.reported || body.vel.y > 0.0 {
                continue;
            }
            let surface = if body.pos.y <= basket_top
                && body.pos.y > ground
                && (body.pos.x - player_x).abs() <= player_half_width
            {
                Surface::Player
            } else if body.pos.y <= ground {
                Surface::Ground
            } else {
                continue;
            };

            body.reported = true;
            self.state.report_contact(ContactReport {
                throwable_id: *id,
                surface,
                position: body.pos,
            });
        }
    }

    /// Chase the lowest catchable item; otherwise dodge hazards overhead
    fn autopilot_target(&self) -> Option<f32> {
        let player = &self.state.player;
        let falling = self
            .bodies
            .values()
            .filter(|b| !b.reported && b.vel.y <= 0.0);

        let catchable = falling
            .clone()
            .filter(|b| !b.kind.is_hazard())
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        if let Some(target) = catchable {
            return Some(target.pos.x);
        }

        let threat = falling
            .filter(|b| b.kind.is_hazard())
            .filter(|b| (b.pos.x - player.x).abs() <= player.half_width * 2.0)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;
        let away = if threat.pos.x > player.x { -1.0 } else { 1.0 };
        Some(player.x + away * player.half_width * 3.0)
    }

    fn observe(&mut self, event: GameEvent) {
        match event {
            GameEvent::Spawned {
                id,
                kind,
                position,
                force,
            } => {
                self.summary.thrown += 1;
                self.bodies.insert(
                    id,
                    Body {
                        kind,
                        pos: position,
                        vel: force * IMPULSE_SCALE,
                        reported: false,
                    },
                );
            }
            GameEvent::Removed { id, .. } => {
                self.bodies.remove(&id);
            }
            GameEvent::PlayerReaction(reaction) => {
                use banana_catcher::sim::collision::PlayerReaction;
                match reaction {
                    PlayerReaction::Ouch => self.summary.hits_taken += 1,
                    PlayerReaction::Frown => self.summary.missed_bananas += 1,
                    _ => self.summary.caught += 1,
                }
            }
            GameEvent::TantrumStarted { anger_cue, secs } => {
                self.summary.tantrums += 1;
                log::info!("Tantrum (cue {}) for {:.2}s", anger_cue, secs);
            }
            GameEvent::UnexpectedContact { .. } => self.summary.unexpected_contacts += 1,
            GameEvent::GameOver { score, level } => {
                log::info!(
                    "Game over at tick {}: score {}, level {}",
                    self.state.time_ticks,
                    score,
                    level
                );
            }
            _ => {}
        }
    }

    fn finished(&self) -> bool {
        self.state.phase == GamePhase::GameOver && self.bodies.is_empty()
    }

    fn into_summary(mut self) -> Summary {
        self.summary.ticks = self.state.time_ticks;
        self.summary.score = self.state.ledger.score;
        self.summary.lives = self.state.ledger.lives.count();
        self.summary.level = self.state.monkey.current_level();
        self.summary.game_over = self.state.phase == GamePhase::GameOver;
        self.summary
    }
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = Tuning::from_json(&text)
        .with_context(|| format!("invalid tuning file {}", path.display()))?;
    Ok(tuning)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut tuning = load_tuning(cli.tuning.as_ref())?;
    if cli.strict {
        tuning.strict_contacts = true;
    }
    log::info!(
        "Banana Catcher starting: seed {}, width {}, up to {} ticks",
        cli.seed,
        cli.width,
        cli.ticks
    );

    let mut session = Session::new(cli.seed, tuning, cli.width);
    for _ in 0..cli.ticks {
        session.step()?;
        if session.finished() {
            break;
        }
    }

    let summary = session.into_summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
