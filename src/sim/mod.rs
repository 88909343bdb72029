//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Contacts applied in the order they were reported
//! - No physics, rendering or audio dependencies

pub mod collision;
pub mod events;
pub mod monkey;
pub mod rng;
pub mod state;
pub mod throwable;
pub mod tick;
pub mod timer;

pub use collision::{ContactReport, Resolution, Surface, classify_contact, resolve};
pub use events::{EventSink, GameEvent, LogSink, NullSink};
pub use monkey::{Monkey, MonkeyMood};
pub use rng::{RngPolicy, ScriptedRng, SeededRng};
pub use state::{GamePhase, GameState, Ledger, Lives, Player, PlayerColor};
pub use throwable::{Spawner, Throwable, ThrowableKind, categories};
pub use tick::{TickInput, drain_contacts, report_player_catch_success, tick};
pub use timer::{TimerKind, Timers};
