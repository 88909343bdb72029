//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. Order within a
//! tick: queued contacts, due deadlines, monkey patrol, throw gate, player.

use glam::Vec2;

use super::collision::{ContactReport, LifeEffect, PlayerReaction, Removal, Resolution, resolve};
use super::events::{EventSink, GameEvent, music_track_for_level};
use super::monkey::MonkeyMood;
use super::state::{GamePhase, GameState, PendingContact, PlayerColor};
use super::throwable::{Throwable, ThrowableKind, escalate};
use super::timer::TimerKind;
use crate::consts::LEVELS_PER_TIER;
use crate::error::{SimError, SimResult};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the player is steering (touch x), if touching
    pub target_x: Option<f32>,
    /// New scene width, if it changed
    pub bound: Option<f32>,
}

/// Advance the game state by one fixed timestep
///
/// Fails only in strict-contact mode, after publishing the bad contact. The
/// rest of the queue is kept for the next tick.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    sink: &mut impl EventSink,
) -> SimResult<()> {
    if let Some(bound) = input.bound {
        state.bound = bound;
    }

    state.time_ticks += 1;
    if state.time_ticks == 1 {
        sink.publish(GameEvent::MusicCue { track: 1 });
    }

    drain_contacts(state, sink)?;
    fire_due_timers(state, sink);

    let bound = state.bound;
    state.monkey.move_within(bound, &mut state.rng);
    monkey_throws_something(state, sink);

    if let Some(target) = input.target_x {
        let tuning = &state.tuning;
        state
            .player
            .move_toward(target, bound, tuning.player_speed, tuning.player_dead_zone);
    }

    Ok(())
}

/// Apply every queued contact in the order it was reported
pub fn drain_contacts(state: &mut GameState, sink: &mut impl EventSink) -> SimResult<()> {
    while let Some(pending) = state.pop_contact() {
        let result = match pending {
            PendingContact::Report(report) => apply_contact(state, report, None, sink),
            PendingContact::Classified { report, kind } => {
                apply_contact(state, report, Some(kind), sink)
            }
            PendingContact::Rejected {
                category_a,
                category_b,
                ..
            } => Err(SimError::UnexpectedContact {
                category_a,
                category_b,
            }),
        };

        if let Err(err) = result {
            let (id, surface) = match err {
                SimError::UnknownThrowable { id, surface }
                | SimError::KindMismatch { id, surface, .. } => (Some(id), Some(surface)),
                _ => (None, None),
            };
            sink.publish(GameEvent::UnexpectedContact { id, surface });

            if state.tuning.strict_contacts {
                log::error!("Unexpected contact: {}", err);
                return Err(err);
            }
            log::warn!("Dropping contact: {}", err);
        }
    }
    Ok(())
}

/// Resolve one contact. With a `reported` kind, a throwable stored under a
/// different kind is left in the world and the contact is refused.
fn apply_contact(
    state: &mut GameState,
    report: ContactReport,
    reported: Option<ThrowableKind>,
    sink: &mut impl EventSink,
) -> SimResult<()> {
    let stored = state.throwable(report.throwable_id).map(|t| t.kind);
    if let (Some(reported), Some(stored)) = (reported, stored) {
        if reported != stored {
            return Err(SimError::KindMismatch {
                id: report.throwable_id,
                surface: report.surface,
                reported,
                stored,
            });
        }
    }

    let item = state
        .take_throwable(report.throwable_id)
        .ok_or(SimError::UnknownThrowable {
            id: report.throwable_id,
            surface: report.surface,
        })?;

    let ctx = state.resolve_context(report.position);
    let resolution = resolve(item.kind, report.surface, &ctx, &state.tuning.points);
    log::debug!(
        "{} #{} hit {} at ({:.1}, {:.1})",
        item.kind.name(),
        item.id,
        report.surface,
        report.position.x,
        report.position.y
    );
    apply_resolution(state, &item, resolution, sink);
    Ok(())
}

fn apply_resolution(
    state: &mut GameState,
    item: &Throwable,
    res: Resolution,
    sink: &mut impl EventSink,
) {
    if let Some(popup) = res.popup {
        sink.publish(GameEvent::PointsPopup(popup));
    }
    if let Some(points) = res.points {
        let score = state.ledger.add_points(points);
        sink.publish(GameEvent::ScoreChanged { score });
    }

    match res.life {
        LifeEffect::Gain => {
            state.ledger.lives.up();
            sink.publish(GameEvent::LivesChanged {
                lives: state.ledger.lives.count(),
            });
        }
        LifeEffect::Lose => lose_life(state, sink),
        LifeEffect::None => {}
    }

    if let Some(reaction) = res.reaction {
        apply_reaction(state, reaction, sink);
    }
    if res.enrage {
        report_player_catch_success(state, sink);
    }

    for spawn in &res.spawns {
        let released = state.spawner.spawn_at(spawn.kind, spawn.position);
        add_throwable(state, released, sink);
    }
    if let Some(decoration) = res.decoration {
        sink.publish(GameEvent::Decoration(decoration));
    }

    sink.publish(GameEvent::Removed {
        id: item.id,
        fade: res.removal == Removal::FadeOut,
    });
}

/// Out of lives means the next hit is fatal
fn lose_life(state: &mut GameState, sink: &mut impl EventSink) {
    if !state.ledger.lives.is_empty() {
        state.ledger.lives.down();
        sink.publish(GameEvent::LivesChanged {
            lives: state.ledger.lives.count(),
        });
        return;
    }

    state.monkey.disable_forever();
    state.player.dead = true;
    state.player.invincible = false;
    state.phase = GamePhase::GameOver;
    publish_player_state(state, sink);

    let score = state.ledger.score;
    let level = state.monkey.current_level();
    log::info!("Game over: score {}, level {}", score, level);
    sink.publish(GameEvent::GameOver { score, level });
}

fn apply_reaction(state: &mut GameState, reaction: PlayerReaction, sink: &mut impl EventSink) {
    sink.publish(GameEvent::PlayerReaction(reaction));

    let now = state.time_ticks;
    let tuning = &state.tuning;
    match reaction {
        PlayerReaction::Ouch if !state.player.dead => {
            state.player.invincible = true;
            state
                .timers
                .reschedule_secs(now, tuning.invincibility_secs, TimerKind::PlayerInvincibility);
        }
        PlayerReaction::GoGreen | PlayerReaction::GoPurple => {
            state.player.color = if reaction == PlayerReaction::GoGreen {
                PlayerColor::Green
            } else {
                PlayerColor::Purple
            };
            state
                .timers
                .reschedule_secs(now, tuning.color_secs, TimerKind::PlayerColor);
        }
        _ => return,
    }
    publish_player_state(state, sink);
}

fn publish_player_state(state: &GameState, sink: &mut impl EventSink) {
    sink.publish(GameEvent::PlayerState {
        dead: state.player.dead,
        invincible: state.player.invincible,
        color: state.player.color,
    });
}

/// A banana was caught: feed the monkey's rage and start a tantrum on level-up
pub fn report_player_catch_success(state: &mut GameState, sink: &mut impl EventSink) {
    let outcome = state.monkey.enrage(&mut state.rng);
    if !outcome.leveled_up() {
        return;
    }

    let level = outcome.after;
    log::info!("Monkey reached level {}", level);
    sink.publish(GameEvent::LevelUp { level });
    if let Some(track) = music_track_for_level(level) {
        sink.publish(GameEvent::MusicCue { track });
    }

    start_tantrum(state, sink);
}

fn start_tantrum(state: &mut GameState, sink: &mut impl EventSink) {
    let now = state.time_ticks;
    let tantrum = state.monkey.throw_tantrum(&mut state.rng);
    state.monkey.x = state.bound / 2.0;

    let tuning = &state.tuning;
    let mut lead_in = tuning.tantrum_recenter_secs;
    let frenzy = if state.monkey.current_level() >= LEVELS_PER_TIER {
        lead_in += tuning.tantrum_frenzy_wait_secs;
        2 + state.monkey.v_level()
    } else {
        0
    };

    // A tantrum can start while another is still running (late catches)
    state.timers.cancel(TimerKind::FrenzyThrow);
    state.timers.cancel(TimerKind::TantrumEnd);

    for i in 0..frenzy {
        let at = lead_in + i as f32 * tuning.frenzy_interval_secs;
        state.timers.schedule_secs(now, at, TimerKind::FrenzyThrow);
    }
    let scripted = lead_in + frenzy as f32 * tuning.frenzy_interval_secs;
    let window = tantrum.animation_secs.max(scripted);
    state.timers.schedule_secs(now, window, TimerKind::TantrumEnd);
    log::debug!(
        "tantrum for {:.2}s with {} frenzy throws",
        window,
        state.timers.pending(TimerKind::FrenzyThrow)
    );

    sink.publish(GameEvent::TantrumStarted {
        anger_cue: tantrum.anger_cue,
        secs: window,
    });
}

fn fire_due_timers(state: &mut GameState, sink: &mut impl EventSink) {
    let now = state.time_ticks;

    while let Some(deadline) = state.timers.pop_due(now) {
        match deadline.kind {
            TimerKind::ThrowCooldown => state.monkey.on_cooldown_elapsed(),
            TimerKind::FrenzyThrow => {
                if state.monkey.mood() == MonkeyMood::Tantrum {
                    let kind = if state.monkey.can_throw_heart(&mut state.rng) {
                        ThrowableKind::Heart
                    } else {
                        ThrowableKind::Coconut
                    };
                    throw_item(state, kind, sink);
                }
            }
            TimerKind::TantrumEnd => {
                if state.monkey.finish_tantrum() {
                    sink.publish(GameEvent::TantrumEnded);
                }
            }
            TimerKind::PlayerInvincibility => {
                if state.player.invincible {
                    state.player.invincible = false;
                    publish_player_state(state, sink);
                }
            }
            TimerKind::PlayerColor => {
                if state.player.color != PlayerColor::Normal {
                    state.player.color = PlayerColor::Normal;
                    publish_player_state(state, sink);
                }
            }
        }
    }
}

fn monkey_throws_something(state: &mut GameState, sink: &mut impl EventSink) {
    if !state
        .monkey
        .is_able_to_throw(&mut state.timers, state.time_ticks)
    {
        return;
    }

    let kind = if state.monkey.can_throw_heart(&mut state.rng) {
        ThrowableKind::Heart
    } else {
        let base = state.monkey.get_throwable(&mut state.rng);
        escalate(base, state.monkey.current_level(), &mut state.rng)
    };
    throw_item(state, kind, sink);
}

fn throw_item(state: &mut GameState, kind: ThrowableKind, sink: &mut impl EventSink) {
    let origin: Vec2 = state.throw_origin();
    let item = state.spawner.throw_from(kind, origin);
    add_throwable(state, item, sink);
}

fn add_throwable(state: &mut GameState, item: Throwable, sink: &mut impl EventSink) {
    log::debug!(
        "spawned {} #{} at ({:.1}, {:.1})",
        item.kind.name(),
        item.id,
        item.position.x,
        item.position.y
    );
    sink.publish(GameEvent::Spawned {
        id: item.id,
        kind: item.kind,
        position: item.position,
        force: item.initial_force,
    });
    state.throwables.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{DecorationKind, Surface};
    use crate::sim::events::NullSink;
    use crate::sim::throwable::categories;
    use crate::tuning::Tuning;

    const WIDTH: f32 = 375.0;

    fn new_state() -> GameState {
        GameState::new(12345, Tuning::default(), WIDTH)
    }

    /// Put a throwable in the world and queue a contact for it
    fn hit(state: &mut GameState, kind: ThrowableKind, surface: Surface) -> u32 {
        let item = state.spawner.throw_from(kind, Vec2::new(100.0, 300.0));
        let id = item.id;
        state.throwables.push(item);
        state.report_contact(ContactReport {
            throwable_id: id,
            surface,
            position: Vec2::new(100.0, 60.0),
        });
        id
    }

    fn run(state: &mut GameState, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            tick(state, &TickInput::default(), &mut events).unwrap();
        }
        events
    }

    fn spawned(events: &[GameEvent]) -> Vec<ThrowableKind> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Spawned { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Raise the monkey straight to `level` without tantrums
    fn raise_to(state: &mut GameState, level: u32) {
        while state.monkey.current_level() < level {
            state.monkey.enrage(&mut state.rng);
        }
    }

    /// Enrage until one more catch levels up
    fn brink_of_level_up(state: &mut GameState) {
        while state.monkey.rage() + 1 < state.monkey.required_rage() {
            state.monkey.enrage(&mut state.rng);
        }
    }

    #[test]
    fn test_first_throw_after_initial_cooldown() {
        let mut state = new_state();
        let events = run(&mut state, 119);
        assert!(spawned(&events).is_empty());
        assert_eq!(events.first(), Some(&GameEvent::MusicCue { track: 1 }));

        let events = run(&mut state, 1);
        let kinds = spawned(&events);
        assert_eq!(kinds.len(), 1);
        assert_eq!(state.throwables.len(), 1);
        assert!(!state.monkey.can_throw());
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed produce identical event streams
        let mut a = new_state();
        let mut b = new_state();
        let input = TickInput {
            target_x: Some(300.0),
            ..Default::default()
        };
        let mut ea = Vec::new();
        let mut eb = Vec::new();
        for _ in 0..2000 {
            tick(&mut a, &input, &mut ea).unwrap();
            tick(&mut b, &input, &mut eb).unwrap();
        }
        assert_eq!(ea, eb);
        assert_eq!(a.monkey.x, b.monkey.x);
        assert_eq!(a.throwables, b.throwables);
    }

    #[test]
    fn test_five_catches_level_up_and_tantrum() {
        let mut state = new_state();
        let required_before = state.monkey.required_rage();
        assert_eq!(required_before, 5);

        for _ in 0..5 {
            hit(&mut state, ThrowableKind::Banana, Surface::Player);
        }
        let events = run(&mut state, 1);

        assert_eq!(state.monkey.level(), 1);
        assert_eq!(state.monkey.rage(), 0);
        let growth = state.monkey.required_rage() - required_before;
        assert!((1..=3).contains(&growth));
        assert_eq!(state.ledger.score, 5 * state.tuning.points.banana_caught);
        assert!(events.contains(&GameEvent::LevelUp { level: 1 }));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TantrumStarted { .. })));
        assert_eq!(state.monkey.mood(), MonkeyMood::Tantrum);
        assert_eq!(state.monkey.x, WIDTH / 2.0);

        // 7 + 2 * 14 + 6 frames at 0.05s = 2.05s = 123 ticks
        let x = state.monkey.x;
        let events = run(&mut state, 122);
        assert!(!events.contains(&GameEvent::TantrumEnded));
        assert!(spawned(&events).is_empty(), "no regular throws mid-tantrum");
        assert_eq!(state.monkey.x, x);

        let events = run(&mut state, 1);
        assert!(events.contains(&GameEvent::TantrumEnded));
        assert_eq!(state.monkey.mood(), MonkeyMood::Flying);
        assert!(!state.monkey.is_disabled());
    }

    #[test]
    fn test_missed_banana_penalises_and_splats() {
        let mut state = new_state();
        let id = hit(&mut state, ThrowableKind::Banana, Surface::Ground);
        let events = run(&mut state, 1);

        assert_eq!(state.ledger.score, state.tuning.points.banana_missed);
        assert!(events.contains(&GameEvent::PlayerReaction(PlayerReaction::Frown)));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Decoration(d) if d.kind == DecorationKind::BananaSplat
        )));
        assert!(events.contains(&GameEvent::Removed { id, fade: false }));
        assert!(state.throwable(id).is_none());
    }

    #[test]
    fn test_supernut_on_ground_at_level_twelve() {
        let mut state = new_state();
        raise_to(&mut state, 12);
        let id = hit(&mut state, ThrowableKind::Supernut, Surface::Ground);
        let events = run(&mut state, 1);

        assert_eq!(
            spawned(&events),
            vec![ThrowableKind::Coconut, ThrowableKind::Coconut]
        );
        let broken: Vec<_> = events
            .iter()
            .filter(|e| {
                matches!(e, GameEvent::Decoration(d) if d.kind == DecorationKind::Superbroke)
            })
            .collect();
        assert_eq!(broken.len(), 1);
        assert!(events.contains(&GameEvent::Removed { id, fade: false }));
        assert_eq!(state.throwables.len(), 2);
    }

    #[test]
    fn test_banananut_on_ground_releases_banana() {
        let mut state = new_state();
        let id = hit(&mut state, ThrowableKind::Banananut, Surface::Ground);
        let events = run(&mut state, 1);

        let released: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Spawned { kind, position, .. } => Some((*kind, *position)),
                _ => None,
            })
            .collect();
        let at = Vec2::new(100.0, state.tuning.ground_level + 30.0);
        assert_eq!(released, vec![(ThrowableKind::Banana, at)]);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Decoration(d) if d.kind == DecorationKind::Brokenut && d.position == at
        )));
        assert!(state.throwable(id).is_none());
        assert_eq!(state.ledger.score, 0);
    }

    #[test]
    fn test_hazard_costs_life_then_grants_invincibility() {
        let mut state = new_state();
        hit(&mut state, ThrowableKind::Coconut, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.ledger.lives.count(), 2);
        assert!(state.player.invincible);

        hit(&mut state, ThrowableKind::Coconut, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.ledger.lives.count(), 2, "invincible player keeps lives");

        // 1.5s = 90 ticks after the ouch
        let events = run(&mut state, 89);
        assert!(!state.player.invincible);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PlayerState {
                invincible: false,
                ..
            }
        )));
    }

    #[test]
    fn test_hit_with_no_lives_kills_player() {
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        let mut state = GameState::new(5, tuning, WIDTH);
        hit(&mut state, ThrowableKind::Coconut, Surface::Player);
        let events = run(&mut state, 1);

        assert!(state.player.dead);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.monkey.mood(), MonkeyMood::Defeated);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Dead players ignore catches, ground contacts still count
        let score = state.ledger.score;
        hit(&mut state, ThrowableKind::Banana, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.ledger.score, score);
        assert_eq!(state.monkey.rage(), 0);

        hit(&mut state, ThrowableKind::Banana, Surface::Ground);
        run(&mut state, 1);
        assert_eq!(state.ledger.score, score + state.tuning.points.banana_missed);

        // Nothing is thrown once the monkey is defeated
        let events = run(&mut state, 600);
        assert!(spawned(&events).is_empty());
    }

    #[test]
    fn test_heart_caught_while_dead_still_counts() {
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        let mut state = GameState::new(5, tuning, WIDTH);
        state.player.dead = true;
        hit(&mut state, ThrowableKind::Heart, Surface::Player);
        let events = run(&mut state, 1);
        assert_eq!(state.ledger.lives.count(), 1);
        assert_eq!(state.ledger.score, state.tuning.points.heart_caught);
        assert!(events.contains(&GameEvent::LivesChanged { lives: 1 }));
    }

    #[test]
    fn test_hearts_saturate_at_capacity() {
        let mut state = new_state();
        for _ in 0..4 {
            hit(&mut state, ThrowableKind::Heart, Surface::Player);
        }
        run(&mut state, 1);
        assert_eq!(state.ledger.lives.count(), state.tuning.max_lives);
    }

    #[test]
    fn test_mushroom_colour_wears_off() {
        let mut state = new_state();
        hit(&mut state, ThrowableKind::Purplemush, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.player.color, PlayerColor::Purple);

        // A green catch restarts the colour timer
        hit(&mut state, ThrowableKind::Greenmush, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.player.color, PlayerColor::Green);
        assert_eq!(state.timers.pending(TimerKind::PlayerColor), 1);

        run(&mut state, 300);
        assert_eq!(state.player.color, PlayerColor::Normal);
    }

    #[test]
    fn test_soft_item_fades_on_ground() {
        let mut state = new_state();
        let id = hit(&mut state, ThrowableKind::Greenmush, Surface::Ground);
        let events = run(&mut state, 1);
        assert!(events.contains(&GameEvent::Removed { id, fade: true }));
        assert_eq!(state.ledger.score, 0);
    }

    #[test]
    fn test_contacts_apply_in_report_order() {
        let mut state = new_state();
        let first = hit(&mut state, ThrowableKind::Banana, Surface::Ground);
        let second = hit(&mut state, ThrowableKind::Heart, Surface::Ground);
        let third = hit(&mut state, ThrowableKind::Coconut, Surface::Ground);
        let events = run(&mut state, 1);

        let removed: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Removed { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(removed, vec![first, second, third]);
        assert_eq!(state.pending_contacts(), 0);
    }

    #[test]
    fn test_unknown_throwable_is_reported_and_dropped() {
        let mut state = new_state();
        state.report_contact(ContactReport {
            throwable_id: 999,
            surface: Surface::Player,
            position: Vec2::ZERO,
        });
        let id = hit(&mut state, ThrowableKind::Banana, Surface::Player);
        let events = run(&mut state, 1);

        assert!(events.contains(&GameEvent::UnexpectedContact {
            id: Some(999),
            surface: Some(Surface::Player),
        }));
        // The next contact still applies
        assert!(events.contains(&GameEvent::Removed { id, fade: false }));
        assert_eq!(state.ledger.score, state.tuning.points.banana_caught);
    }

    #[test]
    fn test_double_report_of_same_throwable() {
        let mut state = new_state();
        let id = hit(&mut state, ThrowableKind::Banana, Surface::Ground);
        state.report_contact(ContactReport {
            throwable_id: id,
            surface: Surface::Player,
            position: Vec2::ZERO,
        });
        let events = run(&mut state, 1);
        assert_eq!(state.ledger.score, state.tuning.points.banana_missed);
        assert!(events.contains(&GameEvent::UnexpectedContact {
            id: Some(id),
            surface: Some(Surface::Player),
        }));
    }

    #[test]
    fn test_strict_mode_returns_error_and_keeps_queue() {
        let tuning = Tuning {
            strict_contacts: true,
            ..Default::default()
        };
        let mut state = GameState::new(1, tuning, WIDTH);
        state.report_raw_contact(categories::BANANA, categories::EVIL_MONKEY, 1, Vec2::ZERO);
        hit(&mut state, ThrowableKind::Banana, Surface::Player);

        let mut events = Vec::new();
        let err = tick(&mut state, &TickInput::default(), &mut events).unwrap_err();
        assert!(matches!(err, SimError::UnexpectedContact { .. }));
        assert!(events.contains(&GameEvent::UnexpectedContact {
            id: None,
            surface: None
        }));
        assert_eq!(state.pending_contacts(), 1);

        tick(&mut state, &TickInput::default(), &mut events).unwrap();
        assert_eq!(state.ledger.score, state.tuning.points.banana_caught);
    }

    #[test]
    fn test_raw_contact_resolves_through_categories() {
        let mut state = new_state();
        let item = state.spawner.throw_from(ThrowableKind::Heartnut, Vec2::new(80.0, 300.0));
        let id = item.id;
        state.throwables.push(item);
        let at = Vec2::new(80.0, 41.0);
        state.report_raw_contact(categories::GROUND, categories::HEARTNUT, id, at);
        let events = run(&mut state, 1);
        assert_eq!(spawned(&events), vec![ThrowableKind::Heart]);
    }

    #[test]
    fn test_raw_contact_with_wrong_kind_is_refused() {
        let mut state = new_state();
        let item = state.spawner.throw_from(ThrowableKind::Banana, Vec2::new(80.0, 300.0));
        let id = item.id;
        state.throwables.push(item);

        let at = Vec2::new(80.0, 40.0);
        state.report_raw_contact(categories::COCONUT, categories::GROUND, id, at);
        let events = run(&mut state, 1);

        assert_eq!(state.ledger.score, 0);
        assert!(events.contains(&GameEvent::UnexpectedContact {
            id: Some(id),
            surface: Some(Surface::Ground),
        }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Removed { .. })));

        // The banana is still in the world and resolves on a matching report
        assert!(state.throwable(id).is_some());
        state.report_raw_contact(categories::BANANA, categories::GROUND, id, at);
        run(&mut state, 1);
        assert_eq!(state.ledger.score, state.tuning.points.banana_missed);
    }

    #[test]
    fn test_strict_mode_refuses_wrong_kind() {
        let tuning = Tuning {
            strict_contacts: true,
            ..Default::default()
        };
        let mut state = GameState::new(1, tuning, WIDTH);
        let item = state.spawner.throw_from(ThrowableKind::Heart, Vec2::new(80.0, 300.0));
        let id = item.id;
        state.throwables.push(item);
        state.report_raw_contact(categories::BASKET_MAN, categories::SUPERNUT, id, Vec2::ZERO);

        let err = tick(&mut state, &TickInput::default(), &mut NullSink).unwrap_err();
        assert_eq!(
            err,
            SimError::KindMismatch {
                id,
                surface: Surface::Player,
                reported: ThrowableKind::Supernut,
                stored: ThrowableKind::Heart,
            }
        );
    }

    #[test]
    fn test_restored_state_replays_rejected_contact() {
        let mut state = new_state();
        state.report_raw_contact(categories::BANANA, categories::EVIL_MONKEY, 1, Vec2::ZERO);
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();

        let events = run(&mut restored, 1);
        assert!(events.contains(&GameEvent::UnexpectedContact {
            id: None,
            surface: None
        }));
        assert_eq!(restored.pending_contacts(), 0);
    }

    #[test]
    fn test_death_mid_tantrum_cancels_frenzy_and_tantrum_end() {
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        let mut state = GameState::new(9, tuning, WIDTH);
        raise_to(&mut state, 4);
        brink_of_level_up(&mut state);
        hit(&mut state, ThrowableKind::Banana, Surface::Player);
        let events = run(&mut state, 1);
        assert_eq!(state.monkey.current_level(), 5);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TantrumStarted { .. })));
        assert_eq!(state.timers.pending(TimerKind::FrenzyThrow), 3);

        hit(&mut state, ThrowableKind::Coconut, Surface::Player);
        let events = run(&mut state, 1);
        assert!(state.player.dead);
        assert_eq!(state.monkey.mood(), MonkeyMood::Defeated);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Window is 2.0s; run well past it so every stale deadline comes due
        let events = run(&mut state, 240);
        assert!(spawned(&events).is_empty());
        assert!(!events.contains(&GameEvent::TantrumEnded));
        assert_eq!(state.timers.pending(TimerKind::FrenzyThrow), 0);
        assert_eq!(state.timers.pending(TimerKind::TantrumEnd), 0);
        assert!(state.monkey.is_disabled());
    }

    #[test]
    fn test_disable_does_not_cancel_cooldown() {
        let mut state = new_state();
        state.monkey.disable();
        let events = run(&mut state, 200);
        assert!(spawned(&events).is_empty());
        assert!(state.monkey.can_throw(), "cooldown still fired while disabled");

        state.monkey.enable();
        let events = run(&mut state, 1);
        assert_eq!(spawned(&events).len(), 1);
    }

    #[test]
    fn test_heart_armed_by_level_three_tantrum() {
        let mut state = new_state();
        raise_to(&mut state, 2);
        brink_of_level_up(&mut state);
        hit(&mut state, ThrowableKind::Banana, Surface::Player);
        run(&mut state, 1);
        assert_eq!(state.monkey.current_level(), 3);
        assert!(state.monkey.heart_armed());

        // At most one heart comes out of this tantrum, whatever the rolls
        let events = run(&mut state, 60 * 60);
        let hearts = spawned(&events)
            .into_iter()
            .filter(|k| *k == ThrowableKind::Heart)
            .count();
        assert!(hearts <= 1);
        if hearts == 1 {
            assert!(!state.monkey.heart_armed());
        }
    }

    #[test]
    fn test_tier_tantrum_throws_a_frenzy() {
        let mut state = new_state();
        raise_to(&mut state, 4);
        brink_of_level_up(&mut state);
        hit(&mut state, ThrowableKind::Banana, Surface::Player);
        let events = run(&mut state, 1);

        assert_eq!(state.monkey.current_level(), 5);
        assert!(events.contains(&GameEvent::MusicCue { track: 2 }));
        assert_eq!(state.timers.pending(TimerKind::FrenzyThrow), 3);

        let mut during = Vec::new();
        while state.monkey.mood() == MonkeyMood::Tantrum {
            tick(&mut state, &TickInput::default(), &mut during).unwrap();
        }
        // The regular throw may resume on the tick the tantrum ends
        let end = during
            .iter()
            .position(|e| *e == GameEvent::TantrumEnded)
            .unwrap();
        let kinds = spawned(&during[..end]);
        assert_eq!(kinds.len(), 3);
        assert!(kinds
            .iter()
            .all(|k| matches!(k, ThrowableKind::Coconut | ThrowableKind::Heart)));
        assert_eq!(state.timers.pending(TimerKind::FrenzyThrow), 0);
    }

    #[test]
    fn test_player_follows_target() {
        let mut state = new_state();
        let input = TickInput {
            target_x: Some(300.0),
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &input, &mut NullSink).unwrap();
        }
        assert_eq!(state.player.x, WIDTH / 2.0 + 50.0);
    }

    #[test]
    fn test_bound_change_is_applied() {
        let mut state = new_state();
        let input = TickInput {
            bound: Some(200.0),
            ..Default::default()
        };
        for _ in 0..500 {
            tick(&mut state, &input, &mut NullSink).unwrap();
        }
        assert_eq!(state.bound, 200.0);
        assert!(state.monkey.x <= 200.0);
    }
}
