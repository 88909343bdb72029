//! Presentation events
//!
//! The simulation never talks to audio, labels or sprites directly. It
//! publishes [`GameEvent`]s to whatever [`EventSink`] the host injects.

use glam::Vec2;
use serde::Serialize;

use super::collision::{Decoration, PlayerReaction, PointsPopup, Surface};
use super::state::PlayerColor;
use super::throwable::ThrowableKind;

/// Something the presentation layer may want to show or play
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Difficulty went up (new `current_level`)
    LevelUp { level: u32 },
    /// Switch background music; track 1 plays from the start
    MusicCue { track: u32 },
    TantrumStarted { anger_cue: u32, secs: f32 },
    TantrumEnded,
    /// A new throwable entered the world
    Spawned {
        id: u32,
        kind: ThrowableKind,
        position: Vec2,
        force: Vec2,
    },
    /// A throwable left the world
    Removed { id: u32, fade: bool },
    ScoreChanged { score: i64 },
    LivesChanged { lives: u8 },
    PointsPopup(PointsPopup),
    Decoration(Decoration),
    PlayerReaction(PlayerReaction),
    PlayerState {
        dead: bool,
        invincible: bool,
        color: PlayerColor,
    },
    /// A contact was dropped because it matched nothing the world knows
    UnexpectedContact { id: Option<u32>, surface: Option<Surface> },
    GameOver { score: i64, level: u32 },
}

/// Receiver for presentation events
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: GameEvent) {}
}

/// Logs every event at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
    }
}

/// Background track for a level, if that level starts a new one
pub fn music_track_for_level(level: u32) -> Option<u32> {
    match level {
        5 => Some(2),
        10 => Some(3),
        15 => Some(4),
        20 => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_thresholds() {
        let cues: Vec<(u32, u32)> = (0..30)
            .filter_map(|l| music_track_for_level(l).map(|t| (l, t)))
            .collect();
        assert_eq!(cues, vec![(5, 2), (10, 3), (15, 4), (20, 5)]);
    }

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.publish(GameEvent::LevelUp { level: 1 });
        sink.publish(GameEvent::TantrumEnded);
        assert_eq!(sink, vec![GameEvent::LevelUp { level: 1 }, GameEvent::TantrumEnded]);
    }

    #[test]
    fn test_events_serialize() {
        let json = serde_json::to_string(&GameEvent::ScoreChanged { score: -3 }).unwrap();
        assert_eq!(json, r#"{"ScoreChanged":{"score":-3}}"#);
    }
}
