//! Tick-based deadlines
//!
//! Timers are plain records checked once per tick. Nothing runs off-thread, so
//! a deadline always fires between two ticks in a fixed `(due_tick, seq)` order.

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SEC;

/// What happens when a deadline comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Monkey may throw again
    ThrowCooldown,
    /// One coconut of a tantrum frenzy
    FrenzyThrow,
    /// Tantrum window over, monkey resumes patrol
    TantrumEnd,
    /// Player invincibility (after an ouch) wears off
    PlayerInvincibility,
    /// Green/purple player colour wears off
    PlayerColor,
}

/// A scheduled deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub due_tick: u64,
    /// Insertion order, breaks ties between deadlines due on the same tick
    pub seq: u64,
    pub kind: TimerKind,
}

/// Arena of pending deadlines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    entries: Vec<Deadline>,
    next_seq: u64,
}

/// Convert a duration to whole ticks (at least one, so nothing fires on the tick that scheduled it)
pub fn secs_to_ticks(secs: f32) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 1;
    }
    // 1e-3 absorbs float noise (1.0s is 60 ticks)
    ((secs * TICKS_PER_SEC - 1e-3).ceil() as u64).max(1)
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay_ticks` after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, kind: TimerKind) -> Deadline {
        let deadline = Deadline {
            due_tick: now + delay_ticks.max(1),
            seq: self.next_seq,
            kind,
        };
        self.next_seq += 1;
        self.entries.push(deadline);
        deadline
    }

    /// Schedule `kind` to fire `secs` seconds after `now`
    pub fn schedule_secs(&mut self, now: u64, secs: f32, kind: TimerKind) -> Deadline {
        self.schedule(now, secs_to_ticks(secs), kind)
    }

    /// Drop every pending deadline of `kind`, returning how many were removed
    pub fn cancel(&mut self, kind: TimerKind) -> usize {
        let before = self.entries.len();
        self.entries.retain(|d| d.kind != kind);
        before - self.entries.len()
    }

    /// Replace any pending `kind` deadline with a fresh one
    pub fn reschedule_secs(&mut self, now: u64, secs: f32, kind: TimerKind) -> Deadline {
        self.cancel(kind);
        self.schedule_secs(now, secs, kind)
    }

    /// Remove and return the earliest deadline due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<Deadline> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, d)| d.due_tick <= now)
            .min_by_key(|(_, d)| (d.due_tick, d.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx))
    }

    /// Number of pending deadlines of `kind`
    pub fn pending(&self, kind: TimerKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
