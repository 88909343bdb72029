//! Simulation error types.
//!
//! Contact handling reports problems through these types instead of aborting,
//! so a malformed event from the physics layer costs one contact, not the run.

use std::fmt;

use crate::sim::collision::Surface;
use crate::sim::throwable::ThrowableKind;

/// Top-level error enum for the banana catcher simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A contact pair whose category bitmasks match no throwable/surface pairing.
    UnexpectedContact {
        /// Category bitmask of the first body.
        category_a: u32,
        /// Category bitmask of the second body.
        category_b: u32,
    },

    /// A contact referenced a throwable the world does not own (already
    /// resolved, or never spawned).
    UnknownThrowable {
        /// Throwable id carried by the contact report.
        id: u32,
        /// What the throwable supposedly hit.
        surface: Surface,
    },

    /// The physics layer classified the body as one kind, but the world holds
    /// a different kind under that id.
    KindMismatch {
        /// Throwable id carried by the contact report.
        id: u32,
        /// What the throwable hit.
        surface: Surface,
        /// Kind read from the contact's category bits.
        reported: ThrowableKind,
        /// Kind the world spawned under `id`.
        stored: ThrowableKind,
    },

    /// A tuning value is outside its safe operating range.
    InvalidTuning {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// Tuning JSON could not be parsed.
    TuningParse(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnexpectedContact {
                category_a,
                category_b,
            } => write!(
                f,
                "unexpected contact between categories {:#06x} and {:#06x}",
                category_a, category_b
            ),
            SimError::UnknownThrowable { id, surface } => {
                write!(f, "unknown throwable #{} hit {}", id, surface)
            }
            SimError::KindMismatch {
                id,
                surface,
                reported,
                stored,
            } => write!(
                f,
                "{} #{} hit {}, but #{} is a {}",
                reported.name(),
                id,
                surface,
                id,
                stored.name()
            ),
            SimError::InvalidTuning {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "tuning '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::TuningParse(msg) => write!(f, "failed to parse tuning: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
