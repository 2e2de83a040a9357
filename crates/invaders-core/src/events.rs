//! Events emitted by the simulation for audio and UI feedback.

use serde::{Deserialize, Serialize};

use crate::enums::AlertLevel;

/// Audio cues for the frontend sound system. Fire-and-forget; the
/// simulation never waits on playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// The player fired a shot.
    PlayerFired,
    /// An alien was destroyed by a player shot.
    AlienDestroyed { points: u32 },
    /// A single barrier cell was destroyed.
    BarrierHit,
    /// An impact took out multiple barrier cells.
    BarrierDestroyed { cells: u32 },
    /// The player was hit.
    PlayerHit { lives_left: u32 },
    /// The formation completed a move step.
    AlienMoved,
}

/// Diagnostic alert for the UI alert queue. Carries the ambient
/// failures that must not interrupt play (persistence errors, rejected
/// config values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
