//! Player commands and host physics events sent into the simulation.
//!
//! Both are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions, device-agnostic. Move intents are
/// level-triggered (pressed/released); `Fire` is edge-triggered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Session control ---
    /// Start a new game from the menu or the game-over screen.
    StartGame,
    /// Return to the menu from the game-over screen.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,

    // --- Per-tick intent ---
    /// Begin or end leftward movement.
    SetMoveLeft { active: bool },
    /// Begin or end rightward movement.
    SetMoveRight { active: bool },
    /// Request one shot. Silently ignored while the cooldown runs.
    Fire,
}

/// An overlap reported by the host's collision broad-phase, keyed by
/// the stable handles carried in snapshot views. The pair is unordered;
/// the combat system classifies both sides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverlapEvent {
    pub a: u32,
    pub b: u32,
}
