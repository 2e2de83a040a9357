//! Game state snapshot — the complete visible state sent to the frontend each tick.
//!
//! Every view carries the entity's stable handle; the render layer
//! diffs consecutive snapshots by id to create, move, show/hide, and
//! destroy its bodies, and reports overlaps back using the same ids.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Alert, AudioEvent};
use crate::types::{Position, SimTime};

/// Complete game state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub wave: u32,
    pub high_score: u32,
    /// Set between a wave being cleared and the next wave spawning.
    pub is_transitioning_wave: bool,
    /// Set once the session has ended, with the ending kind.
    pub game_over_reason: Option<GameOverReason>,
    pub player: PlayerView,
    pub aliens: Vec<AlienView>,
    pub player_shots: Vec<ProjectileView>,
    pub alien_shots: Vec<ProjectileView>,
    pub barrier_cells: Vec<BarrierCellView>,
    pub audio_events: Vec<AudioEvent>,
    pub alerts: Vec<Alert>,
}

/// The player ship for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u32,
    pub position: Position,
    pub visible: bool,
    pub invulnerable: bool,
    pub life_state: PlayerLifeState,
}

/// One alien for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienView {
    pub id: u32,
    pub position: Position,
    pub row: u32,
    pub col: u32,
    pub tier: AlienTier,
    pub points: u32,
}

/// One pooled projectile. Inactive slots are included so the render
/// layer can hide rather than destroy them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub position: Position,
    pub owner: ProjectileOwner,
    pub active: bool,
}

/// One live barrier cell. Destroyed cells simply drop out of the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrierCellView {
    pub id: u32,
    pub position: Position,
    pub barrier_index: u32,
}
