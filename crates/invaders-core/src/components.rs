//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Stable identity exposed to the host render/physics layer.
/// Snapshot views and overlap events refer to entities by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(pub u32);

/// One alien in the formation grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlienInfo {
    /// Grid row at spawn (0 = top).
    pub row: u32,
    /// Grid column at spawn (0 = leftmost).
    pub col: u32,
    /// Scoring tier, fixed at spawn from the row.
    pub tier: AlienTier,
}

/// A pooled projectile. Inactive slots are recycled, never despawned
/// while the pool lives.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: ProjectileOwner,
    pub active: bool,
}

/// One destructible barrier cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BarrierCell {
    /// Which barrier instance this cell belongs to.
    pub barrier_index: u32,
    /// Set the moment the cell is claimed by an explosion. Doomed cells
    /// no longer participate in gameplay; their despawn may lag a few
    /// ticks behind for the visual stagger.
    pub doomed: bool,
}

/// The player ship. One per session; only its fields change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip {
    pub life_state: PlayerLifeState,
    /// Whether the render layer should draw the ship.
    pub visible: bool,
    /// Re-entrancy guard: hits are no-ops while set.
    pub invulnerable: bool,
    /// Cleared while the fire cooldown runs.
    pub can_fire: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Tick at which the current blink cycle began.
    pub blink_start_tick: u64,
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self {
            life_state: PlayerLifeState::Active,
            visible: true,
            invulnerable: false,
            can_fire: true,
            moving_left: false,
            moving_right: false,
            blink_start_tick: 0,
        }
    }
}
