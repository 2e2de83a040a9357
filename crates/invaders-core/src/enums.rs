//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Visual/scoring tier of an alien, selected by formation row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienTier {
    /// Top row: octopus, highest value.
    Top,
    /// Middle rows: crab.
    Middle,
    /// Bottom rows: squid, lowest value.
    #[default]
    Bottom,
}

impl AlienTier {
    /// Tier for a formation row. Rows beyond the mapped range take the
    /// lowest-value tier.
    pub fn for_row(row: u32) -> Self {
        match row {
            0 => AlienTier::Top,
            1 | 2 => AlienTier::Middle,
            _ => AlienTier::Bottom,
        }
    }

    /// Points awarded for destroying an alien of this tier.
    pub fn point_value(self) -> u32 {
        match self {
            AlienTier::Top => crate::constants::POINTS_TOP,
            AlienTier::Middle => crate::constants::POINTS_MIDDLE,
            AlienTier::Bottom => crate::constants::POINTS_BOTTOM,
        }
    }
}

/// Which side fired a projectile. Determines travel direction and which
/// screen edge deactivates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Alien,
}

/// Player life-cycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerLifeState {
    /// Visible, movable, hittable.
    #[default]
    Active,
    /// Hidden at the spawn point, waiting out the respawn delay.
    Respawning,
    /// Visible and blinking; hits are ignored.
    Invulnerable,
    /// Out of lives. Terminal for the session.
    Dead,
}

/// How the game ended. Display-only; both endings share the same
/// scoring and high-score path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    OutOfLives,
    Invasion,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
