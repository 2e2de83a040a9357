//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the engine state
//! they need. They do not own state; ordering is fixed by the engine:
//! input → formation/projectile advancement → collision resolution →
//! wave-clear check.

pub mod alien_fire;
pub mod combat;
pub mod formation;
pub mod player;
pub mod projectiles;
pub mod snapshot;
