//! Simulation engine for INVADERS.
//!
//! Owns the hecs world, runs systems in a fixed per-tick order, and
//! produces GameStateSnapshots for the frontend. Completely headless
//! (no Tauri dependency), enabling deterministic testing.

pub mod engine;
pub mod scheduler;
pub mod systems;
pub mod world_setup;

pub use engine::GameEngine;
pub use invaders_core as core;

#[cfg(test)]
mod tests;
