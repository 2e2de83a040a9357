//! INVADERS Tauri application.
//!
//! This crate wires the headless simulation to the desktop shell and
//! exposes it to the frontend via Tauri IPC commands and events. The
//! frontend renders from snapshots, runs the collision broad-phase,
//! and reports overlaps back by handle.

pub mod game_loop;
pub mod highscore;
pub mod ipc;
pub mod state;

pub use invaders_core as core;
