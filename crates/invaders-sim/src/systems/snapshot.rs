//! Snapshot system: queries the world and builds a complete
//! GameStateSnapshot.
//!
//! This system is read-only — it never modifies the world. Doomed
//! barrier cells stay listed until their staggered despawn fires, so
//! the render layer sees the explosion sequence.

use hecs::World;

use invaders_core::components::*;
use invaders_core::enums::GamePhase;
use invaders_core::events::{Alert, AudioEvent};
use invaders_core::state::*;
use invaders_core::types::{Position, SimTime};

use crate::engine::GameState;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    state: &GameState,
    high_score: u32,
    audio_events: Vec<AudioEvent>,
    alerts: Vec<Alert>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        score: state.score,
        lives: state.lives,
        wave: state.wave,
        high_score,
        is_transitioning_wave: state.is_transitioning_wave,
        game_over_reason: state.game_over_reason,
        player: build_player(world),
        aliens: build_aliens(world),
        player_shots: build_shots(world, invaders_core::enums::ProjectileOwner::Player),
        alien_shots: build_shots(world, invaders_core::enums::ProjectileOwner::Alien),
        barrier_cells: build_barrier_cells(world),
        audio_events,
        alerts,
    }
}

fn build_player(world: &World) -> PlayerView {
    let mut query = world.query::<(&Handle, &PlayerShip, &Position)>();
    query
        .iter()
        .next()
        .map(|(_, (handle, ship, pos))| PlayerView {
            id: handle.0,
            position: *pos,
            visible: ship.visible,
            invulnerable: ship.invulnerable,
            life_state: ship.life_state,
        })
        .unwrap_or_default()
}

fn build_aliens(world: &World) -> Vec<AlienView> {
    let mut aliens: Vec<AlienView> = world
        .query::<(&Handle, &AlienInfo, &Position)>()
        .iter()
        .map(|(_, (handle, info, pos))| AlienView {
            id: handle.0,
            position: *pos,
            row: info.row,
            col: info.col,
            tier: info.tier,
            points: info.tier.point_value(),
        })
        .collect();

    aliens.sort_by_key(|a| a.id);
    aliens
}

fn build_shots(
    world: &World,
    owner: invaders_core::enums::ProjectileOwner,
) -> Vec<ProjectileView> {
    let mut shots: Vec<ProjectileView> = world
        .query::<(&Handle, &Projectile, &Position)>()
        .iter()
        .filter(|(_, (_, projectile, _))| projectile.owner == owner)
        .map(|(_, (handle, projectile, pos))| ProjectileView {
            id: handle.0,
            position: *pos,
            owner: projectile.owner,
            active: projectile.active,
        })
        .collect();

    shots.sort_by_key(|s| s.id);
    shots
}

fn build_barrier_cells(world: &World) -> Vec<BarrierCellView> {
    let mut cells: Vec<BarrierCellView> = world
        .query::<(&Handle, &BarrierCell, &Position)>()
        .iter()
        .map(|(_, (handle, cell, pos))| BarrierCellView {
            id: handle.0,
            position: *pos,
            barrier_index: cell.barrier_index,
        })
        .collect();

    cells.sort_by_key(|c| c.id);
    cells
}
