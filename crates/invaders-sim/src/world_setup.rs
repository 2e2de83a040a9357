//! Entity spawn factories for setting up the play field.
//!
//! Creates the player ship, alien formation grids, and barrier cell
//! fields with appropriate component bundles. Everything visible to
//! the host gets a stable `Handle` at spawn.

use hecs::{Entity, World};

use invaders_core::components::*;
use invaders_core::config::GameConfig;
use invaders_core::constants::*;
use invaders_core::enums::AlienTier;
use invaders_core::types::Position;

/// Look up an entity by the stable handle the host uses.
/// Returns None for ids that never existed or have been despawned.
pub fn find_by_handle(world: &World, id: u32) -> Option<Entity> {
    let mut query = world.query::<&Handle>();
    query
        .iter()
        .find(|(_, handle)| handle.0 == id)
        .map(|(entity, _)| entity)
}

fn next(next_handle: &mut u32) -> Handle {
    let handle = Handle(*next_handle);
    *next_handle += 1;
    handle
}

/// Spawn the player ship at the spawn point.
pub fn spawn_player(world: &mut World, next_handle: &mut u32) -> Entity {
    world.spawn((
        next(next_handle),
        PlayerShip::default(),
        Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
    ))
}

/// Spawn a full formation grid. Row index selects the scoring tier.
/// Returns the number of aliens spawned.
pub fn spawn_formation(world: &mut World, next_handle: &mut u32, config: &GameConfig) -> u32 {
    let mut count = 0;
    for row in 0..config.formation_rows {
        for col in 0..config.formation_cols {
            let x = config.formation_origin_x + col as f64 * config.formation_col_spacing;
            let y = config.formation_origin_y + row as f64 * config.formation_row_spacing;
            world.spawn((
                next(next_handle),
                AlienInfo {
                    row,
                    col,
                    tier: AlienTier::for_row(row),
                },
                Position::new(x, y),
            ));
            count += 1;
        }
    }
    count
}

/// Spawn the barrier field: `barrier_count` copies of the cell bitmap,
/// centered horizontally as a group. Returns the number of cells.
pub fn spawn_barriers(world: &mut World, next_handle: &mut u32, config: &GameConfig) -> u32 {
    let pattern_width = BARRIER_PATTERN[0].len() as f64 * BARRIER_CELL_SIZE;
    let count = config.barrier_count as f64;
    let total_width = count * pattern_width + (count - 1.0) * BARRIER_SPACING;
    let start_x = (FIELD_WIDTH - total_width) / 2.0;

    let mut cells = 0;
    for index in 0..config.barrier_count {
        let barrier_x = start_x + index as f64 * (pattern_width + BARRIER_SPACING);
        for (cy, row) in BARRIER_PATTERN.iter().enumerate() {
            for (cx, &present) in row.iter().enumerate() {
                if present == 0 {
                    continue;
                }
                let x = barrier_x + cx as f64 * BARRIER_CELL_SIZE;
                let y = config.barrier_origin_y + cy as f64 * BARRIER_CELL_SIZE;
                world.spawn((
                    next(next_handle),
                    BarrierCell {
                        barrier_index: index,
                        doomed: false,
                    },
                    Position::new(x, y),
                ));
                cells += 1;
            }
        }
    }
    cells
}

/// Despawn the per-wave entities: the alien formation and the barrier
/// field. Projectile pools and the player persist across waves.
pub fn clear_wave_entities(world: &mut World) {
    let mut doomed: Vec<Entity> = Vec::new();
    for (entity, _) in world.query_mut::<&AlienInfo>() {
        doomed.push(entity);
    }
    for (entity, _) in world.query_mut::<&BarrierCell>() {
        doomed.push(entity);
    }
    for entity in doomed {
        let _ = world.despawn(entity);
    }
}

/// Despawn everything for a fresh session.
pub fn clear_session(world: &mut World) {
    world.clear();
}
