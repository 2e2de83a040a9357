//! Alien fire selection — proximity-weighted shooter choice.
//!
//! Pure selection functions plus the system that draws against the
//! wave's firing chance on each formation move step. Aliens nearer the
//! player's position (vertical distance counting most) are more likely
//! to take the shot.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use invaders_core::components::AlienInfo;
use invaders_core::config::GameConfig;
use invaders_core::constants::*;
use invaders_core::enums::ProjectileOwner;
use invaders_core::types::{Position, Velocity};

use crate::systems::projectiles;

/// Selection weight for one alien against the player's position.
/// Vertical distance dominates; every alien keeps a minimum weight so
/// the whole grid stays selectable.
pub fn proximity_weight(alien: Position, player: Position) -> f64 {
    let score = FIRE_WEIGHT_BASE
        - (FIRE_WEIGHT_Y * (player.y - alien.y).abs() + FIRE_WEIGHT_X * (player.x - alien.x).abs());
    (score / FIRE_WEIGHT_SCALE).max(FIRE_WEIGHT_MIN)
}

/// Pick a shooter index by weighted sampling. Falls back to a uniform
/// draw if the weighted walk fails to land in a bucket — which correct
/// floating accumulation never produces, but the guard stays.
pub fn select_shooter(
    rng: &mut ChaCha8Rng,
    positions: &[Position],
    player: Position,
) -> Option<usize> {
    if positions.is_empty() {
        return None;
    }

    let weights: Vec<f64> = positions
        .iter()
        .map(|pos| proximity_weight(*pos, player))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut draw = rng.gen::<f64>() * total;
    for (index, weight) in weights.iter().enumerate() {
        draw -= weight;
        if draw <= 0.0 {
            return Some(index);
        }
    }

    Some(rng.gen_range(0..positions.len()))
}

/// Draw against the current firing chance; on success, pick a shooter
/// and fire an alien shot from just below it.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    firing_chance: f64,
    player_pos: Position,
    next_handle: &mut u32,
    config: &GameConfig,
) {
    if rng.gen::<f64>() >= firing_chance {
        return;
    }

    let positions: Vec<Position> = {
        let mut query = world.query::<(&AlienInfo, &Position)>();
        query.iter().map(|(_, (_, pos))| *pos).collect()
    };

    let Some(index) = select_shooter(rng, &positions, player_pos) else {
        return;
    };

    let origin = Position::new(positions[index].x, positions[index].y + ALIEN_SHOT_OFFSET_Y);
    projectiles::fire(
        world,
        next_handle,
        ProjectileOwner::Alien,
        origin,
        Velocity::new(0.0, config.alien_shot_speed),
        config.max_shots_per_pool,
    );
}
