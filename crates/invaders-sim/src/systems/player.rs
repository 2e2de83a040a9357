//! Player system — movement intents, cooldown-limited fire, and the
//! hit/respawn life-cycle.
//!
//! Life states: Active → (hit, lives remain) → Respawning (hidden at
//! the spawn point) → Invulnerable (blinking) → Active. With lives
//! exhausted a hit goes straight to Dead, which is terminal for the
//! session.

use hecs::{Entity, World};

use invaders_core::components::PlayerShip;
use invaders_core::config::GameConfig;
use invaders_core::constants::*;
use invaders_core::enums::{GameOverReason, PlayerLifeState, ProjectileOwner};
use invaders_core::events::AudioEvent;
use invaders_core::types::{ticks_for_ms, Position, Velocity};

use crate::engine::GameState;
use crate::scheduler::{ScheduledAction, Scheduler};
use crate::systems::{formation, projectiles};

/// Find the player entity.
pub fn find(world: &World) -> Option<Entity> {
    let mut query = world.query::<&PlayerShip>();
    query.iter().next().map(|(entity, _)| entity)
}

/// The player's current position, if the ship exists.
pub fn position(world: &World) -> Option<Position> {
    let mut query = world.query::<(&PlayerShip, &Position)>();
    query.iter().next().map(|(_, (_, pos))| *pos)
}

/// Apply movement intents, update the invulnerability blink, and
/// handle an edge-triggered fire request. Movement keeps working while
/// the ship is hidden; only death stops it.
pub fn run(
    world: &mut World,
    config: &GameConfig,
    now: u64,
    fire_requested: bool,
    next_handle: &mut u32,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
) {
    for (_, (ship, pos)) in world.query_mut::<(&mut PlayerShip, &mut Position)>() {
        if ship.life_state == PlayerLifeState::Dead {
            continue;
        }

        let mut dx = 0.0;
        if ship.moving_left {
            dx -= config.player_speed * DT;
        }
        if ship.moving_right {
            dx += config.player_speed * DT;
        }
        pos.x = (pos.x + dx).clamp(PLAYER_HALF_WIDTH, FIELD_WIDTH - PLAYER_HALF_WIDTH);

        if ship.life_state == PlayerLifeState::Invulnerable {
            let half_periods =
                now.saturating_sub(ship.blink_start_tick) / ticks_for_ms(BLINK_INTERVAL_MS);
            ship.visible = half_periods % 2 == 0;
        }
    }

    if fire_requested {
        try_fire(world, config, now, next_handle, scheduler, audio_events);
    }
}

/// Fire one player shot unless the cooldown is running. A request on
/// cooldown — or against a saturated pool — is silently dropped.
fn try_fire(
    world: &mut World,
    config: &GameConfig,
    now: u64,
    next_handle: &mut u32,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
) {
    let Some(entity) = find(world) else {
        return;
    };

    let origin = {
        let Ok(ship) = world.get::<&PlayerShip>(entity) else {
            return;
        };
        if !ship.can_fire || ship.life_state == PlayerLifeState::Dead {
            return;
        }
        let Ok(pos) = world.get::<&Position>(entity) else {
            return;
        };
        Position::new(pos.x, pos.y - PLAYER_SHOT_OFFSET_Y)
    };

    let fired = projectiles::fire(
        world,
        next_handle,
        ProjectileOwner::Player,
        origin,
        Velocity::new(0.0, -config.player_shot_speed),
        config.max_shots_per_pool,
    );
    if !fired {
        return;
    }

    audio_events.push(AudioEvent::PlayerFired);
    if let Ok(mut ship) = world.get::<&mut PlayerShip>(entity) {
        ship.can_fire = false;
    }
    scheduler.schedule(
        now + ticks_for_ms(config.player_fire_cooldown_ms),
        ScheduledAction::ClearFireCooldown,
    );
}

/// Resolve a hit on the player. No-op while invulnerable: a single
/// physical overlap must not be counted twice inside one grace period.
pub fn player_hit(
    world: &mut World,
    state: &mut GameState,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
    now: u64,
) {
    let Some(entity) = find(world) else {
        return;
    };
    {
        let Ok(ship) = world.get::<&PlayerShip>(entity) else {
            return;
        };
        if ship.invulnerable || ship.life_state == PlayerLifeState::Dead {
            return;
        }
    }

    state.lives = state.lives.saturating_sub(1);
    audio_events.push(AudioEvent::PlayerHit {
        lives_left: state.lives,
    });

    let Ok(mut ship) = world.get::<&mut PlayerShip>(entity) else {
        return;
    };
    if state.lives == 0 {
        ship.life_state = PlayerLifeState::Dead;
        ship.visible = false;
        state.game_over_reason = Some(GameOverReason::OutOfLives);
        return;
    }

    ship.life_state = PlayerLifeState::Respawning;
    ship.visible = false;
    ship.invulnerable = true;
    drop(ship);
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        *pos = Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    }
    scheduler.schedule(
        now + ticks_for_ms(RESPAWN_DELAY_MS),
        ScheduledAction::RespawnPlayer,
    );
}

/// Complete a respawn after the hidden delay. Loss takes priority: if
/// the formation reached the invasion threshold while the player was
/// hidden, this is an invasion ending, not a respawn.
pub fn respawn_player(
    world: &mut World,
    state: &mut GameState,
    scheduler: &mut Scheduler,
    now: u64,
) {
    if formation::lowest_alien_y(world).is_some_and(|y| y >= INVASION_Y) {
        state.game_over_reason = Some(GameOverReason::Invasion);
        return;
    }

    let mut respawned = false;
    for (_, (ship, pos)) in world.query_mut::<(&mut PlayerShip, &mut Position)>() {
        if ship.life_state != PlayerLifeState::Respawning {
            continue;
        }
        *pos = Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        ship.life_state = PlayerLifeState::Invulnerable;
        ship.visible = true;
        ship.blink_start_tick = now;
        ship.can_fire = true;
        ship.moving_left = false;
        ship.moving_right = false;
        respawned = true;
    }
    if respawned {
        scheduler.schedule(
            now + ticks_for_ms(INVULNERABILITY_MS),
            ScheduledAction::EndInvulnerability,
        );
    }
}

/// End the invulnerability window.
pub fn end_invulnerability(world: &mut World) {
    for (_, ship) in world.query_mut::<&mut PlayerShip>() {
        if ship.life_state == PlayerLifeState::Invulnerable {
            ship.life_state = PlayerLifeState::Active;
            ship.invulnerable = false;
            ship.visible = true;
        }
    }
}

/// Clear the fire cooldown.
pub fn clear_fire_cooldown(world: &mut World) {
    for (_, ship) in world.query_mut::<&mut PlayerShip>() {
        ship.can_fire = true;
    }
}

/// Set a movement intent flag.
pub fn set_move_intent(world: &mut World, left: bool, active: bool) {
    for (_, ship) in world.query_mut::<&mut PlayerShip>() {
        if left {
            ship.moving_left = active;
        } else {
            ship.moving_right = active;
        }
    }
}
