//! Combat resolution — turns host overlap reports into state changes.
//!
//! The host's broad-phase reports overlapping handle pairs; this
//! system classifies both sides and applies the matching rule. Every
//! handler is idempotent: overlaps are queued against positions from
//! the previous tick, so events routinely arrive for shots already
//! deactivated or entities already removed by an earlier event in the
//! same drain. Those are ignored without error.

use hecs::{Entity, World};

use invaders_core::commands::OverlapEvent;
use invaders_core::components::{AlienInfo, BarrierCell, Handle, PlayerShip, Projectile};
use invaders_core::config::GameConfig;
use invaders_core::constants::*;
use invaders_core::enums::ProjectileOwner;
use invaders_core::events::AudioEvent;
use invaders_core::types::Position;

use crate::engine::GameState;
use crate::scheduler::{ScheduledAction, Scheduler};
use crate::systems::player;
use crate::world_setup;

/// What a handle resolved to.
#[derive(Debug, Clone, Copy)]
enum Body {
    PlayerShot(Entity),
    AlienShot(Entity),
    Alien(Entity),
    Barrier(Entity),
    Player,
}

fn classify(world: &World, id: u32) -> Option<Body> {
    let entity = world_setup::find_by_handle(world, id)?;
    if let Ok(projectile) = world.get::<&Projectile>(entity) {
        return Some(match projectile.owner {
            ProjectileOwner::Player => Body::PlayerShot(entity),
            ProjectileOwner::Alien => Body::AlienShot(entity),
        });
    }
    if world.get::<&AlienInfo>(entity).is_ok() {
        return Some(Body::Alien(entity));
    }
    if world.get::<&BarrierCell>(entity).is_ok() {
        return Some(Body::Barrier(entity));
    }
    if world.get::<&PlayerShip>(entity).is_ok() {
        return Some(Body::Player);
    }
    None
}

/// Resolve one tick's worth of overlap events, in arrival order.
pub fn run(
    world: &mut World,
    events: &[OverlapEvent],
    state: &mut GameState,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
    config: &GameConfig,
    now: u64,
) {
    use Body::*;

    for event in events {
        // Classified per event: an earlier event in this drain may have
        // removed either side.
        let (Some(a), Some(b)) = (classify(world, event.a), classify(world, event.b)) else {
            continue;
        };

        match (a, b) {
            (PlayerShot(shot), Alien(alien)) | (Alien(alien), PlayerShot(shot)) => {
                shot_hit_alien(world, state, audio_events, config, shot, alien);
            }
            (PlayerShot(shot), Barrier(cell))
            | (Barrier(cell), PlayerShot(shot))
            | (AlienShot(shot), Barrier(cell))
            | (Barrier(cell), AlienShot(shot)) => {
                shot_hit_barrier(world, scheduler, audio_events, now, shot, cell);
            }
            (AlienShot(shot), Player) | (Player, AlienShot(shot)) => {
                alien_shot_hit_player(world, state, scheduler, audio_events, shot, now);
            }
            (Alien(_), Player) | (Player, Alien(_)) => {
                player::player_hit(world, state, scheduler, audio_events, now);
            }
            // Pairs with no combat rule (shot × shot, alien × alien,
            // alien × barrier, ...) are not ours to resolve.
            _ => {}
        }
    }
}

/// Player shot destroys an alien and scores its tier value.
fn shot_hit_alien(
    world: &mut World,
    state: &mut GameState,
    audio_events: &mut Vec<AudioEvent>,
    config: &GameConfig,
    shot: Entity,
    alien: Entity,
) {
    let points = match world.get::<&AlienInfo>(alien) {
        Ok(info) => info.tier.point_value(),
        Err(_) => return,
    };
    if !deactivate_shot(world, shot) {
        return;
    }

    let _ = world.despawn(alien);
    state.add_score(points, config.extra_life_step, config.max_lives);
    audio_events.push(AudioEvent::AlienDestroyed { points });
}

/// Any shot destroys the struck barrier cell plus every live cell
/// within the explosion radius. The destroyed set is decided
/// immediately; despawns are staggered purely for visual sequencing.
fn shot_hit_barrier(
    world: &mut World,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
    now: u64,
    shot: Entity,
    cell: Entity,
) {
    let impact = {
        let Ok(struck) = world.get::<&BarrierCell>(cell) else {
            return;
        };
        if struck.doomed {
            return;
        }
        let Ok(pos) = world.get::<&Position>(cell) else {
            return;
        };
        *pos
    };
    if !deactivate_shot(world, shot) {
        return;
    }

    let mut destroyed: Vec<(Entity, u32)> = Vec::new();
    {
        let mut query = world.query::<(&BarrierCell, &Position, &Handle)>();
        for (entity, (barrier_cell, pos, handle)) in query.iter() {
            if barrier_cell.doomed {
                continue;
            }
            // The struck cell always goes, radius or not.
            if entity == cell || impact.distance_to(pos) <= BARRIER_EXPLOSION_RADIUS {
                destroyed.push((entity, handle.0));
            }
        }
    }

    for (index, (entity, handle)) in destroyed.iter().enumerate() {
        if let Ok(mut barrier_cell) = world.get::<&mut BarrierCell>(*entity) {
            barrier_cell.doomed = true;
        }
        scheduler.schedule(
            now + ticks_for_stagger(index),
            ScheduledAction::DespawnBarrierCell(*handle),
        );
    }

    let cells = destroyed.len() as u32;
    if cells > 1 {
        audio_events.push(AudioEvent::BarrierDestroyed { cells });
    } else {
        audio_events.push(AudioEvent::BarrierHit);
    }
}

fn ticks_for_stagger(index: usize) -> u64 {
    invaders_core::types::ticks_for_ms(index as u64 * BARRIER_STAGGER_MS)
}

/// Alien shot hits the player: spend the shot, then route to the
/// shared player-hit procedure.
fn alien_shot_hit_player(
    world: &mut World,
    state: &mut GameState,
    scheduler: &mut Scheduler,
    audio_events: &mut Vec<AudioEvent>,
    shot: Entity,
    now: u64,
) {
    if !deactivate_shot(world, shot) {
        return;
    }
    player::player_hit(world, state, scheduler, audio_events, now);
}

/// Deactivate a shot, returning false if it was already inactive — the
/// guard that makes every handler safe against duplicate events.
fn deactivate_shot(world: &mut World, shot: Entity) -> bool {
    match world.get::<&mut Projectile>(shot) {
        Ok(mut projectile) if projectile.active => {
            projectile.active = false;
            true
        }
        _ => false,
    }
}
