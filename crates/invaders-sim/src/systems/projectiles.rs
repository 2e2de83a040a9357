//! Projectile pool system — bounded, recycled shot slots per owner.
//!
//! Slots are never despawned while the pool lives; deactivated shots
//! are reused by the next fire request. A saturated pool silently
//! drops the request — the cap is a deliberate rate limiter, not an
//! error.

use hecs::World;

use invaders_core::components::{Handle, Projectile};
use invaders_core::constants::{DT, FIELD_HEIGHT};
use invaders_core::enums::ProjectileOwner;
use invaders_core::types::{Position, Velocity};

/// Fire a shot for `owner` from `origin`. Reuses the first inactive
/// slot; allocates a new one while the pool is under `max_pool`.
/// Returns whether a shot actually went out.
pub fn fire(
    world: &mut World,
    next_handle: &mut u32,
    owner: ProjectileOwner,
    origin: Position,
    velocity: Velocity,
    max_pool: usize,
) -> bool {
    let mut reusable = None;
    let mut pooled = 0usize;
    {
        let mut query = world.query::<&Projectile>();
        for (entity, projectile) in query.iter() {
            if projectile.owner != owner {
                continue;
            }
            pooled += 1;
            if !projectile.active && reusable.is_none() {
                reusable = Some(entity);
            }
        }
    }

    if let Some(entity) = reusable {
        if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
            projectile.active = true;
        }
        if let Ok(mut position) = world.get::<&mut Position>(entity) {
            *position = origin;
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = velocity;
        }
        return true;
    }

    if pooled >= max_pool {
        return false;
    }

    let handle = Handle(*next_handle);
    *next_handle += 1;
    world.spawn((handle, Projectile { owner, active: true }, origin, velocity));
    true
}

/// Advance active shots and deactivate any that leave the field:
/// player shots off the top, alien shots off the bottom.
pub fn run(world: &mut World) {
    for (_, (projectile, pos, vel)) in
        world.query_mut::<(&mut Projectile, &mut Position, &Velocity)>()
    {
        if !projectile.active {
            continue;
        }
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;

        let off_field = match projectile.owner {
            ProjectileOwner::Player => pos.y < 0.0,
            ProjectileOwner::Alien => pos.y > FIELD_HEIGHT,
        };
        if off_field {
            projectile.active = false;
        }
    }
}
