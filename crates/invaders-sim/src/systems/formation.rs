//! Formation movement system — lock-step advance of the alien grid.
//!
//! The whole grid shares one direction and one move interval. A move
//! step either translates every alien horizontally, or — once any
//! alien is inside the edge margin — reverses direction and drops the
//! entire grid in the same tick. Edge detection and the drop are
//! atomic for the formation; there are no partial drops.

use hecs::World;

use invaders_core::components::AlienInfo;
use invaders_core::constants::*;
use invaders_core::types::{ticks_for_ms, Position};

/// Shared movement state for the current formation.
#[derive(Debug, Clone, Copy)]
pub struct FormationState {
    /// +1 = rightward, -1 = leftward.
    pub direction: i32,
    /// Delay between move steps (ms). Scaled down each wave.
    pub move_interval_ms: u64,
    /// Tick of the last completed move step.
    pub last_move_tick: u64,
}

impl FormationState {
    pub fn new(move_interval_ms: u64) -> Self {
        Self {
            direction: 1,
            move_interval_ms,
            last_move_tick: 0,
        }
    }
}

/// Outcome of one formation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStep {
    /// Interval not yet elapsed, or the formation is empty.
    Idle,
    /// Horizontal translation.
    Stepped,
    /// Direction reversed, grid dropped.
    Dropped,
    /// A drop carried the lowest row past the invasion threshold.
    Invasion,
}

/// Advance the formation if its move interval has elapsed.
pub fn run(world: &mut World, state: &mut FormationState, now: u64) -> FormationStep {
    if now.saturating_sub(state.last_move_tick) < ticks_for_ms(state.move_interval_ms) {
        return FormationStep::Idle;
    }

    // One pass to find out whether anyone is at the edge in the travel
    // direction. The decision covers the whole grid.
    let mut any_alive = false;
    let mut at_edge = false;
    {
        let mut query = world.query::<(&AlienInfo, &Position)>();
        for (_, (_, pos)) in query.iter() {
            any_alive = true;
            if (state.direction > 0 && pos.x >= FIELD_WIDTH - FORMATION_EDGE_MARGIN)
                || (state.direction < 0 && pos.x <= FORMATION_EDGE_MARGIN)
            {
                at_edge = true;
            }
        }
    }
    if !any_alive {
        // Empty formation performs no movement; wave-clear disposition
        // is the caller's call.
        return FormationStep::Idle;
    }

    state.last_move_tick = now;

    if at_edge {
        state.direction = -state.direction;
        let mut lowest = f64::MIN;
        for (_, (_, pos)) in world.query_mut::<(&AlienInfo, &mut Position)>() {
            pos.y += ALIEN_DROP_Y;
            if pos.y > lowest {
                lowest = pos.y;
            }
        }
        if lowest >= INVASION_Y {
            return FormationStep::Invasion;
        }
        FormationStep::Dropped
    } else {
        let dx = ALIEN_STEP_X * state.direction as f64;
        for (_, (_, pos)) in world.query_mut::<(&AlienInfo, &mut Position)>() {
            pos.x += dx;
        }
        FormationStep::Stepped
    }
}

/// The y of the lowest alive alien, if any. Used for the invasion
/// re-check before a respawn completes.
pub fn lowest_alien_y(world: &World) -> Option<f64> {
    let mut query = world.query::<(&AlienInfo, &Position)>();
    query
        .iter()
        .map(|(_, (_, pos))| pos.y)
        .fold(None, |lowest, y| match lowest {
            Some(current) if current >= y => Some(current),
            _ => Some(y),
        })
}
