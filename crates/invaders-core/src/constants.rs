//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Play field ---

/// Play field width in pixels.
pub const FIELD_WIDTH: f64 = 800.0;

/// Play field height in pixels.
pub const FIELD_HEIGHT: f64 = 600.0;

// --- Player ---

/// Player ship row (pixels from the top).
pub const PLAYER_SPAWN_Y: f64 = FIELD_HEIGHT - 50.0;

/// Horizontal center of the player spawn point.
pub const PLAYER_SPAWN_X: f64 = FIELD_WIDTH / 2.0;

/// Player horizontal speed (px/s).
pub const PLAYER_SPEED: f64 = 200.0;

/// Half the player sprite width; clamps horizontal travel.
pub const PLAYER_HALF_WIDTH: f64 = 16.0;

/// Minimum delay between player shots (ms).
pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 250;

/// Player shot speed (px/s, travels upward).
pub const PLAYER_SHOT_SPEED: f64 = 400.0;

/// Player shots spawn this far above the ship.
pub const PLAYER_SHOT_OFFSET_Y: f64 = 10.0;

/// Duration the player stays hidden after a hit (ms).
pub const RESPAWN_DELAY_MS: u64 = 2000;

/// Post-respawn invulnerability window (ms).
pub const INVULNERABILITY_MS: u64 = 2000;

/// Blink half-period while invulnerable (ms).
pub const BLINK_INTERVAL_MS: u64 = 200;

// --- Projectile pools ---

/// Maximum live projectiles per owner. Saturated fire requests are
/// silently dropped.
pub const MAX_SHOTS_PER_POOL: usize = 20;

/// Alien shot speed (px/s, travels downward).
pub const ALIEN_SHOT_SPEED: f64 = 200.0;

/// Alien shots spawn this far below the firing alien.
pub const ALIEN_SHOT_OFFSET_Y: f64 = 20.0;

// --- Formation ---

/// Formation grid rows.
pub const FORMATION_ROWS: u32 = 5;

/// Formation grid columns.
pub const FORMATION_COLS: u32 = 11;

/// Horizontal spacing between columns (px).
pub const FORMATION_COL_SPACING: f64 = 60.0;

/// Vertical spacing between rows (px).
pub const FORMATION_ROW_SPACING: f64 = 40.0;

/// Top-left alien spawn position.
pub const FORMATION_ORIGIN_X: f64 = 100.0;
pub const FORMATION_ORIGIN_Y: f64 = 150.0;

/// Horizontal distance covered by one formation step (px).
pub const ALIEN_STEP_X: f64 = 20.0;

/// Vertical drop when the formation reverses at an edge (px).
pub const ALIEN_DROP_Y: f64 = 20.0;

/// Distance from a field edge at which the formation reverses (px).
pub const FORMATION_EDGE_MARGIN: f64 = 50.0;

/// Formation rows at or below this y have reached the player: the
/// invasion loss condition.
pub const INVASION_Y: f64 = FIELD_HEIGHT - 100.0;

// --- Difficulty scaling ---

/// Delay between formation moves on wave 1 (ms).
pub const BASE_MOVE_INTERVAL_MS: u64 = 800;

/// Floor for the move delay; waves asymptotically approach it.
pub const MIN_MOVE_INTERVAL_MS: u64 = 100;

/// Per-wave multiplier applied to the move delay (< 1: faster).
pub const MOVE_INTERVAL_MULTIPLIER: f64 = 0.8;

/// Chance an alien shot is fired on each formation move, wave 1.
pub const BASE_FIRING_CHANCE: f64 = 0.08;

/// Cap on the per-move firing chance.
pub const MAX_FIRING_CHANCE: f64 = 0.25;

/// Per-wave multiplier applied to the firing chance (> 1: more fire).
pub const FIRING_CHANCE_MULTIPLIER: f64 = 1.3;

// --- Alien fire selection ---

/// Proximity score baseline for weighted shooter selection.
pub const FIRE_WEIGHT_BASE: f64 = 1000.0;

/// Vertical distance contribution to the proximity score.
pub const FIRE_WEIGHT_Y: f64 = 0.8;

/// Horizontal distance contribution to the proximity score.
pub const FIRE_WEIGHT_X: f64 = 0.2;

/// Proximity score divisor.
pub const FIRE_WEIGHT_SCALE: f64 = 100.0;

/// Minimum weight so every alien stays selectable.
pub const FIRE_WEIGHT_MIN: f64 = 1.0;

// --- Scoring ---

/// Lives at the start of a game.
pub const STARTING_LIVES: u32 = 3;

/// Hard cap on lives.
pub const MAX_LIVES: u32 = 9;

/// Score step between extra-life awards.
pub const EXTRA_LIFE_STEP: u32 = 10_000;

/// Bonus awarded for clearing a wave.
pub const WAVE_BONUS: u32 = 1000;

/// Point values by alien tier (top row worth the most).
pub const POINTS_TOP: u32 = 30;
pub const POINTS_MIDDLE: u32 = 20;
pub const POINTS_BOTTOM: u32 = 10;

// --- Wave transitions ---

/// Delay between the wave announcement and the next wave's spawn (ms).
pub const WAVE_ANNOUNCE_DELAY_MS: u64 = 2000;

// --- Barriers ---

/// Number of barrier instances across the field.
pub const BARRIER_COUNT: u32 = 4;

/// Side length of one barrier cell (px).
pub const BARRIER_CELL_SIZE: f64 = 5.0;

/// Horizontal gap between barrier instances (px).
pub const BARRIER_SPACING: f64 = 120.0;

/// Top edge of the barrier field.
pub const BARRIER_ORIGIN_Y: f64 = 450.0;

/// Cells within this radius of an impact are destroyed with it (px).
pub const BARRIER_EXPLOSION_RADIUS: f64 = 8.0;

/// Per-cell delay when despawning an explosion's cells (ms). Purely a
/// visual sequencing effect; the destroyed set is decided immediately.
pub const BARRIER_STAGGER_MS: u64 = 5;

/// Barrier cell bitmap: 1 = cell present, 0 = gap. Replicated for each
/// barrier instance; the notch at the bottom is the classic doorway.
pub const BARRIER_PATTERN: [[u8; 14]; 12] = [
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
];
