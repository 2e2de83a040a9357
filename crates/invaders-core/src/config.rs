//! Runtime tuning configuration.
//!
//! Every numeric policy knob lives here with its default drawn from
//! `constants`. Config documents are partial: fields missing from the
//! JSON keep their defaults, and an unreadable document falls back to
//! the defaults wholesale. A bad value never halts a session.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Tunable game parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for determinism. Same seed + same inputs = same game.
    pub seed: u64,

    // --- Scoring ---
    pub starting_lives: u32,
    pub max_lives: u32,
    pub extra_life_step: u32,
    pub wave_bonus: u32,

    // --- Difficulty ---
    pub base_firing_chance: f64,
    pub max_firing_chance: f64,
    pub firing_chance_multiplier: f64,
    pub base_move_interval_ms: u64,
    pub min_move_interval_ms: u64,
    pub move_interval_multiplier: f64,

    // --- Player ---
    pub player_speed: f64,
    pub player_fire_cooldown_ms: u64,
    pub player_shot_speed: f64,

    // --- Projectiles ---
    pub alien_shot_speed: f64,
    pub max_shots_per_pool: usize,

    // --- Formation ---
    pub formation_rows: u32,
    pub formation_cols: u32,
    pub formation_col_spacing: f64,
    pub formation_row_spacing: f64,
    pub formation_origin_x: f64,
    pub formation_origin_y: f64,

    // --- Barriers ---
    pub barrier_count: u32,
    pub barrier_origin_y: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_lives: STARTING_LIVES,
            max_lives: MAX_LIVES,
            extra_life_step: EXTRA_LIFE_STEP,
            wave_bonus: WAVE_BONUS,
            base_firing_chance: BASE_FIRING_CHANCE,
            max_firing_chance: MAX_FIRING_CHANCE,
            firing_chance_multiplier: FIRING_CHANCE_MULTIPLIER,
            base_move_interval_ms: BASE_MOVE_INTERVAL_MS,
            min_move_interval_ms: MIN_MOVE_INTERVAL_MS,
            move_interval_multiplier: MOVE_INTERVAL_MULTIPLIER,
            player_speed: PLAYER_SPEED,
            player_fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            player_shot_speed: PLAYER_SHOT_SPEED,
            alien_shot_speed: ALIEN_SHOT_SPEED,
            max_shots_per_pool: MAX_SHOTS_PER_POOL,
            formation_rows: FORMATION_ROWS,
            formation_cols: FORMATION_COLS,
            formation_col_spacing: FORMATION_COL_SPACING,
            formation_row_spacing: FORMATION_ROW_SPACING,
            formation_origin_x: FORMATION_ORIGIN_X,
            formation_origin_y: FORMATION_ORIGIN_Y,
            barrier_count: BARRIER_COUNT,
            barrier_origin_y: BARRIER_ORIGIN_Y,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON document. Unreadable input
    /// yields the defaults plus a message describing the rejection.
    pub fn from_json(raw: &str) -> (Self, Vec<String>) {
        match serde_json::from_str::<GameConfig>(raw) {
            Ok(config) => config.validated(),
            Err(err) => (
                Self::default(),
                vec![format!("config rejected, using defaults: {err}")],
            ),
        }
    }

    /// Clamp out-of-range values back to their defaults, reporting each
    /// correction. The scaling multipliers must keep difficulty
    /// monotonic and bounded; a chance must be a probability.
    pub fn validated(mut self) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut corrections = Vec::new();

        if !(0.0..1.0).contains(&self.move_interval_multiplier) {
            corrections.push(format!(
                "move_interval_multiplier {} out of (0, 1), using {}",
                self.move_interval_multiplier, defaults.move_interval_multiplier
            ));
            self.move_interval_multiplier = defaults.move_interval_multiplier;
        }
        if self.firing_chance_multiplier < 1.0 {
            corrections.push(format!(
                "firing_chance_multiplier {} below 1, using {}",
                self.firing_chance_multiplier, defaults.firing_chance_multiplier
            ));
            self.firing_chance_multiplier = defaults.firing_chance_multiplier;
        }
        if !(0.0..=1.0).contains(&self.base_firing_chance) {
            corrections.push(format!(
                "base_firing_chance {} not a probability, using {}",
                self.base_firing_chance, defaults.base_firing_chance
            ));
            self.base_firing_chance = defaults.base_firing_chance;
        }
        if !(0.0..=1.0).contains(&self.max_firing_chance) {
            corrections.push(format!(
                "max_firing_chance {} not a probability, using {}",
                self.max_firing_chance, defaults.max_firing_chance
            ));
            self.max_firing_chance = defaults.max_firing_chance;
        }
        if self.min_move_interval_ms == 0 || self.min_move_interval_ms > self.base_move_interval_ms
        {
            corrections.push(format!(
                "min_move_interval_ms {} incompatible with base {}, using {}/{}",
                self.min_move_interval_ms,
                self.base_move_interval_ms,
                defaults.min_move_interval_ms,
                defaults.base_move_interval_ms
            ));
            self.min_move_interval_ms = defaults.min_move_interval_ms;
            self.base_move_interval_ms = defaults.base_move_interval_ms;
        }
        if self.formation_rows == 0 || self.formation_cols == 0 {
            corrections.push(format!(
                "empty formation {}x{}, using {}x{}",
                self.formation_rows, self.formation_cols, defaults.formation_rows,
                defaults.formation_cols
            ));
            self.formation_rows = defaults.formation_rows;
            self.formation_cols = defaults.formation_cols;
        }
        if self.extra_life_step == 0 {
            corrections.push(format!(
                "extra_life_step 0, using {}",
                defaults.extra_life_step
            ));
            self.extra_life_step = defaults.extra_life_step;
        }
        if self.max_shots_per_pool == 0 {
            corrections.push(format!(
                "max_shots_per_pool 0, using {}",
                defaults.max_shots_per_pool
            ));
            self.max_shots_per_pool = defaults.max_shots_per_pool;
        }

        (self, corrections)
    }
}
