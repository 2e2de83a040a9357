//! Game engine — the core of the game.
//!
//! `GameEngine` owns the hecs world, processes player commands and
//! host overlap events, runs all systems in a fixed order, and
//! produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing; the HUD and high-score collaborators are
//! injected at construction.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use invaders_core::commands::{OverlapEvent, PlayerCommand};
use invaders_core::components::AlienInfo;
use invaders_core::config::GameConfig;
use invaders_core::constants::{PLAYER_SPAWN_X, PLAYER_SPAWN_Y, WAVE_ANNOUNCE_DELAY_MS};
use invaders_core::enums::{AlertLevel, GameOverReason, GamePhase};
use invaders_core::events::{Alert, AudioEvent};
use invaders_core::state::GameStateSnapshot;
use invaders_core::traits::{HighScoreStore, Hud, MemoryHighScoreStore, NullHud};
use invaders_core::types::{ticks_for_ms, Position, SimTime};

use crate::scheduler::{ScheduledAction, Scheduler};
use crate::systems;
use crate::systems::formation::{FormationState, FormationStep};
use crate::world_setup;

/// Wave/score state owned exclusively by the engine and mutated only
/// through its methods and the systems it drives.
#[derive(Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub lives: u32,
    pub wave: u32,
    /// Guards wave-clear detection against re-entrant triggers while
    /// the next wave's spawn is pending.
    pub is_transitioning_wave: bool,
    /// Set the moment a loss condition fires; the engine finalizes the
    /// ending at the tick boundary.
    pub game_over_reason: Option<GameOverReason>,
    /// Score at which the next extra life is awarded.
    pub next_extra_life_threshold: u32,
    /// Chance of an alien shot per formation move step.
    pub alien_firing_chance: f64,
}

impl GameState {
    /// Fresh state for a new session.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            lives: config.starting_lives,
            wave: 1,
            is_transitioning_wave: false,
            game_over_reason: None,
            next_extra_life_threshold: config.extra_life_step,
            alien_firing_chance: config.base_firing_chance,
        }
    }

    /// Add points and award extra lives for every threshold crossed —
    /// a `while`, so one large award can grant several lives. Lives
    /// cap at `max_lives`; the threshold advances regardless.
    /// Returns the number of thresholds crossed.
    pub fn add_score(&mut self, points: u32, extra_life_step: u32, max_lives: u32) -> u32 {
        self.score += points;
        let mut crossings = 0;
        while self.score >= self.next_extra_life_threshold {
            if self.lives < max_lives {
                self.lives += 1;
            }
            self.next_extra_life_threshold += extra_life_step;
            crossings += 1;
        }
        crossings
    }
}

/// The game engine. Owns the world and all session state.
pub struct GameEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: GameConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    overlap_queue: VecDeque<OverlapEvent>,
    scheduler: Scheduler,
    audio_events: Vec<AudioEvent>,
    alerts: Vec<Alert>,
    next_handle: u32,
    hud: Box<dyn Hud>,
    high_scores: Box<dyn HighScoreStore>,

    state: GameState,
    formation: FormationState,
    high_score: u32,
    /// Edge-triggered fire intent, consumed once per tick.
    fire_requested: bool,
    reported_score: u32,
    reported_lives: u32,
}

impl GameEngine {
    /// Create a headless engine with no-op collaborators.
    pub fn new(config: GameConfig) -> Self {
        Self::with_collaborators(
            config,
            Box::new(NullHud),
            Box::new(MemoryHighScoreStore::default()),
        )
    }

    /// Create an engine wired to concrete HUD and persistence
    /// collaborators. Out-of-range config values are corrected to
    /// their defaults and surfaced as alerts on the first snapshot.
    pub fn with_collaborators(
        config: GameConfig,
        hud: Box<dyn Hud>,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Self {
        let (config, corrections) = config.validated();
        let alerts = corrections
            .into_iter()
            .map(|message| Alert {
                level: AlertLevel::Info,
                message,
                tick: 0,
            })
            .collect();

        let high_score = high_scores.read_high_score();
        let state = GameState::new(&config);
        let formation = FormationState::new(config.base_move_interval_ms);
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            overlap_queue: VecDeque::new(),
            scheduler: Scheduler::default(),
            audio_events: Vec::new(),
            alerts,
            next_handle: 0,
            hud,
            high_scores,
            reported_score: state.score,
            reported_lives: state.lives,
            state,
            formation,
            high_score,
            fire_requested: false,
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue an overlap reported by the host's collision broad-phase.
    pub fn queue_overlap(&mut self, event: OverlapEvent) {
        self.overlap_queue.push_back(event);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Playing {
            self.run_scheduled_actions();
            if self.state.game_over_reason.is_none() {
                self.run_systems();
                self.time.advance();
            }
        }

        self.finalize_game_over();
        self.report_hud_changes();

        let audio_events = std::mem::take(&mut self.audio_events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.state,
            self.high_score,
            audio_events,
            alerts,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the wave/score state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Best score seen by this engine, including the stored one.
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Directly award points (for tests exercising threshold arithmetic).
    #[cfg(test)]
    pub fn add_score(&mut self, points: u32) -> u32 {
        self.state
            .add_score(points, self.config.extra_life_step, self.config.max_lives)
    }

    /// Override the life count (for tests driving the hit state machine).
    #[cfg(test)]
    pub fn set_lives(&mut self, lives: u32) {
        self.state.lives = lives;
    }

    #[cfg(test)]
    pub fn scheduler_len(&self) -> usize {
        self.scheduler.len()
    }

    /// Current formation move delay (for difficulty-scaling tests).
    #[cfg(test)]
    pub fn move_interval_ms(&self) -> u64 {
        self.formation.move_interval_ms
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
                    self.start_game();
                }
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase == GamePhase::GameOver {
                    world_setup::clear_session(&mut self.world);
                    self.scheduler.clear();
                    self.overlap_queue.clear();
                    self.state = GameState::new(&self.config);
                    self.phase = GamePhase::Menu;
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::SetMoveLeft { active } => {
                systems::player::set_move_intent(&mut self.world, true, active);
            }
            PlayerCommand::SetMoveRight { active } => {
                systems::player::set_move_intent(&mut self.world, false, active);
            }
            PlayerCommand::Fire => {
                if self.phase == GamePhase::Playing {
                    self.fire_requested = true;
                }
            }
        }
    }

    /// Reset session state and spawn the first wave. Wave 1 starts
    /// immediately, with no announcement.
    fn start_game(&mut self) {
        world_setup::clear_session(&mut self.world);
        self.scheduler.clear();
        self.overlap_queue.clear();
        self.fire_requested = false;
        self.time = SimTime::default();
        self.state = GameState::new(&self.config);
        self.formation = FormationState::new(self.config.base_move_interval_ms);

        world_setup::spawn_player(&mut self.world, &mut self.next_handle);
        world_setup::spawn_formation(&mut self.world, &mut self.next_handle, &self.config);
        world_setup::spawn_barriers(&mut self.world, &mut self.next_handle, &self.config);

        self.phase = GamePhase::Playing;
        self.reported_score = self.state.score;
        self.reported_lives = self.state.lives;
        self.hud.report_score(self.state.score);
        self.hud.report_lives(self.state.lives);
        self.hud.report_wave(self.state.wave);
    }

    /// Execute scheduled actions that have come due. Pause freezes the
    /// tick counter, so nothing comes due while paused; the explicit
    /// guard covers timers queued before an ending.
    fn run_scheduled_actions(&mut self) {
        for action in self.scheduler.take_due(self.time.tick) {
            if self.state.game_over_reason.is_some() {
                continue;
            }
            match action {
                ScheduledAction::RespawnPlayer => {
                    systems::player::respawn_player(
                        &mut self.world,
                        &mut self.state,
                        &mut self.scheduler,
                        self.time.tick,
                    );
                }
                ScheduledAction::EndInvulnerability => {
                    systems::player::end_invulnerability(&mut self.world);
                }
                ScheduledAction::ClearFireCooldown => {
                    systems::player::clear_fire_cooldown(&mut self.world);
                }
                ScheduledAction::StartWave => {
                    self.start_wave();
                }
                ScheduledAction::DespawnBarrierCell(handle) => {
                    if let Some(entity) = world_setup::find_by_handle(&self.world, handle) {
                        let _ = self.world.despawn(entity);
                    }
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let now = self.time.tick;

        // 1. Player input: intents, blink, edge-triggered fire
        let fire_requested = std::mem::take(&mut self.fire_requested);
        systems::player::run(
            &mut self.world,
            &self.config,
            now,
            fire_requested,
            &mut self.next_handle,
            &mut self.scheduler,
            &mut self.audio_events,
        );

        // 2. Formation advance; alien fire draws on every move step
        let step = systems::formation::run(&mut self.world, &mut self.formation, now);
        match step {
            FormationStep::Stepped | FormationStep::Dropped => {
                self.audio_events.push(AudioEvent::AlienMoved);
                let player_pos = systems::player::position(&self.world)
                    .unwrap_or(Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
                systems::alien_fire::run(
                    &mut self.world,
                    &mut self.rng,
                    self.state.alien_firing_chance,
                    player_pos,
                    &mut self.next_handle,
                    &self.config,
                );
            }
            FormationStep::Invasion => {
                self.state.game_over_reason = Some(GameOverReason::Invasion);
                return;
            }
            FormationStep::Idle => {}
        }

        // 3. Projectile advancement
        systems::projectiles::run(&mut self.world);

        // 4. Collision resolution from host overlap reports
        let events: Vec<OverlapEvent> = self.overlap_queue.drain(..).collect();
        systems::combat::run(
            &mut self.world,
            &events,
            &mut self.state,
            &mut self.scheduler,
            &mut self.audio_events,
            &self.config,
            now,
        );

        // 5. Wave-clear check
        self.check_wave_clear();
    }

    /// Detect a cleared wave exactly once and schedule the next one.
    fn check_wave_clear(&mut self) {
        if self.state.is_transitioning_wave || self.state.game_over_reason.is_some() {
            return;
        }
        let alive = {
            let mut query = self.world.query::<&AlienInfo>();
            query.iter().count()
        };
        if alive > 0 {
            return;
        }

        self.state.is_transitioning_wave = true;
        self.state.add_score(
            self.config.wave_bonus,
            self.config.extra_life_step,
            self.config.max_lives,
        );
        self.state.wave += 1;
        // Waves reached through a clear are always announced; only the
        // initial wave of a session spawns unannounced.
        self.hud.report_wave_announcement(self.state.wave);
        self.scheduler.schedule(
            self.time.tick + ticks_for_ms(WAVE_ANNOUNCE_DELAY_MS),
            ScheduledAction::StartWave,
        );
    }

    /// Spawn the next wave: fresh formation and barriers, scaled
    /// difficulty. Projectile pools and the player persist.
    fn start_wave(&mut self) {
        world_setup::clear_wave_entities(&mut self.world);

        self.state.alien_firing_chance = (self.state.alien_firing_chance
            * self.config.firing_chance_multiplier)
            .min(self.config.max_firing_chance);
        let scaled =
            (self.formation.move_interval_ms as f64 * self.config.move_interval_multiplier) as u64;
        self.formation.move_interval_ms = scaled.max(self.config.min_move_interval_ms);
        self.formation.direction = 1;
        self.formation.last_move_tick = self.time.tick;

        world_setup::spawn_formation(&mut self.world, &mut self.next_handle, &self.config);
        world_setup::spawn_barriers(&mut self.world, &mut self.next_handle, &self.config);

        self.state.is_transitioning_wave = false;
        self.hud.report_wave(self.state.wave);
    }

    /// Complete a pending ending: flip the phase, persist the high
    /// score (best-effort), and notify the HUD. Both endings share
    /// this path; the reason is display-only.
    fn finalize_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        let Some(reason) = self.state.game_over_reason else {
            return;
        };

        self.phase = GamePhase::GameOver;
        self.state.is_transitioning_wave = false;

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            if let Err(err) = self.high_scores.write_high_score(self.state.score) {
                self.alerts.push(Alert {
                    level: AlertLevel::Warning,
                    message: format!("high score write failed: {err}"),
                    tick: self.time.tick,
                });
            }
        }

        self.hud.report_game_over(self.state.score, reason);
    }

    /// Push score/life changes to the HUD once per tick.
    fn report_hud_changes(&mut self) {
        if self.state.score != self.reported_score {
            self.reported_score = self.state.score;
            self.hud.report_score(self.state.score);
        }
        if self.state.lives != self.reported_lives {
            self.reported_lives = self.state.lives;
            self.hud.report_lives(self.state.lives);
        }
    }
}
