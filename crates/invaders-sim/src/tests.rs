//! Tests for the game engine: determinism, formation movement, combat
//! resolution, the player life-cycle, wave transitions, and scoring.

use std::sync::{Arc, Mutex};

use invaders_core::commands::{OverlapEvent, PlayerCommand};
use invaders_core::config::GameConfig;
use invaders_core::constants::*;
use invaders_core::enums::*;
use invaders_core::events::AudioEvent;
use invaders_core::state::GameStateSnapshot;
use invaders_core::traits::{HighScoreStore, Hud};
use invaders_core::types::{ticks_for_ms, Position};

use crate::engine::{GameEngine, GameState};
use crate::scheduler::Scheduler;
use crate::systems::{alien_fire, combat, player};

// ---- Test collaborators ----

/// HUD that records every call for assertion.
#[derive(Clone, Default)]
struct RecordingHud {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Hud for RecordingHud {
    fn report_score(&mut self, score: u32) {
        self.calls.lock().unwrap().push(format!("score:{score}"));
    }
    fn report_lives(&mut self, lives: u32) {
        self.calls.lock().unwrap().push(format!("lives:{lives}"));
    }
    fn report_wave(&mut self, wave: u32) {
        self.calls.lock().unwrap().push(format!("wave:{wave}"));
    }
    fn report_wave_announcement(&mut self, wave: u32) {
        self.calls.lock().unwrap().push(format!("announce:{wave}"));
    }
    fn report_game_over(&mut self, score: u32, reason: GameOverReason) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("game_over:{score}:{reason:?}"));
    }
}

/// Store backed by a shared cell, observable after the engine owns it.
#[derive(Clone, Default)]
struct SharedStore {
    best: Arc<Mutex<u32>>,
}

impl HighScoreStore for SharedStore {
    fn read_high_score(&self) -> u32 {
        *self.best.lock().unwrap()
    }
    fn write_high_score(&mut self, score: u32) -> Result<(), String> {
        *self.best.lock().unwrap() = score;
        Ok(())
    }
}

/// Store whose writes always fail.
#[derive(Clone, Copy, Default)]
struct FailingStore;

impl HighScoreStore for FailingStore {
    fn read_high_score(&self) -> u32 {
        0
    }
    fn write_high_score(&mut self, _score: u32) -> Result<(), String> {
        Err("disk on fire".into())
    }
}

// ---- Helpers ----

fn started_engine() -> GameEngine {
    let mut engine = GameEngine::new(GameConfig::default());
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    engine
}

/// Fire until a player shot is live, then report it overlapping
/// `target` and resolve. Returns the post-resolution snapshot.
fn zap(engine: &mut GameEngine, target: u32) -> GameStateSnapshot {
    loop {
        engine.queue_command(PlayerCommand::Fire);
        let snap = engine.tick();
        if let Some(shot) = snap.player_shots.iter().find(|s| s.active) {
            engine.queue_overlap(OverlapEvent {
                a: shot.id,
                b: target,
            });
            return engine.tick();
        }
    }
}

fn alien_count(snap: &GameStateSnapshot) -> usize {
    snap.aliens.len()
}

/// Engine whose aliens shoot on nearly every move step, for tests that
/// need an alien shot promptly.
fn trigger_happy_engine() -> GameEngine {
    let config = GameConfig {
        base_firing_chance: 0.95,
        ..Default::default()
    };
    let mut engine = GameEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    engine
}

/// Tick until an alien shot is live and return its handle.
fn wait_for_alien_shot(engine: &mut GameEngine) -> u32 {
    for _ in 0..ticks_for_ms(BASE_MOVE_INTERVAL_MS) * 20 {
        let snap = engine.tick();
        if let Some(shot) = snap.alien_shots.iter().find(|s| s.active) {
            return shot.id;
        }
    }
    panic!("no alien shot within 20 move intervals");
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = GameEngine::new(GameConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = GameEngine::new(GameConfig {
        seed: 12345,
        ..Default::default()
    });

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    for tick in 0..600 {
        // Identical input streams on both engines.
        if tick % 40 == 0 {
            engine_a.queue_command(PlayerCommand::Fire);
            engine_b.queue_command(PlayerCommand::Fire);
        }
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    // High firing chance so the seeds' divergent draws show up fast.
    let config_a = GameConfig {
        seed: 111,
        base_firing_chance: 0.9,
        ..Default::default()
    };
    let config_b = GameConfig {
        seed: 222,
        ..config_a.clone()
    };
    let mut engine_a = GameEngine::new(config_a);
    let mut engine_b = GameEngine::new(config_b);

    engine_a.queue_command(PlayerCommand::StartGame);
    engine_b.queue_command(PlayerCommand::StartGame);

    let mut diverged = false;
    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Tick timing ----

#[test]
fn test_tick_timing_60_ticks_one_second() {
    let mut engine = started_engine();
    for _ in 0..59 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 60);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "60 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

// ---- Session control ----

#[test]
fn test_start_game_spawns_full_field() {
    let snap = {
        let mut engine = GameEngine::new(GameConfig::default());
        engine.queue_command(PlayerCommand::StartGame);
        engine.tick()
    };

    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.lives, STARTING_LIVES);
    assert_eq!(snap.wave, 1);
    assert_eq!(alien_count(&snap), 55, "5x11 formation");
    assert!(snap.player.visible);
    assert_eq!(snap.player.life_state, PlayerLifeState::Active);

    // 4 barriers x 112 pattern cells.
    assert_eq!(snap.barrier_cells.len(), 448);

    // Point tiers by row.
    for alien in &snap.aliens {
        let expected = match alien.row {
            0 => 30,
            1 | 2 => 20,
            _ => 10,
        };
        assert_eq!(alien.points, expected, "row {} tier points", alien.row);
    }
}

#[test]
fn test_start_while_playing_is_ignored() {
    let mut engine = started_engine();
    let before = engine.tick();
    engine.queue_command(PlayerCommand::StartGame);
    let after = engine.tick();
    assert_eq!(after.time.tick, before.time.tick + 1, "no session reset");
    assert_eq!(alien_count(&after), alien_count(&before));
}

#[test]
fn test_menu_phase_before_start() {
    let mut engine = GameEngine::new(GameConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.aliens.is_empty());
    assert_eq!(snap.time.tick, 0, "time does not run in the menu");
}

// ---- Pause / resume ----

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started_engine();
    for _ in 0..9 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10);
    assert_eq!(engine.phase(), GamePhase::Playing);

    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 10, "Time should not advance while paused");
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.time().tick, 20);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_pause_suspends_fire_cooldown() {
    let mut engine = started_engine();

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 1);

    // Cooldown running: a second request is silently dropped.
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 1);

    // A long pause must not let the cooldown expire.
    engine.queue_command(PlayerCommand::Pause);
    for _ in 0..100 {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::Resume);
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(
        active_player_shots(&snap),
        1,
        "cooldown ticks must not elapse while paused"
    );

    // After enough live ticks the cooldown clears.
    for _ in 0..ticks_for_ms(PLAYER_FIRE_COOLDOWN_MS) {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 2);
}

fn active_player_shots(snap: &GameStateSnapshot) -> usize {
    snap.player_shots.iter().filter(|s| s.active).count()
}

// ---- Formation movement ----

#[test]
fn test_formation_steps_after_interval() {
    let mut engine = started_engine();
    let before = engine.tick();
    let start_xs: Vec<f64> = before.aliens.iter().map(|a| a.position.x).collect();

    let mut moved_snapshot = None;
    for _ in 0..ticks_for_ms(BASE_MOVE_INTERVAL_MS) + 2 {
        let snap = engine.tick();
        if snap
            .audio_events
            .iter()
            .any(|e| matches!(e, AudioEvent::AlienMoved))
        {
            moved_snapshot = Some(snap);
            break;
        }
    }
    let snap = moved_snapshot.expect("formation should move within one interval");

    for (alien, start_x) in snap.aliens.iter().zip(start_xs.iter()) {
        assert!(
            (alien.position.x - (start_x + ALIEN_STEP_X)).abs() < 1e-9,
            "every alien steps together"
        );
    }
}

#[test]
fn test_formation_edge_reverses_and_drops_whole_grid() {
    let mut engine = started_engine();

    // Drive until a drop: every alien 20px lower than at spawn.
    let spawn = engine.tick();
    let start_ys: Vec<f64> = spawn.aliens.iter().map(|a| a.position.y).collect();
    let mut dropped = None;
    for _ in 0..ticks_for_ms(BASE_MOVE_INTERVAL_MS) * 8 {
        let snap = engine.tick();
        if !snap.aliens.is_empty() && snap.aliens[0].position.y > start_ys[0] {
            dropped = Some(snap);
            break;
        }
    }
    let snap = dropped.expect("formation should reach the edge and drop");

    for (alien, start_y) in snap.aliens.iter().zip(start_ys.iter()) {
        assert!(
            (alien.position.y - (start_y + ALIEN_DROP_Y)).abs() < 1e-9,
            "the drop moves every alien, not just the edge one"
        );
    }

    // Direction reversed: the next step moves left.
    let max_x_after_drop = snap
        .aliens
        .iter()
        .map(|a| a.position.x)
        .fold(f64::MIN, f64::max);
    let mut stepped = None;
    for _ in 0..ticks_for_ms(BASE_MOVE_INTERVAL_MS) + 2 {
        let next = engine.tick();
        if next
            .audio_events
            .iter()
            .any(|e| matches!(e, AudioEvent::AlienMoved))
        {
            stepped = Some(next);
            break;
        }
    }
    let next = stepped.expect("next move within one interval");
    let max_x_after_step = next
        .aliens
        .iter()
        .map(|a| a.position.x)
        .fold(f64::MIN, f64::max);
    assert!(
        max_x_after_step < max_x_after_drop,
        "after the drop the formation travels the other way"
    );
}

#[test]
fn test_invasion_ends_game() {
    let mut engine = started_engine();

    // Left alone, the formation eventually walks down to the player's row.
    let mut final_snap = None;
    for _ in 0..6000 {
        let snap = engine.tick();
        if snap.phase == GamePhase::GameOver {
            final_snap = Some(snap);
            break;
        }
    }
    let snap = final_snap.expect("untouched formation should invade");
    assert_eq!(snap.game_over_reason, Some(GameOverReason::Invasion));
    assert_eq!(alien_count(&snap), 55, "invasion ends with aliens alive");
}

// ---- Player movement and firing ----

#[test]
fn test_player_moves_and_clamps() {
    let mut engine = started_engine();
    let start = engine.tick().player.position.x;

    engine.queue_command(PlayerCommand::SetMoveRight { active: true });
    for _ in 0..30 {
        engine.tick();
    }
    let mid = engine.tick().player.position.x;
    assert!(mid > start, "ship moves right while the intent is held");

    // Hold long enough to hit the field edge.
    for _ in 0..600 {
        engine.tick();
    }
    let snap = engine.tick();
    assert!(
        (snap.player.position.x - (FIELD_WIDTH - PLAYER_HALF_WIDTH)).abs() < 1e-9,
        "ship clamps at the right edge"
    );

    engine.queue_command(PlayerCommand::SetMoveRight { active: false });
    engine.queue_command(PlayerCommand::SetMoveLeft { active: true });
    for _ in 0..30 {
        engine.tick();
    }
    assert!(engine.tick().player.position.x < FIELD_WIDTH - PLAYER_HALF_WIDTH);
}

#[test]
fn test_fire_cooldown_and_audio() {
    let mut engine = started_engine();

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 1);
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::PlayerFired)));

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 1, "second request on cooldown");

    for _ in 0..ticks_for_ms(PLAYER_FIRE_COOLDOWN_MS) + 1 {
        engine.tick();
    }
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(active_player_shots(&snap), 2);
}

#[test]
fn test_player_shot_deactivates_off_top_and_slot_is_reused() {
    let mut engine = started_engine();
    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    let shot_id = snap.player_shots[0].id;

    // 550px at 400px/s is well under 120 ticks.
    for _ in 0..120 {
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(snap.player_shots.len(), 1, "slot survives deactivation");
    assert!(!snap.player_shots[0].active);

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    assert_eq!(snap.player_shots.len(), 1, "inactive slot reused, not grown");
    assert_eq!(snap.player_shots[0].id, shot_id);
    assert!(snap.player_shots[0].active);
}

#[test]
fn test_pool_saturation_drops_requests() {
    let config = GameConfig {
        max_shots_per_pool: 2,
        player_fire_cooldown_ms: 0,
        ..Default::default()
    };
    let mut engine = GameEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();

    for _ in 0..10 {
        engine.queue_command(PlayerCommand::Fire);
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(
        snap.player_shots.len(),
        2,
        "pool never grows past its cap; extra requests are dropped"
    );
    assert_eq!(active_player_shots(&snap), 2);
}

// ---- Combat resolution ----

#[test]
fn test_player_shot_destroys_alien_and_scores() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let top_row_alien = snap.aliens.iter().find(|a| a.row == 0).unwrap().id;

    let snap = zap(&mut engine, top_row_alien);
    assert_eq!(snap.score, 30);
    assert_eq!(alien_count(&snap), 54);
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::AlienDestroyed { points: 30 })));
    assert_eq!(active_player_shots(&snap), 0, "the shot is spent");
}

#[test]
fn test_duplicate_overlap_is_idempotent() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let alien_a = snap.aliens.iter().find(|a| a.row == 0).unwrap().id;
    let alien_b = snap.aliens.iter().find(|a| a.row == 3).unwrap().id;

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    let shot = snap.player_shots[0].id;

    // The host may queue several overlaps for one shot in one tick; only
    // the first may score.
    engine.queue_overlap(OverlapEvent { a: shot, b: alien_a });
    engine.queue_overlap(OverlapEvent { a: shot, b: alien_a });
    engine.queue_overlap(OverlapEvent { a: shot, b: alien_b });
    let snap = engine.tick();

    assert_eq!(snap.score, 30, "one hit scored, duplicates ignored");
    assert_eq!(alien_count(&snap), 54);

    // A stale event on a later tick is equally harmless.
    engine.queue_overlap(OverlapEvent { a: shot, b: alien_b });
    let snap = engine.tick();
    assert_eq!(snap.score, 30);
    assert_eq!(alien_count(&snap), 54);
}

#[test]
fn test_unknown_handles_are_ignored() {
    let mut engine = started_engine();
    engine.queue_overlap(OverlapEvent { a: 9999, b: 8888 });
    let snap = engine.tick();
    assert_eq!(snap.score, 0);
    assert_eq!(alien_count(&snap), 55);
}

#[test]
fn test_barrier_hit_destroys_struck_cell_plus_radius() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let initial_cells = snap.barrier_cells.len();

    // Pick an interior cell: one with the full 8 neighbours in radius.
    let target = snap
        .barrier_cells
        .iter()
        .find(|cell| {
            snap.barrier_cells
                .iter()
                .filter(|other| {
                    other.id != cell.id
                        && cell.position.distance_to(&other.position) <= BARRIER_EXPLOSION_RADIUS
                })
                .count()
                == 8
        })
        .expect("an interior barrier cell exists")
        .id;

    engine.queue_command(PlayerCommand::Fire);
    let snap = engine.tick();
    let shot = snap.player_shots[0].id;
    engine.queue_overlap(OverlapEvent { a: shot, b: target });
    let snap = engine.tick();

    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::BarrierDestroyed { cells: 9 })));
    assert_eq!(active_player_shots(&snap), 0, "the shot is spent");

    // Staggered despawns complete within a few ticks.
    for _ in 0..5 {
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(snap.barrier_cells.len(), initial_cells - 9);
    assert!(snap.barrier_cells.iter().all(|c| c.id != target));
}

#[test]
fn test_alien_shot_also_chews_barriers() {
    let mut engine = trigger_happy_engine();
    let snap = engine.tick();
    let initial_cells = snap.barrier_cells.len();
    let target = snap.barrier_cells[0].id;

    let shot = wait_for_alien_shot(&mut engine);

    engine.queue_overlap(OverlapEvent { a: shot, b: target });
    for _ in 0..6 {
        engine.tick();
    }
    let snap = engine.tick();
    assert!(snap.barrier_cells.len() < initial_cells);
}

// ---- Player life-cycle ----

#[test]
fn test_player_hit_starts_respawn_cycle() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let alien = snap.aliens[0].id;
    let player = snap.player.id;

    engine.queue_overlap(OverlapEvent { a: alien, b: player });
    let snap = engine.tick();
    let hit_tick = snap.time.tick;

    assert_eq!(snap.lives, STARTING_LIVES - 1);
    assert_eq!(snap.player.life_state, PlayerLifeState::Respawning);
    assert!(!snap.player.visible);
    assert!(snap.player.invulnerable);
    assert!(
        (snap.player.position.x - PLAYER_SPAWN_X).abs() < 1e-9,
        "hidden ship waits at the spawn point"
    );
    assert!(snap
        .audio_events
        .iter()
        .any(|e| matches!(e, AudioEvent::PlayerHit { lives_left: 2 })));

    // Hidden through the respawn delay, visible and blinking after.
    let mut snap = engine.tick();
    while snap.time.tick < hit_tick + ticks_for_ms(RESPAWN_DELAY_MS) + 1 {
        snap = engine.tick();
    }
    assert_eq!(snap.player.life_state, PlayerLifeState::Invulnerable);
    assert!(snap.player.visible, "blink cycle starts visible");

    // Half a blink period later the ship is hidden.
    for _ in 0..ticks_for_ms(BLINK_INTERVAL_MS) {
        snap = engine.tick();
    }
    assert_eq!(snap.player.life_state, PlayerLifeState::Invulnerable);
    assert!(!snap.player.visible, "blink hides the ship on odd periods");

    // After the invulnerability window: active and solid.
    while snap.time.tick
        < hit_tick + ticks_for_ms(RESPAWN_DELAY_MS) + ticks_for_ms(INVULNERABILITY_MS) + 2
    {
        snap = engine.tick();
    }
    assert_eq!(snap.player.life_state, PlayerLifeState::Active);
    assert!(snap.player.visible);
    assert!(!snap.player.invulnerable);
}

#[test]
fn test_second_hit_inside_grace_period_is_ignored() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let alien = snap.aliens[0].id;
    let player = snap.player.id;

    engine.queue_overlap(OverlapEvent { a: alien, b: player });
    let snap = engine.tick();
    assert_eq!(snap.lives, STARTING_LIVES - 1);

    // Well inside the respawn + invulnerability window.
    engine.queue_overlap(OverlapEvent { a: alien, b: player });
    let snap = engine.tick();
    assert_eq!(
        snap.lives,
        STARTING_LIVES - 1,
        "lives decrement exactly once per grace period"
    );
    assert_ne!(snap.phase, GamePhase::GameOver);
}

#[test]
fn test_last_life_goes_straight_to_game_over() {
    let mut engine = started_engine();
    engine.set_lives(1);
    let snap = engine.tick();
    let alien = snap.aliens[0].id;
    let player = snap.player.id;

    engine.queue_overlap(OverlapEvent { a: alien, b: player });
    let snap = engine.tick();

    assert_eq!(snap.lives, 0);
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.game_over_reason, Some(GameOverReason::OutOfLives));
    assert_eq!(snap.player.life_state, PlayerLifeState::Dead);
    assert!(!snap.player.visible);
    assert_eq!(engine.scheduler_len(), 0, "no respawn scheduled when dead");
}

#[test]
fn test_alien_shot_hit_routes_to_player_hit() {
    let mut engine = trigger_happy_engine();
    let player = engine.tick().player.id;

    let shot = wait_for_alien_shot(&mut engine);

    engine.queue_overlap(OverlapEvent { a: shot, b: player });
    let snap = engine.tick();
    assert_eq!(snap.lives, STARTING_LIVES - 1);
    assert_eq!(snap.player.life_state, PlayerLifeState::Respawning);

    // The shot is spent on the hit and cannot hit again.
    engine.queue_overlap(OverlapEvent { a: shot, b: player });
    let snap = engine.tick();
    assert_eq!(snap.lives, STARTING_LIVES - 1);
}

/// Loss takes priority over respawn: if the formation crossed the
/// invasion threshold while the player was hidden, the respawn becomes
/// an invasion ending. Exercised directly against the system.
#[test]
fn test_respawn_rechecks_invasion() {
    let mut world = hecs::World::new();
    let mut state = GameState::new(&GameConfig::default());
    let mut scheduler = Scheduler::default();

    let entity = crate::world_setup::spawn_player(&mut world, &mut 0);
    {
        let mut ship = world
            .get::<&mut invaders_core::components::PlayerShip>(entity)
            .unwrap();
        ship.life_state = PlayerLifeState::Respawning;
        ship.visible = false;
        ship.invulnerable = true;
    }
    world.spawn((
        invaders_core::components::Handle(99),
        invaders_core::components::AlienInfo {
            row: 4,
            col: 0,
            tier: AlienTier::Bottom,
        },
        Position::new(400.0, INVASION_Y + 5.0),
    ));

    player::respawn_player(&mut world, &mut state, &mut scheduler, 100);

    assert_eq!(state.game_over_reason, Some(GameOverReason::Invasion));
    let ship = world
        .get::<&invaders_core::components::PlayerShip>(entity)
        .unwrap();
    assert_eq!(
        ship.life_state,
        PlayerLifeState::Respawning,
        "the respawn never completes"
    );
}

// ---- Barrier edge case: isolated cell ----

/// The struck cell always dies, even with nothing else in radius.
#[test]
fn test_lone_barrier_cell_destruction() {
    let mut world = hecs::World::new();
    let mut state = GameState::new(&GameConfig::default());
    let mut scheduler = Scheduler::default();
    let mut audio = Vec::new();

    world.spawn((
        invaders_core::components::Handle(1),
        invaders_core::components::BarrierCell {
            barrier_index: 0,
            doomed: false,
        },
        Position::new(200.0, 450.0),
    ));
    world.spawn((
        invaders_core::components::Handle(2),
        invaders_core::components::Projectile {
            owner: ProjectileOwner::Player,
            active: true,
        },
        Position::new(200.0, 452.0),
        invaders_core::types::Velocity::new(0.0, -400.0),
    ));

    combat::run(
        &mut world,
        &[OverlapEvent { a: 2, b: 1 }],
        &mut state,
        &mut scheduler,
        &mut audio,
        &GameConfig::default(),
        10,
    );

    assert!(
        audio.iter().any(|e| matches!(e, AudioEvent::BarrierHit)),
        "single-cell destruction is the 'hit' cue, not 'destroy'"
    );
    assert_eq!(scheduler.len(), 1, "exactly the struck cell despawns");
    let cell = crate::world_setup::find_by_handle(&world, 1).unwrap();
    assert!(
        world
            .get::<&invaders_core::components::BarrierCell>(cell)
            .unwrap()
            .doomed
    );
}

// ---- Alien fire selection ----

#[test]
fn test_proximity_weight_prefers_closer_aliens() {
    let player = Position::new(400.0, PLAYER_SPAWN_Y);
    let near = Position::new(400.0, 450.0);
    let far = Position::new(400.0, 150.0);
    assert!(alien_fire::proximity_weight(near, player) > alien_fire::proximity_weight(far, player));

    // Vertical distance outweighs horizontal.
    let off_to_the_side = Position::new(100.0, 450.0);
    let high_above = Position::new(400.0, 200.0);
    assert!(
        alien_fire::proximity_weight(off_to_the_side, player)
            > alien_fire::proximity_weight(high_above, player)
    );
}

#[test]
fn test_weight_floor_keeps_every_alien_selectable() {
    let player = Position::new(400.0, PLAYER_SPAWN_Y);
    let absurdly_far = Position::new(0.0, -10_000.0);
    assert_eq!(alien_fire::proximity_weight(absurdly_far, player), 1.0);
}

#[test]
fn test_select_shooter_empty_and_biased() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let player = Position::new(400.0, PLAYER_SPAWN_Y);

    assert_eq!(alien_fire::select_shooter(&mut rng, &[], player), None);

    // With one candidate hugely favoured, sampling should pick it
    // nearly always: weight 1.0 (floor) against ~9.9.
    let positions = vec![Position::new(0.0, -10_000.0), Position::new(400.0, 540.0)];
    let mut picks = [0usize; 2];
    for _ in 0..1000 {
        let index = alien_fire::select_shooter(&mut rng, &positions, player).unwrap();
        picks[index] += 1;
    }
    assert!(
        picks[1] > picks[0] * 2,
        "bottom alien should dominate: {picks:?}"
    );
}

// ---- Scoring and extra lives ----

#[test]
fn test_extra_life_threshold_crossings() {
    let mut engine = started_engine();

    // Drive to 9000: below the first threshold, no award.
    assert_eq!(engine.add_score(9000), 0);
    let snap = engine.tick();
    assert_eq!(snap.lives, STARTING_LIVES);

    // One jump to 31000 crosses 10000, 20000 and 30000: three lives.
    assert_eq!(engine.add_score(22_000), 3);
    let snap = engine.tick();
    assert_eq!(snap.score, 31_000);
    assert_eq!(snap.lives, STARTING_LIVES + 3);
}

#[test]
fn test_extra_lives_cap_at_nine_but_thresholds_advance() {
    let mut engine = started_engine();

    let crossings = engine.add_score(95_000);
    assert_eq!(crossings, 9);
    let snap = engine.tick();
    assert_eq!(snap.lives, MAX_LIVES, "lives cap at 9");

    // The threshold kept advancing, so the next 10k grants exactly one
    // more crossing (still capped).
    assert_eq!(engine.add_score(10_000), 1);
    let snap = engine.tick();
    assert_eq!(snap.lives, MAX_LIVES);
}

#[test]
fn test_lives_never_decrease_from_scoring() {
    let mut engine = started_engine();
    let mut last_lives = engine.state().lives;
    for _ in 0..50 {
        engine.add_score(3742);
        let lives = engine.state().lives;
        assert!(lives >= last_lives);
        assert!(lives <= MAX_LIVES);
        last_lives = lives;
    }
}

// ---- Wave transitions ----

#[test]
fn test_wave_clear_scores_bonus_and_respawns_field() {
    let mut engine = started_engine();
    let snap = engine.tick();
    let mut targets: Vec<u32> = snap.aliens.iter().map(|a| a.id).collect();
    let last = targets.pop().unwrap();

    // Destroy all but one: wave must not advance early.
    for target in targets {
        zap(&mut engine, target);
    }
    let snap = engine.tick();
    assert_eq!(snap.wave, 1, "no premature wave-clear");
    assert!(!snap.is_transitioning_wave);
    assert_eq!(alien_count(&snap), 1);
    // 11x30 + 22x20 + 22x10 minus the surviving bottom-tier alien.
    let cleared_points: u32 = 11 * 30 + 22 * 20 + 22 * 10 - 10;
    assert_eq!(snap.score, cleared_points);

    // The last kill triggers the transition.
    let snap = zap(&mut engine, last);
    assert!(snap.is_transitioning_wave);
    assert_eq!(snap.wave, 2);
    assert_eq!(snap.score, cleared_points + 10 + WAVE_BONUS);
    let clear_tick = snap.time.tick;

    // During the announcement delay nothing spawns.
    let snap = engine.tick();
    assert_eq!(alien_count(&snap), 0);

    // After the delay: fresh formation, regenerated barriers.
    let mut snap = engine.tick();
    while snap.time.tick < clear_tick + ticks_for_ms(WAVE_ANNOUNCE_DELAY_MS) + 2 {
        snap = engine.tick();
    }
    assert_eq!(alien_count(&snap), 55);
    assert_eq!(snap.barrier_cells.len(), 448, "barriers regenerate fully");
    assert!(!snap.is_transitioning_wave);
    assert_eq!(snap.wave, 2);
}

#[test]
fn test_difficulty_scaling_is_monotonic_and_bounded() {
    // A 1x1 formation makes each wave a single kill.
    let config = GameConfig {
        formation_rows: 1,
        formation_cols: 1,
        ..Default::default()
    };
    let mut engine = GameEngine::new(config);
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();

    let mut last_interval = engine.move_interval_ms();
    let mut last_chance = engine.state().alien_firing_chance;

    for wave in 2..=14 {
        let snap = engine.tick();
        let target = snap.aliens[0].id;
        zap(&mut engine, target);

        // Ride out the announcement delay.
        let mut snap = engine.tick();
        while snap.aliens.is_empty() {
            snap = engine.tick();
        }
        assert_eq!(snap.wave, wave);

        let interval = engine.move_interval_ms();
        let chance = engine.state().alien_firing_chance;
        assert!(interval <= last_interval, "aliens never slow down");
        assert!(interval >= MIN_MOVE_INTERVAL_MS, "interval floor holds");
        assert!(chance >= last_chance, "fire rate never drops");
        assert!(chance <= MAX_FIRING_CHANCE + 1e-12, "fire rate cap holds");
        last_interval = interval;
        last_chance = chance;
    }

    assert_eq!(
        engine.move_interval_ms(),
        MIN_MOVE_INTERVAL_MS,
        "after many waves the interval sits on its floor"
    );
}

// ---- Collaborators ----

#[test]
fn test_hud_receives_reports() {
    let hud = RecordingHud::default();
    let calls = hud.calls.clone();
    let mut engine = GameEngine::with_collaborators(
        GameConfig::default(),
        Box::new(hud),
        Box::new(SharedStore::default()),
    );

    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();
    {
        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"score:0".to_string()));
        assert!(calls.contains(&format!("lives:{STARTING_LIVES}")));
        assert!(calls.contains(&"wave:1".to_string()));
    }

    let snap = engine.tick();
    let alien = snap.aliens.iter().find(|a| a.row == 0).unwrap().id;
    zap(&mut engine, alien);
    assert!(calls.lock().unwrap().contains(&"score:30".to_string()));
}

#[test]
fn test_game_over_persists_high_score() {
    let store = SharedStore::default();
    let best = store.best.clone();
    let mut engine = GameEngine::with_collaborators(
        GameConfig::default(),
        Box::new(RecordingHud::default()),
        Box::new(store),
    );
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();

    let snap = engine.tick();
    let alien = snap.aliens.iter().find(|a| a.row == 0).unwrap().id;
    let player = snap.player.id;
    zap(&mut engine, alien);

    engine.set_lives(1);
    engine.queue_overlap(OverlapEvent {
        a: snap.aliens[1].id,
        b: player,
    });
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(*best.lock().unwrap(), 30, "new high score written through");
    assert_eq!(snap.high_score, 30);
}

#[test]
fn test_failed_persistence_never_touches_gameplay() {
    let mut engine = GameEngine::with_collaborators(
        GameConfig::default(),
        Box::new(RecordingHud::default()),
        Box::new(FailingStore),
    );
    engine.queue_command(PlayerCommand::StartGame);
    engine.tick();

    let snap = engine.tick();
    let alien = snap.aliens.iter().find(|a| a.row == 0).unwrap().id;
    let player = snap.player.id;
    zap(&mut engine, alien);

    engine.set_lives(1);
    engine.queue_overlap(OverlapEvent {
        a: snap.aliens[1].id,
        b: player,
    });
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::GameOver);
    assert_eq!(snap.score, 30, "score survives the failed write");
    assert!(
        snap.alerts
            .iter()
            .any(|a| a.level == AlertLevel::Warning && a.message.contains("high score")),
        "the failure surfaces as an alert"
    );
}

#[test]
fn test_invalid_config_corrected_with_alert() {
    let config = GameConfig {
        move_interval_multiplier: 2.0,
        ..Default::default()
    };
    let mut engine = GameEngine::new(config);
    let snap = engine.tick();
    assert!(
        snap.alerts
            .iter()
            .any(|a| a.message.contains("move_interval_multiplier")),
        "rejected value reported"
    );
}

#[test]
fn test_return_to_menu_after_game_over() {
    let mut engine = started_engine();
    engine.set_lives(1);
    let snap = engine.tick();
    engine.queue_overlap(OverlapEvent {
        a: snap.aliens[0].id,
        b: snap.player.id,
    });
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);

    engine.queue_command(PlayerCommand::ReturnToMenu);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Menu);
    assert!(snap.aliens.is_empty());

    // And a fresh game starts clean.
    engine.queue_command(PlayerCommand::StartGame);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Playing);
    assert_eq!(snap.lives, STARTING_LIVES);
    assert_eq!(alien_count(&snap), 55);
}
