//! Game loop thread — runs the engine at 60Hz and emits snapshots.
//!
//! The engine is created inside this thread because it's cleaner for
//! ownership. Commands and overlap reports arrive via `mpsc` channel.
//! Snapshots are emitted via Tauri `AppHandle` events and stored in
//! shared state for synchronous polling; HUD notifications go out as
//! their own event stream.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::json;
use tauri::{AppHandle, Emitter};

use invaders_core::config::GameConfig;
use invaders_core::constants::TICK_RATE;
use invaders_core::enums::GameOverReason;
use invaders_core::state::GameStateSnapshot;
use invaders_core::traits::Hud;
use invaders_sim::engine::GameEngine;

use crate::highscore::JsonFileHighScoreStore;
use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// File the high score persists to, next to the working directory.
const HIGH_SCORE_FILE: &str = "invaders_highscore.json";

/// HUD implementation that forwards reports to the frontend as Tauri
/// events.
struct EventHud {
    app_handle: AppHandle,
}

impl Hud for EventHud {
    fn report_score(&mut self, score: u32) {
        let _ = self.app_handle.emit("game:hud", json!({"score": score}));
    }
    fn report_lives(&mut self, lives: u32) {
        let _ = self.app_handle.emit("game:hud", json!({"lives": lives}));
    }
    fn report_wave(&mut self, wave: u32) {
        let _ = self.app_handle.emit("game:hud", json!({"wave": wave}));
    }
    fn report_wave_announcement(&mut self, wave: u32) {
        let _ = self
            .app_handle
            .emit("game:hud", json!({"announce_wave": wave}));
    }
    fn report_game_over(&mut self, score: u32, reason: GameOverReason) {
        let _ = self.app_handle.emit(
            "game:hud",
            json!({"game_over": {"score": score, "reason": reason}}),
        );
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the IPC layer to use.
pub fn spawn_game_loop(
    app_handle: AppHandle,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> mpsc::Sender<GameLoopCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("invaders-game-loop".into())
        .spawn(move || {
            run_game_loop(app_handle, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    cmd_tx
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    app_handle: AppHandle,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let hud = EventHud {
        app_handle: app_handle.clone(),
    };
    let store = JsonFileHighScoreStore::new(HIGH_SCORE_FILE);
    let mut engine =
        GameEngine::with_collaborators(GameConfig::default(), Box::new(hud), Box::new(store));
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands and overlap reports
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Overlap(event)) => {
                    engine.queue_overlap(event);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Emit snapshot to frontend via Tauri event
        let _ = app_handle.emit("game:state_snapshot", &snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until the next tick boundary
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}
