// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use invaders_app::ipc;
use invaders_app::state::AppState;

fn main() {
    tauri::Builder::default()
        .manage(AppState::new())
        .invoke_handler(tauri::generate_handler![
            ipc::start_simulation,
            ipc::send_command,
            ipc::report_overlap,
            ipc::get_snapshot,
        ])
        .run(tauri::generate_context!())
        .expect("error while running INVADERS");
}
