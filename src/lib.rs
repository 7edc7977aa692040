//! Dog Derby - top-down racing mini-game
//!
//! The simulation core lives in [`game_server`]. With the `desktop`
//! feature the crate also builds the Tauri backend the web frontend talks to.

pub mod game_server;

pub use game_server::*;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::game_server::race::{RaceResult, RaceSnapshot};
    use crate::game_server::simulation::{GameServer, GameState, HudSnapshot, ServerStats};
    use crate::game_server::track::RaceMode;
    use crate::game_server::RaceConfig;
    use std::sync::Mutex;
    use tauri::State;

    /// Initialize a new race, from a preset or a full JSON config
    #[tauri::command]
    fn init_race(
        server: State<'_, Mutex<GameServer>>,
        mode: Option<RaceMode>,
        config_json: Option<String>,
        seed: Option<u64>,
    ) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;

        let mut config = match config_json {
            Some(json) => RaceConfig::from_json(&json).map_err(|e| e.to_string())?,
            None => RaceConfig::for_mode(mode.unwrap_or(RaceMode::Arena)),
        };
        if seed.is_some() {
            config.seed = seed;
        }

        let mode = config.mode();
        server.init_race(config).map_err(|e| e.to_string())?;
        log::info!("Race initialized in {:?} mode", mode);
        Ok(())
    }

    /// Record a key press or release (browser key name)
    #[tauri::command]
    fn key_event(server: State<'_, Mutex<GameServer>>, key: String, pressed: bool) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.key_event(&key, pressed);
        Ok(())
    }

    /// Advance one animation frame and return the state to draw
    #[tauri::command]
    fn tick(server: State<'_, Mutex<GameServer>>, timestamp: f64) -> Result<Option<RaceSnapshot>, String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.tick(timestamp))
    }

    /// Get current race snapshot without advancing simulation
    #[tauri::command]
    fn get_snapshot(server: State<'_, Mutex<GameServer>>) -> Result<Option<RaceSnapshot>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_snapshot())
    }

    /// Get HUD scalars (speed, timer, pickups, status line)
    #[tauri::command]
    fn get_hud(server: State<'_, Mutex<GameServer>>) -> Result<Option<HudSnapshot>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_hud())
    }

    /// Get race results
    #[tauri::command]
    fn get_results(server: State<'_, Mutex<GameServer>>) -> Result<Option<Vec<RaceResult>>, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_results())
    }

    /// Get server statistics
    #[tauri::command]
    fn get_stats(server: State<'_, Mutex<GameServer>>) -> Result<ServerStats, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_stats())
    }

    /// Get current game state
    #[tauri::command]
    fn get_game_state(server: State<'_, Mutex<GameServer>>) -> Result<GameState, String> {
        let server = server.lock().map_err(|e| e.to_string())?;
        Ok(server.get_state())
    }

    /// Back to the starting line
    #[tauri::command]
    fn reset_race(server: State<'_, Mutex<GameServer>>) -> Result<(), String> {
        let mut server = server.lock().map_err(|e| e.to_string())?;
        server.reset();
        Ok(())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        tauri::Builder::default()
            .manage(Mutex::new(GameServer::new()))
            .setup(|app| {
                if cfg!(debug_assertions) {
                    app.handle().plugin(
                        tauri_plugin_log::Builder::default()
                            .level(log::LevelFilter::Info)
                            .build(),
                    )?;
                }
                log::info!("Dog Derby game server initialized");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                init_race,
                key_event,
                tick,
                get_snapshot,
                get_hud,
                get_results,
                get_stats,
                get_game_state,
                reset_race,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}

#[cfg(feature = "desktop")]
pub use desktop::run;
