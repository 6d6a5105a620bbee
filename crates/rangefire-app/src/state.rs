//! State shared between the game loop thread and its owner.

use std::sync::{Arc, Mutex};

use rangefire_core::commands::PlayerCommand;
use rangefire_core::state::MatchSnapshot;

/// Messages sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Forward a player intent to the engine.
    PlayerCommand(PlayerCommand),
    /// Stop the loop after the current tick.
    Shutdown,
}

/// Latest snapshot, for synchronous polling by observers.
pub type SharedSnapshot = Arc<Mutex<Option<MatchSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}
