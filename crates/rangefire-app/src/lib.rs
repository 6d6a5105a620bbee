//! Headless host for the RANGEFIRE simulation: a paced game loop, a
//! scripted player, env-driven settings and the leaderboard file.

pub mod bot;
pub mod game_loop;
pub mod leaderboard;
pub mod settings;
pub mod state;
