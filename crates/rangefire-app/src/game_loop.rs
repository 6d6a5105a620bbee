//! Game loop thread: runs the simulation at 60Hz with a scripted player.
//!
//! The engine is created inside the thread for clean ownership. Extra
//! commands arrive via an `mpsc` channel; snapshots are stored in shared
//! state for polling. The loop ends when the match is over.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::info;

use rangefire_core::constants::TICK_RATE;
use rangefire_core::enums::MatchPhase;
use rangefire_core::events::GameEvent;
use rangefire_core::state::{MatchSnapshot, MatchSummary};
use rangefire_sim::engine::{MatchConfig, SimulationEngine};

use crate::bot::Bot;
use crate::state::{GameLoopCommand, SharedSnapshot};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Running game loop thread.
pub struct GameLoopHandle {
    commands: mpsc::Sender<GameLoopCommand>,
    thread: JoinHandle<Option<MatchSummary>>,
}

impl GameLoopHandle {
    /// Ask the loop to stop early.
    pub fn shutdown(&self) {
        let _ = self.commands.send(GameLoopCommand::Shutdown);
    }

    /// Wait for the loop to finish. Returns the final result if the match
    /// ended before the loop stopped.
    pub fn join(self) -> anyhow::Result<Option<MatchSummary>> {
        self.thread
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))
    }
}

/// Spawns the game loop in a new thread.
///
/// `time_scale` of 0 runs unpaced, as fast as the engine allows.
pub fn spawn_game_loop(
    config: MatchConfig,
    time_scale: f64,
    bot: Bot,
    latest_snapshot: SharedSnapshot,
) -> std::io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let thread = std::thread::Builder::new()
        .name("rangefire-game-loop".into())
        .spawn(move || {
            let mut engine = SimulationEngine::new(config);
            run_game_loop(&mut engine, bot, cmd_rx, &latest_snapshot, time_scale)
        })?;

    Ok(GameLoopHandle {
        commands: cmd_tx,
        thread,
    })
}

/// Tick duration at the given time scale. `None` means unpaced.
pub fn tick_duration(time_scale: f64) -> Option<Duration> {
    if time_scale <= 0.0 {
        None
    } else if time_scale > 0.001 {
        Some(TICK_DURATION.div_f64(time_scale))
    } else {
        Some(TICK_DURATION)
    }
}

/// One loop iteration: let the bot react to the last snapshot, then tick.
pub fn step(engine: &mut SimulationEngine, bot: &mut Bot, last: Option<&MatchSnapshot>) -> MatchSnapshot {
    engine.queue_commands(bot.plan(last));
    let snapshot = engine.tick(bot.caster_mut());
    log_events(&snapshot.events);
    snapshot
}

/// Drive a match to completion without pacing or threads. Gives up after
/// `max_ticks`.
pub fn run_headless(
    engine: &mut SimulationEngine,
    bot: &mut Bot,
    max_ticks: u64,
) -> Option<MatchSummary> {
    let mut last: Option<MatchSnapshot> = None;
    for _ in 0..max_ticks {
        let snapshot = step(engine, bot, last.as_ref());
        if let Some(summary) = snapshot.summary {
            return Some(summary);
        }
        last = Some(snapshot);
    }
    None
}

/// The game loop. Runs until the match ends, Shutdown, or channel disconnect.
fn run_game_loop(
    engine: &mut SimulationEngine,
    mut bot: Bot,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
    time_scale: f64,
) -> Option<MatchSummary> {
    let effective_tick_duration = tick_duration(time_scale);
    let mut next_tick_time = Instant::now();
    let mut last: Option<MatchSnapshot> = None;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return engine.summary(),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return engine.summary(),
            }
        }

        // 2. Bot reacts, engine advances one tick
        let snapshot = step(engine, &mut bot, last.as_ref());
        let summary = snapshot.summary;
        let over = snapshot.phase == MatchPhase::GameOver;

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }
        if over {
            return summary;
        }
        last = Some(snapshot);

        // 4. Sleep until next tick
        let Some(tick) = effective_tick_duration else {
            continue;
        };
        next_tick_time += tick;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::PowerupActivated { kind } => info!(?kind, "powerup"),
            GameEvent::Combo { combo } if *combo % 5 == 0 => info!(combo, "combo streak"),
            GameEvent::MatchEnded { reason, summary } => info!(
                ?reason,
                score = summary.score,
                accuracy = summary.accuracy_percent,
                "match ended"
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangefire_core::commands::PlayerCommand;
    use rangefire_core::difficulty::DifficultySettings;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartMatch))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();
        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartMatch)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_tick_duration() {
        // 60Hz = 16.666ms per tick
        assert_eq!(TICK_DURATION.as_nanos(), 1_000_000_000u128 / 60);
        assert_eq!(tick_duration(1.0), Some(TICK_DURATION));
        let half = tick_duration(2.0).unwrap();
        assert!(half.as_nanos().abs_diff((TICK_DURATION / 2).as_nanos()) <= 1);
        assert_eq!(tick_duration(0.0), None);
        assert_eq!(tick_duration(0.0001), Some(TICK_DURATION));
    }

    #[test]
    fn test_headless_match_runs_to_completion() {
        let config = MatchConfig {
            difficulty: DifficultySettings {
                match_duration_secs: 20,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = SimulationEngine::new(config);
        let mut bot = Bot::new(9);

        let summary = run_headless(&mut engine, &mut bot, 60 * 30).expect("match should end");
        assert_eq!(engine.phase(), MatchPhase::GameOver);
        assert!(engine.session().total_shots() > 0);
        assert_eq!(summary.score, engine.session().score());
    }

    #[test]
    fn test_threaded_loop_unpaced() {
        let config = MatchConfig {
            difficulty: DifficultySettings {
                match_duration_secs: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let latest = crate::state::shared_snapshot();
        let handle = spawn_game_loop(config, 0.0, Bot::new(1), latest.clone()).unwrap();
        let summary = handle.join().unwrap().expect("match should end");

        let snap = latest.lock().unwrap().clone().unwrap();
        assert_eq!(snap.phase, MatchPhase::GameOver);
        assert_eq!(snap.summary, Some(summary));
    }

    #[test]
    fn test_shutdown_stops_paced_loop() {
        let latest = crate::state::shared_snapshot();
        let handle =
            spawn_game_loop(MatchConfig::default(), 1.0, Bot::new(2), latest.clone()).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        handle.shutdown();
        assert_eq!(handle.join().unwrap(), None);
        assert!(latest.lock().unwrap().is_some());
    }
}
