use anyhow::Context;
use tracing::info;

use rangefire_app::bot::Bot;
use rangefire_app::game_loop::spawn_game_loop;
use rangefire_app::leaderboard::{Leaderboard, LeaderboardEntry};
use rangefire_app::settings::Settings;
use rangefire_app::state::shared_snapshot;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = Settings::from_env();
    let config = settings.match_config();
    config.validate().context("invalid match configuration")?;
    info!(
        seed = settings.seed,
        time_scale = settings.time_scale,
        scoring = ?settings.scoring,
        "starting match"
    );

    let bot = Bot::new(settings.seed.wrapping_add(1));
    let handle = spawn_game_loop(config, settings.time_scale, bot, shared_snapshot())
        .context("failed to spawn game loop")?;
    let Some(summary) = handle.join()? else {
        println!("Match stopped before it ended.");
        return Ok(());
    };

    let mut board = Leaderboard::load(&settings.leaderboard_path)?;
    let rank = board.submit(LeaderboardEntry::from_summary(&settings.player_name, &summary));
    board.save(&settings.leaderboard_path)?;

    println!("Match over: {:?}", summary.reason);
    println!("  Score:       {}", summary.score);
    println!("  Accuracy:    {}%", summary.accuracy_percent);
    println!("  Hits:        {}", summary.total_hits);
    println!("  Best combo:  {}", summary.best_combo);
    match rank {
        Some(rank) => println!("  Leaderboard: #{rank}"),
        None => println!("  Leaderboard: not placed"),
    }
    if let Some(high) = board.high_score() {
        println!("  High score:  {high}");
    }

    Ok(())
}
