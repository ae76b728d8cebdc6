use std::{error::Error as StdError, io};

use clap::Parser;
use glicko2_engine::RatingSystem;
use glicko2_engine_research::{encounter::RawEncounter, replay::Replay};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replays `period,player,opponent,result` CSV from stdin and prints the
/// final ratings as CSV.
#[derive(Parser, Debug)]
struct Opt {
    /// System constant constraining volatility changes.
    #[arg(long, default_value_t = 0.5)]
    tau: f64,
    #[arg(long, default_value_t = 0.000_001)]
    convergence_tolerance: f64,
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
}

#[derive(Serialize)]
struct Row<'a> {
    player: &'a str,
    rating: f64,
    deviation: f64,
    volatility: f64,
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opt = Opt::parse();

    let rating_system = RatingSystem::builder()
        .tau(opt.tau)
        .convergence_tolerance(opt.convergence_tolerance)
        .max_iterations(opt.max_iterations)
        .build();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(io::stdin().lock());

    let mut replay = Replay::new(rating_system);
    for encounter in reader.deserialize() {
        let encounter: RawEncounter = encounter?;
        replay.push(encounter)?;
    }
    replay.finish();

    let stats = replay.stats();
    info!(
        periods = stats.periods,
        games = stats.games,
        failed_updates = stats.failed_updates,
        mean_deviance = stats.mean_deviance(),
        "replay finished"
    );

    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for player in replay.players().iter() {
        let rating = replay.rating(player);
        writer.serialize(Row {
            player: replay.players().name(player),
            rating: rating.rating.0,
            deviation: rating.deviation.0,
            volatility: rating.volatility.0,
        })?;
    }
    writer.flush()?;

    Ok(())
}
