//! Hero-Wars demo
//!
//! Plays a seeded match between the two sample hero classes and prints one
//! JSON summary per round of what the skill gates let through.

use clap::Parser;
use std::path::PathBuf;

use hw_core::{default_config_toml, DemoMatch, HwConfig, HwError};

/// Command line arguments for the demo
#[derive(Parser, Debug)]
#[command(name = "hero_wars")]
#[command(about = "Plays a demo match of Hero-Wars skills")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of rounds to play
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Host seconds per simulated tick
    #[arg(long, default_value_t = 1.0)]
    tick: f32,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), HwError> {
    if args.print_default_config {
        print!("{}", default_config_toml());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            HwConfig::from_file(path)?
        }
        None => HwConfig::default(),
    };

    tracing::info!(
        seed = args.seed,
        rounds = args.rounds,
        tick = args.tick,
        scope = ?config.gates.cooldown_scope,
        "starting match"
    );
    let mut game = DemoMatch::new(config, args.seed, args.tick)?;
    tracing::info!(
        players = game.roster().len(),
        ticks_per_round = game.ticks_per_round(),
        "roster ready"
    );

    for _ in 0..args.rounds {
        let summary = game.play_round()?;
        match serde_json::to_string(&summary) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("could not serialize round summary: {}", e),
        }
    }

    for (player, hero) in game.heroes() {
        let skills: Vec<String> = hero
            .skills
            .iter()
            .map(|skill| format!("{} {}", skill.name, skill.level))
            .collect();
        tracing::info!(%player, class = %hero.class_id, level = hero.level, skills = %skills.join(", "), "final hero");
    }
    Ok(())
}
