//! dicestat - odds for tabletop dice checks

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dicestat::engine::build_distribution;
use dicestat::report::default_dc;
use dicestat::{sample, AdvantageMode, Die, Report, RollReport, SampleMode, Settings, SignedDie};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Outcome distribution and success odds for a dice check
#[derive(Parser, Debug)]
#[command(name = "dicestat", version, about = "Odds for tabletop dice checks")]
struct Args {
    /// Settings file (defaults to ./dicestat.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the distribution of totals and the success chance at the DC
    Chart {
        #[command(flatten)]
        check: CheckArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Roll once and report success or failure against the DC
    Roll {
        #[command(flatten)]
        check: CheckArgs,

        /// Seed for a reproducible roll
        #[arg(long)]
        seed: Option<u64>,

        /// faithful or corrected
        #[arg(long)]
        mode: Option<SampleMode>,

        /// Print the roll as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Command-line overrides for the loaded settings
#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Main die, e.g. d20
    #[arg(short, long)]
    die: Option<Die>,

    /// Roll the main die twice and keep the higher
    #[arg(long, conflicts_with = "disadvantage")]
    advantage: bool,

    /// Roll the main die twice and keep the lower
    #[arg(long)]
    disadvantage: bool,

    /// Extra die such as +d4 or -d6 (can be specified multiple times)
    #[arg(short = 'x', long = "extra", allow_hyphen_values = true)]
    extras: Vec<SignedDie>,

    /// Flat modifier
    #[arg(short, long, allow_hyphen_values = true)]
    modifier: Option<i32>,

    /// Difficulty class to meet or beat
    #[arg(long, allow_hyphen_values = true)]
    dc: Option<i32>,
}

impl CheckArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(die) = self.die {
            settings.main_die = die;
        }
        if self.advantage {
            settings.advantage = AdvantageMode::Advantage;
        } else if self.disadvantage {
            settings.advantage = AdvantageMode::Disadvantage;
        }
        if !self.extras.is_empty() {
            settings.extras = self.extras.clone();
        }
        if let Some(modifier) = self.modifier {
            settings.modifier = modifier;
        }
        if let Some(dc) = self.dc {
            settings.dc = Some(dc);
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dicestat=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;

    match args.command {
        Command::Chart { check, json } => {
            check.apply(&mut settings);
            let config = settings.roll_configuration()?;
            info!(config = %config, "charting");

            let report = Report::build(&config, settings.dc)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
        }
        Command::Roll {
            check,
            seed,
            mode,
            json,
        } => {
            check.apply(&mut settings);
            if let Some(mode) = mode {
                settings.sample_mode = mode;
            }
            let config = settings.roll_configuration()?;
            let dc = match settings.dc {
                Some(dc) => dc,
                None => default_dc(&build_distribution(&config)?),
            };

            if settings.sample_mode == SampleMode::Faithful {
                warn!("faithful mode ignores advantage, subtracted dice and the modifier");
            }

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            let roll = sample(&config, settings.sample_mode, &mut rng)?;
            info!(config = %config, total = roll.total, dc, "rolled");

            let report = RollReport::new(&config, dc, roll);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.render());
            }
        }
    }

    Ok(())
}
