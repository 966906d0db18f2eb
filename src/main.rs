//! Odds Engine - Entry Point
//!
//! Command-line front end over the pricing library. Every subcommand
//! prints its result as pretty JSON on stdout; logs go to stderr.
//!
//! Wiring sequence:
//! 1. Parse arguments
//! 2. Load config (file if given, defaults otherwise)
//! 3. Init tracing (`RUST_LOG` wins over the configured level)
//! 4. Build the `FixturePricer` and run the subcommand

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use odds_engine::config::loader::load_config;
use odds_engine::config::{EngineConfig, LoggingConfig};
use odds_engine::domain::outcome::Quote;
use odds_engine::domain::value::closing_line_value;
use odds_engine::ports::pricing::FairPriceSource;
use odds_engine::usecases::fixture_pricer::FixturePricer;
use odds_engine::usecases::slate::{FixtureRequest, SlateAnalyzer};

/// Football odds engine - fair prices, margin removal and staking.
#[derive(Parser, Debug)]
#[command(name = "odds-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults apply without one)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Goal markets from expected goals (Poisson)
    Goals {
        /// Home expected goals
        #[arg(long)]
        home_rate: f64,
        /// Away expected goals
        #[arg(long)]
        away_rate: f64,
    },

    /// Home/draw/away from team ratings (Elo)
    Ratings {
        #[arg(long)]
        home_rating: f64,
        #[arg(long)]
        away_rating: f64,
    },

    /// Fair odds under four margin-removal models
    Margin {
        #[arg(long)]
        home: f64,
        #[arg(long)]
        draw: f64,
        #[arg(long)]
        away: f64,
    },

    /// Scan bookmaker quotes for arbitrage
    Arbitrage {
        /// Quote as NAME:HOME,DRAW,AWAY (repeatable)
        #[arg(long = "quote", required = true)]
        quotes: Vec<Quote>,
        /// Total amount to split across outcomes
        #[arg(long, default_value = "100")]
        investment: f64,
    },

    /// Kelly fractions and capped stake for one price
    Kelly {
        /// Fair probability of the outcome
        #[arg(long)]
        probability: f64,
        /// Offered decimal odds
        #[arg(long)]
        odds: f64,
        /// Bankroll for the stake recommendation
        #[arg(long, default_value = "1000")]
        bankroll: Decimal,
    },

    /// Value report for one fixture against bookmaker quotes
    Value {
        /// Price with expected goals: HOME AWAY
        #[arg(long, num_args = 2, value_names = ["HOME", "AWAY"], conflicts_with = "ratings", required_unless_present = "ratings")]
        xg: Option<Vec<f64>>,
        /// Price with team ratings: HOME AWAY
        #[arg(long, num_args = 2, value_names = ["HOME", "AWAY"])]
        ratings: Option<Vec<f64>>,
        /// Quote as NAME:HOME,DRAW,AWAY (repeatable)
        #[arg(long = "quote")]
        quotes: Vec<Quote>,
        #[arg(long, default_value = "1000")]
        bankroll: Decimal,
    },

    /// Closing line value of a placed bet
    Clv {
        /// Odds the bet was struck at
        #[arg(long)]
        placed: f64,
        /// Odds at kick-off
        #[arg(long)]
        closing: f64,
    },

    /// Price a JSON slate of fixtures in parallel
    Slate {
        /// JSON array of fixture requests
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "1000")]
        bankroll: Decimal,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let mut config = match &cli.config {
        Some(path) => load_config(path).context("Failed to load configuration")?,
        None => EngineConfig::default(),
    };
    if cli.json_logs {
        config.logging.json = true;
    }

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "Starting odds engine"
    );

    // ── 3. Build models and dispatch ────────────────────────
    let pricer = FixturePricer::from_config(&config).context("Invalid model configuration")?;
    run(&pricer, cli.command)
}

/// Structured logging to stderr so stdout carries only results.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(pricer: &FixturePricer, command: Commands) -> Result<()> {
    match command {
        Commands::Goals {
            home_rate,
            away_rate,
        } => print_json(&pricer.goal_markets(home_rate, away_rate)?),

        Commands::Ratings {
            home_rating,
            away_rating,
        } => print_json(&pricer.rating_markets(home_rating, away_rating)?),

        Commands::Margin { home, draw, away } => {
            print_json(&pricer.remove_margin(home, draw, away)?)
        }

        Commands::Arbitrage {
            quotes,
            investment,
        } => {
            let plan = pricer
                .arbitrage(&quotes, investment)
                .context("Arbitrage needs at least one quote and a positive investment")?;
            print_json(&plan)
        }

        Commands::Kelly {
            probability,
            odds,
            bankroll,
        } => {
            let assessment = pricer.assess(probability, odds)?;
            let sizer = pricer.sizer();
            print_json(&serde_json::json!({
                "assessment": assessment,
                "kelly": pricer.kelly(probability, odds),
                "tier": sizer.tier(),
                "fraction": sizer.fraction(probability, odds),
                "stake": sizer.stake(bankroll, probability, odds),
            }))
        }

        Commands::Value {
            xg,
            ratings,
            quotes,
            bankroll,
        } => {
            let source: Box<dyn FairPriceSource> = match (xg.as_deref(), ratings.as_deref()) {
                (Some(&[home, away]), _) => Box::new(pricer.expected_goals_source(home, away)),
                (_, Some(&[home, away])) => Box::new(pricer.rating_source(home, away)),
                _ => anyhow::bail!("value needs either --xg HOME AWAY or --ratings HOME AWAY"),
            };
            print_json(&pricer.value_report(source.as_ref(), &quotes, bankroll)?)
        }

        Commands::Clv { placed, closing } => {
            let clv = closing_line_value(placed, closing)?;
            print_json(&serde_json::json!({
                "placed": placed,
                "closing": closing,
                "clv": clv,
            }))
        }

        Commands::Slate { file, bankroll } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read slate file: {}", file.display()))?;
            let fixtures: Vec<FixtureRequest> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid slate in {}", file.display()))?;
            let analyzer = SlateAnalyzer::new(pricer.clone(), bankroll);
            print_json(&analyzer.price_slate(&fixtures))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{rendered}");
    Ok(())
}
