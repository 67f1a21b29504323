//! Token Gate Operator CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use tokengate_app::domain::{
    risk::{classify_raw, decision_for},
    verification::{Adjudicator, LexiconAdjudicator},
};

#[derive(Debug, Parser)]
#[command(name = "tokengate-app", about = "Token Gate CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the tier and decision a risk score maps to
    Classify(ClassifyArgs),

    /// Show how a verification response would be adjudicated
    Adjudicate(AdjudicateArgs),
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Risk score in 0..=100
    #[arg(long, allow_negative_numbers = true)]
    score: i64,
}

#[derive(Debug, Args)]
struct AdjudicateArgs {
    /// Free-text verification response
    #[arg(long)]
    response: String,
}

pub fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Classify(args) => classify(&args),
        Commands::Adjudicate(args) => {
            adjudicate(&args);

            Ok(())
        }
    }
}

fn classify(args: &ClassifyArgs) -> Result<(), String> {
    let tier = classify_raw(args.score).map_err(|error| error.to_string())?;

    println!("risk_level: {tier}");
    println!("decision: {}", decision_for(tier));
    println!("requires_verification: {}", tier.requires_verification());

    Ok(())
}

fn adjudicate(args: &AdjudicateArgs) {
    let verified = LexiconAdjudicator::new().adjudicate(&args.response);

    println!("verified: {verified}");
}
