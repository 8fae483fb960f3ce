//! Feedmark CLI - inline feedback annotation for student writing.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let generator = commands::GeneratorChoice {
        provider: cli.llm,
        model: cli.model,
    };

    let result = match cli.command {
        Commands::Review {
            writing,
            criteria,
            outcome,
            output,
        } => commands::review::run(writing, criteria, outcome, output, &generator, cli.verbose),

        Commands::Batch {
            file,
            criteria,
            output,
            json,
        } => commands::batch::run(file, criteria, output, json, &generator, cli.verbose),

        Commands::Annotate {
            feedback,
            writing,
            output,
        } => commands::annotate::run(feedback, writing, output, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "feedmark=debug" } else { "feedmark=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
