mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{boundary, choropleth, grid, types};

/// Warn by default, `-v` for stage summaries, `-vv` for per-record decisions.
/// `RUST_LOG` takes precedence when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Boundary(args) => boundary::run(&cli, args),
        Commands::Grid(args) => grid::run(&cli, args),
        Commands::Types(args) => types::run(&cli, args),
        Commands::Choropleth(args) => choropleth::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
