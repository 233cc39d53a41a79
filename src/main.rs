mod app;

use std::path::PathBuf;

use clap::Parser;

/// Headless butterfly garden: runs the simulation over a mock page.
#[derive(Parser, Debug)]
#[command(name = "garden", version, about)]
struct Args {
    /// JSON config file; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f64,

    /// Number of words on the mock page
    #[arg(long, default_value_t = 24)]
    words: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    log::info!("butterfly garden starting up");

    let args = Args::parse();
    let options = app::RunOptions {
        config: args.config,
        seconds: args.seconds,
        words: args.words,
        seed: args.seed,
    };

    if let Err(e) = app::run(options) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
