mod cli;

use clap::Parser;

use cli::{Args, CliResult, Command};
use textart::config::Config;

/// Default log filter; `RUST_LOG` takes precedence when set.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn logger_builder(verbose: bool, env: env_logger::Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(default_filter(verbose)))
}

/// Initialize logging based on verbosity flag.
fn init_logger(verbose: bool) {
    logger_builder(verbose, env_logger::Env::default()).init();
}

fn run(args: Args) -> CliResult {
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Convert(convert) => cli::run_convert(&convert, &config),
        Command::ListPresets { glyphs, json } => cli::run_list_presets(glyphs, json),
        Command::Suggest { image, width } => cli::run_suggest(&image, width),
        Command::Config { action } => {
            cli::handle_config_action(action, args.config.as_deref(), &config)
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
