use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use seimei::config::Config;
use seimei::error::{SeimeiError, SeimeiResult};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Five-grade (五格) name numerology calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON profile with dictionary/rules/variant settings
    #[arg(global = true, long)]
    profile: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade a single name
    Calc(cmd::calc::CalcArgs),
    /// Grade every row of a family,given CSV
    Batch(cmd::batch::BatchArgs),
    /// Show the resolved stroke count of each character
    Lookup(cmd::lookup::LookupArgs),
    /// Bake a rule file into a master CSV
    ApplyRules(cmd::apply_rules::ApplyRulesArgs),
}

impl Commands {
    fn config(&self) -> &Config {
        match self {
            Commands::Calc(args) => &args.config,
            Commands::Batch(args) => &args.config,
            Commands::Lookup(args) => &args.config,
            Commands::ApplyRules(args) => &args.config,
        }
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli, matches: &clap::ArgMatches) -> SeimeiResult<()> {
    // Subcommand args live in the subcommand's matches, not the root.
    let (_, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| SeimeiError::Config("No subcommand given".to_string()))?;

    let config = match &cli.profile {
        Some(path) => {
            info!("⚙️  Loading Profile: {}", path);
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli.command.config(), sub_matches);
            file_config
        }
        None => cli.command.config().clone(),
    };

    match &cli.command {
        Commands::ApplyRules(args) => cmd::apply_rules::run(args, &config),
        Commands::Calc(args) => cmd::calc::run(args, &cmd::Engine::load(&config)?),
        Commands::Batch(args) => cmd::batch::run(args, &cmd::Engine::load(&config)?),
        Commands::Lookup(args) => cmd::lookup::run(args, &cmd::Engine::load(&config)?),
    }
}
