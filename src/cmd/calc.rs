use super::Engine;
use crate::reports;
use clap::Args;
use seimei::config::Config;
use seimei::error::SeimeiResult;
use seimei::grades::calculate_with;

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[command(flatten)]
    pub config: Config,

    /// Family name (姓)
    #[arg(short, long)]
    pub family: String,

    /// Given name (名)
    #[arg(short, long)]
    pub given: String,

    /// Print the full result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also print the per-character breakdown
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

pub fn run(args: &CalcArgs, engine: &Engine) -> SeimeiResult<()> {
    let result = calculate_with(&engine.normalizer, &args.family, &args.given, &engine.table);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    reports::print_names(&result);
    reports::print_grade_table(&result);
    if args.verbose {
        reports::print_breakdown(&result.breakdown);
    }
    reports::print_missing(&result.missing);
    Ok(())
}
