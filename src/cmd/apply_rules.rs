use clap::Args;
use seimei::config::Config;
use seimei::error::SeimeiResult;
use seimei::strokes::rules::StrokeRules;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ApplyRulesArgs {
    #[command(flatten)]
    pub config: Config,

    /// Master CSV to transform
    pub input: String,

    /// JSON rule file
    #[arg(value_name = "RULES")]
    pub rules_file: String,

    #[arg(short, long, default_value = "output.csv")]
    pub output: String,
}

pub fn run(args: &ApplyRulesArgs, config: &Config) -> SeimeiResult<()> {
    info!("📐 Loading Stroke Rules: {}", args.rules_file);
    let rules = StrokeRules::load_from_file(&args.rules_file)?;

    let reader = BufReader::new(File::open(&args.input)?);
    let writer = BufWriter::new(File::create(&args.output)?);
    let report = rules.transform_csv(reader, writer, &config.sources.columns())?;

    println!(
        "✅ {} rows processed, {} changed -> {}",
        report.rows, report.changed, args.output
    );
    Ok(())
}
