use super::Engine;
use crate::reports;
use clap::Args;
use seimei::config::Config;
use seimei::error::SeimeiResult;
use seimei::grades::{calculate_with, GradeResult};
use seimei::strokes::loader::require_column;
use std::fs::File;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: Config,

    /// CSV with `family` and `given` columns
    pub input: String,

    /// One JSON object per line instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &BatchArgs, engine: &Engine) -> SeimeiResult<()> {
    info!("📂 Reading names: {}", args.input);
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(File::open(&args.input)?);

    let headers = rdr.headers()?.clone();
    let family_idx = require_column(&headers, "family")?;
    let given_idx = require_column(&headers, "given")?;

    let mut results: Vec<GradeResult> = Vec::new();
    let mut graded = 0usize;
    for (line, rec) in rdr.records().enumerate() {
        let rec = match rec {
            Ok(r) => r,
            Err(e) => {
                warn!("⚠️  Skipping row {}: {}", line + 2, e);
                continue;
            }
        };
        let family = rec.get(family_idx).unwrap_or("");
        let given = rec.get(given_idx).unwrap_or("");
        let result = calculate_with(&engine.normalizer, family, given, &engine.table);
        graded += 1;

        // JSON lines stream out; only the table needs every row at once.
        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            results.push(result);
        }
    }

    if !args.json {
        reports::print_batch_table(&results);
    }
    info!("✅ Graded {} names", graded);
    Ok(())
}
