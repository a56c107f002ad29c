use super::Engine;
use crate::reports;
use clap::Args;
use seimei::config::Config;
use seimei::error::SeimeiResult;
use seimei::strokes::StrokeSource;
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    #[command(flatten)]
    pub config: Config,

    /// Characters to look up
    pub chars: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct LookupRow {
    pub ch: char,
    pub strokes: u32,
    pub source: StrokeSource,
}

pub fn run(args: &LookupArgs, engine: &Engine) -> SeimeiResult<()> {
    let name = engine.normalizer.normalize(&args.chars);
    let rows: Vec<LookupRow> = name
        .chars()
        .iter()
        .map(|&ch| {
            let r = engine.table.resolve(ch);
            LookupRow {
                ch,
                strokes: r.strokes,
                source: r.source,
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        reports::print_lookup_table(&rows);
    }
    Ok(())
}
