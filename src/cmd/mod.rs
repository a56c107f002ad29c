pub mod apply_rules;
pub mod batch;
pub mod calc;
pub mod lookup;

use seimei::config::Config;
use seimei::error::SeimeiResult;
use seimei::normalize::Normalizer;
use seimei::strokes::StrokeTable;
use tracing::debug;

/// Everything a grading command needs, loaded once up front.
pub struct Engine {
    pub table: StrokeTable,
    pub normalizer: Normalizer,
}

impl Engine {
    pub fn load(config: &Config) -> SeimeiResult<Self> {
        let normalizer = config.normalizer.build_normalizer()?;
        debug!("Normalizer: {} variant mappings", normalizer.variant_count());
        let table = StrokeTable::load(&config.sources)?;
        Ok(Self { table, normalizer })
    }
}
