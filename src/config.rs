use crate::error::{SeimeiError, SeimeiResult};
use crate::normalize::Normalizer;
use crate::strokes::loader::DictionaryColumns;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_DICTIONARY: &str = "kanji_master_custom.csv";

/// Tried in order when the default dictionary is absent.
pub const DICTIONARY_CANDIDATES: &[&str] = &[
    "kanji_master_custom.csv",
    "kanji_master_joyo.csv",
    "kanji_master_cultural_affairs.csv",
];

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub sources: DataSources,
    #[command(flatten)]
    pub normalizer: NormalizerSettings,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// Master CSV (kanji, strokes_old, ...)
    #[arg(long, default_value = DEFAULT_DICTIONARY)]
    pub dict: String,
    /// CSV of per-character overrides (kanji, strokes)
    #[arg(long)]
    pub overrides: Option<String>,
    /// JSON rule file (relative groups, absolute overrides, radicals)
    #[arg(long)]
    pub rules: Option<String>,
    #[arg(long, default_value = "kanji")]
    pub key_column: String,
    #[arg(long, default_value = "strokes_old")]
    pub stroke_column: String,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            dict: DEFAULT_DICTIONARY.to_string(),
            overrides: None,
            rules: None,
            key_column: "kanji".to_string(),
            stroke_column: "strokes_old".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NormalizerSettings {
    /// Extra variant pairs, e.g. "澤=沢,籠=篭"
    #[arg(long, default_value = "")]
    pub extra_variants: String,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SeimeiResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies over only the values the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(sources.dict, "dict");
        update_if_present!(sources.overrides, "overrides");
        update_if_present!(sources.rules, "rules");
        update_if_present!(sources.key_column, "key_column");
        update_if_present!(sources.stroke_column, "stroke_column");

        update_if_present!(normalizer.extra_variants, "extra_variants");
    }
}

impl DataSources {
    pub fn columns(&self) -> DictionaryColumns {
        DictionaryColumns {
            key: self.key_column.clone(),
            value: self.stroke_column.clone(),
        }
    }

    /// The configured dictionary, or for the default name the first known
    /// candidate that exists in the working directory.
    pub fn resolve_dictionary_path(&self) -> SeimeiResult<PathBuf> {
        let path = Path::new(&self.dict);
        if path.exists() {
            return Ok(path.to_path_buf());
        }

        if self.dict == DEFAULT_DICTIONARY {
            if let Some(found) = DICTIONARY_CANDIDATES
                .iter()
                .map(Path::new)
                .find(|p| p.exists())
            {
                warn!(
                    "⚠️  '{}' not found, falling back to '{}'.",
                    self.dict,
                    found.display()
                );
                return Ok(found.to_path_buf());
            }
        }

        Err(SeimeiError::Config(format!(
            "Dictionary not found: '{}'",
            self.dict
        )))
    }
}

impl NormalizerSettings {
    pub fn build_normalizer(&self) -> SeimeiResult<Normalizer> {
        let extra = parse_variant_pairs(&self.extra_variants)?;
        Normalizer::with_extra_variants(&extra)
    }
}

/// Parses `"a=b,c=d"` into character pairs. Blank input yields no pairs.
pub fn parse_variant_pairs(s: &str) -> SeimeiResult<Vec<(char, char)>> {
    let mut pairs = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (from, to) = part.split_once('=').ok_or_else(|| {
            SeimeiError::Config(format!("Variant pair '{}' must look like 'a=b'", part))
        })?;
        match (single_char(from), single_char(to)) {
            (Some(f), Some(t)) => pairs.push((f, t)),
            _ => {
                return Err(SeimeiError::Config(format!(
                    "Variant pair '{}' must map one character to one character",
                    part
                )))
            }
        }
    }
    Ok(pairs)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
