pub mod loader;
pub mod rules;

use crate::config::DataSources;
use crate::error::SeimeiResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::Display;
use tracing::{debug, info};

/// How a radical's custom stroke count applies to characters carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadicalStroke {
    /// Use this count for the whole character.
    Absolute(u32),
    /// Adjust the dictionary count. Needs a dictionary entry for the character.
    Offset(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StrokeSource {
    Override,
    Radical,
    Dictionary,
    Unregistered,
    Ghost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub strokes: u32,
    pub source: StrokeSource,
}

/// Character -> stroke count lookup with override layers.
///
/// Immutable once built; share it by reference.
#[derive(Debug, Clone, Default)]
pub struct StrokeTable {
    dictionary: HashMap<char, u32>,
    overrides: HashMap<char, u32>,
    char_radicals: HashMap<char, String>,
    radical_strokes: HashMap<String, RadicalStroke>,
    // alias -> canonical radical
    alias_of: HashMap<String, String>,
    // canonical radical -> aliases, registration order
    aliases: HashMap<String, Vec<String>>,
}

impl StrokeTable {
    pub fn builder() -> StrokeTableBuilder {
        StrokeTableBuilder::default()
    }

    /// Builds the table described by `sources`: dictionary, then rules, then the
    /// override file (which wins over rule overrides).
    pub fn load(sources: &DataSources) -> SeimeiResult<Self> {
        let cols = sources.columns();
        let dict_path = sources.resolve_dictionary_path()?;
        info!("📂 Loading Dictionary: {}", dict_path.display());
        let dict = loader::load_dictionary_file(&dict_path, &cols)?;

        let mut builder = StrokeTable::builder().dictionary(dict.entries);

        if let Some(path) = &sources.rules {
            info!("📐 Loading Stroke Rules: {}", path);
            let rules = rules::StrokeRules::load_from_file(path)?;
            builder = rules.apply_to_builder(builder);
        }

        if let Some(path) = &sources.overrides {
            info!("✏️  Loading Overrides: {}", path);
            let overrides = loader::load_overrides_file(path, &cols)?;
            for (c, n) in overrides.entries {
                builder = builder.override_entry(c, n);
            }
        }

        let table = builder.build();
        info!(
            "✅ Stroke table ready: {} dictionary entries, {} overrides, {} radical assignments",
            table.dictionary_len(),
            table.overrides.len(),
            table.char_radicals.len()
        );
        Ok(table)
    }

    pub fn dictionary_len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn dictionary_value(&self, c: char) -> Option<u32> {
        self.dictionary.get(&c).copied()
    }

    pub fn stroke_of(&self, c: char) -> u32 {
        self.resolve(c).strokes
    }

    /// Override -> radical -> dictionary -> 0.
    pub fn resolve(&self, c: char) -> Resolved {
        if let Some(&strokes) = self.overrides.get(&c) {
            return Resolved {
                strokes,
                source: StrokeSource::Override,
            };
        }

        if let Some(strokes) = self.radical_count(c) {
            return Resolved {
                strokes,
                source: StrokeSource::Radical,
            };
        }

        match self.dictionary.get(&c) {
            Some(&strokes) => Resolved {
                strokes,
                source: StrokeSource::Dictionary,
            },
            None => Resolved {
                strokes: 0,
                source: StrokeSource::Unregistered,
            },
        }
    }

    fn radical_count(&self, c: char) -> Option<u32> {
        let radical = self.char_radicals.get(&c)?;
        let rule = self.alias_group(radical).find_map(|r| self.radical_strokes.get(r))?;

        match *rule {
            RadicalStroke::Absolute(n) => Some(n),
            RadicalStroke::Offset(delta) => {
                let base = *self.dictionary.get(&c)?;
                Some(base.saturating_add_signed(delta))
            }
        }
    }

    /// `radical`, its canonical form (if it is an alias), then every alias of the
    /// canonical form.
    fn alias_group<'a>(&'a self, radical: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let canonical = self
            .alias_of
            .get(radical)
            .map(String::as_str)
            .unwrap_or(radical);
        let aliases = self
            .aliases
            .get(canonical)
            .into_iter()
            .flatten()
            .map(String::as_str);

        std::iter::once(radical)
            .chain(std::iter::once(canonical))
            .chain(aliases)
    }
}

#[derive(Debug, Default)]
pub struct StrokeTableBuilder {
    table: StrokeTable,
}

impl StrokeTableBuilder {
    pub fn dictionary<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (char, u32)>,
    {
        self.table.dictionary.extend(entries);
        self
    }

    pub fn dictionary_entry(mut self, c: char, strokes: u32) -> Self {
        self.table.dictionary.insert(c, strokes);
        self
    }

    /// Adds `offset` to an existing dictionary value, clamped to `0..=u32::MAX`.
    /// Characters missing from the dictionary are left alone.
    pub fn offset_dictionary_entry(mut self, c: char, offset: i64) -> Self {
        if let Some(v) = self.table.dictionary.get_mut(&c) {
            let shifted = (i64::from(*v) + offset).clamp(0, i64::from(u32::MAX));
            *v = u32::try_from(shifted).unwrap_or(u32::MAX);
        }
        self
    }

    pub fn override_entry(mut self, c: char, strokes: u32) -> Self {
        self.table.overrides.insert(c, strokes);
        self
    }

    pub fn assign_radical(mut self, c: char, radical: &str) -> Self {
        self.table.char_radicals.insert(c, radical.to_string());
        self
    }

    pub fn radical_strokes(mut self, radical: &str, rule: RadicalStroke) -> Self {
        self.table.radical_strokes.insert(radical.to_string(), rule);
        self
    }

    pub fn radical_alias(mut self, alias: &str, radical: &str) -> Self {
        if alias == radical {
            return self;
        }
        self.table
            .alias_of
            .insert(alias.to_string(), radical.to_string());
        let group = self.table.aliases.entry(radical.to_string()).or_default();
        if !group.iter().any(|a| a == alias) {
            group.push(alias.to_string());
        }
        self
    }

    pub fn build(self) -> StrokeTable {
        debug!(
            "Stroke table layers: dict={} overrides={} radicals={} radical_rules={} aliases={}",
            self.table.dictionary.len(),
            self.table.overrides.len(),
            self.table.char_radicals.len(),
            self.table.radical_strokes.len(),
            self.table.alias_of.len()
        );
        self.table
    }
}
