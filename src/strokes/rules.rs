//! Rule files: relative offsets per character group, absolute per-character
//! overrides, and the radical registry.
//!
//! The same rule set can be applied at table construction
//! ([`StrokeRules::apply_to_builder`]) or baked into a master CSV offline
//! ([`StrokeRules::transform_csv`]).

use super::loader::{column_index, parse_key_cell, parse_stroke_cell, DictionaryColumns};
use super::{RadicalStroke, StrokeTableBuilder};
use crate::error::{SeimeiError, SeimeiResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeRules {
    pub version: String,
    pub relative_groups: Vec<RelativeGroup>,
    pub absolute_overrides: BTreeMap<String, u32>,
    pub radicals: RadicalRules,
}

impl Default for StrokeRules {
    fn default() -> Self {
        Self {
            version: "custom".to_string(),
            relative_groups: Vec::new(),
            absolute_overrides: BTreeMap::new(),
            radicals: RadicalRules::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeGroup {
    pub offset: i32,
    pub chars: String,
}

impl RelativeGroup {
    fn members(&self) -> HashSet<char> {
        self.chars.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadicalRules {
    /// character -> radical
    pub assignments: BTreeMap<String, String>,
    /// radical -> custom stroke rule
    pub strokes: BTreeMap<String, RadicalStroke>,
    /// alias -> radical
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub rows: usize,
    pub changed: usize,
}

impl StrokeRules {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SeimeiResult<Self> {
        let content = fs::read_to_string(path)?;
        let rules: StrokeRules = serde_json::from_str(&content)?;
        debug!(
            "Rules '{}': {} relative groups, {} absolute overrides, {} radical assignments",
            rules.version,
            rules.relative_groups.len(),
            rules.absolute_overrides.len(),
            rules.radicals.assignments.len()
        );
        Ok(rules)
    }

    /// Absolute overrides keyed by a single character. Bad keys are logged and skipped.
    fn override_chars(&self) -> HashMap<char, u32> {
        let mut out = HashMap::new();
        for (key, &n) in &self.absolute_overrides {
            match parse_key_cell(key) {
                Some(c) => {
                    out.insert(c, n);
                }
                None => warn!("⚠️  Ignoring override key '{}': not a single character", key),
            }
        }
        out
    }

    /// Net relative offset per character, summed over every group listing it.
    fn net_offsets(&self) -> HashMap<char, i64> {
        let mut out: HashMap<char, i64> = HashMap::new();
        for group in &self.relative_groups {
            for c in group.members() {
                *out.entry(c).or_default() += i64::from(group.offset);
            }
        }
        out
    }

    /// Relative groups shift dictionary values by their summed offset, clamped
    /// once at 0; absolute overrides and the radical registry become table layers.
    pub fn apply_to_builder(&self, mut builder: StrokeTableBuilder) -> StrokeTableBuilder {
        for (c, offset) in self.net_offsets() {
            builder = builder.offset_dictionary_entry(c, offset);
        }

        for (c, n) in self.override_chars() {
            builder = builder.override_entry(c, n);
        }

        for (key, radical) in &self.radicals.assignments {
            match parse_key_cell(key) {
                Some(c) => builder = builder.assign_radical(c, radical),
                None => warn!(
                    "⚠️  Ignoring radical assignment '{}': not a single character",
                    key
                ),
            }
        }
        for (radical, &rule) in &self.radicals.strokes {
            builder = builder.radical_strokes(radical, rule);
        }
        for (alias, radical) in &self.radicals.aliases {
            builder = builder.radical_alias(alias, radical);
        }

        builder
    }

    /// Rewrites the stroke column of a master CSV with the relative groups and
    /// absolute overrides applied. Changed rows get `[version]` appended to `notes`
    /// when that column exists. Output carries a UTF-8 BOM.
    pub fn transform_csv<R: Read, W: Write>(
        &self,
        reader: R,
        mut writer: W,
        cols: &DictionaryColumns,
    ) -> SeimeiResult<TransformReport> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let header_record = csv::StringRecord::from(headers.clone());

        let key_idx = column_index(&header_record, &cols.key).ok_or_else(|| {
            SeimeiError::Validation(format!("CSV is missing the '{}' column", cols.key))
        })?;
        let val_idx = column_index(&header_record, &cols.value).ok_or_else(|| {
            SeimeiError::Validation(format!("CSV is missing the '{}' column", cols.value))
        })?;
        let notes_idx = column_index(&header_record, "notes");

        let offsets = self.net_offsets();
        let overrides = self.override_chars();
        let tag = format!("[{}]", self.version);

        writer.write_all(UTF8_BOM)?;
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        wtr.write_record(&headers)?;

        let mut report = TransformReport::default();

        for rec in rdr.records() {
            let rec = rec?;
            let mut fields: Vec<String> = rec.iter().map(str::to_string).collect();
            fields.resize(headers.len().max(fields.len()), String::new());
            report.rows += 1;

            let base = i64::from(parse_stroke_cell(&fields[val_idx]).or_zero());
            let mut value = base;

            if let Some(c) = parse_key_cell(&fields[key_idx]) {
                value += offsets.get(&c).copied().unwrap_or(0);
                if let Some(&n) = overrides.get(&c) {
                    value = i64::from(n);
                }
            }
            let value = value.max(0);

            fields[val_idx] = value.to_string();
            if value != base {
                report.changed += 1;
                if let Some(idx) = notes_idx {
                    let notes = fields[idx].trim_end();
                    let tagged = if notes.is_empty() {
                        tag.clone()
                    } else {
                        format!("{} {}", notes, tag)
                    };
                    fields[idx] = tagged;
                }
            }

            wtr.write_record(&fields)?;
        }

        wtr.flush()?;
        info!(
            "✅ Applied rules '{}': {} rows, {} changed",
            self.version, report.rows, report.changed
        );
        Ok(report)
    }
}
