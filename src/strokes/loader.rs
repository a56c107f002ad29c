use crate::error::{SeimeiError, SeimeiResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

/// Column holding per-character overrides in an override file.
pub const OVERRIDE_VALUE_COLUMN: &str = "strokes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryColumns {
    pub key: String,
    pub value: String,
}

impl Default for DictionaryColumns {
    fn default() -> Self {
        Self {
            key: "kanji".to_string(),
            value: "strokes_old".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedDictionary {
    pub entries: Vec<(char, u32)>,
    /// Characters whose stroke cell was blank or invalid and was stored as 0.
    pub coerced: Vec<char>,
    /// Rows dropped entirely (bad key, malformed record).
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct LoadedOverrides {
    pub entries: Vec<(char, u32)>,
    /// Rows with a bad key, an unusable value, or a malformed record.
    pub dropped: usize,
}

/// Result of parsing one stroke cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCell {
    Value(u32),
    Blank,
    Invalid,
}

impl StrokeCell {
    pub fn or_zero(self) -> u32 {
        match self {
            StrokeCell::Value(n) => n,
            StrokeCell::Blank | StrokeCell::Invalid => 0,
        }
    }
}

/// Full-width digits fold to ASCII; anything other than digits and a sign is
/// discarded before parsing. Negative values are invalid.
pub fn parse_stroke_cell(raw: &str) -> StrokeCell {
    let cleaned: String = raw
        .nfkc()
        .filter(|c| c.is_ascii_digit() || *c == '+' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return StrokeCell::Blank;
    }
    match cleaned.parse::<i64>() {
        Ok(n) if n >= 0 => u32::try_from(n)
            .map(StrokeCell::Value)
            .unwrap_or(StrokeCell::Invalid),
        _ => StrokeCell::Invalid,
    }
}

/// A key cell must be exactly one character after trimming and NFKC.
pub fn parse_key_cell(raw: &str) -> Option<char> {
    let mut chars = raw.trim().nfkc();
    let c = chars.next()?;
    match chars.next() {
        None => Some(c),
        Some(_) => None,
    }
}

pub fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
}

pub fn require_column(headers: &csv::StringRecord, name: &str) -> SeimeiResult<usize> {
    column_index(headers, name).ok_or_else(|| {
        SeimeiError::Validation(format!("CSV is missing the '{}' column", name))
    })
}

pub fn load_dictionary<R: Read>(
    reader: R,
    cols: &DictionaryColumns,
) -> SeimeiResult<LoadedDictionary> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let key_idx = require_column(&headers, &cols.key)?;
    let val_idx = require_column(&headers, &cols.value)?;

    let mut out = LoadedDictionary::default();

    for (row_idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                debug!("[Row {}] CSV Parse Error: {}", row_idx + 1, e);
                out.skipped += 1;
                continue;
            }
        };

        let key_raw = rec.get(key_idx).unwrap_or("");
        if key_raw.trim().is_empty() {
            continue;
        }
        let Some(c) = parse_key_cell(key_raw) else {
            debug!(
                "[Row {}] Key '{}' is not a single character",
                row_idx + 1,
                key_raw
            );
            out.skipped += 1;
            continue;
        };

        let cell = parse_stroke_cell(rec.get(val_idx).unwrap_or(""));
        if !matches!(cell, StrokeCell::Value(_)) {
            debug!(
                "[Row {}] '{}' has no usable stroke count ({:?}), using 0",
                row_idx + 1,
                c,
                cell
            );
            out.coerced.push(c);
        }
        out.entries.push((c, cell.or_zero()));
    }

    if !out.coerced.is_empty() {
        warn!(
            "⚠️  {} dictionary rows had blank or invalid '{}' values and count as 0.",
            out.coerced.len(),
            cols.value
        );
    }
    if out.skipped > 0 {
        warn!("⚠️  Skipped {} invalid dictionary rows.", out.skipped);
    }
    debug!("Loaded {} dictionary rows", out.entries.len());

    Ok(out)
}

pub fn load_dictionary_file<P: AsRef<Path>>(
    path: P,
    cols: &DictionaryColumns,
) -> SeimeiResult<LoadedDictionary> {
    let file = File::open(path)?;
    load_dictionary(file, cols)
}

/// Override files use `strokes`, falling back to the dictionary value column.
/// Unusable values are dropped: an override of 0 would mask the dictionary.
pub fn load_overrides<R: Read>(
    reader: R,
    cols: &DictionaryColumns,
) -> SeimeiResult<LoadedOverrides> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let key_idx = require_column(&headers, &cols.key)?;
    let val_idx = match column_index(&headers, OVERRIDE_VALUE_COLUMN) {
        Some(idx) => idx,
        None => require_column(&headers, &cols.value)?,
    };

    let mut out = LoadedOverrides::default();

    for (row_idx, result) in rdr.records().enumerate() {
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                debug!("[Row {}] CSV Parse Error: {}", row_idx + 1, e);
                out.dropped += 1;
                continue;
            }
        };
        let Some(c) = rec.get(key_idx).and_then(parse_key_cell) else {
            out.dropped += 1;
            continue;
        };
        match parse_stroke_cell(rec.get(val_idx).unwrap_or("")) {
            StrokeCell::Value(n) => out.entries.push((c, n)),
            _ => out.dropped += 1,
        }
    }

    if out.dropped > 0 {
        warn!("⚠️  Dropped {} unusable override rows.", out.dropped);
    }
    debug!("Loaded {} overrides", out.entries.len());

    Ok(out)
}

pub fn load_overrides_file<P: AsRef<Path>>(
    path: P,
    cols: &DictionaryColumns,
) -> SeimeiResult<LoadedOverrides> {
    let file = File::open(path)?;
    load_overrides(file, cols)
}
