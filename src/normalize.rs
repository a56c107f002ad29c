//! Name normalization: NFKC, variant-character aliasing, iteration-mark expansion.

use crate::error::{SeimeiError, SeimeiResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Repeats the preceding character ("佐々木" -> "佐佐木").
pub const ITERATION_MARK: char = '々';

/// Old/compatibility forms folded onto the form the dictionaries are keyed by.
pub const BUILTIN_VARIANTS: &[(char, char)] = &[('髙', '高'), ('﨑', '崎'), ('邊', '辺'), ('邉', '辺')];

/// A name after normalization. Holds no iteration marks except a leading one
/// that had nothing to repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct NormalizedName {
    chars: Vec<char>,
}

impl NormalizedName {
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    pub fn last(&self) -> Option<char> {
        self.chars.last().copied()
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<NormalizedName> for String {
    fn from(name: NormalizedName) -> Self {
        name.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    variants: HashMap<char, char>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            variants: BUILTIN_VARIANTS.iter().copied().collect(),
        }
    }
}

impl Normalizer {
    /// Builtin map extended with `extra` pairs.
    ///
    /// A pair whose target is itself a variant key is rejected: chains would make
    /// `normalize` non-idempotent. Both sides must also be NFKC-stable, since NFKC
    /// runs before the variant map.
    pub fn with_extra_variants(extra: &[(char, char)]) -> SeimeiResult<Self> {
        let mut variants: HashMap<char, char> = BUILTIN_VARIANTS.iter().copied().collect();
        for &(from, to) in extra {
            if let Some(c) = [from, to].into_iter().find(|&c| !is_nfkc_stable(c)) {
                return Err(SeimeiError::Config(format!(
                    "variant '{}' -> '{}': '{}' changes under NFKC",
                    from, to, c
                )));
            }
            variants.insert(from, to);
        }

        for (from, to) in &variants {
            if variants.contains_key(to) {
                return Err(SeimeiError::Config(format!(
                    "variant '{}' -> '{}' points at another variant key",
                    from, to
                )));
            }
            if *to == ITERATION_MARK {
                return Err(SeimeiError::Config(format!(
                    "variant '{}' may not map to the iteration mark",
                    from
                )));
            }
        }

        Ok(Self { variants })
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    pub fn normalize(&self, raw: &str) -> NormalizedName {
        let mut chars: Vec<char> = Vec::with_capacity(raw.len());
        for c in raw.nfkc() {
            let c = self.variants.get(&c).copied().unwrap_or(c);
            let c = match (c, chars.last()) {
                (ITERATION_MARK, Some(&prev)) => prev,
                _ => c,
            };
            chars.push(c);
        }
        NormalizedName { chars }
    }
}

fn is_nfkc_stable(c: char) -> bool {
    c.to_string().nfkc().eq(std::iter::once(c))
}

/// Normalizes with the builtin variant map.
pub fn normalize(raw: &str) -> NormalizedName {
    Normalizer::default().normalize(raw)
}
