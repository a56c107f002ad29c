//! The five-grade (五格) formula engine.

mod side;
pub mod types;

pub use self::types::{
    Breakdown, BreakdownRow, Derivation, Grade, GradeKind, GradeResult, RowKind, SideForm,
    SideGrade, Term, TermLabel, ALL_CYCLE, GHOST_GLYPH, GHOST_STROKE,
};

use crate::normalize::{NormalizedName, Normalizer};
use crate::strokes::{Resolved, StrokeSource, StrokeTable};
use tracing::warn;

/// Folds a raw All sum above 60 back into 1..=60 (61 -> 1, 120 -> 60).
pub fn wrap_total(raw: u32) -> u32 {
    if raw > ALL_CYCLE {
        (raw - 1) % ALL_CYCLE + 1
    } else {
        raw
    }
}

/// Grades `family`/`given` using the builtin variant map.
pub fn calculate(family: &str, given: &str, table: &StrokeTable) -> GradeResult {
    calculate_with(&Normalizer::default(), family, given, table)
}

pub fn calculate_with(
    normalizer: &Normalizer,
    family: &str,
    given: &str,
    table: &StrokeTable,
) -> GradeResult {
    calculate_normalized(normalizer.normalize(family), normalizer.normalize(given), table)
}

pub fn calculate_normalized(
    family: NormalizedName,
    given: NormalizedName,
    table: &StrokeTable,
) -> GradeResult {
    let resolve_all = |name: &NormalizedName| -> Vec<(char, Resolved)> {
        name.chars().iter().map(|&c| (c, table.resolve(c))).collect()
    };
    let f_res = resolve_all(&family);
    let g_res = resolve_all(&given);

    let to_terms = |res: &[(char, Resolved)]| -> Vec<Term> {
        res.iter().map(|(c, r)| Term::char(*c, r.strokes)).collect()
    };
    let f_terms = to_terms(&f_res);
    let g_terms = to_terms(&g_res);

    let ghost_head = f_terms.len() == 1;
    let ghost_tail = g_terms.len() == 1;

    // Top / Foot
    let mut top_terms = f_terms.clone();
    if ghost_head {
        top_terms.push(Term::ghost());
    }
    let mut foot_terms = g_terms.clone();
    if ghost_tail {
        foot_terms.push(Term::ghost());
    }

    // Heart
    let heart_terms = match (f_terms.last(), g_terms.first()) {
        (Some(&last), Some(&first)) => vec![last, first],
        _ => Vec::new(),
    };

    // All (never ghost)
    let all_derivation =
        Derivation::from_terms(f_terms.iter().chain(&g_terms).copied().collect());
    let all = Grade {
        value: wrap_total(all_derivation.total),
        derivation: all_derivation,
    };

    let side = side::side_grade(&f_terms, &g_terms);

    // Breakdown
    let mut rows: Vec<BreakdownRow> = Vec::with_capacity(f_res.len() + g_res.len() + 2);
    for (kind, resolved) in [(RowKind::Family, &f_res), (RowKind::Given, &g_res)] {
        for &(ch, r) in resolved {
            rows.push(BreakdownRow {
                kind,
                ch,
                strokes: r.strokes,
                source: r.source,
            });
        }
    }
    for (active, kind) in [
        (ghost_head, RowKind::GhostHead),
        (ghost_tail, RowKind::GhostTail),
    ] {
        if active {
            rows.push(BreakdownRow {
                kind,
                ch: GHOST_GLYPH,
                strokes: GHOST_STROKE,
                source: StrokeSource::Ghost,
            });
        }
    }

    let mut missing: Vec<char> = Vec::new();
    for (c, r) in f_res.iter().chain(&g_res) {
        if r.strokes == 0 && !missing.contains(c) {
            warn!("⚠️  '{}' has no stroke count ({}), counted as 0", c, r.source);
            missing.push(*c);
        }
    }

    GradeResult {
        family,
        given,
        top: Grade::from_derivation(Derivation::from_terms(top_terms)),
        heart: Grade::from_derivation(Derivation::from_terms(heart_terms)),
        foot: Grade::from_derivation(Derivation::from_terms(foot_terms)),
        side,
        all,
        breakdown: Breakdown::new(rows),
        missing,
    }
}
