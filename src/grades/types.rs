use crate::normalize::NormalizedName;
use crate::strokes::StrokeSource;
use serde::Serialize;
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Stroke value of a ghost (霊数) term.
pub const GHOST_STROKE: u32 = 1;
/// Placeholder glyph shown for ghost terms and rows.
pub const GHOST_GLYPH: char = '霊';
/// All wraps into 1..=60.
pub const ALL_CYCLE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeKind {
    #[strum(serialize = "トップ(天格)")]
    Top,
    #[strum(serialize = "ハート(人格)")]
    Heart,
    #[strum(serialize = "フット(地格)")]
    Foot,
    #[strum(serialize = "サイド(外格)")]
    Side,
    #[strum(serialize = "オール(総格)")]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "char", rename_all = "snake_case")]
pub enum TermLabel {
    Char(char),
    Ghost,
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermLabel::Char(c) => write!(f, "{}", c),
            TermLabel::Ghost => write!(f, "{}", GHOST_GLYPH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Term {
    pub label: TermLabel,
    pub value: u32,
}

impl Term {
    pub fn char(c: char, value: u32) -> Self {
        Self {
            label: TermLabel::Char(c),
            value,
        }
    }

    pub fn ghost() -> Self {
        Self {
            label: TermLabel::Ghost,
            value: GHOST_STROKE,
        }
    }

    pub fn is_ghost(&self) -> bool {
        self.label == TermLabel::Ghost
    }
}

/// Ordered terms and their sum; renders as a formula trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub terms: Vec<Term>,
    pub total: u32,
}

impl Derivation {
    pub fn from_terms(terms: Vec<Term>) -> Self {
        let total = terms.iter().fold(0u32, |acc, t| acc.saturating_add(t.value));
        Self { terms, total }
    }

    pub fn has_ghost(&self) -> bool {
        self.terms.iter().any(Term::is_ghost)
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}({})", t.label, t.value)?;
        }
        write!(f, " = {}", self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub value: u32,
    pub derivation: Derivation,
}

impl Grade {
    pub fn from_derivation(derivation: Derivation) -> Self {
        Self {
            value: derivation.total,
            derivation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SideForm {
    /// Family of three or more: one formula.
    Single,
    /// Shorter family: both tails computed, the larger sum is reported.
    Split {
        essence: Derivation,
        surface: Derivation,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideGrade {
    pub value: u32,
    /// The derivation behind `value`.
    pub derivation: Derivation,
    pub form: SideForm,
}

impl SideGrade {
    pub fn essence(&self) -> Option<&Derivation> {
        match &self.form {
            SideForm::Split { essence, .. } => Some(essence),
            SideForm::Single => None,
        }
    }

    pub fn surface(&self) -> Option<&Derivation> {
        match &self.form {
            SideForm::Split { surface, .. } => Some(surface),
            SideForm::Single => None,
        }
    }

    /// The losing formula of a split, if it produced a different number.
    pub fn alternative(&self) -> Option<&Derivation> {
        match &self.form {
            SideForm::Split { essence, surface } if essence.total != surface.total => {
                if *surface == self.derivation {
                    Some(essence)
                } else {
                    Some(surface)
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RowKind {
    Family,
    Given,
    GhostHead,
    GhostTail,
}

impl RowKind {
    pub fn is_ghost(self) -> bool {
        matches!(self, RowKind::GhostHead | RowKind::GhostTail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub kind: RowKind,
    pub ch: char,
    pub strokes: u32,
    pub source: StrokeSource,
}

/// Per-character table. Ghost rows are for display only and are not part of All.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breakdown {
    rows: Vec<BreakdownRow>,
}

impl Breakdown {
    pub(crate) fn new(rows: Vec<BreakdownRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BreakdownRow] {
        &self.rows
    }

    pub fn real_rows(&self) -> impl Iterator<Item = &BreakdownRow> {
        self.rows.iter().filter(|r| !r.kind.is_ghost())
    }

    pub fn ghost_rows(&self) -> impl Iterator<Item = &BreakdownRow> {
        self.rows.iter().filter(|r| r.kind.is_ghost())
    }

    /// Sum over real characters only (the unwrapped All).
    pub fn real_total(&self) -> u32 {
        self.real_rows()
            .fold(0u32, |acc, r| acc.saturating_add(r.strokes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeResult {
    pub family: NormalizedName,
    pub given: NormalizedName,
    pub top: Grade,
    pub heart: Grade,
    pub foot: Grade,
    pub side: SideGrade,
    /// `value` is wrapped into 1..=60; `derivation.total` is the raw sum.
    pub all: Grade,
    pub breakdown: Breakdown,
    /// Characters that resolved to 0 strokes, first appearance order.
    pub missing: Vec<char>,
}

impl GradeResult {
    pub fn value(&self, kind: GradeKind) -> u32 {
        match kind {
            GradeKind::Top => self.top.value,
            GradeKind::Heart => self.heart.value,
            GradeKind::Foot => self.foot.value,
            GradeKind::Side => self.side.value,
            GradeKind::All => self.all.value,
        }
    }

    pub fn derivation(&self, kind: GradeKind) -> &Derivation {
        match kind {
            GradeKind::Top => &self.top.derivation,
            GradeKind::Heart => &self.heart.derivation,
            GradeKind::Foot => &self.foot.derivation,
            GradeKind::Side => &self.side.derivation,
            GradeKind::All => &self.all.derivation,
        }
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }
}
