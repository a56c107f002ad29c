use crate::cmd::lookup::LookupRow;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use seimei::grades::{Breakdown, GradeKind, GradeResult};
use seimei::strokes::StrokeSource;
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, columns: impl IntoIterator<Item = usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn source_cell(source: StrokeSource) -> Cell {
    let cell = Cell::new(source);
    match source {
        StrokeSource::Override | StrokeSource::Radical => cell.fg(Color::Yellow),
        StrokeSource::Unregistered => cell.fg(Color::Red),
        StrokeSource::Ghost => cell.fg(Color::DarkGrey),
        StrokeSource::Dictionary => cell,
    }
}

pub fn print_names(result: &GradeResult) {
    println!("\n📛 {} {}", result.family, result.given);
}

pub fn print_grade_table(result: &GradeResult) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Grade").add_attribute(Attribute::Bold),
        Cell::new("Value").fg(Color::Cyan),
        Cell::new("Formula"),
    ]);

    for kind in GradeKind::iter() {
        let derivation = result.derivation(kind);
        let value = result.value(kind);
        let formula = if kind == GradeKind::All && derivation.total != value {
            format!("{} -> {}", derivation, value)
        } else {
            derivation.to_string()
        };
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(value).add_attribute(Attribute::Bold),
            Cell::new(formula),
        ]);
    }
    align_right(&mut table, [1]);
    println!("{}", table);

    if let (Some(essence), Some(surface)) = (result.side.essence(), result.side.surface()) {
        println!("   {} 表: {}", GradeKind::Side, surface);
        println!("   {} 本質: {}", GradeKind::Side, essence);
    }
}

pub fn print_breakdown(breakdown: &Breakdown) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Part"),
        Cell::new("Char").add_attribute(Attribute::Bold),
        Cell::new("Strokes"),
        Cell::new("Source"),
    ]);

    for row in breakdown.rows() {
        let part = Cell::new(row.kind);
        let part = if row.kind.is_ghost() {
            part.fg(Color::DarkGrey)
        } else {
            part
        };
        table.add_row(vec![
            part,
            Cell::new(row.ch).set_alignment(CellAlignment::Center),
            Cell::new(row.strokes),
            source_cell(row.source),
        ]);
    }
    align_right(&mut table, [2]);
    println!("{}", table);
    println!("   Total (ghosts excluded): {}", breakdown.real_total());
}

pub fn print_missing(missing: &[char]) {
    if missing.is_empty() {
        return;
    }
    let list: Vec<String> = missing.iter().map(char::to_string).collect();
    println!("⚠️  Unregistered characters counted as 0: {}", list.join(" "));
}

pub fn print_batch_table(results: &[GradeResult]) {
    let mut table = new_table();
    let mut header = vec![
        Cell::new("Family").add_attribute(Attribute::Bold),
        Cell::new("Given").add_attribute(Attribute::Bold),
    ];
    header.extend(GradeKind::iter().map(Cell::new));
    header.push(Cell::new("Missing").fg(Color::Red));
    table.set_header(header);

    for result in results {
        let mut row = vec![Cell::new(&result.family), Cell::new(&result.given)];
        row.extend(GradeKind::iter().map(|k| Cell::new(result.value(k))));
        let missing: String = result.missing.iter().collect();
        row.push(Cell::new(missing).fg(Color::Red));
        table.add_row(row);
    }
    align_right(&mut table, 2..7);
    println!("{}", table);
}

pub fn print_lookup_table(rows: &[LookupRow]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Char").add_attribute(Attribute::Bold),
        Cell::new("Strokes").fg(Color::Cyan),
        Cell::new("Source"),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.ch).set_alignment(CellAlignment::Center),
            Cell::new(row.strokes),
            source_cell(row.source),
        ]);
    }
    align_right(&mut table, [1]);
    println!("{}", table);
}
