use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{LevelReport, ProjectReport};

pub fn print_project(report: &ProjectReport) {
    println!("Project: {}", report.root.display());
    if report.saved {
        println!("Saved all databases.");
    }
    println!("{}", database_table(report));
}

pub fn print_levels(report: &LevelReport) {
    println!(
        "Trainer: {} (segment {}, {} section)",
        report.trainer,
        report.segment,
        report.section.as_str()
    );
    let mut table = Table::new();
    table.set_header(vec![header_cell("Slot"), header_cell("Species"), header_cell("Level")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (slot, (species, level)) in report.levels.iter().enumerate() {
        table.add_row(vec![Cell::new(slot + 1), Cell::new(species), Cell::new(level)]);
    }
    println!("{table}");
}

/// Table of entity counts per database, with a total row.
pub fn database_table(report: &ProjectReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Database"), header_cell("Entities")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let mut total = 0usize;
    for database in &report.databases {
        total += database.entities;
        table.add_row(vec![Cell::new(database.name), count_cell(database.entities)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    table
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
