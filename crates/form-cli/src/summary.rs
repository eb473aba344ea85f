use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use form_cli::outline::OutlineRow;
use form_cli::script::{FillReport, Stage};

pub fn print_outline(title: &str, rows: &[OutlineRow]) {
    println!("Form: {title}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Screen"),
        header_cell("Reference"),
        header_cell("Questions"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in rows {
        let questions = if row.questions.is_empty() {
            row.note.clone().map_or_else(|| dim_cell("-"), dim_cell)
        } else {
            Cell::new(row.questions.join("\n"))
        };
        table.add_row(vec![
            Cell::new(row.number),
            kind_cell(row.kind),
            Cell::new(&row.reference),
            questions,
        ]);
    }
    println!("{table}");
}

pub fn print_fill_report(report: &FillReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Screens"),
        header_cell("Answers"),
        header_cell("Instances added"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let status = if report.is_valid() {
        Cell::new("valid").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("invalid").fg(Color::Red).add_attribute(Attribute::Bold)
    };
    table.add_row(vec![
        Cell::new(report.screens),
        Cell::new(report.answers),
        Cell::new(report.instances_added),
        status,
    ]);
    eprintln!("{table}");
    if let Some(failure) = &report.failure {
        let stage = match failure.stage {
            Stage::Commit => "while answering",
            Stage::Validation => "on final validation",
        };
        eprintln!("Failed {stage} at {}: {}", failure.reference, failure.kind);
        if let Some(message) = &failure.message {
            eprintln!("  {message}");
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: &str) -> Cell {
    let color = match kind {
        "field-list" => Color::Cyan,
        "repeat prompt" => Color::Yellow,
        "end" => Color::DarkGrey,
        _ => Color::Reset,
    };
    Cell::new(kind).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
