use std::path::Path;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rbj_cli::pipeline::{ConvertOutcome, GeneratedTable};
use rbj_core::Assembly;
use rbj_model::{BatchJobDocument, RowWarning};

pub fn print_convert_summary(outcome: &ConvertOutcome) {
    println!("Input: {}", outcome.input.display());
    match &outcome.output {
        Some(path) => println!("Output: {} ({} bytes)", path.display(), outcome.bytes),
        None => println!("Output: dry run, {} bytes not written", outcome.bytes),
    }
    print_kind_counts(&outcome.document);
    print_warnings(&outcome.warnings);
}

pub fn print_check_summary(input: &Path, assembly: &Assembly) {
    println!("Input: {}", input.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Line"),
        header_cell("Check"),
        header_cell("Title"),
        header_cell("Feature class"),
        header_cell("Secondary"),
        header_cell("Severity"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for rule in assembly.document.iter() {
        let secondary = match rule.secondary() {
            Some(feature) => Cell::new(&feature.name),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(rule.source_line),
            Cell::new(rule.kind().as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(rule.display_title()),
            Cell::new(&rule.primary.name),
            secondary,
            Cell::new(&rule.severity),
        ]);
    }
    println!("{table}");
    print_warnings(&assembly.warnings);
}

pub fn print_generate_summary(output_dir: &Path, generated: &[GeneratedTable]) {
    println!("Output: {}", output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Table"),
        header_cell("Rules"),
        header_cell("Batch job"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_rules = 0usize;
    for entry in generated {
        total_rules += entry.rules;
        let batch_job = match entry.converted.as_ref().and_then(|c| c.output.as_ref()) {
            Some(path) => Cell::new(file_label(path)).fg(Color::Green),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(entry.kind.as_str()),
            Cell::new(file_label(&entry.path)),
            count_cell(entry.rules),
            batch_job,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rules).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_kind_counts(document: &BatchJobDocument) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Rules")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (kind, count) in document.kind_counts() {
        table.add_row(vec![Cell::new(kind.as_str()), count_cell(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(document.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_warnings(warnings: &[RowWarning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Line"), header_cell("Warning")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.line),
            Cell::new(&warning.message).fg(Color::Yellow),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{table}");
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

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
