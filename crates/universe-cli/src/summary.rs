use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use universe_core::CreateOutcome;
use universe_ingest::IngestSummary;
use universe_map::{ConfidenceBand, MappingState};
use universe_model::Taxonomy;

pub fn print_fields(taxonomy: &Taxonomy) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Field"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    for category in taxonomy.categories() {
        for (idx, field) in category.fields.iter().enumerate() {
            let category_cell = if idx == 0 {
                Cell::new(&category.title).add_attribute(Attribute::Bold)
            } else {
                Cell::new("")
            };
            table.add_row(vec![
                category_cell,
                Cell::new(&field.value).fg(Color::Cyan),
                Cell::new(&field.label),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_ingest_summary(summary: &IngestSummary) {
    println!("Records: {}", summary.record_count);
    println!("Bytes: {}", summary.bytes_read);
    println!("Fingerprint: {}", summary.fingerprint);

    let mut table = Table::new();
    let show_values = summary.column_values.is_some();
    let mut header = vec![header_cell("#"), header_cell("Header")];
    if show_values {
        header.push(header_cell("Distinct"));
        header.push(header_cell("Values"));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    if show_values {
        align_column(&mut table, 2, CellAlignment::Right);
    }
    for (idx, name) in summary.headers.iter().enumerate() {
        let mut row = vec![Cell::new(idx + 1), Cell::new(name)];
        if let Some(values) = summary.values_for(name).filter(|_| show_values) {
            row.push(Cell::new(values.len()));
            row.push(Cell::new(preview(values.iter().map(String::as_str), 5)));
        } else if show_values {
            row.push(Cell::new(0));
            row.push(dim_cell("-"));
        }
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_mapping(state: &MappingState) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Score"),
        header_cell("Confidence"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in state.rows() {
        let header = Cell::new(&row.header);
        match (&row.field, row.score, row.band) {
            (Some(field), Some(score), Some(band)) => table.add_row(vec![
                header,
                Cell::new(field).fg(Color::Cyan),
                Cell::new(row.label.as_deref().unwrap_or_default()),
                Cell::new(format!("{:.0}%", score * 100.0)),
                band_cell(band),
            ]),
            _ => table.add_row(vec![
                header,
                dim_cell("unmapped"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    println!("{table}");

    let summary = state.summary();
    println!(
        "Mapped {} of {} headers ({} high, {} medium, {} low)",
        summary.mapped, summary.total_headers, summary.high, summary.medium, summary.low
    );
    let unmapped_headers = state.unmapped_headers();
    if !unmapped_headers.is_empty() {
        println!("Unmapped headers: {}", unmapped_headers.join(", "));
    }
    let unmapped_fields = state.unmapped_fields();
    if !unmapped_fields.is_empty() {
        println!("Unmapped fields: {}", unmapped_fields.join(", "));
    }
    print_conflicts(&state.conflicts());
}

fn print_conflicts(conflicts: &BTreeMap<String, Vec<String>>) {
    if conflicts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Mapped From")]);
    apply_table_style(&mut table);
    for (field, headers) in conflicts {
        table.add_row(vec![
            Cell::new(field).fg(Color::Yellow),
            Cell::new(headers.join(", ")),
        ]);
    }
    println!("Fields mapped from more than one header:");
    println!("{table}");
}

pub fn print_created(outcome: &CreateOutcome) {
    let collection = &outcome.collection;
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.add_row(vec![header_cell("Universe"), Cell::new(collection.id)]);
    table.add_row(vec![header_cell("Name"), Cell::new(&collection.name)]);
    table.add_row(vec![header_cell("Type"), Cell::new(&collection.kind)]);
    table.add_row(vec![header_cell("Records"), Cell::new(outcome.inserted)]);
    table.add_row(vec![header_cell("Batches"), Cell::new(outcome.batches)]);
    table.add_row(vec![
        header_cell("Mapped Fields"),
        Cell::new(collection.mappings.len()),
    ]);
    table.add_row(vec![
        header_cell("Created"),
        Cell::new(collection.created_at.to_rfc3339()),
    ]);
    println!("{table}");
}

fn preview<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> String {
    let mut shown: Vec<&str> = Vec::with_capacity(limit);
    let mut remaining = 0usize;
    for value in values {
        if shown.len() < limit {
            shown.push(value);
        } else {
            remaining += 1;
        }
    }
    let mut text = shown.join(", ");
    if remaining > 0 {
        text.push_str(&format!(", ... (+{remaining})"));
    }
    text
}

fn band_cell(band: ConfidenceBand) -> Cell {
    let color = match band {
        ConfidenceBand::High => Color::Green,
        ConfidenceBand::Medium => Color::Yellow,
        ConfidenceBand::Low => Color::Red,
    };
    Cell::new(band.as_str()).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell(value: &str) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}
