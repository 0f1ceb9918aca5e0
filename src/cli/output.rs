//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::IniDocument;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

#[derive(Debug, Serialize)]
pub struct SectionView<'a> {
    pub name: &'a str,
    pub entries: Vec<EntryView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EntryView<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Borrowed, serializable view of a document in file order
pub fn document_view(doc: &IniDocument) -> Vec<SectionView<'_>> {
    doc.sections()
        .iter()
        .map(|section| SectionView {
            name: section.name(),
            entries: section
                .entries()
                .map(|(key, value)| EntryView { key, value })
                .collect(),
        })
        .collect()
}

/// Table of every section entry, one row per key
pub fn document_table(doc: &IniDocument) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Section").fg(Color::Cyan),
            Cell::new("Key").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    for section in doc.sections() {
        if section.is_empty() {
            table.add_row(vec![
                Cell::new(section.name()),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new(""),
            ]);
            continue;
        }
        for (key, value) in section.entries() {
            table.add_row(vec![
                Cell::new(section.name()),
                Cell::new(key),
                Cell::new(value),
            ]);
        }
    }

    table
}

/// Render a document for `show`
pub fn render_document(doc: &IniDocument, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Table => Ok(document_table(doc).to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&document_view(doc)),
    }
}
