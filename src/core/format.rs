//! Rendering of route records into rows.
//!
//! Every format uses the same row schema: verb, URI pattern,
//! controller#action, prefix. Field contents are escaped for the target so
//! they can never break the row/column structure.

use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

use crate::core::route::RouteRecord;

/// Output surface for rendered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    /// Terminal table
    #[default]
    Table,
    /// `<tr>` rows for the editor panel
    Html,
    /// Tab-separated values
    Tsv,
    /// JSON array of row objects
    Json,
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct RouteRow {
    #[tabled(rename = "Verb")]
    pub verb: String,

    #[tabled(rename = "URI Pattern")]
    pub uri_pattern: String,

    #[tabled(rename = "Controller#Action")]
    pub handler: String,

    #[tabled(rename = "Prefix")]
    pub prefix: String,

    /// Controller source relative to the project root, when there is one
    #[tabled(skip)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_path: Option<String>,

    #[tabled(skip)]
    pub action: String,
}

impl From<&RouteRecord> for RouteRow {
    fn from(record: &RouteRecord) -> Self {
        Self {
            verb: record.verb.clone(),
            uri_pattern: record.uri_pattern.clone(),
            handler: record.handler(),
            prefix: record.prefix.clone(),
            // Forward slashes on every platform; the UI echoes this back
            file_path: record
                .controller_file()
                .map(|p| p.to_string_lossy().replace('\\', "/")),
            action: record.action.clone(),
        }
    }
}

pub fn rows(records: &[RouteRecord]) -> Vec<RouteRow> {
    records.iter().map(RouteRow::from).collect()
}

/// Render `records` for the given surface.
pub fn format(records: &[RouteRecord], target: RowFormat) -> String {
    let rows = rows(records);
    match target {
        RowFormat::Table => render_table(rows),
        RowFormat::Html => render_html(&rows),
        RowFormat::Tsv => render_tsv(&rows),
        RowFormat::Json => serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string()),
    }
}

fn render_table(rows: Vec<RouteRow>) -> String {
    let rows: Vec<RouteRow> = rows
        .into_iter()
        .map(|row| RouteRow {
            verb: escape_control(&row.verb),
            uri_pattern: escape_control(&row.uri_pattern),
            handler: escape_control(&row.handler),
            prefix: escape_control(&row.prefix),
            ..row
        })
        .collect();
    Table::new(rows).to_string()
}

fn render_html(rows: &[RouteRow]) -> String {
    let mut out = String::with_capacity(rows.len() * 160);
    for row in rows {
        out.push_str("<tr");
        if let Some(path) = &row.file_path {
            out.push_str(" data-file-path=\"");
            out.push_str(&escape_html(path));
            out.push('"');
            out.push_str(" data-action=\"");
            out.push_str(&escape_html(&row.action));
            out.push('"');
        }
        out.push('>');
        for cell in [&row.verb, &row.uri_pattern, &row.handler, &row.prefix] {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out
}

fn render_tsv(rows: &[RouteRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let cells = [&row.verb, &row.uri_pattern, &row.handler, &row.prefix];
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push('\t');
            }
            out.push_str(&escape_tsv(cell));
        }
        out.push('\n');
    }
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_tsv(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_control(s: &str) -> String {
    if !s.chars().any(char::is_control) {
        return s.to_string();
    }
    s.chars()
        .map(|ch| {
            if ch.is_control() {
                ch.escape_default().to_string()
            } else {
                ch.to_string()
            }
        })
        .collect()
}
