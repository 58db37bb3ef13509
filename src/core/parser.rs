//! Parser for the table printed by `rails routes`.
//!
//! ```text
//!    Prefix Verb   URI Pattern           Controller#Action
//!     users GET    /users(.:format)      users#index
//!           POST   /users(.:format)      users#create
//! ```
//!
//! Rows are read in one of two ways:
//! - fixed columns, sliced at the byte offsets of the header's column names
//!   (Rails pads every column, so blank prefix/verb cells stay aligned);
//! - whitespace-delimited, one token per header column.
//!
//! Anything that fits neither is skipped. The parser never fails.

use tracing::trace;

use crate::core::route::RouteRecord;

/// Logical table columns, in whatever order the header lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Prefix,
    Verb,
    Uri,
    Handler,
}

/// Column order plus, when a header was seen, where each column starts.
#[derive(Debug, Clone)]
struct Layout {
    columns: Vec<Column>,
    offsets: Option<Vec<usize>>,
}

impl Layout {
    /// Order used by Rails when no header has been seen yet.
    fn rails_default() -> Self {
        Self {
            columns: vec![Column::Prefix, Column::Verb, Column::Uri, Column::Handler],
            offsets: None,
        }
    }

    /// Recognize a header line such as `Prefix Verb URI Pattern Controller#Action`.
    fn from_header(line: &str) -> Option<Self> {
        let tokens = tokens_with_offsets(line);
        let mut columns = Vec::with_capacity(4);
        let mut offsets = Vec::with_capacity(4);

        let mut it = tokens.iter().peekable();
        while let Some(&(offset, token)) = it.next() {
            let column = match token.to_ascii_lowercase().as_str() {
                "prefix" => Column::Prefix,
                "verb" => Column::Verb,
                "uri" => {
                    // "URI Pattern" is one column spelled as two words
                    if it
                        .peek()
                        .is_some_and(|(_, next)| next.eq_ignore_ascii_case("pattern"))
                    {
                        it.next();
                    }
                    Column::Uri
                }
                "controller#action" => Column::Handler,
                _ => return None,
            };
            if columns.contains(&column) {
                return None;
            }
            columns.push(column);
            offsets.push(offset);
        }

        let required = [Column::Verb, Column::Uri, Column::Handler];
        if !required.iter().all(|c| columns.contains(c)) {
            return None;
        }

        Some(Self { columns, offsets: Some(offsets) })
    }

    /// Same column order, offsets forgotten.
    fn unaligned(&self) -> Self {
        Self { columns: self.columns.clone(), offsets: None }
    }

    /// Take column offsets from a row with every cell filled.
    ///
    /// Engine sections have no header, but Rails still pads them: the prefix
    /// is right-justified and the other columns left-justified, so one full
    /// row fixes where every later column starts.
    fn anchored_on(&self, line: &str) -> Option<Self> {
        let tokens = tokens_with_offsets(line);
        if tokens.len() != self.columns.len() {
            return None;
        }

        let full = self.columns.iter().zip(&tokens).all(|(column, (_, token))| match column {
            Column::Verb => is_verb(token),
            Column::Uri => token.starts_with('/'),
            _ => true,
        });
        if !full {
            return None;
        }

        let offsets = tokens.iter().map(|(offset, _)| *offset).collect();
        Some(Self { columns: self.columns.clone(), offsets: Some(offsets) })
    }

    fn slice_fixed<'a>(&self, line: &'a str) -> Option<Vec<&'a str>> {
        let offsets = self.offsets.as_ref()?;
        let bytes = line.as_bytes();
        let last = offsets.len() - 1;
        let mut fields = Vec::with_capacity(offsets.len());

        for (i, &offset) in offsets.iter().enumerate() {
            // The first column owns everything left of the second one, which
            // covers right-justified prefixes.
            let start = if i == 0 { 0 } else { offset };
            let end = offsets.get(i + 1).copied().unwrap_or(line.len());

            // Each boundary must sit right after padding
            if i > 0 && start < line.len() && !bytes[start - 1].is_ascii_whitespace() {
                return None;
            }

            let field = if start >= line.len() {
                ""
            } else {
                line.get(start..end.min(line.len()))?.trim()
            };

            if i != last && field.contains(char::is_whitespace) {
                return None;
            }
            fields.push(field);
        }

        Some(fields)
    }

    fn verb_cell_is_plausible(&self, fields: &[&str]) -> bool {
        self.columns
            .iter()
            .zip(fields)
            .filter(|(column, _)| **column == Column::Verb)
            .all(|(_, verb)| verb.is_empty() || is_verb(verb))
    }

    fn split_tokens<'a>(&self, line: &'a str) -> Option<Vec<&'a str>> {
        let mut fields: Vec<&str> = line.split_whitespace().collect();

        // Member routes sharing a path with the row above have no prefix
        if fields.len() + 1 == self.columns.len()
            && self.columns.first() == Some(&Column::Prefix)
            && fields.first().is_some_and(|verb| is_verb(verb))
        {
            fields.insert(0, "");
        }

        (fields.len() == self.columns.len()).then_some(fields)
    }

    fn record(&self, line: &str) -> Option<RouteRecord> {
        let fields = self
            .slice_fixed(line)
            .filter(|fields| self.verb_cell_is_plausible(fields))
            .or_else(|| self.split_tokens(line))?;

        let mut record = RouteRecord::new("", "", "", "", "");
        for (column, value) in self.columns.iter().zip(fields) {
            match column {
                Column::Prefix => record.prefix = value.to_string(),
                Column::Verb => record.verb = value.to_string(),
                Column::Uri => record.uri_pattern = value.to_string(),
                Column::Handler => {
                    let (controller, action) = split_handler(value);
                    record.controller = controller;
                    record.action = action;
                }
            }
        }

        (!record.uri_pattern.is_empty()).then_some(record)
    }
}

/// Parse raw `rails routes` output into records, in table order.
pub fn parse(raw: &str) -> Vec<RouteRecord> {
    let mut layout = Layout::rails_default();
    let mut records = Vec::new();

    // Engine rows seen before the section's offsets are known
    let mut pending: Vec<(usize, &str)> = Vec::new();
    let mut anchoring = false;

    for (lineno, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(header) = Layout::from_header(line) {
            flush(&layout, &mut pending, &mut records);
            anchoring = false;
            layout = header;
            continue;
        }

        // Engine sections are aligned independently and carry no header
        if line.trim_start().starts_with("Routes for ") {
            flush(&layout, &mut pending, &mut records);
            anchoring = true;
            layout = layout.unaligned();
            trace!(line = lineno + 1, "engine section: {}", line.trim());
            continue;
        }

        if anchoring {
            let Some(anchored) = layout.anchored_on(line) else {
                pending.push((lineno, line));
                continue;
            };
            anchoring = false;
            layout = anchored;
            flush(&layout, &mut pending, &mut records);
        }

        push_row(&layout, lineno, line, &mut records);
    }

    flush(&layout, &mut pending, &mut records);
    records
}

fn push_row(layout: &Layout, lineno: usize, line: &str, records: &mut Vec<RouteRecord>) {
    match layout.record(line) {
        Some(record) => records.push(record),
        None => trace!(line = lineno + 1, "skipping malformed route row: {line:?}"),
    }
}

fn flush(layout: &Layout, pending: &mut Vec<(usize, &str)>, records: &mut Vec<RouteRecord>) {
    for (lineno, line) in pending.drain(..) {
        push_row(layout, lineno, line, records);
    }
}

/// Rails verbs are upper-case, joined by `|` when a route accepts several.
fn is_verb(cell: &str) -> bool {
    !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_uppercase() || b == b'|')
}

/// Split a `Controller#Action` cell into its parts.
///
/// `users#index {format: :json}` keeps only `index`; a value that is not a
/// plain `controller#action` pair becomes the controller with no action.
fn split_handler(value: &str) -> (String, String) {
    if let Some((controller, rest)) = value.split_once('#') {
        let action = rest.split_whitespace().next().unwrap_or("");
        let rest_starts_clean = !rest.starts_with(char::is_whitespace);
        if !controller.is_empty()
            && !controller.contains(char::is_whitespace)
            && !action.is_empty()
            && rest_starts_clean
        {
            return (controller.to_string(), action.to_string());
        }
    }
    (value.to_string(), String::new())
}

/// Whitespace-separated tokens with their starting byte offsets.
fn tokens_with_offsets(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push((s, &line[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, &line[s..]));
    }

    tokens
}
