//! Find the line that defines a controller action.
//!
//! Matching is textual: `^\s*def\s+<action>` with `<action>` as a whole word.
//! No Ruby parsing happens here; the first matching line wins.

use regex::Regex;

/// Keyword introducing a method definition in controller sources.
pub const DEFAULT_DEFINITION_KEYWORD: &str = "def";

/// Where a handler was found, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerLocation {
    /// 0-based line index of the definition
    Found(usize),
    NotFound,
}

impl HandlerLocation {
    pub fn line(self) -> Option<usize> {
        match self {
            Self::Found(line) => Some(line),
            Self::NotFound => None,
        }
    }

    /// Line to place the cursor on, using the top of the file on a miss.
    pub fn line_or_top(self) -> usize {
        self.line().unwrap_or(0)
    }
}

/// Compiled matcher for one keyword/action pair.
#[derive(Debug, Clone)]
pub struct HandlerMatcher {
    re: Regex,
}

impl HandlerMatcher {
    /// Returns `None` for an empty action, which can never be located.
    pub fn new(keyword: &str, action: &str) -> Option<Self> {
        if action.is_empty() || keyword.is_empty() {
            return None;
        }

        // `\b` after the name would reject `valid?`/`save!`, so end the word
        // with "not an identifier character" instead.
        let pattern = format!(
            r"^\s*{}\s+{}(?:[^\w]|$)",
            regex::escape(keyword),
            regex::escape(action)
        );
        Regex::new(&pattern).ok().map(|re| Self { re })
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.re.is_match(line)
    }

    pub fn locate<S: AsRef<str>>(&self, lines: &[S]) -> HandlerLocation {
        lines
            .iter()
            .position(|line| self.is_match(line.as_ref()))
            .map_or(HandlerLocation::NotFound, HandlerLocation::Found)
    }
}

/// Locate `def <action>` in `lines`.
pub fn locate<S: AsRef<str>>(lines: &[S], action: &str) -> HandlerLocation {
    locate_with_keyword(lines, DEFAULT_DEFINITION_KEYWORD, action)
}

pub fn locate_with_keyword<S: AsRef<str>>(
    lines: &[S],
    keyword: &str,
    action: &str,
) -> HandlerLocation {
    HandlerMatcher::new(keyword, action)
        .map_or(HandlerLocation::NotFound, |m| m.locate(lines))
}
