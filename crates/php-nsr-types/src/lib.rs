//! Shared types for php-nsr.
//!
//! Contains the declaration-block model, planned text edits, candidate
//! namespace sets, user settings and the error taxonomy used across the
//! scanner, index, import and server crates.

mod error;

pub use error::ResolverError;

use serde::{Deserialize, Serialize};

/// A `use` line found at the top of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseStatement {
    /// The literal line text (e.g. "use App\\Models\\User;")
    pub text: String,
    /// Zero-based line number
    pub line: u32,
}

impl UseStatement {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        UseStatement {
            text: text.into(),
            line,
        }
    }
}

/// Positions of the declaration block constructs of a document.
///
/// Every field holds the 1-based number of the line containing the construct,
/// which is also the 0-based index of the line right after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationLines {
    pub opening_tag: Option<u32>,
    pub declare: Option<u32>,
    pub namespace: Option<u32>,
    pub last_use_statement: Option<u32>,
    pub first_type_declaration: Option<u32>,
}

impl DeclarationLines {
    /// True once every construct has been located.
    pub fn is_complete(&self) -> bool {
        self.opening_tag.is_some()
            && self.declare.is_some()
            && self.namespace.is_some()
            && self.last_use_statement.is_some()
            && self.first_type_declaration.is_some()
    }
}

/// A planned replacement of a range of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// (start line, start char, end line, end char), 0-based, UTF-16 columns
    pub range: (u32, u32, u32, u32),
    pub new_text: String,
}

impl TextEdit {
    /// Insert `new_text` at a single position.
    pub fn insert(line: u32, character: u32, new_text: impl Into<String>) -> Self {
        TextEdit {
            range: (line, character, line, character),
            new_text: new_text.into(),
        }
    }

    /// Replace the whole of `line`, whose current content is `current`.
    pub fn replace_line(line: u32, current: &str, new_text: impl Into<String>) -> Self {
        TextEdit {
            range: (line, 0, line, utf16_len(current)),
            new_text: new_text.into(),
        }
    }

    pub fn replace(range: (u32, u32, u32, u32), new_text: impl Into<String>) -> Self {
        TextEdit {
            range,
            new_text: new_text.into(),
        }
    }

    pub fn is_insert(&self) -> bool {
        self.range.0 == self.range.2 && self.range.1 == self.range.3
    }
}

/// Length of `text` in UTF-16 code units (LSP column unit).
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// Where `position` (line, UTF-16 column) ends up once `edits` are applied.
///
/// `edits` is one batch whose ranges all refer to the same document state.
/// A position inside a replaced range moves to the start of that range.
pub fn shift_position(position: (u32, u32), edits: &[TextEdit]) -> (u32, u32) {
    // bottom-up, so the ranges of the edits still to visit stay valid
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| (b.range.0, b.range.1).cmp(&(a.range.0, a.range.1)));

    let (mut line, mut character) = position;
    for edit in ordered {
        let (start_line, start_char, end_line, end_char) = edit.range;
        if (end_line, end_char) <= (line, character) {
            let added_lines = edit.new_text.matches('\n').count() as u32;
            if end_line == line {
                let tail = edit.new_text.rsplit('\n').next().unwrap_or_default();
                let tail_end = if added_lines == 0 {
                    start_char + utf16_len(tail)
                } else {
                    utf16_len(tail)
                };
                character = tail_end + (character - end_char);
            }
            line = line - end_line + start_line + added_lines;
        } else if (start_line, start_char) < (line, character) {
            line = start_line;
            character = start_char;
        }
    }
    (line, character)
}

/// Ordered, duplicate-free list of fully qualified class names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNamespaces(Vec<String>);

impl CandidateNamespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `fqcn` unless it is already present. Returns whether it was added.
    pub fn push(&mut self, fqcn: impl Into<String>) -> bool {
        let fqcn = fqcn.into();
        if self.0.contains(&fqcn) {
            return false;
        }
        self.0.push(fqcn);
        true
    }

    /// Put `fqcn` first, moving it there if it was already listed.
    pub fn prepend(&mut self, fqcn: impl Into<String>) {
        let fqcn = fqcn.into();
        self.0.retain(|existing| existing != &fqcn);
        self.0.insert(0, fqcn);
    }

    /// The only candidate, when no disambiguation is needed.
    pub fn single(&self) -> Option<&str> {
        match self.0.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Direction of an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Comparison policy used to sort the `use` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortPolicy {
    /// Case-insensitive comparison of the whole line.
    Alphabetical(SortOrder),
    /// Shorter lines first, equal lengths alphabetically.
    LengthFirst,
    /// Digit runs compared by value.
    Natural(SortOrder),
}

impl From<&Settings> for SortPolicy {
    fn from(settings: &Settings) -> Self {
        if settings.sort_natural {
            let order = if settings.sort_alphabetically {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            };
            SortPolicy::Natural(order)
        } else if settings.sort_alphabetically {
            SortPolicy::Alphabetical(SortOrder::Ascending)
        } else {
            SortPolicy::LengthFirst
        }
    }
}

/// User configuration, read from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Sort the `use` block after every import.
    pub auto_sort: bool,
    pub sort_alphabetically: bool,
    pub sort_natural: bool,
    /// Prefix expanded class names with `\`.
    pub leading_separator: bool,
    pub show_message_on_status_bar: bool,
    /// Glob of files ignored when searching for class files.
    pub exclude: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_sort: true,
            sort_alphabetically: false,
            sort_natural: false,
            leading_separator: true,
            show_message_on_status_bar: false,
            exclude: "**/node_modules/**".to_string(),
        }
    }
}

impl Settings {
    pub fn sort_policy(&self) -> SortPolicy {
        SortPolicy::from(self)
    }
}
