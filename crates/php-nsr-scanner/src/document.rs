//! SourceText: ropey::Rope backed copy of an open document.

use php_nsr_types::{utf16_len, TextEdit};
use regex::Regex;
use ropey::Rope;
use std::sync::LazyLock;

/// A class name with or without namespace separators.
static WORD_WITH_NAMESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9\\]+").unwrap());

/// Line-addressable text of a single PHP document.
#[derive(Debug, Clone, Default)]
pub struct SourceText {
    rope: Rope,
}

impl SourceText {
    pub fn new(source: &str) -> Self {
        SourceText {
            rope: Rope::from_str(source),
        }
    }

    /// Replace the whole content (used on didOpen and full didChange).
    pub fn set_text(&mut self, source: &str) {
        self.rope = Rope::from_str(source);
    }

    /// Replace the range (start_line, start_char)..(end_line, end_char) with
    /// `new_text`. Columns are UTF-16 code units, clamped to the line end.
    pub fn apply_edit(
        &mut self,
        start_line: u32,
        start_char: u32,
        end_line: u32,
        end_char: u32,
        new_text: &str,
    ) {
        let start = self.position_to_char(start_line as usize, start_char as usize);
        let end = self
            .position_to_char(end_line as usize, end_char as usize)
            .max(start);

        self.rope.remove(start..end);
        self.rope.insert(start, new_text);
    }

    /// Apply a batch of edits that all refer to the current content.
    ///
    /// Edits are applied from the bottom of the document up so earlier
    /// positions stay valid.
    pub fn apply_edits(&mut self, edits: &[TextEdit]) {
        let mut ordered: Vec<&TextEdit> = edits.iter().collect();
        ordered.sort_by(|a, b| (b.range.0, b.range.1).cmp(&(a.range.0, a.range.1)));
        for edit in ordered {
            let (sl, sc, el, ec) = edit.range;
            self.apply_edit(sl, sc, el, ec, &edit.new_text);
        }
    }

    /// Number of lines, counting an empty last line after a final newline.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of line `idx` without its line terminator.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(idx).to_string();
        Some(strip_line_ending(&line).to_string())
    }

    /// All lines without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.rope
            .lines()
            .map(|l| strip_line_ending(&l.to_string()).to_string())
            .collect()
    }

    /// Get the current source as a String.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The namespaced word touching (line, character), if any.
    pub fn word_at(&self, line: u32, character: u32) -> Option<((u32, u32, u32, u32), String)> {
        let text = self.line(line as usize)?;
        word_in_line(&text, character)
            .map(|(start, end, word)| ((line, start, line, end), word.to_string()))
    }

    /// Convert (line, UTF-16 column) to a char index in the rope.
    fn position_to_char(&self, line: usize, character: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let content = strip_line_ending(&slice.to_string()).to_string();
        let max_col = content.encode_utf16().count();
        line_start + slice.utf16_cu_to_char(character.min(max_col))
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Find the `[a-zA-Z0-9\\]+` word in `line` whose span contains `character`
/// (a UTF-16 column; the position right after the word still counts).
///
/// Returns (start column, end column, word).
pub fn word_in_line(line: &str, character: u32) -> Option<(u32, u32, &str)> {
    WORD_WITH_NAMESPACE.find_iter(line).find_map(|m| {
        let start = utf16_len(&line[..m.start()]);
        let end = start + utf16_len(m.as_str());
        (start <= character && character <= end).then_some((start, end, m.as_str()))
    })
}

/// Same as [`word_in_line`] over a document given as lines.
pub fn word_at<S: AsRef<str>>(
    lines: &[S],
    line: u32,
    character: u32,
) -> Option<((u32, u32, u32, u32), String)> {
    let text = lines.get(line as usize)?.as_ref();
    word_in_line(text, character)
        .map(|(start, end, word)| ((line, start, line, end), word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_terminators() {
        let doc = SourceText::new("<?php\r\nnamespace App;\nclass Foo {}\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(
            doc.lines(),
            vec!["<?php", "namespace App;", "class Foo {}", ""]
        );
        assert_eq!(doc.line(1).as_deref(), Some("namespace App;"));
        assert_eq!(doc.line(10), None);
    }

    #[test]
    fn test_apply_edit_replaces_range() {
        let mut doc = SourceText::new("<?php\nclass Foo {}\n");
        doc.apply_edit(1, 6, 1, 9, "Bar");
        assert_eq!(doc.text(), "<?php\nclass Bar {}\n");
    }

    #[test]
    fn test_apply_edit_insert_new_line() {
        let mut doc = SourceText::new("<?php\nnamespace App;\n\nclass Foo {}\n");
        doc.apply_edit(2, 0, 2, 0, "\nuse App\\Bar;\n");
        assert_eq!(
            doc.text(),
            "<?php\nnamespace App;\n\nuse App\\Bar;\n\nclass Foo {}\n"
        );
    }

    #[test]
    fn test_apply_edit_clamps_column_to_line_end() {
        let mut doc = SourceText::new("use A;\nuse B;\n");
        doc.apply_edit(0, 0, 0, 99, "use C;");
        assert_eq!(doc.text(), "use C;\nuse B;\n");
    }

    #[test]
    fn test_apply_edits_batch_uses_original_positions() {
        let mut doc = SourceText::new("<?php\nnamespace App;\n\n$x = new \\Lib\\Foo();\n");
        doc.apply_edits(&[
            TextEdit::replace((3, 9, 3, 17), "Foo"),
            TextEdit::insert(2, 0, "use Lib\\Foo;\n"),
        ]);
        assert_eq!(
            doc.text(),
            "<?php\nnamespace App;\nuse Lib\\Foo;\n\n$x = new Foo();\n"
        );
    }

    #[test]
    fn test_apply_edit_multibyte_columns() {
        let mut doc = SourceText::new("$s = 'é'; new Foo;\n");
        // 'é' is one UTF-16 unit: "new" starts at column 10
        doc.apply_edit(0, 14, 0, 17, "Bar");
        assert_eq!(doc.text(), "$s = 'é'; new Bar;\n");
    }

    #[test]
    fn test_word_in_line_with_namespace() {
        let line = "$user = new \\App\\Models\\User();";
        let (start, end, word) = word_in_line(line, 15).unwrap();
        assert_eq!(word, "\\App\\Models\\User");
        assert_eq!((start, end), (12, 28));
        // cursor right after the word still resolves it
        assert_eq!(word_in_line(line, 28).map(|w| w.2), Some("\\App\\Models\\User"));
        // on the `=` sign there is no word
        assert!(word_in_line(line, 6).is_none());
    }

    #[test]
    fn test_word_at_lines() {
        let lines = vec!["<?php", "Foo::bar();"];
        let (range, word) = word_at(&lines, 1, 1).unwrap();
        assert_eq!(word, "Foo");
        assert_eq!(range, (1, 0, 1, 3));
        assert!(word_at(&lines, 5, 0).is_none());

        let doc = SourceText::new("<?php\nFoo::bar();\n");
        assert_eq!(doc.word_at(1, 2).map(|w| w.1).as_deref(), Some("Foo"));
    }
}
