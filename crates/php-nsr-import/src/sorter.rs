//! Sorting of the `use` block.
//!
//! Sorted texts are written back onto the lines the block already occupies,
//! so blank lines and comments between imports stay where they are.

use php_nsr_types::{utf16_len, ResolverError, SortOrder, SortPolicy, TextEdit, UseStatement};
use std::cmp::Ordering;

/// Sort `use_statements` under `policy`, keeping the original line numbers.
pub fn sort_use_statements(
    use_statements: &[UseStatement],
    policy: SortPolicy,
) -> Result<Vec<UseStatement>, ResolverError> {
    if use_statements.len() < 2 {
        return Err(ResolverError::NothingToSort);
    }

    let mut texts: Vec<&str> = use_statements.iter().map(|u| u.text.as_str()).collect();
    texts.sort_by(|a, b| compare(a, b, policy));

    Ok(use_statements
        .iter()
        .zip(texts)
        .map(|(original, text)| UseStatement::new(text, original.line))
        .collect())
}

/// Whole-line replacements turning `original` into `sorted`.
pub fn sort_edits(original: &[UseStatement], sorted: &[UseStatement]) -> Vec<TextEdit> {
    original
        .iter()
        .zip(sorted)
        .map(|(o, s)| TextEdit::replace_line(o.line, &o.text, s.text.clone()))
        .collect()
}

pub fn compare(a: &str, b: &str, policy: SortPolicy) -> Ordering {
    match policy {
        SortPolicy::Alphabetical(order) => directed(case_insensitive(a, b), order),
        SortPolicy::LengthFirst => utf16_len(a)
            .cmp(&utf16_len(b))
            .then_with(|| case_insensitive(a, b)),
        SortPolicy::Natural(order) => directed(natural_cmp(a, b), order),
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

fn case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-sensitive comparison where runs of digits compare by value
/// (`B2` < `B10`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (left, right) = (chunks(a), chunks(b));
    for (x, y) in left.iter().zip(&right) {
        let ordering = match (is_number(x), is_number(y)) {
            (true, true) => numeric_cmp(x, y),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

/// Split into alternating runs of ASCII digits and everything else.
fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits = None;
    for (idx, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        if digits.is_some_and(|d| d != is_digit) {
            out.push(&s[start..idx]);
            start = idx;
        }
        digits = Some(is_digit);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

fn is_number(chunk: &str) -> bool {
    chunk.bytes().all(|b| b.is_ascii_digit())
}

fn numeric_cmp(x: &str, y: &str) -> Ordering {
    let (x, y) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(texts: &[&str]) -> Vec<UseStatement> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| UseStatement::new(*t, i as u32 + 3))
            .collect()
    }

    fn texts(uses: &[UseStatement]) -> Vec<&str> {
        uses.iter().map(|u| u.text.as_str()).collect()
    }

    #[test]
    fn test_nothing_to_sort() {
        assert_eq!(
            sort_use_statements(&block(&["use A;"]), SortPolicy::LengthFirst),
            Err(ResolverError::NothingToSort)
        );
        assert_eq!(
            sort_use_statements(&[], SortPolicy::LengthFirst),
            Err(ResolverError::NothingToSort)
        );
    }

    #[test]
    fn test_length_first() {
        let uses = block(&[
            "use Illuminate\\Support\\Str;",
            "use App\\Models\\User;",
            "use App\\Models\\Post;",
        ]);
        let sorted = sort_use_statements(&uses, SortPolicy::LengthFirst).unwrap();
        assert_eq!(
            texts(&sorted),
            vec![
                "use App\\Models\\Post;",
                "use App\\Models\\User;",
                "use Illuminate\\Support\\Str;",
            ]
        );
        // lines stay where they were
        let lines: Vec<u32> = sorted.iter().map(|u| u.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // 9 UTF-16 units but 11 bytes
        let accented = "use Éé\\A;";
        let plain = "use Bc\\De;";
        let uses = block(&[plain, accented]);
        let sorted = sort_use_statements(&uses, SortPolicy::LengthFirst).unwrap();
        let texts: Vec<&str> = sorted.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec![accented, plain]);
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let uses = block(&["use b\\Foo;", "use C\\Foo;", "use A\\LongerName;"]);
        let sorted =
            sort_use_statements(&uses, SortPolicy::Alphabetical(SortOrder::Ascending)).unwrap();
        assert_eq!(
            texts(&sorted),
            vec!["use A\\LongerName;", "use b\\Foo;", "use C\\Foo;"]
        );
    }

    #[test]
    fn test_natural_orders_numbers_by_value() {
        let uses = block(&["use A\\B10;", "use A\\B2;"]);
        let ascending = sort_use_statements(&uses, SortPolicy::Natural(SortOrder::Ascending)).unwrap();
        assert_eq!(texts(&ascending), vec!["use A\\B2;", "use A\\B10;"]);

        let descending =
            sort_use_statements(&uses, SortPolicy::Natural(SortOrder::Descending)).unwrap();
        assert_eq!(texts(&descending), vec!["use A\\B10;", "use A\\B2;"]);

        // plain alphabetical puts "1" before "2"
        let alphabetical =
            sort_use_statements(&uses, SortPolicy::Alphabetical(SortOrder::Ascending)).unwrap();
        assert_eq!(texts(&alphabetical), vec!["use A\\B10;", "use A\\B2;"]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let uses = block(&[
            "use Zeta\\Thing;",
            "use Alpha\\Thing;",
            "use Mid\\Th;",
            "use alpha\\Thing;",
        ]);
        for policy in [
            SortPolicy::LengthFirst,
            SortPolicy::Alphabetical(SortOrder::Ascending),
            SortPolicy::Natural(SortOrder::Descending),
        ] {
            let once = sort_use_statements(&uses, policy).unwrap();
            let twice = sort_use_statements(&once, policy).unwrap();
            assert_eq!(once, twice, "{policy:?}");
        }
    }

    #[test]
    fn test_sort_edits_replace_each_line() {
        let uses = block(&["use Long\\Name\\Here;", "use A;"]);
        let sorted = sort_use_statements(&uses, SortPolicy::LengthFirst).unwrap();
        let edits = sort_edits(&uses, &sorted);
        assert_eq!(
            edits,
            vec![
                TextEdit::replace((3, 0, 3, 19), "use A;"),
                TextEdit::replace((4, 0, 4, 6), "use Long\\Name\\Here;"),
            ]
        );
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
        assert_eq!(natural_cmp("file010", "file10"), Ordering::Equal);
        assert_eq!(natural_cmp("B", "a"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abcd"), Ordering::Less);
    }
}
