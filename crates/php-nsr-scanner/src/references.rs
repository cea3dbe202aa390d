//! Class names referenced by a PHP document.
//!
//! Each lexical rule is a separate function so false positives can be traced
//! to the rule that produced them. [`extract_references`] unions them.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static EXTENDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"extends ([A-Z][A-Za-z0-9\-_]*)").unwrap());
static FUNCTION_PARAMETERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function \S+\((.*)\)").unwrap());
static NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new ([A-Z][A-Za-z0-9\-_]*)").unwrap());
static STATIC_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z][A-Za-z0-9\-_]*)::").unwrap());
static INSTANCEOF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"instanceof ([A-Z_][A-Za-z0-9_]*)").unwrap());
static IMPORTED_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+?);").unwrap());
static TYPE_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(class|trait|interface)\s+\w+").unwrap());

/// All class names referenced in `text`, in first-occurrence order.
pub fn extract_references(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    extended(text)
        .into_iter()
        .chain(parameter_types(text))
        .chain(instantiated(text))
        .chain(static_access(text))
        .chain(instanceof_operands(text))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// `extends Foo`
pub fn extended(text: &str) -> Vec<String> {
    first_groups(&EXTENDS, text)
}

/// Type hints of function and method parameters: `function foo(Bar $bar)`.
///
/// The parameter list is split on `", "` and the text before the first space
/// of each parameter is kept when it starts with an uppercase letter, so
/// nullable (`?Foo`) and qualified (`\Foo`) hints are skipped.
pub fn parameter_types(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for caps in FUNCTION_PARAMETERS.captures_iter(text) {
        let Some(list) = caps.get(1) else {
            continue;
        };
        for parameter in list.as_str().split(", ") {
            let Some((type_name, _)) = parameter.split_once(' ') else {
                continue;
            };
            if type_name.starts_with(|c: char| c.is_ascii_uppercase()) {
                names.push(type_name.to_string());
            }
        }
    }
    names
}

/// `new Foo`
pub fn instantiated(text: &str) -> Vec<String> {
    first_groups(&NEW, text)
}

/// `Foo::bar()`, `Foo::CONSTANT`, `Foo::class`
pub fn static_access(text: &str) -> Vec<String> {
    first_groups(&STATIC_ACCESS, text)
}

/// `$x instanceof Foo`
pub fn instanceof_operands(text: &str) -> Vec<String> {
    first_groups(&INSTANCEOF, text)
}

fn first_groups(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Short names imported by the `use` lines at the top of a document
/// (the identifier right before `;`, i.e. the alias when one is given).
///
/// Stops at the first class, trait or interface declaration so trait imports
/// inside class bodies are not reported.
pub fn imported_class_names<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut names = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.starts_with("use ") {
            if let Some(caps) = IMPORTED_NAME.captures(line) {
                names.push(caps[1].to_string());
            }
        } else if TYPE_DECLARATION.is_match(line) {
            break;
        }
    }
    names
}
