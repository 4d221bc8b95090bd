//! Python source fragments: literals, docstrings and identifiers.

use serde_json::Value;

pub const INDENT: &str = "    ";

/// Single-quoted Python string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Python literal for a JSON value.
pub fn value_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_literal(s),
        Value::Array(items) => {
            let items: Vec<_> = items.iter().map(value_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<_> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", string_literal(k), value_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Docstring body text. Backslashes are doubled and runs of three quotes
/// broken so the text cannot close the docstring.
pub fn docstring_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("'''", "''\\'")
}

/// Append an indented `'''` docstring. Blank lines carry no indentation.
pub fn push_docstring(lines: &mut Vec<String>, indent: &str, body: &[String]) {
    lines.push(format!("{indent}'''"));
    for line in body {
        for part in line.split('\n') {
            let part = docstring_text(part.trim_end());
            if part.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{indent}{part}"));
            }
        }
    }
    lines.push(format!("{indent}'''"));
}

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// A valid, non-keyword Python identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !is_keyword(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("plain", "'plain'")]
    #[case("it's", r"'it\'s'")]
    #[case("a\\b", r"'a\\b'")]
    #[case("line\nbreak", r"'line\nbreak'")]
    #[case("bell\u{7}", r"'bell\x07'")]
    #[case("", "''")]
    fn test_string_literal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(string_literal(input), expected);
    }

    #[rstest]
    #[case(json!(null), "None")]
    #[case(json!(true), "True")]
    #[case(json!(false), "False")]
    #[case(json!(0), "0")]
    #[case(json!(-2.5), "-2.5")]
    #[case(json!("x"), "'x'")]
    #[case(json!([1, "a"]), "[1, 'a']")]
    #[case(json!({"k": [true]}), "{'k': [True]}")]
    fn test_value_literal(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value_literal(&value), expected);
    }

    #[test]
    fn test_docstring_text_cannot_close_docstring() {
        assert_eq!(docstring_text("say '''hi'''"), r"say ''\'hi''\'");
        assert_eq!(docstring_text(r"C:\path"), r"C:\\path");
        assert_eq!(docstring_text("it's"), "it's");
    }

    #[test]
    fn test_push_docstring_indents_and_splits() {
        let mut lines = Vec::new();
        push_docstring(
            &mut lines,
            INDENT,
            &["first\nsecond".to_string(), String::new(), "third  ".to_string()],
        );
        assert_eq!(
            lines,
            vec!["    '''", "    first", "    second", "", "    third", "    '''"]
        );
    }

    #[rstest]
    #[case("email", true)]
    #[case("_private", true)]
    #[case("is_18", true)]
    #[case("18th", false)]
    #[case("class", false)]
    #[case("from", false)]
    #[case("", false)]
    #[case("has-dash", false)]
    fn test_is_identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }
}
