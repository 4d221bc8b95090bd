//! Outline scanner for hand-written Python extension modules.
//!
//! Python is not parsed. The scanner follows indentation to find top-level
//! classes, the names each class body declares directly, and the keys of
//! nested configuration classes such as `Meta`. Docstrings, comments,
//! decorators and bracketed continuation lines are skipped.

use tortoise_gen_core::{ConfigBlock, ExtensionClass};

const TAB_WIDTH: usize = 4;

/// Scan `source` and return its top-level classes in declaration order.
pub fn scan_outline(source: &str) -> Vec<ExtensionClass> {
    let mut scanner = Scanner::default();
    for line in source.lines() {
        scanner.line(line);
    }
    scanner.finish()
}

#[derive(Default)]
struct Scanner {
    classes: Vec<ExtensionClass>,
    current: Option<ExtensionClass>,
    body_indent: Option<usize>,
    block: Option<ConfigBlock>,
    block_indent: Option<usize>,
    /// Closing delimiter of an open triple-quoted string.
    in_string: Option<&'static str>,
    /// Open brackets carried over from previous lines.
    depth: usize,
}

impl Scanner {
    fn line(&mut self, raw: &str) {
        if let Some(delimiter) = self.in_string {
            if raw.contains(delimiter) {
                self.in_string = None;
            }
            return;
        }

        let code = strip_comment(raw);
        let text = code.trim();
        if text.is_empty() {
            return;
        }

        let continuation = self.depth > 0;
        self.depth = bracket_depth(text, self.depth);
        self.in_string = opens_string(text);
        if continuation {
            return;
        }

        let indent = indentation(raw);
        if indent == 0 {
            self.close_class();
            if let Some(name) = declared_class(text) {
                self.current = Some(ExtensionClass::new(name));
            }
            return;
        }

        let Some(class) = self.current.as_mut() else {
            return;
        };
        let body_indent = *self.body_indent.get_or_insert(indent);

        if indent == body_indent {
            if let Some(block) = self.block.take() {
                class.blocks.push(block);
                self.block_indent = None;
            }
            if let Some(name) = declared_class(text) {
                self.block = Some(ConfigBlock {
                    name: name.to_string(),
                    keys: Vec::new(),
                });
            } else if let Some(name) = declared_name(text) {
                if !class.attributes.iter().any(|a| a == name) {
                    class.attributes.push(name.to_string());
                }
            }
        } else if indent > body_indent {
            if let Some(block) = self.block.as_mut() {
                let block_indent = *self.block_indent.get_or_insert(indent);
                if indent == block_indent {
                    if let Some(key) = declared_name(text) {
                        block.keys.push(key.to_string());
                    }
                }
            }
        }
    }

    fn close_class(&mut self) {
        if let Some(mut class) = self.current.take() {
            if let Some(block) = self.block.take() {
                class.blocks.push(block);
            }
            self.classes.push(class);
        }
        self.body_indent = None;
        self.block_indent = None;
    }

    fn finish(mut self) -> Vec<ExtensionClass> {
        self.close_class();
        self.classes
    }
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Drop a trailing `#` comment that is not inside a string literal.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '#' => return &line[..i],
            None => {}
        }
    }
    line
}

fn bracket_depth(text: &str, depth: usize) -> usize {
    text.chars().fold(depth, |depth, c| match c {
        '(' | '[' | '{' => depth + 1,
        ')' | ']' | '}' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// The closing delimiter if the line leaves a triple-quoted string open.
fn opens_string(text: &str) -> Option<&'static str> {
    ["'''", "\"\"\""]
        .into_iter()
        .filter(|delimiter| text.matches(delimiter).count() % 2 == 1)
        .min_by_key(|delimiter| text.find(delimiter))
}

fn declared_class(text: &str) -> Option<&str> {
    let rest = text.strip_prefix("class ")?;
    let name = identifier(rest.trim_start());
    (!name.is_empty()).then_some(name)
}

/// Name bound by a statement: `def`, an assignment or an annotation.
fn declared_name(text: &str) -> Option<&str> {
    if let Some(rest) = text
        .strip_prefix("async def ")
        .or_else(|| text.strip_prefix("def "))
    {
        let name = identifier(rest.trim_start());
        return (!name.is_empty()).then_some(name);
    }

    let name = identifier(text);
    if name.is_empty() || is_keyword(name) {
        return None;
    }
    let rest = text[name.len()..].trim_start();
    let binds = (rest.starts_with('=') && !rest.starts_with("=="))
        || rest.starts_with(':');
    binds.then_some(name)
}

fn identifier(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(i, c)| !(c.is_alphanumeric() || *c == '_') || (*i == 0 && c.is_ascii_digit()))
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}

fn is_keyword(name: &str) -> bool {
    matches!(
        name,
        "if" | "else" | "elif" | "for" | "while" | "try" | "except" | "finally" | "with"
            | "return" | "pass" | "lambda" | "match" | "case"
    )
}
