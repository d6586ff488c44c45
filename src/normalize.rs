//! Whitespace normalization for extracted text.

use crate::options::ParserOptions;

/// Normalize whitespace in extracted text.
///
/// Steps run in a fixed order:
/// 1. carriage returns are removed
/// 2. runs of spaces/tabs directly before a newline are removed
/// 3. runs of three or more newlines collapse to exactly two
/// 4. leading and trailing whitespace is trimmed
///
/// # Example
///
/// ```
/// use officetext::normalize::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("Hello\r\n\n\nWorld \n"), "Hello\n\nWorld");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    let without_cr: String = text.chars().filter(|&c| c != '\r').collect();
    let stripped = strip_blanks_before_newline(&without_cr);
    let collapsed = collapse_newline_runs(&stripped);
    collapsed.trim().to_string()
}

/// Apply the whitespace option of `options` to `text`.
///
/// Normalization is on unless explicitly disabled.
pub fn apply_parser_options(text: &str, options: &ParserOptions) -> String {
    if options.normalize_whitespace {
        normalize_whitespace(text)
    } else {
        text.to_string()
    }
}

fn strip_blanks_before_newline(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending = String::new();

    for c in text.chars() {
        match c {
            ' ' | '\t' => pending.push(c),
            '\n' => {
                pending.clear();
                result.push('\n');
            }
            _ => {
                result.push_str(&pending);
                pending.clear();
                result.push(c);
            }
        }
    }
    result.push_str(&pending);

    result
}

fn collapse_newline_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut run = 0usize;

    for c in text.chars() {
        if c == '\n' {
            run += 1;
            continue;
        }
        push_newlines(&mut result, run);
        run = 0;
        result.push(c);
    }
    push_newlines(&mut result, run);

    result
}

fn push_newlines(out: &mut String, run: usize) {
    for _ in 0..run.min(2) {
        out.push('\n');
    }
}
