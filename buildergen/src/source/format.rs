//! Brace-depth indentation.

use crate::generator::{IndentStyle, LineEnding};

/// Re-indent Java source by brace depth.
///
/// Leading whitespace already present on a line is kept after the computed
/// indentation, which is how continuation lines are written. Braces inside
/// string and char literals, line comments and Javadoc lines are ignored.
/// Every output line is terminated with `line_ending`.
pub fn reindent(text: &str, indent: IndentStyle, line_ending: LineEnding) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut depth = 0usize;
    for line in text.lines() {
        let content = line.trim_end();
        if content.trim().is_empty() {
            out.push_str(line_ending.as_str());
            continue;
        }
        let (opens, closes, leading_closes) = count_braces(content.trim_start());
        let line_depth = depth.saturating_sub(leading_closes);
        out.push_str(&indent.indent(line_depth));
        out.push_str(content);
        out.push_str(line_ending.as_str());
        depth = (depth + opens).saturating_sub(closes);
    }
    out
}

/// Returns (opening braces, closing braces, closing braces before any code).
fn count_braces(line: &str) -> (usize, usize, usize) {
    if line.starts_with("/**") || line.starts_with('*') || line.starts_with("//") {
        return (0, 0, 0);
    }
    let mut opens = 0;
    let mut closes = 0;
    let mut leading = 0;
    let mut seen_code = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                seen_code = true;
            }
            '/' if chars.peek() == Some(&'/') => break,
            '{' => {
                opens += 1;
                seen_code = true;
            }
            '}' => {
                closes += 1;
                if !seen_code {
                    leading += 1;
                }
            }
            c if c.is_whitespace() => {}
            _ => seen_code = true,
        }
    }
    (opens, closes, leading)
}
