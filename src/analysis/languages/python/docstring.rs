//! Docstring retrieval for Python declarations.
//!
//! A docstring is the first statement of a body when that statement is a
//! plain string literal (or an implicit concatenation of them). Bytes and
//! f-strings do not count. The literal is decoded and then cleaned the way
//! `inspect.cleandoc` does it.

use tree_sitter::Node;

use crate::analysis::ParsedFile;

/// Tab stop used when expanding tabs.
const TAB_SIZE: usize = 8;

/// Docstring of a class or function definition node.
pub fn for_definition(parsed: &ParsedFile, node: Node) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;
    literal_text(parsed, expr).map(|raw| clean(&raw))
}

/// Decoded value of a string expression, or None if it is not a plain str.
fn literal_text(parsed: &ParsedFile, node: Node) -> Option<String> {
    match node.kind() {
        "string" => decode_literal(parsed.node_text(node)),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut out = String::new();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                out.push_str(&decode_literal(parsed.node_text(part))?);
            }
            Some(out)
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind() != "comment")?;
            literal_text(parsed, inner)
        }
        _ => None,
    }
}

/// Decode a single string literal including its prefix and quotes.
fn decode_literal(text: &str) -> Option<String> {
    let quote_at = text.find(|c| c == '"' || c == '\'')?;
    let prefix = text[..quote_at].to_ascii_lowercase();
    if prefix.contains(|c| matches!(c, 'b' | 'f' | 't')) {
        return None;
    }
    let raw = prefix.contains('r');

    let rest = &text[quote_at..];
    let quote_char = &rest[..1];
    let triple = quote_char.repeat(3);
    let quote_len = if rest.len() >= 6 && rest.starts_with(&triple) {
        3
    } else {
        1
    };
    if rest.len() < quote_len * 2 {
        return None;
    }
    let body = &rest[quote_len..rest.len() - quote_len];

    if raw {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Process backslash escapes the way the Python tokenizer does for str
/// literals. Unknown escapes and unresolvable `\N{...}` names are kept as is.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded =
                    if digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit()) {
                        u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                    } else {
                        None
                    };
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            'N' => match named_char(&chars) {
                Some((ch, consumed)) => {
                    out.push(ch);
                    for _ in 0..consumed {
                        chars.next();
                    }
                }
                None => {
                    out.push('\\');
                    out.push('N');
                }
            },
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Resolve the `{NAME}` that follows `\N`. Returns the character and the
/// number of chars the braced name spans.
fn named_char<I: Iterator<Item = char> + Clone>(rest: &I) -> Option<(char, usize)> {
    let mut lookahead = rest.clone();
    if lookahead.next()? != '{' {
        return None;
    }
    let mut name = String::new();
    for c in lookahead {
        if c == '}' {
            let ch = unicode_names2::character(&name)?;
            return Some((ch, name.chars().count() + 2));
        }
        if c == '\n' {
            return None;
        }
        name.push(c);
    }
    None
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_SIZE - column % TAB_SIZE;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Clean up docstring indentation: expand tabs, strip the first line, remove
/// the common margin of the remaining lines, and drop blank lines at both
/// ends.
pub fn clean(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start().chars().count();
            (content > 0).then(|| line.chars().count() - content)
        })
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);

    lines.join("\n")
}
