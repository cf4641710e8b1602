//! Shell-like command tokenizer
//!
//! Splits a command string into the argument vector a shell would hand to a
//! process: quotes removed, escapes resolved, no variable or glob expansion.
//! The output feeds a process launcher's argument array directly, so the
//! tokenizer is deliberately permissive - malformed input degrades to a
//! best-effort split instead of an error.

/// Split a command line into argument tokens.
///
/// Tokens are separated by unescaped whitespace. Within a token:
///
/// - a `"…"` or `'…'` segment contributes its content with surrounding quotes
///   stripped; inside, a backslash escapes the following character;
/// - a `/…/` segment followed by flag letters (`g`, `i`, `m`, `y`) and then
///   whitespace or end of input is kept opaque, delimiters and flags included;
/// - a backslash before whitespace escapes the whitespace into the token;
///   any other backslash pair is kept verbatim as two characters.
///
/// Unterminated quotes and regex segments fall back to literal scanning.
/// Never fails; empty input yields an empty vector.
///
/// ```
/// use cubrir::tokenize;
///
/// assert_eq!(tokenize(r#""a b" c"#), vec!["a b", "c"]);
/// assert_eq!(tokenize(r"a\ b c"), vec!["a b", "c"]);
/// ```
#[must_use]
pub fn tokenize(command_line: &str) -> Vec<String> {
    let chars: Vec<char> = command_line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let mut token = String::new();
        while i < chars.len() && !chars[i].is_whitespace() {
            i = scan_segment(&chars, i, &mut token);
        }
        tokens.push(token);
    }

    tokens
}

/// Consume one segment starting at `start`, appending its value to `token`.
/// Returns the index of the first unconsumed character.
fn scan_segment(chars: &[char], start: usize, token: &mut String) -> usize {
    match chars[start] {
        quote @ ('"' | '\'') => match closing_quote(chars, start, quote) {
            Some(close) => {
                unescape_into(&chars[start + 1..close], token);
                close + 1
            }
            None => literal_step(chars, start, token),
        },
        '/' => match regex_segment_end(chars, start) {
            Some(end) => {
                // Opaque: delimiters and flags stay in the token.
                token.extend(&chars[start..end]);
                end
            }
            None => literal_step(chars, start, token),
        },
        _ => literal_step(chars, start, token),
    }
}

/// One step of literal scanning. A backslash before whitespace escapes the
/// whitespace into the token; any other backslash pair stays verbatim.
fn literal_step(chars: &[char], i: usize, token: &mut String) -> usize {
    if chars[i] != '\\' {
        token.push(chars[i]);
        return i + 1;
    }
    match chars.get(i + 1) {
        Some(&c) if c.is_whitespace() => {
            token.push(c);
            i + 2
        }
        Some(&c) => {
            token.push('\\');
            token.push(c);
            i + 2
        }
        None => {
            token.push('\\');
            i + 1
        }
    }
}

/// Index of the unescaped closing quote matching the opener at `open`.
fn closing_quote(chars: &[char], open: usize, quote: char) -> Option<usize> {
    let mut i = open + 1;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
        } else if chars[i] == quote {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

/// Append quoted content with backslash escapes resolved.
fn unescape_into(content: &[char], token: &mut String) {
    let mut i = 0;
    while i < content.len() {
        if content[i] == '\\' && i + 1 < content.len() {
            token.push(content[i + 1]);
            i += 2;
        } else {
            token.push(content[i]);
            i += 1;
        }
    }
}

/// End (exclusive) of a regex-literal segment opened at `open`: an unescaped
/// closing `/`, optional flag letters, then whitespace or end of input.
fn regex_segment_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    loop {
        match chars.get(i) {
            Some('\\') => i += 2,
            Some('/') => break,
            Some(_) => i += 1,
            None => return None,
        }
    }

    let mut end = i + 1;
    while matches!(chars.get(end), Some('g' | 'i' | 'm' | 'y')) {
        end += 1;
    }
    match chars.get(end) {
        None => Some(end),
        Some(c) if c.is_whitespace() => Some(end),
        Some(_) => None,
    }
}
