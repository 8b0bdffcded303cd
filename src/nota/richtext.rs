//! Rich text ↔ plain text conversion.
//!
//! The engine treats the rich document format as an opaque container: the
//! only two things it ever needs are "give me a plain-text rendering of these
//! content bytes" (list previews, rename body extraction) and "wrap this
//! plain text in a minimally-styled rich document" (new note encoding).
//!
//! Anything that does not start with the rich-format magic is passed through
//! untouched, which is how plain-text and markdown notes share this code path.

use crate::error::{NotaError, Result};

/// Whether content bytes claim to be a rich document.
pub fn is_rich(content: &str) -> bool {
    content.starts_with("{\\rtf")
}

/// Destination groups whose text is formatting metadata, not document text.
const SKIPPED_GROUPS: [&str; 4] = ["fonttbl", "colortbl", "stylesheet", "info"];

/// Produce a plain-text rendering of `content`.
///
/// Rich documents are stripped of control words and destination groups;
/// `\par` and `\line` become newlines, `\tab` becomes a tab, and `\uN`
/// unicode escapes are decoded. Non-rich content is returned as-is.
pub fn to_plain(content: &str) -> String {
    if !is_rich(content) {
        return content.to_string();
    }

    let mut out = String::new();
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' => {
                if let Some(end) = skipped_group_end(&chars, i) {
                    i = end;
                    continue;
                }
                i += 1;
            }
            '}' | '\r' | '\n' => i += 1,
            '\\' => i = consume_control(&chars, i, &mut out),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.trim_start().to_string()
}

/// Wrap plain text in a minimal rich document envelope.
///
/// Fails with [`NotaError::EncodingFailed`] if the text contains characters
/// the envelope's escape syntax cannot represent (anything beyond the basic
/// multilingual plane); callers fall back to writing plain text.
pub fn to_rich(plain: &str) -> Result<String> {
    let mut body = String::with_capacity(plain.len());
    for c in plain.chars() {
        match c {
            '\\' => body.push_str("\\\\"),
            '{' => body.push_str("\\{"),
            '}' => body.push_str("\\}"),
            '\n' => body.push_str("\\par\n"),
            '\r' => {}
            c if c.is_ascii() => body.push(c),
            c => {
                let code = c as u32;
                if code > 0xFFFF {
                    return Err(NotaError::EncodingFailed);
                }
                // \uN takes a signed 16-bit decimal, '?' is the fallback glyph
                body.push_str(&format!("\\u{}?", code as u16 as i16));
            }
        }
    }

    Ok(format!(
        "{{\\rtf1\\ansi\\deff0{{\\fonttbl{{\\f0 Helvetica;}}}}\n\\f0\\fs24 {body}}}"
    ))
}

/// If the group opening at `start` is a skipped destination, return the index
/// just past its closing brace.
fn skipped_group_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) != Some(&'\\') {
        return None;
    }
    j += 1;
    // \* introduces an ignorable destination
    let ignorable = chars.get(j) == Some(&'*');
    if ignorable {
        j += 1;
        if chars.get(j) == Some(&'\\') {
            j += 1;
        }
    }
    let word: String = chars[j..]
        .iter()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if !ignorable && !SKIPPED_GROUPS.contains(&word.as_str()) {
        return None;
    }

    let mut depth = 0usize;
    let mut k = start;
    while k < chars.len() {
        match chars[k] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(k + 1);
                }
            }
            '\\' if k + 1 < chars.len() => k += 1,
            _ => {}
        }
        k += 1;
    }
    Some(chars.len())
}

/// Consume one control word or symbol starting at the backslash; returns the
/// index of the next unconsumed character.
fn consume_control(chars: &[char], start: usize, out: &mut String) -> usize {
    let mut i = start + 1;
    let Some(&c) = chars.get(i) else {
        return i;
    };

    // Control symbols
    if !c.is_ascii_alphabetic() {
        match c {
            '\\' | '{' | '}' => out.push(c),
            '~' => out.push(' '),
            '\'' => {
                let hex: String = chars[i + 1..].iter().take(2).collect();
                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                    out.push(byte as char);
                    return i + 1 + hex.len();
                }
            }
            _ => {}
        }
        return i + 1;
    }

    // Control word: letters, optional signed numeric argument
    let word_start = i;
    while i < chars.len() && chars[i].is_ascii_alphabetic() {
        i += 1;
    }
    let word: String = chars[word_start..i].iter().collect();

    let num_start = i;
    if chars.get(i) == Some(&'-') {
        i += 1;
    }
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let arg: Option<i32> = chars[num_start..i].iter().collect::<String>().parse().ok();

    // A single space after a control word is part of the control word
    let mut next = i;
    if chars.get(i) == Some(&' ') {
        next = i + 1;
    }

    match word.as_str() {
        "par" | "line" => out.push('\n'),
        "tab" => out.push('\t'),
        "u" => {
            if let Some(code) = arg {
                let scalar = if code < 0 { code + 65536 } else { code } as u32;
                if let Some(ch) = char::from_u32(scalar) {
                    out.push(ch);
                }
                // The character following \uN is the non-unicode fallback
                if chars.get(next) == Some(&'?') {
                    next += 1;
                }
            }
        }
        _ => {}
    }

    next
}
