//! Text helpers for signature comparison and heuristic scans

/// Punctuation around which whitespace carries no meaning in a type/signature
const TIGHT_PUNCT: &[char] = &[
    '(', ')', '[', ']', '{', '}', '<', '>', ',', ':', ';', '?', '|', '&', '=', '.',
];

/// Normalize declaration/type text so that pure reformatting compares equal.
///
/// Collapses whitespace, drops whitespace next to punctuation, treats `;` and
/// `,` member separators alike and removes dangling separators before closers.
pub fn normalize_type_text(text: &str) -> String {
    let mut compact = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = !compact.is_empty();
            continue;
        }
        if pending_space {
            let prev_tight = compact.chars().last().map_or(false, |p| TIGHT_PUNCT.contains(&p));
            if !prev_tight && !TIGHT_PUNCT.contains(&ch) {
                compact.push(' ');
            }
            pending_space = false;
        }
        compact.push(if ch == ';' { ',' } else { ch });
    }

    let chars: Vec<char> = compact.chars().collect();
    let mut cleaned = String::with_capacity(compact.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ',' && matches!(chars.get(i + 1), None | Some('}') | Some(')') | Some(']') | Some('>')) {
            continue;
        }
        cleaned.push(c);
    }
    cleaned
}

/// Strip one layer of matching JS string quotes
pub fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['\'', '"', '`'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Byte offset of the first whole-word occurrence of `word` in `haystack`
pub fn find_word(haystack: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(word) {
        let abs = start + pos;
        let before_ok = haystack[..abs]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c));
        let after_ok = haystack[abs + word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if before_ok && after_ok {
            return Some(abs);
        }
        start = abs + word.len();
    }
    None
}
