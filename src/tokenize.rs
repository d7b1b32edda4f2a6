//! Word tokenizer: lowercase, whitespace split, edge punctuation stripped.
//! Tokens keep apostrophes ("don't") and are dropped when anything other than
//! letters/apostrophes remains inside, or when shorter than the minimum length.

/// Minimum token length used by the trending and sentiment reports.
pub const DEFAULT_MIN_WORD_LEN: usize = 5;

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

/// Normalize one already-lowercased whitespace-delimited chunk.
/// Returns `None` when the chunk does not survive the filters.
pub fn normalize_token(raw: &str, min_len: usize) -> Option<&str> {
    let tok = raw.trim_matches(|c: char| !is_word_char(c));
    if tok.is_empty() || !tok.chars().all(is_word_char) || !tok.chars().any(char::is_alphabetic) {
        return None;
    }
    if tok.chars().count() < min_len {
        return None;
    }
    Some(tok)
}

/// Lazy, order-preserving token stream over a lowercased copy of the input.
pub struct Tokens {
    text: String,
    pos: usize,
    min_len: usize,
}

impl Iterator for Tokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.pos < self.text.len() {
            let rest = &self.text[self.pos..];
            let Some(start) = rest.find(|c: char| !c.is_whitespace()) else {
                self.pos = self.text.len();
                return None;
            };
            let chunk = &rest[start..];
            let end = chunk.find(char::is_whitespace).unwrap_or(chunk.len());
            let raw = &chunk[..end];
            self.pos += start + end;
            if let Some(tok) = normalize_token(raw, self.min_len) {
                return Some(tok.to_string());
            }
        }
        None
    }
}

/// Tokenize `text`; `None` or empty text produces an empty stream.
pub fn tokenize(text: Option<&str>, min_len: usize) -> Tokens {
    Tokens {
        text: text.map(str::to_lowercase).unwrap_or_default(),
        pos: 0,
        min_len,
    }
}
