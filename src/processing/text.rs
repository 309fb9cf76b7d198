//! Whitespace tokenization shared by the scanning passes.

/// A maximal run of non-whitespace together with the whitespace that precedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) gap: &'a str,
    pub(crate) text: &'a str,
}

/// Split `text` into tokens plus the trailing whitespace after the last token.
///
/// Concatenating every `gap + text` followed by the trailing whitespace reproduces the input.
pub(crate) fn tokens(text: &str) -> (Vec<Token<'_>>, &str) {
    let mut out = Vec::new();
    let mut rest = text;
    loop {
        let gap_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let (gap, after) = rest.split_at(gap_end);
        if after.is_empty() {
            return (out, gap);
        }
        let word_end = after.find(char::is_whitespace).unwrap_or(after.len());
        let (word, remaining) = after.split_at(word_end);
        out.push(Token { gap, text: word });
        rest = remaining;
    }
}

/// Rebuild text from tokens, rewriting each token body with `map`.
pub(crate) fn rebuild_with<'a, F>(text: &'a str, mut map: F) -> String
where
    F: FnMut(&'a str) -> &'a str,
{
    let (tokens, trailing) = tokens(text);
    let mut out = String::with_capacity(text.len());
    for token in tokens {
        out.push_str(token.gap);
        out.push_str(map(token.text));
    }
    out.push_str(trailing);
    out
}
