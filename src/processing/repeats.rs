//! Collapse degenerate repetition emitted by beam search.
//!
//! Both passes scan whitespace tokens left to right. A run is at least three consecutive
//! tokens; shorter repeats are left alone because legitimate text repeats words twice often
//! enough ("very very").

use super::text::{Token, tokens};

/// Punctuation that may trail the last word of a repeated run.
const TRAILING_PUNCTUATION: [char; 8] = ['.', ',', '!', '?', ';', ':', '।', '॥'];

const MIN_RUN: usize = 3;

fn word_of(token: &str) -> &str {
    token.trim_end_matches(TRAILING_PUNCTUATION)
}

fn is_bare(token: &str) -> bool {
    !token.is_empty() && word_of(token).len() == token.len()
}

/// Collapse runs of three or more repeated words into one.
///
/// Every word of the run except the last must be bare; the last may carry trailing
/// punctuation, which is preserved. `"the cat cat cat."` becomes `"the cat."`.
pub fn collapse_word_repeats(text: &str) -> String {
    collapse_runs(text, |first, next, previous| {
        is_bare(previous.text) && word_of(next.text) == word_of(first.text)
    })
}

/// Collapse runs of three or more identical whitespace-separated tokens into one.
///
/// Catches repetition the word pass leaves behind, such as punctuated tokens (`"ok. ok. ok."`).
pub fn collapse_token_repeats(text: &str) -> String {
    collapse_runs(text, |first, next, _| next.text == first.text)
}

/// Scan for runs and keep only the last member, placed where the first member stood.
///
/// `extends(first, next, previous)` decides whether `next` continues the run started at
/// `first`, where `previous` is the current last member.
fn collapse_runs<F>(text: &str, extends: F) -> String
where
    F: Fn(&Token<'_>, &Token<'_>, &Token<'_>) -> bool,
{
    let (tokens, trailing) = tokens(text);
    let mut out = String::with_capacity(text.len());
    let mut index = 0;

    while index < tokens.len() {
        let first = &tokens[index];
        let mut end = index;
        while end + 1 < tokens.len() && extends(first, &tokens[end + 1], &tokens[end]) {
            end += 1;
        }

        out.push_str(first.gap);
        if end + 1 - index >= MIN_RUN {
            out.push_str(tokens[end].text);
            index = end + 1;
        } else {
            out.push_str(first.text);
            index += 1;
        }
    }

    out.push_str(trailing);
    out
}
