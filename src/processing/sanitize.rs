//! Strip generation artifacts and normalize punctuation in model output.

use super::text::rebuild_with;

const PLACEHOLDER_PREFIX: &str = "<extra_id_";

/// Characters removed from both ends of a sanitized summary.
const EDGE_TRIM: [char; 6] = [' ', '.', ',', '\'', '"', '-'];

/// Clean raw model output.
///
/// Applied in order:
/// 1. `<extra_id_N>` sentinel tokens are removed.
/// 2. Link-like fragments are removed: a token is cut from `http` or `www.` (case-insensitive,
///    followed by at least one character) to its end, and anything up to and including the
///    last `.pdf` in a token is dropped when something precedes the extension.
/// 3. Whitespace runs collapse to a single space.
/// 4. Spaces before a period are dropped and runs of periods collapse to one, so deleted
///    tokens never leave `"fell . Rain"` behind.
/// 5. Spaces, periods, commas, quotes and hyphens are trimmed from both ends, except that a
///    single closing period directly after the last word is kept.
///
/// `"Summary <extra_id_0> see http://x.pdf done.."` becomes `"Summary see done."`.
pub fn sanitize_summary(text: &str) -> String {
    let text = remove_placeholders(text);
    let text = rebuild_with(&text, strip_links);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = tighten_periods(&text);
    trim_edges(&text).to_string()
}

/// Remove `<extra_id_N>` tokens, repeating until none are left so nested leftovers go too.
fn remove_placeholders(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = remove_placeholders_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn remove_placeholders_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(position) = rest.find(PLACEHOLDER_PREFIX) {
        let after = &rest[position + PLACEHOLDER_PREFIX.len()..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with('>') {
            out.push_str(&rest[..position]);
            rest = &after[digits + 1..];
        } else {
            out.push_str(&rest[..position + PLACEHOLDER_PREFIX.len()]);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

fn strip_links(token: &str) -> &str {
    // ASCII lowercasing keeps byte offsets aligned with `token`.
    let lower = token.to_ascii_lowercase();
    let link_start = ["http", "www."]
        .into_iter()
        .filter_map(|marker| lower.find(marker))
        .filter(|position| position + 4 < token.len())
        .min()
        .unwrap_or(token.len());

    let head = &token[..link_start];
    let after_document = lower[..link_start]
        .rfind(".pdf")
        .filter(|position| *position > 0)
        .map_or(0, |position| position + 4);
    &head[after_document..]
}

/// Expects whitespace already collapsed to single spaces.
fn tighten_periods(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '.' {
            let kept = out.trim_end_matches(' ').len();
            out.truncate(kept);
            if out.ends_with('.') {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn trim_edges(text: &str) -> &str {
    let text = text.trim_start_matches(EDGE_TRIM);
    let core = text.trim_end_matches(EDGE_TRIM);
    if !core.is_empty() && text[core.len()..].starts_with('.') {
        &text[..core.len() + 1]
    } else {
        core
    }
}
