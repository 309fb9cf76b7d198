//! Keep model output inside the target language's writing system.
//!
//! Multilingual checkpoints drift into English or a neighbouring script on low-resource
//! languages. For languages with a known Indic block every other character is dropped.

use crate::language::LanguageCode;

/// Basic punctuation kept regardless of script.
const KEPT_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// Telugu fragments the models stutter on, with the word each run is repaired to.
///
/// This list is hand-curated and only covers fragments observed in practice.
const TELUGU_REPAIRS: [(&str, &str); 3] = [
    ("మధు", "మధుమేహం"),
    ("క్యాన్సర్", "క్యాన్సర్"),
    ("ఆరోగ్యం", "ఆరోగ్యం"),
];

/// Drop characters outside the language's script block.
///
/// Whitespace and `. , ! ?` survive. Languages without a script entry pass through unchanged.
/// Telugu output additionally gets [`repair_telugu_fragments`].
pub fn enforce_script(text: &str, language: &LanguageCode) -> String {
    let Some(script) = language.script() else {
        return text.to_string();
    };

    let filtered: String = text
        .chars()
        .filter(|c| script.contains(*c) || c.is_whitespace() || KEPT_PUNCTUATION.contains(c))
        .collect();

    if language.as_str() == "te" {
        repair_telugu_fragments(&filtered)
    } else {
        filtered
    }
}

/// Replace runs of two or more known Telugu fragments with the repaired word.
pub fn repair_telugu_fragments(text: &str) -> String {
    TELUGU_REPAIRS
        .iter()
        .fold(text.to_string(), |current, (fragment, canonical)| {
            collapse_fragment_runs(&current, fragment, canonical)
        })
}

/// Replace each run of `fragment` repeated at least twice, with optional whitespace between
/// repetitions, by `canonical`. Whitespace after the run becomes a single space when more
/// text follows.
fn collapse_fragment_runs(text: &str, fragment: &str, canonical: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(position) = rest.find(fragment) {
        let mut repetitions = 1;
        let mut cursor = position + fragment.len();
        let run_end = loop {
            let after_space = cursor + leading_whitespace_len(&rest[cursor..]);
            if rest[after_space..].starts_with(fragment) {
                repetitions += 1;
                cursor = after_space + fragment.len();
            } else {
                break after_space;
            }
        };

        if repetitions >= 2 {
            out.push_str(&rest[..position]);
            out.push_str(canonical);
            if run_end < rest.len() {
                out.push(' ');
            }
            rest = &rest[run_end..];
        } else {
            let matched_end = position + fragment.len();
            out.push_str(&rest[..matched_end]);
            rest = &rest[matched_end..];
        }
    }

    out.push_str(rest);
    out
}

fn leading_whitespace_len(text: &str) -> usize {
    text.find(|c: char| !c.is_whitespace()).unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_foreign_characters_for_indic_languages() {
        let text = "भारत India में, AI बढ़ रहा है!";
        assert_eq!(enforce_script(text, &"hi".into()), "भारत  में,  बढ़ रहा है!");
    }

    #[test]
    fn other_languages_pass_through() {
        let text = "Mixed text with తెలుగు inside";
        assert_eq!(enforce_script(text, &"en".into()), text);
        assert_eq!(enforce_script(text, &"sw".into()), text);
    }

    #[test]
    fn keeps_only_telugu_block() {
        let output = enforce_script("తెలుగు summary हिंदी వార్త.", &"te".into());
        assert!(output.chars().all(|c| {
            ('\u{0C00}'..='\u{0C7F}').contains(&c) || c.is_whitespace() || ".,!?".contains(c)
        }));
        assert!(output.contains("తెలుగు"));
        assert!(output.contains("వార్త."));
    }

    #[test]
    fn repairs_repeated_telugu_fragments() {
        assert_eq!(repair_telugu_fragments("మధుమధు వ్యాధి"), "మధుమేహం వ్యాధి");
        assert_eq!(repair_telugu_fragments("ఆరోగ్యం ఆరోగ్యం  ఆరోగ్యం"), "ఆరోగ్యం");
        assert_eq!(
            repair_telugu_fragments("క్యాన్సర్ క్యాన్సర్ చికిత్స"),
            "క్యాన్సర్ చికిత్స"
        );
    }

    #[test]
    fn single_fragments_are_untouched() {
        let text = "మధుమేహం ఒక వ్యాధి";
        assert_eq!(repair_telugu_fragments(text), text);
    }
}
