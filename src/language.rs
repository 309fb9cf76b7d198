//! Language codes, writing-system tables, and language identification.
//!
//! The script table drives two things: post-hoc script enforcement on model output and the
//! [`ScriptDetector`], which votes over the leading characters of a document. The default
//! detector is [`TrigramDetector`], which asks `whatlang` for a statistical guess over the same
//! sample and only falls back to the script vote when that guess is unreliable or names a
//! language without a two-letter code.

use serde::Serialize;
use std::fmt;

/// Languages routed to the Indic-specialised backend.
pub const INDIC_LANGUAGES: [&str; 10] = ["hi", "ta", "te", "bn", "ml", "gu", "kn", "or", "pa", "mr"];

/// Languages covered by the mBART-50 checkpoint.
pub const MBART_LANGUAGES: [&str; 28] = [
    "bn", "hi", "ta", "ur", "en", "fr", "de", "es", "zh_CN", "zh_TW", "ja", "ko", "ar", "ru", "tr",
    "vi", "pl", "nl", "pt", "it", "id", "th", "cs", "el", "he", "hu", "ms", "sw",
];

/// Short language tag such as `te`, `hi`, or `en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Wrap a language tag, trimming surrounding whitespace.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.len() == code.len() {
            Self(code)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Borrow the raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the language belongs to the Indic routing set.
    pub fn is_indic(&self) -> bool {
        INDIC_LANGUAGES.contains(&self.as_str())
    }

    /// Whether the mBART-50 checkpoint covers the language.
    pub fn is_mbart_supported(&self) -> bool {
        MBART_LANGUAGES.contains(&self.as_str())
    }

    /// Writing system enforced on output for this language, if any.
    pub fn script(&self) -> Option<Script> {
        Script::for_language(self.as_str())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Indic writing systems with a contiguous Unicode block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// U+0900–U+097F (Hindi, Marathi).
    Devanagari,
    /// U+0980–U+09FF.
    Bengali,
    /// U+0A00–U+0A7F (Punjabi).
    Gurmukhi,
    /// U+0A80–U+0AFF.
    Gujarati,
    /// U+0B00–U+0B7F.
    Odia,
    /// U+0B80–U+0BFF.
    Tamil,
    /// U+0C00–U+0C7F.
    Telugu,
    /// U+0C80–U+0CFF.
    Kannada,
    /// U+0D00–U+0D7F.
    Malayalam,
}

impl Script {
    /// Every script in block order.
    pub const ALL: [Script; 9] = [
        Script::Devanagari,
        Script::Bengali,
        Script::Gurmukhi,
        Script::Gujarati,
        Script::Odia,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
    ];

    /// Inclusive code-point bounds of the script block.
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Script::Devanagari => (0x0900, 0x097F),
            Script::Bengali => (0x0980, 0x09FF),
            Script::Gurmukhi => (0x0A00, 0x0A7F),
            Script::Gujarati => (0x0A80, 0x0AFF),
            Script::Odia => (0x0B00, 0x0B7F),
            Script::Tamil => (0x0B80, 0x0BFF),
            Script::Telugu => (0x0C00, 0x0C7F),
            Script::Kannada => (0x0C80, 0x0CFF),
            Script::Malayalam => (0x0D00, 0x0D7F),
        }
    }

    /// Whether `c` falls inside the script block.
    pub fn contains(self, c: char) -> bool {
        let (start, end) = self.bounds();
        (start..=end).contains(&u32::from(c))
    }

    /// Look up the script enforced for a language tag.
    pub fn for_language(code: &str) -> Option<Script> {
        match code {
            "hi" | "mr" => Some(Script::Devanagari),
            "bn" => Some(Script::Bengali),
            "pa" => Some(Script::Gurmukhi),
            "gu" => Some(Script::Gujarati),
            "or" => Some(Script::Odia),
            "ta" => Some(Script::Tamil),
            "te" => Some(Script::Telugu),
            "kn" => Some(Script::Kannada),
            "ml" => Some(Script::Malayalam),
            _ => None,
        }
    }

    /// Language reported when this script dominates a sample.
    fn primary_language(self) -> &'static str {
        match self {
            Script::Devanagari => "hi",
            Script::Bengali => "bn",
            Script::Gurmukhi => "pa",
            Script::Gujarati => "gu",
            Script::Odia => "or",
            Script::Tamil => "ta",
            Script::Telugu => "te",
            Script::Kannada => "kn",
            Script::Malayalam => "ml",
        }
    }

    fn of(c: char) -> Option<Script> {
        Script::ALL.into_iter().find(|script| script.contains(c))
    }
}

/// Best-effort language identification.
pub trait LanguageDetector: Send + Sync {
    /// Guess the language of `text`.
    fn detect(&self, text: &str) -> LanguageCode;
}

/// Coarse character classes counted by [`ScriptDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Indic(Script),
    Latin,
    Arabic,
    Cyrillic,
    Greek,
    Hebrew,
    Thai,
    Hangul,
    Kana,
    Han,
}

impl CharClass {
    fn of(c: char) -> Option<CharClass> {
        if let Some(script) = Script::of(c) {
            return Some(CharClass::Indic(script));
        }
        let code = u32::from(c);
        let class = match code {
            0x0041..=0x005A | 0x0061..=0x007A => CharClass::Latin,
            0x00C0..=0x024F if c.is_alphabetic() => CharClass::Latin,
            0x0370..=0x03FF => CharClass::Greek,
            0x0400..=0x04FF => CharClass::Cyrillic,
            0x0590..=0x05FF => CharClass::Hebrew,
            0x0600..=0x06FF => CharClass::Arabic,
            0x0E00..=0x0E7F => CharClass::Thai,
            0x1100..=0x11FF | 0xAC00..=0xD7AF => CharClass::Hangul,
            0x3040..=0x30FF => CharClass::Kana,
            0x4E00..=0x9FFF => CharClass::Han,
            _ => return None,
        };
        Some(class)
    }
}

/// Language detector that votes by Unicode script over a bounded sample.
#[derive(Debug, Clone)]
pub struct ScriptDetector {
    sample_chars: usize,
    latin_default: LanguageCode,
}

impl ScriptDetector {
    /// Build a detector inspecting at most `sample_chars` characters.
    pub fn new(sample_chars: usize, latin_default: impl Into<String>) -> Self {
        Self {
            sample_chars: sample_chars.max(1),
            latin_default: LanguageCode::new(latin_default),
        }
    }
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self::new(500, "en")
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> LanguageCode {
        let mut tallies: Vec<(CharClass, usize)> = Vec::new();
        for class in text.chars().take(self.sample_chars).filter_map(CharClass::of) {
            match tallies.iter_mut().find(|(seen, _)| *seen == class) {
                Some((_, count)) => *count += 1,
                None => tallies.push((class, 1)),
            }
        }

        // First-seen class wins ties.
        let mut winner: Option<(CharClass, usize)> = None;
        for &(class, count) in &tallies {
            if winner.is_none_or(|(_, best)| count > best) {
                winner = Some((class, count));
            }
        }

        let has_kana = tallies.iter().any(|(class, _)| *class == CharClass::Kana);
        let code = match winner.map(|(class, _)| class) {
            None | Some(CharClass::Latin) => return self.latin_default.clone(),
            Some(CharClass::Indic(script)) => script.primary_language(),
            Some(CharClass::Han) if has_kana => "ja",
            Some(CharClass::Han) => "zh_CN",
            Some(CharClass::Kana) => "ja",
            Some(CharClass::Arabic) => "ar",
            Some(CharClass::Cyrillic) => "ru",
            Some(CharClass::Greek) => "el",
            Some(CharClass::Hebrew) => "he",
            Some(CharClass::Thai) => "th",
            Some(CharClass::Hangul) => "ko",
        };
        LanguageCode::new(code)
    }
}

/// Statistical detector backed by `whatlang` trigram profiles.
///
/// Separates languages that share a script (Swedish from English, Urdu from Arabic, Marathi
/// from Hindi). Unreliable guesses defer to the wrapped [`ScriptDetector`].
#[derive(Debug, Clone)]
pub struct TrigramDetector {
    sample_chars: usize,
    fallback: ScriptDetector,
}

impl TrigramDetector {
    /// Build a detector inspecting at most `sample_chars` characters.
    ///
    /// `latin_default` is reported for Latin-script text the trigram model cannot place.
    pub fn new(sample_chars: usize, latin_default: impl Into<String>) -> Self {
        Self {
            sample_chars: sample_chars.max(1),
            fallback: ScriptDetector::new(sample_chars, latin_default),
        }
    }
}

impl Default for TrigramDetector {
    fn default() -> Self {
        Self::new(500, "en")
    }
}

impl LanguageDetector for TrigramDetector {
    fn detect(&self, text: &str) -> LanguageCode {
        let sample: String = text.chars().take(self.sample_chars).collect();
        let guess = whatlang::detect(&sample)
            .filter(whatlang::Info::is_reliable)
            .and_then(|info| two_letter_code(info.lang().code()));
        match guess {
            Some(code) => LanguageCode::new(code),
            None => {
                tracing::debug!("Trigram guess unreliable; voting by script");
                self.fallback.detect(text)
            }
        }
    }
}

/// Map an ISO 639-3 code reported by `whatlang` to the tag used for routing.
fn two_letter_code(iso_639_3: &str) -> Option<&'static str> {
    let code = match iso_639_3 {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh_CN",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(code)
}

/// Script enforced for one language, as reported by discovery surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptEntry {
    /// Language tag.
    pub language: &'static str,
    /// Script kept in output.
    pub script: Script,
    /// Unicode block, e.g. `U+0C00-U+0C7F`.
    pub block: String,
}

/// Routing sets and script table, serialized for `/languages` and the MCP `languages` tool.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageTable {
    /// Languages preferring the Indic-specialised model.
    pub indic: &'static [&'static str],
    /// Languages covered by mBART-50.
    pub mbart: &'static [&'static str],
    /// Languages whose output is filtered to a single script.
    pub scripts: Vec<ScriptEntry>,
}

impl LanguageTable {
    /// Snapshot of the built-in tables.
    pub fn current() -> Self {
        let scripts = INDIC_LANGUAGES
            .iter()
            .filter_map(|&language| {
                Script::for_language(language).map(|script| {
                    let (start, end) = script.bounds();
                    ScriptEntry {
                        language,
                        script,
                        block: format!("U+{start:04X}-U+{end:04X}"),
                    }
                })
            })
            .collect();
        Self {
            indic: &INDIC_LANGUAGES,
            mbart: &MBART_LANGUAGES,
            scripts,
        }
    }
}
