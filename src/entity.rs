use crate::consts::{
    DEFAULT_ALPHA_FRACTION, DEFAULT_DESIRED_FRACTION, DEFAULT_MAX_GAP, DEFAULT_MIN_SCORE,
    MIN_STRING_LENGTH,
};
use crate::enc::Decoder;
use crate::langid::LanguageScores;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/////////////////////////////////////////////////////////////////////////////////////
// Errors
/////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum Error {
    /// The language model file is unusable: wrong signature, unsupported
    /// version, truncated payload, or counts that do not add up.
    #[error("bad language model: {0}")]
    BadModel(String),

    /// An explicitly requested encoding name is not in the registry.
    #[error("unknown encoding '{name}'{}", .suggestion.as_deref().map(|s| format!(" (closest match: {s})")).unwrap_or_default())]
    UnknownEncoding {
        name: String,
        suggestion: Option<String>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/////////////////////////////////////////////////////////////////////////////////////
// Escape state & output format
/////////////////////////////////////////////////////////////////////////////////////

/// Shift state threaded through `Decoder::next` for encodings with
/// multi-byte escape modes (UTF-7, HZ, Ascii85, ISO-2022).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EscapeState {
    #[default]
    None,
    Active,
    Prefix1,
    Prefix2,
    Prefix3,
    Suffix1,
    Suffix2,
    Suffix3,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Emit the extracted bytes unchanged.
    #[default]
    Native,
    Utf8,
    Utf16Le,
    Utf16Be,
}

/////////////////////////////////////////////////////////////////////////////////////
// CodePoints
/////////////////////////////////////////////////////////////////////////////////////

/// The set of codepoints considered "desired" when extraction is focused
/// on a particular language. Stored as sorted inclusive ranges.
#[derive(Debug, Clone, Default)]
pub struct CodePoints {
    ranges: Vec<(u32, u32)>,
}

impl CodePoints {
    /// Parse a range spec such as `"0x410-0x44F,0x401,0x451"`. Each item
    /// is a codepoint or an inclusive range; hex needs an 0x prefix.
    pub fn from_spec(spec: &str) -> Option<CodePoints> {
        let mut ranges = Vec::new();
        for item in spec.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (lo, hi) = match item.split_once('-') {
                Some((lo, hi)) => (parse_codepoint(lo)?, parse_codepoint(hi)?),
                None => {
                    let point = parse_codepoint(item)?;
                    (point, point)
                }
            };
            if hi < lo {
                return None;
            }
            ranges.push((lo, hi));
        }
        if ranges.is_empty() {
            return None;
        }
        ranges.sort_unstable();
        Some(CodePoints { ranges })
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if codepoint < lo {
                    std::cmp::Ordering::Greater
                } else if codepoint > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

fn parse_codepoint(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// ExtractSettings
/////////////////////////////////////////////////////////////////////////////////////

/// Configuration bundle consulted read-only throughout extraction.
#[derive(Clone)]
pub struct ExtractSettings {
    /// Shortest run of characters worth emitting.
    pub min_string_length: usize,
    /// Longest run of undesired characters tolerated inside one string.
    pub max_gap: usize,
    /// Minimum fraction of alphanumeric characters.
    pub min_alpha_fraction: f64,
    /// Minimum fraction of desired-language characters.
    pub min_desired_fraction: f64,
    /// Confidence threshold below which a run is silently skipped.
    pub min_score: f64,
    /// Let CR/LF continue a string instead of terminating it.
    pub newlines_allowed: bool,
    /// Append a transliterated copy of each string when one exists.
    pub romanize: bool,
    /// Terminate output lines with CRLF.
    pub force_crlf: bool,
    pub show_confidence: bool,
    pub show_encoding: bool,
    pub show_filename: bool,
    pub show_script: bool,
    /// 0 disables the offset column; 8, 10 and 16 select the radix.
    pub location_radix: u32,
    pub identify_language: bool,
    /// Use the long language names instead of the short codes.
    pub friendly_names: bool,
    /// Tally emitted strings per language for the summary report.
    pub count_languages: bool,
    pub max_languages: usize,
    pub smooth_scores: bool,
    pub output_format: OutputFormat,
    /// Byte range of the input to scan.
    pub start_offset: u64,
    pub end_offset: u64,
    /// Codepoints of the language extraction is focused on, if any.
    pub desired: Option<CodePoints>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        ExtractSettings {
            min_string_length: MIN_STRING_LENGTH,
            max_gap: DEFAULT_MAX_GAP,
            min_alpha_fraction: DEFAULT_ALPHA_FRACTION,
            min_desired_fraction: DEFAULT_DESIRED_FRACTION,
            min_score: DEFAULT_MIN_SCORE,
            newlines_allowed: false,
            romanize: false,
            force_crlf: false,
            show_confidence: false,
            show_encoding: false,
            show_filename: false,
            show_script: false,
            location_radix: 0,
            identify_language: false,
            friendly_names: false,
            count_languages: false,
            max_languages: 1,
            smooth_scores: true,
            output_format: OutputFormat::Native,
            start_offset: 0,
            end_offset: u64::MAX,
            desired: None,
        }
    }
}

impl ExtractSettings {
    /// Map a location flag character to the radix it selects.
    pub fn set_location_radix(&mut self, spec: char) {
        self.location_radix = match spec.to_ascii_lowercase() {
            'o' => 8,
            'd' => 10,
            'h' | 'x' => 16,
            _ => 0,
        };
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// StringHit & sinks
/////////////////////////////////////////////////////////////////////////////////////

/// One accepted string, handed to the output sink.
pub struct StringHit<'a> {
    /// Raw bytes of the string in its source encoding.
    pub bytes: &'a [u8],
    /// Absolute offset of the first byte within the input.
    pub offset: u64,
    /// The decoder that produced the winning extraction.
    pub decoder: &'a Arc<Decoder>,
    pub confidence: f64,
    /// Smoothed language scores, when identification is active.
    pub scores: Option<&'a LanguageScores>,
}

impl Display for StringHit<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes @{} ({})",
            self.bytes.len(),
            self.offset,
            self.decoder.name()
        )
    }
}

/// Consumer of accepted strings. Returning `false` requests a best-effort
/// early stop of the extraction.
pub trait StringSink {
    fn accept(&mut self, hit: &StringHit<'_>) -> bool;
}

impl<F: FnMut(&StringHit<'_>) -> bool> StringSink for F {
    fn accept(&mut self, hit: &StringHit<'_>) -> bool {
        self(hit)
    }
}

/// Totals reported back from one extraction call.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub strings_emitted: usize,
    pub bytes_scanned: u64,
    /// Emitted-string tallies per language name (when counting is on).
    pub language_counts: counter::Counter<String>,
}
