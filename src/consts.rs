//
// Manifest constants shared across the crate
//

/// Capacity of the working buffer in the extraction loop.
pub const EXTRACT_BUFFER_LENGTH: usize = 8192;

/// How many bytes to examine when determining the character encodings to
/// use for the next few strings.
pub const SCAN_SIZE: usize = 384;
pub const SCAN_OVERLAP: usize = 64;

/// Default filters for string acceptance.
pub const MIN_STRING_LENGTH: usize = 4;
pub const DEFAULT_MAX_GAP: usize = 1000;
pub const DEFAULT_ALPHA_FRACTION: f64 = 0.25;
pub const DEFAULT_DESIRED_FRACTION: f64 = 0.5;
pub const DEFAULT_MIN_SCORE: f64 = 0.1;

/// How many repetitions of a 16-bit unit before a block of input is
/// skipped as irrelevant for extraction.
pub const MIN_REPEATS: usize = 12;

/// How many fallback character sets are appended when automatic charset
/// identification comes up short.
pub const ENCID_FALLBACK_SETS: usize = 3;

/// Weight of the word-coverage term in the structural string score.
pub const DICT_WEIGHT: f64 = 2.0;

/// Any language score at or below this value is treated as zero to avoid
/// random noise.
pub const LANGID_ZERO_SCORE: f64 = 0.01;

/// Score a language must reach to be considered even a guess.
pub const GUESS_CUTOFF: f64 = 20.0 * LANGID_ZERO_SCORE;

/// Score below which an identification is flagged with a question mark.
pub const UNSURE_CUTOFF: f64 = 120.0 * LANGID_ZERO_SCORE;

/// How close other languages must be to the top score to be listed as
/// additional guesses.
pub const MULTI_LANG_THRESHOLD: f64 = 0.85;

pub const UNAMBIGUITY_BONUS_FACTOR: f64 = 1.15;

/// Multiplicative decay applied to prior language scores whenever the
/// encodings are re-identified after a discontinuity.
pub const DISCONTINUITY_DECAY_FACTOR: f64 = 0.75;

/// Scale applied to the scores of models whose encoding differs from the
/// one the current string was extracted with.
pub const ALTERNATE_CHARSET_FACTOR: f64 = 0.9;

/// The bigram level of the model is much weaker than the long-ngram
/// levels, so it only acts as a tie-breaker when nothing longer matched.
pub const DEFAULT_BIGRAM_WEIGHT: f64 = 0.15;

/// Inter-string smoothing of language scores: the current vector is
/// lambda-combined with the decaying prior, with lambda weighted by the
/// length of the match (longer strings trust their own evidence more).
pub const SMOOTHING_LAMBDA_FLOOR: f64 = 0.5;
pub const SMOOTHING_LAMBDA_CEIL: f64 = 0.9;
pub const SMOOTHING_LAMBDA_HALFLEN: f64 = 24.0;
pub const SMOOTHING_PRIOR_FEED: f64 = 0.1;

/// Stopgram contributions are multiplied by this (negative) factor.
pub const STOPGRAM_PENALTY: f64 = -9.0;

/// N-gram percentages are stored as 32-bit integers scaled by one billion;
/// no single n-gram plausibly exceeds a 4.2% share of its training data.
pub const TRIE_SCALE_FACTOR: f64 = 1_000_000_000.0;

// Packed multi-trie binary format.
pub const TRIE_SIGNATURE: &[u8; 12] = b"MulTrie\0\0\0\0\0";
pub const TRIE_FORMAT_VERSION: u8 = 3;
pub const TRIE_FORMAT_MIN_VERSION: u8 = 2;
pub const TRIE_BITS_PER_LEVEL: u8 = 8;
pub const TRIE_PADBYTES: usize = 58;

// Language database binary format.
pub const LANGID_SIGNATURE: &[u8; 38] = b"Language Identification Database\r\n\x1A\x04\0\0";
pub const LANGID_FILE_VERSION: u8 = 5;
pub const LANGID_MIN_FILE_VERSION: u8 = 4;
pub const LANGID_PADBYTES: usize = 63;
pub const LANGID_STRING_LENGTH: usize = 64;

// Coverage scaling used by the fixed-point fields of a LanguageID record.
pub const MAX_WEIGHTED_COVER: f64 = 32.0;
pub const MAX_FREQ_COVER: f64 = 100.0;
pub const MAX_MATCH_FACTOR: f64 = 16.0;
