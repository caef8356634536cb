use crate::consts::{
    DEFAULT_BIGRAM_WEIGHT, DISCONTINUITY_DECAY_FACTOR, LANGID_FILE_VERSION,
    LANGID_MIN_FILE_VERSION, LANGID_PADBYTES, LANGID_SIGNATURE, LANGID_STRING_LENGTH,
    LANGID_ZERO_SCORE, MAX_FREQ_COVER, MAX_MATCH_FACTOR, MAX_WEIGHTED_COVER,
    SMOOTHING_LAMBDA_CEIL, SMOOTHING_LAMBDA_FLOOR, SMOOTHING_LAMBDA_HALFLEN,
    SMOOTHING_PRIOR_FEED, UNAMBIGUITY_BONUS_FACTOR,
};
use crate::entity::{Error, Result};
use crate::trie::{self, PackedMultiTrie, TrieStorage, FREQ_LANGID_MASK, NULL_INDEX,
    PTRIE_ROOT_INDEX, TERMINAL_MASK};
use crate::utils::load_le32;
use log::debug;
use memmap2::Mmap;
use ordered_float::OrderedFloat;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Sentinel for "no uniquely matching model".
pub const UNKNOWN_LANG: u32 = u32::MAX;

/////////////////////////////////////////////////////////////////////////////////////
// LanguageID
/////////////////////////////////////////////////////////////////////////////////////

/// One (language, region, encoding, source, script) model description from
/// the database, plus its coverage and alignment metadata.
#[derive(Debug, Clone, Default)]
pub struct LanguageID {
    language: String,
    friendly: String,
    region: String,
    encoding: String,
    source: String,
    script: String,
    alignment: u8,
    train_bytes: u64,
    coverage: f64,
    counted_coverage: f64,
    freq_coverage: f64,
    match_factor: f64,
}

impl LanguageID {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn friendly_name(&self) -> &str {
        if self.friendly.is_empty() {
            &self.language
        } else {
            &self.friendly
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn script(&self) -> &str {
        if self.script.is_empty() {
            "UNKNOWN"
        } else {
            &self.script
        }
    }

    pub fn alignment(&self) -> u8 {
        self.alignment
    }

    pub fn training_bytes(&self) -> u64 {
        self.train_bytes
    }

    pub fn coverage_factor(&self) -> f64 {
        if self.coverage > 0.0 {
            self.coverage
        } else {
            1.0
        }
    }

    pub fn counted_coverage(&self) -> f64 {
        self.counted_coverage
    }

    pub fn freq_coverage(&self) -> f64 {
        self.freq_coverage
    }

    pub fn match_factor(&self) -> f64 {
        self.match_factor
    }

    /// Wildcard match: the language code must agree; empty region,
    /// encoding or source fields in the query match anything.
    pub fn matches(&self, language: &str, region: &str, encoding: &str, source: &str) -> bool {
        if language.is_empty() || !self.language.eq_ignore_ascii_case(language) {
            return false;
        }
        if !region.is_empty() && !self.region.eq_ignore_ascii_case(region) {
            return false;
        }
        if !encoding.is_empty() && !self.encoding.eq_ignore_ascii_case(encoding) {
            return false;
        }
        if !source.is_empty() && !self.source.eq_ignore_ascii_case(source) {
            return false;
        }
        true
    }

    pub fn same_language(&self, other: &LanguageID, ignore_region: bool) -> bool {
        self.language == other.language
            && (ignore_region || self.region == other.region)
            && self.encoding == other.encoding
    }

    fn read(bytes: &[u8], pos: &mut usize, version: u8) -> Result<LanguageID> {
        let mut id = LanguageID {
            language: read_fixed_field(bytes, pos)?,
            region: read_fixed_field(bytes, pos)?,
            encoding: read_fixed_field(bytes, pos)?,
            source: read_fixed_field(bytes, pos)?,
            script: read_fixed_field(bytes, pos)?,
            ..LanguageID::default()
        };
        let fixed = bytes
            .get(*pos..*pos + 16)
            .ok_or_else(|| Error::BadModel("truncated language record".into()))?;
        id.train_bytes = u64::from_le_bytes(fixed[..8].try_into().unwrap());
        id.alignment = fixed[8].max(1);
        // three reserved bytes
        id.coverage = load_le32(&fixed[12..]) as f64 / u32::MAX as f64;
        *pos += 16;
        if version > 4 {
            let covers = bytes
                .get(*pos..*pos + 12)
                .ok_or_else(|| Error::BadModel("truncated language record".into()))?;
            id.counted_coverage = load_le32(covers) as f64 * MAX_WEIGHTED_COVER / u32::MAX as f64;
            id.freq_coverage = load_le32(&covers[4..]) as f64 * MAX_FREQ_COVER / u32::MAX as f64;
            id.match_factor = load_le32(&covers[8..]) as f64 * MAX_MATCH_FACTOR / u32::MAX as f64;
            *pos += 12;
        }
        if id.language.is_empty() || id.encoding.is_empty() {
            return Err(Error::BadModel("language record missing fields".into()));
        }
        // the stored language field may carry "code=Friendly Name"
        if let Some((code, friendly)) = id.language.split_once('=') {
            id.friendly = friendly.to_string();
            id.language = code.to_string();
        }
        Ok(id)
    }
}

fn read_fixed_field(bytes: &[u8], pos: &mut usize) -> Result<String> {
    let field = bytes
        .get(*pos..*pos + LANGID_STRING_LENGTH)
        .ok_or_else(|| Error::BadModel("truncated language record".into()))?;
    *pos += LANGID_STRING_LENGTH;
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    Ok(String::from_utf8_lossy(&field[..end]).into_owned())
}

/// Split a free-form "lang[_REGION][-ENC][/SRC]" descriptor.
pub fn parse_language_descriptor(descriptor: &str) -> (&str, &str, &str, &str) {
    let (rest, source) = descriptor.split_once('/').unwrap_or((descriptor, ""));
    let (rest, encoding) = rest.split_once('-').unwrap_or((rest, ""));
    let (language, region) = rest.split_once('_').unwrap_or((rest, ""));
    (language, region, encoding, source)
}

/////////////////////////////////////////////////////////////////////////////////////
// LanguageScores
/////////////////////////////////////////////////////////////////////////////////////

/// Parallel (language-id, score) arrays. Cheap to allocate and intended to
/// be reused across strings within one extraction.
#[derive(Debug, Clone)]
pub struct LanguageScores {
    lang_ids: Vec<u16>,
    scores: Vec<f64>,
    num_languages: usize,
    sorted: bool,
}

impl LanguageScores {
    pub fn new(num_languages: usize) -> LanguageScores {
        LanguageScores {
            lang_ids: (0..num_languages as u16).collect(),
            scores: vec![0.0; num_languages],
            num_languages,
            sorted: false,
        }
    }

    pub fn num_languages(&self) -> usize {
        self.num_languages
    }

    pub fn max_languages(&self) -> usize {
        self.scores.len()
    }

    pub fn sorted(&self) -> bool {
        self.sorted
    }

    pub fn clear(&mut self) {
        self.num_languages = self.scores.len();
        for (slot, id) in self.lang_ids.iter_mut().enumerate() {
            *id = slot as u16;
        }
        self.scores.fill(0.0);
        self.sorted = false;
    }

    pub fn score(&self, n: usize) -> f64 {
        if n < self.num_languages {
            self.scores[n]
        } else {
            -1.0
        }
    }

    pub fn language_number(&self, n: usize) -> u32 {
        if n < self.num_languages {
            self.lang_ids[n] as u32
        } else {
            UNKNOWN_LANG
        }
    }

    pub fn top_language(&self) -> u32 {
        self.lang_ids.first().map_or(UNKNOWN_LANG, |&id| id as u32)
    }

    pub fn set_score(&mut self, n: usize, value: f64) {
        if n < self.num_languages {
            self.scores[n] = value;
        }
    }

    pub fn increment(&mut self, n: usize, amount: f64) {
        if n < self.num_languages {
            self.scores[n] += amount;
        }
    }

    pub fn scale_score(&mut self, n: usize, factor: f64) {
        if n < self.num_languages {
            self.scores[n] *= factor;
        }
    }

    /// Scale the score of a particular language id (post-sort the slot for
    /// an id moves around).
    pub fn scale_language(&mut self, lang_id: u32, factor: f64) {
        for n in 0..self.num_languages {
            if self.lang_ids[n] as u32 == lang_id {
                self.scores[n] *= factor;
                return;
            }
        }
    }

    pub fn scale_scores(&mut self, factor: f64) {
        for score in &mut self.scores[..self.num_languages] {
            *score *= factor;
        }
    }

    pub fn add(&mut self, other: &LanguageScores, weight: f64) {
        let count = self.num_languages.min(other.num_languages);
        for n in 0..count {
            self.scores[n] += other.scores[n] * weight;
        }
    }

    pub fn highest_score(&self) -> f64 {
        self.scores[..self.num_languages]
            .iter()
            .cloned()
            .fold(0.0, f64::max)
    }

    pub fn highest_lang_id(&self) -> u32 {
        let mut best = 0usize;
        for n in 1..self.num_languages {
            if self.scores[n] > self.scores[best] {
                best = n;
            }
        }
        self.language_number(best)
    }

    pub fn nonzero_scores(&self) -> usize {
        if self.sorted {
            self.scores[..self.num_languages]
                .iter()
                .take_while(|&&s| s > LANGID_ZERO_SCORE)
                .count()
        } else {
            self.scores[..self.num_languages]
                .iter()
                .filter(|&&s| s > LANGID_ZERO_SCORE)
                .count()
        }
    }

    /// Blend with the running prior: the prior absorbs a fraction of any
    /// real evidence in the current vector, and the current vector is
    /// lambda-combined with what the prior held.
    pub fn lambda_combine_with_prior(
        &mut self,
        prior: &mut LanguageScores,
        lambda: f64,
        smoothing: f64,
    ) {
        let count = self.num_languages.min(prior.num_languages);
        for n in 0..count {
            let prior_score = prior.scores[n];
            let current = self.scores[n];
            if current >= LANGID_ZERO_SCORE {
                prior.scores[n] += current * smoothing;
            }
            self.scores[n] = lambda * current + (1.0 - lambda) * prior_score;
        }
    }

    /// Descending sort, trimming entries below the greater of the noise
    /// floor and `cutoff_ratio` times the best score. Never discards
    /// everything: when nothing clears the cutoff the single highest entry
    /// survives.
    pub fn sort(&mut self, cutoff_ratio: f64) {
        self.sort_limited(cutoff_ratio, 0);
    }

    pub fn sort_limited(&mut self, cutoff_ratio: f64, max_langs: usize) {
        if self.sorted || self.num_languages == 0 {
            return;
        }
        let mut cutoff = LANGID_ZERO_SCORE;
        if cutoff_ratio > 0.0 {
            let threshold = self.highest_score() * cutoff_ratio.min(1.0);
            if threshold > cutoff {
                cutoff = threshold;
            }
        }
        let mut pairs: Vec<(OrderedFloat<f64>, u16)> = (0..self.num_languages)
            .filter(|&n| self.scores[n] >= cutoff)
            .map(|n| (OrderedFloat(self.scores[n]), self.lang_ids[n]))
            .collect();
        if pairs.is_empty() {
            // keep the single best entry rather than discarding everything
            let mut best = 0usize;
            for n in 1..self.num_languages {
                if self.scores[n] > self.scores[best] {
                    best = n;
                }
            }
            self.scores[0] = self.scores[best];
            self.lang_ids[0] = self.lang_ids[best];
            self.num_languages = 1;
            self.sorted = true;
            return;
        }
        pairs.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        if max_langs > 0 && pairs.len() > max_langs {
            pairs.truncate(max_langs);
        }
        for (n, (score, id)) in pairs.iter().enumerate() {
            self.scores[n] = score.0;
            self.lang_ids[n] = *id;
        }
        self.num_languages = pairs.len();
        self.sorted = true;
    }

    /// Fold together entries whose models belong to the same language name
    /// and sort the result (used for per-language tallies).
    pub fn merge_duplicate_names_and_sort(&mut self, languages: &[LanguageID]) {
        for i in 0..self.num_languages {
            if self.scores[i] == 0.0 {
                continue;
            }
            let name_i = &languages[self.lang_ids[i] as usize].language;
            for j in i + 1..self.num_languages {
                if &languages[self.lang_ids[j] as usize].language == name_i {
                    self.scores[i] += self.scores[j];
                    self.scores[j] = 0.0;
                }
            }
        }
        self.sorted = false;
        self.sort(0.0);
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// Smoothing
/////////////////////////////////////////////////////////////////////////////////////

/// Carry-over scores used to smooth each string toward its neighbors.
#[derive(Debug, Default)]
pub struct PriorScores {
    scores: Option<LanguageScores>,
}

impl PriorScores {
    /// Lambda-combine the fresh scores with the prior; longer matches
    /// trust their own evidence more.
    pub fn smooth(&mut self, current: &mut LanguageScores, match_length: usize) {
        let prior = self
            .scores
            .get_or_insert_with(|| LanguageScores::new(current.max_languages()));
        let span = SMOOTHING_LAMBDA_CEIL - SMOOTHING_LAMBDA_FLOOR;
        let weight = match_length as f64 / (match_length as f64 + SMOOTHING_LAMBDA_HALFLEN);
        let lambda = SMOOTHING_LAMBDA_FLOOR + span * weight;
        current.lambda_combine_with_prior(prior, lambda, SMOOTHING_PRIOR_FEED);
    }

    /// Decay on a detected discontinuity in the input.
    pub fn decay(&mut self) {
        if let Some(scores) = &mut self.scores {
            scores.scale_scores(DISCONTINUITY_DECAY_FACTOR);
        }
    }

    /// Reinforce the winner when an identification had no competition.
    pub fn add_unambiguity_bonus(&mut self, top_language: u32) {
        if let Some(scores) = &mut self.scores {
            scores.scale_language(top_language, UNAMBIGUITY_BONUS_FACTOR);
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// LanguageIdentifier
/////////////////////////////////////////////////////////////////////////////////////

/// Alignment ceiling by buffer position: the low two bits of an offset
/// bound the strictest alignment that can start there.
static MAX_ALIGNMENTS: [u8; 4] = [4, 1, 2, 1];

fn length_factor(len: usize) -> f64 {
    270.0 * (len as f64).powf(0.75)
}

/// The loaded model: packed multi-trie, language records, and the tables
/// derived from them.
pub struct LanguageIdentifier {
    trie: PackedMultiTrie,
    languages: Vec<LanguageID>,
    /// Per-id alignment, sized to the whole 13-bit id space so that ids
    /// beyond the model always fail the alignment test instead of needing
    /// a range check in the hot loop.
    alignments: Vec<u8>,
    unaligned: Vec<u8>,
    adjustments: Vec<f64>,
    length_factors: Vec<f64>,
    values: Arc<Vec<f64>>,
    bigram_weight: f64,
    apply_coverage: bool,
}

impl LanguageIdentifier {
    /// Load a model database: signature, version, language records, then
    /// the embedded packed trie, memory-mapped read-only when possible.
    pub fn load(path: &Path) -> Result<LanguageIdentifier> {
        let mut file = File::open(path)?;
        let storage = match unsafe { Mmap::map(&file) } {
            Ok(map) => TrieStorage::Mapped(map),
            Err(_) => {
                let mut buffer = Vec::new();
                file.read_to_end(&mut buffer)?;
                TrieStorage::Heap(buffer)
            }
        };
        let (languages, trie_offset) = {
            let bytes = match &storage {
                TrieStorage::Mapped(map) => &map[..],
                TrieStorage::Heap(vec) => &vec[..],
            };
            let header_len = LANGID_SIGNATURE.len() + 1 + 4 + 1 + LANGID_PADBYTES;
            let header = bytes
                .get(..header_len)
                .ok_or_else(|| Error::BadModel("file too short for header".into()))?;
            if &header[..LANGID_SIGNATURE.len()] != LANGID_SIGNATURE {
                return Err(Error::BadModel("bad database signature".into()));
            }
            let version = header[LANGID_SIGNATURE.len()];
            if !(LANGID_MIN_FILE_VERSION..=LANGID_FILE_VERSION).contains(&version) {
                return Err(Error::BadModel(format!(
                    "unsupported database version {version}"
                )));
            }
            let num_languages = load_le32(&header[LANGID_SIGNATURE.len() + 1..]) as usize;
            if num_languages == 0 || num_languages > FREQ_LANGID_MASK as usize {
                return Err(Error::BadModel(format!(
                    "implausible language count {num_languages}"
                )));
            }
            let mut pos = header_len;
            let mut languages = Vec::with_capacity(num_languages);
            for _ in 0..num_languages {
                languages.push(LanguageID::read(bytes, &mut pos, version)?);
            }
            (languages, pos)
        };
        let trie = PackedMultiTrie::parse(storage, trie_offset)?;
        debug!(
            "language database {}: {} models",
            path.display(),
            languages.len()
        );
        Ok(LanguageIdentifier::from_parts(trie, languages))
    }

    fn from_parts(trie: PackedMultiTrie, languages: Vec<LanguageID>) -> LanguageIdentifier {
        let table_len = FREQ_LANGID_MASK as usize + 1;
        let mut alignments = vec![u8::MAX; table_len];
        let mut unaligned = vec![u8::MAX; table_len];
        for (n, language) in languages.iter().enumerate() {
            alignments[n] = language.alignment();
            unaligned[n] = 1;
        }
        let adjustments = languages
            .iter()
            .enumerate()
            .map(|(n, language)| {
                let cover = language.match_factor();
                if cover > 0.0 {
                    // an enforced alignment depresses the match factor
                    // since only 1/align offsets can start a match
                    let align = if alignments[n] <= 8 {
                        alignments[n] as f64
                    } else {
                        1.0
                    };
                    align / cover.powf(0.25)
                } else {
                    1.0
                }
            })
            .collect();
        let max_len = trie.longest_key().max(3);
        let mut length_factors = vec![0.0; max_len + 1];
        length_factors[1] = 1.0;
        for (len, factor) in length_factors.iter_mut().enumerate().skip(3) {
            *factor = length_factor(len);
        }
        LanguageIdentifier {
            trie,
            languages,
            alignments,
            unaligned,
            adjustments,
            length_factors,
            values: trie::value_map(),
            bigram_weight: DEFAULT_BIGRAM_WEIGHT,
            apply_coverage: true,
        }
    }

    pub fn good(&self) -> bool {
        self.trie.good() && !self.languages.is_empty()
    }

    pub fn num_languages(&self) -> usize {
        self.languages.len()
    }

    pub fn trie(&self) -> &PackedMultiTrie {
        &self.trie
    }

    pub fn language_info(&self, n: u32) -> Option<&LanguageID> {
        self.languages.get(n as usize)
    }

    pub fn language_name(&self, n: u32, friendly: bool) -> &str {
        match self.languages.get(n as usize) {
            Some(info) if friendly => info.friendly_name(),
            Some(info) => info.language(),
            None => "??",
        }
    }

    pub fn language_encoding(&self, n: u32) -> Option<&str> {
        self.languages.get(n as usize).map(|info| info.encoding())
    }

    pub fn language_script(&self, n: u32) -> &str {
        self.languages
            .get(n as usize)
            .map_or("UNKNOWN", |info| info.script())
    }

    pub fn language_descriptor(&self, n: u32) -> Option<String> {
        self.languages.get(n as usize).map(|info| {
            format!(
                "{}_{}-{}",
                info.language(),
                info.region(),
                info.encoding()
            )
        })
    }

    /// Resolve a descriptor to a model number; zero or multiple matches
    /// yield the unknown sentinel.
    pub fn language_number(&self, descriptor: &str) -> u32 {
        let (language, region, encoding, source) = parse_language_descriptor(descriptor);
        let mut found = UNKNOWN_LANG;
        for (n, info) in self.languages.iter().enumerate() {
            if info.matches(language, region, encoding, source) {
                if found != UNKNOWN_LANG {
                    debug!("multiple models match language specifier {descriptor}");
                    return UNKNOWN_LANG;
                }
                found = n as u32;
            }
        }
        found
    }

    pub fn bigram_weight(&self) -> f64 {
        self.bigram_weight
    }

    pub fn set_bigram_weight(&mut self, weight: f64) {
        self.bigram_weight = weight;
    }

    pub fn apply_coverage_factor(&mut self, apply: bool) {
        self.apply_coverage = apply;
    }

    pub fn new_scores(&self) -> LanguageScores {
        LanguageScores::new(self.num_languages())
    }

    /// Accumulate per-language scores for `buffer` by walking the packed
    /// trie from every starting position.
    pub fn identify(
        &self,
        scores: &mut LanguageScores,
        buffer: &[u8],
        enforce_alignment: bool,
        apply_stopgrams: bool,
        length_normalization: usize,
    ) {
        self.identify_weighted(
            scores,
            buffer,
            enforce_alignment,
            apply_stopgrams,
            length_normalization,
            self.bigram_weight,
        )
    }

    pub(crate) fn identify_weighted(
        &self,
        scores: &mut LanguageScores,
        buffer: &[u8],
        enforce_alignment: bool,
        apply_stopgrams: bool,
        length_normalization: usize,
        bigram_weight: f64,
    ) {
        if scores.max_languages() == self.num_languages() {
            scores.clear();
        } else {
            *scores = self.new_scores();
        }
        if buffer.is_empty() || !self.trie.good() {
            return;
        }
        let alignments = if enforce_alignment {
            &self.alignments
        } else {
            &self.unaligned
        };
        let normalizer = if length_normalization > 0 {
            length_normalization as f64
        } else {
            buffer.len() as f64
        };
        let bigram_factor = bigram_weight * length_factor(2);
        let min_hist = if bigram_factor != 0.0 { 1 } else { 2 };
        let values = &self.values[..];

        for index in 0..buffer.len().saturating_sub(min_hist) {
            let mut node_index = self.trie.extend_key(buffer[index], PTRIE_ROOT_INDEX);
            if node_index == NULL_INDEX {
                continue;
            }
            if min_hist > 1 {
                node_index = self.trie.extend_key(buffer[index + 1], node_index);
                if node_index == NULL_INDEX {
                    continue;
                }
            }
            let max_alignment = MAX_ALIGNMENTS[index % 4];
            for i in (index + min_hist)..buffer.len() {
                node_index = self.trie.extend_key(buffer[i], node_index);
                if node_index == NULL_INDEX {
                    break;
                }
                let Some(node) = self.trie.node(node_index) else {
                    break;
                };
                if node.leaf() {
                    let key_len = i - index + 1;
                    let mut len_factor = if key_len == 2 {
                        bigram_factor
                    } else {
                        self.length_factors[key_len.min(self.length_factors.len() - 1)]
                    };
                    // normalize by text length so scores are comparable
                    // between buffer sizes
                    len_factor /= normalizer;
                    for record in self.trie.frequencies(node) {
                        let id = record.language_id() as usize;
                        if alignments[id] <= max_alignment {
                            let prob = record.mapped_score(values);
                            if !apply_stopgrams && prob <= 0.0 {
                                // records are sorted stopgrams-last
                                break;
                            }
                            scores.increment(id, prob * len_factor);
                        }
                    }
                }
                if node_index & TERMINAL_MASK != 0 {
                    break;
                }
            }
        }
    }

    /// Apply the per-language coverage adjustment and produce the top-N
    /// sorted view of the scores.
    pub fn finish_identification(
        &self,
        scores: &mut LanguageScores,
        highest_n: usize,
        cutoff_ratio: f64,
    ) {
        if self.apply_coverage {
            for n in 0..scores.num_languages() {
                let id = scores.language_number(n) as usize;
                if let Some(&factor) = self.adjustments.get(id) {
                    scores.set_score(n, scores.score(n) * factor);
                }
            }
        }
        if highest_n > 0 {
            scores.sort_limited(cutoff_ratio, highest_n.min(scores.num_languages()));
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// Database loading
/////////////////////////////////////////////////////////////////////////////////////

/// A loaded model pair: the main language identifier plus the sibling
/// specialized for encoding detection (the same instance when no separate
/// charset database was given).
pub struct LanguageDatabase {
    pub languages: Arc<LanguageIdentifier>,
    pub charsets: Arc<LanguageIdentifier>,
}

pub fn load_language_database(
    language_db: &Path,
    charset_db: Option<&Path>,
) -> Result<LanguageDatabase> {
    let languages = Arc::new(LanguageIdentifier::load(language_db)?);
    let charsets = match charset_db {
        Some(path) => Arc::new(LanguageIdentifier::load(path)?),
        None => languages.clone(),
    };
    Ok(LanguageDatabase {
        languages,
        charsets,
    })
}
