use crate::consts::{
    ALTERNATE_CHARSET_FACTOR, ENCID_FALLBACK_SETS, EXTRACT_BUFFER_LENGTH, GUESS_CUTOFF,
    MIN_REPEATS, MULTI_LANG_THRESHOLD, SCAN_OVERLAP, SCAN_SIZE,
};
use crate::enc::Decoder;
use crate::entity::{EscapeState, ExtractSettings, ExtractSummary, Result, StringHit, StringSink};
use crate::langid::{LanguageDatabase, LanguageScores, PriorScores};
use crate::score::StringScore;
use crate::trie::WordTrie;
use crate::utils::load_le16;
use log::{debug, trace};
use std::io::Read;
use std::sync::Arc;

/////////////////////////////////////////////////////////////////////////////////////
// Input streams
/////////////////////////////////////////////////////////////////////////////////////

/// Minimal forward-only input contract. The extractor never seeks
/// backward and may request fewer bytes than the source holds.
pub trait InputStream {
    fn end_of_data(&self) -> bool;
    fn current_offset(&self) -> u64;
    fn get(&mut self, count: usize, buffer: &mut [u8]) -> std::io::Result<usize>;
}

/// In-memory buffer adapter.
pub struct MemoryStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemoryStream<'a> {
    pub fn new(data: &'a [u8]) -> MemoryStream<'a> {
        MemoryStream { data, pos: 0 }
    }

    /// Start the scan at an absolute offset within the buffer.
    pub fn with_offset(data: &'a [u8], offset: usize) -> MemoryStream<'a> {
        MemoryStream {
            data,
            pos: offset.min(data.len()),
        }
    }
}

impl InputStream for MemoryStream<'_> {
    fn end_of_data(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn current_offset(&self) -> u64 {
        self.pos as u64
    }

    fn get(&mut self, count: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        let take = count.min(buffer.len()).min(self.data.len() - self.pos);
        buffer[..take].copy_from_slice(&self.data[self.pos..self.pos + take]);
        self.pos += take;
        Ok(take)
    }
}

/// Adapter for files and pipes.
pub struct ReaderStream<R: Read> {
    reader: R,
    pos: u64,
    eof: bool,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(reader: R) -> ReaderStream<R> {
        ReaderStream {
            reader,
            pos: 0,
            eof: false,
        }
    }

    pub fn with_offset(reader: R, pos: u64) -> ReaderStream<R> {
        ReaderStream {
            reader,
            pos,
            eof: false,
        }
    }
}

impl<R: Read> InputStream for ReaderStream<R> {
    fn end_of_data(&self) -> bool {
        self.eof
    }

    fn current_offset(&self) -> u64 {
        self.pos
    }

    fn get(&mut self, count: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        let want = count.min(buffer.len());
        let mut read = 0;
        while read < want {
            match self.reader.read(&mut buffer[read..want])? {
                0 => {
                    self.eof = true;
                    break;
                }
                n => read += n,
            }
        }
        self.pos += read as u64;
        Ok(read)
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// Charset-detection heuristics
/////////////////////////////////////////////////////////////////////////////////////

/// Look for runs of printable ASCII padded to 16 bits (every other byte
/// NUL), or wide-Latin-1 patterns of four non-NUL low bytes. A weighted
/// count rewards consecutive hits.
pub(crate) fn buffer_contains_ascii16(buffer: &[u8]) -> bool {
    let mut valid = 0usize;
    let mut weight = 1usize;
    const MAX_WEIGHT: usize = 3;
    let mut i = 0;
    while i + 5 < buffer.len() {
        if buffer[i + 1] == 0 && buffer[i + 3] == 0 && buffer[i + 5] == 0 {
            // three consecutive ASCII characters encoded in 16 bits
            if (1..0x7F).contains(&buffer[i])
                && (1..0x7F).contains(&buffer[i + 2])
                && (1..0x7F).contains(&buffer[i + 4])
            {
                valid += weight;
                if weight < MAX_WEIGHT {
                    weight += 1;
                }
                i += 5;
            } else if i + 7 < buffer.len()
                && buffer[i] != 0
                && buffer[i + 2] != 0
                && buffer[i + 4] != 0
                && buffer[i + 6] != 0
                && buffer[i + 7] == 0
            {
                // wide Latin-1: any nonzero low byte, but require four
                // consecutive characters
                valid += weight;
                if weight < MAX_WEIGHT {
                    weight += 1;
                }
                i += 7;
            } else {
                weight = 1;
            }
        } else {
            weight = 1;
        }
        i += 1;
    }
    valid > 6 && valid >= buffer.len() / 64
}

/// Scan for well-formed UTF-8 lead/continuation patterns, weighting
/// consecutive valid characters.
pub(crate) fn buffer_contains_utf8(buffer: &[u8]) -> bool {
    let mut valid = 0usize;
    let mut multibyte = 0usize;
    let mut weight = 1usize;
    const MAX_WEIGHT: usize = 4;
    let cont = |b: u8| b & 0xC0 == 0x80;
    let mut i = 0;
    while i + 3 < buffer.len() {
        let b = buffer[i];
        let advance = if b & 0xE0 == 0xC0 && cont(buffer[i + 1]) && !cont(buffer[i + 2]) {
            Some(1)
        } else if b & 0xF0 == 0xE0
            && cont(buffer[i + 1])
            && cont(buffer[i + 2])
            && !cont(buffer[i + 3])
        {
            Some(2)
        } else if i + 4 < buffer.len()
            && b & 0xF8 == 0xF0
            && (1..4).all(|k| cont(buffer[i + k]))
            && !cont(buffer[i + 4])
        {
            Some(3)
        } else if i + 5 < buffer.len()
            && b & 0xFC == 0xF8
            && (1..5).all(|k| cont(buffer[i + k]))
            && !cont(buffer[i + 5])
        {
            Some(4)
        } else if i + 6 < buffer.len()
            && b & 0xFE == 0xFC
            && (1..6).all(|k| cont(buffer[i + k]))
            && !cont(buffer[i + 6])
        {
            Some(5)
        } else {
            None
        };
        match advance {
            Some(extra) => {
                multibyte += 1;
                valid += weight;
                if weight < MAX_WEIGHT {
                    weight += 1;
                }
                i += extra;
            }
            None if b > 0 && b < 0x7F => {
                if weight + 1 > MAX_WEIGHT {
                    valid += 1;
                } else {
                    weight += 1;
                }
            }
            None => {
                // NUL or a stray continuation byte breaks the streak
                weight = 1;
            }
        }
        i += 1;
    }
    (valid > 60 || multibyte > 4) && valid >= buffer.len() / 24
}

/////////////////////////////////////////////////////////////////////////////////////
// Extractor
/////////////////////////////////////////////////////////////////////////////////////

struct RunResult {
    /// Byte length of the extracted run; negative when the run failed a
    /// filter and should be skipped rather than emitted.
    length: isize,
    confidence: f64,
}

/// One extraction pass over an input stream: selects decoders, pulls
/// maximal character runs, filters and scores them, and hands accepted
/// strings to the sink. Single-threaded and cooperative; the only
/// blocking point is the stream read.
pub struct Extractor {
    settings: ExtractSettings,
    database: Option<LanguageDatabase>,
    /// Per-language-model decoder for the main identifier.
    charsets_by_lang: Vec<Option<Arc<Decoder>>>,
    /// Per-model decoder for the charset identifier.
    encsets_by_lang: Vec<Option<Arc<Decoder>>>,
    explicit: Vec<Arc<Decoder>>,
    wordlist: Option<Arc<WordTrie>>,
    prior: PriorScores,
    langscores: Option<LanguageScores>,
    charset_scores: Option<LanguageScores>,
}

impl Extractor {
    pub fn new(settings: ExtractSettings) -> Extractor {
        Extractor {
            settings,
            database: None,
            charsets_by_lang: Vec::new(),
            encsets_by_lang: Vec::new(),
            explicit: Vec::new(),
            wordlist: None,
            prior: PriorScores::default(),
            langscores: None,
            charset_scores: None,
        }
    }

    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Attach a language database; builds the per-model decoder tables.
    /// Models whose encoding name is unknown simply never become
    /// candidates.
    pub fn with_database(mut self, database: &LanguageDatabase) -> Extractor {
        let newlines = self.settings.newlines_allowed;
        self.charsets_by_lang = (0..database.languages.num_languages() as u32)
            .map(|n| {
                database
                    .languages
                    .language_encoding(n)
                    .and_then(|enc| Decoder::by_name(enc, newlines).ok())
            })
            .collect();
        self.encsets_by_lang = (0..database.charsets.num_languages() as u32)
            .map(|n| {
                database
                    .charsets
                    .language_encoding(n)
                    .and_then(|enc| Decoder::by_name(enc, newlines).ok())
            })
            .collect();
        self.database = Some(LanguageDatabase {
            languages: database.languages.clone(),
            charsets: database.charsets.clone(),
        });
        self
    }

    /// Fix the candidate decoder list instead of automatic detection.
    pub fn with_decoders(mut self, decoders: Vec<Arc<Decoder>>) -> Extractor {
        self.explicit = decoders;
        self
    }

    pub fn with_wordlist(mut self, wordlist: Arc<WordTrie>) -> Extractor {
        self.wordlist = Some(wordlist);
        self
    }

    /// Extract a maximal run with one decoder, updating a structural
    /// score. Stops on the first invalid character, on a NUL codepoint,
    /// or once the undesired-character gap grows too long.
    fn extract_run(&self, buf: &[u8], decoder: &Decoder) -> RunResult {
        let mut score = StringScore::new();
        let mut cursor = self.wordlist.as_deref().map(|w| w.cursor());
        if cursor.is_some() {
            score.have_dictionary();
        }
        let desired = self.settings.desired.as_ref();
        let mut escape = EscapeState::None;
        let mut prev_alphanum = false;
        let mut length = 0isize;
        let mut pos = 0usize;
        while pos < buf.len() {
            let Some((codepoint, size)) = decoder.next(&buf[pos..], &mut escape) else {
                break;
            };
            if codepoint == 0 {
                break;
            }
            score.update(decoder, desired, codepoint, size);
            if let Some(cursor) = cursor.as_mut() {
                let alphanum = decoder.is_alphanumeric(codepoint);
                if alphanum {
                    if !prev_alphanum {
                        cursor.reset();
                    }
                    for &b in &buf[pos..pos + size] {
                        cursor.extend(b);
                    }
                } else {
                    if prev_alphanum && cursor.matched() {
                        score.add_word(cursor.key_length());
                    }
                    if codepoint == b' ' as u32 || codepoint == b'\t' as u32 {
                        score.add_word(1);
                    }
                }
                prev_alphanum = alphanum;
            }
            length += size as isize;
            pos += size;
            if score.undesired_run() > self.settings.max_gap {
                length -= score.undesired_run() as isize;
                break;
            }
        }
        if prev_alphanum {
            if let Some(cursor) = cursor.as_ref() {
                if cursor.matched() {
                    score.add_word(cursor.key_length());
                }
            }
        }
        score.finalize();
        let mut passed = length > 0;
        if passed {
            if score.total_chars() < self.settings.min_string_length
                || score.alpha_fraction() < self.settings.min_alpha_fraction
                || score.desired_fraction() < self.settings.min_desired_fraction
            {
                passed = false;
            }
        }
        let confidence = if length > 0 {
            score.compute_score() * decoder.detection_reliability()
        } else {
            0.0
        };
        RunResult {
            length: if passed { length } else { -length },
            confidence,
        }
    }

    /// Try every candidate decoder at this offset; the longest accepted
    /// run wins, confidence breaks ties, and the longest rejected run is
    /// reported when nothing passes.
    fn try_candidates(
        &self,
        buf: &[u8],
        candidates: &[Arc<Decoder>],
    ) -> (isize, f64, Option<Arc<Decoder>>) {
        let mut best_length = 0isize;
        let mut best_conf = 0.0f64;
        let mut best: Option<Arc<Decoder>> = None;
        let mut best_neg = 0isize;
        let mut best_neg_decoder: Option<Arc<Decoder>> = None;
        for decoder in candidates {
            let run = self.extract_run(buf, decoder);
            if run.length > best_length || (run.length == best_length && run.confidence > best_conf)
            {
                best_length = run.length;
                best_conf = run.confidence;
                best = Some(decoder.clone());
            } else if run.length < best_neg {
                best_neg = run.length;
                best_neg_decoder = Some(decoder.clone());
            }
        }
        if best_length > 0 {
            (best_length, best_conf, best)
        } else {
            (best_neg, best_conf, best_neg_decoder)
        }
    }

    /// Full per-offset extraction: candidate competition, offset+1 retry
    /// for aligned decoders, language identification, re-extraction under
    /// a more reliable encoding, and the length-banded confidence blend.
    /// Returns (length, adj, confidence, decoder, scored).
    fn extract_at(
        &mut self,
        buf: &[u8],
        candidates: &[Arc<Decoder>],
    ) -> (isize, usize, f64, Option<Arc<Decoder>>, bool) {
        let (mut length, mut confidence, mut winner) = self.try_candidates(buf, candidates);
        let mut adj = 0usize;
        if let Some(set1) = winner.clone() {
            if set1.alignment() > 1 && buf.len() > 2 {
                let abs1 = length.unsigned_abs();
                let nl1 = set1.consume_newlines(&buf[abs1.min(buf.len())..]);
                // accept the offset run when it is longer, equally long but
                // better, or when the aligned run swallowed the whole
                // buffer (probable false positive) and the offset run
                // did not
                if nl1 == 0 {
                    let (len2, conf2, set2) = self.try_candidates(&buf[1..], candidates);
                    let mut abs2 = len2.unsigned_abs();
                    if let Some(set2) = &set2 {
                        abs2 += set2.consume_newlines(&buf[(1 + abs2).min(buf.len())..]);
                    }
                    let abs1_total = abs1 + nl1;
                    if abs2 > abs1_total
                        || (abs2 == abs1_total && (len2 > length || conf2 >= confidence))
                        || (abs1_total >= buf.len() && abs2 < buf.len() - 1)
                    {
                        adj = 1;
                        length = len2;
                        confidence = conf2;
                        winner = set2;
                    }
                }
            }
        }
        let mut scored = false;
        if let (Some(database), true) = (&self.database, length > 2) {
            let ident = database.languages.clone();
            let scores = self
                .langscores
                .get_or_insert_with(|| ident.new_scores());
            let run = &buf[adj..adj + length as usize];
            ident.identify(scores, run, true, true, 0);
            scored = true;
            let rawscore = scores.highest_score();
            if length >= 12 && rawscore > GUESS_CUTOFF {
                if let Some(set1) = winner.clone() {
                    if set1.detection_reliability() < 1.0 {
                        // the winning decoder validates weakly; when the
                        // best language's native encoding is trustworthy
                        // (or fixes an endianness conflict), re-extract
                        // with it
                        let best_lang = scores.highest_lang_id() as usize;
                        let candidate = self
                            .charsets_by_lang
                            .get(best_lang)
                            .cloned()
                            .flatten();
                        if let Some(set) = candidate {
                            if set.detection_reliability() >= 1.0
                                || (set1.alignment() > 1
                                    && set.alignment() > 1
                                    && set.big_endian() != set1.big_endian())
                            {
                                trace!(
                                    "re-extracting with {} after language identification",
                                    set.name()
                                );
                                if set.alignment() == 1 && set1.alignment() > 1 {
                                    adj = 0;
                                }
                                length = 0;
                                while length <= 0 && adj + 2 < buf.len() {
                                    let run = self.extract_run(&buf[adj..], &set);
                                    length = run.length;
                                    confidence = run.confidence;
                                    if length <= 0 {
                                        adj += 1;
                                    }
                                }
                                if (-1..=0).contains(&length) {
                                    length = -(set.alignment() as isize);
                                }
                                winner = Some(set);
                            }
                        }
                    }
                }
            }
            // the longer the string, the more of the confidence comes from
            // the language-model score
            let langid_score = 10.0 * rawscore;
            confidence = match length {
                ..=8 => (3.0 * confidence + langid_score) / 4.0,
                9..=20 => (2.0 * confidence + langid_score) / 3.0,
                21..=40 => (confidence + langid_score) / 2.0,
                41..=60 => (confidence + 2.0 * langid_score) / 3.0,
                61..=80 => (confidence + 4.0 * langid_score) / 5.0,
                _ => (confidence + 7.0 * langid_score) / 8.0,
            };
            confidence = confidence.min(99.999);
        }
        (length, adj, confidence, winner, scored)
    }

    /// Run the charset identifier over the scan window and produce the
    /// ranked candidate list, injecting ASCII (always), UTF-8 and
    /// ASCII-16LE (when the buffer looks like them) with stable
    /// precedence.
    fn identify_charsets(&mut self, buffer: &[u8]) -> Result<Vec<Arc<Decoder>>> {
        let newlines = self.settings.newlines_allowed;
        let mut sets: Vec<Arc<Decoder>> = Vec::with_capacity(ENCID_FALLBACK_SETS + 4);
        if let Some(database) = &self.database {
            let ident = database.charsets.clone();
            let scores = self
                .charset_scores
                .get_or_insert_with(|| ident.new_scores());
            // bigrams are noise for encoding identification
            ident.identify_weighted(scores, buffer, false, false, 0, 0.0);
            for n in 0..scores.num_languages() {
                let id = scores.language_number(n) as usize;
                if let Some(Some(set)) = self.encsets_by_lang.get(id) {
                    scores.scale_score(n, set.detection_reliability());
                }
            }
            scores.sort(0.5);
            for n in 0..scores.nonzero_scores() {
                // only trust the language-detected encodings when we're
                // not merely guessing
                if scores.score(n) < GUESS_CUTOFF / 4.0 {
                    break;
                }
                let id = scores.language_number(n) as usize;
                if let Some(Some(set)) = self.encsets_by_lang.get(id) {
                    if !sets.iter().any(|s| Arc::ptr_eq(s, set)) {
                        sets.push(set.clone());
                    }
                }
            }
        }
        let cs_ascii = Decoder::by_name("ASCII", newlines)?;
        let cs_utf8 = Decoder::by_name("UTF-8", newlines)?;
        let cs_ascii16 = Decoder::by_name("ASCII-16LE", newlines)?;
        let mut have_ascii16 = false;
        for n in 0..sets.len() {
            if Arc::ptr_eq(&sets[n], &cs_ascii16) {
                have_ascii16 = true;
            } else if Arc::ptr_eq(&sets[n], &cs_utf8) {
                // UTF-8 rarely false-positives, so it goes first and wins
                // length ties against Latin-family alternatives
                sets.swap(0, n);
            }
        }
        let have_utf8 = sets
            .first()
            .is_some_and(|s| Arc::ptr_eq(s, &cs_utf8));
        // ASCII always participates so pure-ASCII runs resolve as ASCII
        // rather than one of its supersets
        let ascii_dest = usize::from(have_utf8);
        if let Some(pos) = sets.iter().position(|s| Arc::ptr_eq(s, &cs_ascii)) {
            if pos > ascii_dest {
                let ascii = sets.remove(pos);
                sets.insert(ascii_dest, ascii);
            }
        } else {
            sets.insert(ascii_dest.min(sets.len()), cs_ascii);
        }
        if !have_utf8 && buffer_contains_utf8(buffer) {
            trace!("buffer looks like UTF-8, injecting candidate");
            sets.insert(1.min(sets.len()), cs_utf8);
        }
        if !have_ascii16 && buffer_contains_ascii16(buffer) {
            trace!("buffer looks like 16-bit ASCII, injecting candidate");
            sets.insert(2.min(sets.len()), cs_ascii16);
        }
        trace!(
            "candidate encodings: {}",
            sets.iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(sets)
    }

    fn emit(
        &mut self,
        sink: &mut dyn StringSink,
        summary: &mut ExtractSummary,
        bytes: &[u8],
        offset: u64,
        decoder: &Arc<Decoder>,
        confidence: f64,
        scored: bool,
    ) -> bool {
        if self.settings.count_languages && scored {
            if let (Some(scores), Some(database)) = (&self.langscores, &self.database) {
                if scores.highest_score() > GUESS_CUTOFF {
                    let name = database
                        .languages
                        .language_name(scores.highest_lang_id(), self.settings.friendly_names);
                    summary.language_counts[&name.to_string()] += 1;
                }
            }
        }
        let scores = if scored && self.settings.identify_language {
            self.langscores.as_mut()
        } else {
            None
        };
        let scores = match (scores, &self.database) {
            (Some(scores), Some(database)) => {
                // models extracted under a different encoding get a small
                // discount before smoothing
                for n in 0..scores.num_languages() {
                    let id = scores.language_number(n) as usize;
                    let same = matches!(
                        self.charsets_by_lang.get(id),
                        Some(Some(set)) if Arc::ptr_eq(set, decoder)
                    );
                    if !same {
                        scores.scale_score(n, ALTERNATE_CHARSET_FACTOR);
                    }
                }
                if self.settings.smooth_scores {
                    self.prior.smooth(scores, bytes.len());
                }
                scores.sort_limited(MULTI_LANG_THRESHOLD, 2 * self.settings.max_languages.max(1));
                if scores.num_languages() == 1 {
                    self.prior.add_unambiguity_bonus(scores.top_language());
                }
                Some(&*scores)
            }
            _ => None,
        };
        summary.strings_emitted += 1;
        let hit = StringHit {
            bytes,
            offset,
            decoder,
            confidence,
            scores,
        };
        sink.accept(&hit)
    }

    /// Extract every plausible string from the stream, in strictly
    /// non-decreasing offset order.
    pub fn extract(
        &mut self,
        input: &mut dyn InputStream,
        sink: &mut dyn StringSink,
    ) -> Result<ExtractSummary> {
        let mut summary = ExtractSummary::default();
        let mut buffer = vec![0u8; EXTRACT_BUFFER_LENGTH];
        let mut buflen = 0usize;
        let mut offset = 0usize;
        let mut bufloc = input.current_offset();
        let start_loc = bufloc;
        let end_offset = self.settings.end_offset;
        let automatic = self.explicit.is_empty();
        let mut candidates = self.explicit.clone();
        let mut stopped = false;

        'stream: while (!input.end_of_data() && bufloc < end_offset) || buflen > offset {
            if !fill_buffer(
                input,
                &mut buffer,
                &mut buflen,
                &mut offset,
                &mut bufloc,
                end_offset,
            )? {
                break;
            }
            let mut highwater = EXTRACT_BUFFER_LENGTH / 2;
            if automatic {
                // a small scan window keeps the charset identification
                // responsive to encoding changes in the input
                highwater = buflen.min(SCAN_SIZE - SCAN_OVERLAP);
                let scan = buflen.min(SCAN_SIZE);
                candidates = self.identify_charsets(&buffer[..scan])?;
            } else if highwater > buflen {
                highwater = buflen;
            }
            let mut skipped = 0usize;
            let mut extracted_strings = 0usize;
            while offset < highwater {
                let (len, adj, confidence, decoder, scored) =
                    self.extract_at(&buffer[offset..buflen], &candidates);
                offset += adj;
                if len > 0 {
                    let mut len = len as usize;
                    if len >= buflen - offset {
                        // an incomplete character at the buffer end may
                        // have over-run; clamp, and distrust a whole-buffer
                        // "string" from a weakly-validated encoding
                        len = len.min(buflen - offset);
                        if let Some(set) = &decoder {
                            if set.detection_reliability() < 1.0 {
                                len = len.min(highwater);
                            }
                        }
                    }
                    let decoder = decoder.expect("positive run always has a decoder");
                    if confidence >= self.settings.min_score {
                        let keep = self.emit(
                            sink,
                            &mut summary,
                            &buffer[offset..offset + len],
                            bufloc + offset as u64,
                            &decoder,
                            confidence,
                            scored,
                        );
                        if !keep {
                            debug!("sink requested stop");
                            stopped = true;
                        }
                    } else {
                        trace!(
                            "rejected {}-byte {} run at {}: confidence {:.3}",
                            len,
                            decoder.name(),
                            bufloc + offset as u64,
                            confidence
                        );
                    }
                    offset += len;
                    let nl = decoder.consume_newlines(&buffer[offset.min(buflen)..buflen]);
                    offset += nl;
                    if confidence < self.settings.min_score
                        && len > 1
                        && decoder.alignment() > 1
                        && nl == 0
                    {
                        // the aligned run may have swallowed the first
                        // byte of the next string
                        offset -= 1;
                    }
                    skipped = 0;
                    extracted_strings += 1;
                    if stopped {
                        break 'stream;
                    }
                    continue;
                }
                if len < 0 {
                    offset += (-len) as usize;
                    skipped += (-len) as usize;
                } else {
                    offset += 1;
                    skipped += 1;
                }
                // after two or more strings and a substantial stretch of
                // junk, the encoding may have changed
                if skipped > 20
                    && automatic
                    && extracted_strings > 1
                    && offset > SCAN_SIZE / 4
                {
                    debug!("{skipped} bytes without a string, re-identifying encodings");
                    self.prior.decay();
                    break;
                }
            }
        }
        summary.bytes_scanned = bufloc + offset as u64 - start_loc;
        Ok(summary)
    }
}

/// Refill the working buffer, sliding any unconsumed remnant to the
/// front, and skip leading runs of a repeated 16-bit unit.
fn fill_buffer(
    input: &mut dyn InputStream,
    buffer: &mut [u8],
    buflen: &mut usize,
    offset: &mut usize,
    bufloc: &mut u64,
    end_offset: u64,
) -> Result<bool> {
    loop {
        if *buflen > 0 {
            if *offset < *buflen {
                buffer.copy_within(*offset..*buflen, 0);
            } else if *offset > *buflen {
                *offset = *buflen;
            }
            *buflen -= *offset;
            *bufloc += *offset as u64;
            *offset = 0;
        }
        let mut count = 0;
        if *bufloc < end_offset && !input.end_of_data() {
            let mut remaining = buffer.len() - *buflen;
            if *bufloc + remaining as u64 > end_offset {
                remaining = (end_offset - *bufloc) as usize;
            }
            count = input.get(remaining, &mut buffer[*buflen..])?;
        }
        *buflen += count;
        let mut skipped_repeats = false;
        if *buflen > MIN_REPEATS * 2 && load_le16(buffer) == load_le16(&buffer[2..]) {
            let value = load_le16(buffer);
            let mut repeats = 2;
            while repeats < *buflen / 2 && load_le16(&buffer[2 * repeats..]) == value {
                repeats += 1;
            }
            if repeats >= MIN_REPEATS {
                trace!(
                    "skipping {} repeats of 16-bit unit {:04X} at offset {}",
                    repeats,
                    value,
                    *bufloc
                );
                *offset = repeats * 2;
                skipped_repeats = true;
            }
        }
        if !skipped_repeats {
            break;
        }
    }
    Ok(*buflen > 0)
}
