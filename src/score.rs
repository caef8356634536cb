use crate::consts::DICT_WEIGHT;
use crate::enc::Decoder;
use crate::entity::CodePoints;
use crate::langid::LanguageScores;

fn weight_alpha(run: f64) -> f64 {
    if run > 1.0 {
        run * run - run
    } else {
        0.0
    }
}

fn weight_desired(run: f64) -> f64 {
    if run > 1.0 {
        run * run
    } else {
        0.0
    }
}

/// Structural statistics accumulated over one candidate run. Long
/// unbroken stretches of letters are rewarded quadratically; the final
/// confidence blends them with word coverage and the language-model
/// score.
pub struct StringScore {
    total_chars: usize,
    total_alpha: usize,
    total_desired: usize,
    word_cover: usize,
    alpha_run: usize,
    desired_run: usize,
    other_run: usize,
    weighted_runs: f64,
    language_score: f64,
    have_dictionary: bool,
}

impl Default for StringScore {
    fn default() -> Self {
        StringScore::new()
    }
}

impl StringScore {
    pub fn new() -> StringScore {
        StringScore {
            total_chars: 0,
            total_alpha: 0,
            total_desired: 0,
            word_cover: 0,
            alpha_run: 0,
            desired_run: 0,
            other_run: 0,
            weighted_runs: 0.0,
            language_score: -999.9,
            have_dictionary: false,
        }
    }

    pub fn have_dictionary(&mut self) {
        self.have_dictionary = true;
    }

    pub fn update(
        &mut self,
        decoder: &Decoder,
        desired: Option<&CodePoints>,
        codepoint: u32,
        char_size: usize,
    ) {
        self.total_chars += char_size;
        let is_alpha = decoder.is_alphanumeric(codepoint);
        if is_alpha {
            self.total_alpha += char_size;
        }
        if is_alpha || codepoint == b' ' as u32 || codepoint == b'\t' as u32 {
            self.alpha_run += char_size;
        } else {
            self.weighted_runs += weight_alpha(self.alpha_run as f64);
            self.alpha_run = 0;
        }
        let is_desired = desired.map_or(true, |points| points.contains(codepoint));
        if is_desired {
            self.total_desired += char_size;
        }
        if is_desired || codepoint == b' ' as u32 || codepoint == b'\t' as u32 {
            self.desired_run += char_size;
            self.other_run = 0;
        } else {
            self.weighted_runs += weight_desired(self.desired_run as f64);
            self.desired_run = 0;
            self.other_run += char_size;
        }
    }

    /// Credit a dictionary hit of the given length.
    pub fn add_word(&mut self, word_length: usize) {
        self.word_cover += word_length;
    }

    pub fn set_language_score(&mut self, scores: &LanguageScores) {
        self.language_score = scores.highest_score();
    }

    /// Flush the open runs; call once the run has ended.
    pub fn finalize(&mut self) {
        self.weighted_runs += weight_alpha(self.alpha_run as f64);
        self.weighted_runs += weight_desired(self.desired_run as f64);
        self.alpha_run = 0;
        self.desired_run = 0;
        self.other_run = 0;
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn alpha_fraction(&self) -> f64 {
        self.total_alpha as f64 / self.total_chars as f64
    }

    pub fn desired_fraction(&self) -> f64 {
        self.total_desired as f64 / self.total_chars as f64
    }

    pub fn word_coverage(&self) -> f64 {
        if self.total_chars > 0 {
            self.word_cover as f64 / self.total_chars as f64
        } else {
            0.0
        }
    }

    pub fn weighted_runs(&self) -> f64 {
        self.weighted_runs / self.total_chars as f64 / self.total_chars as f64
    }

    pub fn desired_run(&self) -> usize {
        self.desired_run
    }

    pub fn undesired_run(&self) -> usize {
        self.other_run
    }

    /// Final confidence. Scores below ~10 are probably spurious
    /// extractions rather than real text.
    pub fn compute_score(&self) -> f64 {
        if self.total_chars == 0 {
            return 0.0;
        }
        let mut score = 0.0;
        let mut scale = 2.0;
        if self.have_dictionary {
            // strings should be at least half known words by character
            // count; squaring stretches the scale around that point
            let sc = 2.0 * self.word_coverage();
            score += DICT_WEIGHT * sc * sc;
        } else {
            scale += DICT_WEIGHT;
        }
        score += scale * self.weighted_runs();
        // longer strings are less likely to be spurious
        score *= 0.5 * (self.total_chars as f64).sqrt();
        if score < 0.0 {
            score = 0.0;
        }
        if self.language_score >= 0.0 {
            score = (score + 8.0 * self.language_score) / 2.0;
        }
        score.min(99.999)
    }
}
