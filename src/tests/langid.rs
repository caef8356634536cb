use super::model::{load_test_database, ngrams_of, Ngram, TestLang};
use crate::consts::LANGID_ZERO_SCORE;
use crate::langid::{parse_language_descriptor, LanguageScores, PriorScores, UNKNOWN_LANG};

const FREQ: u32 = 2_000_000_000;

fn merge(mut a: Vec<Ngram>, b: Vec<Ngram>) -> Vec<Ngram> {
    for (key, records) in b {
        match a.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(records),
            None => a.push((key, records)),
        }
    }
    a
}

#[test]
fn test_descriptor_parsing() {
    assert_eq!(parse_language_descriptor("en"), ("en", "", "", ""));
    assert_eq!(
        parse_language_descriptor("en_US-ASCII/news"),
        ("en", "US", "ASCII", "news")
    );
    assert_eq!(
        parse_language_descriptor("ru-KOI8-R"),
        ("ru", "", "KOI8-R", "")
    );
    assert_eq!(parse_language_descriptor("el_GR"), ("el", "GR", "", ""));
}

#[test]
fn test_database_metadata() {
    let langs = [
        TestLang::new("el=Greek", "UTF-8"),
        TestLang {
            code: "ru",
            region: "RU",
            encoding: "KOI8-R",
            script: "CYRL",
            alignment: 1,
        },
    ];
    let ngrams = ngrams_of(b"abcdef", &[3], 0, FREQ);
    let database = load_test_database(&langs, &ngrams, "meta");
    let ident = &database.languages;
    assert_eq!(ident.num_languages(), 2);
    assert_eq!(ident.language_name(0, false), "el");
    assert_eq!(ident.language_name(0, true), "Greek");
    assert_eq!(ident.language_encoding(0), Some("UTF-8"));
    assert_eq!(ident.language_script(1), "CYRL");
    assert_eq!(ident.language_descriptor(1).unwrap(), "ru_RU-KOI8-R");
    // descriptor resolution with wildcards
    assert_eq!(ident.language_number("ru"), 1);
    assert_eq!(ident.language_number("ru_RU"), 1);
    assert_eq!(ident.language_number("ru-KOI8-R"), 1);
    assert_eq!(ident.language_number("de"), UNKNOWN_LANG);
    // the same model twice would be ambiguous
    assert_eq!(ident.language_number("el"), 0);
    let info = ident.language_info(1).unwrap();
    assert!(info.matches("RU", "", "", ""));
    assert!(info.matches("ru", "RU", "KOI8-R", ""));
    assert!(!info.matches("ru", "UA", "", ""));
    assert!(!info.matches("", "", "", ""));
}

#[test]
fn test_identify_scores_trained_language() {
    let greek = "Καλημέρα".as_bytes();
    let langs = [
        TestLang::new("el", "UTF-8"),
        TestLang::new("en", "ASCII"),
    ];
    let ngrams = merge(
        ngrams_of(greek, &[3, 4], 0, FREQ),
        ngrams_of(b"the quick brown", &[3, 4], 1, FREQ),
    );
    let database = load_test_database(&langs, &ngrams, "identify");
    let ident = &database.languages;

    let mut scores = ident.new_scores();
    ident.identify(&mut scores, greek, true, true, 0);
    assert!(scores.score(0) > LANGID_ZERO_SCORE, "greek did not score");
    assert!(scores.score(0) > scores.score(1));
    assert_eq!(scores.highest_lang_id(), 0);

    ident.identify(&mut scores, b"the quick brown", true, true, 0);
    assert_eq!(scores.highest_lang_id(), 1);

    // untrained bytes score nothing
    ident.identify(&mut scores, &[0x01, 0x02, 0x03, 0x04], true, true, 0);
    assert!(scores.highest_score() < LANGID_ZERO_SCORE);
}

#[test]
fn test_identify_alignment_enforcement() {
    // a model with 2-byte alignment only collects matches at even offsets
    let payload = b"h\x00e\x00l\x00l\x00o\x00";
    let langs = [TestLang::new("en", "UTF-16LE").aligned(2)];
    // only the unit-aligned 4-byte grams, the way an aligned model is built
    let ngrams: Vec<_> = (0..payload.len() - 3)
        .step_by(2)
        .map(|n| (payload[n..n + 4].to_vec(), vec![(0u32, FREQ, false)]))
        .collect();
    let database = load_test_database(&langs, &ngrams, "align");
    let ident = &database.languages;

    let mut aligned = ident.new_scores();
    ident.identify(&mut aligned, payload, true, true, 0);
    assert!(aligned.score(0) > 0.0);

    // shift the buffer by one byte: every trained position is now odd
    let mut shifted = vec![0xFFu8];
    shifted.extend_from_slice(payload);
    let mut misaligned = ident.new_scores();
    ident.identify(&mut misaligned, &shifted, true, true, 0);
    assert!(misaligned.score(0) < aligned.score(0) / 2.0);

    // with enforcement off the shifted buffer scores again
    let mut unaligned = ident.new_scores();
    ident.identify(&mut unaligned, &shifted, false, true, 0);
    assert!(unaligned.score(0) > 0.0);
}

#[test]
fn test_stopgram_modes() {
    let langs = [TestLang::new("xx", "ASCII")];
    let ngrams = vec![
        (b"good".to_vec(), vec![(0u32, FREQ, false)]),
        (b"badx".to_vec(), vec![(0, FREQ, true)]),
    ];
    let database = load_test_database(&langs, &ngrams, "stopgram");
    let ident = &database.languages;

    let mut scores = ident.new_scores();
    ident.identify(&mut scores, b"good", true, true, 0);
    let positive = scores.score(0);
    assert!(positive > 0.0);

    // applying stopgrams drags the score down
    ident.identify(&mut scores, b"good badx", true, true, 0);
    let with_stop = scores.score(0);
    assert!(with_stop < positive);

    // skipping stopgrams ignores the negative evidence
    ident.identify(&mut scores, b"good badx", true, false, 0);
    assert!(scores.score(0) > with_stop);
}

#[test]
fn test_scores_sort_and_cutoff() {
    let mut scores = LanguageScores::new(4);
    scores.set_score(0, 0.5);
    scores.set_score(1, 2.0);
    scores.set_score(2, 1.9);
    scores.set_score(3, 0.002);
    scores.sort(0.85);
    // 0.85 * 2.0 = 1.7 keeps only the top two
    assert_eq!(scores.num_languages(), 2);
    assert_eq!(scores.language_number(0), 1);
    assert_eq!(scores.language_number(1), 2);
    assert!(scores.sorted());

    // nothing above the noise floor: the single best entry survives
    let mut scores = LanguageScores::new(3);
    scores.set_score(0, 0.001);
    scores.set_score(1, 0.005);
    scores.set_score(2, 0.002);
    scores.sort(0.0);
    assert_eq!(scores.num_languages(), 1);
    assert_eq!(scores.language_number(0), 1);
}

#[test]
fn test_scores_merge_by_name() {
    let langs = [
        TestLang::new("en", "ASCII"),
        TestLang::new("en", "Latin-1"),
        TestLang::new("fr", "Latin-1"),
    ];
    let database = load_test_database(&langs, &ngrams_of(b"abcd", &[3], 0, FREQ), "mergenames");
    let infos: Vec<_> = (0..3)
        .map(|n| database.languages.language_info(n).unwrap().clone())
        .collect();
    let mut scores = LanguageScores::new(3);
    scores.set_score(0, 1.0);
    scores.set_score(1, 0.8);
    scores.set_score(2, 1.5);
    scores.merge_duplicate_names_and_sort(&infos);
    assert_eq!(scores.language_number(0), 0); // en folded to 1.8
    assert!((scores.score(0) - 1.8).abs() < 1e-9);
    assert!((scores.score(1) - 1.5).abs() < 1e-9);
}

#[test]
fn test_finish_identification_adjusts_and_trims() {
    let langs = [
        TestLang::new("aa", "ASCII"),
        TestLang::new("bb", "ASCII"),
        TestLang::new("cc", "ASCII"),
    ];
    let database = load_test_database(&langs, &ngrams_of(b"abcd", &[3], 0, FREQ), "finish");
    let mut scores = LanguageScores::new(3);
    scores.set_score(0, 1.0);
    scores.set_score(1, 0.9);
    scores.set_score(2, 0.05);
    database.languages.finish_identification(&mut scores, 2, 0.1);
    assert!(scores.num_languages() <= 2);
    assert!(scores.sorted());
}

#[test]
fn test_prior_smoothing() {
    let mut prior = PriorScores::default();
    let mut current = LanguageScores::new(2);
    current.set_score(0, 4.0);
    current.set_score(1, 0.0);
    prior.smooth(&mut current, 40);
    let first = current.score(0);
    assert!(first > 0.0);

    // the prior now remembers language 0; a weak new vector leans toward it
    let mut next = LanguageScores::new(2);
    next.set_score(0, 0.0);
    next.set_score(1, 0.05);
    prior.smooth(&mut next, 4);
    assert!(next.score(0) > 0.0, "prior evidence must carry over");

    prior.decay();
    prior.add_unambiguity_bonus(0);
    let mut last = LanguageScores::new(2);
    prior.smooth(&mut last, 10);
    assert!(last.score(0) > 0.0);
}

#[test]
fn test_lambda_combine() {
    let mut current = LanguageScores::new(2);
    current.set_score(0, 2.0);
    current.set_score(1, 0.001); // below the noise floor
    let mut prior = LanguageScores::new(2);
    prior.set_score(0, 1.0);
    prior.set_score(1, 1.0);
    current.lambda_combine_with_prior(&mut prior, 0.75, 0.1);
    assert!((current.score(0) - (0.75 * 2.0 + 0.25 * 1.0)).abs() < 1e-9);
    assert!((current.score(1) - 0.25075).abs() < 1e-9);
    // the prior absorbed a fraction of the real evidence only
    assert!((prior.score(0) - 1.2).abs() < 1e-9);
    assert!((prior.score(1) - 1.0).abs() < 1e-9);
}
