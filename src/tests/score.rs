use crate::enc::Decoder;
use crate::entity::{CodePoints, EscapeState};
use crate::langid::LanguageScores;
use crate::score::StringScore;

fn feed(score: &mut StringScore, decoder: &Decoder, text: &[u8], desired: Option<&CodePoints>) {
    let mut escape = EscapeState::None;
    let mut pos = 0;
    while pos < text.len() {
        let (cp, size) = decoder.next(&text[pos..], &mut escape).unwrap();
        score.update(decoder, desired, cp, size);
        pos += size;
    }
}

#[test]
fn test_alpha_accounting() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let mut score = StringScore::new();
    feed(&mut score, &ascii, b"word1 ok!", None);
    score.finalize();
    assert_eq!(score.total_chars(), 9);
    // "word1" + "ok" are alphanumeric, space and '!' are not
    assert!((score.alpha_fraction() - 7.0 / 9.0).abs() < 1e-9);
    assert!((score.desired_fraction() - 1.0).abs() < 1e-9);
}

#[test]
fn test_long_runs_beat_chopped_text() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let mut words = StringScore::new();
    feed(&mut words, &ascii, b"steady prose with words", None);
    words.finalize();
    let mut choppy = StringScore::new();
    feed(&mut choppy, &ascii, b"a!b#c$d%e&f(g)h=i?j+k~l", None);
    choppy.finalize();
    assert!(words.compute_score() > choppy.compute_score());
    assert!(choppy.compute_score() < 10.0);
}

#[test]
fn test_desired_codepoints_tracked() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    // only digits are desired
    let digits = CodePoints::from_spec("0x30-0x39").unwrap();
    let mut score = StringScore::new();
    feed(&mut score, &ascii, b"abc 123", Some(&digits));
    score.finalize();
    // the space counts toward runs but not toward the desired total
    assert!((score.desired_fraction() - 3.0 / 7.0).abs() < 1e-9);
    assert_eq!(score.undesired_run(), 0); // flushed by finalize
}

#[test]
fn test_gap_tracking() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let digits = CodePoints::from_spec("0x30-0x39").unwrap();
    let mut score = StringScore::new();
    let mut escape = EscapeState::None;
    for &b in b"12???" {
        let (cp, size) = ascii.next(&[b], &mut escape).unwrap();
        score.update(&ascii, Some(&digits), cp, size);
    }
    assert_eq!(score.undesired_run(), 3);
}

#[test]
fn test_word_coverage_raises_score() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let text = b"the quick brown fox";
    let mut with_dict = StringScore::new();
    with_dict.have_dictionary();
    feed(&mut with_dict, &ascii, text, None);
    // pretend the dictionary matched every word
    for word in [3, 5, 5, 3] {
        with_dict.add_word(word);
    }
    with_dict.finalize();
    let mut without_cover = StringScore::new();
    without_cover.have_dictionary();
    feed(&mut without_cover, &ascii, text, None);
    without_cover.finalize();
    assert!(with_dict.compute_score() > without_cover.compute_score());
}

#[test]
fn test_language_score_blend_and_cap() {
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let mut score = StringScore::new();
    feed(&mut score, &ascii, b"plain ascii text here", None);
    score.finalize();
    let structural = score.compute_score();

    let mut scores = LanguageScores::new(1);
    scores.set_score(0, 5.0);
    score.set_language_score(&scores);
    let blended = score.compute_score();
    assert!((blended - (structural + 40.0) / 2.0).abs() < 1e-9);

    // an absurd language score pins the result at the cap
    scores.set_score(0, 1e6);
    score.set_language_score(&scores);
    assert!((score.compute_score() - 99.999).abs() < 1e-9);
}

#[test]
fn test_empty_run_scores_zero() {
    let score = StringScore::new();
    assert_eq!(score.compute_score(), 0.0);
}
