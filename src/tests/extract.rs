use super::model::{load_test_database, ngrams_of, Ngram, TestLang};
use crate::enc::Decoder;
use crate::entity::{ExtractSettings, ExtractSummary, StringHit};
use crate::extract::{
    buffer_contains_ascii16, buffer_contains_utf8, Extractor, InputStream, MemoryStream,
};
use crate::extract_from_bytes;
use crate::langid::LanguageDatabase;

const FREQ: u32 = 2_000_000_000;

#[derive(Default)]
struct Hits {
    items: Vec<(Vec<u8>, u64, &'static str, f64, Option<u32>)>,
    stop_after: Option<usize>,
}

impl Hits {
    fn collect(
        &mut self,
    ) -> impl FnMut(&StringHit<'_>) -> bool + '_ {
        move |hit: &StringHit<'_>| {
            self.items.push((
                hit.bytes.to_vec(),
                hit.offset,
                hit.decoder.name(),
                hit.confidence,
                hit.scores.map(|s| s.top_language()),
            ));
            match self.stop_after {
                Some(limit) => self.items.len() < limit,
                None => true,
            }
        }
    }
}

fn run_auto(data: &[u8], settings: ExtractSettings, database: Option<&LanguageDatabase>) -> Hits {
    let mut hits = Hits::default();
    let mut extractor = Extractor::new(settings);
    if let Some(database) = database {
        extractor = extractor.with_database(database);
    }
    let mut stream = MemoryStream::new(data);
    let mut sink = hits.collect();
    extractor.extract(&mut stream, &mut sink).unwrap();
    drop(sink);
    hits
}

/////////////////////////////////////////////////////////////////////////////////////
// Heuristics
/////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_ascii16_heuristic() {
    let mut padded = Vec::new();
    while padded.len() < 384 {
        for &b in b"Hello World" {
            padded.push(b);
            padded.push(0);
        }
    }
    assert!(buffer_contains_ascii16(&padded));
    assert!(!buffer_contains_ascii16(&vec![0u8; 384]));
    assert!(!buffer_contains_ascii16(b"plain ascii text, no padding"));
}

#[test]
fn test_utf8_heuristic() {
    let greek = "Καλημέρα κόσμε ".repeat(8);
    assert!(buffer_contains_utf8(greek.as_bytes()));
    assert!(!buffer_contains_utf8(b"short ascii"));
    assert!(!buffer_contains_utf8(&[0xFFu8; 256]));
}

/////////////////////////////////////////////////////////////////////////////////////
// End-to-end scenarios
/////////////////////////////////////////////////////////////////////////////////////

// Plain ASCII text: exactly one string, equal to the input without its
// terminating newline, extracted by the ASCII decoder.
#[test]
fn test_scenario_plain_ascii() {
    let data = b"The quick brown fox jumps over the lazy dog.\n";
    let hits = run_auto(data, ExtractSettings::default(), None);
    assert_eq!(hits.items.len(), 1);
    let (bytes, offset, decoder, confidence, _) = &hits.items[0];
    assert_eq!(bytes.as_slice(), &data[..data.len() - 1]);
    assert_eq!(*offset, 0);
    assert_eq!(*decoder, "ASCII");
    assert!(*confidence > 0.1);
}

// A UTF-16LE payload behind a BOM: the BOM is never part of the string,
// and the whole 22-byte payload comes out under the UTF-16LE decoder.
#[test]
fn test_scenario_utf16_bom() {
    let text = "héllo world";
    let mut payload = Vec::new();
    for unit in text.encode_utf16() {
        payload.extend_from_slice(&unit.to_le_bytes());
    }
    let langs = [TestLang::new("en", "UTF-16LE").aligned(2)];
    let ngrams: Vec<Ngram> = (0..payload.len() - 5)
        .step_by(2)
        .map(|n| (payload[n..n + 6].to_vec(), vec![(0u32, FREQ, false)]))
        .collect();
    let database = load_test_database(&langs, &ngrams, "s2");

    let mut data = vec![0xFF, 0xFE];
    data.extend_from_slice(&payload);
    data.extend_from_slice(&[0u8; 16]);

    let settings = ExtractSettings {
        identify_language: true,
        ..ExtractSettings::default()
    };
    let hits = run_auto(&data, settings, Some(&database));
    assert_eq!(hits.items.len(), 1);
    let (bytes, offset, decoder, _, top) = &hits.items[0];
    assert_eq!(*decoder, "UTF-16LE");
    assert_eq!(*offset, 2);
    assert_eq!(bytes.len(), 22);
    assert_eq!(bytes.as_slice(), payload.as_slice());
    assert_eq!(*top, Some(0));
}

// Five UTF-8 Greek words separated by NULs: five separate strings, none
// containing a NUL, all identified as Greek.
#[test]
fn test_scenario_greek_utf8() {
    let word = "Καλημέρα";
    let langs = [TestLang::new("el=Greek", "UTF-8")];
    let ngrams = ngrams_of(word.as_bytes(), &[3, 4], 0, FREQ);
    let database = load_test_database(&langs, &ngrams, "s3");

    let mut data = Vec::new();
    for _ in 0..5 {
        data.extend_from_slice(word.as_bytes());
        data.push(0);
    }

    let settings = ExtractSettings {
        identify_language: true,
        max_gap: 1,
        ..ExtractSettings::default()
    };
    let hits = run_auto(&data, settings, Some(&database));
    assert_eq!(hits.items.len(), 5);
    for (bytes, _, decoder, _, top) in &hits.items {
        assert_eq!(bytes.as_slice(), word.as_bytes());
        assert!(!bytes.contains(&0));
        assert_eq!(*decoder, "UTF-8");
        assert_eq!(*top, Some(0));
    }
}

// A block of one repeated 16-bit unit is skipped wholesale.
#[test]
fn test_scenario_repeated_units_skipped() {
    let data: Vec<u8> = std::iter::repeat([0xAA, 0x55])
        .take(32)
        .flatten()
        .collect();
    let hits = run_auto(&data, ExtractSettings::default(), None);
    assert!(hits.items.is_empty());
}

// Big5 text after filler spaces: one Chinese string via the Big5 decoder.
#[test]
fn test_scenario_big5() {
    let mut payload = Vec::new();
    for n in 0..20u8 {
        payload.push(0xA4 + (n % 8));
        payload.push(0x40 + n);
    }
    let langs = [TestLang::new("zh=Chinese", "Big5")];
    let ngrams = ngrams_of(&payload, &[3, 4], 0, FREQ);
    let database = load_test_database(&langs, &ngrams, "s5");

    let mut data = vec![b' '; 5];
    data.extend_from_slice(&payload);
    data.extend_from_slice(&[0, 0]);

    let settings = ExtractSettings {
        identify_language: true,
        ..ExtractSettings::default()
    };
    let hits = run_auto(&data, settings, Some(&database));
    assert_eq!(hits.items.len(), 1);
    let (bytes, _, decoder, _, top) = &hits.items[0];
    assert_eq!(*decoder, "Big5");
    assert!(bytes.ends_with(&payload));
    assert!(!bytes.contains(&0));
    assert_eq!(*top, Some(0));
}

// Two stray EUC pairs inside punctuation soup: the run fails the
// alphanumeric filter and nothing is emitted.
#[test]
fn test_scenario_euc_false_positive() {
    let mut data = vec![0x01u8; 40];
    data.extend_from_slice(b"(($$%%&&");
    data.extend_from_slice(&[0xA4, 0xA2, 0xB0, 0xA1]);
    data.extend_from_slice(b"))==##!!");
    data.extend(vec![0x02u8; 40]);

    let euc = Decoder::by_name("EUC", false).unwrap();
    let ascii = Decoder::by_name("ASCII", false).unwrap();
    let mut hits = Hits::default();
    let mut extractor =
        Extractor::new(ExtractSettings::default()).with_decoders(vec![euc, ascii]);
    let mut stream = MemoryStream::new(&data);
    let mut sink = hits.collect();
    extractor.extract(&mut stream, &mut sink).unwrap();
    drop(sink);
    assert!(hits.items.is_empty());
}

/////////////////////////////////////////////////////////////////////////////////////
// Loop behaviors
/////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_offsets_strictly_increasing() {
    let mut data = Vec::new();
    for n in 0..6 {
        data.extend(vec![0x01u8; 3 + n]);
        data.extend_from_slice(format!("marker string {n}").as_bytes());
    }
    data.extend(vec![0x01u8; 5]);
    let hits = run_auto(&data, ExtractSettings::default(), None);
    assert_eq!(hits.items.len(), 6);
    let mut last = None;
    for (bytes, offset, _, _, _) in &hits.items {
        if let Some(last) = last {
            assert!(*offset > last, "offsets must strictly increase");
        }
        // each hit's bytes are exactly what the input holds there
        let start = *offset as usize;
        assert_eq!(&data[start..start + bytes.len()], bytes.as_slice());
        last = Some(*offset);
    }
}

#[test]
fn test_sink_can_stop_extraction() {
    let data = b"first string\x00\x00second string\x00\x00third string";
    let mut hits = Hits {
        stop_after: Some(1),
        ..Hits::default()
    };
    let mut extractor = Extractor::new(ExtractSettings::default());
    let mut stream = MemoryStream::new(data);
    let mut sink = hits.collect();
    let summary = extractor.extract(&mut stream, &mut sink).unwrap();
    drop(sink);
    assert_eq!(hits.items.len(), 1);
    assert_eq!(summary.strings_emitted, 1);
}

#[test]
fn test_min_length_filter() {
    let data = b"ab\x00abcdefgh\x00xy";
    let settings = ExtractSettings {
        min_string_length: 4,
        ..ExtractSettings::default()
    };
    let hits = run_auto(data, settings, None);
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].0.as_slice(), b"abcdefgh");
}

#[test]
fn test_gap_limit_truncates_runs() {
    // the '#' run is undesired once a desired set is in play; a tight gap
    // limit cuts the string there instead of swallowing the junk
    let data = b"goodtext####################moretext\x00";
    let tight = ExtractSettings {
        max_gap: 4,
        desired: crate::entity::CodePoints::from_spec("0x61-0x7A"),
        min_desired_fraction: 0.0,
        ..ExtractSettings::default()
    };
    let hits = run_auto(data, tight, None);
    assert!(!hits.items.is_empty());
    assert_eq!(hits.items[0].0.as_slice(), b"goodtext");

    let loose = ExtractSettings::default();
    let hits = run_auto(data, loose, None);
    // without a desired set the whole run stays one string
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].0.as_slice(), b"goodtext####################moretext");
}

#[test]
fn test_byte_range_restriction() {
    let data = b"AAAA before\x00target string here\x00after ZZZZ";
    let start = data.iter().position(|&b| b == 0).unwrap() as u64 + 1;
    let end = data.iter().rposition(|&b| b == 0).unwrap() as u64;
    let settings = ExtractSettings {
        start_offset: start,
        end_offset: end,
        ..ExtractSettings::default()
    };
    let mut hits = Vec::new();
    let mut sink = |hit: &StringHit<'_>| {
        hits.push((hit.offset, hit.bytes.to_vec()));
        true
    };
    extract_from_bytes(data, Some(settings), &mut sink).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, start);
    assert_eq!(hits[0].1.as_slice(), b"target string here");
}

#[test]
fn test_explicit_encoding_list() {
    let data = b"caf\xE9 au lait\x00\x01\x02";
    let latin1 = Decoder::by_name("Latin-1", false).unwrap();
    let mut hits = Hits::default();
    let mut extractor =
        Extractor::new(ExtractSettings::default()).with_decoders(vec![latin1]);
    let mut stream = MemoryStream::new(data);
    let mut sink = hits.collect();
    extractor.extract(&mut stream, &mut sink).unwrap();
    drop(sink);
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].0.as_slice(), b"caf\xE9 au lait");
    assert_eq!(hits.items[0].2, "Latin-1");
}

#[test]
fn test_newlines_allowed_spans_lines() {
    let data = b"line one\nline two\x00";
    let split = run_auto(data, ExtractSettings::default(), None);
    assert_eq!(split.items.len(), 2);
    let joined = run_auto(
        data,
        ExtractSettings {
            newlines_allowed: true,
            ..ExtractSettings::default()
        },
        None,
    );
    assert_eq!(joined.items.len(), 1);
    assert_eq!(joined.items[0].0.as_slice(), b"line one\nline two");
}

#[test]
fn test_memory_stream_contract() {
    let data = b"0123456789";
    let mut stream = MemoryStream::with_offset(data, 4);
    assert_eq!(stream.current_offset(), 4);
    let mut buf = [0u8; 4];
    assert_eq!(stream.get(4, &mut buf).unwrap(), 4);
    assert_eq!(&buf, b"4567");
    assert!(!stream.end_of_data());
    assert_eq!(stream.get(10, &mut buf).unwrap(), 2);
    assert!(stream.end_of_data());
}

#[test]
fn test_summary_counts() {
    let data = b"alpha string\x00\x01beta string\x00";
    let ExtractSummary {
        strings_emitted,
        bytes_scanned,
        ..
    } = {
        let mut extractor = Extractor::new(ExtractSettings::default());
        let mut stream = MemoryStream::new(data);
        let mut sink = |_: &StringHit<'_>| true;
        extractor.extract(&mut stream, &mut sink).unwrap()
    };
    assert_eq!(strings_emitted, 2);
    assert!(bytes_scanned >= data.len() as u64 - 1);
}
