use super::model::{build_database, load_test_database, ngrams_of, write_temp_db, TestLang};
use super::XorShift;
use crate::trie::{
    map_record_value, value_map, PackedTrieFreq, WordTrie, NULL_INDEX, PTRIE_ROOT_INDEX,
    TERMINAL_MASK, VALUE_SHIFT,
};

#[test]
fn test_quantization_monotone() {
    let mut rng = XorShift::new(42);
    let mut values: Vec<u32> = (0..500).map(|_| rng.next() as u32).collect();
    values.extend([0, 1, 2, 3, 0xFFFF, 0x10000, u32::MAX - 1, u32::MAX]);
    values.sort_unstable();
    let mut last = 0u32;
    for &freq in &values {
        let record = PackedTrieFreq::new(freq, 0, true, false);
        let scaled = record.scaled_score();
        assert!(
            scaled >= last,
            "quantization not monotone at freq {freq}: {scaled} < {last}"
        );
        last = scaled;
    }
}

#[test]
fn test_quantization_preserves_magnitude() {
    // two bits of exponent give full mantissa precision only to counts in
    // the upper part of the scale, which is where real n-gram shares live
    for &freq in &[1u32 << 26, 1 << 28, 500_000_000, 2_000_000_000, 4_000_000_000] {
        let record = PackedTrieFreq::new(freq, 7, true, false);
        let scaled = record.scaled_score() as f64;
        let ratio = scaled / freq as f64;
        assert!(
            (0.999..=1.001).contains(&ratio),
            "freq {freq} quantized to {scaled}"
        );
        assert_eq!(record.language_id(), 7);
        assert!(record.is_last());
        assert!(!record.is_stopgram());
    }
    // tiny values keep their low mantissa bit rather than vanishing
    let tiny = PackedTrieFreq::new(1, 0, true, false);
    assert!(tiny.scaled_score() > 0);
}

#[test]
fn test_value_map_round_trip() {
    let values = value_map();
    let mut rng = XorShift::new(7);
    for _ in 0..500 {
        let freq = rng.next() as u32;
        let lang = (rng.next() % 100) as u32;
        let stop = rng.next() % 2 == 0;
        let record = PackedTrieFreq::new(freq, lang, true, stop);
        let index = (record.0 >> VALUE_SHIFT) as usize & ((1 << 18) - 1);
        let direct = map_record_value(index);
        assert_eq!(record.mapped_score(&values), direct);
        if stop && freq > 0 {
            assert!(record.mapped_score(&values) < 0.0, "stopgram must be negative");
        } else if freq > 0 {
            assert!(record.mapped_score(&values) > 0.0);
        }
    }
}

#[test]
fn test_extend_key_walk() {
    let langs = [TestLang::new("xx", "ASCII")];
    let ngrams = vec![
        (b"abc".to_vec(), vec![(0u32, 1_000_000u32, false)]),
        (b"abd".to_vec(), vec![(0, 2_000_000, false)]),
        (b"abcde".to_vec(), vec![(0, 3_000_000, false)]),
        (b"xyz".to_vec(), vec![(0, 4_000_000, false)]),
    ];
    let database = load_test_database(&langs, &ngrams, "walk");
    let trie = database.languages.trie();

    // extension along a stored key is non-null until the key ends
    let mut index = PTRIE_ROOT_INDEX;
    for &byte in b"abcde" {
        index = trie.extend_key(byte, index);
        assert_ne!(index, NULL_INDEX);
    }
    // the end of "abcde" is a terminal; extending it stays null
    assert_ne!(index & TERMINAL_MASK, 0);
    assert_eq!(trie.extend_key(b'f', index), NULL_INDEX);
    assert_eq!(trie.extend_key(b'f', NULL_INDEX), NULL_INDEX);

    // absent prefixes fail at the first bad byte
    let mut index = PTRIE_ROOT_INDEX;
    index = trie.extend_key(b'a', index);
    assert_ne!(index, NULL_INDEX);
    assert_eq!(trie.extend_key(b'q', index), NULL_INDEX);

    // leaves carry their frequency runs, last-flagged at the end
    let node = trie.find_node(b"abc").unwrap();
    assert!(node.leaf());
    let records: Vec<_> = trie.frequencies(node).collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_last());
    // interior non-leaf nodes have no frequencies
    let node = trie.find_node(b"ab").unwrap();
    assert!(!node.leaf());
    assert_eq!(trie.frequencies(node).count(), 0);
    assert_eq!(trie.longest_key(), 5);
}

#[test]
fn test_enumerate_order() {
    let langs = [TestLang::new("xx", "ASCII")];
    let keys: Vec<&[u8]> = vec![b"abc", b"abd", b"bcd", b"zzz"];
    let ngrams: Vec<_> = keys
        .iter()
        .map(|k| (k.to_vec(), vec![(0u32, 1_000_000u32, false)]))
        .collect();
    let database = load_test_database(&langs, &ngrams, "enumerate");
    let mut seen = Vec::new();
    database.languages.trie().enumerate(|key, node| {
        if node.leaf() {
            seen.push(key.to_vec());
        }
    });
    let expected: Vec<Vec<u8>> = keys.iter().map(|k| k.to_vec()).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_bad_model_files() {
    use crate::langid::LanguageIdentifier;

    let langs = [TestLang::new("xx", "ASCII")];
    let good = build_database(&langs, &ngrams_of(b"hello world", &[3, 4], 0, 1_000_000));

    // signature damage
    let mut bad = good.clone();
    bad[0] ^= 0xFF;
    let path = write_temp_db(&bad, "badsig");
    assert!(LanguageIdentifier::load(&path).is_err());

    // version outside the accepted window
    let mut bad = good.clone();
    bad[38] = 99;
    let path = write_temp_db(&bad, "badver");
    assert!(LanguageIdentifier::load(&path).is_err());

    // truncated trie payload
    let bad = good[..good.len() - 32].to_vec();
    let path = write_temp_db(&bad, "trunc");
    assert!(LanguageIdentifier::load(&path).is_err());

    let path = write_temp_db(&good, "good");
    assert!(LanguageIdentifier::load(&path).is_ok());
}

#[test]
fn test_word_trie() {
    let mut trie = WordTrie::new();
    trie.insert(b"the");
    trie.insert(b"them");
    trie.insert(b"quick");
    let mut cursor = trie.cursor();
    for &b in b"the" {
        cursor.extend(b);
    }
    assert!(cursor.matched());
    assert_eq!(cursor.key_length(), 3);
    cursor.extend(b'm');
    assert!(cursor.matched());
    cursor.extend(b'x');
    assert!(!cursor.matched());
    cursor.reset();
    for &b in b"quic" {
        cursor.extend(b);
    }
    // prefix of a word is not a match
    assert!(!cursor.matched());
}

#[test]
fn test_word_trie_from_file() {
    let path = write_temp_db(b"# comment\nthe\nquick\n\nfox\r\n", "wordlist");
    let trie = WordTrie::from_wordlist(&path).unwrap();
    let mut cursor = trie.cursor();
    for &b in b"fox" {
        cursor.extend(b);
    }
    assert!(cursor.matched());
    cursor.reset();
    cursor.extend(b'#');
    assert!(!cursor.matched());
}
