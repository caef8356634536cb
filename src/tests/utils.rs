use crate::utils::{
    is_printable_codepoint, load_be32, load_le16, load_le32, remove_accent, romanizable_codepoint,
    store_be32, store_le32, unicode_alphanumeric, utf8_encode, utf8_next, write_utf16,
};

#[test]
fn test_endian_primitives() {
    let mut buf = [0u8; 8];
    store_le32(0x1234_5678, &mut buf);
    assert_eq!(buf[..4], [0x78, 0x56, 0x34, 0x12]);
    assert_eq!(load_le32(&buf), 0x1234_5678);
    store_be32(0x1234_5678, &mut buf);
    assert_eq!(buf[..4], [0x12, 0x34, 0x56, 0x78]);
    assert_eq!(load_be32(&buf), 0x1234_5678);
    assert_eq!(load_le16(&[0xFE, 0xFF]), 0xFFFE);
}

#[test]
fn test_utf8_roundtrip() {
    for &cp in &[0x41u32, 0xE9, 0x39A, 0x4E2D, 0x1F600] {
        let mut buf = [0u8; 4];
        let len = utf8_encode(cp, &mut buf);
        let (decoded, consumed) = utf8_next(&buf[..len]).unwrap();
        assert_eq!(decoded, cp);
        assert_eq!(consumed, len);
    }
    // malformed continuation
    assert!(utf8_next(&[0xC3, 0x41]).is_none());
    assert!(utf8_next(&[0xE0]).is_none());
    assert!(utf8_next(&[0x80]).is_none());
}

#[test]
fn test_write_utf16_surrogates() {
    let mut out = Vec::new();
    write_utf16(&mut out, 0x41, false).unwrap();
    assert_eq!(out, [0x41, 0x00]);
    out.clear();
    write_utf16(&mut out, 0x1F600, true).unwrap();
    // U+1F600 = D83D DE00
    assert_eq!(out, [0xD8, 0x3D, 0xDE, 0x00]);
    out.clear();
    write_utf16(&mut out, 0x1F600, false).unwrap();
    assert_eq!(out, [0x3D, 0xD8, 0x00, 0xDE]);
}

#[test]
fn test_printability() {
    assert!(is_printable_codepoint(b'A' as u32));
    assert!(is_printable_codepoint(0x09)); // tab is whitelisted
    assert!(is_printable_codepoint(0x39A)); // greek capital kappa
    assert!(is_printable_codepoint(0x4E2D)); // CJK
    assert!(!is_printable_codepoint(0x00));
    assert!(!is_printable_codepoint(0x0A));
    assert!(!is_printable_codepoint(0x7F));
    assert!(!is_printable_codepoint(0xFEFF)); // BOM / zero-width no-break
    assert!(!is_printable_codepoint(0xD800)); // surrogate
    assert!(!is_printable_codepoint(0xE000)); // private use
}

#[test]
fn test_unicode_alphanumeric() {
    assert!(unicode_alphanumeric(b'q' as u32));
    assert!(unicode_alphanumeric(b'7' as u32));
    assert!(!unicode_alphanumeric(b' ' as u32));
    // the whole Latin-1 letter block is accepted wholesale
    assert!(unicode_alphanumeric(0xC0));
    assert!(unicode_alphanumeric(0xF7));
    assert!(!unicode_alphanumeric(0xA9)); // copyright sign
    assert!(unicode_alphanumeric(0x39B)); // greek lambda
    assert!(unicode_alphanumeric(0x4E00)); // CJK ideograph
    assert!(!unicode_alphanumeric(0x2014)); // em dash
}

#[test]
fn test_remove_accent() {
    assert_eq!(remove_accent('é'), 'e');
    assert_eq!(remove_accent('Ü'), 'U');
    assert_eq!(remove_accent('x'), 'x');
    assert_eq!(remove_accent('中'), '中');
}

#[test]
fn test_romanizable_codepoint() {
    assert!(romanizable_codepoint('é' as u32));
    assert!(romanizable_codepoint('Å' as u32));
    assert!(!romanizable_codepoint('e' as u32)); // already ASCII
    assert!(!romanizable_codepoint(0x4E2D)); // no decomposition
}
