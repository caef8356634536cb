#![allow(dead_code)]

use cached::proc_macro::cached;
use cached::SizedCache;
use icu_normalizer::DecomposingNormalizer;
use icu_properties::{maps, GeneralCategory};
use once_cell::sync::Lazy;
use std::io::{self, Write};

// Codepoint and byte-order primitives shared by the decoders, the packed
// trie, and the output writers.

pub(crate) fn load_le32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub(crate) fn store_le32(value: u32, bytes: &mut [u8]) {
    bytes[..4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn load_be32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub(crate) fn store_be32(value: u32, bytes: &mut [u8]) {
    bytes[..4].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn load_le16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// Encode a single codepoint as UTF-8 into `out`, returning the number of
/// bytes written. Invalid scalar values are written as U+FFFD.
pub(crate) fn utf8_encode(codepoint: u32, out: &mut [u8; 4]) -> usize {
    let ch = char::from_u32(codepoint).unwrap_or('\u{FFFD}');
    ch.encode_utf8(out).len()
}

/// Structural decode of one UTF-8 character at the start of `bytes`.
/// Returns the codepoint and consumed length, or None when the prefix is
/// not well-formed. This is the raw scan used by the detection heuristics;
/// printability filtering happens in the decoder.
pub(crate) fn utf8_next(bytes: &[u8]) -> Option<(u32, usize)> {
    let first = *bytes.first()?;
    let (len, mut cp) = match first {
        0x00..=0x7F => return Some((first as u32, 1)),
        0xC0..=0xDF => (2, (first & 0x1F) as u32),
        0xE0..=0xEF => (3, (first & 0x0F) as u32),
        0xF0..=0xF4 => (4, (first & 0x07) as u32),
        _ => return None,
    };
    if bytes.len() < len {
        return None;
    }
    for &b in &bytes[1..len] {
        if !(0x80..=0xBF).contains(&b) {
            return None;
        }
        cp = (cp << 6) | (b & 0x3F) as u32;
    }
    Some((cp, len))
}

/// Write one codepoint as UTF-16 in the requested byte order, splitting
/// values above U+FFFF into a surrogate pair.
pub(crate) fn write_utf16(
    out: &mut dyn Write,
    codepoint: u32,
    big_endian: bool,
) -> io::Result<()> {
    if codepoint > 0xFFFF {
        write_utf16(out, 0xD800 + ((codepoint - 0x10000) >> 10), big_endian)?;
        write_utf16(out, 0xDC00 + ((codepoint - 0x10000) & 0x3FF), big_endian)?;
        return Ok(());
    }
    let unit = codepoint as u16;
    let bytes = if big_endian {
        unit.to_be_bytes()
    } else {
        unit.to_le_bytes()
    };
    out.write_all(&bytes)
}

// Unicode classification. The decoders consult these for every extracted
// codepoint, so the per-character results are cached the same way the
// category predicates were in the detection code this grew out of.

#[cached(
    ty = "SizedCache<u32, bool>",
    create = "{ SizedCache::with_size(8192) }",
    convert = r#"{ codepoint }"#
)]
pub(crate) fn is_printable_codepoint(codepoint: u32) -> bool {
    if codepoint == 0x09 {
        return true;
    }
    if codepoint < 0x20 || (0x7F..0xA0).contains(&codepoint) {
        return false;
    }
    !matches!(
        maps::general_category().get32(codepoint),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

/// Alphanumeric test for decoders whose codepoints are real Unicode scalar
/// values. ASCII resolves locally, the Latin-1 letter block is accepted
/// wholesale, everything else asks the category data.
#[cached(
    ty = "SizedCache<u32, bool>",
    create = "{ SizedCache::with_size(8192) }",
    convert = r#"{ codepoint }"#
)]
pub(crate) fn unicode_alphanumeric(codepoint: u32) -> bool {
    if codepoint < 0x80 {
        return (codepoint as u8 as char).is_ascii_alphanumeric();
    }
    if (192..=255).contains(&codepoint) {
        return true;
    }
    if codepoint < 192 {
        return false;
    }
    matches!(
        maps::general_category().get32(codepoint),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

static NFD: Lazy<DecomposingNormalizer> = Lazy::new(DecomposingNormalizer::new_nfd);

/// Strip combining marks from a character by canonical decomposition,
/// keeping the base character.
pub(crate) fn remove_accent(ch: char) -> char {
    let mut buf = [0u8; 4];
    NFD.normalize(ch.encode_utf8(&mut buf))
        .chars()
        .next()
        .unwrap_or(ch)
}

/// Does this codepoint have an ASCII rendering once its marks are removed?
#[cached(
    ty = "SizedCache<u32, bool>",
    create = "{ SizedCache::with_size(8192) }",
    convert = r#"{ codepoint }"#
)]
pub(crate) fn romanizable_codepoint(codepoint: u32) -> bool {
    match char::from_u32(codepoint) {
        Some(ch) if !ch.is_ascii() => remove_accent(ch).is_ascii_alphanumeric(),
        _ => false,
    }
}
