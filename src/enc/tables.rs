//! Per-family code-table constructors and alphanumeric predicates.
//!
//! Every decoder owns a 256-entry table where entry `i` describes a
//! character whose first byte is `i`: total byte length (0 = invalid first
//! byte) and the inclusive range its continuation bytes must fall in. The
//! constructors here fill those tables; the predicates classify the
//! codepoints the decoders produce.

use super::{CharacterCode, CodeTable};
use crate::utils::unicode_alphanumeric;

#[inline]
fn is_print_ascii(byte: usize) -> bool {
    (0x20..=0x7E).contains(&byte)
}

/// Mark tab and the printable ASCII characters as single-byte.
pub(super) fn init_ascii(codes: &mut CodeTable) {
    for i in 0..128 {
        if is_print_ascii(i) || i == 9 {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
}

pub(super) fn table_ascii(codes: &mut CodeTable) {
    init_ascii(codes);
}

/// ASCII plus the printable high Latin-1 range. 0xFF is left out since it
/// is too frequent in binary files.
pub(super) fn table_latin1(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA0..=0xFE {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_iso8859_6(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in [0xA0, 0xA4, 0xAC, 0xAD, 0xBB, 0xBF] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xC1..=0xDA {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xE0..=0xF2 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_iso8859_7(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in [
        0xA0, 0xA1, 0xA2, 0xA3, 0xA9, 0xAC, 0xAD, 0xAF, 0xB6, 0xB8, 0xB9, 0xBA, 0xBC,
    ] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xBE..=0xD1 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xD3..=0xFE {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_iso8859_8(codes: &mut CodeTable) {
    init_ascii(codes);
    codes[0xA0] = CharacterCode::new(1, 0, 0);
    for i in 0xA2..=0xBE {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xDF..=0xFA {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    codes[0xFD] = CharacterCode::new(1, 0, 0);
    codes[0xFE] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_latin7(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in [0xA1, 0xA5, 0xA8, 0xAA, 0xAF, 0xB4, 0xB5, 0xB8, 0xBA] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xBF..=0xD6 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xD8..=0xF6 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xF8..=0xFF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

/// Big-endian 16-bit ASCII: the only valid first byte is the zero high
/// byte; the low byte carries the character.
pub(super) fn table_ascii16be(codes: &mut CodeTable) {
    codes[0] = CharacterCode::new(2, 9, 255);
}

pub(super) fn table_ascii16le(codes: &mut CodeTable) {
    for i in 0..256 {
        if is_print_ascii(i) || i == 9 {
            codes[i] = CharacterCode::new(2, 0, 0);
        }
    }
}

pub(super) fn table_ascii32be(codes: &mut CodeTable) {
    codes[0] = CharacterCode::new(4, 0, 0);
}

pub(super) fn table_ascii32le(codes: &mut CodeTable) {
    for i in 0..256 {
        if is_print_ascii(i) || i == 9 {
            codes[i] = CharacterCode::new(4, 0, 0);
        }
    }
}

/// Nearly any 16-bit unit is allowable; the reversed-endian forms of
/// \n, \f and \r are excluded since they are never valid characters.
pub(super) fn table_utf16be(codes: &mut CodeTable) {
    for i in 0..256 {
        if i == 0x0A || i == 0x0C || i == 0x0D {
            codes[i] = CharacterCode::new(2, 0x01, 0xFF);
        } else {
            codes[i] = CharacterCode::new(2, 0x00, 0xFF);
        }
    }
}

pub(super) fn table_utf16le(codes: &mut CodeTable) {
    for i in 0..256 {
        codes[i] = CharacterCode::new(2, 0x00, 0xFF);
    }
}

pub(super) fn table_utf8(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xC0..0xE0 {
        codes[i] = CharacterCode::new(2, 0x80, 0xBF);
    }
    for i in 0xE0..0xF0 {
        codes[i] = CharacterCode::new(3, 0x80, 0xBF);
    }
    for i in 0xF0..=0xF4 {
        codes[i] = CharacterCode::new(4, 0x80, 0xBF);
    }
}

/// The obsolete UTF-8 definition that also permits 5- and 6-byte forms.
pub(super) fn table_utf8ext(codes: &mut CodeTable) {
    table_utf8(codes);
    for i in 0xF0..0xF8 {
        codes[i] = CharacterCode::new(4, 0x80, 0xBF);
    }
    for i in 0xF8..0xFC {
        codes[i] = CharacterCode::new(5, 0x80, 0xBF);
    }
    for i in 0xFC..0xFE {
        codes[i] = CharacterCode::new(6, 0x80, 0xBF);
    }
}

pub(super) fn table_utf32be(codes: &mut CodeTable) {
    codes[0] = CharacterCode::new(4, 0x00, 0x10);
}

pub(super) fn table_utf32le(codes: &mut CodeTable) {
    for i in 0..256 {
        codes[i] = CharacterCode::new(4, 0x00, 0xFF);
    }
}

pub(super) fn table_iso2022(codes: &mut CodeTable) {
    init_ascii(codes);
    // shift-out, shift-in, single-shift two/three
    codes[0x0E] = CharacterCode::new(1, 0, 0);
    codes[0x0F] = CharacterCode::new(1, 0, 0);
    codes[0x8E] = CharacterCode::new(1, 0, 0);
    codes[0x8F] = CharacterCode::new(1, 0, 0);
    // simple escape sequence with a one-byte final
    codes[0x1B] = CharacterCode::new(2, 0x20, 0x7E);
}

pub(super) fn table_euc(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xFE {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
}

pub(super) fn table_euc_jp(codes: &mut CodeTable) {
    init_ascii(codes);
    // 0x8E introduces half-width kana, 0x8F three-byte JIS X 0212
    codes[0x8E] = CharacterCode::new(2, 0xA1, 0xDF);
    codes[0x8F] = CharacterCode::new(3, 0xA1, 0xFE);
    for i in 0xA1..=0xFE {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
}

pub(super) fn table_euc_tw(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xFE {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
    // 0x8E introduces a four-byte form whose second byte selects the plane
    codes[0x8E] = CharacterCode::new(4, 0xA1, 0xFE);
}

pub(super) fn table_shift_jis(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x81..=0x9F {
        codes[i] = CharacterCode::new(2, 0x40, 0xFC);
    }
    for i in 0xE0..=0xEF {
        codes[i] = CharacterCode::new(2, 0x40, 0xFC);
    }
    // half-width katakana
    for i in 0xA1..=0xDF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_gb2312(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xF7 {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
}

pub(super) fn table_gbk_level1(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xA9 {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
}

pub(super) fn table_gbk_level2(codes: &mut CodeTable) {
    table_gbk_level1(codes);
    for i in 0xB0..=0xF7 {
        codes[i] = CharacterCode::new(2, 0xA1, 0xFE);
    }
}

pub(super) fn table_gbk_level3(codes: &mut CodeTable) {
    table_gbk_level2(codes);
    for i in 0x81..=0xA0 {
        codes[i] = CharacterCode::new(2, 0x40, 0xFE);
    }
}

pub(super) fn table_gbk(codes: &mut CodeTable) {
    table_gbk_level3(codes);
    for i in 0xAA..=0xFE {
        codes[i] = CharacterCode::new(2, 0x40, 0xFE);
    }
    codes[0xA8] = CharacterCode::new(2, 0x40, 0xFE);
    codes[0xA9] = CharacterCode::new(2, 0x40, 0xFE);
}

/// GB18030 widens the continuation range down to 0x30 so that the
/// digit-bearing four-byte form can share the two-byte table entries.
pub(super) fn table_gb18030(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x81..=0xFE {
        codes[i] = CharacterCode::new(2, 0x30, 0xFE);
    }
}

pub(super) fn table_big5(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xF9 {
        codes[i] = CharacterCode::new(2, 0x40, 0xFE);
    }
}

pub(super) fn table_big5ext(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x81..=0xFE {
        codes[i] = CharacterCode::new(2, 0x40, 0xFE);
    }
}

pub(super) fn table_iso6937(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA0..=0xBF {
        if i != 0xA4 && i != 0xA6 {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
    // non-spacing diacritical prefixes combine with a following letter
    for i in 0xC1..=0xCF {
        if i != 0xC9 && i != 0xCC {
            codes[i] = CharacterCode::new(2, 0x41, 0x7A);
        }
    }
    for i in 0xD0..=0xFE {
        if (i < 0xD8 || i > 0xDC) && i != 0xE5 {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
}

pub(super) fn table_koi8r(codes: &mut CodeTable) {
    init_ascii(codes);
    codes[0xA3] = CharacterCode::new(1, 0, 0);
    codes[0xB3] = CharacterCode::new(1, 0, 0);
    // Cyrillic letters in pseudo-roman order; 0xFF left out to reduce
    // false positives on binary files
    for i in 0xC0..0xFF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_koi8u(codes: &mut CodeTable) {
    table_koi8r(codes);
    for i in [0xA4, 0xB4, 0xA6, 0xB6, 0xA7, 0xB7, 0xAD, 0xBD] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

/// CP437 and friends: the pure graphics characters at 0xB0-0xDF and the
/// math symbols at 0xEF-0xFE are excluded to avoid false positives.
pub(super) fn table_cp437(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..0xB0 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xE0..0xEF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    codes[0xFF] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_cp737(codes: &mut CodeTable) {
    table_cp437(codes);
    for i in [0xEF, 0xF0, 0xF4, 0xF5, 0xFF] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_cp866(codes: &mut CodeTable) {
    table_cp437(codes);
    for i in 0xEF..0xF8 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_ruscii(codes: &mut CodeTable) {
    table_cp866(codes);
    codes[0xF8] = CharacterCode::new(1, 0, 0);
    codes[0xF9] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_mik(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..0xB0 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xE0..0xEF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    codes[0xFF] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_iransystem(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..0xB0 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xE0..=0xFF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_cp1251(codes: &mut CodeTable) {
    table_koi8r(codes);
    for i in 0x80..0xC0 {
        if CP1251_ALPHANUM[i - 0x80] {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
    codes[0x97] = CharacterCode::new(1, 0, 0);
    codes[0xFF] = CharacterCode::new(1, 0, 0);
}

/// CP1252 adds letters in the C1 area on top of Latin-1; only the eight
/// alphabetic ones are accepted to reduce false positives.
pub(super) fn table_cp1252(codes: &mut CodeTable) {
    table_latin1(codes);
    for i in [0x83, 0x8A, 0x8C, 0x8E, 0x9A, 0x9C, 0x9E, 0x9F] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_cp1255(codes: &mut CodeTable) {
    table_iso8859_8(codes);
    for i in 0xC0..=0xD8 {
        if i != 0xCA {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
}

pub(super) fn table_cp1256(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..=0xFF {
        if CP1256_ALPHANUM[i - 0x80] {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
    // LTR and RTL markers
    codes[0xFD] = CharacterCode::new(1, 0, 0);
    codes[0xFE] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_armscii8(codes: &mut CodeTable) {
    table_latin1(codes);
    codes[0xFF] = CharacterCode::new(1, 0, 0);
}

pub(super) fn table_maccyrillic(codes: &mut CodeTable) {
    table_latin1(codes);
}

pub(super) fn table_tis620(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA0..=0xDA {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xDF..=0xFB {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_tscii(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..=0x91 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0x95..=0xFE {
        if i != 0xAD {
            codes[i] = CharacterCode::new(1, 0, 0);
        }
    }
}

pub(super) fn table_iscii(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xA1..=0xEA {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0xEF..=0xFA {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_viscii(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0x80..=0xFF {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    // six control codes double as letters
    for i in [0x02, 0x05, 0x06, 0x14, 0x19, 0x1E] {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
}

pub(super) fn table_geostd8(codes: &mut CodeTable) {
    init_ascii(codes);
    for i in 0xC0..=0xE5 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    // Georgian numero sign
    codes[0xFD] = CharacterCode::new(1, 0, 0);
}

/// UTF-EBCDIC: single-byte positions map through `EBCDIC_MAP`, multi-byte
/// lead positions carry a base value with 5-bit continuation groups.
pub(super) fn table_utf_ebcdic(codes: &mut CodeTable) {
    codes[0x40] = CharacterCode::new(1, 0, 0);
    for i in 0x4B..=0x50 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0x5A..=0x61 {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0x6B..=0x6F {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in 0x79..=0x7F {
        codes[i] = CharacterCode::new(1, 0, 0);
    }
    for i in (0x80..=0xA0).step_by(0x10) {
        for j in 1..=9 {
            codes[i + j] = CharacterCode::new(1, 0, 0);
        }
    }
    codes[0xAD] = CharacterCode::new(1, 0, 0);
    codes[0xBD] = CharacterCode::new(1, 0, 0);
    for i in (0x80..=0xA0).step_by(0x10) {
        codes[i] = CharacterCode::new(2, 0xA0, 0xBF);
        for j in 0x0A..=0x0F {
            if i + j != 0xAD {
                codes[i + j] = CharacterCode::new(2, 0xA0, 0xBF);
            }
        }
    }
    for i in 0xB0..=0xB6 {
        codes[i] = CharacterCode::new(2, 0xA0, 0xBF);
    }
    for i in 0xB7..=0xBF {
        if i != 0xBD {
            codes[i] = CharacterCode::new(3, 0xA0, 0xBF);
        }
    }
    for i in 0xC0..=0xCF {
        codes[i] = CharacterCode::new(3, 0xA0, 0xBF);
    }
    codes[0xDA] = CharacterCode::new(3, 0xA0, 0xBF);
    codes[0xDB] = CharacterCode::new(3, 0xA0, 0xBF);
    for i in 0xDC..=0xDF {
        codes[i] = CharacterCode::new(4, 0xA0, 0xBF);
    }
    codes[0xE1] = CharacterCode::new(4, 0xA0, 0xBF);
    codes[0xEA] = CharacterCode::new(4, 0xA0, 0xBF);
    codes[0xEB] = CharacterCode::new(4, 0xA0, 0xBF);
    codes[0xEC] = CharacterCode::new(5, 0xA0, 0xBF);
    codes[0xED] = CharacterCode::new(5, 0xA0, 0xBF);
    // the digit rows carry the single-byte letters and digits; they win
    // over the multi-byte lead assignments above
    for i in (0xC0..=0xF0).step_by(0x10) {
        for j in 0..=9 {
            codes[i + j] = CharacterCode::new(1, 0, 0);
        }
    }
}

/// Codepoint bases for the multi-byte UTF-EBCDIC lead bytes 0x80..0xFF.
pub(super) static EBCDIC_BASE: [u32; 128] = [
    0x00A0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00C0, 0x00E0, 0x0100, 0x0120, 0x0140, 0x0160, //
    0x0180, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01A0, 0x01C0, 0x01E0, 0x0200, 0x0220, 0x0240, //
    0x0260, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x0280, 0x02A0, 0x02C0, 0, 0x02E0, 0x0300, //
    0x0320, 0x0340, 0x0360, 0x0380, 0x03A0, 0x03C0, 0x03E0, 0, 0x0400, 0x0800, 0x0C00,
    0x1000, 0x1400, 0, 0x1800, 0x1C00, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x2000, 0x2400, 0x2800, 0x2C00, 0x3000, 0x3400, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x3800, 0x3C00, 0x4000, 0x8000, 0x10000, 0x10000, //
    0, 0x10000, 0, 0, 0, 0, 0, 0, 0, 0, 0x10000, 0x10000, 0x10000, 0x10000, 0x10000, 0, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Approximate-ASCII rendering of single-byte EBCDIC positions.
pub(super) static EBCDIC_MAP: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x9C, 0x09, 0x86, 0x7F, 0x97, 0x8D, 0x8E, 0x0B, 0x0C, 0x0D, 0x0E,
    0x0F, //
    0x10, 0x11, 0x12, 0x13, 0x9D, 0x0A, 0x08, 0x87, 0x18, 0x19, 0x92, 0x8F, 0x1C, 0x1D, 0x1E,
    0x1F, //
    0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x17, 0x1B, 0x88, 0x89, 0x8A, 0x8B, 0x8C, 0x05, 0x06,
    0x07, //
    0x90, 0x91, 0x16, 0x93, 0x94, 0x95, 0x96, 0x04, 0x98, 0x99, 0x9A, 0x9B, 0x14, 0x15, 0x9E,
    0x1A, //
    0x20, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x2E, 0x3C, 0x28, 0x2B, 0x7C, //
    0x26, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0x5E, //
    0x2D, 0x2F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x2C, 0x25, 0x5F, 0x3E, 0x3F, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22, //
    0, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0, 0, 0, 0, 0, 0, //
    0, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0, 0, 0, 0, 0, 0, //
    0, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0, 0, 0, 0x5B, 0, 0, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x5D, 0, 0, //
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0, 0, 0, 0, 0, 0, //
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0, 0, 0, 0, 0, 0, //
    0x5C, 0, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0, 0, 0, 0, 0, 0, //
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0, 0, 0, 0, 0, 0x9F,
];

static CP1251_ALPHANUM: [bool; 64] = [
    // 0x80 to 0x8F
    true, true, false, true, false, false, false, false, //
    false, false, true, false, true, true, true, true, //
    // 0x90 to 0x9F
    true, false, false, false, false, false, false, false, //
    false, false, true, false, true, true, true, true, //
    // 0xA0 to 0xAF
    true, true, true, true, false, true, false, false, //
    true, false, true, false, false, false, false, true, //
    // 0xB0 to 0xBF
    false, false, true, true, true, false, false, false, //
    true, false, true, false, true, true, true, true,
];

static CP1256_ALPHANUM: [bool; 128] = [
    // 0x80 to 0x8F
    true, true, false, false, false, false, false, false, //
    false, false, true, false, true, true, true, true, //
    // 0x90 to 0x9F
    true, false, false, false, false, false, false, false, //
    true, false, true, false, true, false, false, true, //
    // 0xA0 to 0xAF
    false, true, false, false, false, false, false, false, //
    false, false, true, false, false, false, false, false, //
    // 0xB0 to 0xBF
    false, false, false, false, false, false, false, false, //
    false, false, false, false, false, false, false, false, //
    // 0xC0 to 0xCF
    true, true, true, true, true, true, true, true, //
    true, true, true, true, true, true, true, true, //
    // 0xD0 to 0xDF
    true, true, true, true, true, true, true, false, //
    true, true, true, true, true, true, true, true, //
    // 0xE0 to 0xEF
    true, true, true, true, true, true, true, true, //
    true, true, true, true, true, true, true, true, //
    // 0xF0 to 0xFF
    true, true, true, true, true, true, true, false, //
    true, true, true, true, true, false, false, true,
];

/////////////////////////////////////////////////////////////////////////////////////
// Alphanumeric predicates
/////////////////////////////////////////////////////////////////////////////////////

#[inline]
fn ascii_alnum(cp: u32) -> bool {
    cp < 0x80 && (cp as u8 as char).is_ascii_alphanumeric()
}

pub(super) fn alnum_ascii(cp: u32) -> bool {
    ascii_alnum(cp)
}

pub(super) fn alnum_latin1(cp: u32) -> bool {
    if (0xC0..=0xFF).contains(&cp) {
        cp != 0xD7 && cp != 0xF7
    } else {
        ascii_alnum(cp)
    }
}

pub(super) fn alnum_iso8859_5(cp: u32) -> bool {
    if (0xA1..=0xFF).contains(&cp) {
        cp != 0xAD && cp != 0xF0 && cp != 0xFD
    } else {
        ascii_alnum(cp)
    }
}

pub(super) fn alnum_iso8859_6(cp: u32) -> bool {
    (0xC1..=0xDA).contains(&cp) || (0xE0..=0xF2).contains(&cp) || ascii_alnum(cp)
}

pub(super) fn alnum_iso8859_7(cp: u32) -> bool {
    (0xBE..=0xD1).contains(&cp)
        || (0xD3..=0xFE).contains(&cp)
        || matches!(cp, 0xB6 | 0xB8 | 0xB9 | 0xBA | 0xBC)
        || ascii_alnum(cp)
}

pub(super) fn alnum_iso8859_8(cp: u32) -> bool {
    (0xE0..=0xFA).contains(&cp) || ascii_alnum(cp)
}

pub(super) fn alnum_latin6(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else if (192..=255).contains(&cp) {
        true
    } else {
        !(cp < 0xA1 || matches!(cp, 0xA7 | 0xAD | 0xB0 | 0xB7 | 0xBD))
    }
}

pub(super) fn alnum_latin10(cp: u32) -> bool {
    (192..=255).contains(&cp)
        || matches!(cp, 0xA6 | 0xA8 | 0xB4 | 0xB8 | 0xBC | 0xBD | 0xBE)
        || ascii_alnum(cp)
}

/// KOI7 replaces 0x60..0x7E with Cyrillic letters.
pub(super) fn alnum_koi7(cp: u32) -> bool {
    (0x60..=0x7E).contains(&cp) || ascii_alnum(cp)
}

pub(super) fn alnum_koi8r(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        cp == 0xA3 || cp == 0xB3 || cp >= 0xC0
    }
}

pub(super) fn alnum_koi8u(cp: u32) -> bool {
    if cp < 0x80 {
        return ascii_alnum(cp);
    }
    let folded = cp & 0xEF;
    matches!(folded, 0xA3 | 0xA4 | 0xA6 | 0xA7 | 0xAD) || cp >= 0xC0
}

pub(super) fn alnum_cp437(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else if (0x80..=0xA5).contains(&cp) {
        !(0x9B..=0x9E).contains(&cp)
    } else {
        (0xE0..=0xEE).contains(&cp) && cp != 0xEC
    }
}

pub(super) fn alnum_cp737(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xBF).contains(&cp) || (0xE0..=0xF5).contains(&cp)
    }
}

pub(super) fn alnum_cp866(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xAF).contains(&cp) || (0xE0..=0xF7).contains(&cp)
    }
}

pub(super) fn alnum_ruscii(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xAF).contains(&cp) || (0xE0..=0xF9).contains(&cp)
    }
}

pub(super) fn alnum_kamenicky(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xAB).contains(&cp) || (0xE0..=0xEE).contains(&cp)
    }
}

pub(super) fn alnum_mazovia(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0x9A).contains(&cp)
            || cp == 0x9E
            || (0xA0..=0xA7).contains(&cp)
            || ((0xE0..=0xEE).contains(&cp) && cp != 0xEC)
    }
}

pub(super) fn alnum_mik(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xBF).contains(&cp) || ((0xE0..=0xEE).contains(&cp) && cp != 0xEC)
    }
}

pub(super) fn alnum_iransystem(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0x80..=0xBF).contains(&cp) || (0xE0..=0xFE).contains(&cp)
    }
}

pub(super) fn alnum_cp1251(cp: u32) -> bool {
    if cp >= 0xC0 {
        true
    } else if cp >= 0x80 {
        CP1251_ALPHANUM[(cp - 0x80) as usize]
    } else {
        ascii_alnum(cp)
    }
}

pub(super) fn alnum_cp1252(cp: u32) -> bool {
    matches!(cp, 0x83 | 0x8A | 0x8C | 0x8E | 0x9A | 0x9C | 0x9E | 0x9F) || alnum_latin1(cp)
}

pub(super) fn alnum_cp1255(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        ((0xC0..=0xD8).contains(&cp) && cp != 0xCA) || (0xE0..=0xFA).contains(&cp)
    }
}

pub(super) fn alnum_cp1256(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else if cp <= 0xFF {
        CP1256_ALPHANUM[(cp - 0x80) as usize]
    } else {
        false
    }
}

pub(super) fn alnum_tis620(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else if (0xDB..=0xDE).contains(&cp) {
        false
    } else {
        (0xA1..=0xFB).contains(&cp)
    }
}

pub(super) fn alnum_tscii(cp: u32) -> bool {
    if cp < 0x80 {
        return ascii_alnum(cp);
    }
    if (0x91..=0x94).contains(&cp) || matches!(cp, 0xA0 | 0xA9 | 0xAD | 0xFF) {
        return false;
    }
    cp >= 0x80
}

pub(super) fn alnum_iscii(cp: u32) -> bool {
    (0xA1..=0xD8).contains(&cp)
        || (0xDA..=0xEA).contains(&cp)
        || (0xF1..=0xFA).contains(&cp)
        || ascii_alnum(cp)
}

pub(super) fn alnum_viscii(cp: u32) -> bool {
    matches!(cp, 0x02 | 0x05 | 0x06 | 0x14 | 0x19 | 0x1E) || ascii_alnum(cp) || cp >= 0x80
}

pub(super) fn alnum_geostd8(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        (0xC0..=0xE5).contains(&cp)
    }
}

pub(super) fn alnum_big5(cp: u32) -> bool {
    if cp < 0x80 {
        return ascii_alnum(cp);
    }
    // the frequently- and less-frequently-used hanzi blocks; the graphics
    // and user-defined areas below them do not count as letters
    (5588..128 + 126 * 156).contains(&(cp as usize))
}

pub(super) fn alnum_iso6937(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else if cp > 255 {
        true
    } else if cp >= 0xE0 {
        !matches!(cp, 0xFF | 0xE3 | 0xE5 | 0xEB)
    } else {
        false
    }
}

/// CJK multi-byte sets without per-codepoint tables: everything past the
/// ASCII range counts as a letter so the alphanumeric filter is not
/// triggered by ideographs.
pub(super) fn alnum_cjk(cp: u32) -> bool {
    if cp < 0x80 {
        ascii_alnum(cp)
    } else {
        cp >= 128
    }
}

pub(super) fn alnum_unicode(cp: u32) -> bool {
    unicode_alphanumeric(cp)
}

/// ISO-2022 without full escape interpretation: only ASCII can be judged.
pub(super) fn alnum_iso2022(cp: u32) -> bool {
    ascii_alnum(cp)
}
