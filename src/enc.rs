use crate::entity::{Error, EscapeState, OutputFormat, Result};
use crate::utils::{is_printable_codepoint, remove_accent, romanizable_codepoint, write_utf16};
use ahash::{HashMap, HashMapExt};
use bitflags::bitflags;
use log::trace;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub(crate) mod tables;

/////////////////////////////////////////////////////////////////////////////////////
// CharacterCode & CodeTable
/////////////////////////////////////////////////////////////////////////////////////

/// One entry of a decoder's first-byte table: total byte length of a
/// character starting with this byte (0 = invalid) and the inclusive range
/// its continuation bytes must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCode {
    length: u8,
    range_begin: u8,
    range_end: u8,
}

impl CharacterCode {
    pub const INVALID: CharacterCode = CharacterCode {
        length: 0,
        range_begin: 0xFF,
        range_end: 0x00,
    };

    pub const fn new(length: u8, range_begin: u8, range_end: u8) -> CharacterCode {
        CharacterCode {
            length,
            range_begin,
            range_end,
        }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length as usize
    }

    #[inline]
    pub fn valid_successor(&self, byte: u8) -> bool {
        byte >= self.range_begin && byte <= self.range_end
    }
}

pub type CodeTable = [CharacterCode; 256];

/////////////////////////////////////////////////////////////////////////////////////
// Decoder
/////////////////////////////////////////////////////////////////////////////////////

/// Dispatch group for the per-encoding validation and codepoint rules.
/// Single-byte sets share one kind and differ only in their tables and
/// alphanumeric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecoderKind {
    SingleByte,
    Ascii16,
    Ascii32,
    Utf8,
    Utf16,
    Utf32,
    UtfEbcdic,
    Iso2022,
    Euc,
    EucJp,
    EucTw,
    ShiftJis,
    Gbk,
    Gb18030,
    Big5,
    Iso6937,
    Hz,
    Utf7,
    Ascii85,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct DecoderFlags: u8 {
        const BIG_ENDIAN = 0x01;
        /// Strip NUL bytes when emitting the raw string (16/32-bit ASCII).
        const FILTER_NUL = 0x02;
    }
}

type TableFn = fn(&mut CodeTable);
type AlnumFn = fn(u32) -> bool;

/// A single immutable decoder instance. Built once per (encoding,
/// newline-permission) pair and shared behind an Arc by the cache.
pub struct Decoder {
    name: &'static str,
    alias: &'static str,
    family: &'static str,
    kind: DecoderKind,
    flags: DecoderFlags,
    alignment: u8,
    reliability: f64,
    alphanum: AlnumFn,
    newlines_ok: bool,
    codes: CodeTable,
}

impl std::fmt::Display for Decoder {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(fmt)
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(fmt)
    }
}

impl PartialEq for Decoder {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.newlines_ok == other.newlines_ok
    }
}

impl Eq for Decoder {}

impl Decoder {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn alias(&self) -> &'static str {
        self.alias
    }

    /// Name of the encoding family the language models are keyed by.
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Minimum starting-offset divisor at which a character may begin.
    pub fn alignment(&self) -> usize {
        self.alignment as usize
    }

    pub fn big_endian(&self) -> bool {
        self.flags.contains(DecoderFlags::BIG_ENDIAN)
    }

    pub fn filter_nul(&self) -> bool {
        self.flags.contains(DecoderFlags::FILTER_NUL)
    }

    /// Scalar multiplier on this decoder's contribution to the confidence
    /// score. ASCII carries a tiny positive bias over its supersets;
    /// UTF-16/UTF-32 are penalized for their weak validation.
    pub fn detection_reliability(&self) -> f64 {
        self.reliability
    }

    pub fn newlines_ok(&self) -> bool {
        self.newlines_ok
    }

    /// Number of distinct codes the encoding can represent.
    pub fn encoding_size(&self) -> usize {
        match self.kind {
            DecoderKind::SingleByte | DecoderKind::Iso2022 | DecoderKind::Ascii16
            | DecoderKind::Ascii32 => 256,
            DecoderKind::Utf16 => 65536,
            DecoderKind::Utf8 | DecoderKind::Utf32 | DecoderKind::UtfEbcdic => 17 * 65536,
            DecoderKind::Utf7 | DecoderKind::Ascii85 => 17 * 256,
            DecoderKind::Euc | DecoderKind::EucJp | DecoderKind::ShiftJis
            | DecoderKind::Gb18030 => 128 + 128 * 128,
            DecoderKind::EucTw => 128 + 17 * 94 * 94,
            DecoderKind::Gbk => 128 + 128 * 192,
            DecoderKind::Big5 => 128 + 126 * 156,
            DecoderKind::Iso6937 => 256 + 15 * 64,
            DecoderKind::Hz => 128 + 94 * 94,
        }
    }

    /// First-byte length lookup plus continuation-range validation, bounded
    /// by the supplied slice. Returns the character length.
    #[inline]
    fn valid_successors(&self, s: &[u8]) -> Option<usize> {
        let code = &self.codes[s[0] as usize];
        let len = code.length();
        if len == 0 || len > s.len() {
            return None;
        }
        for &b in &s[1..len] {
            if !code.valid_successor(b) {
                return None;
            }
        }
        Some(len)
    }

    #[inline]
    fn printable(&self, cp: u32) -> bool {
        (is_printable_codepoint(cp) || (cp == 0x0A && self.newlines_ok)) && cp != 0xFEFF
    }

    /// Decode the next character at the start of `s`. Returns the
    /// codepoint and the number of bytes consumed, or None when no valid
    /// character starts here. Never reads past `s`; None is not an error,
    /// it tells the extraction loop to advance and retry.
    pub fn next(&self, s: &[u8], escape: &mut EscapeState) -> Option<(u32, usize)> {
        if s.is_empty() {
            return None;
        }
        match self.kind {
            DecoderKind::SingleByte | DecoderKind::Iso2022 => {
                let len = self.valid_successors(s)?;
                Some((s[0] as u32, len))
            }
            DecoderKind::Ascii16 => {
                let len = self.valid_successors(s)?;
                if self.big_endian() {
                    let low = s[1];
                    if low == b'\t' || low > 0x7F || (0x20..=0x7E).contains(&low) {
                        Some((low as u32, len))
                    } else {
                        None
                    }
                } else {
                    Some((s[0] as u32, len))
                }
            }
            DecoderKind::Ascii32 => {
                if self.big_endian() {
                    if self.codes[s[0] as usize].length() != 4 || s.len() < 4 {
                        return None;
                    }
                    let low = s[3];
                    if s[1] == 0
                        && s[2] == 0
                        && (low == b'\t' || (low == b'\n' && self.newlines_ok) || low >= b' ')
                    {
                        Some((low as u32, 4))
                    } else {
                        None
                    }
                } else {
                    let len = self.valid_successors(s)?;
                    Some((s[0] as u32, len))
                }
            }
            DecoderKind::Utf16 => {
                let len = self.valid_successors(s)?;
                let cp = if self.big_endian() {
                    ((s[0] as u32) << 8) | s[1] as u32
                } else {
                    ((s[1] as u32) << 8) | s[0] as u32
                };
                self.printable(cp).then_some((cp, len))
            }
            DecoderKind::Utf8 => {
                let len = self.valid_successors(s)?;
                let mut cp = s[0] as u32;
                // clear the high bits of the first byte, which only encode
                // the number of continuation bytes
                let mut bit = 7;
                while bit > 0 && (cp & (1 << bit)) != 0 {
                    cp &= !(1 << bit);
                    bit -= 1;
                }
                for &b in &s[1..len] {
                    cp = (cp << 6) | (b & 0x3F) as u32;
                }
                if cp > 0x10FFFF {
                    return None;
                }
                self.printable(cp).then_some((cp, len))
            }
            DecoderKind::Utf32 => {
                let code = &self.codes[s[0] as usize];
                if code.length() != 4 || s.len() < 4 {
                    return None;
                }
                let cp = if self.big_endian() {
                    if !code.valid_successor(s[1]) {
                        return None;
                    }
                    ((s[1] as u32) << 16) | ((s[2] as u32) << 8) | s[3] as u32
                } else {
                    if s[2] > 0x10 || s[3] != 0 {
                        return None;
                    }
                    ((s[2] as u32) << 16) | ((s[1] as u32) << 8) | s[0] as u32
                };
                self.printable(cp).then_some((cp, 4))
            }
            DecoderKind::UtfEbcdic => {
                let len = self.valid_successors(s)?;
                let base = if s[0] >= 0x80 {
                    tables::EBCDIC_BASE[(s[0] - 0x80) as usize]
                } else {
                    0
                };
                let cp = if len > 1 && base > 0 {
                    let mut value = 0u32;
                    for &b in &s[1..len] {
                        value = (value << 5) | (b - 0xA0) as u32;
                    }
                    base + value
                } else {
                    tables::EBCDIC_MAP[s[0] as usize] as u32
                };
                (cp != 0).then_some((cp, len))
            }
            DecoderKind::Euc => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    2 => 128 + (s[0] - 0xA1) as u32 * 94 + (s[1] - 0xA1) as u32,
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::EucJp => {
                let len = self.valid_successors(s)?;
                let kana = 0xDF - 0xA0;
                let cp = match len {
                    3 => {
                        let base = 128 + kana + 94 * 94;
                        base + (s[1] - 0xA1) as u32 * 94 + (s[2] - 0xA1) as u32
                    }
                    2 if s[0] == 0x8E => 128 + (s[1] - 0xA1) as u32,
                    2 => 128 + kana + (s[0] - 0xA1) as u32 * 94 + (s[1] - 0xA1) as u32,
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::EucTw => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    4 => {
                        if s[1] < 0xA1 || s[1] > 0xB0 {
                            return None;
                        }
                        let plane = (s[1] - 0xA0) as u32;
                        let plane_size = 94 * 94;
                        128 + plane_size
                            + plane * plane_size
                            + (s[2] - 0xA1) as u32 * 94
                            + (s[3] - 0xA1) as u32
                    }
                    2 => 128 + (s[0] - 0xA1) as u32 * 94 + (s[1] - 0xA1) as u32,
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::ShiftJis => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    2 => {
                        if s[1] == 0x7F {
                            return None;
                        }
                        let page = if s[0] < 0xA0 {
                            (s[0] - 0x81) as u32
                        } else {
                            (s[0] - 0xE0) as u32 + (0xA0 - 0x81)
                        };
                        256 + page * (0xFC - 0x40 + 1) + (s[1] - 0x40) as u32
                    }
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::Gbk => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    2 => {
                        if s[1] == 0x7F {
                            return None;
                        }
                        128 + (s[0] - 0x81) as u32 * 192 + (s[1] - 0x40) as u32
                    }
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::Gb18030 => {
                let len = self.valid_successors(s)?;
                if len == 2 && (0x30..=0x39).contains(&s[1]) {
                    // first half of a four-byte character
                    if s.len() >= 4
                        && (0x81..=0xFE).contains(&s[2])
                        && (0x30..=0x39).contains(&s[3])
                    {
                        let code1 = (s[0] - 0x81) as u32 * 10 + (s[1] - 0x30) as u32;
                        let code2 = (s[2] - 0x81) as u32 * 10 + (s[3] - 0x30) as u32;
                        let twobyte = (0xFE - 0x81) * 192;
                        Some((128 + twobyte + code1 * 10 * (0xFE - 0x80) + code2, 4))
                    } else {
                        None
                    }
                } else if len == 2 {
                    if s[1] < 0x40 {
                        return None;
                    }
                    Some((128 + (s[0] - 0x81) as u32 * 192 + (s[1] - 0x40) as u32, 2))
                } else {
                    Some((s[0] as u32, len))
                }
            }
            DecoderKind::Big5 => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    2 => {
                        // the 0x7F..0xA0 gap is invalid in both Big5 levels
                        if s[1] > 0x7E && s[1] < 0xA1 {
                            return None;
                        }
                        let mut byte2 = (s[1] - 0x40) as u32;
                        if byte2 > (0x7E - 0x40) {
                            byte2 -= 0xA1 - 0x7E - 1;
                        }
                        128 + (s[0] - 0x81) as u32 * 156 + byte2
                    }
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::Iso6937 => {
                let len = self.valid_successors(s)?;
                let cp = match len {
                    2 => 256 + (s[0] - 0xC1) as u32 * 64 + (s[1] - 0x41) as u32,
                    _ => s[0] as u32,
                };
                Some((cp, len))
            }
            DecoderKind::Hz => self.next_hz(s, escape),
            DecoderKind::Utf7 => self.next_utf7(s, escape),
            DecoderKind::Ascii85 => self.next_ascii85(s, escape),
        }
    }

    fn next_hz(&self, s: &[u8], escape: &mut EscapeState) -> Option<(u32, usize)> {
        let mut rest = s;
        let mut skipped = 0usize;
        if s.len() >= 2 && s[0] == b'~' {
            if s[1] == b'~' {
                return Some((b'~' as u32, 2));
            }
            if *escape == EscapeState::None && s[1] == b'{' {
                *escape = EscapeState::Active;
                rest = &s[2..];
                skipped = 2;
            } else if *escape == EscapeState::Active && s[1] == b'}' {
                *escape = EscapeState::None;
                rest = &s[2..];
                skipped = 2;
            }
        }
        if *escape == EscapeState::Active && rest.len() >= 2 {
            // two seven-bit bytes per character; high bits are ignored
            let b1 = rest[0] & 0x7F;
            let b2 = rest[1] & 0x7F;
            if (0x21..=0x7E).contains(&b1) && (0x21..=0x7E).contains(&b2) {
                let cp = 128 + 94 * (b1 - 0x21) as u32 + (b2 - 0x21) as u32;
                return Some((cp, skipped + 2));
            }
        }
        if rest.is_empty() {
            return None;
        }
        let len = self.valid_successors(rest)?;
        Some((rest[0] as u32, skipped + len))
    }

    // UTF-7 base64 payloads and Ascii85 blocks are not decoded; only the
    // shift state is tracked so strings are not truncated mid-sequence.
    // Decoding them would change which strings get extracted.
    fn next_utf7(&self, s: &[u8], escape: &mut EscapeState) -> Option<(u32, usize)> {
        let mut rest = s;
        let mut skipped = 0usize;
        if s[0] == b'+' && *escape == EscapeState::None {
            if s.len() >= 2 && s[1] == b'-' {
                return Some((b'+' as u32, 2));
            }
            *escape = EscapeState::Active;
            rest = &s[1..];
            skipped = 1;
        } else if *escape != EscapeState::None && s[0] == b'-' {
            *escape = EscapeState::None;
            rest = &s[1..];
            skipped = 1;
        }
        if rest.is_empty() {
            return None;
        }
        let len = self.valid_successors(rest)?;
        Some((rest[0] as u32, skipped + len))
    }

    fn next_ascii85(&self, s: &[u8], escape: &mut EscapeState) -> Option<(u32, usize)> {
        let mut rest = s;
        let mut skipped = 0usize;
        if s.len() >= 2 && s[0] == b'<' && s[1] == b'~' && *escape == EscapeState::None {
            *escape = EscapeState::Active;
            rest = &s[2..];
            skipped = 2;
        } else if *escape == EscapeState::Active && s[0] == b'~' {
            *escape = EscapeState::None;
            let exit = if s.len() >= 2 && s[1] == b'>' { 2 } else { 1 };
            rest = &s[exit..];
            skipped = exit;
        }
        if rest.is_empty() {
            return None;
        }
        let len = self.valid_successors(rest)?;
        Some((rest[0] as u32, skipped + len))
    }

    pub fn is_alphanumeric(&self, codepoint: u32) -> bool {
        (self.alphanum)(codepoint)
    }

    /// Number of bytes of an alignment-padded CR/LF run at the start of `s`.
    pub fn consume_newlines(&self, s: &[u8]) -> usize {
        let mut count = 0;
        match self.alignment {
            2 => {
                let (nl, pad) = if self.big_endian() { (1, 0) } else { (0, 1) };
                while s.len() >= count + 2
                    && s[count + pad] == 0
                    && (s[count + nl] == b'\r' || s[count + nl] == b'\n')
                {
                    count += 2;
                }
            }
            4 => {
                let nl = if self.big_endian() { 3 } else { 0 };
                while s.len() >= count + 4
                    && (s[count + nl] == b'\r' || s[count + nl] == b'\n')
                    && (0..4).all(|i| i == nl || s[count + i] == 0)
                {
                    count += 4;
                }
            }
            _ => {
                while count < s.len() && (s[count] == b'\r' || s[count] == b'\n') {
                    count += 1;
                }
            }
        }
        count
    }

    /// Are this decoder's codepoints true Unicode scalar values?
    fn unicode_codepoints(&self) -> bool {
        matches!(
            self.kind,
            DecoderKind::Utf8
                | DecoderKind::Utf16
                | DecoderKind::Utf32
                | DecoderKind::UtfEbcdic
                | DecoderKind::Utf7
        )
    }

    fn decode_chars(&self, bytes: &[u8]) -> Vec<char> {
        if !self.unicode_codepoints() {
            if let Some(converter) = whatwg_converter(self.family) {
                let (text, _) = converter.decode_without_bom_handling(bytes);
                return text.chars().collect();
            }
        }
        let mut chars = Vec::new();
        let mut escape = EscapeState::None;
        let mut pos = 0;
        while pos < bytes.len() {
            match self.next(&bytes[pos..], &mut escape) {
                Some((cp, consumed)) => {
                    chars.push(char::from_u32(cp).unwrap_or('\u{FFFD}'));
                    pos += consumed;
                }
                None => break,
            }
        }
        chars
    }

    /// Does at least one codepoint in the range have an ASCII rendering?
    pub fn romanizable(&self, bytes: &[u8]) -> bool {
        self.decode_chars(bytes)
            .iter()
            .any(|&ch| romanizable_codepoint(ch as u32))
    }

    /// Convert the extracted bytes to the requested output format. Native
    /// format writes the raw bytes (minus padding NULs for the 16/32-bit
    /// ASCII decoders).
    pub fn write_as_utf(
        &self,
        out: &mut dyn Write,
        bytes: &[u8],
        romanize: bool,
        format: OutputFormat,
    ) -> io::Result<()> {
        if format == OutputFormat::Native {
            if self.filter_nul() {
                for &b in bytes {
                    if b != 0 {
                        out.write_all(&[b])?;
                    }
                }
            } else {
                out.write_all(bytes)?;
            }
            return Ok(());
        }
        let mut chars = self.decode_chars(bytes);
        if romanize {
            for ch in chars.iter_mut() {
                if !ch.is_ascii() {
                    *ch = remove_accent(*ch);
                }
            }
        }
        match format {
            OutputFormat::Utf8 | OutputFormat::Native => {
                let text: String = chars.into_iter().collect();
                out.write_all(text.as_bytes())
            }
            OutputFormat::Utf16Le => {
                for ch in chars {
                    write_utf16(out, ch as u32, false)?;
                }
                Ok(())
            }
            OutputFormat::Utf16Be => {
                for ch in chars {
                    write_utf16(out, ch as u32, true)?;
                }
                Ok(())
            }
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Registry & cache
    /////////////////////////////////////////////////////////////////////////

    fn build(spec: &EncodingSpec, allow_newlines: bool) -> Decoder {
        let mut codes = [CharacterCode::INVALID; 256];
        (spec.table)(&mut codes);
        if allow_newlines {
            // use the natural character length so CR/LF don't terminate a
            // string even in wide encodings
            let mut len = codes[b'\t' as usize].length();
            if len == 0 {
                len = codes[b' ' as usize].length();
            }
            if len == 0 {
                len = 1;
            }
            codes[b'\r' as usize] = CharacterCode::new(len as u8, 0, 0);
            codes[b'\n' as usize] = CharacterCode::new(len as u8, 0, 0);
        }
        Decoder {
            name: spec.name,
            alias: spec.alias,
            family: spec.family,
            kind: spec.kind,
            flags: spec.flags,
            alignment: spec.alignment,
            reliability: spec.reliability,
            alphanum: spec.alphanum,
            newlines_ok: allow_newlines,
            codes,
        }
    }

    /// Resolve a free-form encoding name to its canonical registry name:
    /// case-insensitive match on the name, then on the alias, with
    /// case-sensitivity for single-character aliases.
    pub fn normalized_name(encoding: &str) -> Option<&'static str> {
        for spec in REGISTRY {
            if spec.name.eq_ignore_ascii_case(encoding) {
                return Some(spec.name);
            }
        }
        for spec in REGISTRY {
            let matched = if spec.alias.len() == 1 {
                spec.alias == encoding
            } else {
                spec.alias.eq_ignore_ascii_case(encoding)
            };
            if matched {
                return Some(spec.name);
            }
        }
        None
    }

    /// Fetch a shared decoder instance, building it on first use.
    pub fn by_name(encoding: &str, allow_newlines: bool) -> Result<Arc<Decoder>> {
        let Some(name) = Decoder::normalized_name(encoding) else {
            return Err(Error::UnknownEncoding {
                name: encoding.to_string(),
                suggestion: closest_encoding_name(encoding),
            });
        };
        let mut cache = DECODER_CACHE.lock().expect("decoder cache poisoned");
        if let Some(decoder) = cache.get(&(name, allow_newlines)) {
            return Ok(decoder.clone());
        }
        let spec = REGISTRY
            .iter()
            .find(|s| s.name == name)
            .expect("normalized name is registered");
        trace!("building decoder {} (newlines={})", name, allow_newlines);
        let decoder = Arc::new(Decoder::build(spec, allow_newlines));
        cache.insert((name, allow_newlines), decoder.clone());
        Ok(decoder)
    }

    /// Resolve a comma-separated list of encoding names.
    pub fn by_name_list(encodings: &str, allow_newlines: bool) -> Result<Vec<Arc<Decoder>>> {
        encodings
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(|name| Decoder::by_name(name.trim(), allow_newlines))
            .collect()
    }

    /// Canonical names of every registered encoding, with their
    /// single-character shortcuts.
    pub fn known_names() -> Vec<(&'static str, &'static str)> {
        REGISTRY.iter().map(|s| (s.name, s.alias)).collect()
    }
}

static DECODER_CACHE: Lazy<Mutex<HashMap<(&'static str, bool), Arc<Decoder>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn closest_encoding_name(encoding: &str) -> Option<String> {
    let query = encoding.to_ascii_lowercase();
    REGISTRY
        .iter()
        .map(|s| {
            (
                s.name,
                ordered_float::OrderedFloat(strsim::jaro_winkler(&query, &s.name.to_lowercase())),
            )
        })
        .max_by_key(|&(_, score)| score)
        .filter(|&(_, score)| score.0 > 0.7)
        .map(|(name, _)| name.to_string())
}

/// WHATWG converter used when writing a string out as UTF-8/UTF-16, for
/// the families that have one. Decoders without a counterpart fall back
/// to their own codepoint mapping.
fn whatwg_converter(family: &str) -> Option<&'static encoding_rs::Encoding> {
    Some(match family {
        "Latin-1" => encoding_rs::WINDOWS_1252,
        "Latin-2" => encoding_rs::ISO_8859_2,
        "ISO-8859-3" => encoding_rs::ISO_8859_3,
        "ISO-8859-4" => encoding_rs::ISO_8859_4,
        "ISO-8859-5" => encoding_rs::ISO_8859_5,
        "ISO-8859-6" => encoding_rs::ISO_8859_6,
        "ISO-8859-7" => encoding_rs::ISO_8859_7,
        "ISO-8859-8" => encoding_rs::ISO_8859_8,
        "Latin-6" => encoding_rs::ISO_8859_10,
        "ISO-8859-13" => encoding_rs::ISO_8859_13,
        "Latin-10" => encoding_rs::ISO_8859_15,
        "KOI8-R" => encoding_rs::KOI8_R,
        "KOI8-U" => encoding_rs::KOI8_U,
        "CP866" | "RUSCII" => encoding_rs::IBM866,
        "CP1251" => encoding_rs::WINDOWS_1251,
        "CP1252" => encoding_rs::WINDOWS_1252,
        "CP1256" => encoding_rs::WINDOWS_1256,
        "TIS-620" => encoding_rs::WINDOWS_874,
        "MacCyrillic" => encoding_rs::X_MAC_CYRILLIC,
        "GBK" | "GB-2312" => encoding_rs::GBK,
        "GB18030" => encoding_rs::GB18030,
        "Big5" => encoding_rs::BIG5,
        "EUC" => encoding_rs::EUC_KR,
        "EUC-JP" => encoding_rs::EUC_JP,
        "ShiftJIS" => encoding_rs::SHIFT_JIS,
        "ISO-2022" => encoding_rs::ISO_2022_JP,
        _ => return None,
    })
}

/////////////////////////////////////////////////////////////////////////////////////
// Registry data
/////////////////////////////////////////////////////////////////////////////////////

pub(crate) struct EncodingSpec {
    name: &'static str,
    alias: &'static str,
    family: &'static str,
    kind: DecoderKind,
    table: TableFn,
    alphanum: AlnumFn,
    alignment: u8,
    flags: DecoderFlags,
    reliability: f64,
}

const fn sb(
    name: &'static str,
    alias: &'static str,
    family: &'static str,
    table: TableFn,
    alphanum: AlnumFn,
) -> EncodingSpec {
    EncodingSpec {
        name,
        alias,
        family,
        kind: DecoderKind::SingleByte,
        table,
        alphanum,
        alignment: 1,
        flags: DecoderFlags::empty(),
        reliability: 1.0,
    }
}

const fn mb(
    kind: DecoderKind,
    name: &'static str,
    alias: &'static str,
    family: &'static str,
    table: TableFn,
    alphanum: AlnumFn,
) -> EncodingSpec {
    EncodingSpec {
        name,
        alias,
        family,
        kind,
        table,
        alphanum,
        alignment: 1,
        flags: DecoderFlags::empty(),
        reliability: 1.0,
    }
}

const fn wide(
    kind: DecoderKind,
    name: &'static str,
    alias: &'static str,
    family: &'static str,
    table: TableFn,
    alphanum: AlnumFn,
    alignment: u8,
    flags: DecoderFlags,
    reliability: f64,
) -> EncodingSpec {
    EncodingSpec {
        name,
        alias,
        family,
        kind,
        table,
        alphanum,
        alignment,
        flags,
        reliability,
    }
}

const BE: DecoderFlags = DecoderFlags::BIG_ENDIAN;
const NUL: DecoderFlags = DecoderFlags::FILTER_NUL;
const BE_NUL: DecoderFlags = DecoderFlags::BIG_ENDIAN.union(DecoderFlags::FILTER_NUL);
const NONE: DecoderFlags = DecoderFlags::empty();

use self::tables::*;
use self::DecoderKind as K;

/// The registry of recognized encodings. Order matters: alias resolution
/// and candidate de-duplication take the first match.
pub(crate) static REGISTRY: &[EncodingSpec] = &[
    sb("Latin-2", "Lat2", "Latin-2", table_latin1, alnum_latin1),
    sb("iso-8859-2", "Latin2", "Latin-2", table_latin1, alnum_latin1),
    mb(K::UtfEbcdic, "UTF-EBCDIC", "EBCDIC", "Unicode", table_utf_ebcdic, alnum_unicode),
    mb(K::Utf7, "UTF-7", "UTF7", "Unicode", table_ascii, alnum_unicode),
    mb(K::Utf8, "UTF-8Ext", "UT-8Ext", "Unicode", table_utf8ext, alnum_unicode),
    wide(K::Utf16, "UTF-16BE", "Uni-B", "Unicode", table_utf16be, alnum_unicode, 2, BE, 0.5),
    wide(K::Utf16, "UTF-16LE", "Uni-L", "Unicode", table_utf16le, alnum_unicode, 2, NONE, 0.5),
    mb(K::Iso2022, "ISO-2022", "ISO2022", "ISO-2022", table_iso2022, alnum_iso2022),
    mb(K::Euc, "EUC-CN", "EUC_CN", "GB-2312", table_gb2312, alnum_cjk),
    mb(K::Euc, "EUC-KR", "EUC_KR", "EUC", table_euc, alnum_cjk),
    mb(K::EucJp, "EUC-JP", "EUC_JP", "EUC-JP", table_euc_jp, alnum_cjk),
    mb(K::EucTw, "EUC-TW", "EUC_TW", "EUC-TW", table_euc_tw, alnum_cjk),
    mb(K::Euc, "EUC", "EUC", "EUC", table_euc, alnum_cjk),
    mb(K::Iso6937, "ISO-6937", "IEC-6937", "ISO-6937", table_iso6937, alnum_iso6937),
    mb(K::ShiftJis, "Shift-JIS", "Shift_JIS", "ShiftJIS", table_shift_jis, alnum_cjk),
    mb(K::ShiftJis, "ShiftJIS", "SJIS", "ShiftJIS", table_shift_jis, alnum_cjk),
    sb("KOI7", "KOI7", "KOI7", table_ascii, alnum_koi7),
    sb("KOI8-R", "KOI8_R", "KOI8-R", table_koi8r, alnum_koi8r),
    sb("KOI8-U", "KOI8_U", "KOI8-U", table_koi8u, alnum_koi8u),
    sb("CP437", "DOS", "CP437", table_cp437, alnum_cp437),
    sb("CP737", "DOSGreek", "CP737", table_cp737, alnum_cp737),
    sb("CP866", "DOSCyrillic", "CP866", table_cp866, alnum_cp866),
    sb("RUSCII", "CP1125", "RUSCII", table_ruscii, alnum_ruscii),
    sb("Kamenicky", "Kamenicky", "Kamenicky", table_cp437, alnum_kamenicky),
    sb("Mazovia", "Mazovia", "Mazovia", table_cp437, alnum_mazovia),
    sb("MIK", "MIK", "MIK", table_mik, alnum_mik),
    sb("IranSystem", "IranSystem", "IranSystem", table_iransystem, alnum_iransystem),
    sb("CP1251", "CP1251", "CP1251", table_cp1251, alnum_cp1251),
    sb("Windows-1251", "Win-1251", "CP1251", table_cp1251, alnum_cp1251),
    sb("CP1255", "CP1255", "ISO-8859-8", table_cp1255, alnum_cp1255),
    sb("Windows-1255", "Win-1255", "ISO-8859-8", table_cp1255, alnum_cp1255),
    sb("CP1256", "CP1256", "CP1256", table_cp1256, alnum_cp1256),
    sb("Windows-1256", "Win-1256", "CP1256", table_cp1256, alnum_cp1256),
    sb("Windows-874", "CP874", "TIS-620", table_tis620, alnum_tis620),
    sb("TIS-620", "TIS620", "TIS-620", table_tis620, alnum_tis620),
    sb("ISO-8859-3", "Latin-3", "ISO-8859-3", table_latin1, alnum_latin1),
    sb("ISO-8859-5", "Latin/Cyrillic", "ISO-8859-5", table_latin1, alnum_iso8859_5),
    sb("ISO-8859-6", "Latin/Arabic", "ISO-8859-6", table_iso8859_6, alnum_iso8859_6),
    sb("ISO-8859-7", "Latin/Greek", "ISO-8859-7", table_iso8859_7, alnum_iso8859_7),
    sb("ISO-8859-8", "Latin/Hebrew", "ISO-8859-8", table_iso8859_8, alnum_iso8859_8),
    sb("ISO-8859-8-i", "Latin/Hebrew-i", "ISO-8859-8", table_iso8859_8, alnum_iso8859_8),
    sb("ISO-8859-9", "Latin-5", "Latin-2", table_latin1, alnum_latin1),
    sb("ISO-8859-10", "Latin-6", "Latin-6", table_latin1, alnum_latin6),
    sb("ISO-8859-11", "Latin/Thai", "TIS-620", table_tis620, alnum_tis620),
    sb("ISO-8859-13", "Latin-7", "ISO-8859-13", table_latin7, alnum_latin6),
    sb("ISO-8859-15", "Latin-10", "Latin-10", table_latin1, alnum_latin10),
    sb("CP862", "CP862", "CP862", table_cp437, alnum_cp437),
    sb("TSCII", "TSCII", "TSCII", table_tscii, alnum_tscii),
    sb("ISCII", "IS13194", "ISCII", table_iscii, alnum_iscii),
    sb("VISCII", "VISCII", "VISCII", table_viscii, alnum_viscii),
    mb(K::Gb18030, "GB18030", "GB18030", "GB18030", table_gb18030, alnum_cjk),
    mb(K::Gbk, "GBK/1", "GBK/1", "GBK", table_gbk_level1, alnum_cjk),
    mb(K::Gbk, "GBK/2", "GBK/2", "GBK", table_gbk_level2, alnum_cjk),
    mb(K::Gbk, "GBK/3", "GBK/3", "GBK", table_gbk_level3, alnum_cjk),
    mb(K::Gbk, "GBK", "x-GBK", "GBK", table_gbk, alnum_cjk),
    mb(K::Euc, "GB-2312", "GB", "GB-2312", table_gb2312, alnum_cjk),
    mb(K::Euc, "GB2312", "GB2312", "GB-2312", table_gb2312, alnum_cjk),
    mb(K::Big5, "Big5-Ext", "Big5x", "Big5", table_big5ext, alnum_big5),
    mb(K::Big5, "Big5", "CP950", "Big5", table_big5, alnum_big5),
    mb(K::Hz, "HZ", "HZ-GB", "HZ", table_ascii, alnum_cjk),
    mb(K::Ascii85, "Ascii85", "Base85", "Ascii85", table_ascii, alnum_cjk),
    wide(K::Ascii16, "ASCII-16BE", "b", "Latin-1", table_ascii16be, alnum_ascii, 2, BE_NUL, 1.0),
    wide(K::Ascii16, "ASCII-16LE", "l", "Latin-1", table_ascii16le, alnum_ascii, 2, NUL, 1.0),
    wide(K::Ascii32, "ASCII-32BE", "B", "Latin-1", table_ascii32be, alnum_ascii, 4, BE_NUL, 1.0),
    wide(K::Ascii32, "ASCII-32LE", "L", "Latin-1", table_ascii32le, alnum_ascii, 4, NUL, 1.0),
    wide(K::Utf32, "UTF-32BE", "UTF32BE", "Unicode", table_utf32be, alnum_unicode, 4, BE, 0.8),
    wide(K::Utf32, "UTF-32LE", "UTF32LE", "Unicode", table_utf32le, alnum_unicode, 4, NONE, 0.8),
    wide(K::SingleByte, "US-ASCII", "ISO-IR-6", "ASCII", table_ascii, alnum_ascii, 1, NONE, 1.00001),
    wide(K::SingleByte, "ASCII", "s", "ASCII", table_ascii, alnum_ascii, 1, NONE, 1.00001),
    sb("Latin-1", "S", "Latin-1", table_latin1, alnum_latin1),
    sb("ISO-8859-1", "Latin1", "Latin-1", table_latin1, alnum_latin1),
    mb(K::Utf8, "UTF-8", "u", "Unicode", table_utf8, alnum_unicode),
    mb(K::Utf8, "UTF8", "utf8", "Unicode", table_utf8, alnum_unicode),
    sb("GEORGIAN-ACADEMY", "GEOSTD8", "GEOSTD8", table_geostd8, alnum_geostd8),
    // aliases
    sb("CP915", "CP28595", "ISO-8859-5", table_latin1, alnum_iso8859_5),
    wide(K::Utf16, "UTF16BE", "U16B", "Unicode", table_utf16be, alnum_unicode, 2, BE, 0.5),
    wide(K::Utf16, "UTF16LE", "U16L", "Unicode", table_utf16le, alnum_unicode, 2, NONE, 0.5),
    sb("ELOT-928", "ELOT928", "ISO-8859-7", table_iso8859_7, alnum_iso8859_7),
    mb(K::Euc, "Wansung", "Wansung", "EUC", table_euc, alnum_cjk),
    sb("ISO-IR-101", "L2", "Latin-2", table_latin1, alnum_latin1),
    sb("ISO-IR-127", "ECMA-114", "ISO-8859-6", table_iso8859_6, alnum_iso8859_6),
    // aliases which may not be fully implemented
    sb("ISO-IR-110", "Latin-4", "ISO-8859-4", table_latin1, alnum_latin1),
    sb("iso-8859-4", "Lat4", "ISO-8859-4", table_latin1, alnum_latin1),
    sb("CP1252", "WinLatin1", "CP1252", table_cp1252, alnum_cp1252),
    sb("Windows-1252", "Win-1252", "CP1252", table_cp1252, alnum_cp1252),
    // approximations kept for converted model data; known to be loose
    sb("Windows-1250", "CP1250", "CP1251", table_cp1251, alnum_cp1251),
    sb("Windows-1253", "CP1253", "CP1251", table_cp1251, alnum_cp1251),
    sb("Windows-1254", "CP1254", "CP1251", table_cp1251, alnum_cp1251),
    sb("Windows-1257", "CP1257", "CP1251", table_cp1251, alnum_cp1251),
    sb("Windows-1258", "CP1258", "CP1251", table_cp1251, alnum_cp1251),
    sb("Latin3", "Lat3", "Latin-2", table_latin1, alnum_latin1),
    sb("Latin4", "Latn4", "Latin-2", table_latin1, alnum_latin1),
    sb("CP857", "DOSTurkish", "CP437", table_cp437, alnum_cp437),
    sb("ArmSCII-8", "ArmSCII8", "ArmSCII", table_armscii8, alnum_latin1),
    sb("MacCyrillic", "MacCyr", "MacCyrillic", table_maccyrillic, alnum_latin1),
];
