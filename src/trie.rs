use crate::consts::{
    STOPGRAM_PENALTY, TRIE_BITS_PER_LEVEL, TRIE_FORMAT_MIN_VERSION, TRIE_FORMAT_VERSION,
    TRIE_PADBYTES, TRIE_SCALE_FACTOR, TRIE_SIGNATURE,
};
use crate::entity::{Error, Result};
use crate::utils::load_le32;
use ahash::{HashMap, HashMapExt};
use log::debug;
use memmap2::Mmap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/////////////////////////////////////////////////////////////////////////////////////
// Constants of the packed layout
/////////////////////////////////////////////////////////////////////////////////////

pub(crate) const PTRIE_ROOT_INDEX: u32 = 0;
/// No node ever points back at the root, so its index doubles as null.
pub(crate) const NULL_INDEX: u32 = 0;
pub(crate) const INVALID_FREQ: u32 = u32::MAX;
/// Top bit of a child index marks a reference into the terminal array.
pub(crate) const TERMINAL_MASK: u32 = 0x8000_0000;

const NODE_BYTES: usize = 48;
const TERMINAL_BYTES: usize = 4;
const FREQ_BYTES: usize = 4;
const HEADER_BYTES: usize = 12 + 1 + 1 + 16 + 1 + 1 + TRIE_PADBYTES;

// Bitfields of a packed frequency record.
pub(crate) const FREQ_LANGID_MASK: u32 = 0x0000_1FFF;
pub(crate) const FREQ_LASTENTRY: u32 = 0x0000_2000;
pub(crate) const FREQ_STOPGRAM: u32 = 0x0000_4000;
pub(crate) const FREQ_EXP_MASK: u32 = 0x0001_8000;
pub(crate) const FREQ_EXP_SHIFT: u32 = 15;
pub(crate) const FREQ_MAN_MASK: u32 = 0xFFFE_0000;
pub(crate) const FREQ_MAN_SHIFT: u32 = 17;
pub(crate) const FREQ_MANTISSA_LSB: u32 = 0x0002_0000;
/// Each count in the exponent is two bits of right-shift.
pub(crate) const FREQ_EXPONENT_SCALE: u32 = 2;
const FREQ_HIBITS: u32 = 0xC000_0000;

/// The value map covers the mantissa, exponent and stopgram bits.
pub(crate) const VALUE_SHIFT: u32 = FREQ_EXP_SHIFT - 1;
pub(crate) const NUM_VALUES: usize = 1 << (32 - VALUE_SHIFT);

/////////////////////////////////////////////////////////////////////////////////////
// PackedTrieFreq
/////////////////////////////////////////////////////////////////////////////////////

/// One quantized (language, weight, flags) record of a leaf's frequency run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedTrieFreq(pub(crate) u32);

impl PackedTrieFreq {
    pub fn new(freq: u32, lang_id: u32, last: bool, stopgram: bool) -> PackedTrieFreq {
        let (mantissa, exponent) = PackedTrieFreq::quantize(freq);
        let mut data = lang_id & FREQ_LANGID_MASK;
        if last {
            data |= FREQ_LASTENTRY;
        }
        if stopgram {
            data |= FREQ_STOPGRAM;
        }
        data |= mantissa;
        data |= exponent << FREQ_EXP_SHIFT;
        PackedTrieFreq(data)
    }

    /// Quantize a scaled frequency into (mantissa, exponent). The mantissa
    /// is returned already positioned in its bitfield. Values too small to
    /// register keep their low mantissa bit so they never quantize to an
    /// exact zero.
    pub fn quantize(mut freq: u32) -> (u32, u32) {
        let mut exponent = 0;
        if freq != 0 {
            let max_exponent = FREQ_EXP_MASK >> FREQ_EXP_SHIFT;
            while (freq & FREQ_HIBITS) == 0 && exponent < max_exponent {
                freq <<= FREQ_EXPONENT_SCALE;
                exponent += 1;
            }
            freq &= FREQ_MAN_MASK;
            if freq == 0 {
                freq = FREQ_MANTISSA_LSB;
            }
        }
        (freq, exponent)
    }

    pub fn language_id(&self) -> u32 {
        self.0 & FREQ_LANGID_MASK
    }

    pub fn is_last(&self) -> bool {
        self.0 & FREQ_LASTENTRY != 0
    }

    pub fn is_stopgram(&self) -> bool {
        self.0 & FREQ_STOPGRAM != 0
    }

    pub fn mantissa(&self) -> u32 {
        (self.0 & FREQ_MAN_MASK) >> FREQ_MAN_SHIFT
    }

    pub fn exponent(&self) -> u32 {
        (self.0 & FREQ_EXP_MASK) >> FREQ_EXP_SHIFT
    }

    /// The de-quantized 32-bit score: mantissa >> (2 * exponent), with the
    /// mantissa kept in its high-bit position.
    pub fn scaled_score(&self) -> u32 {
        scaled_score_bits(self.0)
    }

    pub fn probability(&self) -> f64 {
        self.scaled_score() as f64 / (100.0 * TRIE_SCALE_FACTOR)
    }

    pub fn percentage(&self) -> f64 {
        self.scaled_score() as f64 / TRIE_SCALE_FACTOR
    }

    /// Single-lookup mapping of this record to its score contribution.
    #[inline]
    pub fn mapped_score(&self, values: &[f64]) -> f64 {
        let index = (self.0 & (FREQ_MAN_MASK | FREQ_EXP_MASK | FREQ_STOPGRAM)) >> VALUE_SHIFT;
        values[index as usize]
    }
}

fn scaled_score_bits(data: u32) -> u32 {
    let mantissa = data & FREQ_MAN_MASK;
    let exponent = (data & FREQ_EXP_MASK) >> (FREQ_EXP_SHIFT - 1);
    mantissa >> exponent
}

/// The mapping function of the runtime scorer: probability per record,
/// negated and amplified for stopgrams.
pub(crate) fn map_record_value(index: usize) -> f64 {
    let scaled = scaled_score_bits((index as u32) << VALUE_SHIFT) as f64;
    let value = scaled / (100.0 * TRIE_SCALE_FACTOR);
    if index & 1 != 0 {
        STOPGRAM_PENALTY * value
    } else {
        value
    }
}

static VALUE_MAP: OnceCell<Arc<Vec<f64>>> = OnceCell::new();

/// The quantized-value lookup table, initialized idempotently the first
/// time a model is loaded and shared by every identifier in the process.
pub(crate) fn value_map() -> Arc<Vec<f64>> {
    VALUE_MAP
        .get_or_init(|| Arc::new((0..NUM_VALUES).map(map_record_value).collect()))
        .clone()
}

/////////////////////////////////////////////////////////////////////////////////////
// PackedMultiTrie
/////////////////////////////////////////////////////////////////////////////////////

/// Backing bytes of a loaded trie: a read-only file mapping when the OS
/// grants one, otherwise a heap copy. The mapping is released by Drop on
/// every exit path.
pub(crate) enum TrieStorage {
    Mapped(Mmap),
    Heap(Vec<u8>),
}

impl TrieStorage {
    fn bytes(&self) -> &[u8] {
        match self {
            TrieStorage::Mapped(map) => map,
            TrieStorage::Heap(vec) => vec,
        }
    }
}

/// Read-only 256-ary trie over full-byte keys. Children are located by
/// popcount arithmetic over a presence bitmap instead of pointer chasing;
/// nodes with no children live in a separate 4-byte terminal array tagged
/// by the top bit of their index.
pub struct PackedMultiTrie {
    storage: TrieStorage,
    node_off: usize,
    freq_off: usize,
    term_off: usize,
    node_count: u32,
    term_count: u32,
    freq_count: u32,
    longest_key: u32,
}

/// Borrowed view of one node's 48 bytes (or a terminal's 4 bytes).
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    raw: &'a [u8],
    terminal: bool,
}

impl<'a> NodeRef<'a> {
    pub fn leaf(&self) -> bool {
        load_le32(self.raw) != INVALID_FREQ
    }

    pub fn frequency_index(&self) -> u32 {
        load_le32(self.raw)
    }

    pub fn first_child(&self) -> u32 {
        if self.terminal {
            0
        } else {
            load_le32(&self.raw[4..])
        }
    }

    pub fn child_present(&self, byte: u8) -> bool {
        if self.terminal {
            return false;
        }
        let word = load_le32(&self.raw[8 + (byte as usize / 32) * 4..]);
        word & (1u32 << (byte % 32)) != 0
    }

    /// Locate the child for `byte`: first-child plus the number of present
    /// children before it. The 8-byte popcount prefix keeps the bit count
    /// to a single masked popcount.
    pub fn child_index_if_present(&self, byte: u8) -> u32 {
        if self.terminal {
            return NULL_INDEX;
        }
        let word_index = byte as usize / 32;
        let word = load_le32(&self.raw[8 + word_index * 4..]);
        let mask = 1u32 << (byte % 32);
        if word & mask == 0 {
            return NULL_INDEX;
        }
        let before = (word & (mask - 1)).count_ones();
        let prefix = self.raw[40 + word_index] as u32;
        self.first_child() + prefix + before
    }
}

impl PackedMultiTrie {
    /// Parse the packed trie found at `offset` within the storage and take
    /// ownership of the backing bytes.
    pub(crate) fn parse(storage: TrieStorage, offset: usize) -> Result<PackedMultiTrie> {
        let bytes = storage.bytes();
        let header = bytes
            .get(offset..offset + HEADER_BYTES)
            .ok_or_else(|| Error::BadModel("truncated trie header".into()))?;
        if &header[..12] != TRIE_SIGNATURE {
            return Err(Error::BadModel("bad trie signature".into()));
        }
        let version = header[12];
        if !(TRIE_FORMAT_MIN_VERSION..=TRIE_FORMAT_VERSION).contains(&version) {
            return Err(Error::BadModel(format!(
                "unsupported trie format version {version}"
            )));
        }
        if header[13] != TRIE_BITS_PER_LEVEL {
            return Err(Error::BadModel("wrong trie arity".into()));
        }
        let node_count = load_le32(&header[14..]);
        let longest_key = load_le32(&header[18..]);
        let freq_count = load_le32(&header[22..]);
        let term_count = load_le32(&header[26..]);
        // bytes 30 and 31 are the ignore-whitespace and case-sensitivity
        // tags, unused by the byte-exact runtime scorer

        let node_off = offset + HEADER_BYTES;
        let freq_off = node_off + node_count as usize * NODE_BYTES;
        let term_off = freq_off + freq_count as usize * FREQ_BYTES;
        let end = term_off + term_count as usize * TERMINAL_BYTES;
        if node_count == 0 || bytes.len() < end {
            return Err(Error::BadModel(format!(
                "trie payload truncated: need {} bytes, have {}",
                end,
                bytes.len()
            )));
        }
        debug!(
            "loaded packed trie: {} nodes, {} terminals, {} frequency records, longest key {}",
            node_count, term_count, freq_count, longest_key
        );
        Ok(PackedMultiTrie {
            storage,
            node_off,
            freq_off,
            term_off,
            node_count,
            term_count,
            freq_count,
            longest_key,
        })
    }

    pub fn good(&self) -> bool {
        self.node_count > 0 && self.freq_count > 0
    }

    pub fn size(&self) -> u32 {
        self.node_count
    }

    pub fn num_frequencies(&self) -> u32 {
        self.freq_count
    }

    pub fn longest_key(&self) -> usize {
        self.longest_key as usize
    }

    pub fn node(&self, index: u32) -> Option<NodeRef<'_>> {
        let bytes = self.storage.bytes();
        if index < self.node_count {
            let start = self.node_off + index as usize * NODE_BYTES;
            return Some(NodeRef {
                raw: &bytes[start..start + NODE_BYTES],
                terminal: false,
            });
        }
        if index & TERMINAL_MASK != 0 {
            let term = index & !TERMINAL_MASK;
            if term < self.term_count {
                let start = self.term_off + term as usize * TERMINAL_BYTES;
                return Some(NodeRef {
                    raw: &bytes[start..start + TERMINAL_BYTES],
                    terminal: true,
                });
            }
        }
        None
    }

    /// Extend a key by one byte. Returns the child index or NULL_INDEX;
    /// extending a terminal (or the null index itself) stays null.
    #[inline]
    pub fn extend_key(&self, byte: u8, node_index: u32) -> u32 {
        if node_index & TERMINAL_MASK != 0 {
            return NULL_INDEX;
        }
        match self.node(node_index) {
            Some(node) => node.child_index_if_present(byte),
            None => NULL_INDEX,
        }
    }

    pub fn find_node(&self, key: &[u8]) -> Option<NodeRef<'_>> {
        let mut index = PTRIE_ROOT_INDEX;
        for (depth, &byte) in key.iter().enumerate() {
            index = self.extend_key(byte, index);
            if index == NULL_INDEX {
                return None;
            }
            if index & TERMINAL_MASK != 0 && depth + 1 < key.len() {
                return None;
            }
        }
        self.node(index)
    }

    /// Frequency records of a leaf, in run order ending at the last-flagged
    /// entry.
    pub fn frequencies(&self, node: NodeRef<'_>) -> FreqIter<'_> {
        let start = if node.leaf() {
            Some(node.frequency_index())
        } else {
            None
        };
        FreqIter {
            trie: self,
            next: start,
        }
    }

    fn freq_at(&self, index: u32) -> Option<PackedTrieFreq> {
        if index >= self.freq_count {
            return None;
        }
        let start = self.freq_off + index as usize * FREQ_BYTES;
        Some(PackedTrieFreq(load_le32(
            &self.storage.bytes()[start..start + 4],
        )))
    }

    /// Walk every key in lexicographic order, reporting leaves.
    pub fn enumerate<F: FnMut(&[u8], NodeRef<'_>)>(&self, mut callback: F) {
        let mut key = Vec::with_capacity(self.longest_key());
        if let Some(root) = self.node(PTRIE_ROOT_INDEX) {
            self.enumerate_children(root, &mut key, &mut callback);
        }
    }

    fn enumerate_children<F: FnMut(&[u8], NodeRef<'_>)>(
        &self,
        node: NodeRef<'_>,
        key: &mut Vec<u8>,
        callback: &mut F,
    ) {
        if node.leaf() && !key.is_empty() {
            callback(key, node);
        }
        if node.terminal {
            return;
        }
        for byte in 0..=255u8 {
            let child = node.child_index_if_present(byte);
            if child != NULL_INDEX {
                if let Some(child_node) = self.node(child) {
                    key.push(byte);
                    self.enumerate_children(child_node, key, callback);
                    key.pop();
                }
            }
        }
    }
}

/// Iterator over a leaf's frequency-record run.
pub struct FreqIter<'a> {
    trie: &'a PackedMultiTrie,
    next: Option<u32>,
}

impl Iterator for FreqIter<'_> {
    type Item = PackedTrieFreq;

    fn next(&mut self) -> Option<PackedTrieFreq> {
        let index = self.next?;
        let record = self.trie.freq_at(index)?;
        self.next = if record.is_last() {
            None
        } else {
            Some(index + 1)
        };
        Some(record)
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// WordTrie
/////////////////////////////////////////////////////////////////////////////////////

struct WordNode {
    children: HashMap<u8, u32>,
    terminal: bool,
}

/// Mutable byte trie holding a word list; extraction matches alpha runs
/// against it to measure word coverage.
pub struct WordTrie {
    nodes: Vec<WordNode>,
}

impl Default for WordTrie {
    fn default() -> Self {
        WordTrie::new()
    }
}

impl WordTrie {
    pub fn new() -> WordTrie {
        WordTrie {
            nodes: vec![WordNode {
                children: HashMap::new(),
                terminal: false,
            }],
        }
    }

    pub fn insert(&mut self, word: &[u8]) {
        let mut index = 0usize;
        for &byte in word {
            let existing = self.nodes[index].children.get(&byte).copied();
            index = match existing {
                Some(child) => child as usize,
                None => {
                    let child = self.nodes.len() as u32;
                    self.nodes.push(WordNode {
                        children: HashMap::new(),
                        terminal: false,
                    });
                    self.nodes[index].children.insert(byte, child);
                    child as usize
                }
            };
        }
        self.nodes[index].terminal = true;
    }

    /// Load a one-word-per-line list; blank lines and '#' comments are
    /// skipped.
    pub fn from_wordlist(path: &std::path::Path) -> Result<WordTrie> {
        let text = std::fs::read(path)?;
        let mut trie = WordTrie::new();
        let mut count = 0usize;
        for line in text.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() || line[0] == b'#' {
                continue;
            }
            trie.insert(line);
            count += 1;
        }
        debug!("loaded {} words from {}", count, path.display());
        Ok(trie)
    }

    pub fn cursor(&self) -> WordCursor<'_> {
        WordCursor {
            trie: self,
            node: 0,
            key_length: 0,
            failed: false,
        }
    }
}

/// Incremental lookup position within a WordTrie.
pub struct WordCursor<'a> {
    trie: &'a WordTrie,
    node: usize,
    key_length: usize,
    failed: bool,
}

impl WordCursor<'_> {
    pub fn reset(&mut self) {
        self.node = 0;
        self.key_length = 0;
        self.failed = false;
    }

    pub fn extend(&mut self, byte: u8) -> bool {
        if self.failed {
            return false;
        }
        self.key_length += 1;
        match self.trie.nodes[self.node].children.get(&byte) {
            Some(&child) => {
                self.node = child as usize;
                true
            }
            None => {
                self.failed = true;
                false
            }
        }
    }

    /// Did the bytes fed since the last reset spell a complete word?
    pub fn matched(&self) -> bool {
        !self.failed && self.trie.nodes[self.node].terminal
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }
}
