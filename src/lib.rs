//! stringsift
//! ==========
//!
//! Language-aware extraction of text strings from arbitrary binary data.
//!
//! Where the classic `strings` utility emits any run of printable bytes,
//! this library emits only runs that plausibly belong to some known
//! character encoding and, optionally, some known language. Candidate
//! encodings are chosen per buffer region by an n-gram model over raw
//! bytes, each region is decoded by a family of per-encoding validators,
//! and every candidate run is scored by structural heuristics (letter
//! runs, word coverage) combined with the language-model score.
//!
//! # Library
//!
//! The two convenience entry points mirror each other:
//!
//! * [`extract_from_bytes`] scans an in-memory buffer
//! * [`extract_from_path`] opens and scans a file
//!
//! Both hand accepted strings to a caller-supplied sink; a closure works.
//! For language identification, load a model database with
//! [`langid::load_language_database`] and attach it to an
//! [`extract::Extractor`].
//!
//! ## Example
//!
//! ```rust
//! use stringsift::extract_from_bytes;
//! use stringsift::entity::StringHit;
//!
//! let data = b"\x7f\x45\x4c\x46\x02\x01The quick brown fox\x00\x01\x02";
//! let mut found = Vec::new();
//! let mut sink = |hit: &StringHit<'_>| {
//!     found.push(String::from_utf8_lossy(hit.bytes).into_owned());
//!     true
//! };
//! extract_from_bytes(data, None, &mut sink).unwrap();
//! assert!(found.iter().any(|s| s.contains("quick brown fox")));
//! ```
//!
//! # CLI tool
//!
//! A binary of the same name is included behind the `cli` feature:
//!
//! ```shell
//! cargo install stringsift --features cli
//! stringsift -i -c --encoding-name suspicious.bin
//! ```

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

pub mod consts;
pub mod enc;
pub mod entity;
pub mod extract;
pub mod langid;
pub mod output;
pub mod score;
pub mod trie;
mod tests;
mod utils;

use entity::{ExtractSettings, ExtractSummary, Result, StringSink};
use extract::{Extractor, MemoryStream, ReaderStream};

/// Extract strings from an in-memory buffer with automatic encoding
/// detection (structural heuristics only; attach a language database via
/// [`extract::Extractor`] for model-driven detection).
pub fn extract_from_bytes(
    bytes: &[u8],
    settings: Option<ExtractSettings>,
    sink: &mut dyn StringSink,
) -> Result<ExtractSummary> {
    let settings = settings.unwrap_or_default();
    let start = (settings.start_offset as usize).min(bytes.len());
    let mut stream = MemoryStream::with_offset(bytes, start);
    Extractor::new(settings).extract(&mut stream, sink)
}

/// Extract strings from a file. The scan honors the byte range of the
/// settings; everything else matches [`extract_from_bytes`].
pub fn extract_from_path(
    path: &Path,
    settings: Option<ExtractSettings>,
    sink: &mut dyn StringSink,
) -> Result<ExtractSummary> {
    let settings = settings.unwrap_or_default();
    let mut file = File::open(path)?;
    let start = settings.start_offset;
    if start > 0 {
        file.seek(SeekFrom::Start(start))?;
    }
    let mut stream = ReaderStream::with_offset(file, start);
    Extractor::new(settings).extract(&mut stream, sink)
}
