use crate::consts::{GUESS_CUTOFF, UNSURE_CUTOFF};
use crate::entity::{ExtractSettings, OutputFormat, StringHit, StringSink};
use crate::langid::LanguageDatabase;
use crate::utils::write_utf16;
use serde::Serialize;
use std::io::Write;

/// The default formatter: one tab-separated line per accepted string with
/// the optional filename, offset, confidence, language and encoding
/// columns, then the string content converted to the requested output
/// format (with an optional romanized second line).
pub struct DefaultWriter<'a, W: Write> {
    out: W,
    settings: &'a ExtractSettings,
    database: Option<&'a LanguageDatabase>,
    filename: Option<String>,
    verbose: bool,
    wrote_bom: bool,
    failed: bool,
}

impl<'a, W: Write> DefaultWriter<'a, W> {
    pub fn new(out: W, settings: &'a ExtractSettings) -> DefaultWriter<'a, W> {
        DefaultWriter {
            out,
            settings,
            database: None,
            filename: None,
            verbose: false,
            wrote_bom: false,
            failed: false,
        }
    }

    pub fn with_database(mut self, database: &'a LanguageDatabase) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write header/meta text in the configured output format.
    fn emit_text(&mut self, text: &str) -> std::io::Result<()> {
        match self.settings.output_format {
            OutputFormat::Utf16Le => {
                for ch in text.chars() {
                    write_utf16(&mut self.out, ch as u32, false)?;
                }
                Ok(())
            }
            OutputFormat::Utf16Be => {
                for ch in text.chars() {
                    write_utf16(&mut self.out, ch as u32, true)?;
                }
                Ok(())
            }
            _ => self.out.write_all(text.as_bytes()),
        }
    }

    fn line_ending(&self) -> &'static str {
        if self.settings.force_crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn write_hit(&mut self, hit: &StringHit<'_>) -> std::io::Result<()> {
        if !self.wrote_bom {
            self.wrote_bom = true;
            match self.settings.output_format {
                OutputFormat::Utf16Le => self.out.write_all(b"\xFF\xFE")?,
                OutputFormat::Utf16Be => self.out.write_all(b"\xFE\xFF")?,
                _ => {}
            }
        }
        if let Some(filename) = self.filename.clone() {
            if self.settings.show_filename {
                self.emit_text(&format!("{filename}:\t"))?;
            }
        }
        match self.settings.location_radix {
            8 => self.emit_text(&format!("{:08o} ", hit.offset))?,
            10 => self.emit_text(&format!("{:08} ", hit.offset))?,
            16 => self.emit_text(&format!("{:08X} ", hit.offset))?,
            _ => {}
        }
        if self.settings.show_confidence {
            self.emit_text(&format!("{:6.3}\t", hit.confidence))?;
        }
        if self.settings.identify_language {
            if let (Some(database), Some(scores)) = (self.database, hit.scores) {
                let mut shown = 0;
                let mut names: Vec<&str> = Vec::new();
                let mut column = String::new();
                for n in 0..scores.num_languages() {
                    if shown >= self.settings.max_languages {
                        break;
                    }
                    let score = scores.score(n);
                    if score <= GUESS_CUTOFF {
                        if shown > 0 {
                            break;
                        }
                        column.push_str("??");
                        shown += 1;
                        continue;
                    }
                    let lang_num = scores.language_number(n);
                    let name = database
                        .languages
                        .language_name(lang_num, self.settings.friendly_names);
                    if names.contains(&name) {
                        continue;
                    }
                    names.push(name);
                    if shown > 0 {
                        column.push(',');
                    }
                    shown += 1;
                    column.push_str(name);
                    if self.settings.show_encoding {
                        if let Some(enc) = database.languages.language_encoding(lang_num) {
                            column.push('_');
                            column.push_str(enc);
                        }
                    }
                    if self.settings.show_script {
                        column.push('@');
                        column.push_str(database.languages.language_script(lang_num));
                    }
                    if self.verbose {
                        column.push_str(&format!(":{score:.4}"));
                    } else if score < UNSURE_CUTOFF && !name.starts_with('?') {
                        column.push('?');
                    }
                }
                if shown > 0 {
                    column.push('\t');
                    self.emit_text(&column)?;
                }
            }
        }
        if self.settings.show_encoding {
            self.emit_text(&format!("{}\t", hit.decoder.name()))?;
        }
        hit.decoder.write_as_utf(
            &mut self.out,
            hit.bytes,
            false,
            self.settings.output_format,
        )?;
        if self.settings.output_format != OutputFormat::Native
            && self.settings.romanize
            && hit.decoder.romanizable(hit.bytes)
        {
            self.emit_text(self.line_ending())?;
            self.emit_text("  -->\t")?;
            hit.decoder.write_as_utf(
                &mut self.out,
                hit.bytes,
                true,
                self.settings.output_format,
            )?;
        }
        if hit.bytes.last() != Some(&b'\n') {
            self.emit_text(self.line_ending())?;
        }
        Ok(())
    }
}

impl<W: Write> StringSink for DefaultWriter<'_, W> {
    fn accept(&mut self, hit: &StringHit<'_>) -> bool {
        if self.failed {
            return false;
        }
        if let Err(err) = self.write_hit(hit) {
            log::debug!("output failed: {err}");
            self.failed = true;
            return false;
        }
        true
    }
}

/////////////////////////////////////////////////////////////////////////////////////
// JSON records
/////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Serialize)]
struct JsonHit {
    offset: u64,
    encoding: String,
    confidence: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    languages: Vec<String>,
    text: String,
}

/// One JSON object per line per accepted string.
pub struct JsonWriter<'a, W: Write> {
    out: W,
    settings: &'a ExtractSettings,
    database: Option<&'a LanguageDatabase>,
    failed: bool,
}

impl<'a, W: Write> JsonWriter<'a, W> {
    pub fn new(out: W, settings: &'a ExtractSettings) -> JsonWriter<'a, W> {
        JsonWriter {
            out,
            settings,
            database: None,
            failed: false,
        }
    }

    pub fn with_database(mut self, database: &'a LanguageDatabase) -> Self {
        self.database = Some(database);
        self
    }
}

impl<W: Write> StringSink for JsonWriter<'_, W> {
    fn accept(&mut self, hit: &StringHit<'_>) -> bool {
        if self.failed {
            return false;
        }
        let mut text = Vec::new();
        if hit
            .decoder
            .write_as_utf(&mut text, hit.bytes, false, OutputFormat::Utf8)
            .is_err()
        {
            return false;
        }
        let languages = match (self.database, hit.scores) {
            (Some(database), Some(scores)) => (0..scores.num_languages())
                .take(self.settings.max_languages)
                .filter(|&n| scores.score(n) > GUESS_CUTOFF)
                .map(|n| {
                    database
                        .languages
                        .language_name(scores.language_number(n), self.settings.friendly_names)
                        .to_string()
                })
                .collect(),
            _ => Vec::new(),
        };
        let record = JsonHit {
            offset: hit.offset,
            encoding: hit.decoder.name().to_string(),
            confidence: hit.confidence,
            languages,
            text: String::from_utf8_lossy(&text).into_owned(),
        };
        let ok = serde_json::to_writer(&mut self.out, &record)
            .map_err(|err| log::debug!("json output failed: {err}"))
            .is_ok()
            && self.out.write_all(b"\n").is_ok();
        self.failed = !ok;
        ok
    }
}
