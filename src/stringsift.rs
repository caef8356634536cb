use clap::Parser;
use env_logger::Env;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use stringsift::enc::Decoder;
use stringsift::entity::{CodePoints, ExtractSettings, ExtractSummary, OutputFormat};
use stringsift::extract::{Extractor, MemoryStream, ReaderStream};
use stringsift::langid::{load_language_database, LanguageDatabase};
use stringsift::output::{DefaultWriter, JsonWriter};
use stringsift::trie::WordTrie;

/////////////////////////////////////////////////////////////////////////////////////
// stringsift CLI application
/////////////////////////////////////////////////////////////////////////////////////

#[derive(Parser, Debug)]
#[command(
    name = "stringsift",
    about = "Language-aware text string extraction from binary data. \
             Emits only byte runs that plausibly belong to a known character \
             encoding, optionally identifying their language."
)]
#[command(author, version, long_about = None)]
struct CliArgs {
    /// File(s) to scan; "-" or no argument reads standard input
    pub files: Vec<PathBuf>,

    /// Encoding(s) to try (comma-separated); "auto" detects per region,
    /// "list" prints the known encodings
    #[arg(short, long, default_value = "auto")]
    pub encoding: String,

    /// Minimum string length in characters
    #[arg(short = 'l', long, default_value_t = 4)]
    pub min_length: usize,

    /// Longest run of undesired characters tolerated inside one string
    #[arg(short = 'g', long, default_value_t = 1000)]
    pub max_gap: usize,

    /// Minimum confidence for a string to be reported
    #[arg(long, default_value_t = 0.1)]
    pub min_score: f64,

    /// Identify the language of each string (needs a language database)
    #[arg(short = 'i', long)]
    pub identify: bool,

    /// Maximum number of language guesses per string
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub languages: usize,

    /// Let strings continue across newlines
    #[arg(short = 'n', long)]
    pub newlines: bool,

    /// Show string offsets in the given radix: o(ctal), d(ecimal), he(x)
    #[arg(short = 'o', long, value_name = "RADIX")]
    pub offsets: Option<char>,

    /// Show the confidence score of each string
    #[arg(short = 'c', long)]
    pub confidence: bool,

    /// Show the winning encoding for each string
    #[arg(long)]
    pub encoding_name: bool,

    /// Use long language names instead of the short codes
    #[arg(long)]
    pub friendly: bool,

    /// Append the script to each language guess
    #[arg(long)]
    pub script: bool,

    /// Prefix each line with the source filename
    #[arg(long)]
    pub show_filename: bool,

    /// Add a transliterated second line for strings that have one
    #[arg(short = 'r', long)]
    pub romanize: bool,

    /// Terminate output lines with CRLF
    #[arg(long)]
    pub crlf: bool,

    /// Convert extracted strings to UTF-8
    #[arg(long)]
    pub utf8: bool,

    /// Convert extracted strings to UTF-16 little-endian (with BOM)
    #[arg(long)]
    pub utf16le: bool,

    /// Convert extracted strings to UTF-16 big-endian (with BOM)
    #[arg(long)]
    pub utf16be: bool,

    /// Language identification database
    #[arg(long, value_name = "FILE")]
    pub language_db: Option<PathBuf>,

    /// Separate database for charset identification
    #[arg(long, value_name = "FILE")]
    pub charset_db: Option<PathBuf>,

    /// Word list used for dictionary-based scoring
    #[arg(long, value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Only count codepoints in these ranges as desired
    /// (e.g. "0x410-0x44F,0x401,0x451")
    #[arg(long, value_name = "RANGES")]
    pub desired: Option<String>,

    /// Scan only the given byte range, e.g. "1024-4096" or "0x400-0x1000"
    #[arg(long, value_name = "START-END")]
    pub range: Option<String>,

    /// Emit one JSON record per extracted string
    #[arg(long)]
    pub json: bool,

    /// Print per-language string counts after each file
    #[arg(long)]
    pub stats: bool,

    /// Display the detection process on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_offset(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

fn build_settings(args: &CliArgs) -> Result<ExtractSettings, String> {
    let mut settings = ExtractSettings {
        min_string_length: args.min_length.max(1),
        max_gap: args.max_gap,
        min_score: args.min_score,
        newlines_allowed: args.newlines,
        romanize: args.romanize,
        force_crlf: args.crlf,
        show_confidence: args.confidence,
        show_encoding: args.encoding_name,
        show_filename: args.show_filename,
        show_script: args.script,
        identify_language: args.identify,
        friendly_names: args.friendly,
        count_languages: args.stats,
        max_languages: args.languages.max(1),
        ..ExtractSettings::default()
    };
    if let Some(radix) = args.offsets {
        settings.set_location_radix(radix);
    }
    settings.output_format = match (args.utf8, args.utf16le, args.utf16be) {
        (_, true, _) => OutputFormat::Utf16Le,
        (_, _, true) => OutputFormat::Utf16Be,
        (true, _, _) => OutputFormat::Utf8,
        _ => OutputFormat::Native,
    };
    if let Some(spec) = &args.desired {
        settings.desired =
            Some(CodePoints::from_spec(spec).ok_or(format!("bad codepoint ranges '{spec}'"))?);
    }
    if let Some(range) = &args.range {
        let (start, end) = range
            .split_once('-')
            .and_then(|(s, e)| Some((parse_offset(s)?, parse_offset(e)?)))
            .ok_or(format!("bad byte range '{range}'"))?;
        if end <= start {
            return Err(format!("empty byte range '{range}'"));
        }
        settings.start_offset = start;
        settings.end_offset = end;
    }
    Ok(settings)
}

fn list_encodings() {
    println!("The known character sets are:");
    let mut line = String::new();
    for (name, alias) in Decoder::known_names() {
        let entry = if alias.len() == 1 {
            format!("{name} ({alias})")
        } else {
            name.to_string()
        };
        if line.len() + entry.len() > 72 {
            println!("{line}");
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&entry);
    }
    if !line.is_empty() {
        println!("{line}");
    }
}

fn print_stats(summary: &ExtractSummary) {
    eprintln!("===================");
    eprintln!("Number of strings extracted, by language:");
    for (name, count) in summary.language_counts.most_common() {
        eprintln!(" {count:7}\t{name}");
    }
    eprintln!("===================");
}

fn run(args: &CliArgs) -> Result<i32, String> {
    if args.encoding.eq_ignore_ascii_case("list") || args.encoding.eq_ignore_ascii_case("help") {
        list_encodings();
        return Ok(0);
    }
    let settings = build_settings(args)?;

    let database = match &args.language_db {
        Some(path) => Some(
            load_language_database(path, args.charset_db.as_deref())
                .map_err(|err| err.to_string())?,
        ),
        None => None,
    };
    if (args.identify || args.stats) && database.is_none() {
        return Err("language identification needs --language-db".to_string());
    }
    let automatic = args.encoding.eq_ignore_ascii_case("auto");
    let explicit = if automatic {
        Vec::new()
    } else {
        Decoder::by_name_list(&args.encoding, args.newlines).map_err(|err| err.to_string())?
    };
    let wordlist = match &args.wordlist {
        Some(path) => Some(Arc::new(
            WordTrie::from_wordlist(path).map_err(|err| err.to_string())?,
        )),
        None => None,
    };

    let mut files = args.files.clone();
    if files.is_empty() {
        files.push(PathBuf::from("-"));
    }
    let mut exit_code = 0;
    for path in &files {
        let mut extractor = Extractor::new(settings.clone());
        if let Some(database) = &database {
            extractor = extractor.with_database(database);
        }
        if !explicit.is_empty() {
            extractor = extractor.with_decoders(explicit.clone());
        }
        if let Some(wordlist) = &wordlist {
            extractor = extractor.with_wordlist(wordlist.clone());
        }

        let is_stdin = path.as_os_str() == "-";
        let display_name = if is_stdin {
            "standard input".to_string()
        } else {
            path.display().to_string()
        };
        if args.verbose {
            eprintln!("**** Extracting text from {display_name}");
        }

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let summary = if is_stdin {
            let stdin = std::io::stdin();
            let mut stream = ReaderStream::new(stdin.lock());
            run_extraction(&mut extractor, &mut stream, &mut out, args, &database, &display_name)
        } else {
            match std::fs::read(path) {
                Ok(data) => {
                    let start = (settings.start_offset as usize).min(data.len());
                    let mut stream = MemoryStream::with_offset(&data, start);
                    run_extraction(
                        &mut extractor,
                        &mut stream,
                        &mut out,
                        args,
                        &database,
                        &display_name,
                    )
                }
                Err(err) => {
                    eprintln!("**** Unable to open {display_name}: {err} ****");
                    exit_code = 1;
                    continue;
                }
            }
        };
        let _ = out.flush();
        match summary {
            Ok(summary) => {
                if args.stats {
                    print_stats(&summary);
                }
            }
            Err(err) => {
                eprintln!("**** {display_name}: {err} ****");
                exit_code = 1;
            }
        }
    }
    Ok(exit_code)
}

fn run_extraction(
    extractor: &mut Extractor,
    stream: &mut dyn stringsift::extract::InputStream,
    out: &mut dyn Write,
    args: &CliArgs,
    database: &Option<LanguageDatabase>,
    filename: &str,
) -> Result<ExtractSummary, String> {
    let settings = extractor.settings().clone();
    if args.json {
        let mut sink = JsonWriter::new(out, &settings);
        if let Some(database) = database {
            sink = sink.with_database(database);
        }
        extractor
            .extract(stream, &mut sink)
            .map_err(|err| err.to_string())
    } else {
        let mut sink = DefaultWriter::new(out, &settings)
            .with_filename(filename)
            .verbose(args.verbose);
        if let Some(database) = database {
            sink = sink.with_database(database);
        }
        extractor
            .extract(stream, &mut sink)
            .map_err(|err| err.to_string())
    }
}

pub fn main() {
    let args = CliArgs::parse();

    if args.verbose {
        env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    }

    match run(&args) {
        Err(message) => {
            eprintln!("{message}");
            process::exit(2);
        }
        Ok(exit_code) => process::exit(exit_code),
    }
}
