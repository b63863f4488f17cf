//! unhallu CLI - ASR transcript hallucination removal tool
//!
//! A command-line tool for cleaning speech-to-text transcripts.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use unhallu::{CleanOptions, CleanReport, Cleaner, Language, Stage};

/// Lines handed to the parallel cleaner per progress tick.
const LINE_CHUNK: usize = 256;

/// Strip ASR hallucinations from speech-to-text transcripts
#[derive(Parser)]
#[command(
    name = "unhallu",
    author = "iyulab",
    version,
    about = "Strip ASR hallucinations from transcripts",
    long_about = "unhallu - Post-processing filter for speech-to-text transcripts.\n\n\
                  Removes looping words, sign-off phrases, subtitle credits, filler\n\
                  interjections and stray foreign fragments.\n\n\
                  Usage:\n  \
                  unhallu <file>              Clean a transcript, print to stdout\n  \
                  unhallu <file> -o <out>     Clean a transcript into a file\n  \
                  cat a.txt | unhallu         Clean stdin\n  \
                  unhallu --lines <file>      Clean each line independently"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path ("-" or omitted for stdin)
    input: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Clean each line independently (in parallel)
    #[arg(long)]
    lines: bool,

    /// Allowed language, in fallback priority order (repeatable)
    #[arg(long = "lang", value_name = "LANG")]
    languages: Vec<LangArg>,

    /// Extra stopword phrase to remove (repeatable)
    #[arg(long = "stopword", value_name = "PHRASE")]
    stopwords: Vec<String>,

    /// Do not use the built-in stopword catalog
    #[arg(long)]
    no_default_stopwords: bool,

    /// Cleaning preset
    #[arg(long, default_value = "standard")]
    preset: Preset,

    /// Load options from a JSON file (flags are applied on top)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a JSON report of what each stage changed
    #[arg(long)]
    report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cleaning stages in execution order
    Stages,

    /// Show version information
    Version,
}

/// Allowed language
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum LangArg {
    /// Hangul syllables and jamo
    #[value(alias = "ko")]
    Korean,
    /// ASCII Latin letters
    #[value(alias = "en")]
    English,
    /// Kana and CJK ideographs
    #[value(alias = "ja")]
    Japanese,
    /// Cyrillic letters
    #[value(alias = "ru")]
    Cyrillic,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Korean => Language::Korean,
            LangArg::English => Language::English,
            LangArg::Japanese => Language::Japanese,
            LangArg::Cyrillic => Language::Cyrillic,
        }
    }
}

/// Cleaning preset
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Preset {
    /// Every stage (default)
    Standard,
    /// Language filter, stopwords and punctuation only
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Stages) => {
            print_stages();
            return Ok(());
        }
        Some(Commands::Version) => {
            print_version();
            return Ok(());
        }
        None => {}
    }

    let options = build_options(&cli)?;
    let cleaner = Cleaner::new(options)?;
    let input = read_input(cli.input.as_deref())?;

    let content = match (cli.lines, cli.report) {
        (false, false) => cleaner.clean(&input),
        (false, true) => serde_json::to_string_pretty(&cleaner.clean_with_report(&input))?,
        (true, false) => clean_lines(&cleaner, &input).join("\n"),
        (true, true) => serde_json::to_string_pretty(&report_lines(&cleaner, &input))?,
    };

    write_output(cli.output.as_ref(), &content)?;

    if let Some(output) = &cli.output {
        println!(
            "{} Cleaned transcript: {}",
            "✓".green().bold(),
            output.display()
        );
    }

    Ok(())
}

/// Builds options from the config file (or defaults), then applies flags.
fn build_options(cli: &Cli) -> unhallu::Result<CleanOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            debug!("Loading options from {}", path.display());
            CleanOptions::from_json_file(path)?
        }
        None => CleanOptions::default(),
    };

    if cli.preset == Preset::Minimal {
        options = options.with_stages(CleanOptions::minimal().stages);
    }
    if !cli.languages.is_empty() {
        options = options.with_allowed_languages(cli.languages.iter().map(|&l| Language::from(l)));
    }
    if cli.no_default_stopwords {
        options = options.without_stopwords();
    }
    if !cli.stopwords.is_empty() {
        options = options.add_stopwords(cli.stopwords.iter().cloned());
    }

    Ok(options)
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p),
        _ => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn clean_lines(cleaner: &Cleaner, text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let pb = create_progress(lines.len() as u64, "Cleaning lines");

    let mut cleaned = Vec::with_capacity(lines.len());
    for chunk in lines.chunks(LINE_CHUNK) {
        cleaned.extend(cleaner.clean_batch(chunk));
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!("Cleaned {} lines", cleaned.len());
    cleaned
}

fn report_lines(cleaner: &Cleaner, text: &str) -> Vec<CleanReport> {
    let lines: Vec<&str> = text.lines().collect();
    let pb = create_progress(lines.len() as u64, "Analyzing lines");

    let reports = lines
        .iter()
        .map(|line| {
            let report = cleaner.clean_with_report(line);
            pb.inc(1);
            report
        })
        .collect();

    pb.finish_and_clear();
    reports
}

fn print_stages() {
    println!("{}", "Cleaning Stages".cyan().bold());
    println!("{}", "─".repeat(40));
    for (i, stage) in Stage::ALL.iter().enumerate() {
        println!("{:>3}. {}", i + 1, stage.name());
    }
    println!("  {} {}", "+".green(), "whitespace collapse and fallback");
}

fn print_version() {
    println!("{} {}", "unhallu".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Hallucination removal for speech-to-text transcripts");
    println!();
    println!("Scripts: Korean, English, Japanese, Cyrillic");
    println!("Repository: https://github.com/iyulab/unhallu");
}

fn create_progress(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.blue} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_lang_args() {
        let cli = Cli::try_parse_from(["unhallu", "--lang", "ko", "--lang", "english", "in.txt"])
            .unwrap();
        assert_eq!(cli.languages, vec![LangArg::Korean, LangArg::English]);
        assert_eq!(cli.input, Some(PathBuf::from("in.txt")));

        let options = build_options(&cli).unwrap();
        assert_eq!(
            options.allowed_languages,
            vec![Language::Korean, Language::English]
        );
    }

    #[test]
    fn test_stopword_flags() {
        let cli = Cli::try_parse_from([
            "unhallu",
            "--no-default-stopwords",
            "--stopword",
            "구독",
            "--stopword",
            "좋아요",
        ])
        .unwrap();
        let options = build_options(&cli).unwrap();
        assert_eq!(options.stopwords, vec!["구독", "좋아요"]);
    }

    #[test]
    fn test_minimal_preset() {
        let cli = Cli::try_parse_from(["unhallu", "--preset", "minimal"]).unwrap();
        let options = build_options(&cli).unwrap();
        assert_eq!(options.stages, CleanOptions::minimal().stages);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["unhallu", "stages"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Stages)));
    }

    #[test]
    fn test_clean_lines_keeps_line_count() {
        let cleaner = Cleaner::default();
        let cleaned = clean_lines(&cleaner, "아 아 아\n\n고추장고추장고추장");
        assert_eq!(cleaned, vec!["아", "", "고추장"]);
    }
}
