// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use kindle_latex::app_config::{self, Config, EmphasisStyle, NoteStyle, SectionMatching, TailMergePolicy};
use kindle_latex::app_controller::{ConversionOutcome, Controller};

/// CLI Wrapper for EmphasisStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEmphasis {
    Bold,
    Italics,
    Underline,
    #[value(name = "large_font", alias = "large-font")]
    LargeFont,
    Red,
}

impl From<CliEmphasis> for EmphasisStyle {
    fn from(cli_emphasis: CliEmphasis) -> Self {
        match cli_emphasis {
            CliEmphasis::Bold => EmphasisStyle::Bold,
            CliEmphasis::Italics => EmphasisStyle::Italics,
            CliEmphasis::Underline => EmphasisStyle::Underline,
            CliEmphasis::LargeFont => EmphasisStyle::LargeFont,
            CliEmphasis::Red => EmphasisStyle::Red,
        }
    }
}

/// CLI Wrapper for NoteStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliNoteStyle {
    Italics,
    Small,
    Footnotesize,
    Gray,
    None,
}

impl From<CliNoteStyle> for Option<NoteStyle> {
    fn from(cli_style: CliNoteStyle) -> Self {
        match cli_style {
            CliNoteStyle::Italics => Some(NoteStyle::Italics),
            CliNoteStyle::Small => Some(NoteStyle::Small),
            CliNoteStyle::Footnotesize => Some(NoteStyle::Footnotesize),
            CliNoteStyle::Gray => Some(NoteStyle::Gray),
            CliNoteStyle::None => None,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert saved notes pages to LaTeX (default command)
    Convert {
        /// Saved notes page or directory of pages
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: ConvertOptions,
    },

    /// Rename saved notes pages to "<Author> - <Short Title>.html"
    Rename {
        /// Saved notes page or directory of pages
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for kindle-latex
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct ConvertOptions {
    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Markup for highlights tagged #red
    #[arg(short, long, value_enum)]
    emphasis: Option<CliEmphasis>,

    /// Markup for notes
    #[arg(short, long, value_enum)]
    note_style: Option<CliNoteStyle>,

    /// Also list emphasised highlights in their own section
    #[arg(long)]
    important_section: bool,

    /// Match section markers as whole words only, so #chapter is not #ch
    #[arg(long)]
    exact_section_tags: bool,

    /// Drop a dangling "..." on the last highlight instead of failing
    #[arg(long)]
    drop_trailing_continuation: bool,

    /// Directory for generated .tex files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// LaTeX template with _BOOK_AUTHOR and _BOOK_TITLE placeholders
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// kindle-latex - Kindle highlights to LaTeX
///
/// Reads saved Kindle "Your Highlights" pages and renders highlights and
/// notes as a LaTeX document, processing the commands written in notes.
#[derive(Parser, Debug)]
#[command(name = "kindle-latex")]
#[command(version)]
#[command(about = "Turn Kindle highlights and notes into LaTeX")]
#[command(long_about = "kindle-latex reads saved Kindle notes pages and renders them as LaTeX documents.

NOTE COMMANDS:
    ...          combine this highlight with the next one
    #red         emphasise this highlight
    #part        this highlight names a part
    #sec, #ch    this highlight names a chapter
    #subsec      this highlight names a subsection
    #subsubsec   this highlight names a subsubsection

EXAMPLES:
    kindle-latex notes.html                     # Convert using default config
    kindle-latex -f notes.html                  # Force overwrite existing files
    kindle-latex -e italics -n gray notes.html  # Choose emphasis and note styles
    kindle-latex --important-section notes.html # Add a section of emphasised highlights
    kindle-latex -o out/ html_files/            # Convert an entire directory
    kindle-latex rename html_files/             # Name pages after their books
    kindle-latex completions bash > kindle-latex.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Saved notes page or directory of pages
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept everything here; the effective level is applied through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "kindle-latex", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Convert { input_path, options }) => run_convert(&input_path, options),
        Some(Commands::Rename { input_path, config_path }) => run_rename(&input_path, &config_path),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_convert(&input_path, cli.options)
        }
    }
}

// @loads: Configuration file, creating a default one when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::load(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path));
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(config_path)
        .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
    Ok(config)
}

// @applies: Command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ConvertOptions) {
    if let Some(emphasis) = &options.emphasis {
        config.emphasis = emphasis.clone().into();
    }
    if let Some(note_style) = &options.note_style {
        config.note_style = note_style.clone().into();
    }
    if options.important_section {
        config.important_section = true;
    }
    if options.exact_section_tags {
        config.section_matching = SectionMatching::ExactToken;
    }
    if options.drop_trailing_continuation {
        config.trailing_continuation = TailMergePolicy::Drop;
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(template) = &options.template {
        config.template_path = Some(template.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn run_convert(input_path: &Path, options: ConvertOptions) -> Result<()> {
    // If log level is set via command line, apply it before loading the config
    if let Some(cli_level) = &options.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        if let ConversionOutcome::Skipped(path) = controller.convert_file(input_path, options.force_overwrite)? {
            info!("Nothing to do, {:?} already exists", path);
        }
    } else if input_path.is_dir() {
        let summary = controller.convert_folder(input_path, options.force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} of {} notes pages failed to convert",
                summary.failed, summary.converted + summary.skipped + summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

fn run_rename(input_path: &Path, config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        controller.rename_page(input_path)?;
    } else if input_path.is_dir() {
        let summary = controller.rename_folder(input_path)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} of {} notes pages could not be renamed",
                summary.failed, summary.renamed + summary.unchanged + summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
