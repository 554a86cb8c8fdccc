//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use bookforge_core::chapters::{BuildChaptersConfig, build_chapters};
use bookforge_core::escape::{EscapeConfig, escape_chapters};
use bookforge_core::extract::{ExtractConfig, extract_documents};
use bookforge_core::progress::{ItemEvent, ProgressReporter};
use bookforge_core::renumber::{MasterUpdate, RenumberConfig, renumber_chapters};
use bookforge_shared::{AppConfig, OutcomeCounts, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Bookforge: turn word-processor documents into LaTeX book chapters.
#[derive(Parser)]
#[command(
    name = "bookforge",
    version,
    about = "Extract .docx text, build LaTeX chapters, escape them, and renumber them.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./bookforge.toml, then ~/.bookforge/bookforge.toml).
    #[arg(long, global = true, env = "BOOKFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the final summary as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract paragraph text from .docx documents into .txt files.
    Extract {
        /// Directory holding the .docx documents.
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Directory receiving the .txt files.
        #[arg(long, visible_alias = "output-dir")]
        text_dir: Option<PathBuf>,
    },

    /// Wrap each extracted text file as a numbered chapter file.
    Chapters {
        /// Directory holding the .txt files.
        #[arg(long, visible_alias = "source-dir")]
        text_dir: Option<PathBuf>,

        /// Directory receiving the chapter files.
        #[arg(long, visible_alias = "output-dir")]
        chapters_dir: Option<PathBuf>,

        /// Number of the first created chapter.
        #[arg(long)]
        start_number: Option<u32>,

        /// Chapter file extension (without the dot).
        #[arg(long)]
        extension: Option<String>,
    },

    /// Escape # and _ in chapter files, in place.
    Escape {
        /// Directory holding the chapter files.
        #[arg(long)]
        chapters_dir: Option<PathBuf>,

        /// Chapter file extension (without the dot).
        #[arg(long)]
        extension: Option<String>,
    },

    /// Rename chapter files to bare numbers and update the master document.
    Renumber {
        /// Directory holding the chapter files.
        #[arg(long)]
        chapters_dir: Option<PathBuf>,

        /// Master document containing the \input lines.
        #[arg(long)]
        master_document: Option<PathBuf>,

        /// Chapter file extension (without the dot).
        #[arg(long)]
        extension: Option<String>,

        /// Show what would be renamed without touching any file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write ~/.bookforge/bookforge.toml with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so stdout stays clean for progress lines and `--json`.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "bookforge=warn",
        1 => "bookforge=info",
        2 => "bookforge=debug",
        _ => "bookforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let explicit = cli.config.as_deref();
    let json = cli.json;

    match cli.command {
        Command::Extract {
            source_dir,
            text_dir,
        } => {
            let config = resolve_config(explicit, |c| {
                set_if_some(&mut c.paths.source_dir, source_dir);
                set_if_some(&mut c.paths.text_dir, text_dir);
            })?;
            cmd_extract(&config, json)
        }
        Command::Chapters {
            text_dir,
            chapters_dir,
            start_number,
            extension,
        } => {
            let config = resolve_config(explicit, |c| {
                set_if_some(&mut c.paths.text_dir, text_dir);
                set_if_some(&mut c.paths.chapters_dir, chapters_dir);
                set_if_some(&mut c.chapters.start_number, start_number);
                set_if_some(&mut c.chapters.extension, extension);
            })?;
            cmd_chapters(&config, json)
        }
        Command::Escape {
            chapters_dir,
            extension,
        } => {
            let config = resolve_config(explicit, |c| {
                set_if_some(&mut c.paths.chapters_dir, chapters_dir);
                set_if_some(&mut c.chapters.extension, extension);
            })?;
            cmd_escape(&config, json)
        }
        Command::Renumber {
            chapters_dir,
            master_document,
            extension,
            dry_run,
        } => {
            let config = resolve_config(explicit, |c| {
                set_if_some(&mut c.paths.chapters_dir, chapters_dir);
                set_if_some(&mut c.paths.master_document, master_document);
                set_if_some(&mut c.chapters.extension, extension);
            })?;
            cmd_renumber(&config, dry_run, json)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(explicit),
        },
    }
}

/// Load the config file, apply CLI overrides, and re-validate.
fn resolve_config(explicit: Option<&Path>, apply: impl FnOnce(&mut AppConfig)) -> Result<AppConfig> {
    let mut config = load_config(explicit)?;
    apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(config: &AppConfig, json: bool) -> Result<()> {
    let extract_config = ExtractConfig::from(config);
    info!(source = %extract_config.source_dir.display(), "extracting documents");

    let reporter = CliProgress::new(json);
    let result = extract_documents(&extract_config, &reporter)?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("  Processing complete!");
    println!("  Processed: {}", result.counts.succeeded);
    println!("  Empty:     {}", result.counts.skipped);
    println!("  Failed:    {}", result.counts.failed);
    println!("  Output:    {}", result.text_dir.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_chapters(config: &AppConfig, json: bool) -> Result<()> {
    let chapters_config = BuildChaptersConfig::from(config);
    info!(start_number = chapters_config.start_number, "building chapters");

    let reporter = CliProgress::new(json);
    let result = build_chapters(&chapters_config, &reporter)?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("  Chapter creation complete!");
    println!("  Created: {}", result.counts.succeeded);
    println!("  Skipped: {}", result.counts.skipped);
    println!("  Failed:  {}", result.counts.failed);
    for name in &result.created {
        println!("    - {name}");
    }

    if !result.include_lines.is_empty() {
        println!();
        println!("  Add these lines to your master document after the existing chapters:");
        for line in &result.include_lines {
            println!("{line}");
        }
    }
    println!();

    Ok(())
}

fn cmd_escape(config: &AppConfig, json: bool) -> Result<()> {
    let escape_config = EscapeConfig::from(config);

    let reporter = CliProgress::new(json);
    let result = escape_chapters(&escape_config, &reporter)?;

    if json {
        return print_json(&result);
    }

    println!();
    println!("  Escaped special characters in {} files", result.counts.succeeded);
    println!("  Unchanged: {}", result.counts.unchanged);
    println!("  Failed:    {}", result.counts.failed);
    println!();

    Ok(())
}

fn cmd_renumber(config: &AppConfig, dry_run: bool, json: bool) -> Result<()> {
    let mut renumber_config = RenumberConfig::from(config);
    renumber_config.dry_run = dry_run;

    let reporter = CliProgress::new(json);
    let result = renumber_chapters(&renumber_config, &reporter)?;

    if json {
        return print_json(&result);
    }

    println!();
    if result.dry_run {
        println!("  Dry run: nothing was renamed.");
    }
    println!("  Renamed:   {}", result.counts.succeeded);
    println!("  No change: {}", result.counts.unchanged);
    println!("  Failed:    {}", result.counts.failed);

    let master = renumber_config.master_document.display();
    match &result.master {
        MasterUpdate::NotNeeded => {}
        MasterUpdate::Updated { replacements } => {
            println!("  ✓ Updated {master} ({replacements} references)");
        }
        MasterUpdate::Planned { replacements } => {
            println!("  Would update {master} ({replacements} references)");
        }
        MasterUpdate::Failed { error } => {
            println!("  ✗ Error updating {master}: {error}");
        }
    }
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(explicit: Option<&Path>) -> Result<()> {
    let config = load_config(explicit)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter: per-item lines above an indicatif bar.
struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl CliProgress {
    /// `quiet` suppresses per-item lines (used with `--json`).
    fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar, quiet }
    }

    fn say(&self, line: String) {
        if !self.quiet {
            self.bar.suspend(|| println!("{line}"));
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(name.to_string());
        self.say(format!("{name}: {total} files found"));
    }

    fn item(&self, event: &ItemEvent<'_>) {
        match event {
            ItemEvent::Started { name } => {
                self.say(format!("Processing: {name}"));
                return;
            }
            ItemEvent::Succeeded { name, output } if name == output => {
                self.say(format!("  ✓ Done: {name}"));
            }
            ItemEvent::Succeeded { output, .. } => self.say(format!("  ✓ Created: {output}")),
            ItemEvent::Skipped { name, reason } => {
                self.say(format!("  ⚠ Skipped {name}: {reason}"));
            }
            ItemEvent::Unchanged { name } => self.say(format!("  - No change needed: {name}")),
            ItemEvent::Failed { name, error } => self.say(format!("  ✗ Failed {name}: {error}")),
        }
        self.bar.inc(1);
    }

    fn done(&self, _counts: &OutcomeCounts) {
        self.bar.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
