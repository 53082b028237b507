//! chordpads - converts chord set libraries into chord pad presets
//!
//! ```text
//! chordpads convert [--config FILE] [--input FILE] [--output-dir DIR] [--octave-offset N]
//! chordpads extract <page.html> [--output FILE] [--any-table]
//! ```

use chordpads::{ChordPadsError, Config, DirectorySink, ExtractOptions};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Chord pad preset converter
#[derive(Parser)]
#[command(name = "chordpads")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show skipped note tokens and other details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one preset file per chord set of a JSON library
    Convert {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Chord library JSON (default: chords.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (default: ./cubase_presets)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Octave shift applied to every note in the note strings
        #[arg(long, allow_hyphen_values = true)]
        octave_offset: Option<i32>,

        /// Product name at the start of every file name
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Extract a chord library from an HTML table export
    Extract {
        /// HTML page containing the chord set table
        page: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read the first table instead of the one marked confluenceTable
        #[arg(long)]
        any_table: bool,
    },
}

struct CliLogger {
    level: LevelFilter,
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let label = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warning".yellow().bold(),
            Level::Info => "info".green(),
            Level::Debug => "debug".dimmed(),
            Level::Trace => "trace".dimmed(),
        };
        eprintln!("{}: {}", label, record.args());
    }

    fn flush(&self) {}
}

fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    // Only fails if a logger is already installed
    if log::set_boxed_logger(Box::new(CliLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            config,
            input,
            output_dir,
            octave_offset,
            prefix,
        } => {
            let overrides = Overrides {
                input,
                output_dir,
                octave_offset,
                prefix,
            };
            run_convert(config, overrides)
        }
        Commands::Extract {
            page,
            output,
            any_table,
        } => run_extract(page, output, any_table),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "ERROR:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

struct Overrides {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    octave_offset: Option<i32>,
    prefix: Option<String>,
}

fn run_convert(config_path: Option<PathBuf>, overrides: Overrides) -> Result<ExitCode, ChordPadsError> {
    let mut config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(input) = overrides.input {
        config.input = input;
    }
    if let Some(output_dir) = overrides.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(octave_offset) = overrides.octave_offset {
        config.octave_offset = octave_offset;
    }
    if let Some(prefix) = overrides.prefix {
        config.product_prefix = prefix;
    }
    config.validate()?;

    let json = fs::read_to_string(&config.input).map_err(|e| ChordPadsError::Io {
        path: config.input.clone(),
        source: e,
    })?;
    // Reject unusable documents before anything is written
    let entries = chordpads::pipeline::parse_library(&json)?;

    let mut sink = DirectorySink::create(&config.output_dir)?;
    let summary = chordpads::pipeline::run_entries(
        entries,
        &config.render_options(),
        &config.naming(),
        &mut sink,
    );

    if summary.is_success() {
        println!(
            "\n{} {} presets in '{}'",
            "Done!".green().bold(),
            summary.written.len(),
            sink.dir().display()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} {} of {} chord sets written to '{}'",
            "Finished with errors:".red().bold(),
            summary.written.len(),
            summary.total(),
            sink.dir().display()
        );
        for (index, error) in &summary.failed {
            println!("  {} position {}: {}", "✗".red(), index, error);
        }
        Ok(ExitCode::FAILURE)
    }
}

fn run_extract(page: PathBuf, output: Option<PathBuf>, any_table: bool) -> Result<ExitCode, ChordPadsError> {
    let html = fs::read_to_string(&page).map_err(|e| ChordPadsError::Io {
        path: page.clone(),
        source: e,
    })?;
    let options = if any_table {
        ExtractOptions::any_table()
    } else {
        ExtractOptions::default()
    };
    let json = chordpads::extract_json(&html, &options)?;

    match output {
        Some(path) => {
            fs::write(&path, &json).map_err(|e| ChordPadsError::Io {
                path: path.clone(),
                source: e,
            })?;
            log::info!("Wrote chord library to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(ExitCode::SUCCESS)
}
