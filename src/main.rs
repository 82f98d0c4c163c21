//! Print the MIDI settings stored in a Genos container.
//!
//! One text report is written for each setting in the container, named after
//! the setting.
//!
//! ```bash
//! # Reports are written to "MySettings/"
//! genos-midi-settings MySettings.mis
//!
//! # Replace the contents of an existing directory, also keep the raw slots
//! genos-midi-settings MySettings.mis --output dump --clean --raw
//! ```
//!
//! Logging is controlled with `-v` or the `RUST_LOG` environment variable.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use genos_midi_settings::{
    file_stem_for, format_lines, ContainerContext, PresetContainer, SettingRecord,
};

/// Extension used by the instrument for MIDI settings containers.
const CONTAINER_EXTENSION: &str = "mis";

/// Extensions of the files written for each setting. Only these are removed
/// by `--clean`.
const WRITTEN_EXTENSIONS: [&str; 3] = ["txt", "bin", "json"];

/// Width of the labels in the summary printed to the console.
const SUMMARY_LABEL_WIDTH: usize = 27;

/// Print the MIDI settings stored in a Genos container
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// MIDI settings container, usually with a `.mis` extension
    input: PathBuf,

    /// Directory for the reports. Defaults to the input path without its
    /// extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Remove the reports already in the output directory
    #[arg(long)]
    clean: bool,

    /// Also write the raw bytes of each slot
    #[arg(long)]
    raw: bool,

    /// Also write each setting as JSON
    #[arg(long)]
    json: bool,

    /// Log more, can be repeated
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Default, Eq, PartialEq)]
struct Summary {
    written: Vec<PathBuf>,
    failed: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(summary) => {
            if summary.failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Summary> {
    if args.input.extension().and_then(|ext| ext.to_str()) != Some(CONTAINER_EXTENSION) {
        warn!(
            "{} does not have the .{CONTAINER_EXTENSION} extension",
            args.input.display()
        );
    }

    let bytes = fs::read(&args.input)
        .with_context(|| format!("Could not open {}", args.input.display()))?;
    let container = PresetContainer::from_bytes(&bytes)
        .with_context(|| format!("Could not read {}", args.input.display()))?;

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.input));
    prepare_output_dir(&output_dir, args.clean, &args.input)?;
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let mut summary = Summary::default();
    let mut used_stems = HashSet::new();
    for (index, result) in container.decode_all() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                error!("Slot {}: {err}", index + 1);
                summary.failed += 1;
                continue;
            }
        };

        let stem = unique_stem(&record, index, &mut used_stems);
        debug!("Slot {}: writing {stem:?}", index + 1);

        let context = ContainerContext {
            file_name: file_name.clone(),
            ..container.context(index)
        };
        let mut text = format_lines(&record, Some(&context)).join("\n");
        text.push('\n');
        let path = write(&output_dir, &stem, "txt", text.as_bytes())?;
        println!(
            "{:width$} {}",
            "created text printout:",
            path.display(),
            width = SUMMARY_LABEL_WIDTH
        );
        summary.written.push(path);

        if args.raw {
            let path = write(&output_dir, &stem, "bin", &container.slots[index])?;
            summary.written.push(path);
        }

        if args.json {
            let json = serde_json::to_string_pretty(&record)?;
            let path = write(&output_dir, &stem, "json", json.as_bytes())?;
            summary.written.push(path);
        }
    }

    if container.present_slots().next().is_none() {
        println!(
            "{:width$} {}",
            "no settings in:",
            args.input.display(),
            width = SUMMARY_LABEL_WIDTH
        );
    }

    Ok(summary)
}

/// The input path without its extension, or with a `settings` extension if
/// it has none so the directory does not collide with the input.
fn default_output_dir(input: &Path) -> PathBuf {
    if input.extension().is_some() {
        input.with_extension("")
    } else {
        input.with_extension("settings")
    }
}

/// Create the directory. When cleaning, files this tool writes are removed,
/// anything else and the input itself are kept.
fn prepare_output_dir(dir: &Path, clean: bool, input: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create directory {}", dir.display()))?;
    if !clean {
        return Ok(());
    }

    let input = fs::canonicalize(input).ok();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_report_file(&path) {
            continue;
        }
        if input.is_some() && fs::canonicalize(&path).ok() == input {
            debug!("Keeping the input {}", path.display());
            continue;
        }
        debug!("Removing {}", path.display());
        fs::remove_file(&path)
            .with_context(|| format!("Could not remove {}", path.display()))?;
    }
    Ok(())
}

fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| WRITTEN_EXTENSIONS.contains(&ext))
}

/// The file name stem for a setting. Unnamed settings are named after their
/// slot and repeated names get the slot number appended.
fn unique_stem(record: &SettingRecord, index: usize, used: &mut HashSet<String>) -> String {
    let mut stem = file_stem_for(record.name());
    if stem.is_empty() {
        stem = format!("Slot {}", index + 1);
    }
    if !used.insert(stem.clone()) {
        stem = format!("{stem} ({})", index + 1);
        used.insert(stem.clone());
    }
    stem
}

fn write(dir: &Path, stem: &str, extension: &str, contents: &[u8]) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}.{extension}"));
    fs::write(&path, contents).with_context(|| format!("Could not write {}", path.display()))?;
    Ok(path)
}
