//! Track Language Corrector command line application.
//!
//! Scans a folder (or one file) for Matroska tracks with missing language
//! tags, fixes what it can decide and prints a summary of changes and
//! issues.
//!
//! Usage:
//!   track-lang-corrector --path /anime/Show
//!   track-lang-corrector --file "/anime/Show/Show - 01.mkv" --verbose

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tlc_core::config::{ConfigManager, Settings};
use tlc_core::container::{MkvToolnix, ScratchArea};
use tlc_core::detection::FastTextOracle;
use tlc_core::extraction::SubtitleEditConverter;
use tlc_core::logging::{init_tracing, LogLevel};
use tlc_core::notify::{self, Notifier};
use tlc_core::orchestrator::{run, Collaborators, FileFilter, Target};

#[derive(Parser, Debug)]
#[command(name = "track-lang-corrector")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["path", "file"])))]
struct Cli {
    /// Folder to scan recursively for files to fix
    #[arg(long)]
    path: Option<PathBuf>,

    /// Single file to fix (its folder still supplies comparison files)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Discord webhook URL for change and issue notifications
    #[arg(long)]
    webhook: Option<String>,

    /// Percentage of subtitle lines that must agree before a language is written
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    lang_match_percentage: Option<u32>,

    /// Folder containing SubtitleEdit, used to OCR image subtitles
    #[arg(long)]
    se_path: Option<String>,

    /// fasttext language identification model
    #[arg(long)]
    model: Option<String>,

    /// Scratch folder for extracted subtitles
    #[arg(long)]
    scratch_dir: Option<String>,

    /// Config file, created with defaults if missing
    #[arg(long, default_value = "settings.toml")]
    config: PathBuf,

    /// Debug level console logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn target(&self) -> Target {
        match (&self.path, &self.file) {
            (Some(path), _) => Target::Directory(path.clone()),
            (None, Some(file)) => Target::File(file.clone()),
            // clap's group guarantees one of them
            (None, None) => Target::Directory(PathBuf::from(".")),
        }
    }

    /// Flag values win over the config file for this run only.
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(url) = &self.webhook {
            settings.notify.webhook_url = url.clone();
        }
        if let Some(pct) = self.lang_match_percentage {
            settings.detection.required_match_pct = pct;
        }
        if let Some(dir) = &self.se_path {
            settings.paths.subtitle_edit_dir = dir.clone();
        }
        if let Some(model) = &self.model {
            settings.paths.fasttext_model = model.clone();
        }
        if let Some(dir) = &self.scratch_dir {
            settings.paths.scratch_dir = dir.clone();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    let mut settings = config.into_settings();
    cli.apply_overrides(&mut settings);
    settings.validate().context("Invalid settings")?;

    let level = if cli.verbose { LogLevel::Debug } else { settings.logging.level };
    init_tracing(level);
    tracing::debug!("Using config {}", cli.config.display());

    let filter = FileFilter::from(&settings.scan);
    let files = cli.target().files(&filter).context("Nothing to process")?;
    tracing::info!("{} file(s) to process", files.len());

    let scratch = ScratchArea::new(settings.paths.scratch_path());
    scratch
        .ensure()
        .with_context(|| format!("Cannot create scratch folder {}", scratch.dir().display()))?;
    let converter = SubtitleEditConverter::new(&settings.paths.subtitle_edit_dir);
    let mkv = MkvToolnix::new(scratch, converter);
    let oracle = FastTextOracle::new(&settings.paths.fasttext_bin, &settings.paths.fasttext_model);
    let notifier = notify::from_webhook_url(&settings.notify.webhook_url);

    let tools = Collaborators {
        reader: &mkv,
        writer: &mkv,
        source: &mkv,
        oracle: &oracle,
    };
    let report = run(&settings, &files, tools, notifier.as_ref());

    let summary = report.summary_lines();
    for line in &summary {
        println!("{}", line);
    }
    notifier.notify(&summary.join("\n"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_target_is_required() {
        assert!(Cli::try_parse_from(["track-lang-corrector"]).is_err());
        assert!(Cli::try_parse_from(["track-lang-corrector", "--path", "a", "--file", "b.mkv"]).is_err());

        let cli = Cli::try_parse_from(["track-lang-corrector", "--file", "b.mkv"]).unwrap();
        assert!(matches!(cli.target(), Target::File(p) if p == PathBuf::from("b.mkv")));
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "track-lang-corrector",
            "--path",
            "/anime",
            "--lang-match-percentage",
            "85",
            "--model",
            "lid.bin",
            "--webhook",
            "https://example.invalid/hook",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);

        assert_eq!(settings.detection.required_match_pct, 85);
        assert_eq!(settings.paths.fasttext_model, "lid.bin");
        assert_eq!(settings.notify.webhook_url, "https://example.invalid/hook");
        assert_eq!(settings.paths.subtitle_edit_dir, Settings::default().paths.subtitle_edit_dir);
    }

    #[test]
    fn match_percentage_must_be_in_range() {
        assert!(Cli::try_parse_from(["track-lang-corrector", "--path", "a", "--lang-match-percentage", "0"]).is_err());
        assert!(Cli::try_parse_from(["track-lang-corrector", "--path", "a", "--lang-match-percentage", "101"]).is_err());
    }
}
