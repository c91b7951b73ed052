//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field carries a serde default so partial files load cleanly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::manager::{ConfigError, ConfigResult};
use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Tool and working paths.
    #[serde(default)]
    pub paths: PathSettings,

    /// Thresholds and limits for the decision engine.
    #[serde(default)]
    pub detection: DetectionSettings,

    /// Language pair, keyword candidates and annotation keywords.
    #[serde(default)]
    pub languages: LanguageSettings,

    /// Directory scan filters.
    #[serde(default)]
    pub scan: ScanSettings,

    /// External notification settings.
    #[serde(default)]
    pub notify: NotifySettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let d = &self.detection;
        if d.required_match_pct == 0 || d.required_match_pct > 100 {
            return Err(ConfigError::Invalid(format!(
                "required_match_pct must be within 1..=100, got {}",
                d.required_match_pct
            )));
        }
        if d.duplicate_floor_pct < 0.0 || d.duplicate_floor_pct >= f64::from(d.required_match_pct) {
            return Err(ConfigError::Invalid(format!(
                "duplicate_floor_pct ({}) must be >= 0 and below required_match_pct ({})",
                d.duplicate_floor_pct, d.required_match_pct
            )));
        }

        let l = &self.languages;
        if l.primary.trim().is_empty() || l.secondary.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "primary and secondary languages must be set".to_string(),
            ));
        }
        if crate::detection::languages::same_language(&l.primary, &l.secondary) {
            return Err(ConfigError::Invalid(format!(
                "primary and secondary languages must differ (both '{}')",
                l.primary
            )));
        }
        Ok(())
    }
}

/// Tool and working paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Scratch folder for extracted subtitle files. Cleared before and after each file.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,

    /// Folder containing SubtitleEdit.exe (used to OCR image subtitles).
    #[serde(default = "default_subtitle_edit_dir")]
    pub subtitle_edit_dir: String,

    /// fasttext executable.
    #[serde(default = "default_fasttext_bin")]
    pub fasttext_bin: String,

    /// fasttext language identification model.
    #[serde(default = "default_fasttext_model")]
    pub fasttext_model: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_scratch_dir() -> String {
    std::env::temp_dir()
        .join("subs_test")
        .to_string_lossy()
        .to_string()
}

fn default_subtitle_edit_dir() -> String {
    "se".to_string()
}

fn default_fasttext_bin() -> String {
    "fasttext".to_string()
}

fn default_fasttext_model() -> String {
    "lid.176.bin".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            subtitle_edit_dir: default_subtitle_edit_dir(),
            fasttext_bin: default_fasttext_bin(),
            fasttext_model: default_fasttext_model(),
            logs_folder: default_logs_folder(),
        }
    }
}

impl PathSettings {
    /// Scratch folder as a path.
    pub fn scratch_path(&self) -> PathBuf {
        PathBuf::from(&self.scratch_dir)
    }
}

/// Thresholds and limits for the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Support percentage the majority label needs before a write is issued.
    #[serde(default = "default_required_match_pct")]
    pub required_match_pct: u32,

    /// Support percentage at or above which an inconclusive vote triggers
    /// duplicate-assisted disambiguation instead of outright rejection.
    #[serde(default = "default_duplicate_floor_pct")]
    pub duplicate_floor_pct: f64,

    /// Normalized lines of this many characters or fewer are discarded.
    #[serde(default = "default_min_line_length")]
    pub min_line_length: usize,

    /// Maximum number of sibling files used for comparison.
    #[serde(default = "default_comparison_file_limit")]
    pub comparison_file_limit: usize,

    /// Image-codec extractions allowed when comparing against tracks of the same file.
    #[serde(default = "default_internal_image_cap")]
    pub internal_image_codec_cap: usize,

    /// Image-codec extractions allowed per sibling file.
    #[serde(default = "default_sibling_image_cap")]
    pub sibling_image_codec_cap: usize,

    /// A comparison track must remove more than this many lines before a re-vote.
    #[serde(default = "default_min_duplicates_removed")]
    pub min_duplicates_removed: usize,

    /// Declared languages that mark a track as needing inference.
    #[serde(default = "default_languages_to_check")]
    pub languages_to_check: Vec<String>,
}

fn default_required_match_pct() -> u32 {
    70
}

fn default_duplicate_floor_pct() -> f64 {
    10.0
}

fn default_min_line_length() -> usize {
    4
}

fn default_comparison_file_limit() -> usize {
    3
}

fn default_internal_image_cap() -> usize {
    2
}

fn default_sibling_image_cap() -> usize {
    4
}

fn default_min_duplicates_removed() -> usize {
    1
}

fn default_languages_to_check() -> Vec<String> {
    vec!["zxx".to_string(), "und".to_string()]
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            required_match_pct: default_required_match_pct(),
            duplicate_floor_pct: default_duplicate_floor_pct(),
            min_line_length: default_min_line_length(),
            comparison_file_limit: default_comparison_file_limit(),
            internal_image_codec_cap: default_internal_image_cap(),
            sibling_image_codec_cap: default_sibling_image_cap(),
            min_duplicates_removed: default_min_duplicates_removed(),
            languages_to_check: default_languages_to_check(),
        }
    }
}

/// Language pair, keyword candidates and annotation keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSettings {
    /// Original-content language.
    #[serde(default = "default_primary")]
    pub primary: String,

    /// Translation language, assigned by elimination.
    #[serde(default = "default_secondary")]
    pub secondary: String,

    /// Candidate codes for track-name keyword matching, most common first.
    #[serde(default = "default_keyword_candidates")]
    pub keyword_candidates: Vec<String>,

    /// Track-name keywords marking signs/songs-only tracks.
    #[serde(default = "default_annotation_keywords")]
    pub annotation_keywords: Vec<String>,

    /// Also match two-letter ISO 639-1 codes as whole words in track names.
    #[serde(default = "default_true")]
    pub match_two_letter_codes: bool,
}

fn default_primary() -> String {
    "jpn".to_string()
}

fn default_secondary() -> String {
    "eng".to_string()
}

fn default_keyword_candidates() -> Vec<String> {
    [
        "eng", "jpn", "spa", "por", "fra", "deu", "ita", "kor", "pol", "rus", "swe", "tur",
        "vie", "ara", "heb", "cat", "ces", "dan", "ell", "fin", "hun", "ind", "nor", "nld",
        "ron", "slk", "slv", "srp", "ukr", "zho",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_annotation_keywords() -> Vec<String> {
    ["sign", "music", "song", "s&s"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            keyword_candidates: default_keyword_candidates(),
            annotation_keywords: default_annotation_keywords(),
            match_two_letter_codes: true,
        }
    }
}

/// Directory scan filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Folder names skipped entirely during a recursive scan.
    #[serde(default)]
    pub ignored_folder_names: Vec<String>,

    /// Files whose name contains one of these (case-insensitive) are skipped.
    #[serde(default = "default_skip_keywords")]
    pub skip_name_keywords: Vec<String>,

    /// Container extension to process.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_skip_keywords() -> Vec<String> {
    vec!["trailer".to_string()]
}

fn default_extension() -> String {
    "mkv".to_string()
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            ignored_folder_names: Vec::new(),
            skip_name_keywords: default_skip_keywords(),
            extension: default_extension(),
        }
    }
}

/// External notification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Discord webhook URL. Empty disables notifications.
    #[serde(default)]
    pub webhook_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Write a per-run log file into the logs folder.
    #[serde(default = "default_true")]
    pub write_run_log: bool,

    /// Show timestamps in run log lines.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            write_run_log: true,
            show_timestamps: true,
        }
    }
}

/// Names of config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Detection,
    Languages,
    Scan,
    Notify,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[
            Self::Paths,
            Self::Detection,
            Self::Languages,
            Self::Scan,
            Self::Notify,
            Self::Logging,
        ]
    }

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Detection => "detection",
            ConfigSection::Languages => "languages",
            ConfigSection::Scan => "scan",
            ConfigSection::Notify => "notify",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Tool locations and working directories",
            ConfigSection::Detection => "# Decision thresholds and comparison limits",
            ConfigSection::Languages => "# Expected language pair and track-name keywords",
            ConfigSection::Scan => "# Directory scan filters",
            ConfigSection::Notify => "# Discord webhook notifications",
            ConfigSection::Logging => "# Logging",
        }
    }
}
