//! Run results and the reporting sink.
//!
//! Nothing here is global: the controller pushes into a [`Reporter`], which
//! mirrors each item to tracing, the run log and the notifier, and the run
//! returns the finished [`RunReport`].

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::logging::{MessagePrefix, RunLog};
use crate::models::{Confidence, EvidenceKind, TrackType};
use crate::notify::Notifier;

/// Issue taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Unreadable file, unsupported container, missing track name.
    Input,
    /// External tool exited with an error.
    Tool,
    /// Classifier failures.
    Oracle,
    /// Every signal exhausted without reaching the threshold. Not an error.
    Inconclusive,
}

impl IssueKind {
    fn prefix(&self) -> MessagePrefix {
        match self {
            IssueKind::Inconclusive => MessagePrefix::Unresolved,
            IssueKind::Oracle => MessagePrefix::Warning,
            IssueKind::Input | IssueKind::Tool => MessagePrefix::Error,
        }
    }
}

/// A track or file that needs manual attention.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub path: PathBuf,
    pub track_id: Option<usize>,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(path: &Path, track_id: Option<usize>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            track_id,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.track_id {
            Some(id) => write!(f, "{} (track {}): {}", self.path.display(), id, self.message),
            None => write!(f, "{}: {}", self.path.display(), self.message),
        }
    }
}

/// A language tag that was written.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub path: PathBuf,
    pub track_id: usize,
    pub track_type: TrackType,
    pub from_language: String,
    pub to_language: String,
    pub evidence: EvidenceKind,
    pub confidence: Confidence,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (track {} [{}]): {} -> {} by {} ({})",
            self.path.display(),
            self.track_id,
            self.track_type,
            self.from_language,
            self.to_language,
            self.evidence,
            self.confidence
        )
    }
}

/// Result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub files_processed: usize,
    pub changes: Vec<ChangeRecord>,
    pub issues: Vec<Issue>,
}

impl RunReport {
    fn started_now() -> Self {
        let now = Local::now();
        Self {
            started_at: now,
            finished_at: now,
            files_processed: 0,
            changes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Human-readable end-of-run summary, one line per entry.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(MessagePrefix::Section.format("Issues"));
        if self.issues.is_empty() {
            lines.push("None".to_string());
        }
        lines.extend(self.issues.iter().map(|i| i.kind.prefix().format(&i.to_string())));

        lines.push(MessagePrefix::Section.format("Changes"));
        if self.changes.is_empty() {
            lines.push("None".to_string());
        }
        lines.extend(self.changes.iter().map(|c| MessagePrefix::Changed.format(&c.to_string())));

        lines.push(format!(
            "Processed {} files: {} changes, {} issues",
            self.files_processed,
            self.changes.len(),
            self.issues.len()
        ));
        lines.push(format!("Total execution time: {}", format_duration(self.duration())));
        lines
    }
}

/// `1h 02m 03s`, `2m 05s` or `4.2s`.
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_ms = duration.num_milliseconds().max(0);
    let secs = total_ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{:.1}s", total_ms as f64 / 1000.0)
    }
}

/// Collects the run's changes and issues and mirrors each one as it arrives.
pub struct Reporter<'a> {
    report: RunReport,
    notifier: &'a dyn Notifier,
    run_log: Option<RunLog>,
}

impl<'a> Reporter<'a> {
    pub fn new(notifier: &'a dyn Notifier, run_log: Option<RunLog>) -> Self {
        Self {
            report: RunReport::started_now(),
            notifier,
            run_log,
        }
    }

    /// Progress message: tracing and the run log only.
    pub fn note(&mut self, prefix: MessagePrefix, message: &str) {
        tracing::info!("{}", message);
        if let Some(log) = self.run_log.as_mut() {
            log.line(&prefix.format(message));
        }
    }

    pub fn file_processed(&mut self) {
        self.report.files_processed += 1;
    }

    pub fn change(&mut self, record: ChangeRecord) {
        let line = MessagePrefix::Changed.format(&record.to_string());
        tracing::info!("{}", line);
        self.emit(&line);
        self.report.changes.push(record);
    }

    pub fn issue(&mut self, issue: Issue) {
        let line = issue.kind.prefix().format(&issue.to_string());
        match issue.kind {
            IssueKind::Inconclusive => tracing::warn!("{}", line),
            IssueKind::Oracle => tracing::warn!("{}", line),
            IssueKind::Input | IssueKind::Tool => tracing::error!("{}", line),
        }
        self.emit(&line);
        self.report.issues.push(issue);
    }

    fn emit(&mut self, line: &str) {
        if let Some(log) = self.run_log.as_mut() {
            log.line(line);
        }
        self.notifier.notify(line);
    }

    /// Stamp the end time and hand back the report.
    pub fn finish(mut self) -> RunReport {
        self.report.finished_at = Local::now();
        if let Some(log) = self.run_log.as_mut() {
            for line in self.report.summary_lines() {
                log.line(&line);
            }
            log.close();
        }
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct Recording(RefCell<Vec<String>>);

    impl Notifier for Recording {
        fn notify(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn change() -> ChangeRecord {
        ChangeRecord {
            path: PathBuf::from("/anime/ep01.mkv"),
            track_id: 2,
            track_type: TrackType::Subtitles,
            from_language: "und".into(),
            to_language: "eng".into(),
            evidence: EvidenceKind::Classification,
            confidence: Confidence::Support(80.0),
        }
    }

    #[test]
    fn reporter_mirrors_items_to_notifier_and_log() {
        let dir = tempdir().unwrap();
        let notifier = Recording::default();
        let log = RunLog::create(dir.path(), false).unwrap();
        let log_path = log.log_path().to_path_buf();

        let mut reporter = Reporter::new(&notifier, Some(log));
        reporter.change(change());
        reporter.issue(Issue::new(
            Path::new("/anime/ep02.mkv"),
            Some(3),
            IssueKind::Inconclusive,
            "Subtitle match below 70%, no match found",
        ));
        reporter.note(MessagePrefix::Section, "ep03.mkv");
        let report = reporter.finish();

        assert_eq!(report.changes.len(), 1);
        assert_eq!(report.issues_of(IssueKind::Inconclusive).count(), 1);

        let sent = notifier.0.borrow();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("[CHANGED] /anime/ep01.mkv (track 2 [subtitles]): und -> eng by classification (80.0%)"));
        assert!(sent[1].starts_with("[UNRESOLVED] /anime/ep02.mkv (track 3)"));

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("--- ep03.mkv ---"));
        assert!(content.contains("Total execution time"));
    }

    #[test]
    fn summary_lists_sections() {
        let notifier = crate::notify::NullNotifier;
        let mut reporter = Reporter::new(&notifier, None);
        reporter.file_processed();
        reporter.change(change());
        let lines = reporter.finish().summary_lines();

        assert_eq!(lines[0], "--- Issues ---");
        assert_eq!(lines[1], "None");
        assert_eq!(lines[2], "--- Changes ---");
        assert!(lines[3].starts_with("[CHANGED]"));
        assert_eq!(lines[4], "Processed 1 files: 1 changes, 0 issues");
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(chrono::Duration::milliseconds(4200)), "4.2s");
        assert_eq!(format_duration(chrono::Duration::seconds(125)), "2m 05s");
        assert_eq!(format_duration(chrono::Duration::seconds(3723)), "1h 02m 03s");
    }
}
