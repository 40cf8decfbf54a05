//! Per-run bookkeeping of non-fatal problems and the end-of-run report.

use std::fmt::Write as _;

/// Category of a recorded problem, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// An output already existed, nothing was produced.
    Skipped,
    /// The URL was dropped before any file was produced.
    Abandoned,
    Rename,
    Transcode,
    Move,
    Delete,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 6] = [
        ProblemKind::Skipped,
        ProblemKind::Abandoned,
        ProblemKind::Rename,
        ProblemKind::Transcode,
        ProblemKind::Move,
        ProblemKind::Delete,
    ];

    fn heading(&self) -> &'static str {
        match self {
            ProblemKind::Skipped => "Not converted, an output file already existed",
            ProblemKind::Abandoned => "Not processed",
            ProblemKind::Rename => "Could not rename after translation",
            ProblemKind::Transcode => "Could not convert to mp3",
            ProblemKind::Move => "Could not move to the output directory",
            ProblemKind::Delete => "Could not delete working files",
        }
    }

    fn remedy(&self) -> &'static [&'static str] {
        match self {
            ProblemKind::Skipped => &[],
            ProblemKind::Abandoned => &[
                "Check the URL is a valid video link and that yt-dlp can download it.",
            ],
            ProblemKind::Rename => &[
                "Please double check that you have an output for this URL.",
                "Ensure the working directory is empty and try converting it again.",
            ],
            ProblemKind::Transcode => &[
                "Check that ffmpeg is installed and the downloaded file is not corrupt.",
                "Ensure the working directory is empty and try converting it again.",
            ],
            ProblemKind::Move => &[
                "A copy of this song might already exist in the output directory.",
                "If there is no output, move the file by hand or empty the working directory and try again.",
            ],
            ProblemKind::Delete => &[
                "If there are any files remaining in the working directory, please delete them.",
            ],
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemKind::Skipped => write!(f, "skip"),
            ProblemKind::Abandoned => write!(f, "abandoned"),
            ProblemKind::Rename => write!(f, "rename"),
            ProblemKind::Transcode => write!(f, "transcode"),
            ProblemKind::Move => write!(f, "move"),
            ProblemKind::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRecord {
    pub kind: ProblemKind,
    pub url: String,
    pub detail: Option<String>,
}

/// Append-only log of problems for one batch run.
#[derive(Debug, Clone, Default)]
pub struct ProblemReport {
    records: Vec<ProblemRecord>,
}

impl ProblemReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ProblemKind, url: &str, detail: Option<String>) {
        self.records.push(ProblemRecord {
            kind,
            url: url.to_string(),
            detail,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records of one category in insertion order.
    pub fn of_kind(&self, kind: ProblemKind) -> impl Iterator<Item = &ProblemRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn count(&self, kind: ProblemKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Human-readable report grouped by category. Empty when nothing was recorded.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for kind in ProblemKind::ALL {
            let records: Vec<&ProblemRecord> = self.of_kind(kind).collect();
            if records.is_empty() {
                continue;
            }

            let _ = writeln!(out, "{} ({}):", kind.heading(), records.len());
            for record in records {
                let _ = writeln!(out, "  {}", record.url);
                if let Some(ref detail) = record.detail {
                    let _ = writeln!(out, "    {}", detail);
                }
            }
            for line in kind.remedy() {
                let _ = writeln!(out, "  > {}", line);
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_renders_nothing() {
        let report = ProblemReport::new();
        assert!(report.is_empty());
        assert_eq!(report.render(), "");
    }

    #[test]
    fn test_insertion_order_within_category() {
        let mut report = ProblemReport::new();
        report.record(ProblemKind::Move, "https://a", Some("first".into()));
        report.record(ProblemKind::Skipped, "https://b", None);
        report.record(ProblemKind::Move, "https://c", Some("second".into()));
        report.record(ProblemKind::Move, "https://a", Some("first".into()));

        let moves: Vec<_> = report.of_kind(ProblemKind::Move).map(|r| r.url.as_str()).collect();
        assert_eq!(moves, vec!["https://a", "https://c", "https://a"]);
        assert_eq!(report.len(), 4);
        assert_eq!(report.count(ProblemKind::Skipped), 1);
    }

    #[test]
    fn test_render_sections() {
        let mut report = ProblemReport::new();
        report.record(ProblemKind::Delete, "https://d", Some("permission denied".into()));
        report.record(ProblemKind::Skipped, "https://s", None);

        let text = report.render();
        let skip_pos = text.find("already existed").unwrap();
        let delete_pos = text.find("delete working files").unwrap();
        assert!(skip_pos < delete_pos);
        assert!(text.contains("  https://s\n"));
        assert!(text.contains("    permission denied\n"));
        assert!(text.contains("please delete them"));
        assert!(!text.contains("rename"));
        assert!(!text.contains("output directory."));
    }

    #[test]
    fn test_kind_display() {
        let names: Vec<String> = ProblemKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec!["skip", "abandoned", "rename", "transcode", "move", "delete"]
        );
    }
}
