use crate::aggregate::summarize;
use crate::error::{QuarterError, Result};
use crate::git::{find_git_dir, GitRepo};
use crate::model::{AnalysisRun, CommitRecord, QuarterRange, SourceOutcome, SourceReport};
use crate::quarter;
use chrono::{Local, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Validated input of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    user: String,
    quarter: String,
    year: Option<i32>,
    sources: Vec<PathBuf>,
}

impl AnalysisRequest {
    pub fn new(user: impl Into<String>, quarter: impl Into<String>, sources: Vec<PathBuf>) -> Result<Self> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(QuarterError::InvalidInput("user query must not be blank".to_string()));
        }
        if sources.is_empty() {
            return Err(QuarterError::InvalidInput(
                "at least one repository source is required".to_string(),
            ));
        }
        Ok(Self {
            user,
            quarter: quarter.into(),
            year: None,
            sources,
        })
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn quarter(&self) -> &str {
        &self.quarter
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn range_at(&self, now: NaiveDateTime) -> QuarterRange {
        match self.year {
            Some(year) => quarter::resolve_in_year(&self.quarter, year, now),
            None => quarter::resolve(&self.quarter, now),
        }
    }
}

/// Run against the local wall clock.
pub fn run(request: &AnalysisRequest, progress: bool) -> AnalysisRun {
    run_at(request, Local::now().naive_local(), progress)
}

/// Analyze every source in order and fold the results into one summary.
///
/// A source that cannot be located, opened or walked contributes nothing;
/// the run itself never fails.
pub fn run_at(request: &AnalysisRequest, now: NaiveDateTime, progress: bool) -> AnalysisRun {
    let range = request.range_at(now);
    info!(
        "Analyzing {} source(s) for '{}' between {} and {}",
        request.sources.len(),
        request.user,
        range.start,
        range.end
    );

    let pb = if progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} ({pos} commits)")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut records: Vec<CommitRecord> = Vec::new();
    let mut sources = Vec::with_capacity(request.sources.len());

    for source in &request.sources {
        pb.set_message(format!("Walking {}", source.display()));
        let (outcome, mut found) = analyze_source(source, &range, &request.user, &pb);
        records.append(&mut found);
        sources.push(SourceReport {
            source: source.clone(),
            outcome,
        });
    }

    pb.finish_and_clear();

    let summary = summarize(records);
    info!(
        "Collected {} commit(s), {} file change(s), +{} -{}",
        summary.total_commits, summary.total_files, summary.lines_added, summary.lines_deleted
    );

    AnalysisRun {
        range,
        summary,
        sources,
    }
}

/// Locate, open and walk one source.
pub fn analyze_source(
    source: &Path,
    range: &QuarterRange,
    query: &str,
    pb: &ProgressBar,
) -> (SourceOutcome, Vec<CommitRecord>) {
    let Some(git_dir) = find_git_dir(source) else {
        debug!("No repository found under {}", source.display());
        return (SourceOutcome::NoRepository, Vec::new());
    };
    debug!("Located repository metadata at {}", git_dir.display());

    let walked = GitRepo::open(&git_dir).and_then(|repo| repo.walk_quarter(range, query, pb));
    match walked {
        Ok(out) => {
            info!(
                "{}: {} of {} commit(s) matched",
                source.display(),
                out.records.len(),
                out.visited
            );
            let outcome = SourceOutcome::Analyzed {
                root: git_dir,
                commits: out.records.len(),
                diff_failures: out.diff_failures,
            };
            (outcome, out.records)
        }
        Err(e) => {
            warn!("Skipping {}: {e}", source.display());
            (
                SourceOutcome::Failed {
                    reason: e.to_string(),
                },
                Vec::new(),
            )
        }
    }
}
