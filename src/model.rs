use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const SCHEMA_VERSION: u32 = 1;

/// Inclusive local wall-clock window a commit must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl QuarterRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        if timestamp < &self.start {
            return false;
        }
        if timestamp > &self.end {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

impl DiffStats {
    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

impl CommitRecord {
    pub fn date_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_commits: u64,
    pub total_files: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub commits_by_date: BTreeMap<String, u64>,
    pub commits: Vec<CommitRecord>,
}

/// What one repository source contributed to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
    Analyzed {
        root: PathBuf,
        commits: usize,
        diff_failures: usize,
    },
    NoRepository,
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: PathBuf,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub range: QuarterRange,
    pub summary: AnalysisSummary,
    pub sources: Vec<SourceReport>,
}

impl AnalysisRun {
    pub fn failed_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| matches!(s.outcome, SourceOutcome::Failed { .. }))
            .count()
    }

    pub fn diff_failures(&self) -> usize {
        self.sources
            .iter()
            .map(|s| match s.outcome {
                SourceOutcome::Analyzed { diff_failures, .. } => diff_failures,
                _ => 0,
            })
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub user: String,
    pub quarter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub range: QuarterRange,
    pub summary: AnalysisSummary,
    pub sources: Vec<SourceReport>,
}

/// Header row of a persisted analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: i64,
    pub user: String,
    pub quarter: String,
    pub created_at: DateTime<Utc>,
    pub total_commits: u64,
    pub total_files: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub commits_by_date: BTreeMap<String, u64>,
    pub range: QuarterRange,
}
