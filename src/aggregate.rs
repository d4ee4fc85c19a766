use crate::model::{AnalysisSummary, CommitRecord};
use std::collections::BTreeMap;

/// Fold every collected record into one summary, keeping the records in the
/// order they were supplied.
pub fn summarize(commits: Vec<CommitRecord>) -> AnalysisSummary {
    let mut commits_by_date: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_files = 0u64;
    let mut lines_added = 0u64;
    let mut lines_deleted = 0u64;

    for record in &commits {
        total_files += record.files_changed as u64;
        lines_added += record.insertions as u64;
        lines_deleted += record.deletions as u64;
        *commits_by_date.entry(record.date_key()).or_insert(0) += 1;
    }

    AnalysisSummary {
        total_commits: commits.len() as u64,
        total_files,
        lines_added,
        lines_deleted,
        commits_by_date,
        commits,
    }
}
