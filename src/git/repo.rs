use crate::error::{QuarterError, Result};
use crate::git::diff::first_parent_stats;
use crate::identity;
use crate::model::{CommitRecord, DiffStats, QuarterRange};
use chrono::{DateTime, Local};
use gix::{ObjectId, Repository};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

/// Commits collected from one repository.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub records: Vec<CommitRecord>,
    pub visited: usize,
    pub diff_failures: usize,
}

impl GitRepo {
    /// Open the repository whose metadata directory is `git_dir`.
    pub fn open<P: AsRef<Path>>(git_dir: P) -> Result<Self> {
        let repo = gix::open(git_dir.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        Ok(Self { repo, path })
    }

    /// Walk every commit reachable from `HEAD` and keep those inside `range`
    /// whose author matches `query`.
    ///
    /// A commit whose diff cannot be computed is kept with zero stats and
    /// counted in [`WalkOutput::diff_failures`]. In a shallow clone the walk
    /// stops at the shallow boundary.
    pub fn walk_quarter(
        &self,
        range: &QuarterRange,
        query: &str,
        pb: &ProgressBar,
    ) -> Result<WalkOutput> {
        let mut out = WalkOutput::default();

        let mut head = self.repo.head()?;
        if head.is_unborn() {
            debug!("{} has an unborn HEAD", self.path.display());
            return Ok(out);
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let shallow: HashSet<ObjectId> = self
            .repo
            .shallow_commits()?
            .map(|commits| commits.iter().copied().collect())
            .unwrap_or_default();
        if !shallow.is_empty() {
            debug!(
                "{} is shallow with {} boundary commit(s)",
                self.path.display(),
                shallow.len()
            );
        }

        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = vec![head_commit.id];

        while let Some(commit_id) = stack.pop() {
            if !seen.insert(commit_id) {
                continue;
            }
            out.visited += 1;
            pb.inc(1);

            let commit = self.repo.find_commit(commit_id)?;
            // parents of a shallow boundary are not stored locally
            if !shallow.contains(&commit_id) {
                stack.extend(commit.parent_ids().map(|id| id.detach()));
            }

            let author = commit.author()?;
            let secs = author
                .time()
                .map_err(|e| QuarterError::InvalidDate(format!("{commit_id}: {e}")))?
                .seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| QuarterError::InvalidDate(format!("Invalid timestamp: {secs}")))?
                .with_timezone(&Local);

            if !range.contains(&timestamp.naive_local()) {
                continue;
            }

            let author_name = author.name.to_string();
            let author_email = author.email.to_string();
            if !identity::matches(&author_name, &author_email, query) {
                continue;
            }

            let stats = match first_parent_stats(&self.repo, &commit) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!("Diff failed for {commit_id} in {}: {e}", self.path.display());
                    out.diff_failures += 1;
                    DiffStats::zero()
                }
            };

            out.records.push(CommitRecord {
                hash: commit_id.to_string(),
                author_name,
                author_email,
                timestamp,
                message: commit.message_raw()?.to_string().trim_end().to_string(),
                files_changed: stats.files_changed,
                insertions: stats.insertions,
                deletions: stats.deletions,
            });
        }

        out.records
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.hash.cmp(&b.hash)));
        Ok(out)
    }
}
