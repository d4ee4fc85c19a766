use crate::error::Result;
use crate::model::DiffStats;
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{ObjectId, Repository};
use similar::{DiffTag, TextDiff};

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8192;

/// Change statistics of `commit` against its first parent.
///
/// Root commits yield zero without touching any tree. Parents after the first
/// are ignored, so changes introduced only by a merge are not counted.
pub fn first_parent_stats(repo: &Repository, commit: &gix::Commit<'_>) -> Result<DiffStats> {
    let Some(parent_id) = commit.parent_ids().next().map(|id| id.detach()) else {
        return Ok(DiffStats::zero());
    };

    let commit_tree = commit.tree()?;
    let parent_tree = repo.find_commit(parent_id)?.tree()?;

    let changes: Vec<ChangeDetached> =
        repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?;

    let mut stats = DiffStats::zero();
    for change in changes {
        tally_change(repo, change, &mut stats)?;
    }
    Ok(stats)
}

fn tally_change(repo: &Repository, change: ChangeDetached, stats: &mut DiffStats) -> Result<()> {
    match change {
        ChangeDetached::Addition { entry_mode, id, .. } => {
            if !entry_mode.is_tree() {
                let new = blob_data(repo, entry_mode, id)?;
                record(stats, &[], &new);
            }
        }
        ChangeDetached::Deletion { entry_mode, id, .. } => {
            if !entry_mode.is_tree() {
                let old = blob_data(repo, entry_mode, id)?;
                record(stats, &old, &[]);
            }
        }
        ChangeDetached::Modification {
            previous_entry_mode,
            previous_id,
            entry_mode,
            id,
            ..
        } => match (previous_entry_mode.is_tree(), entry_mode.is_tree()) {
            (true, true) => {}
            (false, true) => {
                let old = blob_data(repo, previous_entry_mode, previous_id)?;
                record(stats, &old, &[]);
            }
            (true, false) => {
                let new = blob_data(repo, entry_mode, id)?;
                record(stats, &[], &new);
            }
            (false, false) => {
                let old = blob_data(repo, previous_entry_mode, previous_id)?;
                let new = blob_data(repo, entry_mode, id)?;
                record(stats, &old, &new);
            }
        },
        ChangeDetached::Rewrite {
            source_entry_mode,
            source_id,
            entry_mode,
            id,
            copy,
            ..
        } => {
            if entry_mode.is_tree() {
                return Ok(());
            }
            // Without rename detection a move is a deletion plus an addition;
            // a copy only adds the new path.
            let new = blob_data(repo, entry_mode, id)?;
            if !copy {
                let old = blob_data(repo, source_entry_mode, source_id)?;
                record(stats, &old, &[]);
            }
            record(stats, &[], &new);
        }
    }
    Ok(())
}

fn record(stats: &mut DiffStats, old: &[u8], new: &[u8]) {
    let (insertions, deletions) = line_edits(old, new);
    stats.files_changed += 1;
    stats.insertions += insertions;
    stats.deletions += deletions;
}

/// Submodule entries point at commits in another repository and have no blob;
/// they diff as their one-line `Subproject commit <id>` text.
fn blob_data(repo: &Repository, mode: EntryMode, id: ObjectId) -> Result<Vec<u8>> {
    if mode.is_commit() {
        return Ok(gitlink_text(id));
    }
    Ok(repo.find_object(id)?.detach().data)
}

fn gitlink_text(id: ObjectId) -> Vec<u8> {
    format!("Subproject commit {id}\n").into_bytes()
}

pub fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Sum of `(inserted, deleted)` line counts over every edit between `old` and
/// `new`. Binary content on either side contributes no edits.
pub fn line_edits(old: &[u8], new: &[u8]) -> (u32, u32) {
    if is_binary(old) || is_binary(new) {
        return (0, 0);
    }

    let old_text = String::from_utf8_lossy(old);
    let new_text = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(&*old_text, &*new_text);

    let mut insertions = 0usize;
    let mut deletions = 0usize;
    for op in diff.ops() {
        if op.tag() == DiffTag::Equal {
            continue;
        }
        insertions += op.new_range().len();
        deletions += op.old_range().len();
    }

    (insertions as u32, deletions as u32)
}
