mod support;

use gquarter::{run, AnalysisRequest, AnalysisRun, SourceOutcome};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use support::*;
use tempfile::tempdir;

fn analyze(user: &str, quarter: &str, sources: Vec<PathBuf>) -> AnalysisRun {
    let request = AnalysisRequest::new(user, quarter, sources)
        .unwrap()
        .with_year(2024);
    run(&request, false)
}

#[test]
fn three_commit_scenario_totals() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    three_commit_repo(dir.path());

    let run = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    let summary = &run.summary;

    assert_eq!(summary.total_commits, 3);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.lines_added, 10);
    assert_eq!(summary.lines_deleted, 5);

    let days: Vec<(String, u64)> = summary
        .commits_by_date
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    assert_eq!(
        days,
        vec![("2024-02-10".to_string(), 2), ("2024-02-12".to_string(), 1)]
    );

    let messages: Vec<&str> = summary.commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["C3 drop five lines", "C2 add ten lines", "C1 root"]);
    for record in &summary.commits {
        assert_eq!(record.hash.len(), 40);
        assert!(record.hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(record.author_name, USER_NAME);
        assert_eq!(record.author_email, USER_EMAIL);
    }
    assert!(matches!(
        run.sources[0].outcome,
        SourceOutcome::Analyzed { commits: 3, diff_failures: 0, .. }
    ));
}

#[test]
fn root_commit_has_zero_stats() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "big.txt", lines(50, "x").as_bytes());
    write_file(dir.path(), "other.txt", b"y\n");
    commit(dir.path(), "2024-03-01T10:00:00", "root");

    let run = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    let record = &run.summary.commits[0];
    assert_eq!(run.summary.total_commits, 1);
    assert_eq!(
        (record.files_changed, record.insertions, record.deletions),
        (0, 0, 0)
    );
}

#[test]
fn quarter_boundaries_are_inclusive() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "f.txt", b"0\n");
    commit(dir.path(), "2023-12-31T23:59:59", "before start");
    write_file(dir.path(), "f.txt", b"1\n");
    commit(dir.path(), "2024-01-01T00:00:00", "at start");
    write_file(dir.path(), "f.txt", b"2\n");
    commit(dir.path(), "2024-03-31T23:59:00", "at end");
    write_file(dir.path(), "f.txt", b"3\n");
    commit(dir.path(), "2024-04-01T00:00:01", "after end");

    let run = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    let mut messages: Vec<&str> = run.summary.commits.iter().map(|c| c.message.as_str()).collect();
    messages.sort();
    assert_eq!(messages, vec!["at end", "at start"]);
}

#[test]
fn only_matching_authors_are_counted() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "f.txt", b"0\n");
    commit(dir.path(), "2024-05-01T10:00:00", "anna root");
    write_file(dir.path(), "f.txt", b"0\n1\n");
    commit_as(dir.path(), "Bob Smith", "bob@x.com", "2024-05-02T10:00:00", "bob");
    write_file(dir.path(), "f.txt", b"0\n1\n2\n");
    commit_as(dir.path(), "Robot", "annoyed@x.com", "2024-05-03T10:00:00", "robot");

    let run = analyze("ANN", "Q2", vec![dir.path().to_path_buf()]);
    let mut messages: Vec<&str> = run.summary.commits.iter().map(|c| c.message.as_str()).collect();
    messages.sort();
    // "ann" is a substring of the robot's email as well
    assert_eq!(messages, vec!["anna root", "robot"]);
    assert_eq!(run.summary.lines_added, 1);
}

#[test]
fn merge_commit_is_diffed_against_first_parent_only() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "main.txt", b"a\n");
    commit(dir.path(), "2024-07-01T10:00:00", "base");

    git(dir.path(), &["checkout", "-q", "-b", "feat"]);
    write_file(dir.path(), "feat.txt", lines(3, "f").as_bytes());
    commit(dir.path(), "2024-07-02T10:00:00", "feature");

    git(dir.path(), &["checkout", "-q", "main"]);
    write_file(dir.path(), "main.txt", b"a\nb\n");
    commit(dir.path(), "2024-07-03T10:00:00", "mainline");
    merge(dir.path(), "feat", "2024-07-04T10:00:00");

    let run = analyze("anna", "Q3", vec![dir.path().to_path_buf()]);
    assert_eq!(run.summary.total_commits, 4);

    let merge = run
        .summary
        .commits
        .iter()
        .find(|c| c.message == "merge feat")
        .unwrap();
    assert_eq!((merge.files_changed, merge.insertions, merge.deletions), (1, 3, 0));
}

#[test]
fn binary_and_renamed_files_are_counted_as_paths() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "keep.txt", b"k\n");
    commit(dir.path(), "2024-10-01T10:00:00", "root");

    write_file(dir.path(), "logo.bin", b"\x89PNG\0\0\x01\x02");
    commit(dir.path(), "2024-10-02T10:00:00", "binary");

    let renamed = dir.path().join("kept.txt");
    fs::rename(dir.path().join("keep.txt"), renamed).unwrap();
    commit(dir.path(), "2024-10-03T10:00:00", "rename");

    let run = analyze("anna", "Q4", vec![dir.path().to_path_buf()]);
    let by_message = |m: &str| {
        run.summary
            .commits
            .iter()
            .find(|c| c.message == m)
            .map(|c| (c.files_changed, c.insertions, c.deletions))
            .unwrap()
    };
    assert_eq!(by_message("binary"), (1, 0, 0));
    assert_eq!(by_message("rename"), (2, 1, 1));
}

#[test]
fn corrupt_source_does_not_affect_valid_ones() {
    if !has_git() {
        return;
    }
    let first = tempdir().unwrap();
    three_commit_repo(first.path());

    // extracted archive with the repository one directory down
    let second = tempdir().unwrap();
    let nested = second.path().join("project");
    init_git_repo(&nested);
    write_file(&nested, "n.txt", b"n\n");
    commit(&nested, "2024-03-05T10:00:00", "nested root");
    write_file(&nested, "n.txt", b"n\nm\n");
    commit(&nested, "2024-03-06T10:00:00", "nested change");

    let corrupt = tempdir().unwrap();
    fs::create_dir(corrupt.path().join(".git")).unwrap();
    fs::write(corrupt.path().join(".git").join("HEAD"), "not a ref").unwrap();

    let run = analyze(
        "anna",
        "Q1",
        vec![
            first.path().to_path_buf(),
            corrupt.path().to_path_buf(),
            second.path().to_path_buf(),
        ],
    );

    assert_eq!(run.summary.total_commits, 5);
    assert_eq!(run.summary.total_files, 4);
    assert_eq!(run.summary.lines_added, 11);
    assert_eq!(run.summary.lines_deleted, 5);
    assert_eq!(run.failed_sources(), 1);
    assert!(matches!(run.sources[1].outcome, SourceOutcome::Failed { .. }));
    assert!(matches!(
        run.sources[2].outcome,
        SourceOutcome::Analyzed { commits: 2, .. }
    ));

    let histogram_total: u64 = run.summary.commits_by_date.values().sum();
    assert_eq!(histogram_total, run.summary.total_commits);
}

#[test]
fn empty_repository_contributes_nothing() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());

    let run = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    assert_eq!(run.summary.total_commits, 0);
    assert!(matches!(
        run.sources[0].outcome,
        SourceOutcome::Analyzed { commits: 0, .. }
    ));
}

#[test]
fn author_date_places_commit_in_quarter() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "f.txt", b"0\n");
    commit(dir.path(), "2024-01-05T10:00:00", "root");
    write_file(dir.path(), "f.txt", b"0\n1\n");
    // authored in Q1, rebased onto the branch in Q2
    commit_dated(dir.path(), "2024-02-10T10:00:00", "2024-04-10T10:00:00", "rebased");

    let q1 = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    let mut messages: Vec<&str> = q1.summary.commits.iter().map(|c| c.message.as_str()).collect();
    messages.sort();
    assert_eq!(messages, vec!["rebased", "root"]);
    assert!(q1.summary.commits_by_date.contains_key("2024-02-10"));
    assert!(!q1.summary.commits_by_date.contains_key("2024-04-10"));

    let q2 = analyze("anna", "Q2", vec![dir.path().to_path_buf()]);
    assert_eq!(q2.summary.total_commits, 0);
}

#[test]
fn shallow_clone_counts_the_commits_it_has() {
    if !has_git() {
        return;
    }
    let origin = tempdir().unwrap();
    init_git_repo(origin.path());
    let mut content = String::new();
    for (i, day) in ["01", "02", "03", "04"].iter().enumerate() {
        content.push_str(&format!("{i}\n"));
        write_file(origin.path(), "f.txt", content.as_bytes());
        commit(origin.path(), &format!("2024-02-{day}T10:00:00"), &format!("c{i}"));
    }

    let parent = tempdir().unwrap();
    let url = format!("file://{}", origin.path().display());
    git(parent.path(), &["clone", "-q", "--depth", "2", &url, "shallow"]);
    let clone = parent.path().join("shallow");

    let run = analyze("anna", "Q1", vec![clone]);
    assert!(matches!(
        run.sources[0].outcome,
        SourceOutcome::Analyzed { commits: 2, diff_failures: 1, .. }
    ));
    assert_eq!(run.summary.total_commits, 2);

    let messages: Vec<&str> = run.summary.commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["c3", "c2"]);
    let newest = &run.summary.commits[0];
    assert_eq!((newest.files_changed, newest.insertions, newest.deletions), (1, 1, 0));
    // the boundary commit's parent is missing, so it has no diff stats
    let boundary = &run.summary.commits[1];
    assert_eq!((boundary.files_changed, boundary.insertions, boundary.deletions), (0, 0, 0));
}

#[test]
fn unreadable_blob_keeps_commit_with_zero_stats() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    write_file(dir.path(), "f.txt", b"a\n");
    commit(dir.path(), "2024-02-01T10:00:00", "root");
    write_file(dir.path(), "f.txt", b"a\nb\n");
    commit(dir.path(), "2024-02-02T10:00:00", "grow");

    let blob = rev_parse(dir.path(), "HEAD:f.txt");
    let loose = dir
        .path()
        .join(".git")
        .join("objects")
        .join(&blob[..2])
        .join(&blob[2..]);
    fs::remove_file(loose).unwrap();

    let run = analyze("anna", "Q1", vec![dir.path().to_path_buf()]);
    assert!(matches!(
        run.sources[0].outcome,
        SourceOutcome::Analyzed { commits: 2, diff_failures: 1, .. }
    ));
    assert_eq!(run.diff_failures(), 1);
    assert_eq!(run.summary.total_commits, 2);

    let grow = run
        .summary
        .commits
        .iter()
        .find(|c| c.message == "grow")
        .unwrap();
    assert_eq!((grow.files_changed, grow.insertions, grow.deletions), (0, 0, 0));
}
