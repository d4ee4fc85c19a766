#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

pub const USER_NAME: &str = "Anna Lee";
pub const USER_EMAIL: &str = "anna@example.com";

pub fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git_cmd(dir: &Path, date: &str, name: &str, email: &str) -> Command {
    git_cmd_dated(dir, date, date, name, email)
}

fn git_cmd_dated(
    dir: &Path,
    author_date: &str,
    committer_date: &str,
    name: &str,
    email: &str,
) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir)
        .env("GIT_AUTHOR_DATE", author_date)
        .env("GIT_COMMITTER_DATE", committer_date)
        .env("GIT_AUTHOR_NAME", name)
        .env("GIT_AUTHOR_EMAIL", email)
        .env("GIT_COMMITTER_NAME", name)
        .env("GIT_COMMITTER_EMAIL", email)
        .args(["-c", "commit.gpgsign=false", "-c", "core.autocrlf=false"]);
    cmd
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = git_cmd(dir, "2024-01-01T00:00:00", USER_NAME, USER_EMAIL)
        .args(args)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

pub fn init_git_repo(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Stage everything and commit as `name <email>` at the local wall-clock `date`.
pub fn commit_as(dir: &Path, name: &str, email: &str, date: &str, message: &str) {
    let add = git_cmd(dir, date, name, email)
        .args(["add", "-A"])
        .status()
        .unwrap();
    assert!(add.success());
    let commit = git_cmd(dir, date, name, email)
        .args(["commit", "-q", "--allow-empty", "-m", message])
        .status()
        .unwrap();
    assert!(commit.success());
}

/// Stage everything and commit with different author and committer dates,
/// as a rebase or cherry-pick leaves it.
pub fn commit_dated(dir: &Path, author_date: &str, committer_date: &str, message: &str) {
    let add = git_cmd_dated(dir, author_date, committer_date, USER_NAME, USER_EMAIL)
        .args(["add", "-A"])
        .status()
        .unwrap();
    assert!(add.success());
    let commit = git_cmd_dated(dir, author_date, committer_date, USER_NAME, USER_EMAIL)
        .args(["commit", "-q", "--allow-empty", "-m", message])
        .status()
        .unwrap();
    assert!(commit.success());
}

pub fn rev_parse(dir: &Path, rev: &str) -> String {
    let out = git_cmd(dir, "2024-01-01T00:00:00", USER_NAME, USER_EMAIL)
        .args(["rev-parse", rev])
        .output()
        .unwrap();
    assert!(out.status.success(), "git rev-parse {rev} failed");
    String::from_utf8(out.stdout).unwrap().trim().to_string()
}

pub fn commit(dir: &Path, date: &str, message: &str) {
    commit_as(dir, USER_NAME, USER_EMAIL, date, message);
}

pub fn merge(dir: &Path, branch: &str, date: &str) {
    let status = git_cmd(dir, date, USER_NAME, USER_EMAIL)
        .args(["merge", "-q", "--no-ff", branch, "-m", &format!("merge {branch}")])
        .status()
        .unwrap();
    assert!(status.success());
}

pub fn lines(n: usize, prefix: &str) -> String {
    (0..n).map(|i| format!("{prefix} {i}\n")).collect()
}

/// Root commit, a 10-line addition over two files, then a 5-line removal.
pub fn three_commit_repo(dir: &Path) {
    init_git_repo(dir);
    write_file(dir, "a.txt", b"first\n");
    commit(dir, "2024-02-10T09:00:00", "C1 root");

    let mut a = String::from("first\n");
    a.push_str(&lines(4, "a"));
    write_file(dir, "a.txt", a.as_bytes());
    write_file(dir, "src/b.txt", lines(6, "b").as_bytes());
    commit(dir, "2024-02-10T15:00:00", "C2 add ten lines");

    write_file(dir, "src/b.txt", lines(1, "b").as_bytes());
    commit(dir, "2024-02-12T11:00:00", "C3 drop five lines");
}
