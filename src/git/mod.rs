pub mod diff;
pub mod locate;
pub mod repo;

pub use diff::{first_parent_stats, line_edits};
pub use locate::find_git_dir;
pub use repo::{GitRepo, WalkOutput};
