pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod error;
pub mod git;
pub mod identity;
pub mod model;
pub mod quarter;
pub mod report;
pub mod store;

pub use analysis::{run, run_at, AnalysisRequest};
pub use error::{QuarterError, Result};
pub use model::{AnalysisRun, AnalysisSummary, CommitRecord, QuarterRange, SourceOutcome};
