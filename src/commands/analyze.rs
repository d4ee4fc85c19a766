use crate::analysis::{self, AnalysisRequest};
use crate::cli::CommonArgs;
use crate::report::{analysis_output, output_json, output_ndjson, output_table};
use crate::store::Store;
use anyhow::Context;
use log::warn;
use std::path::PathBuf;

pub struct AnalyzeArgs {
    pub user: String,
    pub quarter: String,
    pub year: Option<i32>,
    pub json: bool,
    pub ndjson: bool,
    pub no_save: bool,
    pub sources: Vec<PathBuf>,
}

pub fn exec(common: &CommonArgs, args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut request = AnalysisRequest::new(args.user, args.quarter, args.sources)
        .context("Invalid analysis request")?;
    if let Some(year) = args.year {
        request = request.with_year(year);
    }

    for source in request.sources() {
        if !source.is_dir() {
            warn!("{} is not a directory; it will contribute no commits", source.display());
        }
    }

    // Keep stdout clean for machine-readable output
    let progress = !(args.json || args.ndjson);
    let run = analysis::run(&request, progress);
    if run.failed_sources() > 0 || run.diff_failures() > 0 {
        warn!(
            "{} source(s) could not be read and {} commit(s) have no diff stats",
            run.failed_sources(),
            run.diff_failures()
        );
    }

    let id = if args.no_save {
        None
    } else {
        let mut store = Store::open(common.db_path()).context("Failed to open results database")?;
        Some(
            store
                .save(request.user(), request.quarter(), &run.range, &run.summary)
                .context("Failed to store analysis result")?,
        )
    };

    let output = analysis_output(&run, request.user(), request.quarter(), id);
    if args.json {
        output_json(&output)?;
    } else if args.ndjson {
        output_ndjson(&output.summary)?;
    } else {
        output_table(&output)?;
    }

    Ok(())
}
