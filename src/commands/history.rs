use crate::cli::CommonArgs;
use crate::model::{AnalysisOutput, SCHEMA_VERSION};
use crate::report::{output_history, output_json, output_table};
use crate::store::Store;
use anyhow::{anyhow, Context};

pub fn exec(common: &CommonArgs, user: &str, quarter: Option<&str>, json: bool) -> anyhow::Result<()> {
    let store = Store::open(common.db_path()).context("Failed to open results database")?;

    let entries = match quarter {
        Some(q) => store.find_by_user_and_quarter(user, q),
        None => store.find_by_user(user),
    }
    .context("Failed to query stored analyses")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        output_history(&entries)?;
    }
    Ok(())
}

pub fn show(common: &CommonArgs, id: i64, json: bool) -> anyhow::Result<()> {
    let store = Store::open(common.db_path()).context("Failed to open results database")?;
    let (header, summary) = store
        .load(id)
        .context("Failed to load stored analysis")?
        .ok_or_else(|| anyhow!("No stored analysis with id {id}"))?;

    let output = AnalysisOutput {
        version: SCHEMA_VERSION,
        generated_at: header.created_at,
        range: header.range,
        user: header.user,
        quarter: header.quarter,
        id: Some(header.id),
        summary,
        sources: Vec::new(),
    };

    if json {
        output_json(&output)
    } else {
        output_table(&output)
    }
}
