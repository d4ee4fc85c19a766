use crate::model::{
    AnalysisOutput, AnalysisRun, AnalysisSummary, SourceOutcome, SourceReport, StoredAnalysis,
    SCHEMA_VERSION,
};
use anyhow::Result;
use chrono::Utc;
use console::style;

pub fn analysis_output(run: &AnalysisRun, user: &str, quarter: &str, id: Option<i64>) -> AnalysisOutput {
    AnalysisOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        user: user.to_string(),
        quarter: quarter.to_string(),
        id,
        range: run.range,
        summary: run.summary.clone(),
        sources: run.sources.clone(),
    }
}

pub fn output_json(output: &AnalysisOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_ndjson(summary: &AnalysisSummary) -> Result<()> {
    for record in &summary.commits {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

pub fn output_table(output: &AnalysisOutput) -> Result<()> {
    println!(
        "{} {} {}",
        style("Contribution Summary").bold(),
        style(&output.user).cyan(),
        style(&output.quarter).dim()
    );
    println!("{}", "─".repeat(50));
    println!(
        "Range: {} to {}",
        style(output.range.start.format("%Y-%m-%d %H:%M")).dim(),
        style(output.range.end.format("%Y-%m-%d %H:%M")).dim()
    );
    if let Some(id) = output.id {
        println!("Saved as analysis #{id}");
    }
    println!();
    print_totals(&output.summary);
    println!();
    if !output.sources.is_empty() {
        print_sources(&output.sources);
        println!();
    }
    print_activity(&output.summary);
    Ok(())
}

pub fn output_history(entries: &[StoredAnalysis]) -> Result<()> {
    if entries.is_empty() {
        println!("No stored analyses");
        return Ok(());
    }

    println!(
        "{:>6} {:<24} {:<4} {:>8} {:>8} {:>8} {:>8}  {}",
        style("ID").bold(),
        style("User").bold(),
        style("Qtr").bold(),
        style("Commits").bold(),
        style("Files").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Created").bold()
    );
    println!("{}", "─".repeat(90));
    for e in entries {
        println!(
            "{:>6} {:<24} {:<4} {:>8} {:>8} {:>8} {:>8}  {}",
            e.id,
            e.user,
            e.quarter,
            e.total_commits,
            e.total_files,
            e.lines_added,
            e.lines_deleted,
            e.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn print_totals(summary: &AnalysisSummary) {
    println!("Total commits: {}", style(summary.total_commits).cyan());
    println!("Total files changed: {}", style(summary.total_files).cyan());
    println!("Total lines added: {}", style(summary.lines_added).green());
    println!("Total lines deleted: {}", style(summary.lines_deleted).red());
}

fn print_sources(sources: &[SourceReport]) {
    println!("{}", style("Sources").bold());
    for report in sources {
        let status = match &report.outcome {
            SourceOutcome::Analyzed {
                commits,
                diff_failures,
                ..
            } if *diff_failures > 0 => style(format!(
                "{commits} commit(s), {diff_failures} without diff stats"
            ))
            .yellow(),
            SourceOutcome::Analyzed { commits, .. } => style(format!("{commits} commit(s)")).green(),
            SourceOutcome::NoRepository => style("no repository found".to_string()).dim(),
            SourceOutcome::Failed { reason } => style(format!("failed: {reason}")).red(),
        };
        println!("  {} {}", report.source.display(), status);
    }
}

fn print_activity(summary: &AnalysisSummary) {
    if summary.commits_by_date.is_empty() {
        println!("No activity in range");
        return;
    }

    let max = summary.commits_by_date.values().copied().max().unwrap_or(1).max(1);

    println!("{}", style("Daily Activity").bold());
    for (day, count) in &summary.commits_by_date {
        let width = ((*count as f64 / max as f64) * 30.0).ceil() as usize;
        println!("{} {} {:>3}", day, style("█".repeat(width)).green(), count);
    }
}
