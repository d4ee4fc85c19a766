use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gquarter")]
#[command(about = "Quarterly contribution statistics from one or more git repositories")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to results database")]
    pub db: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

impl CommonArgs {
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::store::DEFAULT_DB_PATH))
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze extracted repositories for one author and quarter
    Analyze {
        #[arg(long, short, help = "Author name or email fragment to match")]
        user: String,

        #[arg(long, short, default_value = "Q1", help = "Quarter code (Q1-Q4); anything else means year to date")]
        quarter: String,

        #[arg(long, help = "Year of the quarter (defaults to the current year)")]
        year: Option<i32>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output commit records as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Do not store the result")]
        no_save: bool,

        #[arg(help = "Directories holding extracted repositories")]
        sources: Vec<PathBuf>,
    },
    /// List stored analyses for an author
    History {
        #[arg(long, short, help = "Stored user query")]
        user: String,

        #[arg(long, short, help = "Restrict to one quarter code")]
        quarter: Option<String>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Show one stored analysis
    Show {
        #[arg(help = "Analysis id")]
        id: i64,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze {
                user,
                quarter,
                year,
                json,
                ndjson,
                no_save,
                sources,
            } => crate::commands::analyze::exec(
                &self.common,
                crate::commands::analyze::AnalyzeArgs {
                    user,
                    quarter,
                    year,
                    json,
                    ndjson,
                    no_save,
                    sources,
                },
            ),
            Commands::History { user, quarter, json } => {
                crate::commands::history::exec(&self.common, &user, quarter.as_deref(), json)
            }
            Commands::Show { id, json } => crate::commands::history::show(&self.common, id, json),
        }
    }
}
