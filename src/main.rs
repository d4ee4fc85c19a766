use anyhow::Result;
use clap::Parser;
use gquarter::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.common.log_level())
        .parse_default_env()
        .init();
    cli.execute()
}
