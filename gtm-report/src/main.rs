use anyhow::Result;
use clap::Parser;

mod cli;
mod report_cmd;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    report_cmd::run_report(cli)
}
