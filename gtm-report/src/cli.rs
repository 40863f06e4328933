use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gtm-report")]
#[command(about = "Render Google Tag Manager container exports as tag reports")]
pub struct Cli {
    /// Directory containing `*.json` container exports.
    #[arg(long, default_value = "exports")]
    pub input: PathBuf,
    /// Directory reports are written to (created if missing).
    #[arg(long, default_value = "output")]
    pub output: PathBuf,
    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
    pub format: ReportFormat,
    /// Tag field matched against ad network keywords.
    #[arg(long, value_enum, default_value_t = AdNetworkKeyArg::Auto)]
    pub ad_network_key: AdNetworkKeyArg,
    /// Optional lookup tables TOML file replacing the embedded tables.
    #[arg(long)]
    pub mappings_file: Option<PathBuf>,
    /// Only print errors and the final summary.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ReportFormat {
    /// One HTML file per container.
    Html,
    /// One workbook with a sheet per container.
    Xlsx,
    /// Both of the above.
    Both,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum AdNetworkKeyArg {
    Name,
    Type,
    Auto,
}
