mod platform;

use std::path::PathBuf;

use clap::Parser;

use platform::config::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "unload")]
#[command(about = "Verify unloaded units against a manifest by scanning barcodes")]
#[command(version)]
#[command(after_help = "\
Scans are read one per line from stdin (keyboard-wedge scanners type the code
and press Enter) or from --scans. Lines starting with ':' are commands:
  :load <file>   load a manifest CSV
  :export        write the completion report
  :status        show every manifest line
  :pause         stop accepting scans
  :resume        accept scans again
  :help          show commands
  :quit          leave")]
pub struct Cli {
    /// Manifest CSV to load before the first scan.
    #[arg(long, short = 'm')]
    pub manifest: Option<PathBuf>,

    /// RON configuration file.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory for reports and the log file.
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Replay scans from a file instead of reading stdin.
    #[arg(long, value_name = "FILE")]
    pub scans: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log at debug level.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(cli)
}
