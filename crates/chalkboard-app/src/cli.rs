use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "chalkboard")]
#[command(about = "Replay a whiteboard gesture script and export the result", long_about = None)]
pub struct Cli {
    /// Gesture script (JSON)
    pub script: PathBuf,

    /// Where to write the rendered PNG
    #[arg(short, long, default_value = "chalkboard.png")]
    pub output: PathBuf,

    /// Log every committed primitive as JSON
    #[arg(long = "log-commits", default_value = "false")]
    pub log_commits: bool,
}
