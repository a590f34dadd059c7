use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reqlab", version, about = "CLI-Tool to test APIs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Mode>,

    #[arg(short, long, global = true, help = "Log at debug level")]
    pub debug: bool,

    #[arg(
        short,
        long,
        global = true,
        env = "REQLAB_CONFIG",
        help = "Extra config file layered over the global and project ones"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Launch the interactive client
    Tui,
    /// Start a load test
    #[command(visible_alias = "lt")]
    Loadtest,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        self.command.unwrap_or(Mode::Tui)
    }
}
