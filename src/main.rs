mod app;
mod cli;
mod config;
mod http;
mod keys;
mod logging;
mod message;
mod perf;
mod ui;
mod widgets;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use tracing::{error, info, warn};

use app::App;
use cli::{Cli, Mode};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    let log_path = logging::init_file_logging(&config.log.dir, cli.debug)?;
    info!(log = %log_path.display(), mode = ?cli.mode(), "starting the application");

    match cli.mode() {
        Mode::Tui => {
            let mut app = App::new(&config)?;
            let result = app.run().await;
            if let Err(err) = &result {
                error!(error = %err, "application error");
            }
            result
        }
        Mode::Loadtest => {
            warn!("load test requested but no engine is bundled");
            bail!("the load testing engine is not available in this build")
        }
    }
}
