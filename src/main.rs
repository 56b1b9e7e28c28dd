use clap::Parser;
use orbit::config;
use orbit::gui::app::{AppInit, AppModel};
use orbit::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Holdings wheel for an investment portfolio", long_about = None)]
struct Cli {
    /// Portfolio file to show instead of the configured one
    #[arg(short, long)]
    portfolio: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = config::write_default_config() {
        log::warn!("Could not seed the settings file: {}", e);
    }
    let config = config::load_or_default();
    let portfolio_path = config::resolve_portfolio_path(cli.portfolio.clone(), &config);

    let portfolio = match portfolio_path.as_deref().map(config::load_portfolio) {
        Some(Ok(portfolio)) => portfolio,
        Some(Err(e)) => {
            log::error!("Failed to load portfolio: {}", e);
            Default::default()
        }
        None => {
            log::warn!("No portfolio file configured");
            Default::default()
        }
    };

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, cli.portfolio.clone());

    // GTK must not see our own command-line flags
    let app = RelmApp::new("org.orbit.wheel").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        portfolio,
        portfolio_path,
        cli_portfolio: cli.portfolio,
        rx,
    });
}
