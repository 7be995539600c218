//! ledboard: clock, date, weather and news ticker on an RGB LED matrix.
//!
//! Usage: `ledboard [FILE]` (see `ledboard --help`). Verbosity follows
//! `RUST_LOG` (default `info`). Build with `--features hardware` on a Raspberry Pi to drive a
//! HUB75 chain; otherwise frames go to a headless panel.

use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use embassy_executor::Spawner;
use ledboard_core::board::Board;
use log::{error, info};

mod clock;
mod error;
mod http;
mod news;
mod panel;
mod settings;
mod weather;

use crate::clock::SystemClock;
use crate::error::DeviceError;
use crate::news::NewsApiClient;
use crate::panel::DevicePanel;
use crate::weather::WttrClient;

#[derive(Parser, Debug)]
#[command(name = "ledboard", version, about = "Clock, date, weather and news ticker for an RGB LED matrix", long_about = None)]
struct Cli {
    /// JSON config file; built-in and build-time defaults when omitted
    #[arg(value_name = "FILE")]
    config: Option<PathBuf>,
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(cli.config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config_path: Option<PathBuf>) -> Result<Infallible, DeviceError> {
    let settings = settings::load(config_path.as_deref())?;
    let board_config = &settings.board;
    info!(
        "Starting ledboard: {} local time, weather for '{}'",
        board_config.time_zone, board_config.location
    );

    let clock = SystemClock::new(&board_config.time_zone)?;
    let fetch_timeout = Duration::from_secs(board_config.refresh.fetch_timeout_secs);
    let weather = WttrClient::new(
        http::agent(fetch_timeout),
        &settings.weather,
        board_config.units,
    );
    let news = NewsApiClient::new(http::agent(fetch_timeout), &settings.news)?;
    let fonts = settings::load_fonts(&board_config.fonts)?;
    let panel = DevicePanel::open(&board_config.panel)?;

    let mut board = Board::new(board_config, fonts, panel, weather, news, clock)
        .map_err(|e| DeviceError::Board(e.to_string()))?;
    board
        .run()
        .await
        .map_err(|e| DeviceError::Board(e.to_string()))
}
