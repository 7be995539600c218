//! Desktop simulator for the ledboard LED matrix clock.
//!
//! Runs the real driver loop against an SDL2 window via
//! `embedded-graphics-simulator`, with synthetic weather and headlines so the
//! layout and ticker can be exercised without a panel or API keys.
//!
//! # Key bindings
//!
//! | Key   | Action |
//! |-------|--------|
//! | Q/Esc | Quit   |

use chrono::{DateTime, Local, Utc};
use embassy_executor::Spawner;
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use ledboard_core::board::{Board, BoardError};
use ledboard_core::clock::Clock;
use ledboard_core::config::{BoardConfig, FontConfig};
use ledboard_core::panel::MatrixPanel;
use ledboard_core::render::FontSet;
use ledboard_core::sources::{
    CompassPoint, FetchError, Headline, NewsSource, Units, Weather, WeatherKind, WeatherSource,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Synthetic data goes stale quickly so refreshes are visible.
const MOCK_WEATHER_INTERVAL_SECS: u64 = 20;
const MOCK_NEWS_INTERVAL_SECS: u64 = 45;

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// The user closed the window.
#[derive(Debug)]
struct WindowClosed;

/// SDL2 window standing in for the HUB75 chain.
struct SimulatorPanel {
    window: Window,
    size: Size,
}

impl MatrixPanel for SimulatorPanel {
    type Canvas = SimulatorDisplay<Rgb888>;
    type Error = WindowClosed;

    fn size(&self) -> Size {
        self.size
    }

    fn create_canvas(&mut self) -> Result<Self::Canvas, WindowClosed> {
        Ok(SimulatorDisplay::new(self.size))
    }

    fn swap_on_vsync(&mut self, canvas: Self::Canvas) -> Result<Self::Canvas, WindowClosed> {
        // The SDL window is lazily initialized on the first `update()` call,
        // which must happen before `events()`.
        self.window.update(&canvas);

        for event in self.window.events() {
            match event {
                SimulatorEvent::Quit => return Err(WindowClosed),
                SimulatorEvent::KeyDown { keycode, .. }
                    if keycode == Keycode::Q || keycode == Keycode::Escape =>
                {
                    return Err(WindowClosed);
                }
                _ => {}
            }
        }
        Ok(canvas)
    }
}

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Walks through the weather kinds and compass points, one step per fetch.
struct MockWeather {
    step: usize,
}

const MOCK_KINDS: [WeatherKind; 6] = [
    WeatherKind::Sunny,
    WeatherKind::PartlyCloudy,
    WeatherKind::LightRain,
    WeatherKind::ThunderyShowers,
    WeatherKind::HeavySnow,
    WeatherKind::Fog,
];

impl WeatherSource for MockWeather {
    async fn fetch(&mut self, location: &str) -> Result<Weather, FetchError> {
        let step = self.step;
        self.step += 1;
        info!("Mock weather #{} for '{}'", step, location);

        let swing = (step % 9) as i16;
        Ok(Weather {
            temperature: 60 + swing * 3,
            wind_direction: CompassPoint::ALL[step % CompassPoint::ALL.len()],
            wind_speed: (step % 5) as u16 * 4,
            kind: MOCK_KINDS[step % MOCK_KINDS.len()],
            units: Units::Imperial,
        })
    }
}

struct MockNews {
    edition: u32,
}

impl NewsSource for MockNews {
    async fn fetch_top_stories(&mut self) -> Result<Vec<Headline>, FetchError> {
        self.edition += 1;
        Ok(vec![
            Headline::new(format!("Edition {} of the simulated news", self.edition)),
            Headline::new("Local panel reaches twenty frames per second"),
            Headline::new("Forecast: scattered pixels, clearing by evening"),
        ])
    }
}

/// Host wall clock in the machine's own time zone.
struct LocalClock {
    zone: Local,
}

impl Clock for LocalClock {
    type Zone = Local;

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> &Local {
        &self.zone
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::init();
    info!("Starting ledboard simulator");

    let mut config = BoardConfig::default();
    config.refresh.weather_interval_secs = MOCK_WEATHER_INTERVAL_SECS;
    config.refresh.news_interval_secs = MOCK_NEWS_INTERVAL_SECS;
    config.fonts = FontConfig::builtin();

    let fonts = match FontSet::load(&config.fonts, |path| {
        std::fs::read(path).map_err(|e| e.to_string())
    }) {
        Ok(fonts) => fonts,
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let size = Size::new(config.panel.width(), config.panel.height());
    info!(
        "Display: {}×{} (scale {}×)",
        size.width, size.height, WINDOW_SCALE
    );
    info!("Keys: Q/Esc=Quit");

    let output_settings = OutputSettingsBuilder::new()
        .scale(WINDOW_SCALE)
        .pixel_spacing(1)
        .build();
    let panel = SimulatorPanel {
        window: Window::new("ledboard simulator", &output_settings),
        size,
    };

    let mut board = match Board::new(
        &config,
        fonts,
        panel,
        MockWeather { step: 0 },
        MockNews { edition: 0 },
        LocalClock { zone: Local },
    ) {
        Ok(board) => board,
        Err(e) => {
            error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    match board.run().await {
        Err(BoardError::Panel(WindowClosed)) => info!("Simulator exiting"),
        Err(e) => {
            error!("Simulator stopped: {}", e);
            std::process::exit(1);
        }
        Ok(never) => match never {},
    }
}
