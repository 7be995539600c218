//! Driver loop
//!
//! [`Board`] owns the panel, the data sources, the clock and the
//! [`DisplayState`]. Every iteration it clears the off-screen canvas,
//! refreshes weather and news when they are stale, draws time, date, weather
//! and ticker, waits one frame period and swaps the canvas onto the panel.
//!
//! Fetch failures never stop the loop: the last good value keeps rendering
//! and the source is retried after the configured cooldown. Panel errors are
//! fatal and end [`Board::run`].

use alloc::string::String;
use core::convert::Infallible;
use core::fmt::Debug;

use chrono::Timelike;
use embassy_time::{Duration, Instant, Timer, with_timeout};
use embedded_graphics::prelude::*;
use log::{debug, info, warn};
use thiserror_no_std::Error;

use crate::clock::{Clock, format_date, format_time_alternating};
use crate::colors;
use crate::config::{BoardConfig, ConfigError, RefreshConfig};
use crate::panel::MatrixPanel;
use crate::refresh::{Refresh, TimedValue};
use crate::render::{FontSet, FrameContent, FrameRenderer};
use crate::scroll::ScrollOffset;
use crate::sources::{FetchError, NewsSource, Weather, WeatherSource, format_weather, news_digest};

#[derive(Error, Debug)]
pub enum BoardError<E: Debug> {
    #[error("{0}")]
    Config(ConfigError),
    #[error("panel error: {0:?}")]
    Panel(E),
    #[error("off-screen canvas lost after a failed swap")]
    CanvasUnavailable,
}

/// Everything the driver loop carries from one frame to the next.
pub struct DisplayState<C> {
    canvas: Option<C>,
    weather: TimedValue<Weather>,
    news: TimedValue<String>,
    scroll: ScrollOffset,
}

impl<C> DisplayState<C> {
    pub fn new(canvas: C, panel_width: u32) -> Self {
        Self {
            canvas: Some(canvas),
            weather: TimedValue::empty(),
            news: TimedValue::empty(),
            scroll: ScrollOffset::new(panel_width),
        }
    }

    /// The canvas being composed; `None` only after a failed swap.
    pub fn canvas(&self) -> Option<&C> {
        self.canvas.as_ref()
    }

    pub fn weather(&self) -> &TimedValue<Weather> {
        &self.weather
    }

    /// Cached ticker line (all headlines joined).
    pub fn news(&self) -> &TimedValue<String> {
        &self.news
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }
}

/// Bound a fetch by `deadline`.
async fn with_deadline<T>(
    deadline: Duration,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    with_timeout(deadline, fetch)
        .await
        .map_err(|_| FetchError::Timeout)?
}

pub struct Board<P, W, N, K>
where
    P: MatrixPanel,
{
    panel: P,
    weather_source: W,
    news_source: N,
    clock: K,
    renderer: FrameRenderer,
    location: String,
    refresh: RefreshConfig,
    state: DisplayState<P::Canvas>,
}

impl<P, W, N, K> Board<P, W, N, K>
where
    P: MatrixPanel,
    W: WeatherSource,
    N: NewsSource,
    K: Clock,
{
    /// Allocate the off-screen canvas and lay out fields for `fonts`.
    ///
    /// Fails on an invalid configuration or a panel that cannot provide a
    /// canvas. Fonts are loaded by the caller, see [`FontSet::load`].
    pub fn new(
        config: &BoardConfig,
        fonts: FontSet,
        mut panel: P,
        weather_source: W,
        news_source: N,
        clock: K,
    ) -> Result<Self, BoardError<P::Error>> {
        config.validate().map_err(BoardError::Config)?;

        let size = panel.size();
        let canvas = panel.create_canvas().map_err(BoardError::Panel)?;
        info!(
            "Board ready: {}x{} panel, weather for '{}'",
            size.width, size.height, config.location
        );

        Ok(Self {
            panel,
            weather_source,
            news_source,
            clock,
            renderer: FrameRenderer::new(fonts, size.height),
            location: config.location.clone(),
            refresh: config.refresh,
            state: DisplayState::new(canvas, size.width),
        })
    }

    pub fn state(&self) -> &DisplayState<P::Canvas> {
        &self.state
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Run until the panel fails.
    pub async fn run(&mut self) -> Result<Infallible, BoardError<P::Error>> {
        let frame_period = self.refresh.frame_period();
        info!("Driver loop started, {} ms per frame", frame_period.as_millis());

        loop {
            self.prepare_frame().await?;
            Timer::after(frame_period).await;
            self.present()?;
        }
    }

    /// Clear the canvas, refresh stale data and draw the next frame.
    pub async fn prepare_frame(&mut self) -> Result<(), BoardError<P::Error>> {
        let canvas = self
            .state
            .canvas
            .as_mut()
            .ok_or(BoardError::CanvasUnavailable)?;
        let Ok(()) = canvas.clear(colors::BACKGROUND);

        let now = self.clock.instant();
        self.refresh_weather(now).await;
        self.refresh_news(now).await;

        let now_utc = self.clock.now_utc();
        let now_local = now_utc.with_timezone(self.clock.zone());
        let (time_color, time) =
            format_time_alternating(&now_utc, &now_local, now_local.second());
        let date = format_date(now_local.date_naive());
        let weather = self.state.weather.value().map(format_weather);

        let frame = FrameContent {
            time: &time,
            time_color,
            date: &date,
            weather: weather.as_deref(),
            ticker: self.state.news.value().map_or("", String::as_str),
            ticker_offset: self.state.scroll.get(),
        };

        let canvas = self
            .state
            .canvas
            .as_mut()
            .ok_or(BoardError::CanvasUnavailable)?;
        let Ok(ticker_width) = self.renderer.render(canvas, &frame);
        self.state.scroll.advance(ticker_width);
        Ok(())
    }

    /// Swap the composed canvas onto the panel.
    pub fn present(&mut self) -> Result<(), BoardError<P::Error>> {
        let canvas = self
            .state
            .canvas
            .take()
            .ok_or(BoardError::CanvasUnavailable)?;
        let canvas = self.panel.swap_on_vsync(canvas).map_err(BoardError::Panel)?;
        self.state.canvas = Some(canvas);
        Ok(())
    }

    /// True when `cache` is stale and not inside a retry cooldown.
    fn fetch_due<T>(&self, cache: &TimedValue<T>, now: Instant, interval: Duration) -> bool {
        cache.is_stale(now, interval) && cache.retry_due(now, self.refresh.retry_interval())
    }

    async fn refresh_weather(&mut self, now: Instant) {
        let interval = self.refresh.weather_interval();
        if !self.fetch_due(&self.state.weather, now, interval) {
            return;
        }

        let deadline = self.refresh.fetch_timeout();
        let source = &mut self.weather_source;
        let location = self.location.as_str();
        let cache = &mut self.state.weather;
        debug!("Weather is stale, fetching for '{}'", location);

        match cache
            .refresh_if_stale(now, interval, move || {
                with_deadline(deadline, source.fetch(location))
            })
            .await
        {
            Ok(Refresh::Fetched) => {
                if let Some(weather) = cache.value() {
                    info!("Weather updated: {}", format_weather(weather));
                }
            }
            Ok(Refresh::Fresh) => {}
            Err(e) => warn!("Weather refresh failed, keeping last value: {}", e),
        }
    }

    async fn refresh_news(&mut self, now: Instant) {
        let interval = self.refresh.news_interval();
        if !self.fetch_due(&self.state.news, now, interval) {
            return;
        }

        let deadline = self.refresh.fetch_timeout();
        let source = &mut self.news_source;
        let cache = &mut self.state.news;
        debug!("News is stale, fetching top stories");

        match cache
            .refresh_if_stale(now, interval, || async move {
                with_deadline(deadline, source.fetch_top_stories())
                    .await
                    .map(|stories| news_digest(&stories))
            })
            .await
        {
            Ok(Refresh::Fetched) => {
                let chars = cache.value().map_or(0, |digest| digest.chars().count());
                info!("News updated: {} characters of headlines", chars);
            }
            Ok(Refresh::Fresh) => {}
            Err(e) => warn!("News refresh failed, keeping last ticker: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use core::cell::Cell;
    use embassy_futures::block_on;
    use embedded_graphics::pixelcolor::Rgb888;

    use crate::config::FontConfig;
    use crate::framebuffer::FrameCanvas;
    use crate::sources::{CompassPoint, Headline, Units, WeatherKind};

    struct TestPanel {
        swaps: usize,
        fail_swap: bool,
    }

    impl MatrixPanel for TestPanel {
        type Canvas = FrameCanvas;
        type Error = &'static str;

        fn size(&self) -> Size {
            Size::new(192, 64)
        }

        fn create_canvas(&mut self) -> Result<FrameCanvas, &'static str> {
            Ok(FrameCanvas::new(self.size()))
        }

        fn swap_on_vsync(&mut self, mut canvas: FrameCanvas) -> Result<FrameCanvas, &'static str> {
            if self.fail_swap {
                return Err("vsync lost");
            }
            self.swaps += 1;
            canvas.mark_clean();
            Ok(canvas)
        }
    }

    enum Behaviour {
        Succeed,
        Fail,
        Hang,
    }

    struct TestWeather {
        calls: usize,
        behaviour: Behaviour,
    }

    impl WeatherSource for TestWeather {
        async fn fetch(&mut self, location: &str) -> Result<Weather, FetchError> {
            assert_eq!(location, "Los Angeles");
            self.calls += 1;
            match self.behaviour {
                Behaviour::Succeed => Ok(Weather {
                    temperature: 72,
                    wind_direction: CompassPoint::W,
                    wind_speed: 5,
                    kind: WeatherKind::Sunny,
                    units: Units::Imperial,
                }),
                Behaviour::Fail => Err(FetchError::Status(503)),
                Behaviour::Hang => core::future::pending().await,
            }
        }
    }

    struct TestNews {
        calls: usize,
    }

    impl NewsSource for TestNews {
        async fn fetch_top_stories(&mut self) -> Result<Vec<Headline>, FetchError> {
            self.calls += 1;
            Ok(vec![Headline::new("First story"), Headline::new("Second story")])
        }
    }

    /// Wall clock frozen at 19:04:14 UTC; the monotonic clock is moved by hand.
    struct TestClock {
        zone: FixedOffset,
        utc: DateTime<Utc>,
        secs: Cell<u64>,
    }

    impl TestClock {
        fn new() -> Self {
            Self {
                zone: FixedOffset::west_opt(7 * 3600).unwrap(),
                utc: Utc.with_ymd_and_hms(2026, 10, 16, 19, 4, 14).unwrap(),
                secs: Cell::new(10_000),
            }
        }

        fn advance(&self, secs: u64) {
            self.secs.set(self.secs.get() + secs);
        }
    }

    impl Clock for TestClock {
        type Zone = FixedOffset;

        fn now_utc(&self) -> DateTime<Utc> {
            self.utc
        }

        fn zone(&self) -> &FixedOffset {
            &self.zone
        }

        fn instant(&self) -> Instant {
            Instant::from_secs(self.secs.get())
        }
    }

    type TestBoard = Board<TestPanel, TestWeather, TestNews, TestClock>;

    fn try_board(
        config: &BoardConfig,
        behaviour: Behaviour,
    ) -> Result<TestBoard, BoardError<&'static str>> {
        Board::new(
            config,
            FontSet::builtin(&FontConfig::builtin()).unwrap(),
            TestPanel {
                swaps: 0,
                fail_swap: false,
            },
            TestWeather {
                calls: 0,
                behaviour,
            },
            TestNews { calls: 0 },
            TestClock::new(),
        )
    }

    fn board(behaviour: Behaviour) -> TestBoard {
        let mut config = BoardConfig::default();
        config.refresh.fetch_timeout_secs = 1;
        try_board(&config, behaviour).unwrap()
    }

    fn canvas_has(board: &TestBoard, color: Rgb888) -> bool {
        let canvas = board.state().canvas().unwrap();
        canvas
            .bounding_box()
            .points()
            .any(|p| canvas.pixel(p) == Some(color))
    }

    #[test]
    fn test_first_frame_fetches_and_draws_everything() {
        let mut board = board(Behaviour::Succeed);
        block_on(board.prepare_frame()).unwrap();

        assert_eq!(board.weather_source.calls, 1);
        assert_eq!(board.news_source.calls, 1);
        assert_eq!(
            board.state().news().value().map(String::as_str),
            Some("First story Second story")
        );
        // 19:04:14 has an odd tens digit, so the local face is shown.
        assert!(canvas_has(&board, colors::LOCAL_TIME));
        assert!(canvas_has(&board, colors::DATE));
        assert!(canvas_has(&board, colors::WEATHER));
        // The ticker enters from the right edge.
        assert_eq!(board.state().scroll().get(), 191);
    }

    #[test]
    fn test_fresh_data_is_not_refetched() {
        let mut board = board(Behaviour::Succeed);
        block_on(board.prepare_frame()).unwrap();
        board.clock().advance(3599);
        block_on(board.prepare_frame()).unwrap();

        assert_eq!(board.weather_source.calls, 1);
        assert_eq!(board.news_source.calls, 1);
        assert_eq!(board.state().scroll().get(), 190);
    }

    #[test]
    fn test_stale_data_is_refetched() {
        let mut board = board(Behaviour::Succeed);
        block_on(board.prepare_frame()).unwrap();
        board.clock().advance(3601);
        block_on(board.prepare_frame()).unwrap();

        assert_eq!(board.weather_source.calls, 2);
        assert_eq!(board.news_source.calls, 2);
        assert_eq!(
            board.state().weather().fetched_at(),
            Some(Instant::from_secs(10_000 + 3601))
        );
    }

    #[test]
    fn test_weather_failure_still_renders_clock_and_retries_after_cooldown() {
        let mut board = board(Behaviour::Fail);
        block_on(board.prepare_frame()).unwrap();

        assert!(board.state().weather().value().is_none());
        assert!(canvas_has(&board, colors::LOCAL_TIME));
        assert!(canvas_has(&board, colors::DATE));
        assert!(!canvas_has(&board, colors::WEATHER));

        // Inside the retry cooldown: no new attempt.
        board.clock().advance(30);
        block_on(board.prepare_frame()).unwrap();
        assert_eq!(board.weather_source.calls, 1);

        board.clock().advance(30);
        block_on(board.prepare_frame()).unwrap();
        assert_eq!(board.weather_source.calls, 2);
    }

    #[test]
    fn test_hung_weather_source_hits_deadline() {
        let mut board = board(Behaviour::Hang);
        block_on(board.prepare_frame()).unwrap();

        assert_eq!(board.weather_source.calls, 1);
        assert!(board.state().weather().failed_at().is_some());
        assert_eq!(board.news_source.calls, 1);
    }

    #[test]
    fn test_present_swaps_canvas() {
        let mut board = board(Behaviour::Succeed);
        block_on(board.prepare_frame()).unwrap();
        board.present().unwrap();

        assert_eq!(board.panel().swaps, 1);
        assert!(board.state().canvas().is_some());
    }

    #[test]
    fn test_failed_swap_is_fatal() {
        let mut board = board(Behaviour::Succeed);
        board.panel.fail_swap = true;

        assert!(matches!(board.present(), Err(BoardError::Panel("vsync lost"))));
        assert!(matches!(
            block_on(board.prepare_frame()),
            Err(BoardError::CanvasUnavailable)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_startup() {
        let mut config = BoardConfig::default();
        config.location = String::from("  ");

        assert!(matches!(
            try_board(&config, Behaviour::Succeed),
            Err(BoardError::Config(ConfigError::Invalid(_)))
        ));
    }
}
