//! Frame composition
//!
//! [`FrameRenderer`] places the already-formatted fields at fixed positions
//! on the off-screen canvas. It makes no decisions of its own: colors, text
//! and the ticker offset arrive in a [`FrameContent`].

mod bdf;
mod fonts;
mod layout;

pub use bdf::{BdfError, BdfFont};
pub use fonts::*;
pub use layout::*;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::colors;

/// Everything drawn in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContent<'a> {
    pub time: &'a str,
    pub time_color: Rgb888,
    pub date: &'a str,
    /// `None` until the first successful weather fetch
    pub weather: Option<&'a str>,
    pub ticker: &'a str,
    pub ticker_offset: i32,
}

/// Draw `text` with its top-left corner at `position`.
///
/// Returns the drawn width in pixels.
pub fn draw_text<D>(
    canvas: &mut D,
    font: &Font,
    position: Point,
    color: Rgb888,
    text: &str,
) -> Result<u32, D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    font.draw(canvas, position, color, text)
}

/// Draws frames with a fixed [`FontSet`] and the [`Layout`] derived from it.
///
/// The layout is computed once from the font heights and the panel height;
/// only the content and the ticker offset change between frames.
pub struct FrameRenderer {
    fonts: FontSet,
    layout: Layout,
}

impl FrameRenderer {
    pub fn new(fonts: FontSet, panel_height: u32) -> Self {
        Self {
            layout: Layout::stack(&fonts, panel_height),
            fonts,
        }
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Draw every field of `frame`. Returns the ticker width in pixels.
    pub fn render<D>(&self, canvas: &mut D, frame: &FrameContent<'_>) -> Result<u32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        draw_text(
            canvas,
            &self.fonts.time,
            self.layout.time,
            frame.time_color,
            frame.time,
        )?;
        draw_text(
            canvas,
            &self.fonts.date,
            self.layout.date,
            colors::DATE,
            frame.date,
        )?;
        if let Some(weather) = frame.weather {
            draw_text(
                canvas,
                &self.fonts.detail,
                self.layout.weather,
                colors::WEATHER,
                weather,
            )?;
        }
        draw_text(
            canvas,
            &self.fonts.detail,
            Point::new(frame.ticker_offset, self.layout.ticker_y),
            colors::TICKER,
            frame.ticker,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::framebuffer::FrameCanvas;
    use crate::sources::{Headline, news_digest};
    use embedded_graphics::primitives::Rectangle;
    use alloc::string::String;

    fn renderer() -> FrameRenderer {
        FrameRenderer::new(FontSet::builtin(&FontConfig::builtin()).unwrap(), 64)
    }

    fn frame<'a>(weather: Option<&'a str>, ticker: &'a str, offset: i32) -> FrameContent<'a> {
        FrameContent {
            time: "19:04:14:UTC",
            time_color: colors::UTC_TIME,
            date: "Friday October 16, 2026",
            weather,
            ticker,
            ticker_offset: offset,
        }
    }

    /// Any pixel of `color` inside the horizontal band `y..y + height`.
    fn band_has_color(canvas: &FrameCanvas, y: i32, height: u32, color: Rgb888) -> bool {
        let band = Rectangle::new(Point::new(0, y), Size::new(canvas.size().width, height));
        band.points().any(|p| canvas.pixel(p) == Some(color))
    }

    #[test]
    fn test_draw_text_reports_width() {
        let mut canvas = FrameCanvas::new(Size::new(192, 64));
        let font = builtin_font("7x13").unwrap();
        let width = draw_text(&mut canvas, &font, Point::new(1, 0), colors::TICKER, "hello").unwrap();
        assert_eq!(width, 35);
        assert_eq!(width, font.text_width("hello"));
    }

    #[test]
    fn test_ticker_width_is_independent_of_offset() {
        let renderer = renderer();
        let mut canvas = FrameCanvas::new(Size::new(192, 64));
        let ticker = "Markets rally Storm heads north";

        let on_panel = renderer.render(&mut canvas, &frame(None, ticker, 10)).unwrap();
        let off_panel = renderer.render(&mut canvas, &frame(None, ticker, -500)).unwrap();

        assert_eq!(on_panel, renderer.fonts().detail.text_width(ticker));
        assert_eq!(on_panel, off_panel);
    }

    #[test]
    fn test_fields_land_in_their_rows() {
        let renderer = renderer();
        let layout = *renderer.layout();
        let mut canvas = FrameCanvas::new(Size::new(192, 64));

        renderer
            .render(&mut canvas, &frame(Some("72°F NNW 8mph Sunny"), "Headline", 0))
            .unwrap();

        assert!(band_has_color(&canvas, layout.time.y, 15, colors::UTC_TIME));
        assert!(band_has_color(&canvas, layout.date.y, 13, colors::DATE));
        assert!(band_has_color(&canvas, layout.weather.y, 13, colors::WEATHER));
        assert!(band_has_color(&canvas, layout.ticker_y, 13, colors::TICKER));
        assert!(!band_has_color(&canvas, 0, 64, colors::LOCAL_TIME));
    }

    #[test]
    fn test_font_files_drive_layout_and_ticker_width() {
        let fonts = FontSet::load(&FontConfig::default(), |_: &str| -> Result<_, String> {
            Ok(crate::render::bdf::tests::TINY.as_bytes().to_vec())
        })
        .unwrap();
        let renderer = FrameRenderer::new(fonts, 64);
        let mut canvas = FrameCanvas::new(Size::new(192, 64));

        let width = renderer.render(&mut canvas, &frame(None, "AA", 0)).unwrap();

        assert_eq!(width, 10);
        assert_eq!(renderer.layout().date.y - renderer.layout().time.y, 6 + 13);
        assert!(band_has_color(&canvas, renderer.layout().ticker_y, 6, colors::TICKER));
    }

    #[test]
    fn test_multiline_headline_draws_as_one_ticker_line() {
        let renderer = renderer();
        let mut canvas = FrameCanvas::new(Size::new(192, 64));
        let digest = news_digest(&[
            Headline::new("Long headline\nhere"),
            Headline::new("Hi"),
        ]);

        let width = renderer.render(&mut canvas, &frame(None, &digest, 0)).unwrap();

        assert_eq!(width, renderer.fonts().detail.text_width("Long headline here Hi"));
    }

    #[test]
    fn test_missing_weather_leaves_row_empty() {
        let renderer = renderer();
        let layout = *renderer.layout();
        let mut canvas = FrameCanvas::new(Size::new(192, 64));

        renderer.render(&mut canvas, &frame(None, "", 0)).unwrap();

        assert!(!band_has_color(&canvas, layout.weather.y, 13, colors::WEATHER));
        assert!(!band_has_color(&canvas, layout.ticker_y, 13, colors::TICKER));
    }
}
