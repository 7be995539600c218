//! RAM frame canvas with change detection.
//!
//! Panels without their own off-screen buffer draw each frame into a
//! [`FrameCanvas`]. The canvas tracks the rectangle of pixels that changed
//! since the previous swap, so a panel can skip a frame nothing changed in.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors;

/// Bounding box of pixels that have changed since the last swap.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(self.width() as u32, self.height() as u32),
        )
    }
}

/// Heap-allocated `Rgb888` canvas implementing `DrawTarget`.
///
/// Clearing and redrawing an unchanged frame leaves the canvas clean, so a
/// static picture costs nothing to present.
pub struct FrameCanvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb888>,
    dirty: Option<DirtyRect>,
}

impl FrameCanvas {
    /// Allocate a canvas filled with the background color.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![colors::BACKGROUND; width * height],
            dirty: None,
        }
    }

    /// Color at `point`, or `None` outside the canvas.
    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.width + x])
    }

    /// Region changed since the last swap, if any.
    pub fn dirty_region(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    /// Take the pending changed region and reset the dirty state.
    pub fn mark_clean(&mut self) -> Option<Rectangle> {
        self.dirty.take().map(DirtyRect::to_rectangle)
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }
}

impl OriginDimensions for FrameCanvas {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_new_canvas_is_clean() {
        let canvas = FrameCanvas::new(Size::new(8, 4));
        assert!(canvas.dirty_region().is_none());
        assert_eq!(canvas.pixel(Point::new(7, 3)), Some(colors::BACKGROUND));
        assert_eq!(canvas.pixel(Point::new(8, 0)), None);
        assert_eq!(canvas.pixel(Point::new(-1, 0)), None);
    }

    #[test]
    fn test_dirty_region_bounds_changed_pixels() {
        let mut canvas = FrameCanvas::new(Size::new(16, 8));
        Pixel(Point::new(2, 1), Rgb888::RED).draw(&mut canvas).unwrap();
        Pixel(Point::new(5, 6), Rgb888::RED).draw(&mut canvas).unwrap();

        assert_eq!(
            canvas.dirty_region(),
            Some(Rectangle::new(Point::new(2, 1), Size::new(4, 6)))
        );
    }

    #[test]
    fn test_redrawing_same_frame_stays_clean() {
        let mut canvas = FrameCanvas::new(Size::new(16, 8));
        Pixel(Point::new(3, 3), Rgb888::GREEN).draw(&mut canvas).unwrap();
        canvas.mark_clean();

        canvas.clear(colors::BACKGROUND).unwrap();
        Pixel(Point::new(3, 3), Rgb888::GREEN).draw(&mut canvas).unwrap();
        // The clear touched (3, 3) and the redraw restored it.
        assert_eq!(
            canvas.dirty_region(),
            Some(Rectangle::new(Point::new(3, 3), Size::new(1, 1)))
        );
        assert_eq!(canvas.pixel(Point::new(3, 3)), Some(Rgb888::GREEN));
    }

    #[test]
    fn test_fill_solid_is_clipped() {
        let mut canvas = FrameCanvas::new(Size::new(4, 4));
        Rectangle::new(Point::new(2, 2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::BLUE))
            .draw(&mut canvas)
            .unwrap();

        assert_eq!(canvas.pixel(Point::new(3, 3)), Some(Rgb888::BLUE));
        assert_eq!(canvas.pixel(Point::new(1, 1)), Some(colors::BACKGROUND));
        assert_eq!(
            canvas.dirty_region(),
            Some(Rectangle::new(Point::new(2, 2), Size::new(2, 2)))
        );
    }

    #[test]
    fn test_mark_clean_hands_over_changed_region_once() {
        let mut canvas = FrameCanvas::new(Size::new(4, 4));
        Pixel(Point::new(1, 2), Rgb888::WHITE).draw(&mut canvas).unwrap();

        assert_eq!(
            canvas.mark_clean(),
            Some(Rectangle::new(Point::new(1, 2), Size::new(1, 1)))
        );
        assert_eq!(canvas.mark_clean(), None);
        assert_eq!(canvas.pixel(Point::new(1, 2)), Some(Rgb888::WHITE));
    }
}
