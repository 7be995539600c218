//! Matrix panel abstraction
//!
//! The board composes each frame on an off-screen canvas and hands it to the
//! panel, which presents it on the next vertical sync and gives back a canvas
//! for the following frame. Drivers with hardware double buffering return
//! their spare buffer; simpler displays flush a [`FrameCanvas`] and return it.
//!
//! [`FrameCanvas`]: crate::framebuffer::FrameCanvas

use core::convert::Infallible;
use core::fmt::Debug;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

pub trait MatrixPanel {
    /// Off-screen buffer the board draws into. Drawing is a RAM operation and
    /// cannot fail.
    type Canvas: DrawTarget<Color = Rgb888, Error = Infallible>;

    type Error: Debug;

    /// Visible size of the whole panel chain.
    fn size(&self) -> Size;

    /// Allocate the off-screen canvas. Called once at startup.
    fn create_canvas(&mut self) -> Result<Self::Canvas, Self::Error>;

    /// Present `canvas` on the next vertical sync and return the canvas to
    /// draw the next frame into.
    fn swap_on_vsync(&mut self, canvas: Self::Canvas) -> Result<Self::Canvas, Self::Error>;
}
