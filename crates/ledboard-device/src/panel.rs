//! Panels the binary can drive
//!
//! Without the `hardware` feature the board renders into a [`HeadlessPanel`]
//! that only logs what changed, which is enough to run the whole pipeline on
//! a development machine. With it, frames go to a HUB75 chain through
//! `rpi-led-panel`.

use core::convert::Infallible;

use embedded_graphics::prelude::*;
use ledboard_core::config::PanelConfig;
use ledboard_core::framebuffer::FrameCanvas;
use ledboard_core::panel::MatrixPanel;
use log::{debug, trace};

use crate::error::DeviceError;

#[cfg(not(feature = "hardware"))]
pub type DevicePanel = HeadlessPanel;
#[cfg(feature = "hardware")]
pub type DevicePanel = hub75::HubPanel;

/// Frames between progress messages of the headless panel (one minute at 20 FPS).
const HEADLESS_REPORT_EVERY: u64 = 1200;

pub struct HeadlessPanel {
    size: Size,
    frames: u64,
}

impl HeadlessPanel {
    pub fn open(config: &PanelConfig) -> Result<Self, DeviceError> {
        let size = Size::new(config.width(), config.height());
        debug!("Headless panel {}x{}", size.width, size.height);
        Ok(Self { size, frames: 0 })
    }
}

impl MatrixPanel for HeadlessPanel {
    type Canvas = FrameCanvas;
    type Error = Infallible;

    fn size(&self) -> Size {
        self.size
    }

    fn create_canvas(&mut self) -> Result<FrameCanvas, Infallible> {
        Ok(FrameCanvas::new(self.size))
    }

    fn swap_on_vsync(&mut self, mut canvas: FrameCanvas) -> Result<FrameCanvas, Infallible> {
        self.frames += 1;
        if let Some(region) = canvas.mark_clean() {
            trace!(
                "Frame {}: {}x{} changed at ({}, {})",
                self.frames,
                region.size.width,
                region.size.height,
                region.top_left.x,
                region.top_left.y
            );
        }
        if self.frames % HEADLESS_REPORT_EVERY == 0 {
            debug!("Presented {} frames", self.frames);
        }
        Ok(canvas)
    }
}

#[cfg(feature = "hardware")]
mod hub75 {
    use core::convert::Infallible;

    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;
    use ledboard_core::config::PanelConfig;
    use ledboard_core::panel::MatrixPanel;
    use log::info;
    use rpi_led_panel::{Canvas, RGBMatrix, RGBMatrixConfig};

    use crate::error::DeviceError;

    /// Off-screen canvas of the HUB75 driver.
    pub struct HubCanvas(Box<Canvas>);

    impl OriginDimensions for HubCanvas {
        fn size(&self) -> Size {
            OriginDimensions::size(&*self.0)
        }
    }

    impl DrawTarget for HubCanvas {
        type Color = Rgb888;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
        where
            I: IntoIterator<Item = Pixel<Rgb888>>,
        {
            DrawTarget::draw_iter(&mut *self.0, pixels)
        }

        fn clear(&mut self, color: Rgb888) -> Result<(), Infallible> {
            DrawTarget::clear(&mut *self.0, color)
        }
    }

    pub struct HubPanel {
        matrix: RGBMatrix,
        size: Size,
        /// Canvas handed out by the driver at init, until the board claims it
        spare: Option<Box<Canvas>>,
    }

    impl HubPanel {
        pub fn open(config: &PanelConfig) -> Result<Self, DeviceError> {
            let matrix_config = RGBMatrixConfig {
                rows: config.rows as usize,
                cols: config.cols as usize,
                chain_length: config.chain_length as usize,
                ..Default::default()
            };
            let (matrix, canvas) = RGBMatrix::new(matrix_config, 0)
                .map_err(|e| DeviceError::Panel(format!("{e:?}")))?;

            let size = Size::new(config.width(), config.height());
            info!(
                "HUB75 chain of {} panels ({}x{}) initialized",
                config.chain_length, size.width, size.height
            );
            Ok(Self {
                matrix,
                size,
                spare: Some(canvas),
            })
        }
    }

    impl MatrixPanel for HubPanel {
        type Canvas = HubCanvas;
        type Error = DeviceError;

        fn size(&self) -> Size {
            self.size
        }

        fn create_canvas(&mut self) -> Result<HubCanvas, DeviceError> {
            self.spare
                .take()
                .map(HubCanvas)
                .ok_or_else(|| DeviceError::Panel("driver canvas already claimed".into()))
        }

        fn swap_on_vsync(&mut self, canvas: HubCanvas) -> Result<HubCanvas, DeviceError> {
            Ok(HubCanvas(self.matrix.update_on_vsync(canvas.0)))
        }
    }
}
