//! Font loading
//!
//! A font reference is either a path to a BDF file (`fonts/7x13.bdf`, or
//! anything containing a path separator or ending in `.bdf`) or the bare name
//! of one of the ISO-8859-1 fonts built into embedded-graphics (`7x13`,
//! `9x15B`, `8x13O`). Files are read through a caller-supplied loader, so this
//! crate never touches a filesystem; a path that cannot be read or parsed is
//! a startup error.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use embedded_graphics::mono_font::iso_8859_1 as latin1;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use super::bdf::BdfFont;
use crate::config::{ConfigError, FontConfig};

#[derive(Clone)]
pub enum Font {
    Builtin(&'static MonoFont<'static>),
    Bdf(Rc<BdfFont>),
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(font) => write!(
                f,
                "Builtin({}x{})",
                font.character_size.width, font.character_size.height
            ),
            Self::Bdf(font) => write!(f, "Bdf({} glyphs)", font.glyph_count()),
        }
    }
}

impl Font {
    /// Rows one line of text occupies.
    pub fn line_height(&self) -> u32 {
        match self {
            Self::Builtin(font) => font.character_size.height,
            Self::Bdf(font) => font.line_height(),
        }
    }

    /// Width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        match self {
            Self::Builtin(font) => {
                text.chars().count() as u32 * (font.character_size.width + font.character_spacing)
            }
            Self::Bdf(font) => font.text_width(text),
        }
    }

    /// Draw `text` with its top-left corner at `position`. Returns the drawn
    /// width in pixels.
    pub fn draw<D>(&self, canvas: &mut D, position: Point, color: Rgb888, text: &str) -> Result<u32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        match self {
            Self::Builtin(font) => {
                let style = MonoTextStyle::new(font, color);
                let end = Text::with_baseline(text, position, style, Baseline::Top).draw(canvas)?;
                Ok((end.x - position.x).max(0) as u32)
            }
            Self::Bdf(font) => font.draw(canvas, position, color, text),
        }
    }
}

/// True when `name` refers to a file rather than a built-in font.
fn is_path(name: &str) -> bool {
    name.contains(['/', '\\']) || name.ends_with(".bdf")
}

/// Look up a font compiled into embedded-graphics by its X11 name.
pub fn builtin_font(name: &str) -> Result<Font, ConfigError> {
    let font = match name {
        "4x6" => &latin1::FONT_4X6,
        "5x7" => &latin1::FONT_5X7,
        "5x8" => &latin1::FONT_5X8,
        "6x9" => &latin1::FONT_6X9,
        "6x10" => &latin1::FONT_6X10,
        "6x12" => &latin1::FONT_6X12,
        "6x13" => &latin1::FONT_6X13,
        "6x13B" => &latin1::FONT_6X13_BOLD,
        "6x13O" => &latin1::FONT_6X13_ITALIC,
        "7x13" => &latin1::FONT_7X13,
        "7x13B" => &latin1::FONT_7X13_BOLD,
        "7x13O" => &latin1::FONT_7X13_ITALIC,
        "7x14" => &latin1::FONT_7X14,
        "7x14B" => &latin1::FONT_7X14_BOLD,
        "8x13" => &latin1::FONT_8X13,
        "8x13B" => &latin1::FONT_8X13_BOLD,
        "8x13O" => &latin1::FONT_8X13_ITALIC,
        "9x15" => &latin1::FONT_9X15,
        "9x15B" => &latin1::FONT_9X15_BOLD,
        "9x18" => &latin1::FONT_9X18,
        "9x18B" => &latin1::FONT_9X18_BOLD,
        "10x20" => &latin1::FONT_10X20,
        _ => return Err(ConfigError::UnknownFont(String::from(name))),
    };
    Ok(Font::Builtin(font))
}

/// Resolve one font reference, reading files through `read`.
pub fn load_font<R>(name: &str, read: &mut R) -> Result<Font, ConfigError>
where
    R: FnMut(&str) -> Result<Vec<u8>, String>,
{
    let name = name.trim();
    if !is_path(name) {
        return builtin_font(name);
    }

    let font_file_error = |reason: String| ConfigError::FontFile {
        path: String::from(name),
        reason,
    };
    let bytes = read(name).map_err(font_file_error)?;
    let font = BdfFont::parse(&bytes).map_err(|e| font_file_error(e.to_string()))?;
    log::debug!("Loaded {} glyphs from {}", font.glyph_count(), name);
    Ok(Font::Bdf(Rc::new(font)))
}

/// The three fonts the board draws with.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub time: Font,
    pub date: Font,
    /// Weather line and news ticker
    pub detail: Font,
}

impl FontSet {
    /// Load every font named in `config`. A file named twice is read once.
    pub fn load<R>(config: &FontConfig, mut read: R) -> Result<Self, ConfigError>
    where
        R: FnMut(&str) -> Result<Vec<u8>, String>,
    {
        let mut loaded: Vec<(String, Font)> = Vec::new();
        let mut resolve = |name: &str| -> Result<Font, ConfigError> {
            if let Some((_, font)) = loaded.iter().find(|(seen, _)| seen == name) {
                return Ok(font.clone());
            }
            let font = load_font(name, &mut read)?;
            loaded.push((String::from(name), font.clone()));
            Ok(font)
        };

        Ok(Self {
            time: resolve(&config.time)?,
            date: resolve(&config.date)?,
            detail: resolve(&config.detail)?,
        })
    }

    /// Load fonts that are all built in; any file reference is an error.
    pub fn builtin(config: &FontConfig) -> Result<Self, ConfigError> {
        Self::load(config, |path| Err(format!("no font files available to load {path}")))
    }
}
