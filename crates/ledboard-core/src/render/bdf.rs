//! BDF bitmap fonts
//!
//! Parses the Glyph Bitmap Distribution Format used by the X11 misc-fixed
//! fonts (`7x13.bdf`, `9x15B.bdf`, ...) and draws text with it. Only the
//! parts needed to render are kept: the font ascent and descent, and for
//! each encoded glyph its advance, bounding box and bitmap.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BdfError {
    #[error("not a BDF font (missing STARTFONT)")]
    NotBdf,
    #[error("line {line}: {reason}")]
    Syntax { line: usize, reason: &'static str },
    #[error("missing FONTBOUNDINGBOX")]
    MissingBoundingBox,
    #[error("font has no encoded glyphs")]
    NoGlyphs,
}

fn syntax(line: usize, reason: &'static str) -> BdfError {
    BdfError::Syntax { line, reason }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Glyph {
    advance: i32,
    width: u32,
    height: u32,
    x_offset: i32,
    /// Offset of the bitmap's bottom row from the baseline, up positive
    y_offset: i32,
    /// Rows of `width.div_ceil(8)` bytes, most significant bit leftmost
    bitmap: Vec<u8>,
}

impl Glyph {
    fn stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Set pixels relative to the bitmap's top-left corner.
    fn pixels(&self) -> impl Iterator<Item = Point> + '_ {
        let stride = self.stride();
        (0..self.height).flat_map(move |row| {
            (0..self.width).filter_map(move |col| {
                let byte = self.bitmap[row as usize * stride + col as usize / 8];
                (byte & (0x80 >> (col % 8)) != 0).then(|| Point::new(col as i32, row as i32))
            })
        })
    }
}

#[derive(Default)]
struct GlyphBuilder {
    encoding: Option<i32>,
    advance: Option<i32>,
    bbx: Option<[i32; 4]>,
    bitmap: Vec<u8>,
}

impl GlyphBuilder {
    /// `None` for glyphs without a usable encoding (`ENCODING -1`).
    fn finish(
        self,
        default_advance: Option<i32>,
        line: usize,
    ) -> Result<Option<(char, Glyph)>, BdfError> {
        let encoding = self.encoding.ok_or(syntax(line, "glyph without ENCODING"))?;
        let [width, height, x_offset, y_offset] =
            self.bbx.ok_or(syntax(line, "glyph without BBX"))?;
        let advance = self
            .advance
            .or(default_advance)
            .ok_or(syntax(line, "glyph without DWIDTH"))?;

        let (width, height) = (width.max(0) as u32, height.max(0) as u32);
        if self.bitmap.len() != (width as usize).div_ceil(8) * height as usize {
            return Err(syntax(line, "glyph without BITMAP"));
        }

        let Some(c) = u32::try_from(encoding).ok().and_then(char::from_u32) else {
            return Ok(None);
        };
        Ok(Some((
            c,
            Glyph {
                advance,
                width,
                height,
                x_offset,
                y_offset,
                bitmap: self.bitmap,
            },
        )))
    }
}

/// The first `N` whitespace-separated integers of `fields`.
fn numbers<const N: usize>(fields: &str, line: usize) -> Result<[i32; N], BdfError> {
    let mut out = [0; N];
    let mut fields = fields.split_whitespace();
    for slot in &mut out {
        *slot = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or(syntax(line, "expected a number"))?;
    }
    Ok(out)
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

/// Append the first `stride` bytes of a hex bitmap row.
fn push_hex_row(row: &str, stride: usize, out: &mut Vec<u8>, line: usize) -> Result<(), BdfError> {
    let digits = row.as_bytes();
    if digits.len() < stride * 2 {
        return Err(syntax(line, "bitmap row too short"));
    }
    for pair in digits[..stride * 2].chunks_exact(2) {
        let (Some(hi), Some(lo)) = (hex_digit(pair[0]), hex_digit(pair[1])) else {
            return Err(syntax(line, "bitmap row is not hex"));
        };
        out.push(hi << 4 | lo);
    }
    Ok(())
}

/// A parsed BDF font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BdfFont {
    ascent: i32,
    descent: i32,
    /// Advance of characters the font has no glyph for
    missing_advance: i32,
    default_char: Option<char>,
    glyphs: BTreeMap<char, Glyph>,
}

impl BdfFont {
    pub fn parse(source: &[u8]) -> Result<Self, BdfError> {
        let text = String::from_utf8_lossy(source);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        match lines.next() {
            Some((_, first)) if first.starts_with("STARTFONT") => {}
            _ => return Err(BdfError::NotBdf),
        }

        let mut bounding_box: Option<[i32; 4]> = None;
        let mut ascent = None;
        let mut descent = None;
        let mut default_char = None;
        let mut default_advance = None;
        let mut glyphs = BTreeMap::new();
        let mut glyph: Option<GlyphBuilder> = None;

        while let Some((line, content)) = lines.next() {
            let (keyword, fields) = content
                .split_once(char::is_whitespace)
                .map_or((content, ""), |(k, f)| (k, f.trim()));

            match keyword {
                "FONTBOUNDINGBOX" => bounding_box = Some(numbers::<4>(fields, line)?),
                "FONT_ASCENT" => ascent = Some(numbers::<1>(fields, line)?[0]),
                "FONT_DESCENT" => descent = Some(numbers::<1>(fields, line)?[0]),
                "DEFAULT_CHAR" => {
                    default_char = u32::try_from(numbers::<1>(fields, line)?[0])
                        .ok()
                        .and_then(char::from_u32);
                }
                "STARTCHAR" => glyph = Some(GlyphBuilder::default()),
                "ENCODING" => in_glyph(&mut glyph, line)?.encoding = Some(numbers::<1>(fields, line)?[0]),
                "DWIDTH" => {
                    let [advance] = numbers::<1>(fields, line)?;
                    match glyph.as_mut() {
                        Some(builder) => builder.advance = Some(advance),
                        None => default_advance = Some(advance),
                    }
                }
                "BBX" => in_glyph(&mut glyph, line)?.bbx = Some(numbers::<4>(fields, line)?),
                "BITMAP" => {
                    let builder = in_glyph(&mut glyph, line)?;
                    let [width, height, _, _] = builder.bbx.ok_or(syntax(line, "BITMAP before BBX"))?;
                    let stride = (width.max(0) as usize).div_ceil(8);
                    for _ in 0..height.max(0) {
                        let (row_line, row) = lines.next().ok_or(syntax(line, "bitmap ends early"))?;
                        push_hex_row(row, stride, &mut builder.bitmap, row_line)?;
                    }
                }
                "ENDCHAR" => {
                    let builder = glyph.take().ok_or(syntax(line, "ENDCHAR outside a glyph"))?;
                    if let Some((c, parsed)) = builder.finish(default_advance, line)? {
                        glyphs.insert(c, parsed);
                    }
                }
                "ENDFONT" => break,
                _ => {}
            }
        }

        let [box_width, box_height, _, box_y_offset] =
            bounding_box.ok_or(BdfError::MissingBoundingBox)?;
        if glyphs.is_empty() {
            return Err(BdfError::NoGlyphs);
        }

        Ok(Self {
            ascent: ascent.unwrap_or(box_height + box_y_offset),
            descent: descent.unwrap_or(-box_y_offset),
            missing_advance: box_width,
            default_char,
            glyphs,
        })
    }

    /// Rows from the top of the tallest ascender to the bottom of the
    /// deepest descender.
    pub fn line_height(&self) -> u32 {
        (self.ascent + self.descent).max(0) as u32
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph for `c`, falling back to the font's default character.
    fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs
            .get(&c)
            .or_else(|| self.default_char.and_then(|d| self.glyphs.get(&d)))
    }

    fn advance(&self, c: char) -> i32 {
        self.glyph(c).map_or(self.missing_advance, |g| g.advance)
    }

    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.advance(c)).sum::<i32>().max(0) as u32
    }

    /// Draw `text` with the top of the font's ascent at `position.y`.
    ///
    /// Returns the summed advance of all characters in pixels.
    pub fn draw<D>(&self, canvas: &mut D, position: Point, color: Rgb888, text: &str) -> Result<u32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let baseline = position.y + self.ascent;
        let mut pen_x = position.x;

        for c in text.chars() {
            let Some(glyph) = self.glyph(c) else {
                pen_x += self.missing_advance;
                continue;
            };
            let origin = Point::new(
                pen_x + glyph.x_offset,
                baseline - glyph.y_offset - glyph.height as i32,
            );
            canvas.draw_iter(glyph.pixels().map(|p| Pixel(origin + p, color)))?;
            pen_x += glyph.advance;
        }

        Ok((pen_x - position.x).max(0) as u32)
    }
}

fn in_glyph(glyph: &mut Option<GlyphBuilder>, line: usize) -> Result<&mut GlyphBuilder, BdfError> {
    glyph
        .as_mut()
        .ok_or(syntax(line, "glyph field outside STARTCHAR"))
}
