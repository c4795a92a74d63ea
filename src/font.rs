//! Utilities to measure and rasterize text onto image frames

use std::path::Path;

use font_kit::canvas::{Canvas, Format, RasterizationOptions};
use font_kit::hinting::HintingOptions;
use font_kit::loaders::freetype::Font;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::{Vector2F, Vector2I};

use crate::compositor::Rect;
use crate::errors::StaffeleiResult;

/// A font renderer to measure and rasterize text
#[derive(Debug)]
pub struct FontRenderer {
    font: Font,
}

impl FontRenderer {
    /// Create a new font renderer from a font file (index 0).
    pub fn from_path<P: AsRef<Path>>(path: P) -> StaffeleiResult<Self> {
        let font = Font::from_path(path.as_ref(), 0)?;
        log::debug!("Font: {} ({})", font.full_name(), font.family_name());
        Ok(Self { font })
    }

    /// Create a new font renderer from an already-loaded font.
    pub fn with_font(font: Font) -> Self {
        Self { font }
    }

    /// Width and height in pixels the text occupies at the given size.
    /// Empty text measures (0, 0).
    pub fn measure(&self, text: &str, size: f32) -> StaffeleiResult<(f32, f32)> {
        if text.is_empty() {
            return Ok((0., 0.));
        }
        let metrics = self.font.metrics();
        let scale = size / metrics.units_per_em as f32;
        let mut width = 0.;
        for char in text.chars() {
            if let Some(glyph_id) = self.font.glyph_for_char(char) {
                width += self.font.advance(glyph_id)?.x() * scale;
            }
        }
        // descent is negative, so this is ascent + |descent|
        Ok((width, (metrics.ascent - metrics.descent) * scale))
    }

    /// Bounding box of the text drawn bottom-center anchored at `anchor`:
    /// the anchor is the horizontal midpoint and the bottom edge.
    pub fn text_box(&self, anchor: Vector2F, text: &str, size: f32) -> StaffeleiResult<Rect> {
        let (width, height) = self.measure(text, size)?;
        Ok(Rect::new(
            anchor.x() - width / 2.,
            anchor.y() - height,
            anchor.x() + width / 2.,
            anchor.y(),
        ))
    }

    /// Rasterize the text bottom-center anchored at `anchor` and deliver
    /// per-pixel coverage via the callback, in frame coordinates.
    pub fn draw<F: FnMut(i32, i32, u8) -> StaffeleiResult<()>>(
        &self,
        text: &str,
        size: f32,
        anchor: Vector2F,
        mut draw: F,
    ) -> StaffeleiResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let hinting = HintingOptions::Full(size);
        let rasterization = RasterizationOptions::GrayscaleAa;

        let metrics = self.font.metrics();
        let scale = size / metrics.units_per_em as f32;
        let (width, height) = self.measure(text, size)?;
        let mut canvas = Canvas::new(
            Vector2I::new(width.ceil().max(1.) as i32, height.ceil().max(1.) as i32),
            Format::A8,
        );

        let baseline = metrics.ascent * scale;
        let mut base_x = 0.;
        for char in text.chars() {
            if let Some(glyph_id) = self.font.glyph_for_char(char) {
                self.font.rasterize_glyph(
                    &mut canvas,
                    glyph_id,
                    size,
                    Transform2F::from_translation(Vector2F::new(base_x, baseline)),
                    hinting,
                    rasterization,
                )?;
                base_x += self.font.advance(glyph_id)?.x() * scale;
            }
        }

        let left = (anchor.x() - width / 2.).round() as i32;
        let top = (anchor.y() - height).round() as i32;
        for y in 0..canvas.size.y() {
            let (row_start, row_end) =
                (y as usize * canvas.stride, (y + 1) as usize * canvas.stride);
            let row = &canvas.pixels[row_start..row_end];
            for x in 0..canvas.size.x() {
                let coverage = row[x as usize];
                if coverage > 0 {
                    draw(left + x, top + y, coverage)?;
                }
            }
        }
        Ok(())
    }
}
