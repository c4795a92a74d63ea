//! Frame geometry and text overlay composition.
//!
//! Coordinates are carried as `f32` throughout; rounding to pixel indices
//! happens only when a rectangle or glyph is rasterized into the frame
//! (`f32::round`, half away from zero).

use image::imageops::FilterType;
use image::{DynamicImage, Pixel, Rgba, RgbaImage};
use log::debug;
use pathfinder_geometry::vector::Vector2F;

use crate::errors::{StaffeleiError, StaffeleiResult};
use crate::font::FontRenderer;

/// An axis-aligned rectangle in image pixel coordinates.
///
/// `left <= right` and `top <= bottom` are not enforced by construction;
/// boxes coming from the font layer are trusted as given and [`max_area`]
/// normalizes through its min/max merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Expand by `padding` on all four sides. Negative padding shrinks the
    /// rectangle and is deliberately not validated.
    pub fn pad(&self, padding: f32) -> Rect {
        Rect::new(
            self.left - padding,
            self.top - padding,
            self.right + padding,
            self.bottom + padding,
        )
    }

    /// A copy with `bottom` replaced (floor anchoring).
    pub fn with_bottom(&self, bottom: f32) -> Rect {
        Rect::new(self.left, self.top, self.right, bottom)
    }

    /// A copy with `left` and `right` replaced (edge anchoring).
    pub fn with_sides(&self, left: f32, right: f32) -> Rect {
        Rect::new(left, self.top, right, self.bottom)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// The smallest rectangle containing every rectangle in `boxes`.
///
/// Order-independent fold over [`Rect::union`]. An empty slice is rejected
/// rather than panicking on the missing first element.
pub fn max_area(boxes: &[Rect]) -> StaffeleiResult<Rect> {
    let (first, rest) = boxes
        .split_first()
        .ok_or(StaffeleiError::InvalidArgument(
            "max_area requires at least one rectangle",
        ))?;
    Ok(rest.iter().fold(*first, |acc, b| acc.union(b)))
}

/// Crop rectangle centering a thumbnailed image on the display canvas.
///
/// Coordinates go negative when the image is smaller than the display; the
/// crop realization pads those regions with opaque black.
pub fn crop_box(display: (u32, u32), image: (u32, u32)) -> Rect {
    let width_diff = (display.0 as f32 - image.0 as f32) / 2.;
    let height_diff = (display.1 as f32 - image.1 as f32) / 2.;
    Rect::new(
        -width_diff,
        -height_diff,
        image.0 as f32 + width_diff,
        image.1 as f32 + height_diff,
    )
}

/// Resize an image to fit within the display dimensions, preserving aspect
/// ratio.
pub fn thumbnail(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    let _t = crate::Timer::new(|e| debug!("Resized image in {}ms", e.as_millis()));
    img.resize(width, height, FilterType::Triangle)
}

/// Realize a crop rectangle: copy the source into a canvas sized to the
/// rectangle, filling anything outside the source with opaque black.
pub fn apply_crop(img: &RgbaImage, crop: &Rect) -> RgbaImage {
    let out_width = crop.width().round().max(0.) as u32;
    let out_height = crop.height().round().max(0.) as u32;
    let x_offset = (-crop.left).round() as i64;
    let y_offset = (-crop.top).round() as i64;
    let mut canvas = RgbaImage::from_pixel(out_width, out_height, Rgba([0, 0, 0, 255]));
    for (x, y, pixel) in img.enumerate_pixels() {
        let dest_x = x as i64 + x_offset;
        let dest_y = y as i64 + y_offset;
        if dest_x >= 0
            && dest_y >= 0
            && (dest_x as u32) < out_width
            && (dest_y as u32) < out_height
        {
            canvas.put_pixel(dest_x as u32, dest_y as u32, *pixel);
        }
    }
    canvas
}

/// Text overlay options, one immutable bundle per render pass.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    /// Vertical offset of the title anchor from the display bottom
    pub title_loc: i32,
    pub title_size: i32,
    /// Vertical offset of the artist anchor from the display bottom
    pub artist_loc: i32,
    pub artist_size: i32,
    pub padding: i32,
    /// Alpha of the white backdrop rectangle
    pub opacity: u8,
    /// Anchor the backdrop to the bottom crop edge
    pub box_to_floor: bool,
    /// Anchor the backdrop to the left/right crop edges
    pub box_to_edge: bool,
}

/// Draw the translucent backdrop and the title/artist text onto the frame.
///
/// Both strings are anchored bottom-center at `(width / 2, height - loc)`.
/// The backdrop is painted before the text; reversing the order would
/// occlude the glyphs.
pub fn draw_overlay(
    frame: &mut RgbaImage,
    crop: &Rect,
    title: &str,
    artist: &str,
    font: &FontRenderer,
    style: &Style,
) -> StaffeleiResult<()> {
    let (width, height) = frame.dimensions();
    let title_anchor = Vector2F::new(width as f32 / 2., height as f32 - style.title_loc as f32);
    let artist_anchor = Vector2F::new(width as f32 / 2., height as f32 - style.artist_loc as f32);

    let title_box = font.text_box(title_anchor, title, style.title_size as f32)?;
    let artist_box = font.text_box(artist_anchor, artist, style.artist_size as f32)?;

    let draw_box = anchor_box(
        max_area(&[artist_box, title_box])?.pad(style.padding as f32),
        crop,
        style.box_to_floor,
        style.box_to_edge,
    );

    fill_rect(frame, &draw_box, Rgba([255, 255, 255, style.opacity]));

    let mut blend = |x: i32, y: i32, coverage: u8| -> StaffeleiResult<()> {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            frame
                .get_pixel_mut(x as u32, y as u32)
                .blend(&Rgba([0, 0, 0, coverage]));
        }
        Ok(())
    };
    font.draw(artist, style.artist_size as f32, artist_anchor, &mut blend)?;
    font.draw(title, style.title_size as f32, title_anchor, &mut blend)?;
    Ok(())
}

/// Apply the two anchoring toggles to the padded text box.
///
/// The box and the result are in frame coordinates, where the crop rectangle
/// translates to `(0, 0, crop.width(), crop.height())`; its bottom edge in
/// image coordinates, `crop.bottom`, is numerically the bottom of the
/// visible image content in the frame, so floor anchoring uses it directly.
pub fn anchor_box(draw_box: Rect, crop: &Rect, box_to_floor: bool, box_to_edge: bool) -> Rect {
    let mut anchored = draw_box;
    if box_to_floor {
        anchored = anchored.with_bottom(crop.bottom);
    }
    if box_to_edge {
        anchored = anchored.with_sides(0., crop.width());
    }
    anchored
}

/// Alpha-blend `color` over every frame pixel inside `rect`, clamped to the
/// frame bounds.
pub(crate) fn fill_rect(frame: &mut RgbaImage, rect: &Rect, color: Rgba<u8>) {
    let (width, height) = frame.dimensions();
    let left = rect.left.round().max(0.) as u32;
    let top = rect.top.round().max(0.) as u32;
    let right = rect.right.round().min(width as f32).max(0.) as u32;
    let bottom = rect.bottom.round().min(height as f32).max(0.) as u32;
    for y in top..bottom {
        for x in left..right {
            frame.get_pixel_mut(x, y).blend(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f32, top: f32, right: f32, bottom: f32) -> Rect {
        Rect::new(left, top, right, bottom)
    }

    #[test]
    fn max_area_contains_every_input() {
        let boxes = [
            rect(300., 550., 500., 580.),
            rect(350., 560., 450., 590.),
            rect(10., 600., 20., 610.),
        ];
        let merged = max_area(&boxes).unwrap();
        for b in &boxes {
            assert!(merged.left <= b.left && merged.top <= b.top);
            assert!(merged.right >= b.right && merged.bottom >= b.bottom);
        }
    }

    #[test]
    fn max_area_is_order_independent() {
        let a = rect(300., 550., 500., 580.);
        let b = rect(350., 560., 450., 590.);
        let c = rect(280., 570., 520., 575.);
        let forward = max_area(&[a, b, c]).unwrap();
        assert_eq!(forward, max_area(&[c, b, a]).unwrap());
        assert_eq!(forward, max_area(&[b, a, c]).unwrap());
    }

    #[test]
    fn max_area_rejects_empty_input() {
        assert!(matches!(
            max_area(&[]),
            Err(StaffeleiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn union_then_padding_scenario() {
        let title = rect(300., 550., 500., 580.);
        let artist = rect(350., 560., 450., 590.);
        let merged = max_area(&[artist, title]).unwrap();
        assert_eq!(merged, rect(300., 550., 500., 590.));
        assert_eq!(merged.pad(10.), rect(290., 540., 510., 600.));
    }

    #[test]
    fn padding_round_trips() {
        let b = rect(290., 540., 510., 600.);
        assert_eq!(b.pad(10.).pad(-10.), b);
    }

    #[test]
    fn negative_padding_shrinks_unvalidated() {
        let b = rect(0., 0., 10., 10.);
        // shrinking past the center inverts the box and stays as given
        assert_eq!(b.pad(-8.), rect(8., 8., 2., 2.));
    }

    #[test]
    fn floor_anchoring_is_idempotent() {
        let crop = crop_box((800, 600), (800, 450));
        let b = rect(290., 540., 510., 600.);
        let once = anchor_box(b, &crop, true, false);
        assert_eq!(once, anchor_box(once, &crop, true, false));
        assert_eq!(once.bottom, 525.);
    }

    #[test]
    fn edge_anchoring_spans_crop_width() {
        let crop = crop_box((800, 600), (640, 450));
        let b = anchor_box(rect(290., 540., 510., 600.), &crop, false, true);
        assert_eq!(b.width(), crop.width());
    }

    #[test]
    fn edge_anchoring_stays_symmetric_for_narrow_thumbnails() {
        // 600-wide thumbnail on an 800-wide display: the backdrop must span
        // the frame from 0 to 800 in frame coordinates, not follow the
        // negative image-space crop edges
        let crop = crop_box((800, 600), (600, 450));
        let b = anchor_box(rect(290., 540., 510., 600.), &crop, false, true);
        assert_eq!(b.left, 0.);
        assert_eq!(b.right, 800.);
    }

    #[test]
    fn combined_anchoring_applies_both_toggles() {
        let crop = crop_box((800, 600), (600, 450));
        let b = anchor_box(rect(290., 540., 510., 600.), &crop, true, true);
        assert_eq!(b, rect(0., 540., 800., 525.));
        // disabling both leaves the padded box untouched
        assert_eq!(
            anchor_box(rect(290., 540., 510., 600.), &crop, false, false),
            rect(290., 540., 510., 600.)
        );
    }

    #[test]
    fn crop_box_centers_smaller_image() {
        assert_eq!(
            crop_box((800, 600), (800, 450)),
            rect(0., -75., 800., 525.)
        );
    }

    #[test]
    fn crop_box_matches_display_dimensions() {
        let crop = crop_box((800, 600), (531, 600));
        assert_eq!(crop.width().round() as u32, 800);
        assert_eq!(crop.height().round() as u32, 600);
    }

    #[test]
    fn apply_crop_pads_with_black() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let out = apply_crop(&img, &rect(-1., -1., 3., 3.));
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(3, 3), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn apply_crop_overscans_larger_image() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let out = apply_crop(&img, &rect(1., 1., 3., 3.));
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn fill_rect_clamps_to_frame() {
        let mut frame = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        fill_rect(&mut frame, &rect(-10., -10., 2., 20.), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(1, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(*frame.get_pixel(2, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn fill_rect_zero_opacity_leaves_frame_unchanged() {
        let mut frame = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        fill_rect(&mut frame, &rect(0., 0., 2., 2.), Rgba([255, 255, 255, 0]));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }
}
