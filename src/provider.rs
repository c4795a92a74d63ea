//! Image selection, decoding and filename parsing

use std::path::{Path, PathBuf};

use glob::glob;
use image::DynamicImage;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use regex::Regex;

use crate::errors::{StaffeleiError, StaffeleiResult};
use std::io::BufReader;

/// Pick a uniformly random file with the given extension from a directory.
pub fn pick_random_file(directory: &Path, extension: &str) -> StaffeleiResult<PathBuf> {
    let pattern = format!("{}/*.{}", directory.display(), extension);
    let candidates: Vec<PathBuf> = glob(&pattern)
        .map_err(|_| StaffeleiError::InvalidArgument("invalid image file pattern"))?
        .filter_map(Result::ok)
        .collect();
    debug!("{} candidate images in {:?}", candidates.len(), directory);
    candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| StaffeleiError::ResourceMissing(directory.to_path_buf()))
}

fn load_jpeg<P: AsRef<Path>>(path: P) -> StaffeleiResult<DynamicImage> {
    let _t = crate::Timer::new(|e| debug!("Decoded JPEG in {}ms", e.as_millis()));
    let d = mozjpeg::Decompress::with_markers(mozjpeg::ALL_MARKERS).from_path(&path)?;
    let (width, height) = (d.width(), d.height());
    let buffer: Option<Vec<[u8; 4]>> = d
        .to_colorspace(mozjpeg::ColorSpace::JCS_EXT_RGBA)?
        .read_scanlines();
    if let Some(buffer) = buffer {
        let mut img = image::RgbaImage::new(width as _, height as _);
        for (pixel, rgba) in img.pixels_mut().zip(buffer) {
            *pixel = image::Rgba(rgba);
        }
        Ok(DynamicImage::ImageRgba8(img))
    } else {
        warn!("Failed to decode image: {:?}", path.as_ref());
        Err(StaffeleiError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "JPEG scanline decoding failed",
        )))
    }
}

/// Decode an image, dispatching JPEG to mozjpeg and everything else to the
/// image crate's format reader.
pub fn load_image_from_path<P: AsRef<Path>>(path: P) -> StaffeleiResult<DynamicImage> {
    info!("Loading {:?}", path.as_ref());
    let _t = crate::Timer::new(|e| debug!("Loaded image in {}ms", e.as_millis()));
    match image::ImageFormat::from_path(&path)? {
        image::ImageFormat::Jpeg => load_jpeg(path),
        format => Ok(image::io::Reader::with_format(
            BufReader::new(std::fs::File::open(&path)?),
            format,
        )
        .decode()?),
    }
}

/// Split a filename into (title, artist).
///
/// The `.extension` suffix is dropped, the first match of the preamble
/// pattern is deleted, and the remainder is split once on the artist
/// separator pattern. A missing separator yields an empty artist.
pub fn parse_title_artist(
    filename: &str,
    preamble_pattern: &str,
    artist_pattern: &str,
    extension: &str,
) -> StaffeleiResult<(String, String)> {
    let suffix = format!(".{}", extension);
    let stem = filename.strip_suffix(suffix.as_str()).unwrap_or(filename);
    let preamble = Regex::new(preamble_pattern)?;
    let stem = preamble.replace(stem, "");
    let separator = Regex::new(artist_pattern)?;
    let mut parts = separator.splitn(&stem, 2);
    let title = parts.next().unwrap_or("").trim().to_string();
    let artist = parts.next().unwrap_or("").trim().to_string();
    Ok((title, artist))
}

/// Delete every occurrence of each listed substring, then trim whitespace.
pub fn strip_substrings(text: &str, remove: &[String]) -> String {
    let mut out = text.to_string();
    for needle in remove {
        out = out.replace(needle.as_str(), "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_artist_from_filename() {
        let (title, artist) = parse_title_artist(
            "The Masters - Starry Night by Van Gogh.png",
            ".*- ",
            " by ",
            "png",
        )
        .unwrap();
        assert_eq!(title, "Starry Night");
        assert_eq!(artist, "Van Gogh");
    }

    #[test]
    fn missing_separator_yields_empty_artist() {
        let (title, artist) =
            parse_title_artist("Starry Night.png", ".*- ", " by ", "png").unwrap();
        assert_eq!(title, "Starry Night");
        assert_eq!(artist, "");
    }

    #[test]
    fn missing_preamble_leaves_title_intact() {
        let (title, artist) =
            parse_title_artist("Nighthawks by Hopper.png", ".*- ", " by ", "png").unwrap();
        assert_eq!(title, "Nighthawks");
        assert_eq!(artist, "Hopper");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(
            parse_title_artist("a.png", "(", " by ", "png"),
            Err(StaffeleiError::Pattern(_))
        ));
    }

    #[test]
    fn strips_listed_substrings_and_trims() {
        let remove = vec![", digital art".to_string(), "A painting of".to_string()];
        assert_eq!(
            strip_substrings("A painting of Mountains, digital art", &remove),
            "Mountains"
        );
    }

    #[test]
    fn strip_with_empty_list_only_trims() {
        assert_eq!(strip_substrings("  Mountains ", &[]), "Mountains");
    }

    #[test]
    fn pick_random_file_rejects_empty_directory() {
        let dir =
            std::env::temp_dir().join(format!("staffelei-empty-test-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        assert!(matches!(
            pick_random_file(&dir, "png"),
            Err(StaffeleiError::ResourceMissing(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
