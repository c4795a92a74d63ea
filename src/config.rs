//! Configuration data for Staffelei
//!
//! Settings are read once into an immutable [`Settings`] value and passed
//! explicitly to the driver selection and render pass. Every key has a
//! default, so a missing file or key degrades to the documented behavior.

use serde_derive::Deserialize;

use crate::errors::StaffeleiResult;

/// `FILE` section: library and font locations
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FileSettings {
    /// Directory holding the image library
    pub image_location: String,
    /// File extension of the images to pick from
    pub image_format: String,
    /// Font used for the text overlay
    pub font_file: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            image_location: "images".to_string(),
            image_format: "png".to_string(),
            font_file: "fonts/Font.ttc".to_string(),
        }
    }
}

/// `TEXT` section: overlay toggles, parsing patterns and box styling
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TextSettings {
    /// Draw the title/artist overlay at all
    pub add_text: bool,
    /// Parse title and artist out of the filename
    pub parse_text: bool,
    /// Pattern removed from the front of the filename before parsing
    pub preamble_regex: String,
    /// Pattern separating title from artist
    pub artist_regex: String,
    /// Newline-delimited substrings stripped from parsed text
    pub remove_text: String,
    /// Anchor the backdrop to the bottom crop edge
    pub box_to_floor: bool,
    /// Anchor the backdrop to the left/right crop edges
    pub box_to_edge: bool,
    pub artist_loc: i32,
    pub artist_size: i32,
    pub title_loc: i32,
    pub title_size: i32,
    pub padding: i32,
    pub opacity: u8,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            add_text: false,
            parse_text: false,
            preamble_regex: ".*- ".to_string(),
            artist_regex: " by ".to_string(),
            remove_text: ", digital art\nA painting of".to_string(),
            box_to_floor: true,
            box_to_edge: true,
            artist_loc: 10,
            artist_size: 14,
            title_loc: 30,
            title_size: 20,
            padding: 10,
            opacity: 150,
        }
    }
}

impl TextSettings {
    /// The `remove_text` value split into its newline-delimited entries.
    pub fn remove_text_list(&self) -> Vec<String> {
        self.remove_text
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }
}

/// `DISPLAY` section: driver selection and driver parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    /// Name of the display driver to load
    pub display_type: String,
    /// Device path for the framebuffer driver
    pub framebuffer_device: String,
    pub mock_width: u32,
    pub mock_height: u32,
    /// Where the mock driver writes the rendered frame
    pub mock_output: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_type: "mock".to_string(),
            framebuffer_device: "/dev/fb0".to_string(),
            mock_width: 400,
            mock_height: 300,
            mock_output: "staffelei-mock.png".to_string(),
        }
    }
}

/// `DEBUG` section
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DebugSettings {
    /// Also save the composited frame to `staffelei-preview.png`
    pub image_viewer: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            image_viewer: false,
        }
    }
}

/// Config file root structure
///
/// The config file spells its sections in uppercase (`[FILE]`, `[TEXT]`,
/// ...); the aliases accept either spelling.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "FILE")]
    pub file: FileSettings,
    #[serde(alias = "TEXT")]
    pub text: TextSettings,
    #[serde(alias = "DISPLAY")]
    pub display: DisplaySettings,
    #[serde(alias = "DEBUG")]
    pub debug: DebugSettings,
}

/// Read settings from a config file. The caller decides what to do when the
/// file is missing; a sensible reaction is logging and using
/// `Settings::default()`.
pub fn load_settings(path: &str) -> StaffeleiResult<Settings> {
    let mut config = config::Config::default();
    config.merge(config::File::with_name(path))?;
    Ok(config.try_into()?)
}
