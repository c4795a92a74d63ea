//! Staffelei error handling

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Error types within Staffelei
#[derive(Debug)]
pub enum StaffeleiError {
    /// The configuration file could not be read or parsed (non-fatal,
    /// defaults apply)
    Config(config::ConfigError),
    /// The configured display driver name is unknown
    DriverNotFound(String),
    /// A required path (image directory, font file, image library) is absent
    ResourceMissing(PathBuf),
    /// A caller passed an unusable argument to a geometry or parsing routine
    InvalidArgument(&'static str),
    /// Errors loading a font file
    FontLoading(font_kit::error::FontLoadingError),
    /// Errors rasterizing or measuring glyphs
    Glyph(font_kit::error::GlyphLoadingError),
    /// Errors interacting with I/O
    Io(std::io::Error),
    /// Errors from the image library
    Image(Arc<image::error::ImageError>),
    /// An invalid regular expression in the text settings
    Pattern(regex::Error),
    /// The user interrupted the render pass
    Interrupted,
}

/// Result type for `StaffeleiError`
pub type StaffeleiResult<T> = Result<T, StaffeleiError>;

impl StaffeleiError {
    /// Process exit code for this error when it terminates the program
    pub fn exit_code(&self) -> i32 {
        match self {
            StaffeleiError::DriverNotFound(_) => 2,
            StaffeleiError::ResourceMissing(_) => 3,
            StaffeleiError::Interrupted => 130,
            _ => 1,
        }
    }
}

impl fmt::Display for StaffeleiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            StaffeleiError::Config(err) => err.fmt(f),
            StaffeleiError::DriverNotFound(name) => {
                write!(f, "Unknown display driver: {}", name)
            }
            StaffeleiError::ResourceMissing(path) => {
                write!(f, "Required path does not exist: {:?}", path)
            }
            StaffeleiError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            StaffeleiError::FontLoading(err) => err.fmt(f),
            StaffeleiError::Glyph(err) => err.fmt(f),
            StaffeleiError::Io(err) => err.fmt(f),
            StaffeleiError::Image(err) => err.fmt(f),
            StaffeleiError::Pattern(err) => err.fmt(f),
            StaffeleiError::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl Error for StaffeleiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StaffeleiError::Config(err) => err.source(),
            StaffeleiError::FontLoading(err) => err.source(),
            StaffeleiError::Glyph(err) => err.source(),
            StaffeleiError::Io(err) => err.source(),
            StaffeleiError::Image(err) => err.source(),
            StaffeleiError::Pattern(err) => err.source(),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for StaffeleiError {
    fn from(err: config::ConfigError) -> Self {
        StaffeleiError::Config(err)
    }
}

impl From<font_kit::error::FontLoadingError> for StaffeleiError {
    fn from(err: font_kit::error::FontLoadingError) -> Self {
        StaffeleiError::FontLoading(err)
    }
}

impl From<font_kit::error::GlyphLoadingError> for StaffeleiError {
    fn from(err: font_kit::error::GlyphLoadingError) -> Self {
        StaffeleiError::Glyph(err)
    }
}

impl From<std::io::Error> for StaffeleiError {
    fn from(err: std::io::Error) -> Self {
        StaffeleiError::Io(err)
    }
}

impl From<image::error::ImageError> for StaffeleiError {
    fn from(err: image::error::ImageError) -> Self {
        StaffeleiError::Image(Arc::new(err))
    }
}

impl From<regex::Error> for StaffeleiError {
    fn from(err: regex::Error) -> Self {
        StaffeleiError::Pattern(err)
    }
}
