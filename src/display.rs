//! Display driver contract and registry

use image::RgbaImage;

use crate::config::DisplaySettings;
use crate::display_framebuffer::FramebufferDisplay;
use crate::display_mock::MockDisplay;
use crate::errors::{StaffeleiError, StaffeleiResult};

/// A display that can show one composited frame.
///
/// `prepare` is called once before `display`, `close` must be called on
/// every exit path after the driver has been loaded.
pub trait Display {
    fn dimensions(&self) -> (u32, u32);
    fn prepare(&mut self) -> StaffeleiResult<()>;
    fn display(&mut self, frame: &RgbaImage) -> StaffeleiResult<()>;
    fn close(&mut self) -> StaffeleiResult<()>;
}

/// Names accepted by [`load_display_driver`].
pub fn list_supported_displays() -> Vec<&'static str> {
    vec!["framebuffer", "mock"]
}

/// Load a display driver by name.
pub fn load_display_driver(
    name: &str,
    settings: &DisplaySettings,
) -> StaffeleiResult<Box<dyn Display>> {
    match name {
        "framebuffer" => Ok(Box::new(FramebufferDisplay::open(
            &settings.framebuffer_device,
        )?)),
        "mock" => Ok(Box::new(MockDisplay::new(
            settings.mock_width,
            settings.mock_height,
            settings.mock_output.clone().into(),
        ))),
        _ => Err(StaffeleiError::DriverNotFound(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_driver_is_rejected() {
        let err = load_display_driver("omni_epd.mock", &DisplaySettings::default()).err();
        assert!(matches!(err, Some(StaffeleiError::DriverNotFound(_))));
    }

    #[test]
    fn registry_lists_the_mock_driver() {
        assert!(list_supported_displays().contains(&"mock"));
    }

    #[test]
    fn mock_driver_reports_configured_dimensions() {
        let display =
            load_display_driver("mock", &DisplaySettings::default()).unwrap();
        assert_eq!(display.dimensions(), (400, 300));
    }
}
