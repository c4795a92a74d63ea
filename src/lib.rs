//! Staffelei picks a random image from a local library, optionally overlays
//! parsed title/artist text on a translucent backdrop, and renders the
//! composited frame to a display.

use std::time::{Duration, Instant};

pub mod compositor;
pub mod config;
pub mod display;
pub mod display_framebuffer;
pub mod display_mock;
pub mod errors;
pub mod font;
pub mod provider;

pub(crate) struct Timer<F: Fn(Duration)> {
    start: Instant,
    f: F,
}

impl<F: Fn(Duration)> Timer<F> {
    pub(crate) fn new(f: F) -> Self {
        Self {
            start: Instant::now(),
            f,
        }
    }
}

impl<F: Fn(Duration)> Drop for Timer<F> {
    fn drop(&mut self) {
        (self.f)(self.start.elapsed())
    }
}
