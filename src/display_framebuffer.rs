//! Linux framebuffer display driver

use framebuffer::{Framebuffer, KdMode};
use image::{Pixel, RgbaImage};
use log::warn;

use crate::display::Display;
use crate::errors::{StaffeleiError, StaffeleiResult};

pub struct FramebufferDisplay {
    framebuffer: Framebuffer,
    buffer: Vec<u8>,
}

impl FramebufferDisplay {
    pub fn open(device: &str) -> StaffeleiResult<Self> {
        let framebuffer = Framebuffer::new(device).map_err(|e| {
            StaffeleiError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to open framebuffer {}: {:?}", device, e),
            ))
        })?;
        if framebuffer.var_screen_info.bits_per_pixel != 32 {
            return Err(StaffeleiError::InvalidArgument(
                "framebuffer must use 32 bits per pixel",
            ));
        }
        let buffer = vec![
            0;
            (framebuffer.var_screen_info.xres
                * framebuffer.var_screen_info.yres
                * framebuffer.var_screen_info.bits_per_pixel
                / 8) as _
        ];
        Ok(Self {
            framebuffer,
            buffer,
        })
    }
}

impl Display for FramebufferDisplay {
    fn dimensions(&self) -> (u32, u32) {
        (
            self.framebuffer.var_screen_info.xres,
            self.framebuffer.var_screen_info.yres,
        )
    }

    fn prepare(&mut self) -> StaffeleiResult<()> {
        if Framebuffer::set_kd_mode(KdMode::Graphics).is_err() {
            warn!("Failed to set graphics mode");
        }
        Ok(())
    }

    fn display(&mut self, frame: &RgbaImage) -> StaffeleiResult<()> {
        for byte in self.buffer.iter_mut() {
            *byte = 0;
        }
        let dimensions = self.dimensions();
        // frames smaller than the framebuffer land centered
        let x_offset = dimensions.0.saturating_sub(frame.width()) / 2;
        let y_offset = dimensions.1.saturating_sub(frame.height()) / 2;
        for (x, y, pixel) in frame.enumerate_pixels() {
            if x_offset + x >= dimensions.0 || y_offset + y >= dimensions.1 {
                continue;
            }
            let index = (x_offset + x + dimensions.0 * (y + y_offset)) as usize * 4;
            self.buffer[index..index + 3].copy_from_slice(pixel.to_bgr().channels());
        }
        self.framebuffer.frame[..self.buffer.len()].copy_from_slice(&self.buffer[..]);
        Ok(())
    }

    fn close(&mut self) -> StaffeleiResult<()> {
        if Framebuffer::set_kd_mode(KdMode::Text).is_err() {
            warn!("Failed to restore text mode");
        }
        Ok(())
    }
}
