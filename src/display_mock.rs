//! Software display that writes frames to a PNG file, standing in for the
//! e-paper panel during development.

use std::path::PathBuf;

use image::RgbaImage;
use log::info;

use crate::display::Display;
use crate::errors::StaffeleiResult;

pub struct MockDisplay {
    width: u32,
    height: u32,
    output: PathBuf,
}

impl MockDisplay {
    pub fn new(width: u32, height: u32, output: PathBuf) -> Self {
        Self {
            width,
            height,
            output,
        }
    }
}

impl Display for MockDisplay {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn prepare(&mut self) -> StaffeleiResult<()> {
        info!("Mock display prepared ({}x{})", self.width, self.height);
        Ok(())
    }

    fn display(&mut self, frame: &RgbaImage) -> StaffeleiResult<()> {
        frame.save(&self.output)?;
        info!("Mock display wrote frame to {:?}", self.output);
        Ok(())
    }

    fn close(&mut self) -> StaffeleiResult<()> {
        info!("Mock display closed");
        Ok(())
    }
}
