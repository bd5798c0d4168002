/*
    RetroFB

    Copyright 2025 RetroFB Contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    display_backend_memory::lib.rs

    Implements DisplayDevice over plain memory. The device keeps three XRGB8888 pages,
    emulates the hardware busy state between blit/flip and wait_idle(), and can be told
    to fail blits or flips so that error paths can be exercised.
*/

use std::path::Path;

use anyhow::{anyhow, Error};
use crossbeam_channel::{unbounded, Receiver, Sender};

pub use display_backend_trait::{DisplayBackendError, DisplayDevice, FlipEvent};
use retrofb_common::{rgb565_to_xrgb8888, PixelData, Rect, Rotation, SourceFrame, VideoDimensions};

pub const DEFAULT_PAGE_COUNT: usize = 3;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDisplayStats {
    pub blits: u64,
    pub flips: u64,
    pub waits: u64,
    pub rejected: u64,
}

#[derive(Debug)]
pub struct MemoryDisplay {
    res: VideoDimensions,
    pages: Vec<Vec<u32>>,
    displayed: usize,
    busy: bool,
    available: bool,
    inverted: bool,
    flip_blocking: bool,
    overlay_alpha: u8,
    fail_blit: bool,
    fail_flip: bool,
    flip_tx: Option<Sender<FlipEvent>>,
    stats: MemoryDisplayStats,
}

impl MemoryDisplay {
    pub fn new(w: u32, h: u32) -> Self {
        Self::with_pages(w, h, DEFAULT_PAGE_COUNT)
    }

    pub fn with_pages(w: u32, h: u32, page_count: usize) -> Self {
        let page_count = page_count.max(1);
        let page_len = w as usize * h as usize;
        log::debug!("MemoryDisplay::new(): {}x{} with {} pages", w, h, page_count);
        Self {
            res: VideoDimensions::new(w, h),
            pages: vec![vec![0; page_len]; page_count],
            displayed: 0,
            busy: false,
            available: true,
            inverted: true,
            flip_blocking: true,
            overlay_alpha: 0,
            fail_blit: false,
            fail_flip: false,
            flip_tx: None,
            stats: Default::default(),
        }
    }

    /// A device whose resolution query fails, as when the framebuffer cannot be opened.
    pub fn unavailable() -> Self {
        let mut display = Self::with_pages(0, 0, DEFAULT_PAGE_COUNT);
        display.available = false;
        display
    }

    /// Select whether the panel is mounted upside down. Only affects screenshots.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub fn fail_blits(&mut self, state: bool) {
        self.fail_blit = state;
    }

    pub fn fail_flips(&mut self, state: bool) {
        self.fail_flip = state;
    }

    pub fn stats(&self) -> MemoryDisplayStats {
        self.stats
    }

    pub fn flip_blocking(&self) -> bool {
        self.flip_blocking
    }

    pub fn overlay_alpha(&self) -> u8 {
        self.overlay_alpha
    }

    pub fn page(&self, page: usize) -> Option<&[u32]> {
        self.pages.get(page).map(|p| p.as_slice())
    }

    /// Read a pixel of a page in memory coordinates.
    pub fn pixel(&self, page: usize, x: u32, y: u32) -> Option<u32> {
        if x >= self.res.w || y >= self.res.h {
            return None;
        }
        self.pages
            .get(page)
            .and_then(|p| p.get(y as usize * self.res.w as usize + x as usize))
            .copied()
    }

    /// Fill every page with a raw pixel value.
    pub fn fill_all(&mut self, value: u32) {
        for page in self.pages.iter_mut() {
            page.fill(value);
        }
    }

    /// Write a page to a PNG file as the viewer would see it.
    pub fn save_screenshot(&self, page: usize, path: &Path) -> Result<(), Error> {
        let src = self.page(page).ok_or_else(|| anyhow!("No such page: {}", page))?;

        let mut rgba = Vec::with_capacity(src.len() * 4);
        let mut push = |p: u32| {
            rgba.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, 0xFF]);
        };
        if self.inverted {
            src.iter().rev().for_each(|p| push(*p));
        }
        else {
            src.iter().for_each(|p| push(*p));
        }

        image::save_buffer(path, &rgba, self.res.w, self.res.h, image::ColorType::Rgba8)?;
        log::info!("Saved screenshot: {}", path.display());
        Ok(())
    }

    fn stretch(&mut self, src: &SourceFrame, dst: Rect, rotation: Rotation) {
        let stride = self.res.w as usize;
        let src_stride = src.stride();
        let (sw, sh) = (src.width() as u64, src.height() as u64);

        // Size of the destination rectangle before rotation.
        let (ow, oh) = if rotation.swaps_axes() {
            (dst.h as u64, dst.w as u64)
        }
        else {
            (dst.w as u64, dst.h as u64)
        };

        let back = self.back_page();
        let Some(page) = self.pages.get_mut(back)
        else {
            return;
        };

        for dy in 0..dst.h as u64 {
            let row = (dst.y as usize + dy as usize) * stride + dst.x as usize;
            for dx in 0..dst.w as u64 {
                let (ux, uy) = match rotation {
                    Rotation::Deg0 => (dx, dy),
                    Rotation::Deg90 => (dy, dst.w as u64 - 1 - dx),
                    Rotation::Deg180 => (dst.w as u64 - 1 - dx, dst.h as u64 - 1 - dy),
                    Rotation::Deg270 => (dst.h as u64 - 1 - dy, dx),
                };
                let sx = ((ux * sw) / ow).min(sw - 1) as usize;
                let sy = ((uy * sh) / oh).min(sh - 1) as usize;
                let idx = sy * src_stride + sx;
                let pixel = match src.data() {
                    PixelData::Rgb565(data) => data.get(idx).map(|p| rgb565_to_xrgb8888(*p)),
                    PixelData::Xrgb8888(data) => data.get(idx).copied(),
                };
                if let Some(pixel) = pixel {
                    page[row + dx as usize] = pixel;
                }
            }
        }
    }
}

impl DisplayDevice for MemoryDisplay {
    fn resolution(&self) -> Result<VideoDimensions, DisplayBackendError> {
        if !self.available {
            return Err(DisplayBackendError::DeviceUnavailable(
                "framebuffer could not be opened".to_string(),
            ));
        }
        Ok(self.res)
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn displayed_page(&self) -> usize {
        self.displayed
    }

    fn page_stride(&self) -> usize {
        self.res.w as usize
    }

    fn page_mut(&mut self, page: usize) -> Option<&mut [u32]> {
        self.pages.get_mut(page).map(|p| p.as_mut_slice())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn wait_idle(&mut self) -> Result<(), DisplayBackendError> {
        self.busy = false;
        self.stats.waits += 1;
        Ok(())
    }

    fn blit(&mut self, src: &SourceFrame, dst: Rect, rotation: Rotation) -> Result<(), DisplayBackendError> {
        if self.busy {
            self.stats.rejected += 1;
            return Err(DisplayBackendError::Busy);
        }
        if self.fail_blit {
            return Err(DisplayBackendError::BlitFailed("injected failure".to_string()));
        }
        if !dst.fits(self.res) {
            return Err(DisplayBackendError::BlitFailed(format!(
                "destination {:?} exceeds {}",
                dst, self.res
            )));
        }
        if src.is_degenerate() || dst.is_empty() {
            return Ok(());
        }
        if !src.is_within_bounds() {
            return Err(DisplayBackendError::BlitFailed(format!(
                "source {}x{} overruns its buffer",
                src.width(),
                src.height()
            )));
        }

        self.stretch(src, dst, rotation);
        self.busy = true;
        self.stats.blits += 1;
        Ok(())
    }

    fn flip(&mut self) -> Result<(), DisplayBackendError> {
        if self.fail_flip {
            return Err(DisplayBackendError::FlipFailed("injected failure".to_string()));
        }
        self.displayed = self.back_page();
        self.busy = true;
        self.stats.flips += 1;

        if let Some(tx) = &self.flip_tx {
            if tx.send(FlipEvent { page: self.displayed }).is_err() {
                log::warn!("Flip receiver dropped; detaching");
                self.flip_tx = None;
            }
        }
        Ok(())
    }

    fn set_flip_blocking(&mut self, blocking: bool) {
        self.flip_blocking = blocking;
    }

    fn set_overlay_alpha(&mut self, alpha: u8) {
        self.overlay_alpha = alpha;
    }

    fn subscribe_flips(&mut self) -> Receiver<FlipEvent> {
        let (tx, rx) = unbounded();
        self.flip_tx = Some(tx);
        rx
    }

    fn detach_flips(&mut self) {
        self.flip_tx = None;
    }
}
