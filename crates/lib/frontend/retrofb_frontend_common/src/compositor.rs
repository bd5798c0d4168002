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

    frontend_common::compositor.rs

    Blits the scaled working surface onto the physical framebuffer.

    The panel is mounted upside down, so destination rectangles given in viewer
    coordinates are mirrored into framebuffer memory coordinates before the blit.
*/

use display_backend_trait::{DisplayBackendError, DisplayDevice};
use retrofb_common::{Rect, Rotation, SourceFrame, VideoDimensions};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    pub composites: u64,
    pub failures: u64,
    pub margin_clears: u64,
}

pub struct FramebufferCompositor {
    screen: VideoDimensions,
    margins_pending: bool,
    stats: CompositorStats,
}

impl FramebufferCompositor {
    pub fn new(screen: VideoDimensions) -> Self {
        Self {
            screen,
            margins_pending: true,
            stats: Default::default(),
        }
    }

    pub fn screen(&self) -> VideoDimensions {
        self.screen
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Request that the margins around the video rectangle be cleared on every page before the
    /// next composite.
    pub fn invalidate_margins(&mut self) {
        self.margins_pending = true;
    }

    pub fn margins_pending(&self) -> bool {
        self.margins_pending
    }

    /// Translate a viewer rectangle into framebuffer memory coordinates.
    pub fn to_memory(&self, viewer: Rect) -> Rect {
        viewer.rotated_180(self.screen)
    }

    /// Blit `src` into `video` (viewer coordinates), rotating its content by `rotation`, and flip.
    /// The device must be idle. On failure nothing is flipped and the previous page stays visible.
    pub fn composite<D: DisplayDevice + ?Sized>(
        &mut self,
        device: &mut D,
        src: &SourceFrame,
        video: Rect,
        rotation: Rotation,
    ) -> Result<(), DisplayBackendError> {
        let dst = self.to_memory(video);

        if self.margins_pending {
            let cleared = clear_margins(device, dst);
            log::debug!(
                "FramebufferCompositor: cleared {} margin pixels around {:?}",
                cleared,
                dst
            );
            self.margins_pending = false;
            self.stats.margin_clears += 1;
        }

        let result = device.blit(src, dst, rotation).and_then(|_| device.flip());
        match &result {
            Ok(_) => self.stats.composites += 1,
            Err(e) => {
                log::warn!("FramebufferCompositor::composite(): {}", e);
                self.stats.failures += 1;
            }
        }
        result
    }
}

/// Zero every pixel outside `keep` (memory coordinates) on all pages of the device.
/// An empty `keep` clears whole pages; a rectangle covering the screen clears nothing.
/// Returns the number of pixels cleared.
pub fn clear_margins<D: DisplayDevice + ?Sized>(device: &mut D, keep: Rect) -> usize {
    let Ok(screen) = device.resolution()
    else {
        return 0;
    };
    if keep.covers(screen) {
        return 0;
    }
    let keep = keep.clipped(screen);
    let stride = device.page_stride();
    let width = screen.w as usize;
    let mut cleared = 0;

    for page in 0..device.page_count() {
        let Some(buf) = device.page_mut(page)
        else {
            continue;
        };
        for (y, row) in buf.chunks_mut(stride).take(screen.h as usize).enumerate() {
            let row_len = row.len();
            let row = &mut row[..width.min(row_len)];
            match keep.row_span(y as u32).filter(|_| !keep.is_empty()) {
                Some((x0, x1)) => {
                    let (x0, x1) = (x0 as usize, x1 as usize);
                    let row_len = row.len();
                    row[..x0.min(row_len)].fill(0);
                    cleared += x0.min(row.len());
                    if x1 < row.len() {
                        cleared += row.len() - x1;
                        row[x1..].fill(0);
                    }
                }
                None => {
                    row.fill(0);
                    cleared += row.len();
                }
            }
        }
    }
    cleared
}
