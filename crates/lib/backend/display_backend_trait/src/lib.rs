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

    display_backend_trait::lib.rs

    Defines the DisplayDevice trait, the capability through which RetroFB talks to a
    physical framebuffer: resolution query, page access, hardware blit with rotation,
    page flip and the wait-for-idle barrier.

    A device exposes a small fixed number of framebuffer pages. Pages are addressed in
    memory order, which on an inverted panel is the viewer's image rotated by 180
    degrees. The caller is responsible for mapping viewer rectangles into memory
    rectangles before calling blit().

    Flip completion is reported through a single-consumer channel of FlipEvents
    instead of a callback. The consumer drains the channel after each composite.
*/

use crossbeam_channel::Receiver;
use retrofb_common::{Rect, Rotation, SourceFrame, VideoDimensions};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayBackendError {
    #[error("Display device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Display device is busy with a previous operation")]
    Busy,
    #[error("Blit failed: {0}")]
    BlitFailed(String),
    #[error("Page flip failed: {0}")]
    FlipFailed(String),
    #[error("Invalid framebuffer page: {0}")]
    InvalidPage(usize),
}

/// Sent by a device once a page flip has completed and `page` is being scanned out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlipEvent {
    pub page: usize,
}

pub trait DisplayDevice {
    /// Query the physical resolution. Called once at startup.
    fn resolution(&self) -> Result<VideoDimensions, DisplayBackendError>;

    /// Number of physically buffered pages.
    fn page_count(&self) -> usize;

    /// Index of the page currently being scanned out.
    fn displayed_page(&self) -> usize;

    /// Index of the page the next blit will write to.
    fn back_page(&self) -> usize {
        (self.displayed_page() + 1) % self.page_count().max(1)
    }

    /// Row stride of every page, in pixels.
    fn page_stride(&self) -> usize;

    /// Direct XRGB8888 access to a page.
    fn page_mut(&mut self, page: usize) -> Option<&mut [u32]>;

    /// Returns true while a blit or flip is still in flight.
    fn is_busy(&self) -> bool;

    /// Block until every queued blit and flip has completed.
    fn wait_idle(&mut self) -> Result<(), DisplayBackendError>;

    /// Stretch `src` into `dst` on the back page, rotating the image by `rotation` inside the
    /// destination rectangle. `dst` is in memory coordinates.
    fn blit(&mut self, src: &SourceFrame, dst: Rect, rotation: Rotation) -> Result<(), DisplayBackendError>;

    /// Queue a flip of the back page to the display.
    fn flip(&mut self) -> Result<(), DisplayBackendError>;

    /// Select whether flips wait for vertical sync.
    fn set_flip_blocking(&mut self, blocking: bool);

    /// Set the global alpha of the overlay plane.
    fn set_overlay_alpha(&mut self, alpha: u8);

    /// Subscribe to flip completion notifications. A later subscription replaces an earlier one.
    fn subscribe_flips(&mut self) -> Receiver<FlipEvent>;

    /// Stop sending flip notifications.
    fn detach_flips(&mut self);
}
