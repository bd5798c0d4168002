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

    retrofb_common::types::rect.rs

    Screen-space rectangles used for destination viewports and damage tracking.
*/

use crate::VideoDimensions;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// A rectangle covering the whole of a surface of the given size.
    pub fn full(dims: VideoDimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            w: dims.w,
            h: dims.h,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// One past the rightmost column.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the bottom row.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    #[inline]
    pub fn dimensions(&self) -> VideoDimensions {
        VideoDimensions::new(self.w, self.h)
    }

    /// Returns true if this rectangle covers every pixel of a surface of the given size.
    pub fn covers(&self, dims: VideoDimensions) -> bool {
        self.x == 0 && self.y == 0 && self.w >= dims.w && self.h >= dims.h
    }

    /// Returns true if this rectangle lies entirely within a surface of the given size.
    pub fn fits(&self, dims: VideoDimensions) -> bool {
        self.right() <= dims.w && self.bottom() <= dims.h
    }

    /// Mirror this rectangle through the center of a surface of the given size, as seen by a
    /// panel mounted upside down. The rectangle must fit within the surface.
    pub fn rotated_180(&self, dims: VideoDimensions) -> Self {
        Self {
            x: dims.w.saturating_sub(self.right()),
            y: dims.h.saturating_sub(self.bottom()),
            w: self.w,
            h: self.h,
        }
    }

    /// Clip this rectangle to a surface of the given size.
    pub fn clipped(&self, dims: VideoDimensions) -> Self {
        let x = self.x.min(dims.w);
        let y = self.y.min(dims.h);
        Self {
            x,
            y,
            w: self.right().min(dims.w) - x,
            h: self.bottom().min(dims.h) - y,
        }
    }

    /// Horizontal span of this rectangle on row `y`, or None if the row is outside it.
    #[inline]
    pub fn row_span(&self, y: u32) -> Option<(u32, u32)> {
        if y >= self.y && y < self.bottom() {
            Some((self.x, self.right()))
        }
        else {
            None
        }
    }
}
