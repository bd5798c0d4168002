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

    retrofb_common::types::video_dimensions.rs

    A simple width/height pair used for content, surface and screen sizes.
*/

use std::fmt::{Display, Formatter};

use serde::Deserialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct VideoDimensions {
    pub w: u32,
    pub h: u32,
}

impl VideoDimensions {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return the dimensions with width and height exchanged, as seen through a 90 or 270 degree
    /// rotation.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self { w: self.h, h: self.w }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.w as usize * self.h as usize
    }
}

impl From<(u32, u32)> for VideoDimensions {
    fn from(t: (u32, u32)) -> Self {
        VideoDimensions { w: t.0, h: t.1 }
    }
}

impl From<VideoDimensions> for (u32, u32) {
    fn from(dim: VideoDimensions) -> Self {
        (dim.w, dim.h)
    }
}

impl Display for VideoDimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose() {
        let dims = VideoDimensions::new(256, 224);
        assert_eq!(dims.transposed(), VideoDimensions::new(224, 256));
        assert_eq!(dims.transposed().transposed(), dims);
    }

    #[test]
    fn test_empty() {
        assert!(VideoDimensions::new(0, 240).is_empty());
        assert!(VideoDimensions::new(320, 0).is_empty());
        assert!(!VideoDimensions::new(1, 1).is_empty());
        assert_eq!(format!("{}", VideoDimensions::new(640, 480)), "640x480");
    }
}
