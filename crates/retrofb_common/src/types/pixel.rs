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

    retrofb_common::types::pixel.rs

    Pixel formats understood by the scaler and display backends.
*/

use serde::Deserialize;
use strum_macros::EnumIter;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, EnumIter)]
pub enum PixelFormat {
    /// 16 bits per pixel, 5-6-5.
    #[default]
    Rgb565,
    /// 32 bits per pixel, top byte unused.
    Xrgb8888,
}

impl PixelFormat {
    pub fn from_rgb32(rgb32: bool) -> Self {
        if rgb32 {
            PixelFormat::Xrgb8888
        }
        else {
            PixelFormat::Rgb565
        }
    }

    #[inline]
    pub const fn bits_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Rgb565 => 16,
            PixelFormat::Xrgb8888 => 32,
        }
    }

    #[inline]
    pub const fn bytes_per_pixel(&self) -> u32 {
        self.bits_per_pixel() / 8
    }

    /// Index of this format in the scaler lookup tables.
    #[inline]
    pub const fn table_index(&self) -> usize {
        match self {
            PixelFormat::Rgb565 => 0,
            PixelFormat::Xrgb8888 => 1,
        }
    }

    #[inline]
    pub fn is_16bpp(&self) -> bool {
        matches!(self, PixelFormat::Rgb565)
    }
}

/// Expand an RGB565 pixel to XRGB8888, replicating the high bits into the low bits so that
/// full intensity stays full intensity.
#[inline]
pub fn rgb565_to_xrgb8888(p: u16) -> u32 {
    let r = ((p >> 11) & 0x1F) as u32;
    let g = ((p >> 5) & 0x3F) as u32;
    let b = (p & 0x1F) as u32;
    let r8 = (r << 3) | (r >> 2);
    let g8 = (g << 2) | (g >> 4);
    let b8 = (b << 3) | (b >> 2);
    (r8 << 16) | (g8 << 8) | b8
}

/// Pack 8-bit channels into an XRGB8888 pixel.
#[inline]
pub const fn xrgb8888(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_expansion() {
        assert_eq!(rgb565_to_xrgb8888(0xFFFF), 0x00FF_FFFF);
        assert_eq!(rgb565_to_xrgb8888(0x0000), 0);
        assert_eq!(rgb565_to_xrgb8888(0xF800), 0x00FF_0000);
        assert_eq!(rgb565_to_xrgb8888(0x07E0), 0x0000_FF00);
        assert_eq!(rgb565_to_xrgb8888(0x001F), 0x0000_00FF);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Xrgb8888.bytes_per_pixel(), 4);
        assert_eq!(PixelFormat::from_rgb32(true), PixelFormat::Xrgb8888);
        assert_eq!(xrgb8888(0x12, 0x34, 0x56), 0x0012_3456);
    }
}
