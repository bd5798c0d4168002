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

    retrofb_common::types::surface.rs

    An owned pixel surface. Working surfaces receive the output of the scaler and are handed
    to the display backend for the final blit.
*/

use crate::{PixelData, PixelFormat, SourceFrame, VideoDimensions};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Failed to allocate a {w}x{h} surface")]
    AllocationFailure { w: u32, h: u32 },
    #[error("Invalid surface dimensions: {w}x{h}")]
    InvalidDimensions { w: u32, h: u32 },
    #[error("Pixel buffer too small: need {need} pixels, have {have}")]
    BufferTooSmall { need: usize, have: usize },
    #[error("Pixel buffer is not aligned for {0:?}")]
    Misaligned(PixelFormat),
}

#[derive(Clone, Debug)]
pub enum SurfacePixels {
    Rgb565(Vec<u16>),
    Xrgb8888(Vec<u32>),
}

impl SurfacePixels {
    pub fn len(&self) -> usize {
        match self {
            SurfacePixels::Rgb565(v) => v.len(),
            SurfacePixels::Xrgb8888(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct Surface {
    w: u32,
    h: u32,
    pitch: u32,
    format: PixelFormat,
    pixels: SurfacePixels,
}

impl Surface {
    /// Largest width or height a surface may be created with.
    pub const MAX_DIMENSION: u32 = 4096;

    /// Create a zero-filled surface. Allocation failures are reported, never aborted on.
    pub fn new(w: u32, h: u32, format: PixelFormat) -> Result<Self, SurfaceError> {
        if w == 0 || h == 0 {
            return Err(SurfaceError::InvalidDimensions { w, h });
        }
        if w > Self::MAX_DIMENSION || h > Self::MAX_DIMENSION {
            return Err(SurfaceError::AllocationFailure { w, h });
        }

        let len = w as usize * h as usize;
        let pixels = match format {
            PixelFormat::Rgb565 => {
                let mut v: Vec<u16> = Vec::new();
                v.try_reserve_exact(len)
                    .map_err(|_| SurfaceError::AllocationFailure { w, h })?;
                v.resize(len, 0);
                SurfacePixels::Rgb565(v)
            }
            PixelFormat::Xrgb8888 => {
                let mut v: Vec<u32> = Vec::new();
                v.try_reserve_exact(len)
                    .map_err(|_| SurfaceError::AllocationFailure { w, h })?;
                v.resize(len, 0);
                SurfacePixels::Xrgb8888(v)
            }
        };

        log::trace!("Surface::new(): allocated {}x{} {:?} surface", w, h, format);
        Ok(Self {
            w,
            h,
            pitch: w * format.bytes_per_pixel(),
            format,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.h
    }

    #[inline]
    pub fn dimensions(&self) -> VideoDimensions {
        VideoDimensions::new(self.w, self.h)
    }

    /// Row pitch in bytes.
    #[inline]
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Row stride in pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        (self.pitch / self.format.bytes_per_pixel()) as usize
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &SurfacePixels {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut SurfacePixels {
        &mut self.pixels
    }

    /// Fill the surface with a raw pixel value. For 16-bit surfaces the value is truncated.
    pub fn fill(&mut self, value: u32) {
        match &mut self.pixels {
            SurfacePixels::Rgb565(v) => v.fill(value as u16),
            SurfacePixels::Xrgb8888(v) => v.fill(value),
        }
    }

    /// Read a single pixel as a raw value. Returns None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let idx = y as usize * self.stride() + x as usize;
        match &self.pixels {
            SurfacePixels::Rgb565(v) => v.get(idx).map(|p| *p as u32),
            SurfacePixels::Xrgb8888(v) => v.get(idx).copied(),
        }
    }

    /// Raw bytes of the pixel buffer.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.pixels {
            SurfacePixels::Rgb565(v) => bytemuck::cast_slice(v),
            SurfacePixels::Xrgb8888(v) => bytemuck::cast_slice(v),
        }
    }

    /// Borrow this surface as a scaler or blit source.
    pub fn as_frame(&self) -> SourceFrame<'_> {
        let data = match &self.pixels {
            SurfacePixels::Rgb565(v) => PixelData::Rgb565(v),
            SurfacePixels::Xrgb8888(v) => PixelData::Xrgb8888(v),
        };
        SourceFrame::new(data, self.w, self.h, self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let s = Surface::new(320, 240, PixelFormat::Rgb565).unwrap();
        assert_eq!(s.pitch(), 640);
        assert_eq!(s.stride(), 320);
        assert_eq!(s.pixels().len(), 320 * 240);
        assert_eq!(s.pixel(319, 239), Some(0));
        assert_eq!(s.pixel(320, 0), None);

        let s = Surface::new(8, 2, PixelFormat::Xrgb8888).unwrap();
        assert_eq!(s.pitch(), 32);
        assert_eq!(s.as_bytes().len(), 64);
    }

    #[test]
    fn test_invalid_surfaces() {
        assert_eq!(
            Surface::new(0, 10, PixelFormat::Rgb565).unwrap_err(),
            SurfaceError::InvalidDimensions { w: 0, h: 10 }
        );
        assert_eq!(
            Surface::new(Surface::MAX_DIMENSION + 1, 10, PixelFormat::Xrgb8888).unwrap_err(),
            SurfaceError::AllocationFailure {
                w: Surface::MAX_DIMENSION + 1,
                h: 10
            }
        );
    }

    #[test]
    fn test_fill_and_frame() {
        let mut s = Surface::new(4, 4, PixelFormat::Rgb565).unwrap();
        s.fill(0x1234_F00D);
        assert_eq!(s.pixel(3, 3), Some(0xF00D));
        let frame = s.as_frame();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.stride(), 4);
        assert!(!frame.is_degenerate());
    }
}
