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

    retrofb_common::types::frame.rs

    A borrowed view of a host content frame: typed pixels, dimensions and row pitch.
*/

use crate::{PixelFormat, SurfaceError};

#[derive(Copy, Clone, Debug)]
pub enum PixelData<'a> {
    Rgb565(&'a [u16]),
    Xrgb8888(&'a [u32]),
}

impl PixelData<'_> {
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelData::Rgb565(_) => PixelFormat::Rgb565,
            PixelData::Xrgb8888(_) => PixelFormat::Xrgb8888,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PixelData::Rgb565(v) => v.len(),
            PixelData::Xrgb8888(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SourceFrame<'a> {
    data:   PixelData<'a>,
    width:  u32,
    height: u32,
    pitch:  u32, // Row pitch in bytes
}

impl<'a> SourceFrame<'a> {
    pub fn new(data: PixelData<'a>, width: u32, height: u32, pitch: u32) -> Self {
        Self {
            data,
            width,
            height,
            pitch,
        }
    }

    /// Build a frame from raw bytes as delivered by a core. The byte slice must be aligned for
    /// the pixel type; misaligned buffers are rejected rather than read unaligned.
    pub fn from_bytes(
        bytes: &'a [u8],
        width: u32,
        height: u32,
        pitch: u32,
        format: PixelFormat,
    ) -> Result<Self, SurfaceError> {
        let data = match format {
            PixelFormat::Rgb565 => {
                let usable = bytes.len() & !1;
                PixelData::Rgb565(
                    bytemuck::try_cast_slice(&bytes[..usable]).map_err(|_| SurfaceError::Misaligned(format))?,
                )
            }
            PixelFormat::Xrgb8888 => {
                let usable = bytes.len() & !3;
                PixelData::Xrgb8888(
                    bytemuck::try_cast_slice(&bytes[..usable]).map_err(|_| SurfaceError::Misaligned(format))?,
                )
            }
        };
        Ok(Self::new(data, width, height, pitch))
    }

    #[inline]
    pub fn data(&self) -> PixelData<'a> {
        self.data
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    /// Row stride in pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        (self.pitch / self.format().bytes_per_pixel()) as usize
    }

    /// A frame with no pixels to read. Scaling or blitting a degenerate frame does nothing.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Returns true if every row lies within the pixel buffer.
    pub fn is_within_bounds(&self) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let stride = self.stride();
        if stride < self.width as usize {
            return false;
        }
        (self.height as usize - 1)
            .checked_mul(stride)
            .and_then(|n| n.checked_add(self.width as usize))
            .is_some_and(|need| need <= self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let words: Vec<u32> = vec![0xAABBCCDD; 16];
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let frame = SourceFrame::from_bytes(bytes, 4, 4, 16, PixelFormat::Xrgb8888).unwrap();
        assert_eq!(frame.stride(), 4);
        assert!(frame.is_within_bounds());

        let frame = SourceFrame::from_bytes(bytes, 8, 4, 16, PixelFormat::Rgb565).unwrap();
        assert_eq!(frame.data().len(), 32);
        assert!(frame.is_within_bounds());
    }

    #[test]
    fn test_misaligned() {
        let words: Vec<u32> = vec![0; 8];
        let bytes: &[u8] = bytemuck::cast_slice(&words);
        let res = SourceFrame::from_bytes(&bytes[1..], 2, 2, 8, PixelFormat::Xrgb8888);
        assert_eq!(res.unwrap_err(), SurfaceError::Misaligned(PixelFormat::Xrgb8888));
    }

    #[test]
    fn test_bounds() {
        let pixels = vec![0u16; 10];
        let frame = SourceFrame::new(PixelData::Rgb565(&pixels), 4, 3, 8);
        assert!(!frame.is_within_bounds());
        let frame = SourceFrame::new(PixelData::Rgb565(&pixels), 4, 2, 8);
        assert!(frame.is_within_bounds());
        let huge = SourceFrame::new(PixelData::Rgb565(&pixels), u32::MAX, u32::MAX, u32::MAX);
        assert!(!huge.is_within_bounds());
        let empty = SourceFrame::new(PixelData::Rgb565(&[]), 0, 0, 0);
        assert!(empty.is_degenerate());
    }
}
