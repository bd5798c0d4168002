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

    retrofb_scaler::lib.rs

    The RetroFB scaler engine. A PixelScaler transforms a source frame into a working
    surface. Two families exist: the nearest neighbour resampler for arbitrary ratios,
    and integer replication scalers for prescaling ahead of a filtered hardware stretch.

    Replication scalers live in a constant table indexed by pixel depth and multiplier.
    select() performs the lookup once per geometry change.
*/

pub mod nearest;
pub mod replicate;

use enum_dispatch::enum_dispatch;

use retrofb_common::{PixelData, PixelFormat, SourceFrame, Surface, SurfacePixels};
use retrofb_display_common::{ScaleFactor, XMul, YMul};

pub use nearest::scale_nearest;
pub use replicate::replicate;

#[enum_dispatch]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScalerDispatch {
    NearestScaler,
    ReplicateScaler,
}

#[enum_dispatch(ScalerDispatch)]
pub trait PixelScaler {
    /// Scale `src` into `dst`. Returns false if nothing was written: a degenerate source, a
    /// pixel format mismatch, or a destination too small for the result.
    fn scale(&self, src: &SourceFrame, dst: &mut Surface) -> bool;
    fn name(&self) -> &'static str;
}

/// Resamples the source to fill the whole destination surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NearestScaler;

impl PixelScaler for NearestScaler {
    fn scale(&self, src: &SourceFrame, dst: &mut Surface) -> bool {
        if src.is_degenerate() {
            return false;
        }
        let (sw, sh, src_stride) = (src.width(), src.height(), src.stride());
        let (dw, dh, dst_stride) = (dst.width(), dst.height(), dst.stride());

        match (src.data(), dst.pixels_mut()) {
            (PixelData::Rgb565(s), SurfacePixels::Rgb565(d)) => {
                scale_nearest(s, sw, sh, src_stride, d, dw, dh, dst_stride)
            }
            (PixelData::Xrgb8888(s), SurfacePixels::Xrgb8888(d)) => {
                scale_nearest(s, sw, sh, src_stride, d, dw, dh, dst_stride)
            }
            _ => {
                log::warn!("NearestScaler: source and destination pixel formats differ");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "nearest"
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReplicateScaler {
    format: PixelFormat,
    factor: ScaleFactor,
}

impl ReplicateScaler {
    pub const fn new(format: PixelFormat, factor: ScaleFactor) -> Self {
        Self { format, factor }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn factor(&self) -> ScaleFactor {
        self.factor
    }

    fn run<P: Copy>(&self, src: &[P], sw: u32, sh: u32, src_stride: usize, dst: &mut [P], dst_stride: usize) -> bool {
        use XMul::*;
        use YMul::*;
        match (self.factor.x, self.factor.y) {
            (X1, Y1) => replicate::<P, 1, 1>(src, sw, sh, src_stride, dst, dst_stride),
            (X1, Y2) => replicate::<P, 1, 2>(src, sw, sh, src_stride, dst, dst_stride),
            (X1, Y3) => replicate::<P, 1, 3>(src, sw, sh, src_stride, dst, dst_stride),
            (X1, Y4) => replicate::<P, 1, 4>(src, sw, sh, src_stride, dst, dst_stride),
            (X2, Y1) => replicate::<P, 2, 1>(src, sw, sh, src_stride, dst, dst_stride),
            (X2, Y2) => replicate::<P, 2, 2>(src, sw, sh, src_stride, dst, dst_stride),
            (X2, Y3) => replicate::<P, 2, 3>(src, sw, sh, src_stride, dst, dst_stride),
            (X2, Y4) => replicate::<P, 2, 4>(src, sw, sh, src_stride, dst, dst_stride),
            (X4, Y1) => replicate::<P, 4, 1>(src, sw, sh, src_stride, dst, dst_stride),
            (X4, Y2) => replicate::<P, 4, 2>(src, sw, sh, src_stride, dst, dst_stride),
            (X4, Y3) => replicate::<P, 4, 3>(src, sw, sh, src_stride, dst, dst_stride),
            (X4, Y4) => replicate::<P, 4, 4>(src, sw, sh, src_stride, dst, dst_stride),
        }
    }
}

impl PixelScaler for ReplicateScaler {
    fn scale(&self, src: &SourceFrame, dst: &mut Surface) -> bool {
        if src.is_degenerate() || src.format() != self.format {
            return false;
        }
        let (sw, sh, src_stride) = (src.width(), src.height(), src.stride());
        let dst_stride = dst.stride();

        match (src.data(), dst.pixels_mut()) {
            (PixelData::Rgb565(s), SurfacePixels::Rgb565(d)) => self.run(s, sw, sh, src_stride, d, dst_stride),
            (PixelData::Xrgb8888(s), SurfacePixels::Xrgb8888(d)) => self.run(s, sw, sh, src_stride, d, dst_stride),
            _ => {
                log::warn!("ReplicateScaler: source and destination pixel formats differ");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        use XMul::*;
        use YMul::*;
        match (self.factor.x, self.factor.y) {
            (X1, Y1) => "replicate1x1",
            (X1, Y2) => "replicate1x2",
            (X1, Y3) => "replicate1x3",
            (X1, Y4) => "replicate1x4",
            (X2, Y1) => "replicate2x1",
            (X2, Y2) => "replicate2x2",
            (X2, Y3) => "replicate2x3",
            (X2, Y4) => "replicate2x4",
            (X4, Y1) => "replicate4x1",
            (X4, Y2) => "replicate4x2",
            (X4, Y3) => "replicate4x3",
            (X4, Y4) => "replicate4x4",
        }
    }
}

const fn replicate_row(format: PixelFormat, x: XMul) -> [ReplicateScaler; 4] {
    [
        ReplicateScaler::new(format, ScaleFactor::new(x, YMul::Y1)),
        ReplicateScaler::new(format, ScaleFactor::new(x, YMul::Y2)),
        ReplicateScaler::new(format, ScaleFactor::new(x, YMul::Y3)),
        ReplicateScaler::new(format, ScaleFactor::new(x, YMul::Y4)),
    ]
}

const fn replicate_depth(format: PixelFormat) -> [[ReplicateScaler; 4]; 3] {
    [
        replicate_row(format, XMul::X1),
        replicate_row(format, XMul::X2),
        replicate_row(format, XMul::X4),
    ]
}

/// Replication scalers indexed by [pixel depth][x multiplier][y multiplier].
pub const REPLICATE_TABLE: [[[ReplicateScaler; 4]; 3]; 2] = [
    replicate_depth(PixelFormat::Rgb565),
    replicate_depth(PixelFormat::Xrgb8888),
];

/// Pick the scaler for a pixel format and optional prescale factor.
pub fn select(format: PixelFormat, factor: Option<ScaleFactor>) -> ScalerDispatch {
    match factor {
        Some(f) => REPLICATE_TABLE[format.table_index()][f.x.index()][f.y.index()].into(),
        None => NearestScaler.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_table_lookup() {
        for format in PixelFormat::iter() {
            for x in XMul::iter() {
                for y in YMul::iter() {
                    let factor = ScaleFactor::new(x, y);
                    match select(format, Some(factor)) {
                        ScalerDispatch::ReplicateScaler(s) => {
                            assert_eq!(s.format(), format);
                            assert_eq!(s.factor(), factor);
                        }
                        other => panic!("unexpected scaler {:?}", other),
                    }
                }
            }
        }
        assert_eq!(select(PixelFormat::Rgb565, None), ScalerDispatch::NearestScaler(NearestScaler));
    }

    #[test]
    fn test_dispatch_scale() {
        let pixels: Vec<u16> = vec![0xF800, 0x07E0, 0x001F, 0xFFFF];
        let frame = SourceFrame::new(PixelData::Rgb565(&pixels), 2, 2, 4);

        let mut surface = Surface::new(4, 6, PixelFormat::Rgb565).unwrap();
        let scaler = select(PixelFormat::Rgb565, Some(ScaleFactor::new(XMul::X2, YMul::Y3)));
        assert_eq!(scaler.name(), "replicate2x3");
        assert!(scaler.scale(&frame, &mut surface));
        assert_eq!(surface.pixel(1, 2), Some(0xF800));
        assert_eq!(surface.pixel(2, 3), Some(0xFFFF));

        let mut surface = Surface::new(3, 3, PixelFormat::Rgb565).unwrap();
        let scaler = select(PixelFormat::Rgb565, None);
        assert!(scaler.scale(&frame, &mut surface));
        assert_eq!(surface.pixel(0, 0), Some(0xF800));
        assert_eq!(surface.pixel(2, 2), Some(0xFFFF));
    }

    #[test]
    fn test_degenerate_and_mismatch() {
        let empty = SourceFrame::new(PixelData::Xrgb8888(&[]), 0, 0, 0);
        let mut surface = Surface::new(4, 4, PixelFormat::Xrgb8888).unwrap();
        surface.fill(9);
        assert!(!NearestScaler.scale(&empty, &mut surface));
        assert!(!select(PixelFormat::Xrgb8888, Some(ScaleFactor::new(XMul::X1, YMul::Y1))).scale(&empty, &mut surface));

        let pixels = vec![1u16; 4];
        let frame = SourceFrame::new(PixelData::Rgb565(&pixels), 2, 2, 4);
        assert!(!NearestScaler.scale(&frame, &mut surface));
        assert_eq!(surface.pixel(0, 0), Some(9));
    }
}
