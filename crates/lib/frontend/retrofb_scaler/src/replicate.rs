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

    retrofb_scaler::replicate.rs

    Integer replication scalers. Each source pixel is repeated XM times across and each
    resulting row YM times down, with no interpolation.
*/

use crate::nearest::fits;

/// Replicate a `sw`x`sh` source into a destination of exactly `sw*XM` x `sh*YM` pixels.
/// Strides are in pixels. Returns false without touching `dst` if a buffer is too small.
pub fn replicate<P: Copy, const XM: usize, const YM: usize>(
    src: &[P],
    sw: u32,
    sh: u32,
    src_stride: usize,
    dst: &mut [P],
    dst_stride: usize,
) -> bool {
    let dw = sw as usize * XM;
    let dh = sh as usize * YM;
    if XM == 0 || YM == 0 || !fits(src.len(), sw, sh, src_stride) {
        return false;
    }
    if dw > u32::MAX as usize || dh > u32::MAX as usize || !fits(dst.len(), dw as u32, dh as u32, dst_stride) {
        return false;
    }

    for sy in 0..sh as usize {
        let src_row = &src[sy * src_stride..sy * src_stride + sw as usize];
        let first = sy * YM * dst_stride;

        for (chunk, pixel) in dst[first..first + dw].chunks_exact_mut(XM).zip(src_row) {
            chunk.fill(*pixel);
        }
        for n in 1..YM {
            dst.copy_within(first..first + dw, first + n * dst_stride);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check<const XM: usize, const YM: usize>(sw: u32, sh: u32) {
        let src: Vec<u32> = (0..sw * sh).collect();
        let dw = sw as usize * XM;
        let dh = sh as usize * YM;
        let mut dst = vec![u32::MAX; dw * dh];
        assert!(replicate::<u32, XM, YM>(&src, sw, sh, sw as usize, &mut dst, dw));

        for (y, row) in dst.chunks_exact(dw).enumerate() {
            for (x, p) in row.iter().enumerate() {
                let expected = (y / YM) as u32 * sw + (x / XM) as u32;
                assert_eq!(*p, expected, "{}x{} at ({}, {})", XM, YM, x, y);
            }
        }
    }

    #[test]
    fn test_replication_counts() {
        check::<1, 1>(5, 3);
        check::<1, 3>(5, 3);
        check::<2, 1>(5, 3);
        check::<2, 4>(5, 3);
        check::<4, 2>(5, 3);
        check::<4, 3>(1, 1);
        check::<4, 4>(7, 2);
    }

    #[test]
    fn test_16bpp_with_stride() {
        let src: Vec<u16> = vec![1, 2, 0xFFFF, 3, 4, 0xFFFF];
        let mut dst = vec![0u16; 5 * 4];
        assert!(replicate::<u16, 2, 2>(&src, 2, 2, 3, &mut dst, 5));
        assert_eq!(&dst[0..4], &[1, 1, 2, 2]);
        assert_eq!(&dst[5..9], &[1, 1, 2, 2]);
        assert_eq!(&dst[10..14], &[3, 3, 4, 4]);
        assert_eq!(&dst[15..19], &[3, 3, 4, 4]);
        assert!([dst[4], dst[9], dst[14], dst[19]].iter().all(|p| *p == 0));
    }

    #[test]
    fn test_short_destination() {
        let src = vec![1u32; 4];
        let mut dst = vec![0u32; 15];
        assert!(!replicate::<u32, 2, 2>(&src, 2, 2, 2, &mut dst, 4));
        assert!(dst.iter().all(|p| *p == 0));
    }
}
