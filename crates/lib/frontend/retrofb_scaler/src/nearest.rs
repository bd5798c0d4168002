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

    retrofb_scaler::nearest.rs

    Nearest neighbour resampling at arbitrary ratios using 16.16 fixed point steps.

    When upscaling vertically, each source row is resampled once and then duplicated
    with a bulk copy for every following destination row that maps to the same source
    row. When downscaling, source rows that map to no destination row are skipped.
*/

const NN_SHIFT: u32 = 16;

/// Fixed point step for one axis. The +1 keeps the step non-zero and biases it upward so the
/// last source pixel is reached despite truncation.
#[inline]
pub fn nn_step(src_dim: u32, dst_dim: u32) -> u64 {
    ((src_dim as u64) << NN_SHIFT) / dst_dim as u64 + 1
}

/// Returns true if a buffer of `len` pixels can hold `h` rows of `w` pixels at `stride`.
#[inline]
pub(crate) fn fits(len: usize, w: u32, h: u32, stride: usize) -> bool {
    if w == 0 || h == 0 || stride < w as usize {
        return false;
    }
    (h as usize - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(w as usize))
        .is_some_and(|need| need <= len)
}

/// Resample one row. Consecutive destination pixels from the same source pixel reuse the
/// last read value.
#[inline]
fn scale_row<P: Copy>(src_row: &[P], sw: u32, dst_row: &mut [P], x_step: u64) {
    let last = sw as usize - 1;
    let mut ox = 0usize;
    let mut pix = src_row[0];
    let mut x = 0u64;
    for out in dst_row.iter_mut() {
        let tx = ((x >> NN_SHIFT) as usize).min(last);
        if tx != ox {
            pix = src_row[tx];
            ox = tx;
        }
        *out = pix;
        x += x_step;
    }
}

/// Scale a `sw`x`sh` source into a `dw`x`dh` destination. Strides are in pixels.
/// Returns false without touching `dst` if either side is degenerate or a buffer is too small.
#[allow(clippy::too_many_arguments)]
pub fn scale_nearest<P: Copy>(
    src: &[P],
    sw: u32,
    sh: u32,
    src_stride: usize,
    dst: &mut [P],
    dw: u32,
    dh: u32,
    dst_stride: usize,
) -> bool {
    if !fits(src.len(), sw, sh, src_stride) || !fits(dst.len(), dw, dh, dst_stride) {
        return false;
    }

    let x_step = nn_step(sw, dw);
    let y_step = nn_step(sh, dh);
    let last_row = sh as usize - 1;
    let row_len = dw as usize;
    let upscale = dh > sh;

    let mut remaining = dh;
    let mut oy = 0usize;
    let mut y = 0u64;
    let mut out = 0usize;

    loop {
        let in_start = oy.min(last_row) * src_stride;
        let out_start = out * dst_stride;
        scale_row(
            &src[in_start..in_start + sw as usize],
            sw,
            &mut dst[out_start..out_start + row_len],
            x_step,
        );

        y += y_step;
        let mut ty = (y >> NN_SHIFT) as usize;
        if upscale {
            while ty == oy {
                remaining -= 1;
                if remaining == 0 {
                    return true;
                }
                out += 1;
                dst.copy_within(out_start..out_start + row_len, out * dst_stride);
                y += y_step;
                ty = (y >> NN_SHIFT) as usize;
            }
        }
        oy = ty;
        out += 1;

        remaining -= 1;
        if remaining == 0 {
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUARD: u32 = 0xDEAD_BEEF;
    const FILL: u32 = 0x0012_3456;

    /// Scale a uniform source surrounded by guard pixels. Panics if the guards were touched or
    /// the destination is not uniformly filled.
    fn guarded_scale(sw: u32, sh: u32, dw: u32, dh: u32) {
        let pad = 16usize;
        let src_stride = sw as usize + 3;
        let mut src = vec![GUARD; pad * 2 + src_stride * sh as usize];
        for y in 0..sh as usize {
            let row = pad + y * src_stride;
            src[row..row + sw as usize].fill(FILL);
        }

        let dst_stride = dw as usize + 5;
        let mut dst = vec![GUARD; pad * 2 + dst_stride * dh as usize];
        let dst_len = dst.len();

        let src_view = &src[pad..pad + (sh as usize - 1) * src_stride + sw as usize];
        let dst_view_end = pad + (dh as usize - 1) * dst_stride + dw as usize;
        assert!(scale_nearest(
            src_view,
            sw,
            sh,
            src_stride,
            &mut dst[pad..dst_view_end],
            dw,
            dh,
            dst_stride
        ));

        assert!(dst[..pad].iter().all(|p| *p == GUARD), "{}x{} -> {}x{}", sw, sh, dw, dh);
        assert!(dst[dst_view_end..dst_len].iter().all(|p| *p == GUARD));
        for y in 0..dh as usize {
            let row = pad + y * dst_stride;
            assert!(
                dst[row..row + dw as usize].iter().all(|p| *p == FILL),
                "{}x{} -> {}x{} row {}",
                sw,
                sh,
                dw,
                dh,
                y
            );
            if y + 1 < dh as usize {
                assert!(dst[row + dw as usize..row + dst_stride].iter().all(|p| *p == GUARD));
            }
        }
    }

    #[test]
    fn test_uniform_fill() {
        let sizes = [1u32, 2, 3, 7, 160, 241, 320, 640];
        for &sw in &sizes {
            for &dw in &sizes {
                guarded_scale(sw, sw.max(1) / 2 + 1, dw, dw.max(1) / 3 + 1);
            }
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        guarded_scale(1, 1, 1, 1);
        guarded_scale(1, 1, 640, 480);
        guarded_scale(640, 480, 1, 1);
        guarded_scale(1, 480, 640, 1);
    }

    #[test]
    fn test_upscale_pattern() {
        let src: Vec<u16> = vec![1, 2, 3, 4];
        let mut dst = vec![0u16; 16];
        assert!(scale_nearest(&src, 2, 2, 2, &mut dst, 4, 4, 4));
        assert_eq!(
            dst,
            vec![1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn test_downscale_skips_rows() {
        let src: Vec<u32> = (0..16).collect();
        let mut dst = vec![0u32; 4];
        assert!(scale_nearest(&src, 4, 4, 4, &mut dst, 2, 2, 2));
        assert_eq!(dst, vec![0, 2, 8, 10]);
    }

    #[test]
    fn test_rejects_short_buffers() {
        let src = vec![0u32; 3];
        let mut dst = vec![7u32; 16];
        assert!(!scale_nearest(&src, 2, 2, 2, &mut dst, 4, 4, 4));
        assert!(!scale_nearest(&src, 0, 2, 2, &mut dst, 4, 4, 4));
        assert!(dst.iter().all(|p| *p == 7));
    }
}
