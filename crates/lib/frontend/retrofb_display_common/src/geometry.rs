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

    retrofb_display_common::geometry.rs

    Resolve content size and display policy into an output geometry: the destination
    rectangle on the physical screen, the prescale factor and the working surface size.

    All ratios are computed in 16.16 fixed point. The destination rectangle is expressed
    in viewer coordinates; mapping it onto an inverted panel is the compositor's job.
*/

use retrofb_common::{PixelFormat, Rect, Rotation, VideoDimensions};
use thiserror::Error;

use crate::{DisplayPolicy, ScaleFactor, ScalerFilter};

const FIXED_SHIFT: u32 = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Invalid content dimensions: {0}")]
    InvalidContent(VideoDimensions),
    #[error("Invalid screen dimensions: {0}")]
    InvalidScreen(VideoDimensions),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OutputGeometry {
    pub content: VideoDimensions,
    /// Working surface size, in content orientation.
    pub frame: VideoDimensions,
    /// Destination rectangle on the physical screen, in viewer coordinates.
    pub video: Rect,
    pub screen: VideoDimensions,
    pub rotation: Rotation,
    pub format: PixelFormat,
    pub policy: DisplayPolicy,
    /// Replication prescale, or None for the nearest-neighbour path.
    pub factor: Option<ScaleFactor>,
}

impl OutputGeometry {
    /// Returns true if the destination rectangle covers the whole screen.
    pub fn is_fullscreen(&self) -> bool {
        self.video.covers(self.screen)
    }

    /// Integer multiplier applied to the content in integer scaling mode, if any.
    pub fn integer_multiplier(&self) -> Option<u32> {
        if !self.policy.scale_integer {
            return None;
        }
        let (w, h) = oriented(self.content, self.rotation);
        let (k, rem) = (self.video.w / w, self.video.w % w);
        (k >= 1 && rem == 0 && self.video.h == h * k).then_some(k)
    }
}

/// Content dimensions as they appear on screen after rotation.
fn oriented(content: VideoDimensions, rotation: Rotation) -> (u32, u32) {
    if rotation.swaps_axes() {
        (content.h, content.w)
    }
    else {
        (content.w, content.h)
    }
}

/// Prescale factor needed for the stretched image to be at least 80% of `dest` pixels wide:
/// ceil(dest * 0.8 / src), at least 1.
fn prescale_factor(dest: u32, src: u32) -> u32 {
    let num = 4 * dest as u64;
    let den = 5 * src as u64;
    (num.div_ceil(den) as u32).max(1)
}

pub fn resolve(
    content: VideoDimensions,
    screen: VideoDimensions,
    rotation: Rotation,
    format: PixelFormat,
    policy: DisplayPolicy,
) -> Result<OutputGeometry, GeometryError> {
    if content.is_empty() {
        return Err(GeometryError::InvalidContent(content));
    }
    if screen.is_empty() {
        return Err(GeometryError::InvalidScreen(screen));
    }

    let (res_x, res_y) = (screen.w, screen.h);
    let (width, height) = oriented(content, rotation);

    let xmul = ((res_x as u64) << FIXED_SHIFT) / width as u64;
    let ymul = ((res_y as u64) << FIXED_SHIFT) / height as u64;
    let mul_int = (xmul.min(ymul) >> FIXED_SHIFT) as u32;

    let (mut video_x, video_y, mut video_w, video_h) = if policy.scale_integer && mul_int >= 1 {
        let mut w = width * mul_int;
        let mut h = height * mul_int;
        if !policy.keep_aspect && !(w == res_x && h == res_y) {
            // Stretch to 4:3 for CRT era content.
            let wx3 = w * 3;
            let hx4 = h * 4;
            if wx3 > hx4 {
                h = (wx3 / 4).min(res_y);
            }
            else if wx3 < hx4 {
                w = (hx4 / 3).min(res_x);
            }
        }
        ((res_x - w) >> 1, (res_y - h) >> 1, w, h)
    }
    else if policy.keep_aspect {
        // Pick the fitted axis from the exact ratios. The truncated fixed point ratios can tie
        // while the true ratios differ, which would push the derived axis off screen.
        if res_x as u64 * height as u64 > res_y as u64 * width as u64 {
            let w = ((width as u64 * res_y as u64) / height as u64) as u32;
            ((res_x - w) >> 1, 0, w, res_y)
        }
        else {
            let h = ((height as u64 * res_x as u64) / width as u64) as u32;
            (0, (res_y - h) >> 1, res_x, h)
        }
    }
    else {
        (0, 0, res_x, res_y)
    };

    // The 16bpp blit path requires 4 byte alignment.
    if format.is_16bpp() {
        video_x &= !1;
        video_w &= !1;
    }

    // Destination size as seen from the working surface.
    let surface_dest = if rotation.swaps_axes() {
        VideoDimensions::new(video_h, video_w)
    }
    else {
        VideoDimensions::new(video_w, video_h)
    };

    let factor = match policy.filter {
        ScalerFilter::Nearest => None,
        ScalerFilter::Bilinear | ScalerFilter::Bicubic => Some(ScaleFactor::from_factors(
            prescale_factor(surface_dest.w, content.w),
            prescale_factor(surface_dest.h, content.h),
        )),
    };

    let frame = match factor {
        Some(f) => VideoDimensions::new(content.w * f.x.factor(), content.h * f.y.factor()),
        None => surface_dest,
    };

    let geometry = OutputGeometry {
        content,
        frame,
        video: Rect::new(video_x, video_y, video_w, video_h),
        screen,
        rotation,
        format,
        policy,
        factor,
    };
    log::debug!("resolve(): {:?}", geometry);
    Ok(geometry)
}
