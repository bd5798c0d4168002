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

    retrofb_headless::lib.rs

    Headless runner: drives the video pipeline with synthetic frames on an
    in-memory display and reports what happened.
*/

//! RetroFB headless front-end main library component.

#![forbid(unsafe_code)]

use display_backend_memory::{DisplayDevice, MemoryDisplay};
use anyhow::anyhow;
use retrofb_common::{PixelFormat, SourceFrame};
use retrofb_config::ConfigFileParams;
use retrofb_frontend_common::{FrameFlags, FrameOutcome, VideoDriver};
use retrofb_osd::BitmapFont;
use web_time::{Duration, Instant};

pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;
/// Frames that carry an OSD frame counter.
pub const OSD_FRAMES: u32 = 120;
const FRAME_INTERVAL: Duration = Duration::from_micros(16667);

#[derive(Copy, Clone, Debug, Default)]
pub struct RunSummary {
    pub composited: u32,
    pub dropped: u32,
    pub paused: u32,
    pub skipped: u32,
}

/// Fill `buf` with an RGB565 gradient that scrolls horizontally with `frame`.
pub fn gradient(buf: &mut [u16], w: u32, h: u32, frame: u32) {
    for (y, row) in buf.chunks_exact_mut(w as usize).take(h as usize).enumerate() {
        let g = ((y as u32 * 63) / h.max(1)) as u16;
        for (x, px) in row.iter_mut().enumerate() {
            let r = ((x as u32 + frame) & 0x1F) as u16;
            let b = (frame & 0x1F) as u16;
            *px = (r << 11) | (g << 5) | b;
        }
    }
}

/// Render `config.runner.frames` synthetic frames through the pipeline on `display`.
/// Frame timestamps are synthetic, spaced at the display refresh interval, or at a quarter of
/// it when fast-forwarding.
pub fn render(display: MemoryDisplay, config: &ConfigFileParams) -> Result<(MemoryDisplay, RunSummary), anyhow::Error> {
    let runner = &config.runner;
    let mut driver = VideoDriver::new(display, config.video_config(), Box::new(BitmapFont::placeholder()))?;
    driver.set_nonblock_state(runner.fast_forward);

    let (w, h) = (runner.content_width.max(1), runner.content_height.max(1));
    let (Some(len), Some(pitch)) = ((w as usize).checked_mul(h as usize), w.checked_mul(2))
    else {
        return Err(anyhow!("Content size {}x{} is too large", w, h));
    };
    let mut buf = vec![0u16; len];
    let flags = FrameFlags {
        paused: false,
        fast_forward: runner.fast_forward,
    };
    let step = match runner.fast_forward {
        true => FRAME_INTERVAL / 4,
        false => FRAME_INTERVAL,
    };

    let start = Instant::now();
    let mut summary = RunSummary::default();

    for i in 0..runner.frames {
        gradient(&mut buf, w, h, i);
        let frame = SourceFrame::from_bytes(bytemuck::cast_slice(&buf), w, h, pitch, PixelFormat::Rgb565)?;
        let msg = (i < OSD_FRAMES).then(|| i.to_string());

        match driver.frame(Some(&frame), msg.as_deref(), flags, start + step * i)? {
            FrameOutcome::Composited | FrameOutcome::MenuComposited => summary.composited += 1,
            FrameOutcome::Dropped => summary.dropped += 1,
            FrameOutcome::Paused => summary.paused += 1,
            FrameOutcome::NoFrame => summary.skipped += 1,
        }
    }

    let stats = driver.scheduler().stats();
    log::info!(
        "Rendered {} frames: {} accepted, {} dropped. Geometry: {:?}",
        runner.frames,
        stats.accepted,
        stats.dropped,
        driver.geometry().video
    );
    if let Some(k) = driver.geometry().integer_multiplier() {
        log::info!("Integer scale: {}x", k);
    }
    if let (Some(avg), Some(last)) = (driver.scheduler().average_interval(), driver.scheduler().last_interval()) {
        log::debug!("Frame interval: {:?} average, {:?} last", avg, last);
    }
    log::debug!("OSD: {:?}", driver.osd().stats());

    let display = driver.shutdown()?;
    Ok((display, summary))
}

pub fn run() {
    env_logger::init();

    let config = match retrofb_config::read_config_file("./retrofb.toml") {
        Ok(config) => config,
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            Some(e) => {
                eprintln!("Unknown IO error reading configuration file:\n{}", e);
                std::process::exit(1);
            }
            None => {
                eprintln!(
                    "Failed to parse configuration file. There may be a typo or otherwise invalid toml:\n{}",
                    e
                );
                std::process::exit(1);
            }
        },
    };

    let display = MemoryDisplay::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let (display, summary) = match render(display, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Video pipeline failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Composited {} frames, dropped {}, skipped {}",
        summary.composited, summary.dropped, summary.skipped
    );

    if let Some(path) = &config.runner.screenshot {
        if let Err(e) = display.save_screenshot(display.displayed_page(), path) {
            eprintln!("Failed to save screenshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frames: u32, fast_forward: bool) -> ConfigFileParams {
        let mut config = ConfigFileParams::default();
        config.runner.frames = frames;
        config.runner.fast_forward = fast_forward;
        config
    }

    #[test]
    fn test_gradient() {
        let mut buf = vec![0u16; 64 * 8];
        gradient(&mut buf, 64, 8, 3);
        assert_eq!(buf[0] >> 11, 3);
        assert_eq!(buf[1] >> 11, 4);
        assert_eq!(buf[0] & 0x1F, 3);
        assert!(buf[7 * 64] & 0x07E0 > 0);
    }

    #[test]
    fn test_render_normal() {
        let display = MemoryDisplay::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let (display, summary) = render(display, &config(10, false)).unwrap();
        assert_eq!(summary.composited, 10);
        assert_eq!(summary.dropped, 0);
        assert_eq!(display.stats().flips, 10);
    }

    #[test]
    fn test_render_fast_forward() {
        let display = MemoryDisplay::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let (display, summary) = render(display, &config(40, true)).unwrap();
        // One in four frames survives at four times the refresh rate.
        assert_eq!(summary.composited + summary.dropped, 40);
        assert!(summary.composited >= 9 && summary.composited <= 11);
        assert!(!display.flip_blocking());
    }

    #[test]
    fn test_render_rejects_oversized_content() {
        let mut config = config(1, false);
        config.runner.content_width = u32::MAX / 2 + 1;
        config.runner.content_height = 1;
        let display = MemoryDisplay::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let err = render(display, &config).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_unavailable_display() {
        assert!(render(MemoryDisplay::unavailable(), &config(1, false)).is_err());
    }
}
