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

    frontend_common::video_driver.rs

    The video driver: owns the display device and runs the per-frame pipeline.

    A frame passes through admission, OSD message latching, either the windowed
    content path (geometry update, wait for idle, scale, composite) or the
    fullscreen menu path, and finally the OSD pass for every flip the device
    reported.
*/

use crossbeam_channel::Receiver;
use display_backend_trait::{DisplayBackendError, DisplayDevice, FlipEvent};
use retrofb_common::{PixelData, PixelFormat, Rect, Rotation, SourceFrame, Surface, SurfaceError, SurfacePixels, VideoDimensions};
use retrofb_config::{color_to_xrgb8888, VideoConfig};
use retrofb_display_common::{resolve, DisplayPolicy, GeometryError, OutputGeometry, ScalerFilter};
use retrofb_osd::{GlyphTable, OsdRenderer};
use retrofb_scaler::{scale_nearest, select, PixelScaler, ScalerDispatch};
use thiserror::Error;
use web_time::Instant;

use crate::{Admission, FrameFlags, FrameScheduler, FramebufferCompositor};

pub use retrofb_osd::layout::MENU_WIDTH;
pub const MENU_HEIGHT: u32 = 240;
pub const REFRESH_RATE: f32 = 60.0;

/// Physical resolution at which the menu is shown unstretched at exactly 2x.
const MENU_NATIVE_2X: VideoDimensions = VideoDimensions::new(MENU_WIDTH * 2, MENU_HEIGHT * 2);

#[derive(Error, Debug)]
pub enum VideoDriverError {
    #[error("Display device unavailable: {0}")]
    DeviceUnavailable(#[source] DisplayBackendError),
    #[error("Working surface allocation failed: {0}")]
    AllocationFailure(#[from] SurfaceError),
    #[error("Composite failed: {0}")]
    Composite(#[from] DisplayBackendError),
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Composited,
    MenuComposited,
    Dropped,
    Paused,
    NoFrame,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub full_width: u32,
    pub full_height: u32,
}

pub struct VideoDriver<D: DisplayDevice> {
    device: D,
    screen: VideoDimensions,
    geometry: OutputGeometry,
    scaler: ScalerDispatch,
    surface: Surface,
    compositor: FramebufferCompositor,
    scheduler: FrameScheduler,
    osd: OsdRenderer,
    osd_enabled: bool,
    flips: Receiver<FlipEvent>,

    menu_texture: Surface,
    menu_surface: Surface,
    menu_rect: Rect,
    menu_stretch: bool,
    menu_active: bool,
    was_in_menu: bool,

    vsync: bool,
    quitting: bool,
    overlay_opacity: f32,
}

impl<D: DisplayDevice> VideoDriver<D> {
    /// Bring up the pipeline on `device`. Fails if the device cannot report its resolution or
    /// the initial surfaces cannot be allocated.
    pub fn new(mut device: D, config: VideoConfig, font: Box<dyn GlyphTable>) -> Result<Self, VideoDriverError> {
        let screen = device.resolution().map_err(VideoDriverError::DeviceUnavailable)?;
        log::info!("VideoDriver::new(): resolution {}", screen);

        let menu_stretch = config.menu_stretch && screen != MENU_NATIVE_2X;
        if !menu_stretch {
            log::info!("VideoDriver::new(): menu stretch disabled");
        }
        let menu_rect = Rect::new(
            screen.w.saturating_sub(MENU_NATIVE_2X.w) / 2,
            screen.h.saturating_sub(MENU_NATIVE_2X.h) / 2,
            MENU_NATIVE_2X.w,
            MENU_NATIVE_2X.h,
        );

        let menu_texture = Surface::new(MENU_WIDTH, MENU_HEIGHT, PixelFormat::Rgb565)?;
        let menu_surface = Surface::new(screen.w, screen.h, PixelFormat::Rgb565)?;

        let rotation = Rotation::from_request(config.rotation);
        let geometry = resolve(screen, screen, rotation, PixelFormat::default(), config.policy)?;
        let surface = Surface::new(geometry.frame.w, geometry.frame.h, geometry.format)?;

        let compositor = FramebufferCompositor::new(screen);
        let mut osd = OsdRenderer::new(screen, device.page_count(), font, config.osd_color);
        osd.set_video_rect(compositor.to_memory(geometry.video));

        device.set_flip_blocking(config.vsync);
        device.set_overlay_alpha(opacity_to_alpha(config.overlay_opacity));
        let flips = device.subscribe_flips();

        Ok(Self {
            device,
            screen,
            scaler: select(geometry.format, geometry.factor),
            geometry,
            surface,
            compositor,
            scheduler: FrameScheduler::new(config.ff_frame_time_min, config.history_len),
            osd,
            osd_enabled: config.osd_enabled,
            flips,
            menu_texture,
            menu_surface,
            menu_rect,
            menu_stretch: menu_stretch || !menu_rect.fits(screen),
            menu_active: false,
            was_in_menu: false,
            vsync: config.vsync,
            quitting: false,
            overlay_opacity: config.overlay_opacity,
        })
    }

    /// Present one frame. `frame` is None when the host skipped a frame; `msg` is the OSD text
    /// to show, if any.
    pub fn frame(
        &mut self,
        frame: Option<&SourceFrame>,
        msg: Option<&str>,
        flags: FrameFlags,
        now: Instant,
    ) -> Result<FrameOutcome, VideoDriverError> {
        let frame = frame.filter(|f| {
            let valid = f.is_within_bounds();
            if !valid && !f.is_degenerate() {
                log::warn!(
                    "VideoDriver::frame(): rejecting {}x{} frame with pitch {} over {} pixels",
                    f.width(),
                    f.height(),
                    f.pitch(),
                    f.data().len()
                );
            }
            valid
        });
        if frame.is_none() && !self.menu_active {
            return Ok(FrameOutcome::NoFrame);
        }

        match self.scheduler.admit(now, flags) {
            Admission::Paused => return Ok(FrameOutcome::Paused),
            Admission::Drop => return Ok(FrameOutcome::Dropped),
            Admission::Accept => {}
        }

        self.osd.set_message(msg.filter(|_| self.osd_enabled));

        let outcome = match frame {
            Some(frame) if !self.menu_active => {
                self.composite_content(frame)?;
                FrameOutcome::Composited
            }
            _ => {
                self.composite_menu()?;
                FrameOutcome::MenuComposited
            }
        };

        self.dispatch_flips();
        Ok(outcome)
    }

    fn composite_content(&mut self, frame: &SourceFrame) -> Result<(), VideoDriverError> {
        if self.was_in_menu {
            self.compositor.invalidate_margins();
            self.was_in_menu = false;
        }

        let content = VideoDimensions::new(frame.width(), frame.height());
        if content != self.geometry.content || frame.format() != self.geometry.format {
            // On failure keep rendering at the previous dimensions.
            let _ = self.set_output(content, frame.format(), self.geometry.rotation, self.geometry.policy);
        }

        self.device.wait_idle()?;
        if !self.scaler.scale(frame, &mut self.surface) {
            log::trace!("VideoDriver: {} scaler skipped frame", self.scaler.name());
        }
        self.compositor.composite(
            &mut self.device,
            &self.surface.as_frame(),
            self.geometry.video,
            self.geometry.rotation,
        )?;
        Ok(())
    }

    fn composite_menu(&mut self) -> Result<(), VideoDriverError> {
        let dst = match self.menu_stretch {
            true => Rect::full(self.screen),
            false => self.menu_rect,
        };

        self.device.wait_idle()?;

        let stride = self.menu_surface.stride();
        if let (SurfacePixels::Rgb565(src), SurfacePixels::Rgb565(pixels)) =
            (self.menu_texture.pixels(), self.menu_surface.pixels_mut())
        {
            let offset = dst.y as usize * stride + dst.x as usize;
            if let Some(target) = pixels.get_mut(offset..) {
                scale_nearest(
                    src,
                    MENU_WIDTH,
                    MENU_HEIGHT,
                    MENU_WIDTH as usize,
                    target,
                    dst.w,
                    dst.h,
                    stride,
                );
            }
        }

        // The menu is never rotated with the content.
        self.compositor.composite(
            &mut self.device,
            &self.menu_surface.as_frame(),
            Rect::full(self.screen),
            Rotation::Deg180,
        )?;
        Ok(())
    }

    /// Run the OSD for every page the device finished flipping.
    fn dispatch_flips(&mut self) {
        while let Ok(event) = self.flips.try_recv() {
            self.osd.on_flip(&mut self.device, event.page);
        }
    }

    /// Resolve and commit a new geometry. Nothing changes unless the working surface could be
    /// allocated.
    fn set_output(
        &mut self,
        content: VideoDimensions,
        format: PixelFormat,
        rotation: Rotation,
        policy: DisplayPolicy,
    ) -> Result<(), VideoDriverError> {
        let geometry = resolve(content, self.screen, rotation, format, policy).map_err(|e| {
            log::error!("VideoDriver::set_output(): {}", e);
            e
        })?;

        self.device.wait_idle()?;
        let surface = Surface::new(geometry.frame.w, geometry.frame.h, format).map_err(|e| {
            log::error!("VideoDriver::set_output(): failed to init working surface: {}", e);
            e
        })?;

        self.surface = surface;
        self.scaler = select(format, geometry.factor);
        self.geometry = geometry;
        self.sync_osd_rect();
        if !self.menu_active {
            self.compositor.invalidate_margins();
        }
        log::debug!(
            "VideoDriver::set_output(): content {} frame {} video {:?} scaler {}",
            geometry.content,
            geometry.frame,
            geometry.video,
            self.scaler.name()
        );
        Ok(())
    }

    /// Recompute the geometry for the current content with new settings.
    fn refresh(&mut self, rotation: Rotation, policy: DisplayPolicy) -> bool {
        self.set_output(self.geometry.content, self.geometry.format, rotation, policy)
            .is_ok()
    }

    fn sync_osd_rect(&mut self) {
        let rect = match self.menu_active {
            true => Rect::full(self.screen),
            false => self.compositor.to_memory(self.geometry.video),
        };
        self.osd.set_video_rect(rect);
    }

    /// Upload the 320x240 RGB565 menu texture. Returns false if the texture was ignored.
    pub fn set_menu_texture(&mut self, texture: &SourceFrame) -> bool {
        let PixelData::Rgb565(src) = texture.data()
        else {
            return false;
        };
        if texture.width() != MENU_WIDTH || texture.height() != MENU_HEIGHT || !texture.is_within_bounds() {
            return false;
        }
        let src_stride = texture.stride();
        let width = MENU_WIDTH as usize;
        if let SurfacePixels::Rgb565(dst) = self.menu_texture.pixels_mut() {
            for (y, row) in dst.chunks_exact_mut(width).enumerate() {
                let start = y * src_stride;
                if let Some(src_row) = src.get(start..start + width) {
                    row.copy_from_slice(src_row);
                }
            }
        }
        true
    }

    pub fn set_menu_active(&mut self, state: bool) {
        if state == self.menu_active {
            return;
        }
        self.menu_active = state;
        if state {
            self.was_in_menu = true;
        }
        self.sync_osd_rect();
    }

    pub fn menu_active(&self) -> bool {
        self.menu_active
    }

    /// Fast-forward runs non-blocking, without waiting for vsync.
    pub fn set_nonblock_state(&mut self, toggle: bool) {
        let vsync = !toggle;
        if self.vsync != vsync {
            self.vsync = vsync;
            self.device.set_flip_blocking(vsync);
        }
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }

    pub fn alive(&self) -> bool {
        !self.quitting
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn focus(&self) -> bool {
        true
    }

    pub fn has_windowed(&self) -> bool {
        false
    }

    pub fn viewport(&self) -> Viewport {
        let content = self.geometry.content;
        Viewport {
            x: 0,
            y: 0,
            width: content.w,
            height: content.h,
            full_width: content.w,
            full_height: content.h,
        }
    }

    pub fn refresh_rate(&self) -> f32 {
        REFRESH_RATE
    }

    /// Rotate the content by an abstract request of 0, 90, 180 or 270 degrees.
    pub fn set_rotation(&mut self, degrees: u32) {
        let rotation = Rotation::from_request(degrees);
        if rotation != self.geometry.rotation {
            self.refresh(rotation, self.geometry.policy);
        }
    }

    pub fn set_filter(&mut self, filter: ScalerFilter) {
        if filter != self.geometry.policy.filter {
            let policy = DisplayPolicy {
                filter,
                ..self.geometry.policy
            };
            self.refresh(self.geometry.rotation, policy);
        }
    }

    pub fn apply_state_changes(&mut self, keep_aspect: bool, scale_integer: bool) {
        let policy = self.geometry.policy;
        if keep_aspect != policy.keep_aspect || scale_integer != policy.scale_integer {
            let policy = DisplayPolicy {
                keep_aspect,
                scale_integer,
                ..policy
            };
            self.refresh(self.geometry.rotation, policy);
        }
    }

    pub fn set_osd_color(&mut self, rgb: [f32; 3]) {
        self.osd.set_color(color_to_xrgb8888(rgb));
        self.refresh(self.geometry.rotation, self.geometry.policy);
    }

    pub fn set_overlay_opacity(&mut self, opacity: f32) {
        self.overlay_opacity = opacity.clamp(0.0, 1.0);
        self.device.set_overlay_alpha(opacity_to_alpha(self.overlay_opacity));
        self.refresh(self.geometry.rotation, self.geometry.policy);
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay_opacity
    }

    pub fn geometry(&self) -> &OutputGeometry {
        &self.geometry
    }

    pub fn scaler(&self) -> &ScalerDispatch {
        &self.scaler
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn compositor(&self) -> &FramebufferCompositor {
        &self.compositor
    }

    pub fn osd(&self) -> &OsdRenderer {
        &self.osd
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Tear down in order: stop flip notifications, wait for the hardware, then release the
    /// surfaces. Returns the device.
    pub fn shutdown(mut self) -> Result<D, VideoDriverError> {
        self.device.detach_flips();
        self.device.wait_idle()?;
        log::debug!("VideoDriver::shutdown(): releasing surfaces");
        Ok(self.device)
    }
}

fn opacity_to_alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use display_backend_memory::MemoryDisplay;
    use retrofb_common::rgb565_to_xrgb8888;
    use retrofb_osd::{BitmapFont, OsdState};
    use web_time::Duration;

    const RED565: u16 = 0xF800;
    const GREEN565: u16 = 0x07E0;

    fn driver() -> VideoDriver<MemoryDisplay> {
        driver_with(VideoConfig::default())
    }

    fn driver_with(config: VideoConfig) -> VideoDriver<MemoryDisplay> {
        VideoDriver::new(MemoryDisplay::new(640, 480), config, Box::new(BitmapFont::placeholder())).unwrap()
    }

    fn solid(w: u32, h: u32, color: u16) -> Vec<u16> {
        vec![color; (w * h) as usize]
    }

    fn frame_of(data: &[u16], w: u32, h: u32) -> SourceFrame<'_> {
        SourceFrame::new(PixelData::Rgb565(data), w, h, w * 2)
    }

    fn present(drv: &mut VideoDriver<MemoryDisplay>, frame: &SourceFrame, msg: Option<&str>) -> FrameOutcome {
        drv.frame(Some(frame), msg, FrameFlags::default(), Instant::now())
            .unwrap()
    }

    fn shown(drv: &VideoDriver<MemoryDisplay>, x: u32, y: u32) -> Option<u32> {
        let d = drv.device();
        d.pixel(d.displayed_page(), x, y)
    }

    #[test]
    fn test_unavailable_device() {
        let res = VideoDriver::new(
            MemoryDisplay::unavailable(),
            VideoConfig::default(),
            Box::new(BitmapFont::placeholder()),
        );
        assert!(matches!(res, Err(VideoDriverError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_composite_fullscreen() {
        let mut drv = driver();
        let data = solid(320, 240, RED565);
        assert_eq!(present(&mut drv, &frame_of(&data, 320, 240), None), FrameOutcome::Composited);

        let g = drv.geometry();
        assert_eq!(g.content, VideoDimensions::new(320, 240));
        assert_eq!(g.video, Rect::new(0, 0, 640, 480));
        assert_eq!(shown(&drv, 0, 0), Some(rgb565_to_xrgb8888(RED565)));
        assert_eq!(shown(&drv, 639, 479), Some(rgb565_to_xrgb8888(RED565)));
    }

    #[test]
    fn test_integer_scale_margins() {
        let mut config = VideoConfig::default();
        config.policy.scale_integer = true;
        let mut drv = driver_with(config);
        drv.device_mut().fill_all(0xFFFF_FFFF);

        let data = solid(256, 224, GREEN565);
        present(&mut drv, &frame_of(&data, 256, 224), None);
        assert_eq!(drv.geometry().video, Rect::new(64, 16, 512, 448));

        // Margins are cleared on every page, not only the one displayed.
        for page in 0..3 {
            assert_eq!(drv.device().pixel(page, 10, 240), Some(0));
            assert_eq!(drv.device().pixel(page, 320, 5), Some(0));
        }
        assert_eq!(shown(&drv, 320, 240), Some(rgb565_to_xrgb8888(GREEN565)));
        assert_eq!(drv.compositor().stats().margin_clears, 1);

        present(&mut drv, &frame_of(&data, 256, 224), None);
        assert_eq!(drv.compositor().stats().margin_clears, 1);
    }

    #[test]
    fn test_null_frame_and_pause() {
        let mut drv = driver();
        let now = Instant::now();
        assert_eq!(
            drv.frame(None, None, FrameFlags::default(), now).unwrap(),
            FrameOutcome::NoFrame
        );

        let data = solid(320, 240, RED565);
        let frame = frame_of(&data, 320, 240);
        let paused = FrameFlags {
            paused: true,
            fast_forward: false,
        };
        assert_eq!(drv.frame(Some(&frame), None, paused, now).unwrap(), FrameOutcome::Paused);
        assert_eq!(drv.device().stats().flips, 0);
    }

    #[test]
    fn test_fast_forward_drops() {
        let mut drv = driver();
        drv.set_nonblock_state(true);
        assert!(!drv.vsync());
        assert!(!drv.device().flip_blocking());

        let data = solid(320, 240, RED565);
        let frame = frame_of(&data, 320, 240);
        let ff = FrameFlags {
            paused: false,
            fast_forward: true,
        };
        let start = Instant::now();
        let mut outcomes = Vec::new();
        for i in 0..10u64 {
            let t = start + Duration::from_millis(4 * i);
            outcomes.push(drv.frame(Some(&frame), None, ff, t).unwrap());
        }
        let composited = outcomes.iter().filter(|o| **o == FrameOutcome::Composited).count();
        assert!(composited >= 1 && composited < 10);
        assert_eq!(drv.device().stats().flips, composited as u64);
    }

    #[test]
    fn test_osd_after_composite() {
        let mut drv = driver();
        let data = solid(320, 240, 0);
        let frame = frame_of(&data, 320, 240);

        present(&mut drv, &frame, Some("8"));
        assert_eq!(drv.osd().state(), OsdState::Showing);
        let lit = drv
            .device()
            .page(drv.device().displayed_page())
            .unwrap()
            .iter()
            .filter(|p| **p != 0)
            .count();
        assert!(lit > 0);

        // Clearing runs once per buffered page, then stops.
        for _ in 0..3 {
            present(&mut drv, &frame, None);
        }
        assert_eq!(drv.osd().state(), OsdState::Idle);
        assert_eq!(drv.osd().stats().clear_passes, 3);
    }

    #[test]
    fn test_osd_disabled() {
        let mut config = VideoConfig::default();
        config.osd_enabled = false;
        let mut drv = driver_with(config);
        let data = solid(320, 240, 0);
        present(&mut drv, &frame_of(&data, 320, 240), Some("8"));
        assert_eq!(drv.osd().state(), OsdState::Idle);
    }

    #[test]
    fn test_malformed_frame_rejected() {
        let mut drv = driver();
        let data = solid(320, 240, RED565);
        present(&mut drv, &frame_of(&data, 320, 240), None);
        let before = *drv.geometry();

        // Header claims far more pixels than the buffer holds.
        let bogus = SourceFrame::new(PixelData::Rgb565(&data), 163300, 122880, 163300 * 2);
        assert_eq!(present(&mut drv, &bogus, None), FrameOutcome::NoFrame);
        assert_eq!(*drv.geometry(), before);
        assert_eq!(drv.device().stats().flips, 1);
    }

    #[test]
    fn test_menu() {
        let mut drv = driver();
        let texture = solid(MENU_WIDTH, MENU_HEIGHT, GREEN565);
        assert!(drv.set_menu_texture(&frame_of(&texture, MENU_WIDTH, MENU_HEIGHT)));

        let wrong = solid(100, 100, RED565);
        assert!(!drv.set_menu_texture(&frame_of(&wrong, 100, 100)));

        drv.set_menu_active(true);
        let outcome = drv
            .frame(None, None, FrameFlags::default(), Instant::now())
            .unwrap();
        assert_eq!(outcome, FrameOutcome::MenuComposited);
        // 640x480 shows the menu at 2x without stretching, which fills the screen anyway.
        assert_eq!(shown(&drv, 0, 0), Some(rgb565_to_xrgb8888(GREEN565)));
        assert_eq!(shown(&drv, 639, 479), Some(rgb565_to_xrgb8888(GREEN565)));

        // Leaving the menu clears margins around smaller content.
        drv.set_menu_active(false);
        let data = solid(256, 224, RED565);
        drv.apply_state_changes(true, true);
        let clears = drv.compositor().stats().margin_clears;
        present(&mut drv, &frame_of(&data, 256, 224), None);
        assert_eq!(drv.compositor().stats().margin_clears, clears + 1);
        for page in 0..3 {
            assert_eq!(drv.device().pixel(page, 5, 240), Some(0));
        }
    }

    #[test]
    fn test_menu_centered_on_large_screen() {
        let mut config = VideoConfig::default();
        config.menu_stretch = false;
        let mut drv =
            VideoDriver::new(MemoryDisplay::new(752, 560), config, Box::new(BitmapFont::placeholder())).unwrap();
        let texture = solid(MENU_WIDTH, MENU_HEIGHT, GREEN565);
        drv.set_menu_texture(&frame_of(&texture, MENU_WIDTH, MENU_HEIGHT));
        drv.set_menu_active(true);
        drv.frame(None, None, FrameFlags::default(), Instant::now()).unwrap();

        // 640x480 centered: 56 pixel side margins, 40 pixel top and bottom.
        assert_eq!(shown(&drv, 10, 10), Some(0));
        assert_eq!(shown(&drv, 56, 40), Some(rgb565_to_xrgb8888(GREEN565)));
        assert_eq!(shown(&drv, 695, 519), Some(rgb565_to_xrgb8888(GREEN565)));
        assert_eq!(shown(&drv, 696, 519), Some(0));
    }

    #[test]
    fn test_allocation_failure_keeps_geometry() {
        let mut drv = driver();
        let wide = solid(5000, 100, RED565);
        present(&mut drv, &frame_of(&wide, 5000, 100), None);
        let before = *drv.geometry();
        assert_eq!(before.content, VideoDimensions::new(5000, 100));

        // Bilinear needs a 5000 pixel wide working surface, which cannot be allocated.
        drv.set_filter(ScalerFilter::Bilinear);
        assert_eq!(*drv.geometry(), before);
        assert_eq!(drv.geometry().policy.filter, ScalerFilter::Nearest);

        // Rendering continues at the old geometry.
        assert_eq!(present(&mut drv, &frame_of(&wide, 5000, 100), None), FrameOutcome::Composited);
    }

    #[test]
    fn test_settings_recompute() {
        let mut drv = driver();
        let data = solid(320, 240, RED565);
        present(&mut drv, &frame_of(&data, 320, 240), None);

        drv.set_filter(ScalerFilter::Bilinear);
        assert_eq!(drv.scaler().name(), "replicate2x2");
        assert!(drv.geometry().factor.is_some());

        drv.set_rotation(90);
        assert_eq!(drv.geometry().rotation, Rotation::Deg90);
        assert_eq!(drv.geometry().video, Rect::new(140, 0, 360, 480));
        drv.set_rotation(0);
        assert_eq!(drv.geometry().rotation, Rotation::Deg180);

        drv.set_overlay_opacity(0.5);
        assert_eq!(drv.device().overlay_alpha(), 127);
        drv.set_osd_color([1.0, 0.0, 0.0]);
        assert_eq!(drv.geometry().content, VideoDimensions::new(320, 240));
    }

    #[test]
    fn test_driver_surface() {
        let mut drv = driver();
        assert!(drv.alive());
        assert!(drv.focus());
        assert!(!drv.has_windowed());
        assert_eq!(drv.refresh_rate(), 60.0);

        let data = solid(256, 224, RED565);
        present(&mut drv, &frame_of(&data, 256, 224), None);
        let vp = drv.viewport();
        assert_eq!((vp.x, vp.y, vp.width, vp.height), (0, 0, 256, 224));

        drv.request_quit();
        assert!(!drv.alive());

        let display = drv.shutdown().unwrap();
        assert!(!display.is_busy());
    }
}
