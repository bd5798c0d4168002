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

    retrofb_osd::renderer.rs

    The OSD renderer. Text is drawn onto a framebuffer page each time that page is
    flipped to the display. Every page keeps its own damage record; before drawing, the
    previous text on that page is erased outside the video rectangle.

    When the message goes away the renderer enters Clearing and performs one clear pass
    per flip until every buffered page has been visited, then returns to Idle.
*/

use display_backend_trait::DisplayDevice;
use retrofb_common::{Rect, VideoDimensions};

use crate::{
    font::{FONT_HEIGHT, FONT_WIDTH},
    layout::GLYPH_SCALE,
    DamageRegion,
    GlyphTable,
    OsdLayout,
    OsdMessage,
};

/// Side of the square written per lit glyph pixel: the 2x pixel plus its shadow.
const BLOCK: u32 = GLYPH_SCALE * 2;

const LIGATURE_OE_SMALL: u32 = 339;
const LIGATURE_OE_CAPITAL: u32 = 338;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OsdState {
    Idle,
    Showing,
    Clearing { remaining: usize },
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OsdStats {
    pub draw_passes: u64,
    pub clear_passes: u64,
    pub glyphs_skipped: u64,
}

pub struct OsdRenderer {
    layout: OsdLayout,
    font: Box<dyn GlyphTable>,
    color: u32,
    state: OsdState,
    message: Option<OsdMessage>,
    damage: Vec<Option<DamageRegion>>,
    video_rect: Rect,
    stats: OsdStats,
}

/// Map the two legacy ligatures onto their extended ASCII equivalents.
fn remap(code: u32) -> u32 {
    match code {
        LIGATURE_OE_SMALL => 156,
        LIGATURE_OE_CAPITAL => 140,
        c => c,
    }
}

impl OsdRenderer {
    pub fn new(screen: VideoDimensions, page_count: usize, font: Box<dyn GlyphTable>, color: u32) -> Self {
        Self {
            layout: OsdLayout::new(screen),
            font,
            color,
            state: OsdState::Idle,
            message: None,
            damage: vec![None; page_count.max(1)],
            video_rect: Rect::default(),
            stats: Default::default(),
        }
    }

    pub fn layout(&self) -> &OsdLayout {
        &self.layout
    }

    pub fn state(&self) -> OsdState {
        self.state
    }

    pub fn stats(&self) -> OsdStats {
        self.stats
    }

    pub fn message(&self) -> Option<&OsdMessage> {
        self.message.as_ref()
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    /// Set the video rectangle in memory coordinates. Erasing never touches it, since the next
    /// composite repaints it anyway.
    pub fn set_video_rect(&mut self, rect: Rect) {
        self.video_rect = rect;
    }

    /// Latch the message for the coming frame. An empty or missing message starts clearing.
    pub fn set_message(&mut self, text: Option<&str>) {
        let message = text.filter(|t| !t.is_empty()).map(|t| OsdMessage::new(t, &self.layout));

        match (&message, self.state) {
            (Some(_), _) => self.state = OsdState::Showing,
            (None, OsdState::Showing) => {
                self.state = OsdState::Clearing {
                    remaining: self.damage.len(),
                };
            }
            (None, _) => {}
        }
        self.message = message;
    }

    /// Handle a completed flip of `page`.
    pub fn on_flip<D: DisplayDevice + ?Sized>(&mut self, device: &mut D, page: usize) {
        if self.state == OsdState::Idle {
            return;
        }
        if page >= self.damage.len() {
            log::warn!("OsdRenderer::on_flip(): page {} out of range", page);
            return;
        }
        let stride = device.page_stride();
        let Some(buf) = device.page_mut(page)
        else {
            log::warn!("OsdRenderer::on_flip(): device has no page {}", page);
            return;
        };

        match self.state {
            OsdState::Showing => {
                if self.damage[page].is_some() {
                    self.clear_page(buf, stride, page);
                }
                self.draw(buf, stride, page);
            }
            OsdState::Clearing { remaining } => {
                self.clear_page(buf, stride, page);
                self.state = match remaining.saturating_sub(1) {
                    0 => OsdState::Idle,
                    n => OsdState::Clearing { remaining: n },
                };
            }
            OsdState::Idle => {}
        }
    }

    fn clear_page(&mut self, buf: &mut [u32], stride: usize, page: usize) {
        if let Some(damage) = self.damage[page].take() {
            damage.erase(buf, stride, self.video_rect);
        }
        self.stats.clear_passes += 1;
    }

    fn draw(&mut self, buf: &mut [u32], stride: usize, page: usize) {
        let Some(message) = &self.message
        else {
            return;
        };

        let screen = self.layout.screen;
        let mut damage = DamageRegion::new(message.line_count());
        let mut y_pos = self.layout.first_line_y(message.line_count());

        for line in message.lines() {
            let mut x_pos = self.layout.line_start_x();
            for c in line.chars() {
                if c != ' ' {
                    let code = remap(c as u32);
                    match self.font.glyph(code).filter(|_| code < self.font.glyph_count()) {
                        Some(mask) => {
                            for j in 0..FONT_HEIGHT {
                                for i in 0..FONT_WIDTH {
                                    if mask[(j * FONT_WIDTH + i) as usize] {
                                        let x = x_pos - (i * GLYPH_SCALE) as i64;
                                        let y = y_pos - (j * GLYPH_SCALE) as i64;
                                        if let Some(r) = put_block(buf, stride, screen, x, y, self.color) {
                                            damage.include(r);
                                        }
                                    }
                                }
                            }
                        }
                        // Skipped glyphs keep their cell so the rest of the line stays put.
                        None => self.stats.glyphs_skipped += 1,
                    }
                }
                x_pos -= self.layout.x_advance();
            }
            y_pos -= self.layout.y_advance();
        }

        self.damage[page] = Some(damage);
        self.stats.draw_passes += 1;
    }
}

/// Write one lit glyph pixel at 2x with a shadow below and to the right, as seen on an
/// inverted panel. Blocks not entirely on screen are skipped. Returns the rectangle written.
fn put_block(buf: &mut [u32], stride: usize, screen: VideoDimensions, x: i64, y: i64, color: u32) -> Option<Rect> {
    if x < 0 || y < 0 || x + BLOCK as i64 > screen.w as i64 || y + BLOCK as i64 > screen.h as i64 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    let rows: [[u32; 4]; 4] = [[0, 0, 0, 0], [0, 0, 0, 0], [0, 0, color, color], [0, 0, color, color]];

    for (dy, row) in rows.iter().enumerate() {
        let start = (y + dy) * stride + x;
        buf.get_mut(start..start + BLOCK as usize)?.copy_from_slice(row);
    }
    Some(Rect::new(x as u32, y as u32, BLOCK, BLOCK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{font::NUM_GLYPHS, BitmapFont, GlyphMask};
    use display_backend_memory::MemoryDisplay;

    const COLOR: u32 = 0x00FF_FF00;

    /// Every glyph fully lit.
    struct SolidFont;

    impl GlyphTable for SolidFont {
        fn glyph_count(&self) -> u32 {
            NUM_GLYPHS
        }
        fn glyph(&self, code: u32) -> Option<&GlyphMask> {
            const SOLID: GlyphMask = [true; (FONT_WIDTH * FONT_HEIGHT) as usize];
            (code < NUM_GLYPHS).then_some(&SOLID)
        }
    }

    fn renderer(display: &MemoryDisplay) -> OsdRenderer {
        OsdRenderer::new(VideoDimensions::new(640, 480), display.page_count(), Box::new(SolidFont), COLOR)
    }

    fn lit(display: &MemoryDisplay, page: usize) -> usize {
        display.page(page).unwrap().iter().filter(|p| **p == COLOR).count()
    }

    #[test]
    fn test_draw_single_glyph() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        osd.set_message(Some("A"));
        osd.on_flip(&mut display, 0);

        // 50 lit pixels, 2x2 each.
        assert_eq!(lit(&display, 0), 200);
        // First glyph pixel block lands at (628, 22); its lit part at (630..632, 24..26).
        assert_eq!(display.pixel(0, 630, 24), Some(COLOR));
        assert_eq!(display.pixel(0, 631, 25), Some(COLOR));
        assert_eq!(osd.stats().draw_passes, 1);
        assert_eq!(lit(&display, 1), 0);
    }

    #[test]
    fn test_spaces_and_out_of_range_advance() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        osd.set_message(Some(" \u{4e00}A"));
        osd.on_flip(&mut display, 0);
        assert_eq!(lit(&display, 0), 200);
        assert_eq!(osd.stats().glyphs_skipped, 1);
        // Third cell: 628 - 24 = 604.
        assert_eq!(display.pixel(0, 606, 24), Some(COLOR));
        assert_eq!(display.pixel(0, 630, 24), Some(0));
    }

    #[test]
    fn test_ligature_remap() {
        assert_eq!(remap(339), 156);
        assert_eq!(remap(338), 140);
        assert_eq!(remap(65), 65);

        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        osd.set_message(Some("œ"));
        osd.on_flip(&mut display, 0);
        assert_eq!(lit(&display, 0), 200);
        assert_eq!(osd.stats().glyphs_skipped, 0);
    }

    #[test]
    fn test_lines_stack() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        let text = "x".repeat(osd.layout().line_length() as usize + 1);
        osd.set_message(Some(&text));
        osd.on_flip(&mut display, 0);
        // Two lines: first line starts at y 44, second at y 22.
        assert_eq!(display.pixel(0, 630, 46), Some(COLOR));
        assert_eq!(display.pixel(0, 630, 24), Some(COLOR));
        assert_eq!(display.pixel(0, 606, 24), Some(0));
    }

    #[test]
    fn test_clear_pass_count() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        let pages = display.page_count();

        for frame in 0..5 {
            osd.set_message(Some("HELLO"));
            osd.on_flip(&mut display, frame % pages);
        }
        assert!((0..pages).all(|p| lit(&display, p) > 0));
        let before = osd.stats().clear_passes;

        for frame in 5..5 + pages + 4 {
            osd.set_message(None);
            osd.on_flip(&mut display, frame % pages);
        }
        assert_eq!(osd.stats().clear_passes - before, pages as u64);
        assert_eq!(osd.state(), OsdState::Idle);
        assert!((0..pages).all(|p| lit(&display, p) == 0));
    }

    #[test]
    fn test_redraw_clears_only_previous_damage() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        display.fill_all(0x55);

        osd.set_message(Some("HELLOWORLD"));
        osd.on_flip(&mut display, 0);
        assert_eq!(lit(&display, 0), 10 * 200);

        osd.set_message(Some("A"));
        osd.on_flip(&mut display, 0);
        assert_eq!(lit(&display, 0), 200);
        assert_eq!(osd.stats().clear_passes, 1);

        // Second cell of the old text is erased; the first now holds the new glyph.
        assert_eq!(display.pixel(0, 606, 24), Some(0));
        assert_eq!(display.pixel(0, 630, 24), Some(COLOR));
        // Pixels outside the old damage rectangle are untouched.
        assert_eq!(display.pixel(0, 300, 300), Some(0x55));
        assert_eq!(display.pixel(0, 10, 24), Some(0x55));
        // Other pages were never drawn on.
        assert_eq!(display.pixel(1, 606, 24), Some(0x55));
    }

    #[test]
    fn test_clear_respects_video_rect() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = renderer(&display);
        // Video covers the whole bottom strip where text lands.
        osd.set_video_rect(Rect::new(0, 0, 640, 240));
        osd.set_message(Some("A"));
        osd.on_flip(&mut display, 0);
        osd.set_message(None);
        osd.on_flip(&mut display, 0);
        assert_eq!(lit(&display, 0), 200);
    }

    #[test]
    fn test_idle_costs_nothing() {
        let mut display = MemoryDisplay::new(640, 480);
        let mut osd = OsdRenderer::new(
            VideoDimensions::new(640, 480),
            3,
            Box::new(BitmapFont::placeholder()),
            COLOR,
        );
        osd.set_message(None);
        osd.on_flip(&mut display, 0);
        assert_eq!(osd.stats(), OsdStats::default());
        osd.set_message(Some(""));
        assert_eq!(osd.state(), OsdState::Idle);
    }

    #[test]
    fn test_small_screen_clips() {
        let mut display = MemoryDisplay::new(64, 48);
        let mut osd = OsdRenderer::new(VideoDimensions::new(64, 48), 3, Box::new(SolidFont), COLOR);
        osd.set_message(Some(&"W".repeat(40)));
        osd.on_flip(&mut display, 0);
        assert!(lit(&display, 0) > 0);
    }
}
