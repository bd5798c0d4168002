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

    retrofb_osd::layout.rs

    Placement of OSD text on the physical framebuffer.

    Coordinates are framebuffer memory coordinates of an inverted panel, so the text
    block grows leftward from the right edge of memory and upward in memory from the
    bottom margin. Glyphs are drawn at 2x scale.
*/

use retrofb_common::VideoDimensions;

use crate::font::{FONT_HEIGHT_STRIDE, FONT_WIDTH_STRIDE};

pub const GLYPH_SCALE: u32 = 2;
pub const MENU_WIDTH: u32 = 320;
pub const OSD_TEXT_Y_MARGIN: u32 = 4;
pub const OSD_TEXT_LINES_MAX: u32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OsdLayout {
    pub screen: VideoDimensions,
    pub menu_width: u32,
    pub max_lines: u32,
    pub y_margin: u32,
}

impl OsdLayout {
    pub fn new(screen: VideoDimensions) -> Self {
        Self {
            screen,
            menu_width: MENU_WIDTH,
            max_lines: OSD_TEXT_LINES_MAX,
            y_margin: OSD_TEXT_Y_MARGIN,
        }
    }

    /// Characters per line.
    pub fn line_length(&self) -> u32 {
        (self.menu_width / FONT_WIDTH_STRIDE).saturating_sub(1).max(1)
    }

    /// Longest message, in characters.
    pub fn max_len(&self) -> u32 {
        self.line_length() * self.max_lines
    }

    /// Horizontal advance per glyph.
    pub fn x_advance(&self) -> i64 {
        (FONT_WIDTH_STRIDE * GLYPH_SCALE) as i64
    }

    /// Vertical advance per line.
    pub fn y_advance(&self) -> i64 {
        (FONT_HEIGHT_STRIDE * GLYPH_SCALE) as i64
    }

    /// X position of the first glyph on each line.
    pub fn line_start_x(&self) -> i64 {
        self.screen.w as i64 - self.x_advance()
    }

    /// Y position of the first line of a message with `lines` lines.
    pub fn first_line_y(&self, lines: u32) -> i64 {
        self.y_margin as i64 - 4 + self.y_advance() * lines as i64
    }

    /// Rows a message of `lines` lines can touch with glyph pixels: (first row, row count).
    pub fn text_rows(&self, lines: u32) -> (u32, u32) {
        let top = self.y_margin + 2;
        let height = (FONT_HEIGHT_STRIDE * GLYPH_SCALE * lines).saturating_sub(2);
        (top, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = OsdLayout::new(VideoDimensions::new(640, 480));
        assert_eq!(layout.line_length(), 52);
        assert_eq!(layout.max_len(), 156);
        assert_eq!(layout.line_start_x(), 628);
        assert_eq!(layout.first_line_y(1), 22);
        assert_eq!(layout.first_line_y(3), 66);
        assert_eq!(layout.text_rows(1), (6, 20));
    }
}
