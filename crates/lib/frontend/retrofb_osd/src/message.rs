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

    retrofb_osd::message.rs

    OSD message wrapping.
*/

use crate::OsdLayout;

/// OSD text truncated to the layout's maximum length and wrapped into fixed width lines.
/// Lengths are counted in characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OsdMessage {
    text: String,
    lines: Vec<String>,
}

impl OsdMessage {
    pub fn new(text: &str, layout: &OsdLayout) -> Self {
        let max_len = layout.max_len() as usize;
        let line_length = layout.line_length() as usize;

        let text: String = text.chars().take(max_len).collect();
        let chars: Vec<char> = text.chars().collect();
        let lines = chars.chunks(line_length).map(|c| c.iter().collect()).collect();

        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrofb_common::VideoDimensions;

    fn layout() -> OsdLayout {
        OsdLayout::new(VideoDimensions::new(640, 480))
    }

    #[test]
    fn test_wrap_counts() {
        let layout = layout();
        let len = layout.line_length() as usize;
        for l in 1..=layout.max_len() as usize {
            let msg = OsdMessage::new(&"x".repeat(l), &layout);
            assert_eq!(msg.line_count() as usize, l.div_ceil(len), "length {}", l);
        }
        assert_eq!(OsdMessage::new(&"y".repeat(len), &layout).line_count(), 1);
        assert_eq!(OsdMessage::new(&"y".repeat(len + 1), &layout).line_count(), 2);
    }

    #[test]
    fn test_truncation() {
        let layout = layout();
        let msg = OsdMessage::new(&"z".repeat(500), &layout);
        assert_eq!(msg.text().chars().count(), 156);
        assert_eq!(msg.line_count(), 3);
    }

    #[test]
    fn test_multibyte() {
        let layout = layout();
        let text = "œ".repeat(53);
        let msg = OsdMessage::new(&text, &layout);
        assert_eq!(msg.line_count(), 2);
        assert_eq!(msg.lines()[1], "œ");
        assert!(OsdMessage::new("", &layout).is_empty());
    }
}
