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

    retrofb_display_common::display_scaler.rs

    Scaler filter kinds, prescale factors and the display policy that drives geometry
    resolution.
*/

use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Filter applied by the hardware stretch. Anything other than Nearest gets a software
/// prescale first so the hardware filter has enough pixels to work with.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ScalerFilter {
    #[default]
    Nearest,
    Bilinear,
    Bicubic,
}

/// Horizontal replication multiplier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter)]
pub enum XMul {
    X1,
    X2,
    X4,
}

/// Vertical replication multiplier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, EnumIter)]
pub enum YMul {
    Y1,
    Y2,
    Y3,
    Y4,
}

impl XMul {
    pub const fn factor(&self) -> u32 {
        match self {
            XMul::X1 => 1,
            XMul::X2 => 2,
            XMul::X4 => 4,
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            XMul::X1 => 0,
            XMul::X2 => 1,
            XMul::X4 => 2,
        }
    }

    /// Multiplier for a computed factor. 3 is promoted to 4, as is anything above 4.
    pub fn from_factor(factor: u32) -> Self {
        match factor {
            0 | 1 => XMul::X1,
            2 => XMul::X2,
            _ => XMul::X4,
        }
    }
}

impl YMul {
    pub const fn factor(&self) -> u32 {
        match self {
            YMul::Y1 => 1,
            YMul::Y2 => 2,
            YMul::Y3 => 3,
            YMul::Y4 => 4,
        }
    }

    pub const fn index(&self) -> usize {
        self.factor() as usize - 1
    }

    /// Multiplier for a computed factor, clamped to 1..=4.
    pub fn from_factor(factor: u32) -> Self {
        match factor {
            0 | 1 => YMul::Y1,
            2 => YMul::Y2,
            3 => YMul::Y3,
            _ => YMul::Y4,
        }
    }
}

/// An integer prescale factor selecting one of the replication scalers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScaleFactor {
    pub x: XMul,
    pub y: YMul,
}

impl ScaleFactor {
    pub const fn new(x: XMul, y: YMul) -> Self {
        Self { x, y }
    }

    pub fn from_factors(x: u32, y: u32) -> Self {
        Self {
            x: XMul::from_factor(x),
            y: YMul::from_factor(y),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DisplayPolicy {
    pub keep_aspect: bool,
    pub scale_integer: bool,
    pub filter: ScalerFilter,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            keep_aspect: true,
            scale_integer: false,
            filter: ScalerFilter::Nearest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_factor_promotion() {
        assert_eq!(XMul::from_factor(3), XMul::X4);
        assert_eq!(XMul::from_factor(9), XMul::X4);
        assert_eq!(YMul::from_factor(3), YMul::Y3);
        assert_eq!(YMul::from_factor(7), YMul::Y4);
        assert_eq!(ScaleFactor::from_factors(0, 0), ScaleFactor::new(XMul::X1, YMul::Y1));
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(ScalerFilter::iter().count(), 3);
        assert_eq!(ScalerFilter::from_str("bicubic").unwrap(), ScalerFilter::Bicubic);
        assert_eq!(ScalerFilter::Bilinear.to_string(), "Bilinear");
    }
}
