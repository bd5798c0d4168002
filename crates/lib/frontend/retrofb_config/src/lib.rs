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

    retrofb_config::lib.rs

    Configuration file support for RetroFB.
*/

//! The `retrofb_config` crate parses RetroFB's configuration file and overlays command line
//! arguments on top of it. Command line arguments always take priority over the file.
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! Features:
//! - `use_bpaf`: Enable BPAF support for command line argument parsing.

mod args;

use std::path::{Path, PathBuf};

use cfg_if::cfg_if;
use retrofb_common::xrgb8888;
use retrofb_display_common::{DisplayPolicy, ScalerFilter};
use serde_derive::Deserialize;
use web_time::Duration;

pub use args::CmdLineArgs;
#[cfg(feature = "use_bpaf")]
pub use args::cli_args;

pub const DEFAULT_FF_FRAME_TIME_MIN_US: u64 = 16667;
pub const DEFAULT_HISTORY_LEN: usize = 60;

const fn _default_true() -> bool {
    true
}
const fn _default_ff_frame_time_min() -> u64 {
    DEFAULT_FF_FRAME_TIME_MIN_US
}
const fn _default_history_len() -> usize {
    DEFAULT_HISTORY_LEN
}
const fn _default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
const fn _default_opacity() -> f32 {
    1.0
}
const fn _default_frames() -> u32 {
    300
}
const fn _default_content_width() -> u32 {
    320
}
const fn _default_content_height() -> u32 {
    240
}

#[derive(Debug, Deserialize)]
pub struct Video {
    #[serde(default = "_default_true")]
    pub keep_aspect: bool,
    #[serde(default)]
    pub scale_integer: bool,
    #[serde(default)]
    pub filter: ScalerFilter,
    /// Requested rotation in degrees.
    #[serde(default)]
    pub rotation: u32,
    #[serde(default = "_default_true")]
    pub menu_stretch: bool,
    #[serde(default = "_default_true")]
    pub vsync: bool,
}

#[derive(Debug, Deserialize)]
pub struct Osd {
    #[serde(default = "_default_true")]
    pub enabled: bool,
    /// Red, green and blue in 0.0..=1.0
    #[serde(default = "_default_color")]
    pub color: [f32; 3],
}

#[derive(Debug, Deserialize)]
pub struct Overlay {
    #[serde(default = "_default_opacity")]
    pub opacity: f32,
}

#[derive(Debug, Deserialize)]
pub struct Timing {
    #[serde(default = "_default_ff_frame_time_min")]
    pub ff_frame_time_min_us: u64,
    #[serde(default = "_default_history_len")]
    pub history_len: usize,
}

#[derive(Debug, Deserialize)]
pub struct Runner {
    #[serde(default = "_default_frames")]
    pub frames: u32,
    #[serde(default = "_default_content_width")]
    pub content_width: u32,
    #[serde(default = "_default_content_height")]
    pub content_height: u32,
    #[serde(default)]
    pub fast_forward: bool,
    pub screenshot: Option<PathBuf>,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            keep_aspect: true,
            scale_integer: false,
            filter: ScalerFilter::default(),
            rotation: 0,
            menu_stretch: true,
            vsync: true,
        }
    }
}

impl Default for Osd {
    fn default() -> Self {
        Self {
            enabled: true,
            color: _default_color(),
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            opacity: _default_opacity(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            ff_frame_time_min_us: _default_ff_frame_time_min(),
            history_len: _default_history_len(),
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            frames: _default_frames(),
            content_width: _default_content_width(),
            content_height: _default_content_height(),
            fast_forward: false,
            screenshot: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFileParams {
    #[serde(default)]
    pub video: Video,
    #[serde(default)]
    pub osd: Osd,
    #[serde(default)]
    pub overlay: Overlay,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub runner: Runner,
}

impl ConfigFileParams {
    pub fn overlay(&mut self, shell_args: CmdLineArgs) {
        if let Some(frames) = shell_args.frames {
            self.runner.frames = frames;
        }
        if let Some(w) = shell_args.content_width {
            self.runner.content_width = w;
        }
        if let Some(h) = shell_args.content_height {
            self.runner.content_height = h;
        }
        if let Some(filter) = shell_args.filter {
            self.video.filter = filter;
        }
        if let Some(rotation) = shell_args.rotation {
            self.video.rotation = rotation;
        }
        if let Some(screenshot) = shell_args.screenshot {
            self.runner.screenshot = Some(screenshot);
        }

        self.video.scale_integer |= shell_args.integer;
        self.video.keep_aspect &= !shell_args.no_aspect;
        self.runner.fast_forward |= shell_args.fast_forward;
    }

    pub fn video_config(&self) -> VideoConfig {
        VideoConfig::from(self)
    }
}

/// Convert a floating point colour channel to 8 bits, rounding to nearest.
pub fn color_channel(c: f32) -> u32 {
    ((c * 255.0) + 0.5) as u32 & 0xFF
}

/// Convert floating point RGB to an XRGB8888 pixel.
pub fn color_to_xrgb8888(rgb: [f32; 3]) -> u32 {
    xrgb8888(
        color_channel(rgb[0]) as u8,
        color_channel(rgb[1]) as u8,
        color_channel(rgb[2]) as u8,
    )
}

/// The settings the video driver consumes, resolved from the configuration file.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VideoConfig {
    pub policy: DisplayPolicy,
    pub rotation: u32,
    pub menu_stretch: bool,
    pub vsync: bool,
    pub osd_enabled: bool,
    pub osd_color: u32,
    pub overlay_opacity: f32,
    pub ff_frame_time_min: Duration,
    pub history_len: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig::from(&ConfigFileParams::default())
    }
}

impl From<&ConfigFileParams> for VideoConfig {
    fn from(params: &ConfigFileParams) -> Self {
        Self {
            policy: DisplayPolicy {
                keep_aspect: params.video.keep_aspect,
                scale_integer: params.video.scale_integer,
                filter: params.video.filter,
            },
            rotation: params.video.rotation,
            menu_stretch: params.video.menu_stretch,
            vsync: params.video.vsync,
            osd_enabled: params.osd.enabled,
            osd_color: color_to_xrgb8888(params.osd.color),
            overlay_opacity: params.overlay.opacity.clamp(0.0, 1.0),
            ff_frame_time_min: Duration::from_micros(params.timing.ff_frame_time_min_us),
            history_len: params.timing.history_len.max(1),
        }
    }
}

pub fn read_config(toml_string: impl AsRef<str>, shell_args: CmdLineArgs) -> Result<ConfigFileParams, anyhow::Error> {
    let mut toml_args: ConfigFileParams = toml::from_str(toml_string.as_ref())?;

    // Command line arguments override config file arguments
    toml_args.overlay(shell_args);

    Ok(toml_args)
}

cfg_if! {
    if #[cfg(feature = "use_bpaf")] {
        fn shell_args() -> CmdLineArgs {
            log::debug!("Reading command line arguments...");
            cli_args().run()
        }
    } else {
        fn shell_args() -> CmdLineArgs {
            log::debug!("Argument reading disabled...");
            CmdLineArgs::default()
        }
    }
}

/// Read the TOML configuration from a file path, parse and overlay command line arguments.
/// A missing default file is not an error; the built-in defaults are used instead.
pub fn read_config_file<P>(default_path: P) -> Result<ConfigFileParams, anyhow::Error>
where
    P: AsRef<Path>,
{
    let shell_args = shell_args();

    // Allow configuration file path to be overridden by command line argument 'config_file'
    let toml_string = if let Some(configfile_path) = shell_args.config_file.as_ref() {
        std::fs::read_to_string(configfile_path)?
    }
    else if default_path.as_ref().exists() {
        std::fs::read_to_string(default_path)?
    }
    else {
        log::warn!(
            "Config file {} not found, using defaults",
            default_path.as_ref().display()
        );
        String::new()
    };

    read_config(toml_string, shell_args)
}

/// Read the TOML configuration from a string, parse and overlay command line arguments.
pub fn read_config_string(toml_string: impl AsRef<str>) -> Result<ConfigFileParams, anyhow::Error> {
    read_config(toml_string, shell_args())
}
