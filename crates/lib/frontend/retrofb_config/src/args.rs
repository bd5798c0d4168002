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

    retrofb_config::args.rs

    Command line arguments. With the use_bpaf feature these are parsed from the shell;
    without it the defaults are used.
*/

use std::path::PathBuf;

use retrofb_display_common::ScalerFilter;

#[cfg(feature = "use_bpaf")]
use bpaf::Bpaf;

#[cfg_attr(feature = "use_bpaf", derive(Bpaf))]
#[cfg_attr(feature = "use_bpaf", bpaf(options, version, generate(cli_args)))]
#[derive(Debug, Default)]
pub struct CmdLineArgs {
    #[cfg_attr(feature = "use_bpaf", bpaf(long("config_file"), long("configfile")))]
    pub config_file: Option<PathBuf>,

    /// Number of frames to render
    #[cfg_attr(feature = "use_bpaf", bpaf(long("frames")))]
    pub frames: Option<u32>,

    #[cfg_attr(feature = "use_bpaf", bpaf(long("content_width")))]
    pub content_width: Option<u32>,
    #[cfg_attr(feature = "use_bpaf", bpaf(long("content_height")))]
    pub content_height: Option<u32>,

    /// Enable integer scaling
    #[cfg_attr(feature = "use_bpaf", bpaf(long("integer"), switch))]
    pub integer: bool,

    /// Stretch to fill the screen instead of keeping the aspect ratio
    #[cfg_attr(feature = "use_bpaf", bpaf(long("no_aspect"), long("noaspect"), switch))]
    pub no_aspect: bool,

    /// Nearest, Bilinear or Bicubic
    #[cfg_attr(feature = "use_bpaf", bpaf(long("filter")))]
    pub filter: Option<ScalerFilter>,

    /// Requested rotation in degrees: 0, 90, 180 or 270
    #[cfg_attr(feature = "use_bpaf", bpaf(long("rotation")))]
    pub rotation: Option<u32>,

    /// Write a PNG of the displayed page on exit
    #[cfg_attr(feature = "use_bpaf", bpaf(long("screenshot")))]
    pub screenshot: Option<PathBuf>,

    #[cfg_attr(feature = "use_bpaf", bpaf(long("fast_forward"), long("fastforward"), switch))]
    pub fast_forward: bool,
}
