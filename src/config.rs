// Run-wide settings. The command line only chooses the directories; everything
// else keeps the defaults below.

use std::path::PathBuf;

use crate::cli::Args;

pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.75; // red overlay opacity on selected pixels
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;      // range factor per wheel tick
pub const DEFAULT_MAX_WINDOW: (usize, usize) = (1280, 800);
pub const DEFAULT_STRIP_WIDTH: usize = 96;   // button strip left of the image

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub save_dir: PathBuf,
    pub overlay_alpha: f32,
    pub zoom_step: f64,
    pub max_window: (usize, usize),
    pub button_strip_width: usize,
}

impl Settings {
    pub fn new(data_dir: PathBuf, save_dir: PathBuf) -> Self {
        Self {
            data_dir,
            save_dir,
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            zoom_step: DEFAULT_ZOOM_STEP,
            max_window: DEFAULT_MAX_WINDOW,
            button_strip_width: DEFAULT_STRIP_WIDTH,
        }
    }
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self::new(args.data_dir, args.save_dir)
    }
}
