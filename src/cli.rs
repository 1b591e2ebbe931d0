// Command line: where the images come from and where the masks go.

use std::path::PathBuf;

use clap::Parser;

/// Draw lasso masks over every PNG/JPG image in a directory.
///
/// Left-drag encloses pixels, the mouse wheel zooms around the cursor, SAVE writes
/// `{n}_{stem}_mask.png`, RESET clears the mask. Close the window (or press Esc/Q)
/// to move on to the next image.
#[derive(Parser, Debug)]
#[command(name = "lasso-masker", version)]
pub struct Args {
    /// Directory with the source images
    #[arg(long, value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Directory the masks are written to (created on first save)
    #[arg(long, value_name = "DIR")]
    pub save_dir: PathBuf,
}
