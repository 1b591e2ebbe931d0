// Finding and loading the images to mask.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::Error;

/// Case-insensitive substring match, so `shot.PNG` and `a.jpg.bak` both qualify.
pub fn is_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains(".png") || lower.contains(".jpg")
}

/// Image entries of `dir` in the order the directory listing returns them.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let read_dir_err = |source| Error::ReadDir { path: dir.to_path_buf(), source };

    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if is_image_name(&entry.file_name().to_string_lossy()) {
            images.push(entry.path());
        }
    }
    log::info!("found {} image(s) in {}", images.len(), dir.display());
    Ok(images)
}

/// Decode an image and drop any alpha channel.
pub fn load_rgb(path: &Path) -> Result<RgbImage, Error> {
    let image = image::open(path).map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?;
    Ok(image.to_rgb8())
}
