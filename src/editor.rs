// Lasso mask editor: one instance per image.
// Owns the original image, the binary mask and the composite shown on the canvas.
// The composite is always derived from the original pixels, never from what was displayed before.
// Visual: selected pixels turn red at the overlay alpha; RESET brings back the untouched image.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::error::Error;
use crate::frontend::{ButtonAction, Canvas};
use crate::lasso::{Lasso, PixelTable};
use crate::types::{Mask, Point};

/// Overlay colour for selected pixels.
pub const OVERLAY_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const MASK_SUFFIX: &str = "_mask.png";

pub struct LassoEditor {
    image: RgbImage,
    composite: RgbImage,
    mask: Mask,
    pixels: PixelTable,
    latest: Vec<bool>,     // flags from the most recent lasso
    mask_name: String,     // e.g. "cat_mask.png"
    output_dir: PathBuf,
    overlay_alpha: f32,
    zoom_step: f64,
}

impl LassoEditor {
    pub fn new(
        image: RgbImage,
        source_name: &str,
        output_dir: &Path,
        overlay_alpha: f32,
        zoom_step: f64,
    ) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let pixels = PixelTable::new(w, h);
        log::debug!("editor for {source_name}: {w}x{h}, {} pixel centres", pixels.len());
        Self {
            composite: image.clone(),
            image,
            mask: Mask::zeros(w, h),
            latest: vec![false; w * h],
            pixels,
            mask_name: mask_file_name(source_name),
            output_dir: output_dir.to_path_buf(),
            overlay_alpha,
            zoom_step,
        }
    }

    pub fn composite(&self) -> &RgbImage {
        &self.composite
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn mask_name(&self) -> &str {
        &self.mask_name
    }

    pub fn zoom_step(&self) -> f64 {
        self.zoom_step
    }

    /// A lasso gesture finished: flag every pixel centre strictly inside it and
    /// paint the overlay. Returns how many pixels the stroke covered.
    pub fn on_selection_complete(&mut self, vertices: Vec<Point>, canvas: &mut dyn Canvas) -> usize {
        let lasso = Lasso::new(vertices);
        self.latest = self.pixels.membership(&lasso);
        let count = self.latest.iter().filter(|&&f| f).count();
        log::debug!("lasso with {} vertices selected {count} pixels", lasso.vertices().len());
        self.composite_overlay(canvas);
        count
    }

    /// Merge the latest flags into the mask and blend the overlay over them.
    /// Pixels selected by earlier strokes keep the colour they already have.
    pub fn composite_overlay(&mut self, canvas: &mut dyn Canvas) {
        let width = self.mask.width;
        let alpha = self.overlay_alpha;
        for (idx, _) in self.latest.iter().enumerate().filter(|(_, f)| **f) {
            self.mask.values[idx] = 1;
            let (x, y) = ((idx % width) as u32, (idx / width) as u32);
            let original = self.image.get_pixel(x, y);
            self.composite.put_pixel(x, y, blend(OVERLAY_COLOR, *original, alpha));
        }
        canvas.show(&self.composite);
        canvas.request_redraw();
    }

    /// Write the mask as `{n}_{stem}_mask.png` with the first unused `n`.
    pub fn save_mask(&self) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.output_dir).map_err(|source| Error::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = next_free_path(&self.output_dir, &self.mask_name);
        self.mask
            .to_gray_image()
            .save(&path)
            .map_err(|source| Error::MaskSave { path: path.clone(), source })?;

        log::info!("saved mask ({} pixels) to {}", self.mask.selected_count(), path.display());
        Ok(path)
    }

    /// Clear the mask and show the untouched image again. Saved files stay.
    pub fn reset_mask(&mut self, canvas: &mut dyn Canvas) {
        self.mask = Mask::zeros(self.mask.width, self.mask.height);
        self.latest.iter_mut().for_each(|f| *f = false);
        self.composite = self.image.clone();
        canvas.show(&self.composite);
        canvas.request_redraw();
        log::info!("mask reset for {}", self.mask_name);
    }

    pub fn handle_button(&mut self, action: ButtonAction, canvas: &mut dyn Canvas) -> Result<(), Error> {
        match action {
            ButtonAction::Save => self.save_mask().map(|_| ()),
            ButtonAction::Reset => {
                self.reset_mask(canvas);
                Ok(())
            }
        }
    }
}

/// `color * alpha + original * (1 - alpha)` per channel.
pub fn blend(color: Rgb<u8>, original: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |c: u8, o: u8| (c as f32 * alpha + o as f32 * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
    Rgb([
        mix(color[0], original[0]),
        mix(color[1], original[1]),
        mix(color[2], original[2]),
    ])
}

/// Drop the last extension and append `_mask.png`: "cat.jpg" -> "cat_mask.png".
/// A name without any dot keeps nothing of itself: "cat" -> "_mask.png".
pub fn mask_file_name(source_name: &str) -> String {
    let stem = source_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or("");
    format!("{stem}{MASK_SUFFIX}")
}

/// `{dir}/{n}_{name}` for the smallest `n` not already on disk.
fn next_free_path(dir: &Path, name: &str) -> PathBuf {
    let mut i = 0usize;
    loop {
        let candidate = dir.join(format!("{i}_{name}"));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}
