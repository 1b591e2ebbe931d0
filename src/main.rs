// What you SEE:
// • One window per image in --data-dir, opened one after another.
// • Hold Left Mouse and draw around a region: on release it turns red and joins the mask.
// • Mouse wheel zooms around the cursor (never further out than the full image). H resets the view.
// • SAVE writes {n}_{stem}_mask.png into --save-dir, RESET clears the mask.
// • Close the window (or ESC / Q) to continue with the next image.

mod cli;
mod config;
mod draw;
mod editor;
mod error;
mod frontend;
mod lasso;
mod session;
mod source;
mod types;
mod viewport;

use std::path::Path;

use clap::Parser;

use cli::Args;
use config::Settings;
use draw::MaskWindow;
use editor::LassoEditor;
use error::Error;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from(Args::parse());
    let images = source::discover_images(&settings.data_dir)?;

    for (i, path) in images.iter().enumerate() {
        log::info!("[{}/{}] {}", i + 1, images.len(), path.display());
        mask_one(path, &settings)?;
    }

    Ok(())
}

/// Load one image, let the user mask it, and tear everything down on close.
fn mask_one(path: &Path, settings: &Settings) -> Result<(), Error> {
    let image = source::load_rgb(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut window = MaskWindow::new(&format!("Lasso Masker - {name}"), &image, settings)?;
    let mut editor = LassoEditor::new(image, &name, &settings.save_dir, settings.overlay_alpha, settings.zoom_step);
    session::run_session(&mut window, &mut editor)
}
