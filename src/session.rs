// One editing session: a single image, from window open to window close.
// Visual: the window stays up, reacting to lasso/scroll/buttons, until you close it.

use crate::editor::LassoEditor;
use crate::error::Error;
use crate::frontend::{ButtonAction, Frontend, ViewCommand};
use crate::viewport::ZoomController;

/// Dispatch frontend events to the editor until the window closes.
/// A failing save ends the session (and the run) with that error.
pub fn run_session<F: Frontend>(frontend: &mut F, editor: &mut LassoEditor) -> Result<(), Error> {
    frontend.show(editor.composite());
    frontend.request_redraw();
    let mut zoom = ZoomController::attach(&*frontend, editor.zoom_step());

    while frontend.is_open() {
        frontend.pump()?;

        if let Some(vertices) = frontend.take_selection() {
            editor.on_selection_complete(vertices, &mut *frontend);
        }
        while let Some(event) = frontend.take_scroll() {
            zoom.on_scroll(&mut *frontend, event);
        }
        match frontend.take_view_command() {
            Some(ViewCommand::Home) => zoom.reset_view(&mut *frontend),
            Some(ViewCommand::Back) => zoom.back(&mut *frontend),
            Some(ViewCommand::Forward) => zoom.forward(&mut *frontend),
            None => {}
        }
        for action in [ButtonAction::Save, ButtonAction::Reset] {
            if frontend.take_click(action) {
                editor.handle_button(action, &mut *frontend)?;
            }
        }
    }

    zoom.detach();
    log::info!("session for {} closed ({} pixels masked)", editor.mask_name(), editor.mask().selected_count());
    Ok(())
}
