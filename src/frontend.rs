// Capabilities the editor needs from a windowing toolkit.
// The editor and the viewport controller only talk to these traits, so they run
// the same against the minifb window and against the scripted fake used in tests.

use image::RgbImage;

use crate::error::Error;
use crate::types::Point;
use crate::viewport::{ScrollEvent, Viewport};

/// A 2D image canvas with pan/zoom limit accessors.
pub trait Canvas {
    /// Currently visible rectangle in image coordinates.
    fn limits(&self) -> Viewport;
    fn set_limits(&mut self, limits: Viewport);
    /// Replace the displayed image buffer.
    fn show(&mut self, image: &RgbImage);
    /// Ask for the canvas to be repainted on the next frame.
    fn request_redraw(&mut self);
}

/// Freeform lasso primitive: reports the vertices of each completed drag gesture.
pub trait SelectionInput {
    fn take_selection(&mut self) -> Option<Vec<Point>>;
}

/// Scroll-wheel subscription.
pub trait ScrollInput {
    /// Next queued wheel tick. A fast flick queues several ticks in one frame.
    fn take_scroll(&mut self) -> Option<ScrollEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Save,
    Reset,
}

impl ButtonAction {
    pub fn label(self) -> &'static str {
        match self {
            ButtonAction::Save => "SAVE",
            ButtonAction::Reset => "RESET",
        }
    }
}

/// Clickable buttons, one per [`ButtonAction`].
pub trait Button {
    /// True once per click on the button bound to `action`.
    fn take_click(&mut self, action: ButtonAction) -> bool;
}

/// Everything a session loop needs: the four capabilities plus the event pump.
pub trait Frontend: Canvas + SelectionInput + ScrollInput + Button {
    /// Returns false once the user closes the window.
    fn is_open(&self) -> bool;
    /// Present the current frame and collect input for the next one.
    fn pump(&mut self) -> Result<(), Error>;
    /// Some once after the user asks to restore the original view (Home key)
    /// or to step back or forward through the view history (Left/Right keys).
    fn take_view_command(&mut self) -> Option<ViewCommand> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    Home,
    Back,
    Forward,
}

#[cfg(test)]
pub mod fake {
    // Scripted frontend: each call to `pump` consumes one queued frame of input.

    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug, Clone, Default)]
    pub struct FakeFrame {
        pub selection: Option<Vec<Point>>,
        pub scroll: VecDeque<ScrollEvent>,
        pub clicks: Vec<ButtonAction>,
        pub view: Option<ViewCommand>,
    }

    pub struct FakeFrontend {
        pub limits: Viewport,
        pub shown: Option<RgbImage>,
        pub redraws: usize,
        pub pumps: usize,
        frames: VecDeque<FakeFrame>,
        current: FakeFrame,
        open: bool,
    }

    impl FakeFrontend {
        pub fn new(limits: Viewport) -> Self {
            Self {
                limits,
                shown: None,
                redraws: 0,
                pumps: 0,
                frames: VecDeque::new(),
                current: FakeFrame::default(),
                open: true,
            }
        }

        pub fn push_frame(&mut self, frame: FakeFrame) {
            self.frames.push_back(frame);
        }
    }

    impl Canvas for FakeFrontend {
        fn limits(&self) -> Viewport {
            self.limits
        }

        fn set_limits(&mut self, limits: Viewport) {
            self.limits = limits;
        }

        fn show(&mut self, image: &RgbImage) {
            self.shown = Some(image.clone());
        }

        fn request_redraw(&mut self) {
            self.redraws += 1;
        }
    }

    impl SelectionInput for FakeFrontend {
        fn take_selection(&mut self) -> Option<Vec<Point>> {
            self.current.selection.take()
        }
    }

    impl ScrollInput for FakeFrontend {
        fn take_scroll(&mut self) -> Option<ScrollEvent> {
            self.current.scroll.pop_front()
        }
    }

    impl Button for FakeFrontend {
        fn take_click(&mut self, action: ButtonAction) -> bool {
            match self.current.clicks.iter().position(|a| *a == action) {
                Some(i) => {
                    self.current.clicks.remove(i);
                    true
                }
                None => false,
            }
        }
    }

    impl Frontend for FakeFrontend {
        fn is_open(&self) -> bool {
            self.open
        }

        // Window closes once the script runs out.
        fn pump(&mut self) -> Result<(), Error> {
            self.pumps += 1;
            match self.frames.pop_front() {
                Some(frame) => self.current = frame,
                None => {
                    self.current = FakeFrame::default();
                    self.open = false;
                }
            }
            Ok(())
        }

        fn take_view_command(&mut self) -> Option<ViewCommand> {
            self.current.view.take()
        }
    }
}
