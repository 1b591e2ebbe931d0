// Scroll-to-zoom around the cursor, plus the view history (Home / Back / Forward).
// Limits are (start, end) pairs in image coordinates; zoom-out never grows past
// the extent the canvas had when the controller was attached.
// Visual: the point under the cursor stays put while the image grows or shrinks around it.

use crate::frontend::Canvas;
use crate::types::Point;

/// Visible rectangle of the image: x-range and y-range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Viewport {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self { x, y }
    }

    /// Full extent of a `width` × `height` image with pixel centres on integers.
    pub fn full_extent(width: u32, height: u32) -> Self {
        Self::new((-0.5, width as f64 - 0.5), (-0.5, height as f64 - 0.5))
    }

    pub fn x_range(&self) -> f64 {
        self.x.1 - self.x.0
    }

    pub fn y_range(&self) -> f64 {
        self.y.1 - self.y.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// One wheel tick with the cursor position in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub direction: ScrollDirection,
    pub cursor: Point,
}

/// Limits after one wheel tick.
///
/// Up divides the visible ranges by `base_scale`, down multiplies them. The
/// cursor keeps its place while the rest of the window scales around it. An axis
/// that would exceed the original range snaps back to the original limits, and
/// any window that drifted past the original extent is shifted back inside.
pub fn zoom_limits(
    current: Viewport,
    original: Viewport,
    event: ScrollEvent,
    base_scale: f64,
) -> Viewport {
    let scale_factor = match event.direction {
        ScrollDirection::Up => base_scale,
        ScrollDirection::Down => 1.0 / base_scale,
        ScrollDirection::Left | ScrollDirection::Right => 1.0,
    };

    let Point { x: cx, y: cy } = event.cursor;
    let new_x = (cx - (cx - current.x.0) / scale_factor, cx + (current.x.1 - cx) / scale_factor);
    let new_y = (cy - (cy - current.y.0) / scale_factor, cy + (current.y.1 - cy) / scale_factor);

    Viewport::new(clamp_axis(new_x, original.x), clamp_axis(new_y, original.y))
}

fn clamp_axis(new: (f64, f64), original: (f64, f64)) -> (f64, f64) {
    let new_range = new.1 - new.0;
    let orig_range = original.1 - original.0;
    if new_range.abs() > orig_range.abs() {
        return original;
    }

    // Same size or smaller: slide it back inside the original extent.
    let (orig_lo, orig_hi) = (original.0.min(original.1), original.0.max(original.1));
    let (lo, hi) = (new.0.min(new.1), new.0.max(new.1));
    let shift = if lo < orig_lo {
        orig_lo - lo
    } else if hi > orig_hi {
        orig_hi - hi
    } else {
        0.0
    };
    (new.0 + shift, new.1 + shift)
}

/// How many views Back can step through before the oldest is forgotten.
pub const MAX_HISTORY: usize = 64;

/// Bounded stack of visited views with a cursor, like a browser's history.
/// Pushing while the cursor is not at the top drops everything after it.
#[derive(Debug, Clone)]
pub struct ViewHistory {
    views: Vec<Viewport>,
    position: usize,
}

impl ViewHistory {
    pub fn new(first: Viewport) -> Self {
        Self { views: vec![first], position: 0 }
    }

    pub fn current(&self) -> Viewport {
        self.views[self.position]
    }

    pub fn push(&mut self, view: Viewport) {
        self.views.truncate(self.position + 1);
        if self.views.last() == Some(&view) {
            return;
        }
        self.views.push(view);
        if self.views.len() > MAX_HISTORY {
            self.views.remove(0);
        }
        self.position = self.views.len() - 1;
    }

    pub fn back(&mut self) -> Option<Viewport> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<Viewport> {
        if self.position + 1 >= self.views.len() {
            return None;
        }
        self.position += 1;
        Some(self.current())
    }
}

/// Scroll listener bound to one canvas for one editing session.
pub struct ZoomController {
    original: Viewport,
    base_scale: f64,
    history: ViewHistory,
    attached: bool,
}

impl ZoomController {
    /// Capture the canvas' current limits as the zoom-out bound and start listening.
    pub fn attach(canvas: &dyn Canvas, base_scale: f64) -> Self {
        let original = canvas.limits();
        log::debug!("zoom attached: x={:?} y={:?} step={base_scale}", original.x, original.y);
        Self { original, base_scale, history: ViewHistory::new(original), attached: true }
    }

    pub fn on_scroll(&mut self, canvas: &mut dyn Canvas, event: ScrollEvent) {
        if !self.attached {
            return;
        }
        let limits = zoom_limits(canvas.limits(), self.original, event, self.base_scale);
        log::debug!("zoom {:?}: x={:?} y={:?}", event.direction, limits.x, limits.y);
        self.history.push(limits);
        canvas.set_limits(limits);
        canvas.request_redraw();
    }

    /// Back to the limits captured at attach time. Recorded as a new view, so Back undoes it.
    pub fn reset_view(&mut self, canvas: &mut dyn Canvas) {
        if !self.attached {
            return;
        }
        self.history.push(self.original);
        canvas.set_limits(self.original);
        canvas.request_redraw();
    }

    /// Previous view in the history, if any.
    pub fn back(&mut self, canvas: &mut dyn Canvas) {
        if !self.attached {
            return;
        }
        if let Some(view) = self.history.back() {
            canvas.set_limits(view);
            canvas.request_redraw();
        }
    }

    /// Next view in the history; nothing after a fresh zoom.
    pub fn forward(&mut self, canvas: &mut dyn Canvas) {
        if !self.attached {
            return;
        }
        if let Some(view) = self.history.forward() {
            canvas.set_limits(view);
            canvas.request_redraw();
        }
    }

    /// Stop listening; later scroll events leave the canvas alone.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::fake::FakeFrontend;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn scroll(direction: ScrollDirection, x: f64, y: f64) -> ScrollEvent {
        ScrollEvent { direction, cursor: Point::new(x, y) }
    }

    #[test]
    fn test_full_extent() {
        let v = Viewport::full_extent(4, 2);
        assert_eq!(v.x, (-0.5, 3.5));
        assert_eq!(v.y, (-0.5, 1.5));
    }

    #[test]
    fn test_zoom_in_at_center() {
        let orig = Viewport::new((0.0, 100.0), (0.0, 50.0));
        let v = zoom_limits(orig, orig, scroll(ScrollDirection::Up, 50.0, 25.0), 2.0);
        assert!(approx_eq(v.x.0, 25.0) && approx_eq(v.x.1, 75.0));
        assert!(approx_eq(v.y.0, 12.5) && approx_eq(v.y.1, 37.5));
    }

    #[test]
    fn test_zoom_in_keeps_cursor_fixed() {
        let orig = Viewport::new((0.0, 100.0), (0.0, 100.0));
        let cursor = (20.0, 70.0);
        let v = zoom_limits(orig, orig, scroll(ScrollDirection::Up, cursor.0, cursor.1), 1.25);

        // Relative position of the cursor inside the window is unchanged.
        let rel_x = (cursor.0 - v.x.0) / v.x_range();
        let rel_y = (cursor.1 - v.y.0) / v.y_range();
        assert!(approx_eq(rel_x, 0.2));
        assert!(approx_eq(rel_y, 0.7));
        assert!(approx_eq(v.x_range(), 80.0));
    }

    #[test]
    fn test_zoom_out_is_bounded() {
        let orig = Viewport::new((-0.5, 99.5), (-0.5, 49.5));
        let mut v = zoom_limits(orig, orig, scroll(ScrollDirection::Up, 10.0, 10.0), 1.1);
        for _ in 0..50 {
            v = zoom_limits(v, orig, scroll(ScrollDirection::Down, 80.0, 5.0), 1.1);
            assert!(v.x_range() <= orig.x_range() + EPSILON);
            assert!(v.y_range() <= orig.y_range() + EPSILON);
            assert!(v.x.0 >= orig.x.0 - EPSILON && v.x.1 <= orig.x.1 + EPSILON);
            assert!(v.y.0 >= orig.y.0 - EPSILON && v.y.1 <= orig.y.1 + EPSILON);
        }
        assert_eq!(v, orig);
    }

    #[test]
    fn test_zoom_out_from_full_view_is_noop() {
        let orig = Viewport::new((0.0, 10.0), (0.0, 10.0));
        let v = zoom_limits(orig, orig, scroll(ScrollDirection::Down, 3.0, 3.0), 1.1);
        assert_eq!(v, orig);
    }

    #[test]
    fn test_inverted_axis_snaps_to_original() {
        // y grows downward on some canvases: limits arrive as (bottom, top).
        let orig = Viewport::new((0.0, 10.0), (9.5, -0.5));
        let v = zoom_limits(orig, orig, scroll(ScrollDirection::Down, 5.0, 5.0), 2.0);
        assert_eq!(v.y, (9.5, -0.5));
    }

    #[test]
    fn test_sideways_scroll_is_noop() {
        let orig = Viewport::new((0.0, 10.0), (0.0, 10.0));
        let zoomed = zoom_limits(orig, orig, scroll(ScrollDirection::Up, 5.0, 5.0), 2.0);
        let v = zoom_limits(zoomed, orig, scroll(ScrollDirection::Left, 3.0, 3.0), 2.0);
        assert_eq!(v, zoomed);
        let v = zoom_limits(zoomed, orig, scroll(ScrollDirection::Right, 3.0, 3.0), 2.0);
        assert_eq!(v, zoomed);
    }

    #[test]
    fn test_controller_applies_and_redraws() {
        let mut canvas = FakeFrontend::new(Viewport::full_extent(10, 10));
        let mut zoom = ZoomController::attach(&canvas, 2.0);
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        assert!(approx_eq(canvas.limits.x_range(), 5.0));
        assert_eq!(canvas.redraws, 1);

        zoom.reset_view(&mut canvas);
        assert_eq!(canvas.limits, Viewport::full_extent(10, 10));
    }

    #[test]
    fn test_detached_controller_ignores_scroll() {
        let mut canvas = FakeFrontend::new(Viewport::full_extent(10, 10));
        let mut zoom = ZoomController::attach(&canvas, 2.0);
        zoom.detach();
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        assert_eq!(canvas.limits, Viewport::full_extent(10, 10));
        assert_eq!(canvas.redraws, 0);
    }

    #[test]
    fn test_back_and_forward_after_two_zooms() {
        let full = Viewport::full_extent(10, 10);
        let mut canvas = FakeFrontend::new(full);
        let mut zoom = ZoomController::attach(&canvas, 2.0);
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        let first = canvas.limits;
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        let second = canvas.limits;
        assert!(approx_eq(second.x_range(), 2.5));

        zoom.back(&mut canvas);
        assert_eq!(canvas.limits, first);
        zoom.back(&mut canvas);
        assert_eq!(canvas.limits, full);
        // Nothing before the attach-time view.
        zoom.back(&mut canvas);
        assert_eq!(canvas.limits, full);

        zoom.forward(&mut canvas);
        zoom.forward(&mut canvas);
        assert_eq!(canvas.limits, second);
        let redraws = canvas.redraws;
        zoom.forward(&mut canvas);
        assert_eq!(canvas.limits, second);
        assert_eq!(canvas.redraws, redraws);
    }

    #[test]
    fn test_new_zoom_clears_forward() {
        let full = Viewport::full_extent(10, 10);
        let mut canvas = FakeFrontend::new(full);
        let mut zoom = ZoomController::attach(&canvas, 2.0);
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        zoom.back(&mut canvas);
        zoom.back(&mut canvas);

        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 0.0, 0.0));
        let branched = canvas.limits;
        zoom.forward(&mut canvas);
        assert_eq!(canvas.limits, branched);
        zoom.back(&mut canvas);
        assert_eq!(canvas.limits, full);
    }

    #[test]
    fn test_home_is_undone_by_back() {
        let full = Viewport::full_extent(10, 10);
        let mut canvas = FakeFrontend::new(full);
        let mut zoom = ZoomController::attach(&canvas, 2.0);
        zoom.on_scroll(&mut canvas, scroll(ScrollDirection::Up, 4.5, 4.5));
        let zoomed = canvas.limits;
        zoom.reset_view(&mut canvas);
        assert_eq!(canvas.limits, full);
        zoom.back(&mut canvas);
        assert_eq!(canvas.limits, zoomed);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = ViewHistory::new(Viewport::new((0.0, 1000.0), (0.0, 1000.0)));
        for i in 1..=(MAX_HISTORY + 10) {
            history.push(Viewport::new((0.0, 1000.0 - i as f64), (0.0, 1000.0)));
        }
        assert_eq!(history.views.len(), MAX_HISTORY);
        let mut steps = 0;
        while history.back().is_some() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY - 1);
        assert_eq!(history.current().x, (0.0, 1000.0 - 11.0));
    }

    #[test]
    fn test_repeated_view_is_not_pushed() {
        let full = Viewport::full_extent(10, 10);
        let mut history = ViewHistory::new(full);
        history.push(full);
        assert_eq!(history.views.len(), 1);
        assert!(history.back().is_none());
    }
}
